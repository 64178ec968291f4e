use super::*;

#[test]
fn defaults_match_shipped_configuration() {
    let settings = Settings::from_raw(RawSettings::default()).expect("valid settings");

    assert_eq!(settings.server.addr, "0.0.0.0:8080".parse().unwrap());
    assert_eq!(settings.server.graceful_shutdown, Duration::from_secs(5));
    assert_eq!(settings.database.path, PathBuf::from("diary.db"));
    assert_eq!(settings.database.max_connections.get(), 8);
    assert_eq!(settings.generator.directory, PathBuf::from("tmp/post"));
    assert_eq!(
        settings.generator.template,
        PathBuf::from("templates/post.md.jinja")
    );
    assert!(!settings.generator.generate_on_submit);
    assert_eq!(settings.authoring.user_id, 1);
    assert_eq!(settings.logging.level, LevelFilter::INFO);
}

#[test]
fn cli_overrides_take_highest_precedence() {
    let mut raw = RawSettings::default();
    raw.server.port = Some(4000);
    raw.logging.level = Some("info".to_string());

    let overrides = ServeOverrides {
        server_port: Some(4321),
        log_level: Some("debug".to_string()),
        ..Default::default()
    };

    raw.apply_serve_overrides(&overrides);
    let settings = Settings::from_raw(raw).expect("valid settings");

    assert_eq!(settings.server.addr.port(), 4321);
    assert_eq!(settings.logging.level, LevelFilter::DEBUG);
}

#[test]
fn cli_json_logging_enforces_format() {
    let mut raw = RawSettings::default();
    let overrides = ServeOverrides {
        log_json: Some(true),
        ..Default::default()
    };

    raw.apply_serve_overrides(&overrides);
    let settings = Settings::from_raw(raw).expect("valid settings");

    assert!(matches!(settings.logging.format, LogFormat::Json));
}

#[test]
fn rejects_zero_graceful_shutdown_window() {
    let mut raw = RawSettings::default();
    raw.server.graceful_shutdown_seconds = Some(0);

    let err = Settings::from_raw(raw).unwrap_err();
    assert!(matches!(
        err,
        LoadError::Invalid {
            key: "server.graceful_shutdown_seconds",
            ..
        }
    ));
}

#[test]
fn rejects_non_positive_owner() {
    let mut raw = RawSettings::default();
    raw.authoring.user_id = Some(0);

    let err = Settings::from_raw(raw).unwrap_err();
    assert!(matches!(
        err,
        LoadError::Invalid {
            key: "authoring.user_id",
            ..
        }
    ));
}

#[test]
fn rejects_unparseable_host() {
    let mut raw = RawSettings::default();
    raw.server.host = Some("not a host".to_string());

    assert!(matches!(
        Settings::from_raw(raw).unwrap_err(),
        LoadError::Invalid {
            key: "server.addr",
            ..
        }
    ));
}

#[test]
fn default_to_serve_command() {
    let args = CliArgs::parse_from(["diary"]);
    let command = args
        .command
        .unwrap_or(Command::Serve(Box::<ServeArgs>::default()));
    assert!(matches!(command, Command::Serve(_)));
}

#[test]
fn parse_serve_overrides() {
    let args = CliArgs::parse_from([
        "diary",
        "serve",
        "--server-host",
        "127.0.0.1",
        "--database-path",
        "/var/lib/diary/diary.db",
        "--generate-on-submit",
        "true",
    ]);

    match args.command.expect("serve command") {
        Command::Serve(serve) => {
            assert_eq!(serve.overrides.server_host.as_deref(), Some("127.0.0.1"));
            assert_eq!(
                serve.overrides.database.database_path.as_deref(),
                Some(std::path::Path::new("/var/lib/diary/diary.db"))
            );
            assert_eq!(serve.overrides.generate_on_submit, Some(true));
        }
        _ => panic!("wrong command parsed"),
    }
}

#[test]
fn parse_generate_arguments() {
    let args = CliArgs::parse_from([
        "diary",
        "generate",
        "--generator-directory",
        "/tmp/out",
        "hello-world",
    ]);

    match args.command.expect("generate command") {
        Command::Generate(generate) => {
            assert_eq!(generate.url_title, "hello-world");
            assert_eq!(
                generate.generator.directory.as_deref(),
                Some(std::path::Path::new("/tmp/out"))
            );

            let mut raw = RawSettings::default();
            raw.apply_generator_overrides(&generate.generator);
            let settings = Settings::from_raw(raw).expect("valid settings");
            assert_eq!(settings.generator.directory, PathBuf::from("/tmp/out"));
        }
        _ => panic!("wrong command parsed"),
    }
}
