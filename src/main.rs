use std::{process, sync::Arc};

use diary::{
    application::{error::AppError, generate::PostGenerator, posts::PostService},
    config,
    infra::{
        db::SqliteRepositories,
        error::InfraError,
        http::{self, ApiState, HttpState, RouterState},
        telemetry,
    },
};
use tokio::{sync::Notify, task::JoinHandle};
use tracing::{Dispatch, Level, dispatcher, error, info, warn};
use tracing_subscriber::fmt as tracing_fmt;

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        report_application_error(&error);
        process::exit(1);
    }
}

fn report_application_error(error: &AppError) {
    if dispatcher::has_been_set() {
        error!(error = %error, "application error");
        return;
    }

    let subscriber = tracing_fmt().with_max_level(Level::ERROR).finish();
    let dispatch = Dispatch::new(subscriber);
    dispatcher::with_default(&dispatch, || {
        error!(error = %error, "application error");
    });
}

async fn run() -> Result<(), AppError> {
    let (cli_args, settings) = config::load_with_cli()
        .map_err(|err| AppError::unexpected(format!("failed to load configuration: {err}")))?;

    let command = cli_args
        .command
        .unwrap_or(config::Command::Serve(Box::<config::ServeArgs>::default()));

    telemetry::init(&settings.logging).map_err(AppError::from)?;

    match command {
        config::Command::Serve(_) => run_serve(settings).await,
        config::Command::Generate(args) => run_generate(settings, args).await,
    }
}

async fn run_serve(settings: config::Settings) -> Result<(), AppError> {
    let repositories = init_repositories(&settings).await?;

    let mut posts = PostService::new(
        repositories.clone(),
        repositories.clone(),
        repositories.clone(),
        repositories.clone(),
        settings.authoring.user_id,
    );
    if settings.generator.generate_on_submit {
        posts = posts.with_generator(build_generator(&settings, &repositories));
    }
    let posts = Arc::new(posts);

    let state = RouterState {
        http: HttpState {
            posts: posts.clone(),
            db: repositories.clone(),
        },
        api: ApiState { posts },
    };

    serve_http(&settings, state).await
}

async fn run_generate(
    settings: config::Settings,
    args: config::GenerateArgs,
) -> Result<(), AppError> {
    let repositories = init_repositories(&settings).await?;
    let generator = build_generator(&settings, &repositories);

    let path = generator.generate(&args.url_title).await?;
    info!(
        target = "diary::generate",
        path = %path.display(),
        "generation complete"
    );
    Ok(())
}

fn build_generator(
    settings: &config::Settings,
    repositories: &Arc<SqliteRepositories>,
) -> Arc<PostGenerator> {
    Arc::new(PostGenerator::new(
        repositories.clone(),
        repositories.clone(),
        repositories.clone(),
        repositories.clone(),
        settings.generator.directory.clone(),
        settings.generator.template.clone(),
    ))
}

async fn init_repositories(
    settings: &config::Settings,
) -> Result<Arc<SqliteRepositories>, AppError> {
    let pool = SqliteRepositories::connect(
        &settings.database.path,
        settings.database.max_connections.get(),
    )
    .await
    .map_err(|err| AppError::from(InfraError::database(err)))?;

    SqliteRepositories::run_migrations(&pool)
        .await
        .map_err(|err| AppError::from(InfraError::database(err)))?;

    info!(
        target = "diary::db",
        path = %settings.database.path.display(),
        "database ready"
    );
    Ok(Arc::new(SqliteRepositories::new(pool)))
}

async fn serve_http(settings: &config::Settings, state: RouterState) -> Result<(), AppError> {
    let router = http::build_router(state);
    let addr = settings.server.addr;

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|source| AppError::from(InfraError::Bind { addr, source }))?;
    info!(target = "diary::http", addr = %addr, "listening");

    let shutdown = Arc::new(Notify::new());
    let server_shutdown = shutdown.clone();
    let mut server: JoinHandle<std::io::Result<()>> = tokio::spawn(async move {
        axum::serve(listener, router)
            .with_graceful_shutdown(async move { server_shutdown.notified().await })
            .await
    });

    tokio::select! {
        result = &mut server => return server_outcome(result),
        () = shutdown_signal() => {}
    }

    info!(
        target = "diary::http",
        grace_seconds = settings.server.graceful_shutdown.as_secs(),
        "shutting down"
    );
    shutdown.notify_one();

    match tokio::time::timeout(settings.server.graceful_shutdown, &mut server).await {
        Ok(result) => server_outcome(result),
        Err(_) => {
            warn!(
                target = "diary::http",
                "graceful shutdown window elapsed; aborting in-flight requests"
            );
            server.abort();
            Ok(())
        }
    }
}

fn server_outcome(
    result: Result<std::io::Result<()>, tokio::task::JoinError>,
) -> Result<(), AppError> {
    match result {
        Ok(Ok(())) => Ok(()),
        Ok(Err(err)) => Err(AppError::from(InfraError::Server(err.to_string()))),
        Err(err) => Err(AppError::unexpected(format!("server task failed: {err}"))),
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            error!(target = "diary::http", error = %err, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                error!(target = "diary::http", error = %err, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {}
        () = terminate => {}
    }
}
