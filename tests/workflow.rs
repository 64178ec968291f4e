use std::sync::Arc;

use futures::future::join_all;
use sqlx::SqlitePool;

use diary::application::error::ErrorKind;
use diary::application::posts::{PostService, SaveMode, SavePostCommand};
use diary::domain::posts::PostPayload;
use diary::domain::types::Transport;
use diary::infra::db::SqliteRepositories;

fn build_service(pool: SqlitePool) -> PostService {
    let repos = Arc::new(SqliteRepositories::new(pool));
    PostService::new(
        repos.clone(),
        repos.clone(),
        repos.clone(),
        repos.clone(),
        1,
    )
}

fn command(title: &str, body: &str, tags: &[&str], mode: SaveMode) -> SavePostCommand {
    SavePostCommand {
        payload: PostPayload {
            title: title.to_string(),
            body: body.to_string(),
            tags: tags.iter().map(|tag| tag.to_string()).collect(),
            categories: vec!["journal".to_string()],
        },
        transport: Transport::Http,
        mode,
    }
}

async fn count(pool: &SqlitePool, table: &str) -> i64 {
    sqlx::query_scalar::<_, i64>(&format!("SELECT COUNT(*) FROM {table}"))
        .fetch_one(pool)
        .await
        .expect("count rows")
}

#[sqlx::test(migrations = "./migrations")]
async fn submitted_body_is_latest_revision(pool: SqlitePool) {
    let service = build_service(pool);

    let saved = service
        .save_post(command("First Day", "it rained", &["weather"], SaveMode::Submit))
        .await
        .expect("submit post");
    assert!(saved.posted);
    assert_eq!(saved.url_title, "first-day");

    let latest = service.latest("First Day").await.expect("latest revision");
    assert_eq!(latest.revision.history.id, saved.history_id);
    assert_eq!(latest.revision.history.body, "it rained");
    assert_eq!(latest.revision.history.method, Transport::Http);
    assert!(latest.post.posted);
}

#[sqlx::test(migrations = "./migrations")]
async fn second_submit_conflicts_without_new_rows(pool: SqlitePool) {
    let service = build_service(pool.clone());

    service
        .save_post(command("Once", "only once", &["one"], SaveMode::Submit))
        .await
        .expect("first submit");

    let err = service
        .save_post(command("Once", "twice?", &["one"], SaveMode::Submit))
        .await
        .expect_err("second submit must fail");
    assert_eq!(err.kind(), ErrorKind::Conflict);

    assert_eq!(count(&pool, "post").await, 1);
    assert_eq!(count(&pool, "post_history").await, 1);
}

#[sqlx::test(migrations = "./migrations")]
async fn save_after_submit_is_rejected(pool: SqlitePool) {
    let service = build_service(pool.clone());

    service
        .save_post(command("Final", "done", &["one"], SaveMode::Submit))
        .await
        .expect("submit");

    let err = service
        .save_post(command("final", "reopen", &["one"], SaveMode::Save))
        .await
        .expect_err("posted entries are immutable");
    assert_eq!(err.kind(), ErrorKind::Conflict);
    assert_eq!(count(&pool, "post_history").await, 1);
}

#[sqlx::test(migrations = "./migrations")]
async fn resave_appends_history_and_keeps_prior_rows(pool: SqlitePool) {
    let service = build_service(pool.clone());

    let first = service
        .save_post(command("Notes", "v1", &["misc"], SaveMode::Save))
        .await
        .expect("first save");
    let second = service
        .save_post(command("Notes", "v2", &["misc", "extra"], SaveMode::Save))
        .await
        .expect("second save");

    assert_eq!(first.post_id, second.post_id);
    assert_ne!(first.history_id, second.history_id);
    assert!(!second.posted);

    let prior: String = sqlx::query_scalar("SELECT body FROM post_history WHERE id = ?")
        .bind(first.history_id)
        .fetch_one(&pool)
        .await
        .expect("prior revision");
    assert_eq!(prior, "v1");

    let draft = service.draft(first.post_id).await.expect("draft detail");
    assert_eq!(draft.revisions.len(), 2);
    assert_eq!(draft.revisions[0].history.body, "v2");
    assert_eq!(draft.revisions[0].tags.len(), 2);
    assert_eq!(draft.revisions[1].history.body, "v1");
    assert_eq!(draft.revisions[1].tags.len(), 1);
}

#[sqlx::test(migrations = "./migrations")]
async fn case_variant_tags_collapse_to_one(pool: SqlitePool) {
    let service = build_service(pool.clone());

    let saved = service
        .save_post(command("Gophers", "hi", &["Go", "go", "GO "], SaveMode::Save))
        .await
        .expect("save");

    let edit = service.edit(saved.history_id).await.expect("edit view");
    assert_eq!(edit.revision.tags.len(), 1);
    assert_eq!(edit.revision.tags[0].name, "go");
    assert_eq!(count(&pool, "tag").await, 1);
    assert_eq!(count(&pool, "post_tags").await, 1);
}

#[sqlx::test(migrations = "./migrations")]
async fn taxonomy_is_shared_between_posts(pool: SqlitePool) {
    let service = build_service(pool.clone());

    service
        .save_post(command("Alpha", "a", &["rust"], SaveMode::Save))
        .await
        .expect("alpha");
    service
        .save_post(command("Beta", "b", &["Rust"], SaveMode::Save))
        .await
        .expect("beta");

    assert_eq!(count(&pool, "tag").await, 1);
    assert_eq!(count(&pool, "category").await, 1);
    assert_eq!(count(&pool, "post_tags").await, 2);
    assert_eq!(count(&pool, "post_categories").await, 2);
}

#[sqlx::test(migrations = "./migrations")]
async fn spaced_and_hyphenated_names_share_one_row_across_posts(pool: SqlitePool) {
    let service = build_service(pool.clone());

    service
        .save_post(command("Alpha", "a", &["Road Trip"], SaveMode::Save))
        .await
        .expect("alpha");
    service
        .save_post(command("Beta", "b", &["road-trip"], SaveMode::Save))
        .await
        .expect("beta");

    let names: Vec<String> = sqlx::query_scalar("SELECT name FROM tag")
        .fetch_all(&pool)
        .await
        .expect("tag names");
    assert_eq!(names, vec!["road-trip".to_string()]);
    assert_eq!(count(&pool, "post_tags").await, 2);
}

#[sqlx::test(migrations = "./migrations")]
async fn failure_after_first_writes_rolls_everything_back(pool: SqlitePool) {
    sqlx::query(
        "CREATE TRIGGER reject_tag_links BEFORE INSERT ON post_tags \
         BEGIN SELECT RAISE(ABORT, 'tag links disabled'); END",
    )
    .execute(&pool)
    .await
    .expect("install trigger");
    let service = build_service(pool.clone());

    let err = service
        .save_post(command("Doomed", "never lands", &["fresh"], SaveMode::Submit))
        .await
        .expect_err("linking tags fails");
    assert_eq!(err.kind(), ErrorKind::Internal);

    for table in ["post", "post_history", "tag", "category", "post_tags", "post_categories"] {
        assert_eq!(count(&pool, table).await, 0, "{table} should be empty");
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_saves_all_commit_and_share_taxonomy() {
    let dir = tempfile::tempdir().expect("tempdir");
    let pool = SqliteRepositories::connect(&dir.path().join("diary.db"), 8)
        .await
        .expect("connect");
    SqliteRepositories::run_migrations(&pool)
        .await
        .expect("migrations");
    let service = Arc::new(build_service(pool.clone()));

    let tasks = (0..32).map(|n| {
        let service = service.clone();
        tokio::spawn(async move {
            let own = format!("own {n}");
            service
                .save_post(command(
                    &format!("Entry {n}"),
                    "written at once",
                    &["shared", own.as_str()],
                    SaveMode::Save,
                ))
                .await
        })
    });

    for outcome in join_all(tasks).await {
        outcome.expect("task joined").expect("save committed");
    }

    assert_eq!(count(&pool, "post").await, 32);
    assert_eq!(count(&pool, "post_history").await, 32);
    assert_eq!(count(&pool, "tag").await, 33);
    assert_eq!(count(&pool, "category").await, 1);
    assert_eq!(count(&pool, "post_tags").await, 64);
}

#[sqlx::test(migrations = "./migrations")]
async fn invalid_title_is_rejected_before_any_write(pool: SqlitePool) {
    let service = build_service(pool.clone());

    let err = service
        .save_post(command("Hello!", "body", &["one"], SaveMode::Submit))
        .await
        .expect_err("punctuation is not url safe");
    assert_eq!(err.kind(), ErrorKind::BadRequest);

    assert_eq!(count(&pool, "post").await, 0);
    assert_eq!(count(&pool, "tag").await, 0);
}

#[sqlx::test(migrations = "./migrations")]
async fn draft_views_reject_posted_entries(pool: SqlitePool) {
    let service = build_service(pool);

    let saved = service
        .save_post(command("Public", "out now", &["news"], SaveMode::Submit))
        .await
        .expect("submit");

    let err = service
        .draft(saved.post_id)
        .await
        .expect_err("posted entries have no draft view");
    assert_eq!(err.kind(), ErrorKind::Conflict);

    let err = service
        .edit(saved.history_id)
        .await
        .expect_err("posted entries cannot be edited");
    assert_eq!(err.kind(), ErrorKind::Conflict);
}

#[sqlx::test(migrations = "./migrations")]
async fn drafts_lists_only_unposted(pool: SqlitePool) {
    let service = build_service(pool);

    service
        .save_post(command("Kept", "draft", &["one"], SaveMode::Save))
        .await
        .expect("save");
    service
        .save_post(command("Shipped", "done", &["one"], SaveMode::Submit))
        .await
        .expect("submit");

    let drafts = service.drafts().await.expect("drafts");
    let titles: Vec<_> = drafts.iter().map(|post| post.url_title.as_str()).collect();
    assert_eq!(titles, vec!["kept"]);
}

#[sqlx::test(migrations = "./migrations")]
async fn missing_entries_are_not_found(pool: SqlitePool) {
    let service = build_service(pool);

    assert_eq!(
        service.draft(42).await.expect_err("no post").kind(),
        ErrorKind::NotFound
    );
    assert_eq!(
        service.edit(42).await.expect_err("no revision").kind(),
        ErrorKind::NotFound
    );
    assert_eq!(
        service.latest("nothing-here").await.expect_err("no post").kind(),
        ErrorKind::NotFound
    );
}
