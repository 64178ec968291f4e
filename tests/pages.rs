use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    http::{Method, Request, StatusCode, header},
};
use http_body_util::BodyExt;
use sqlx::SqlitePool;
use tower::ServiceExt;

use diary::application::posts::{PostService, SaveMode, SavePostCommand, SavedRevision};
use diary::domain::posts::PostPayload;
use diary::domain::types::Transport;
use diary::infra::db::SqliteRepositories;
use diary::infra::http::{ApiState, HttpState, RouterState, build_router};

fn build_app(pool: SqlitePool) -> (Router, Arc<PostService>) {
    let repos = Arc::new(SqliteRepositories::new(pool));
    let posts = Arc::new(PostService::new(
        repos.clone(),
        repos.clone(),
        repos.clone(),
        repos.clone(),
        1,
    ));
    let state = RouterState {
        http: HttpState {
            posts: posts.clone(),
            db: repos,
        },
        api: ApiState {
            posts: posts.clone(),
        },
    };
    (build_router(state), posts)
}

async fn write(posts: &PostService, title: &str, body: &str, mode: SaveMode) -> SavedRevision {
    posts
        .save_post(SavePostCommand {
            payload: PostPayload {
                title: title.to_string(),
                body: body.to_string(),
                tags: vec!["daily".to_string()],
                categories: vec!["life".to_string()],
            },
            transport: Transport::Http,
            mode,
        })
        .await
        .expect("write post")
}

async fn get(app: &Router, uri: &str) -> (StatusCode, String) {
    let request = Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(Body::empty())
        .expect("request should build");
    let response = app
        .clone()
        .oneshot(request)
        .await
        .expect("router should respond");
    let status = response.status();
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body should collect")
        .to_bytes();
    (status, String::from_utf8_lossy(&bytes).into_owned())
}

#[sqlx::test(migrations = "./migrations")]
async fn home_renders_blank_editor(pool: SqlitePool) {
    let (app, _) = build_app(pool);

    let (status, html) = get(&app, "/").await;
    assert_eq!(status, StatusCode::OK);
    assert!(html.contains("New entry"));
    assert!(html.contains("/static/js/editor.js"));
}

#[sqlx::test(migrations = "./migrations")]
async fn drafts_pages_show_revisions(pool: SqlitePool) {
    let (app, posts) = build_app(pool);
    let first = write(&posts, "Morning Notes", "coffee first", SaveMode::Save).await;
    let second = write(&posts, "Morning Notes", "coffee second", SaveMode::Save).await;

    let (status, html) = get(&app, "/drafts").await;
    assert_eq!(status, StatusCode::OK);
    assert!(html.contains("Morning Notes"));
    assert!(html.contains(&format!("/drafts/{}", first.post_id)));

    let (status, html) = get(&app, &format!("/drafts/{}", first.post_id)).await;
    assert_eq!(status, StatusCode::OK);
    assert!(html.contains("coffee first"));
    assert!(html.contains("coffee second"));
    assert!(html.contains(&format!("/edit/{}", second.history_id)));

    let (status, html) = get(&app, &format!("/edit/{}", first.history_id)).await;
    assert_eq!(status, StatusCode::OK);
    assert!(html.contains("coffee first"));
    assert!(!html.contains("coffee second"));
    assert!(html.contains("daily"));
}

#[sqlx::test(migrations = "./migrations")]
async fn posted_entries_have_no_draft_pages(pool: SqlitePool) {
    let (app, posts) = build_app(pool);
    let saved = write(&posts, "Published", "final words", SaveMode::Submit).await;

    let (status, _) = get(&app, &format!("/drafts/{}", saved.post_id)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = get(&app, &format!("/edit/{}", saved.history_id)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, html) = get(&app, "/drafts").await;
    assert_eq!(status, StatusCode::OK);
    assert!(!html.contains("Published"));
}

#[sqlx::test(migrations = "./migrations")]
async fn unknown_draft_is_not_found(pool: SqlitePool) {
    let (app, _) = build_app(pool);

    let (status, body) = get(&app, "/drafts/999").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, "Resource not found");
}

#[sqlx::test(migrations = "./migrations")]
async fn health_and_static_assets(pool: SqlitePool) {
    let (app, _) = build_app(pool);

    let (status, _) = get(&app, "/_health/db").await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let request = Request::builder()
        .uri("/static/css/diary.css")
        .body(Body::empty())
        .expect("request should build");
    let response = app.clone().oneshot(request).await.expect("router should respond");
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get(header::CONTENT_TYPE).map(|v| v.as_bytes()),
        Some(b"text/css".as_slice())
    );

    let (status, _) = get(&app, "/static/js/missing.js").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
