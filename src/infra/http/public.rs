use std::sync::Arc;

use axum::{
    Router,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};

use crate::{
    application::{error::HttpError, posts::PostService},
    infra::db::SqliteRepositories,
    presentation::views::{
        DraftRowView, DraftTemplate, DraftView, DraftsTemplate, EditTemplate, EditorView,
        HomeTemplate, render_template_response,
    },
};

use super::{RouterState, db_health_response};

#[derive(Clone)]
pub struct HttpState {
    pub posts: Arc<PostService>,
    pub db: Arc<SqliteRepositories>,
}

pub fn build_public_router() -> Router<RouterState> {
    Router::new()
        .route("/", get(home))
        .route("/drafts", get(drafts))
        .route("/drafts/{post_id}", get(draft))
        .route("/edit/{post_history_id}", get(edit))
        .route("/_health/db", get(public_health))
        .route("/static/{*path}", get(crate::infra::assets::serve_static))
}

async fn home() -> Response {
    render_template_response(
        HomeTemplate {
            view: EditorView::blank(),
        },
        StatusCode::OK,
    )
}

async fn drafts(State(state): State<HttpState>) -> Response {
    match state.posts.drafts().await {
        Ok(posts) => {
            let drafts = posts.into_iter().map(DraftRowView::from).collect();
            render_template_response(DraftsTemplate { drafts }, StatusCode::OK)
        }
        Err(err) => {
            HttpError::from_kind("infra::http::public::drafts", err.kind(), &err).into_response()
        }
    }
}

async fn draft(State(state): State<HttpState>, Path(post_id): Path<i64>) -> Response {
    match state.posts.draft(post_id).await {
        Ok(detail) => render_template_response(
            DraftTemplate {
                view: DraftView::from(detail),
            },
            StatusCode::OK,
        ),
        Err(err) => {
            HttpError::from_kind("infra::http::public::draft", err.kind(), &err).into_response()
        }
    }
}

async fn edit(State(state): State<HttpState>, Path(post_history_id): Path<i64>) -> Response {
    match state.posts.edit(post_history_id).await {
        Ok(revision) => render_template_response(
            EditTemplate {
                view: EditorView::from(revision),
            },
            StatusCode::OK,
        ),
        Err(err) => {
            HttpError::from_kind("infra::http::public::edit", err.kind(), &err).into_response()
        }
    }
}

async fn public_health(State(state): State<HttpState>) -> Response {
    db_health_response(state.db.health_check().await)
}
