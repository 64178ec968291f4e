pub mod error;
pub mod handlers;
pub mod models;
pub mod state;

pub use state::ApiState;

use axum::{
    Router,
    routing::{get, post},
};

use crate::infra::http::RouterState;

pub fn build_api_router() -> Router<RouterState> {
    Router::new()
        .route("/api/submit", post(handlers::submit_post))
        .route("/api/save", post(handlers::save_post))
        .route("/api/posts/{url_title}", get(handlers::latest_post))
}
