pub mod api;
mod middleware;
mod public;

pub use api::ApiState;
pub use middleware::RequestContext;
pub use public::HttpState;

use crate::application::error::ErrorReport;
use axum::Router;
use axum::extract::FromRef;
use axum::http::StatusCode;
use axum::middleware::from_fn;
use axum::response::{IntoResponse, Response};
use sqlx::Error as SqlxError;

use self::middleware::{log_responses, set_request_context};

fn db_health_response(result: Result<(), SqlxError>) -> Response {
    match result {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(err) => {
            let mut response = StatusCode::SERVICE_UNAVAILABLE.into_response();
            ErrorReport::from_error(
                "infra::http::db_health",
                StatusCode::SERVICE_UNAVAILABLE,
                &err,
            )
            .attach(&mut response);
            response
        }
    }
}

#[derive(Clone)]
pub struct RouterState {
    pub http: HttpState,
    pub api: ApiState,
}

impl FromRef<RouterState> for HttpState {
    fn from_ref(state: &RouterState) -> Self {
        state.http.clone()
    }
}

impl FromRef<RouterState> for ApiState {
    fn from_ref(state: &RouterState) -> Self {
        state.api.clone()
    }
}

/// HTML pages, static assets and the JSON API behind the shared request middleware.
pub fn build_router(state: RouterState) -> Router {
    public::build_public_router()
        .merge(api::build_api_router())
        .with_state(state)
        .layer(from_fn(log_responses))
        .layer(from_fn(set_request_context))
}
