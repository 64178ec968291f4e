//! Post write and lookup handlers

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;

use crate::application::posts::{SaveMode, SavePostCommand};
use crate::domain::types::Transport;

use super::{post_service_to_api, rejection_to_api};
use crate::infra::http::api::error::ApiError;
use crate::infra::http::api::models::PostRequest;
use crate::infra::http::api::state::ApiState;

pub async fn submit_post(
    State(state): State<ApiState>,
    payload: Result<Json<PostRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    write_post(state, payload, SaveMode::Submit).await
}

pub async fn save_post(
    State(state): State<ApiState>,
    payload: Result<Json<PostRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    write_post(state, payload, SaveMode::Save).await
}

async fn write_post(
    state: ApiState,
    payload: Result<Json<PostRequest>, JsonRejection>,
    mode: SaveMode,
) -> Result<impl IntoResponse, ApiError> {
    let Json(payload) = payload.map_err(rejection_to_api)?;

    let command = SavePostCommand {
        payload: payload.into(),
        transport: Transport::Http,
        mode,
    };

    let saved = state
        .posts
        .save_post(command)
        .await
        .map_err(post_service_to_api)?;

    Ok((StatusCode::CREATED, Json(saved)))
}

pub async fn latest_post(
    State(state): State<ApiState>,
    Path(url_title): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let revision = state
        .posts
        .latest(&url_title)
        .await
        .map_err(post_service_to_api)?;

    Ok(Json(revision))
}
