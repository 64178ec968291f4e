mod posts;

pub use posts::{latest_post, save_post, submit_post};

// ----- Shared error conversions -----

use axum::extract::rejection::JsonRejection;

use crate::application::error::ErrorKind;
use crate::application::posts::PostServiceError;

use super::error::ApiError;

pub(crate) fn post_service_to_api(err: PostServiceError) -> ApiError {
    let kind = err.kind();
    let message = match kind {
        ErrorKind::BadRequest => "Invalid post",
        ErrorKind::Conflict => "Post has already been posted",
        ErrorKind::NotFound => "Post not found",
        ErrorKind::Internal => "Internal error",
    };
    ApiError::from_kind(kind, message, Some(err.to_string()))
}

pub(crate) fn rejection_to_api(rejection: JsonRejection) -> ApiError {
    ApiError::malformed_body(rejection.body_text())
}
