use crate::application::error::{ErrorKind, ErrorReport, http_status};
use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct ApiErrorBody {
    pub error: ApiErrorMessage,
}

pub mod codes {
    pub const BAD_REQUEST: &str = "bad_request";
    pub const MALFORMED_BODY: &str = "malformed_body";
    pub const CONFLICT: &str = "conflict";
    pub const NOT_FOUND: &str = "not_found";
    pub const INTERNAL: &str = "internal";
}

#[derive(Debug, Serialize)]
pub struct ApiErrorMessage {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
}

#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    code: &'static str,
    message: &'static str,
    hint: Option<String>,
}

impl ApiError {
    pub fn new(
        status: StatusCode,
        code: &'static str,
        message: &'static str,
        hint: Option<String>,
    ) -> Self {
        Self {
            status,
            code,
            message,
            hint,
        }
    }

    /// Status and code follow the error kind; the hint carries the detail.
    pub fn from_kind(kind: ErrorKind, message: &'static str, hint: Option<String>) -> Self {
        let code = match kind {
            ErrorKind::BadRequest => codes::BAD_REQUEST,
            ErrorKind::Conflict => codes::CONFLICT,
            ErrorKind::NotFound => codes::NOT_FOUND,
            ErrorKind::Internal => codes::INTERNAL,
        };
        Self::new(http_status(kind), code, message, hint)
    }

    pub fn malformed_body(hint: String) -> Self {
        Self::new(
            StatusCode::BAD_REQUEST,
            codes::MALFORMED_BODY,
            "Request body is not a valid post payload",
            Some(hint),
        )
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn code(&self) -> &'static str {
        self.code
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let hint = self.hint.clone();
        let body = ApiErrorBody {
            error: ApiErrorMessage {
                code: self.code.to_string(),
                message: self.message.to_string(),
                hint: self.hint,
            },
        };
        let mut response = (self.status, Json(body)).into_response();
        // Picked up by the response logging middleware.
        ErrorReport::from_message(
            "infra::http::api",
            self.status,
            format!("{}: {}", self.code, hint.as_deref().unwrap_or(self.message)),
        )
        .attach(&mut response);
        response
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn conflicts_answer_bad_request_over_http() {
        let err = ApiError::from_kind(ErrorKind::Conflict, "Entry already posted", None);
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert_eq!(err.code(), codes::CONFLICT);
    }

    #[test]
    fn response_carries_report() {
        let response = ApiError::from_kind(
            ErrorKind::Internal,
            "Internal error",
            Some("disk full".to_string()),
        )
        .into_response();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let report = response
            .extensions()
            .get::<ErrorReport>()
            .expect("report attached");
        assert_eq!(report.messages, vec!["internal: disk full".to_string()]);
    }
}
