use std::error::Error as StdError;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use crate::{
    application::generate::GenerateError,
    domain::types::Transport,
    infra::error::InfraError,
};

/// Transport-neutral failure classes surfaced by the application layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    BadRequest,
    Conflict,
    NotFound,
    Internal,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::BadRequest => "bad_request",
            ErrorKind::Conflict => "conflict",
            ErrorKind::NotFound => "not_found",
            ErrorKind::Internal => "internal",
        }
    }
}

/// Numeric status for an error kind on the given transport.
///
/// HTTP folds conflicts into 400; gRPC reports `FAILED_PRECONDITION`.
pub fn status_code(kind: ErrorKind, transport: Transport) -> u16 {
    match (transport, kind) {
        (Transport::Http, ErrorKind::BadRequest) => 400,
        (Transport::Http, ErrorKind::Conflict) => 400,
        (Transport::Http, ErrorKind::NotFound) => 404,
        (Transport::Http, ErrorKind::Internal) => 500,
        (Transport::Grpc, ErrorKind::BadRequest) => 3,
        (Transport::Grpc, ErrorKind::Conflict) => 9,
        (Transport::Grpc, ErrorKind::NotFound) => 5,
        (Transport::Grpc, ErrorKind::Internal) => 13,
    }
}

/// HTTP status for an error kind.
pub fn http_status(kind: ErrorKind) -> StatusCode {
    StatusCode::from_u16(status_code(kind, Transport::Http))
        .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
}

#[derive(Debug, Clone)]
pub struct ErrorReport {
    pub source: &'static str,
    pub status: StatusCode,
    pub messages: Vec<String>,
}

impl ErrorReport {
    pub fn from_error(source: &'static str, status: StatusCode, error: &dyn StdError) -> Self {
        let mut messages = vec![error.to_string()];
        let mut current = error.source();
        while let Some(inner) = current {
            messages.push(inner.to_string());
            current = inner.source();
        }
        Self {
            source,
            status,
            messages,
        }
    }

    pub fn from_message(
        source: &'static str,
        status: StatusCode,
        message: impl Into<String>,
    ) -> Self {
        Self {
            source,
            status,
            messages: vec![message.into()],
        }
    }

    pub fn attach(self, response: &mut Response) {
        response.extensions_mut().insert(self);
    }
}

/// Plain-text error answer for the HTML surface.
#[derive(Debug)]
pub struct HttpError {
    status: StatusCode,
    public_message: &'static str,
    report: ErrorReport,
}

impl HttpError {
    pub fn from_error(
        source: &'static str,
        status: StatusCode,
        public_message: &'static str,
        error: &dyn StdError,
    ) -> Self {
        let report = ErrorReport::from_error(source, status, error);
        Self {
            status,
            public_message,
            report,
        }
    }

    pub fn from_kind(source: &'static str, kind: ErrorKind, error: &dyn StdError) -> Self {
        let public_message = match kind {
            ErrorKind::BadRequest => "Request could not be processed",
            ErrorKind::Conflict => "Entry has already been posted",
            ErrorKind::NotFound => "Resource not found",
            ErrorKind::Internal => "Internal server error",
        };
        Self::from_error(source, http_status(kind), public_message, error)
    }
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let mut response = (self.status, self.public_message).into_response();
        self.report.attach(&mut response);
        response
    }
}

/// Top-level error for the binary entry points.
#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Infra(#[from] InfraError),
    #[error(transparent)]
    Generate(#[from] GenerateError),
    #[error("unexpected error: {0}")]
    Unexpected(String),
}

impl AppError {
    pub fn unexpected(message: impl Into<String>) -> Self {
        Self::Unexpected(message.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn http_mapping_matches_rest_contract() {
        assert_eq!(status_code(ErrorKind::BadRequest, Transport::Http), 400);
        assert_eq!(status_code(ErrorKind::Conflict, Transport::Http), 400);
        assert_eq!(status_code(ErrorKind::NotFound, Transport::Http), 404);
        assert_eq!(status_code(ErrorKind::Internal, Transport::Http), 500);
    }

    #[test]
    fn grpc_mapping_uses_canonical_codes() {
        assert_eq!(status_code(ErrorKind::BadRequest, Transport::Grpc), 3);
        assert_eq!(status_code(ErrorKind::Conflict, Transport::Grpc), 9);
        assert_eq!(status_code(ErrorKind::NotFound, Transport::Grpc), 5);
        assert_eq!(status_code(ErrorKind::Internal, Transport::Grpc), 13);
    }

    #[test]
    fn report_collects_error_chain() {
        let io = std::io::Error::other("disk full");
        let infra = InfraError::from(io);
        let report = ErrorReport::from_error("test", StatusCode::INTERNAL_SERVER_ERROR, &infra);
        assert_eq!(report.messages[0], "io error: disk full");
    }
}
