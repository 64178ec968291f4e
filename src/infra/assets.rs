//! Embedded static assets for the HTML pages.

use axum::{
    body::Body,
    extract::Path,
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use bytes::Bytes;
use include_dir::{Dir, File, include_dir};
use mime_guess::Mime;

use crate::application::error::ErrorReport;

static STATIC_ASSETS: Dir<'_> = include_dir!("$CARGO_MANIFEST_DIR/static");

const SOURCE: &str = "infra::assets::serve_static";

/// Serve `/static/{*path}` from the embedded bundle.
pub async fn serve_static(path: Option<Path<String>>) -> Response {
    let captured = path.map(|Path(value)| value).unwrap_or_default();
    match resolve_asset(&captured) {
        Some(file) => build_response(file, mime_guess::from_path(&captured).first_or_octet_stream()),
        None => {
            let mut response = StatusCode::NOT_FOUND.into_response();
            ErrorReport::from_message(SOURCE, StatusCode::NOT_FOUND, "Static asset not found")
                .attach(&mut response);
            response
        }
    }
}

fn resolve_asset(path: &str) -> Option<&'static File<'static>> {
    let candidate = path.trim_start_matches('/');
    if candidate.is_empty() || candidate.ends_with('/') || candidate.contains("..") {
        return None;
    }
    STATIC_ASSETS.get_file(candidate)
}

fn build_response(file: &'static File<'static>, mime: Mime) -> Response {
    let bytes = Bytes::from_static(file.contents());
    let len = bytes.len();
    let mut response = Response::new(Body::from(bytes));

    let headers = response.headers_mut();
    if let Ok(value) = HeaderValue::from_str(mime.as_ref()) {
        headers.insert(header::CONTENT_TYPE, value);
    }
    if let Ok(value) = HeaderValue::from_str(&len.to_string()) {
        headers.insert(header::CONTENT_LENGTH, value);
    }
    headers.insert(
        header::CACHE_CONTROL,
        HeaderValue::from_static("public, max-age=3600"),
    );

    response
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_bundled_script() {
        assert!(resolve_asset("js/draft.js").is_some());
        assert!(resolve_asset("/js/draft.js").is_some());
    }

    #[test]
    fn rejects_traversal_and_directories() {
        assert!(resolve_asset("../Cargo.toml").is_none());
        assert!(resolve_asset("js/").is_none());
        assert!(resolve_asset("").is_none());
    }
}
