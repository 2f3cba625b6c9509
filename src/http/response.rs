//! HTTP response building module
//!
//! Builders for the proxy's own responses. Pass-through asset responses are
//! built in `handler::assets` instead.

use hyper::body::Bytes;
use http_body_util::combinators::UnsyncBoxBody;
use http_body_util::{BodyExt, Full};
use hyper::{Response, StatusCode};
use serde::Serialize;

/// Error type carried by streamed bodies
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Body type of every response the proxy returns
pub type ProxyBody = UnsyncBoxBody<Bytes, BoxError>;

pub const NOT_FOUND: &str = "Not Found.";
pub const UNEXPECTED_ERROR: &str = "Unexpected error";

/// Wrap a fully buffered payload
pub fn full_body(data: impl Into<Bytes>) -> ProxyBody {
    Full::new(data.into())
        .map_err(|never| match never {})
        .boxed_unsync()
}

/// Build plain text response with the given status
pub fn build_text_response(status: StatusCode, message: &'static str) -> Response<ProxyBody> {
    Response::builder()
        .status(status)
        .header("Content-Type", "text/plain; charset=utf-8")
        .body(full_body(message))
        .unwrap_or_else(|e| {
            log_build_error(status.as_str(), &e);
            Response::new(full_body(message))
        })
}

/// Build 400 Bad Request response
pub fn build_400_response(message: &'static str) -> Response<ProxyBody> {
    build_text_response(StatusCode::BAD_REQUEST, message)
}

/// Build 404 response with a specific message
pub fn build_404_response(message: &'static str) -> Response<ProxyBody> {
    build_text_response(StatusCode::NOT_FOUND, message)
}

/// Build the catch-all 404 for unmatched routes
pub fn build_not_found_response() -> Response<ProxyBody> {
    build_404_response(NOT_FOUND)
}

/// Build the generic 500 used for every upstream failure
pub fn build_500_response() -> Response<ProxyBody> {
    build_text_response(StatusCode::INTERNAL_SERVER_ERROR, UNEXPECTED_ERROR)
}

/// Build 200 JSON response
pub fn build_json_response<T: Serialize>(value: &T) -> Response<ProxyBody> {
    let payload = match serde_json::to_vec(value) {
        Ok(payload) => payload,
        Err(e) => {
            crate::logger::log_error(&format!("Failed to serialize JSON response: {e}"));
            return build_500_response();
        }
    };

    Response::builder()
        .status(StatusCode::OK)
        .header("Content-Type", "application/json")
        .header("Content-Length", payload.len())
        .body(full_body(payload))
        .unwrap_or_else(|e| {
            log_build_error("200", &e);
            build_500_response()
        })
}

/// Log response build error
fn log_build_error(status: &str, error: &hyper::http::Error) {
    crate::logger::log_error(&format!("Failed to build {status} response: {error}"));
}

#[cfg(test)]
pub async fn body_string(response: Response<ProxyBody>) -> String {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}
