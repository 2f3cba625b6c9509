//! Asset pass-through
//!
//! Fetches the canonical URL of an asset with the caller's headers and relays
//! the upstream response as is: status, headers and a streamed body.

use futures_util::TryStreamExt;
use http_body_util::{BodyExt, StreamBody};
use hyper::body::Frame;
use hyper::header::HeaderMap;
use hyper::Response;

use crate::config::AppState;
use crate::error::UpstreamError;
use crate::http::headers::strip_hop_by_hop;
use crate::http::{
    build_404_response, build_500_response, forwardable_headers, BoxError, ProxyBody,
};
use crate::logger;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetKind {
    Thumbnail,
    Media,
    Avatar,
    Cover,
}

impl AssetKind {
    pub const fn missing_message(self) -> &'static str {
        match self {
            Self::Thumbnail => "Video has no thumbnail",
            Self::Media => "Video has no media",
            Self::Avatar => "Channel has no avatar",
            Self::Cover => "Channel has no cover",
        }
    }
}

/// Stream the first of `urls` back to the caller, or 404 when there is none
pub async fn serve_first(
    state: &AppState,
    urls: &[String],
    kind: AssetKind,
    inbound: &HeaderMap,
) -> Response<ProxyBody> {
    let Some(url) = urls.first() else {
        return build_404_response(kind.missing_message());
    };

    match fetch_asset(state, url, inbound).await {
        Ok(response) => response,
        Err(e) => {
            logger::log_upstream_error(&e);
            build_500_response()
        }
    }
}

async fn fetch_asset(
    state: &AppState,
    url: &str,
    inbound: &HeaderMap,
) -> Result<Response<ProxyBody>, UpstreamError> {
    tracing::debug!(%url, range = ?inbound.get("range"), "fetching asset");
    let upstream = state
        .client
        .get(url)
        .headers(forwardable_headers(inbound))
        .send()
        .await
        .map_err(|source| UpstreamError::Transport {
            url: url.to_string(),
            source,
        })?;

    Ok(relay(upstream))
}

/// Turn an upstream response into ours without buffering the body
fn relay(upstream: reqwest::Response) -> Response<ProxyBody> {
    let status = upstream.status();
    let mut headers = upstream.headers().clone();
    strip_hop_by_hop(&mut headers);

    let stream = upstream
        .bytes_stream()
        .map_ok(Frame::data)
        .map_err(BoxError::from);
    let mut response = Response::new(StreamBody::new(stream).boxed_unsync());
    *response.status_mut() = status;
    *response.headers_mut() = headers;
    response
}
