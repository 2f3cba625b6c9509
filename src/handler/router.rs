//! Request routing dispatch module
//!
//! Entry point for HTTP request processing: route matching, id validation,
//! lookup and response, then access logging.

use std::convert::Infallible;
use std::net::SocketAddr;
use std::time::Instant;

use hyper::header::HeaderMap;
use hyper::http::request::Parts;
use hyper::{Request, Response};

use crate::config::AppState;
use crate::geo::GeoHint;
use crate::handler::assets::{self, AssetKind};
use crate::http::{build_400_response, build_json_response, build_not_found_response, ProxyBody};
use crate::logger::{self, AccessLogEntry};
use crate::resolver::{lookup_channel, lookup_video, Lookup};
use crate::routing::{self, Endpoint, RouteMatch};

/// Main entry point for HTTP request handling
pub async fn handle_request<B>(
    req: Request<B>,
    state: &AppState,
    peer_addr: SocketAddr,
) -> Result<Response<ProxyBody>, Infallible> {
    let started = Instant::now();
    // Only GET routes exist, so the body is never read
    let (parts, _body) = req.into_parts();
    let response = route_request(&parts, state).await;

    if state.config.logging.access_log {
        log_access(&parts, &response, peer_addr, started, state);
    }
    Ok(response)
}

async fn route_request(req: &Parts, state: &AppState) -> Response<ProxyBody> {
    let Some(route) = routing::match_route(&req.method, req.uri.path()) else {
        return build_not_found_response();
    };

    if !routing::is_numeric_id(route.id) {
        return build_400_response(route.endpoint.invalid_id_message());
    }

    let geo = GeoHint::from_headers(&req.headers, &state.config.geo);
    dispatch(route, state, &req.headers, geo.as_ref())
        .await
        .unwrap_or_else(|error_response| error_response)
}

/// Run the lookup for a validated route; lookup failures short-circuit with `?`
#[allow(clippy::result_large_err)]
async fn dispatch(
    route: RouteMatch<'_>,
    state: &AppState,
    inbound: &HeaderMap,
    geo: Option<&GeoHint>,
) -> Lookup<Response<ProxyBody>> {
    let id = route.id;
    let response = match route.endpoint {
        Endpoint::Video => build_json_response(&lookup_video(state, id, geo).await?),
        Endpoint::VideoThumbnail => {
            let video = lookup_video(state, id, geo).await?;
            assets::serve_first(state, &video.thumbnail_urls, AssetKind::Thumbnail, inbound).await
        }
        Endpoint::VideoMedia => {
            let video = lookup_video(state, id, geo).await?;
            assets::serve_first(state, &video.video_urls, AssetKind::Media, inbound).await
        }
        Endpoint::Channel => build_json_response(&lookup_channel(state, id, geo).await?),
        Endpoint::ChannelAvatar => {
            let channel = lookup_channel(state, id, geo).await?;
            assets::serve_first(state, &channel.avatar_urls, AssetKind::Avatar, inbound).await
        }
        Endpoint::ChannelCover => {
            let channel = lookup_channel(state, id, geo).await?;
            assets::serve_first(state, &channel.cover_urls, AssetKind::Cover, inbound).await
        }
    };
    Ok(response)
}

fn log_access(
    req: &Parts,
    response: &Response<ProxyBody>,
    peer_addr: SocketAddr,
    started: Instant,
    state: &AppState,
) {
    let header = |headers: &HeaderMap, name: &str| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(ToString::to_string)
    };

    let mut entry = AccessLogEntry::new(
        peer_addr.ip().to_string(),
        req.method.to_string(),
        req.uri.path().to_string(),
    );
    entry.query = req.uri.query().map(ToString::to_string);
    entry.http_version = format!("{:?}", req.version)
        .trim_start_matches("HTTP/")
        .to_string();
    entry.status = response.status().as_u16();
    entry.body_bytes = header(response.headers(), "content-length").and_then(|v| v.parse().ok());
    entry.referer = header(&req.headers, "referer");
    entry.user_agent = header(&req.headers, "user-agent");
    entry.request_time_us = u64::try_from(started.elapsed().as_micros()).unwrap_or(u64::MAX);

    logger::log_access(&entry, &state.config.logging.access_log_format);
}
