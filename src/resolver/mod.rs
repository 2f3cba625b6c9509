//! Asset URL resolver
//!
//! One GraphQL round trip per lookup. The outcome is either the normalized
//! URL lists or a response that is ready to hand back to the caller:
//! - non-2xx, transport or decode failure: 500 `Unexpected error`
//! - no matching entity: 404 `<Entity> not found`

mod query;

use std::time::Duration;

use hyper::Response;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::config::AppState;
use crate::error::UpstreamError;
use crate::geo::{GeoHint, CLIENT_LOC_HEADER};
use crate::http::{build_404_response, build_500_response, ProxyBody};
use crate::logger;
use query::{
    urls_of, ChannelsData, GraphQlRequest, GraphQlResponse, IdVariables, VideosData,
    CHANNEL_ASSETS_QUERY, VIDEO_ASSETS_QUERY,
};

/// Lookup outcome: the assets, or the error response to return as is
pub type Lookup<T> = Result<T, Response<ProxyBody>>;

/// URLs of a video's assets, in upstream order; the first entry is canonical
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoAssets {
    pub video_urls: Vec<String>,
    pub thumbnail_urls: Vec<String>,
}

/// URLs of a channel's assets, in upstream order; the first entry is canonical
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChannelAssets {
    pub avatar_urls: Vec<String>,
    pub cover_urls: Vec<String>,
}

/// An entity kind the index can be asked about
pub trait AssetQuery {
    const QUERY: &'static str;
    const NOT_FOUND: &'static str;

    type Data: DeserializeOwned;
    type Assets: Serialize;

    /// Normalize the first matching entity, if any
    fn first(data: Self::Data) -> Option<Self::Assets>;
}

pub struct VideoQuery;

impl AssetQuery for VideoQuery {
    const QUERY: &'static str = VIDEO_ASSETS_QUERY;
    const NOT_FOUND: &'static str = "Video not found";

    type Data = VideosData;
    type Assets = VideoAssets;

    fn first(data: VideosData) -> Option<VideoAssets> {
        let video = data.videos?.into_iter().next()?;
        Some(VideoAssets {
            video_urls: urls_of(video.media),
            thumbnail_urls: urls_of(video.thumbnail_photo),
        })
    }
}

pub struct ChannelQuery;

impl AssetQuery for ChannelQuery {
    const QUERY: &'static str = CHANNEL_ASSETS_QUERY;
    const NOT_FOUND: &'static str = "Channel not found";

    type Data = ChannelsData;
    type Assets = ChannelAssets;

    fn first(data: ChannelsData) -> Option<ChannelAssets> {
        let channel = data.channels?.into_iter().next()?;
        Some(ChannelAssets {
            avatar_urls: urls_of(channel.avatar_photo),
            cover_urls: urls_of(channel.cover_photo),
        })
    }
}

#[allow(clippy::result_large_err)]
pub async fn lookup_video(
    state: &AppState,
    id: &str,
    geo: Option<&GeoHint>,
) -> Lookup<VideoAssets> {
    lookup::<VideoQuery>(state, id, geo).await
}

#[allow(clippy::result_large_err)]
pub async fn lookup_channel(
    state: &AppState,
    id: &str,
    geo: Option<&GeoHint>,
) -> Lookup<ChannelAssets> {
    lookup::<ChannelQuery>(state, id, geo).await
}

#[allow(clippy::result_large_err)]
async fn lookup<Q: AssetQuery>(state: &AppState, id: &str, geo: Option<&GeoHint>) -> Lookup<Q::Assets> {
    match query_index::<Q>(state, id, geo).await {
        Ok(data) => data.and_then(Q::first).ok_or_else(|| build_404_response(Q::NOT_FOUND)),
        Err(e) => {
            logger::log_upstream_error(&e);
            Err(build_500_response())
        }
    }
}

/// POST the query and decode the `data` member
async fn query_index<Q: AssetQuery>(
    state: &AppState,
    id: &str,
    geo: Option<&GeoHint>,
) -> Result<Option<Q::Data>, UpstreamError> {
    let url = state.config.upstream.graphql_url.as_str();
    let body = GraphQlRequest {
        query: Q::QUERY,
        variables: IdVariables { id },
    };

    let mut request = state
        .client
        .post(url)
        .timeout(Duration::from_secs(state.config.upstream.timeout_secs))
        .json(&body);
    if let Some(value) = geo.and_then(GeoHint::header_value) {
        request = request.header(CLIENT_LOC_HEADER, value);
    }

    tracing::debug!(%url, id, geo = ?geo, "querying index");
    let response = request.send().await.map_err(|source| UpstreamError::Transport {
        url: url.to_string(),
        source,
    })?;

    let status = response.status();
    if !status.is_success() {
        return Err(UpstreamError::Status {
            url: url.to_string(),
            status,
        });
    }

    let parsed: GraphQlResponse<Q::Data> =
        response.json().await.map_err(|source| UpstreamError::Decode {
            url: url.to_string(),
            source,
        })?;

    if let Some(errors) = parsed.errors.as_deref().filter(|e| !e.is_empty()) {
        let messages: Vec<&str> = errors.iter().map(|e| e.message.as_str()).collect();
        logger::log_warning(&format!("Index reported errors for id {id}: {}", messages.join("; ")));
    }

    Ok(parsed.data)
}
