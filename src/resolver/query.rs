//! GraphQL documents and wire types for the Orion index
//!
//! Every nested field is optional on the wire; absent or `null` lists are
//! read as empty.

use serde::{Deserialize, Serialize};

pub const VIDEO_ASSETS_QUERY: &str = r"
query GetVideoAssets($id: String!) {
  videos(where: {id_eq: $id}) {
    media {
      resolvedUrls
      storageBag {
        id
      }
    }
    thumbnailPhoto {
      resolvedUrls
      storageBag {
        id
      }
    }
  }
}
";

pub const CHANNEL_ASSETS_QUERY: &str = r"
query GetChannelAssets($id: String!) {
  channels(where: {id_eq: $id}) {
    avatarPhoto {
      resolvedUrls
      storageBag {
        id
      }
    }
    coverPhoto {
      resolvedUrls
      storageBag {
        id
      }
    }
  }
}
";

#[derive(Debug, Serialize)]
pub struct GraphQlRequest<'a> {
    pub query: &'static str,
    pub variables: IdVariables<'a>,
}

#[derive(Debug, Serialize)]
pub struct IdVariables<'a> {
    pub id: &'a str,
}

#[derive(Debug, Deserialize)]
pub struct GraphQlResponse<T> {
    pub data: Option<T>,
    pub errors: Option<Vec<GraphQlError>>,
}

#[derive(Debug, Deserialize)]
pub struct GraphQlError {
    pub message: String,
}

/// A data object with resolved locations, such as a media file or photo
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StorageAsset {
    pub resolved_urls: Option<Vec<String>>,
}

/// Resolved URLs of an optional asset; missing anywhere means none
pub fn urls_of(asset: Option<StorageAsset>) -> Vec<String> {
    asset.and_then(|a| a.resolved_urls).unwrap_or_default()
}

#[derive(Debug, Deserialize)]
pub struct VideosData {
    pub videos: Option<Vec<VideoNode>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoNode {
    pub media: Option<StorageAsset>,
    pub thumbnail_photo: Option<StorageAsset>,
}

#[derive(Debug, Deserialize)]
pub struct ChannelsData {
    pub channels: Option<Vec<ChannelNode>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChannelNode {
    pub avatar_photo: Option<StorageAsset>,
    pub cover_photo: Option<StorageAsset>,
}
