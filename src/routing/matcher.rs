//! Route matching module
//!
//! Maps method + path onto one of the proxy endpoints, capturing the id
//! segment. Only `GET` routes exist.

use hyper::Method;

/// Every endpoint the proxy serves
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    Video,
    VideoThumbnail,
    VideoMedia,
    Channel,
    ChannelAvatar,
    ChannelCover,
}

impl Endpoint {
    fn from_segments(entity: &str, asset: Option<&str>) -> Option<Self> {
        match (entity, asset) {
            ("video", None) => Some(Self::Video),
            ("video", Some("thumbnail")) => Some(Self::VideoThumbnail),
            ("video", Some("media")) => Some(Self::VideoMedia),
            ("channel", None) => Some(Self::Channel),
            ("channel", Some("avatar")) => Some(Self::ChannelAvatar),
            ("channel", Some("cover")) => Some(Self::ChannelCover),
            _ => None,
        }
    }

    /// Body of the 400 returned for a malformed id
    pub const fn invalid_id_message(self) -> &'static str {
        match self {
            Self::Video | Self::VideoThumbnail | Self::VideoMedia => "Invalid video id",
            Self::Channel | Self::ChannelAvatar | Self::ChannelCover => "Invalid channel id",
        }
    }
}

/// A matched route; `id` is the raw path segment, not yet validated
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RouteMatch<'a> {
    pub endpoint: Endpoint,
    pub id: &'a str,
}

/// Find the endpoint for a request, tolerating trailing slashes
pub fn match_route<'a>(method: &Method, path: &'a str) -> Option<RouteMatch<'a>> {
    if method != Method::GET {
        return None;
    }

    let trimmed = path.trim_end_matches('/');
    let mut segments = trimmed.strip_prefix('/')?.split('/');

    let entity = segments.next()?;
    let id = segments.next()?;
    let asset = segments.next();
    if segments.next().is_some() {
        return None;
    }

    Endpoint::from_segments(entity, asset).map(|endpoint| RouteMatch { endpoint, id })
}

/// Whether a path id reads as a number in the numeric-string grammar used
/// by JavaScript `Number()`: decimals with sign and exponent, `Infinity`,
/// and unsigned `0x`/`0o`/`0b` literals. Blank ids are rejected.
pub fn is_numeric_id(id: &str) -> bool {
    let trimmed = id.trim();
    if let Some((radix, digits)) = radix_literal(trimmed) {
        return !digits.is_empty() && digits.chars().all(|c| c.is_digit(radix));
    }

    let unsigned = trimmed.strip_prefix(&['+', '-'][..]).unwrap_or(trimmed);
    if unsigned == "Infinity" {
        return true;
    }
    // f64 parsing alone would also take `inf` and `nan`
    !unsigned.is_empty()
        && unsigned
            .bytes()
            .all(|b| b.is_ascii_digit() || matches!(b, b'.' | b'e' | b'E' | b'+' | b'-'))
        && trimmed.parse::<f64>().is_ok()
}

fn radix_literal(s: &str) -> Option<(u32, &str)> {
    let radix = match s.get(..2)? {
        "0x" | "0X" => 16,
        "0o" | "0O" => 8,
        "0b" | "0B" => 2,
        _ => return None,
    };
    Some((radix, s.get(2..)?))
}
