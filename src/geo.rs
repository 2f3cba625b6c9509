//! Caller location hint
//!
//! The edge in front of the proxy stamps each request with the visitor's
//! approximate coordinates. The resolver forwards them to the index as
//! `X-Client-Loc` so resolved URLs favour a nearby storage node.
//! Without both coordinates the header is left off the lookup entirely.

use hyper::header::{HeaderMap, HeaderValue};

use crate::config::GeoConfig;

pub const CLIENT_LOC_HEADER: &str = "x-client-loc";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeoHint {
    pub latitude: String,
    pub longitude: String,
}

impl GeoHint {
    /// Read the hint from inbound headers; `None` unless both coordinates are present
    pub fn from_headers(headers: &HeaderMap, config: &GeoConfig) -> Option<Self> {
        let read = |name: &str| -> Option<String> {
            let value = headers.get(name)?.to_str().ok()?.trim();
            (!value.is_empty()).then(|| value.to_string())
        };

        Some(Self {
            latitude: read(&config.latitude_header)?,
            longitude: read(&config.longitude_header)?,
        })
    }

    /// Value of the `X-Client-Loc` header: `"<lat>, <lng>"`
    pub fn header_value(&self) -> Option<HeaderValue> {
        HeaderValue::from_str(&format!("{}, {}", self.latitude, self.longitude)).ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn geo_config() -> GeoConfig {
        GeoConfig {
            latitude_header: "cf-iplatitude".to_string(),
            longitude_header: "cf-iplongitude".to_string(),
        }
    }

    #[test]
    fn test_from_headers() {
        let mut headers = HeaderMap::new();
        headers.insert("cf-iplatitude", HeaderValue::from_static("52.22977"));
        headers.insert("cf-iplongitude", HeaderValue::from_static(" 21.01178 "));

        let hint = GeoHint::from_headers(&headers, &geo_config()).unwrap();
        assert_eq!(hint.latitude, "52.22977");
        assert_eq!(hint.longitude, "21.01178");
        assert_eq!(hint.header_value().unwrap(), "52.22977, 21.01178");
    }

    #[test]
    fn test_missing_coordinate() {
        let mut headers = HeaderMap::new();
        headers.insert("cf-iplatitude", HeaderValue::from_static("52.22977"));
        assert!(GeoHint::from_headers(&headers, &geo_config()).is_none());

        headers.insert("cf-iplongitude", HeaderValue::from_static(""));
        assert!(GeoHint::from_headers(&headers, &geo_config()).is_none());
    }
}
