//! Header filtering for pass-through fetches
//!
//! Inbound request headers are replayed against the asset host so that
//! conditional and range requests keep working. Headers scoped to a single
//! hop, plus `Host`, never cross the proxy.

use hyper::header::{self, HeaderMap, HeaderName};

/// Hop-by-hop headers (RFC 9110 section 7.6.1)
static HOP_BY_HOP: [HeaderName; 7] = [
    header::CONNECTION,
    header::PROXY_AUTHENTICATE,
    header::PROXY_AUTHORIZATION,
    header::TE,
    header::TRAILER,
    header::TRANSFER_ENCODING,
    header::UPGRADE,
];

fn is_hop_by_hop(name: &HeaderName, connection_tokens: &[String]) -> bool {
    HOP_BY_HOP.contains(name)
        || name.as_str() == "keep-alive"
        || connection_tokens.iter().any(|t| t == name.as_str())
}

/// Header names listed in `Connection`, lowercased
fn connection_tokens(headers: &HeaderMap) -> Vec<String> {
    headers
        .get_all(header::CONNECTION)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(','))
        .map(|t| t.trim().to_ascii_lowercase())
        .filter(|t| !t.is_empty())
        .collect()
}

/// Copy of `inbound` suitable for an outbound request to another origin
pub fn forwardable_headers(inbound: &HeaderMap) -> HeaderMap {
    let tokens = connection_tokens(inbound);
    let mut out = HeaderMap::with_capacity(inbound.len());
    for (name, value) in inbound {
        if name == header::HOST || name == header::CONTENT_LENGTH || is_hop_by_hop(name, &tokens) {
            continue;
        }
        out.append(name.clone(), value.clone());
    }
    out
}

/// Drop hop-by-hop headers from an upstream response before relaying it
pub fn strip_hop_by_hop(headers: &mut HeaderMap) {
    let tokens = connection_tokens(headers);
    let doomed: Vec<HeaderName> = headers
        .keys()
        .filter(|name| is_hop_by_hop(name, &tokens))
        .cloned()
        .collect();
    for name in doomed {
        headers.remove(name);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hyper::header::HeaderValue;

    fn headers(pairs: &[(&'static str, &'static str)]) -> HeaderMap {
        let mut map = HeaderMap::new();
        for (name, value) in pairs {
            map.append(*name, HeaderValue::from_static(*value));
        }
        map
    }

    #[test]
    fn test_forwards_conditional_and_range_headers() {
        let inbound = headers(&[
            ("host", "proxy.example"),
            ("range", "bytes=0-99"),
            ("if-none-match", "\"abc\""),
            ("user-agent", "curl/8"),
            ("connection", "keep-alive"),
            ("keep-alive", "timeout=5"),
        ]);
        let out = forwardable_headers(&inbound);
        assert_eq!(out["range"], "bytes=0-99");
        assert_eq!(out["if-none-match"], "\"abc\"");
        assert_eq!(out["user-agent"], "curl/8");
        assert!(!out.contains_key("host"));
        assert!(!out.contains_key("connection"));
        assert!(!out.contains_key("keep-alive"));
    }

    #[test]
    fn test_connection_listed_headers_are_dropped() {
        let inbound = headers(&[("connection", "close, X-Trace"), ("x-trace", "1"), ("accept", "*/*")]);
        let out = forwardable_headers(&inbound);
        assert!(!out.contains_key("x-trace"));
        assert_eq!(out["accept"], "*/*");
    }

    #[test]
    fn test_repeated_headers_survive() {
        let inbound = headers(&[("accept-language", "en"), ("accept-language", "pl")]);
        let out = forwardable_headers(&inbound);
        assert_eq!(out.get_all("accept-language").iter().count(), 2);
    }

    #[test]
    fn test_strip_hop_by_hop_response() {
        let mut resp = headers(&[
            ("content-type", "image/webp"),
            ("content-range", "bytes 0-99/1000"),
            ("transfer-encoding", "chunked"),
            ("connection", "keep-alive"),
        ]);
        strip_hop_by_hop(&mut resp);
        assert_eq!(resp["content-type"], "image/webp");
        assert_eq!(resp["content-range"], "bytes 0-99/1000");
        assert!(!resp.contains_key("transfer-encoding"));
        assert!(!resp.contains_key("connection"));
    }
}
