//! In-process upstream for handler tests
//!
//! Serves canned replies by exact path on `127.0.0.1:0` and records every
//! request it sees. `{base}` in a reply body is replaced with the server's
//! own base URL so GraphQL replies can point asset URLs back at it.
//! Replies can be held back before the headers or dripped out a byte at a time.

use std::collections::HashMap;
use std::convert::Infallible;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use futures_util::stream;
use http_body_util::combinators::UnsyncBoxBody;
use http_body_util::{BodyExt, Full, StreamBody};
use hyper::body::{Bytes, Frame, Incoming};
use hyper::header::HeaderMap;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper::{Request, Response, StatusCode};
use hyper_util::rt::TokioIo;
use tokio::net::TcpListener;

#[derive(Debug, Clone)]
pub struct SeenRequest {
    pub method: String,
    pub path: String,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl SeenRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }
}

#[derive(Debug, Clone)]
pub struct MockReply {
    pub status: StatusCode,
    pub headers: Vec<(&'static str, String)>,
    pub body: String,
    /// Wait before sending the headers
    pub delay: Duration,
    /// Send the body one byte per interval
    pub drip: Option<Duration>,
}

impl MockReply {
    pub fn json(value: &serde_json::Value) -> Self {
        Self::text(StatusCode::OK, &value.to_string()).with_header("content-type", "application/json")
    }

    pub fn text(status: StatusCode, body: &str) -> Self {
        Self {
            status,
            headers: Vec::new(),
            body: body.to_string(),
            delay: Duration::ZERO,
            drip: None,
        }
    }

    pub fn with_header(mut self, name: &'static str, value: &str) -> Self {
        self.headers.push((name, value.to_string()));
        self
    }

    pub fn delayed(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn dripped(mut self, interval: Duration) -> Self {
        self.drip = Some(interval);
        self
    }
}

pub struct MockUpstream {
    base: String,
    seen: Arc<Mutex<Vec<SeenRequest>>>,
}

impl MockUpstream {
    pub async fn start(routes: Vec<(&'static str, MockReply)>) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let base = format!("http://{}", listener.local_addr().unwrap());
        let seen = Arc::new(Mutex::new(Vec::new()));
        let routes: Arc<HashMap<&'static str, MockReply>> = Arc::new(routes.into_iter().collect());

        let server_base = base.clone();
        let server_seen = Arc::clone(&seen);
        tokio::spawn(async move {
            while let Ok((stream, _)) = listener.accept().await {
                let routes = Arc::clone(&routes);
                let seen = Arc::clone(&server_seen);
                let base = server_base.clone();
                tokio::spawn(async move {
                    let service = service_fn(move |req: Request<Incoming>| {
                        let routes = Arc::clone(&routes);
                        let seen = Arc::clone(&seen);
                        let base = base.clone();
                        async move { Ok::<_, Infallible>(reply(req, &routes, &seen, &base).await) }
                    });
                    let _ = http1::Builder::new()
                        .serve_connection(TokioIo::new(stream), service)
                        .await;
                });
            }
        });

        Self { base, seen }
    }

    /// Answer the GraphQL endpoint with `value`
    pub async fn graphql(value: serde_json::Value) -> Self {
        Self::start(vec![("/graphql", MockReply::json(&value))]).await
    }

    /// Answer the GraphQL endpoint with a bare status
    pub async fn status(status: StatusCode) -> Self {
        Self::text(status, "").await
    }

    pub async fn text(status: StatusCode, body: &str) -> Self {
        Self::start(vec![("/graphql", MockReply::text(status, body))]).await
    }

    pub fn graphql_url(&self) -> String {
        format!("{}/graphql", self.base)
    }

    pub fn requests(&self) -> Vec<SeenRequest> {
        self.seen.lock().unwrap().clone()
    }

    pub fn requests_to(&self, path: &str) -> Vec<SeenRequest> {
        self.requests().into_iter().filter(|r| r.path == path).collect()
    }
}

async fn reply(
    req: Request<Incoming>,
    routes: &HashMap<&'static str, MockReply>,
    seen: &Mutex<Vec<SeenRequest>>,
    base: &str,
) -> Response<MockBody> {
    let (parts, body) = req.into_parts();
    let body = body.collect().await.map(|b| b.to_bytes()).unwrap_or_default();
    let path = parts.uri.path().to_string();
    seen.lock().unwrap().push(SeenRequest {
        method: parts.method.to_string(),
        path: path.clone(),
        headers: parts.headers,
        body,
    });

    let Some(canned) = routes.get(path.as_str()) else {
        return Response::builder()
            .status(StatusCode::NOT_FOUND)
            .body(Full::new(Bytes::from_static(b"mock: no route")).boxed_unsync())
            .unwrap();
    };

    if !canned.delay.is_zero() {
        tokio::time::sleep(canned.delay).await;
    }

    let mut builder = Response::builder().status(canned.status);
    for (name, value) in &canned.headers {
        builder = builder.header(*name, value.as_str());
    }
    builder.body(body_of(canned, base)).unwrap()
}

type MockBody = UnsyncBoxBody<Bytes, Infallible>;

fn body_of(canned: &MockReply, base: &str) -> MockBody {
    let bytes = Bytes::from(canned.body.replace("{base}", base));
    let Some(interval) = canned.drip else {
        return Full::new(bytes).boxed_unsync();
    };

    let frames = stream::unfold(bytes, move |mut rest| async move {
        if rest.is_empty() {
            return None;
        }
        tokio::time::sleep(interval).await;
        let chunk = rest.split_to(1);
        Some((Ok::<_, Infallible>(Frame::data(chunk)), rest))
    });
    StreamBody::new(frames).boxed_unsync()
}
