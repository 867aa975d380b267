//! Local stand-in for the Infomaniak API.
//!
//! Binds an axum server on `127.0.0.1:0` that records every request and
//! answers all of them with one canned reply.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{header, HeaderMap, HeaderName, Method, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::Router;
use infomaniak_api::{ClientConfig, InfomaniakClient};
use tokio::task::JoinHandle;

/// What the mock API saw.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: String,
    pub path: String,
    pub authorization: Option<String>,
    pub content_type: Option<String>,
    pub body: Vec<u8>,
}

#[derive(Clone)]
enum Reply {
    Body { status: StatusCode, body: String },
    Hang,
}

#[derive(Clone)]
struct Shared {
    reply: Reply,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

pub struct MockApi {
    base_url: String,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
    server: JoinHandle<()>,
}

impl MockApi {
    /// Answers every request with `status` and `body` serialised as JSON.
    pub async fn json(status: u16, body: serde_json::Value) -> Self {
        Self::raw(status, &body.to_string()).await
    }

    /// Answers every request with `status` and `body` verbatim.
    pub async fn raw(status: u16, body: &str) -> Self {
        Self::start(Reply::Body {
            status: StatusCode::from_u16(status).expect("valid status code"),
            body: body.to_owned(),
        })
        .await
    }

    /// Accepts requests but never answers them.
    pub async fn hanging() -> Self {
        Self::start(Reply::Hang).await
    }

    async fn start(reply: Reply) -> Self {
        let requests = Arc::new(Mutex::new(Vec::new()));
        let app = Router::new().fallback(record_and_reply).with_state(Shared {
            reply,
            requests: Arc::clone(&requests),
        });

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind mock API");
        let addr = listener.local_addr().expect("mock API address");
        let server = tokio::spawn(async move {
            axum::serve(listener, app).await.expect("mock API server");
        });

        Self {
            base_url: format!("http://{addr}"),
            requests,
            server,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// A client pointed at this server, authenticated with token `tok`.
    pub fn client(&self) -> InfomaniakClient {
        self.client_with(ClientConfig::new("tok"))
    }

    /// A client built from `config`, with the base URL replaced by this server's.
    pub fn client_with(&self, config: ClientConfig) -> InfomaniakClient {
        InfomaniakClient::new(config.with_base_url(self.base_url.clone()))
            .expect("client should build")
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().expect("request log").clone()
    }

    /// The only request received; fails the test if there was not exactly one.
    pub fn single_request(&self) -> RecordedRequest {
        let mut requests = self.requests();
        assert_eq!(requests.len(), 1, "expected exactly one request, got {requests:?}");
        requests.remove(0)
    }
}

impl Drop for MockApi {
    fn drop(&mut self) {
        self.server.abort();
    }
}

async fn record_and_reply(
    State(shared): State<Shared>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let header_value = |name: HeaderName| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::to_owned)
    };
    let recorded = RecordedRequest {
        method: method.to_string(),
        path: uri.path().to_owned(),
        authorization: header_value(header::AUTHORIZATION),
        content_type: header_value(header::CONTENT_TYPE),
        body: body.to_vec(),
    };
    shared.requests.lock().expect("request log").push(recorded);

    match shared.reply {
        Reply::Body { status, body } => {
            (status, [(header::CONTENT_TYPE, "application/json")], body).into_response()
        }
        Reply::Hang => {
            tokio::time::sleep(Duration::from_secs(3600)).await;
            StatusCode::GATEWAY_TIMEOUT.into_response()
        }
    }
}

/// An address nothing listens on.
pub fn closed_base_url() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind probe socket");
    let addr = listener.local_addr().expect("probe address");
    drop(listener);
    format!("http://{addr}")
}
