//! In-process stand-in for the remote API.

#![allow(dead_code)]

use std::{
    collections::HashMap,
    net::SocketAddr,
    sync::{Arc, Mutex},
};

use axum::{
    Router,
    body::to_bytes,
    extract::{Request, State},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use client::{ApiClient, MemoryStorage, SessionStore};
use serde_json::Value;
use shared::models::SessionUser;
use url::Url;

/// A request the mock server received.
#[derive(Debug, Clone)]
pub struct Recorded {
    pub method: String,
    pub path: String,
    pub authorization: Option<String>,
    pub content_type: Option<String>,
    pub body: Vec<u8>,
}

impl Recorded {
    pub fn json(&self) -> Value {
        serde_json::from_slice(&self.body).expect("request body is JSON")
    }

    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

#[derive(Debug, Default)]
pub struct MockState {
    replies: Mutex<HashMap<String, (StatusCode, String)>>,
    requests: Mutex<Vec<Recorded>>,
}

pub struct MockApi {
    pub addr: SocketAddr,
    pub base: Url,
    state: Arc<MockState>,
}

impl MockApi {
    pub async fn spawn() -> Self {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind mock api");
        let addr = listener.local_addr().expect("mock api address");
        let state = Arc::new(MockState::default());
        let app = Router::new().fallback(respond).with_state(state.clone());
        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("mock api server");
        });

        Self {
            addr,
            base: Url::parse(&format!("http://{addr}")).expect("mock api url"),
            state,
        }
    }

    /// Answer `route` (e.g. `"GET /api/profile"`) with `body` as JSON.
    pub fn reply(&self, route: &str, status: StatusCode, body: Value) {
        self.reply_raw(route, status, body.to_string());
    }

    pub fn reply_raw(&self, route: &str, status: StatusCode, body: impl Into<String>) {
        self.state
            .replies
            .lock()
            .unwrap()
            .insert(route.to_string(), (status, body.into()));
    }

    pub fn requests(&self) -> Vec<Recorded> {
        self.state.requests.lock().unwrap().clone()
    }

    pub fn last_request(&self) -> Recorded {
        self.requests().pop().expect("a request was made")
    }

    /// A gateway over a fresh in-memory session.
    pub fn client(&self) -> ApiClient {
        let session = SessionStore::initialize(Arc::new(MemoryStorage::new()));
        ApiClient::new(self.base.clone(), session).expect("api client")
    }

    /// A gateway whose session is already signed in with `token`.
    pub fn signed_in_client(&self, token: &str) -> ApiClient {
        let api = self.client();
        api.session().establish(user(), token).expect("establish session");
        api
    }
}

pub fn user() -> SessionUser {
    SessionUser {
        id: 7,
        username: "ada".to_string(),
        email: "ada@example.com".to_string(),
    }
}

/// A base URL nothing is listening on.
pub async fn unreachable_base() -> Url {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind free port");
    let addr = listener.local_addr().expect("free port address");
    drop(listener);
    Url::parse(&format!("http://{addr}")).expect("unreachable url")
}

async fn respond(State(state): State<Arc<MockState>>, request: Request) -> Response {
    let (parts, body) = request.into_parts();
    let body = to_bytes(body, usize::MAX).await.unwrap_or_default();
    let header_text = |name: header::HeaderName| {
        parts
            .headers
            .get(name)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string)
    };

    let recorded = Recorded {
        method: parts.method.to_string(),
        path: parts.uri.path().to_string(),
        authorization: header_text(header::AUTHORIZATION),
        content_type: header_text(header::CONTENT_TYPE),
        body: body.to_vec(),
    };
    let route = format!("{} {}", recorded.method, recorded.path);
    state.requests.lock().unwrap().push(recorded);

    let reply = state.replies.lock().unwrap().get(&route).cloned();
    match reply {
        Some((status, body)) => (
            status,
            [(header::CONTENT_TYPE, "application/json")],
            body,
        )
            .into_response(),
        None => (StatusCode::NOT_FOUND, format!("no reply configured for {route}")).into_response(),
    }
}
