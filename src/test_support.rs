//! In-process backend double for dispatcher and client tests.
//!
//! Serves scripted JSON replies keyed by method + path, records every
//! request it sees, and echoes text frames on `/api/live`.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::Router;
use axum::body::Bytes;
use axum::extract::State;
use axum::extract::ws::{Message, WebSocketUpgrade};
use axum::http::header::{CONTENT_TYPE, COOKIE, SET_COOKIE};
use axum::http::{HeaderMap, Method, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use serde_json::{Value, json};
use url::Url;

#[derive(Clone, Debug)]
pub struct Recorded {
    pub method: Method,
    pub path: String,
    pub query: Option<String>,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl Recorded {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    pub fn json(&self) -> Value {
        serde_json::from_slice(&self.body).expect("recorded body should be JSON")
    }
}

#[derive(Clone, Debug)]
pub struct Canned {
    status: StatusCode,
    body: Option<String>,
    set_cookie: Option<String>,
    require_cookie: Option<String>,
}

impl Canned {
    pub fn json(status: u16, body: Value) -> Self {
        Self::raw(status, &body.to_string())
    }

    pub fn data(body: Value) -> Self {
        Self::json(200, json!({ "code": 200, "data": body }))
    }

    pub fn raw(status: u16, body: &str) -> Self {
        Self {
            status: StatusCode::from_u16(status).expect("valid status"),
            body: Some(body.to_owned()),
            set_cookie: None,
            require_cookie: None,
        }
    }

    pub fn no_content() -> Self {
        Self { status: StatusCode::NO_CONTENT, body: None, set_cookie: None, require_cookie: None }
    }

    pub fn setting_cookie(mut self, cookie: &str) -> Self {
        self.set_cookie = Some(cookie.to_owned());
        self
    }

    /// Reply 401 unless the request carries `cookie` (as `name=value`).
    pub fn requiring_cookie(mut self, cookie: &str) -> Self {
        self.require_cookie = Some(cookie.to_owned());
        self
    }
}

#[derive(Clone, Default)]
struct Shared {
    routes: Arc<Mutex<HashMap<(Method, String), Canned>>>,
    recorded: Arc<Mutex<Vec<Recorded>>>,
}

pub struct TestServer {
    origin: Url,
    shared: Shared,
}

impl TestServer {
    pub async fn spawn() -> Self {
        let shared = Shared::default();
        let app = Router::new()
            .route("/api/live", get(live_echo))
            .fallback(scripted)
            .with_state(shared.clone());
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind test listener");
        let addr = listener.local_addr().expect("test listener addr");
        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("test server failed");
        });
        let origin = Url::parse(&format!("http://{addr}/")).expect("origin url");
        Self { origin, shared }
    }

    /// `http://127.0.0.1:PORT/api/`
    pub fn api_root(&self) -> Url {
        self.origin.join("api/").expect("api root")
    }

    pub fn reply(&self, method: Method, path: &str, canned: Canned) {
        self.shared
            .routes
            .lock()
            .expect("routes lock")
            .insert((method, path.to_owned()), canned);
    }

    pub fn requests(&self) -> Vec<Recorded> {
        self.shared.recorded.lock().expect("recorded lock").clone()
    }

    pub fn last_request(&self) -> Recorded {
        self.requests().pop().expect("at least one request")
    }
}

async fn scripted(State(shared): State<Shared>, method: Method, uri: Uri, headers: HeaderMap, body: Bytes) -> Response {
    let path = uri.path().to_owned();
    let canned = shared
        .routes
        .lock()
        .expect("routes lock")
        .get(&(method.clone(), path.clone()))
        .cloned();
    let cookies = headers
        .get(COOKIE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_owned();
    shared.recorded.lock().expect("recorded lock").push(Recorded {
        method,
        path,
        query: uri.query().map(ToOwned::to_owned),
        headers,
        body,
    });

    let Some(canned) = canned else {
        return json_response(StatusCode::NOT_FOUND, Some(json!({ "message": "not found", "code": 404 }).to_string()));
    };
    if let Some(required) = &canned.require_cookie {
        if !cookies.split("; ").any(|c| c == required) {
            return json_response(
                StatusCode::UNAUTHORIZED,
                Some(json!({ "message": "unauthorized", "code": 401 }).to_string()),
            );
        }
    }
    let mut response = json_response(canned.status, canned.body);
    if let Some(cookie) = canned.set_cookie {
        response
            .headers_mut()
            .insert(SET_COOKIE, cookie.parse().expect("cookie header"));
    }
    response
}

fn json_response(status: StatusCode, body: Option<String>) -> Response {
    match body {
        Some(body) => (status, [(CONTENT_TYPE, "application/json; charset=utf-8")], body).into_response(),
        None => status.into_response(),
    }
}

async fn live_echo(ws: WebSocketUpgrade) -> Response {
    ws.on_upgrade(|mut socket| async move {
        while let Some(Ok(message)) = socket.recv().await {
            if let Message::Text(text) = message {
                if socket.send(Message::Text(text)).await.is_err() {
                    break;
                }
            }
        }
    })
}
