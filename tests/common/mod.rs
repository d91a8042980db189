#![allow(dead_code)]

use axum::{
    Json, Router,
    body::{Body, to_bytes},
    extract::State,
    http::{HeaderMap, Request, StatusCode},
    response::Response,
    routing::post,
};
use metagate::{MetaClient, MetaState, meta_router};
use serde_json::Value;
use std::sync::{Arc, Mutex};
use tokio::net::TcpListener;
use url::Url;

pub const AUTH_KEY: &str = "pwd";
pub const ADMIN_SECRET: &str = "admin-secret";

#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub query: String,
    pub admin_secret: Option<String>,
}

type Responder = Arc<dyn Fn(&str) -> (StatusCode, Value) + Send + Sync>;

#[derive(Clone)]
struct MockState {
    calls: Arc<Mutex<Vec<RecordedCall>>>,
    responder: Responder,
}

/// GraphQL stand-in bound to an ephemeral local port.
pub struct MockBackend {
    pub endpoint: Url,
    calls: Arc<Mutex<Vec<RecordedCall>>>,
}

impl MockBackend {
    pub async fn spawn<F>(responder: F) -> Self
    where
        F: Fn(&str) -> (StatusCode, Value) + Send + Sync + 'static,
    {
        let calls = Arc::new(Mutex::new(Vec::new()));
        let state = MockState {
            calls: calls.clone(),
            responder: Arc::new(responder),
        };

        let app = Router::new()
            .route("/v1/graphql", post(graphql))
            .with_state(state);

        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind mock backend");
        let addr = listener.local_addr().expect("mock backend has no address");
        tokio::spawn(async move {
            axum::serve(listener, app)
                .await
                .expect("mock backend crashed");
        });

        Self {
            endpoint: Url::parse(&format!("http://{addr}/v1/graphql")).expect("invalid url"),
            calls,
        }
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().expect("poisoned").clone()
    }
}

async fn graphql(
    State(state): State<MockState>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    let query = body
        .get("query")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();
    let admin_secret = headers
        .get("x-hasura-admin-secret")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);

    let (status, resp) = (state.responder)(&query);
    state
        .calls
        .lock()
        .expect("poisoned")
        .push(RecordedCall {
            query,
            admin_secret,
        });
    (status, Json(resp))
}

pub fn app_with_endpoint(endpoint: Url) -> Router {
    let client = MetaClient::new(reqwest::Client::new(), endpoint, Arc::from(ADMIN_SECRET));
    meta_router(MetaState::new(client, Arc::from(AUTH_KEY)))
}

/// App whose backend is never expected to be reached.
pub fn offline_app() -> Router {
    app_with_endpoint(Url::parse("http://127.0.0.1:9/v1/graphql").expect("invalid url"))
}

pub fn post_json(body: impl Into<String>, key: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri("/")
        .header("content-type", "application/json");
    if let Some(key) = key {
        builder = builder.header("key", key);
    }
    builder
        .body(Body::from(body.into()))
        .expect("failed to build request")
}

pub async fn body_json(resp: Response) -> Value {
    let body = to_bytes(resp.into_body(), usize::MAX)
        .await
        .expect("failed to read response body");
    serde_json::from_slice(&body).expect("response body was not JSON")
}

pub async fn body_string(resp: Response) -> String {
    let body = to_bytes(resp.into_body(), usize::MAX)
        .await
        .expect("failed to read response body");
    String::from_utf8(body.to_vec()).expect("response body was not utf-8")
}
