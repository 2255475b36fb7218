//! # Mock Upstreams: in-process GitHub and OpenAI stand-ins
//!
//! Binds an axum router to `127.0.0.1:0` and serves a tiny, fixed view of the
//! GitHub REST API plus an OpenAI-compatible chat completions endpoint.
//!
//! | Method | Path                              | Behavior                                   |
//! |--------|-----------------------------------|--------------------------------------------|
//! | GET    | `/users/{login}`                  | `octocat` exists, anything else is 404     |
//! | GET    | `/search/users`                   | `denied@…` → 403, `mona@example.com` → hit |
//! | GET    | `/users/{login}/repos`            | `octocat` → fixed list, else 500           |
//! | GET    | `/repos/{owner}/{repo}/readme`    | `hello` has one, else 404                  |
//! | GET    | `/repos/{owner}/{repo}/contents`  | `hello` has three files and a dir, else 404|
//! | GET    | `/raw/{*path}`                    | raw text; paths containing `broken` → 500  |
//! | POST   | `/v1/chat/completions`            | echoes a canned completion                 |
//!
//! Every request's headers are recorded for assertions.

#![allow(dead_code)]

use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{Value, json};
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use tokio::net::TcpListener;

#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub path: String,
    pub query: HashMap<String, String>,
    pub user_agent: Option<String>,
    pub authorization: Option<String>,
    pub body: Option<Value>,
}

struct MockState {
    base_url: String,
    completion: Option<String>,
    requests: Mutex<Vec<RecordedRequest>>,
}

type Shared = Arc<MockState>;

pub struct MockUpstream {
    addr: SocketAddr,
    state: Shared,
}

impl MockUpstream {
    pub async fn start() -> Self {
        Self::start_with_completion(Some("Solid Rust portfolio.".to_string())).await
    }

    /// Start with a specific completion text (`None` returns an empty choice list)
    pub async fn start_with_completion(completion: Option<String>) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind mock upstream");
        let addr = listener.local_addr().expect("local addr");

        let state = Arc::new(MockState {
            base_url: format!("http://{}", addr),
            completion,
            requests: Mutex::new(Vec::new()),
        });

        let app = Router::new()
            .route("/users/{login}", get(get_user))
            .route("/users/{login}/repos", get(list_repos))
            .route("/search/users", get(search_users))
            .route("/repos/{owner}/{repo}/readme", get(readme))
            .route("/repos/{owner}/{repo}/contents", get(contents))
            .route("/raw/{*path}", get(raw))
            .route("/v1/chat/completions", post(chat))
            .with_state(Arc::clone(&state));

        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("mock upstream");
        });

        Self { addr, state }
    }

    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.state.requests.lock().unwrap().clone()
    }

    pub fn requests_to(&self, prefix: &str) -> Vec<RecordedRequest> {
        self.requests()
            .into_iter()
            .filter(|r| r.path.starts_with(prefix))
            .collect()
    }
}

fn record(
    state: &MockState,
    path: String,
    query: HashMap<String, String>,
    headers: &HeaderMap,
    body: Option<Value>,
) {
    let header = |name: &str| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
    };
    state.requests.lock().unwrap().push(RecordedRequest {
        path,
        query,
        user_agent: header("user-agent"),
        authorization: header("authorization"),
        body,
    });
}

fn not_found() -> axum::response::Response {
    (
        StatusCode::NOT_FOUND,
        Json(json!({"message": "Not Found"})),
    )
        .into_response()
}

async fn get_user(
    State(state): State<Shared>,
    Path(login): Path<String>,
    headers: HeaderMap,
) -> axum::response::Response {
    record(&state, format!("/users/{}", login), HashMap::new(), &headers, None);

    if login != "octocat" {
        return not_found();
    }

    Json(json!({
        "login": "octocat",
        "id": 583231,
        "name": "The Octocat",
        "html_url": "https://github.com/octocat",
        "public_repos": 8
    }))
    .into_response()
}

async fn search_users(
    State(state): State<Shared>,
    Query(query): Query<HashMap<String, String>>,
    headers: HeaderMap,
) -> axum::response::Response {
    let q = query.get("q").cloned().unwrap_or_default();
    record(&state, "/search/users".to_string(), query, &headers, None);

    if q.starts_with("denied@") {
        return (
            StatusCode::FORBIDDEN,
            Json(json!({"message": "Resource not accessible by integration"})),
        )
            .into_response();
    }

    let items = if q == "mona@example.com in:email" {
        json!([{"login": "octocat", "id": 583231}])
    } else {
        json!([])
    };

    Json(json!({"total_count": items.as_array().map_or(0, Vec::len), "items": items}))
        .into_response()
}

async fn list_repos(
    State(state): State<Shared>,
    Path(login): Path<String>,
    Query(query): Query<HashMap<String, String>>,
    headers: HeaderMap,
) -> axum::response::Response {
    record(&state, format!("/users/{}/repos", login), query, &headers, None);

    if login != "octocat" {
        return (StatusCode::INTERNAL_SERVER_ERROR, "upstream exploded").into_response();
    }

    Json(json!([
        {
            "name": "hello",
            "full_name": "octocat/hello",
            "description": "My first repository",
            "html_url": "https://github.com/octocat/hello",
            "stargazers_count": 10,
            "language": "Rust",
            "topics": ["cli"],
            "fork": false,
            "archived": false
        },
        {
            "name": "spoon-knife",
            "full_name": "octocat/spoon-knife",
            "description": null,
            "html_url": "https://github.com/octocat/spoon-knife",
            "stargazers_count": 12000,
            "language": "HTML",
            "fork": true,
            "archived": false
        }
    ]))
    .into_response()
}

async fn readme(
    State(state): State<Shared>,
    Path((owner, repo)): Path<(String, String)>,
    headers: HeaderMap,
) -> axum::response::Response {
    record(
        &state,
        format!("/repos/{}/{}/readme", owner, repo),
        HashMap::new(),
        &headers,
        None,
    );

    if repo != "hello" {
        return not_found();
    }

    Json(json!({
        "name": "README.md",
        "path": "README.md",
        "type": "file",
        "size": 20,
        "download_url": format!("{}/raw/{}/{}/README.md", state.base_url, owner, repo)
    }))
    .into_response()
}

async fn contents(
    State(state): State<Shared>,
    Path((owner, repo)): Path<(String, String)>,
    headers: HeaderMap,
) -> axum::response::Response {
    record(
        &state,
        format!("/repos/{}/{}/contents", owner, repo),
        HashMap::new(),
        &headers,
        None,
    );

    if repo != "hello" {
        return not_found();
    }

    let raw = |path: &str| format!("{}/raw/{}/{}/{}", state.base_url, owner, repo, path);
    Json(json!([
        {"name": "src", "path": "src", "type": "dir", "size": 0, "download_url": null},
        {"name": "main.rs", "path": "main.rs", "type": "file", "size": 300, "download_url": raw("main.rs")},
        {"name": "broken.rs", "path": "broken.rs", "type": "file", "size": 200, "download_url": raw("broken.rs")},
        {"name": "Cargo.toml", "path": "Cargo.toml", "type": "file", "size": 100, "download_url": raw("Cargo.toml")}
    ]))
    .into_response()
}

async fn raw(
    State(state): State<Shared>,
    Path(path): Path<String>,
    headers: HeaderMap,
) -> axum::response::Response {
    record(&state, format!("/raw/{}", path), HashMap::new(), &headers, None);

    if path.contains("broken") {
        return (StatusCode::INTERNAL_SERVER_ERROR, "raw host down").into_response();
    }

    if path.ends_with("README.md") {
        return "# Hello\n\nA tiny demo project.".into_response();
    }

    format!("// contents of {}\nfn main() {{}}\n", path).into_response()
}

async fn chat(
    State(state): State<Shared>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> axum::response::Response {
    record(
        &state,
        "/v1/chat/completions".to_string(),
        HashMap::new(),
        &headers,
        Some(body),
    );

    if headers.get("authorization").is_none() {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({"error": {"message": "missing key"}})),
        )
            .into_response();
    }

    let choices = match &state.completion {
        Some(text) => json!([{
            "index": 0,
            "message": {"role": "assistant", "content": text},
            "finish_reason": "stop"
        }]),
        None => json!([]),
    };

    Json(json!({
        "id": "chatcmpl-1",
        "object": "chat.completion",
        "created": 1700000000,
        "model": "gpt-4o-mini",
        "choices": choices
    }))
    .into_response()
}
