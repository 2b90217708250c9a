//! Test doubles shared by the integration tests: a mock chat backend served
//! by Axum on a random port, and an in-memory object store.

#![allow(dead_code)]

use std::collections::HashMap;
use std::io;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::Bytes;
use axum::extract::{Query, State};
use axum::http::{HeaderMap, Method, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::{Json, Router};
use serde_json::{Value, json};
use tokio::net::TcpListener;
use tracing::subscriber::DefaultGuard;

use s3_notify::error::StorageError;
use s3_notify::storage::{ObjectMetadata, ObjectStorage, StorageResult};

// ── Mock chat backend ───────────────────────────────────────────────

/// How the mock backend answers.
#[derive(Debug, Clone)]
pub struct Behavior {
    pub post_message_error: Option<String>,
    pub reserve_error: Option<String>,
    /// Body returned by the upload URL. `None` answers `OK - <length>`.
    pub push_reply: Option<String>,
    pub complete_error: Option<String>,
    /// File id listed in the `files.completeUploadExternal` answer.
    pub completed_file_id: String,
    pub share_status: StatusCode,
    /// `conversations.list` pages of `(id, name)`.
    pub pages: Vec<Vec<(String, String)>>,
}

impl Default for Behavior {
    fn default() -> Self {
        Self {
            post_message_error: None,
            reserve_error: None,
            push_reply: None,
            complete_error: None,
            completed_file_id: "F0001".into(),
            share_status: StatusCode::OK,
            pages: vec![vec![
                ("C0001".into(), "general".into()),
                ("G0001".into(), "s3-notifications".into()),
            ]],
        }
    }
}

/// One request as the backend saw it.
#[derive(Debug, Clone)]
pub struct Recorded {
    pub method: Method,
    pub path: String,
    pub authorization: Option<String>,
    pub query: HashMap<String, String>,
    pub body: Bytes,
}

impl Recorded {
    pub fn json(&self) -> Value {
        serde_json::from_slice(&self.body).expect("request body is JSON")
    }
}

struct MockState {
    base_url: String,
    behavior: Behavior,
    requests: Mutex<Vec<Recorded>>,
}

pub struct MockChatBackend {
    pub api_base: String,
    state: Arc<MockState>,
}

impl MockChatBackend {
    /// Start the backend on `127.0.0.1:<random>`.
    pub async fn start(behavior: Behavior) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        let base_url = format!("http://127.0.0.1:{port}");

        let state = Arc::new(MockState {
            base_url: base_url.clone(),
            behavior,
            requests: Mutex::new(Vec::new()),
        });
        let app = Router::new()
            .fallback(handle)
            .with_state(Arc::clone(&state));

        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            api_base: format!("{base_url}/api"),
            state,
        }
    }

    pub fn requests(&self) -> Vec<Recorded> {
        self.state.requests.lock().unwrap().clone()
    }

    pub fn paths(&self) -> Vec<String> {
        self.requests().into_iter().map(|r| r.path).collect()
    }

    /// Requests to one Web API method, e.g. `chat.postMessage`.
    pub fn calls_to(&self, method: &str) -> Vec<Recorded> {
        let path = format!("/api/{method}");
        self.requests()
            .into_iter()
            .filter(|r| r.path == path)
            .collect()
    }
}

fn not_ok(error: &str) -> Response {
    Json(json!({ "ok": false, "error": error })).into_response()
}

async fn handle(
    State(state): State<Arc<MockState>>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    Query(query): Query<HashMap<String, String>>,
    body: Bytes,
) -> Response {
    let authorization = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);

    state.requests.lock().unwrap().push(Recorded {
        method: method.clone(),
        path: uri.path().to_string(),
        authorization,
        query: query.clone(),
        body: body.clone(),
    });

    let behavior = &state.behavior;

    match uri.path() {
        "/api/chat.postMessage" => match &behavior.post_message_error {
            Some(e) => not_ok(e),
            None => Json(json!({ "ok": true, "channel": "C0001", "ts": "1700000000.000100" }))
                .into_response(),
        },
        "/api/conversations.list" => {
            let page: usize = query
                .get("cursor")
                .and_then(|c| c.strip_prefix("page-"))
                .and_then(|n| n.parse().ok())
                .unwrap_or(0);
            let channels: Vec<Value> = behavior
                .pages
                .get(page)
                .cloned()
                .unwrap_or_default()
                .into_iter()
                .map(|(id, name)| json!({ "id": id, "name": name, "is_private": true }))
                .collect();
            let next_cursor = if page + 1 < behavior.pages.len() {
                format!("page-{}", page + 1)
            } else {
                String::new()
            };
            Json(json!({
                "ok": true,
                "channels": channels,
                "response_metadata": { "next_cursor": next_cursor }
            }))
            .into_response()
        }
        "/api/files.getUploadURLExternal" => match &behavior.reserve_error {
            Some(e) => not_ok(e),
            None => Json(json!({
                "ok": true,
                "upload_url": format!("{}/upload/F0001", state.base_url),
                "file_id": "F0001"
            }))
            .into_response(),
        },
        "/upload/F0001" => {
            let reply = behavior
                .push_reply
                .clone()
                .unwrap_or_else(|| format!("OK - {}", body.len()));
            (StatusCode::OK, reply).into_response()
        }
        "/api/files.completeUploadExternal" => match &behavior.complete_error {
            Some(e) => not_ok(e),
            None => {
                let file = json!({ "id": behavior.completed_file_id, "title": "uploaded" });
                Json(json!({ "ok": true, "files": [file] })).into_response()
            }
        },
        "/api/files.sharedPublicURL" => {
            (behavior.share_status, Json(json!({ "ok": true }))).into_response()
        }
        _ => (StatusCode::NOT_FOUND, "not found").into_response(),
    }
}

// ── In-memory storage ───────────────────────────────────────────────

/// Object store backed by a map of `(bucket, key)` to bytes.
#[derive(Default)]
pub struct InMemoryStorage {
    objects: Mutex<HashMap<(String, String), Vec<u8>>>,
}

impl InMemoryStorage {
    pub fn insert(&self, bucket: &str, key: &str, bytes: &[u8]) {
        self.objects
            .lock()
            .unwrap()
            .insert((bucket.to_string(), key.to_string()), bytes.to_vec());
    }

    pub fn contains(&self, bucket: &str, key: &str) -> bool {
        self.objects
            .lock()
            .unwrap()
            .contains_key(&(bucket.to_string(), key.to_string()))
    }

    fn read(&self, bucket: &str, key: &str) -> Option<Vec<u8>> {
        self.objects
            .lock()
            .unwrap()
            .get(&(bucket.to_string(), key.to_string()))
            .cloned()
    }
}

#[async_trait]
impl ObjectStorage for InMemoryStorage {
    async fn head_object(&self, bucket: &str, key: &str) -> StorageResult<ObjectMetadata> {
        let bytes = self
            .read(bucket, key)
            .ok_or_else(|| StorageError::Metadata {
                bucket: bucket.to_string(),
                key: key.to_string(),
                reason: "NoSuchKey".to_string(),
            })?;
        Ok(ObjectMetadata {
            content_length: Some(bytes.len() as i64),
            content_type: Some("application/octet-stream".to_string()),
        })
    }

    async fn copy_object(
        &self,
        from_bucket: &str,
        from_key: &str,
        to_bucket: &str,
        to_key: &str,
    ) -> StorageResult<()> {
        let bytes = self
            .read(from_bucket, from_key)
            .ok_or_else(|| StorageError::Copy {
                from_bucket: from_bucket.to_string(),
                from_key: from_key.to_string(),
                to_bucket: to_bucket.to_string(),
                to_key: to_key.to_string(),
                reason: "NoSuchKey".to_string(),
            })?;
        self.objects
            .lock()
            .unwrap()
            .insert((to_bucket.to_string(), to_key.to_string()), bytes);
        Ok(())
    }

    async fn delete_object(&self, bucket: &str, key: &str) -> StorageResult<()> {
        self.objects
            .lock()
            .unwrap()
            .remove(&(bucket.to_string(), key.to_string()));
        Ok(())
    }

    async fn get_object(&self, bucket: &str, key: &str) -> StorageResult<Vec<u8>> {
        self.read(bucket, key).ok_or_else(|| StorageError::Read {
            bucket: bucket.to_string(),
            key: key.to_string(),
            reason: "NoSuchKey".to_string(),
        })
    }
}

// ── Log capture ─────────────────────────────────────────────────────

/// Formatted log output collected while a [`LogCapture`] guard is alive.
#[derive(Clone, Default)]
pub struct LogBuffer(Arc<Mutex<Vec<u8>>>);

impl LogBuffer {
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }

    /// Lines logged at `WARN`.
    pub fn warnings(&self) -> Vec<String> {
        self.contents()
            .lines()
            .filter(|line| line.contains("WARN"))
            .map(str::to_string)
            .collect()
    }
}

impl io::Write for LogBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Route this thread's `tracing` output into a buffer until dropped.
pub struct LogCapture {
    pub logs: LogBuffer,
    _guard: DefaultGuard,
}

impl LogCapture {
    pub fn start() -> Self {
        let logs = LogBuffer::default();
        let writer = logs.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || writer.clone())
            .with_ansi(false)
            .finish();

        Self {
            logs,
            _guard: tracing::subscriber::set_default(subscriber),
        }
    }
}
