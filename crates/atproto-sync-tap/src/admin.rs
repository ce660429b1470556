//! HTTP admin client for Tap's companion REST API.
//!
//! Separate from the WebSocket connection entirely; a caller can use this
//! without ever starting a Tap stream.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use reqwest::{Client, StatusCode};
use serde::Serialize;
use serde_json::Value;
use url::Url;

use crate::error::AdminError;

/// Wraps Tap's `/repos`, `/resolve`, `/info`, `/stats`, and `/health`
/// endpoints behind one HTTP client.
pub struct TapAdminClient {
    client: Client,
    base_url: String,
    auth_header: Option<String>,
}

impl TapAdminClient {
    /// Builds a client targeting `host`, with any trailing `/` trimmed.
    pub fn new(host: &Url, admin_password: Option<&str>) -> Self {
        let auth_header =
            admin_password.map(|password| format!("Basic {}", BASE64.encode(format!("admin:{password}"))));
        Self { client: Client::new(), base_url: host.as_str().trim_end_matches('/').to_string(), auth_header }
    }

    /// `POST /repos/add {dids}`.
    pub async fn add_repos(&self, dids: &[String]) -> Result<Value, AdminError> {
        self.post("/repos/add", &AddRemoveReposBody { dids }).await
    }

    /// `POST /repos/remove {dids}`.
    pub async fn remove_repos(&self, dids: &[String]) -> Result<Value, AdminError> {
        self.post("/repos/remove", &AddRemoveReposBody { dids }).await
    }

    /// `GET /resolve/{did}`.
    pub async fn resolve(&self, did: &str) -> Result<Value, AdminError> {
        self.get(&format!("/resolve/{did}")).await
    }

    /// `GET /info/{did}`.
    pub async fn info(&self, did: &str) -> Result<Value, AdminError> {
        self.get(&format!("/info/{did}")).await
    }

    /// `GET /stats/{metric}`, where `metric` is one of `repo-count`,
    /// `record-count`, `outbox-buffer`, `resync-buffer`, `cursors`.
    pub async fn stats(&self, metric: &str) -> Result<Value, AdminError> {
        self.get(&format!("/stats/{metric}")).await
    }

    /// `GET /health`.
    pub async fn health(&self) -> Result<Value, AdminError> {
        self.get("/health").await
    }

    async fn get(&self, path: &str) -> Result<Value, AdminError> {
        let mut request = self.client.get(format!("{}{path}", self.base_url));
        if let Some(auth) = &self.auth_header {
            request = request.header("Authorization", auth);
        }
        Self::finish(request.send().await).await
    }

    async fn post<B: Serialize>(&self, path: &str, body: &B) -> Result<Value, AdminError> {
        let mut request = self.client.post(format!("{}{path}", self.base_url)).json(body);
        if let Some(auth) = &self.auth_header {
            request = request.header("Authorization", auth);
        }
        Self::finish(request.send().await).await
    }

    async fn finish(result: Result<reqwest::Response, reqwest::Error>) -> Result<Value, AdminError> {
        let response = result.map_err(|err| AdminError::Transport(err.to_string()))?;
        let status = response.status();
        if status.is_success() {
            response.json().await.map_err(|err| AdminError::Decode(err.to_string()))
        } else {
            let body = response.text().await.unwrap_or_default();
            Err(AdminError::Http { status: status_code(status), body })
        }
    }
}

fn status_code(status: StatusCode) -> u16 {
    status.as_u16()
}

#[derive(Serialize)]
struct AddRemoveReposBody<'a> {
    dids: &'a [String],
}
