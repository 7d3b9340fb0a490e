// Notion Client - reqwest transport for the Notion REST API
use super::NotionApi;
use crate::{
    config::{McpConfig, NotionToken},
    errors::{McpError, McpResult},
};
use async_trait::async_trait;
use reqwest::{header::RETRY_AFTER, Method, StatusCode};
use serde_json::{json, Value};
use std::time::Duration;
use tracing::{debug, warn};

/// Notion only returns up to 100 children per request.
const BLOCK_CHILDREN_PAGE_SIZE: u32 = 100;

pub struct NotionClient {
    api_base: String,
    notion_version: String,
    token: NotionToken,
    http_client: reqwest::Client,
}

impl NotionClient {
    pub fn new(config: &McpConfig) -> McpResult<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .user_agent(concat!("notion-mcp/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| McpError::Internal(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            api_base: config.api_base.trim_end_matches('/').to_string(),
            notion_version: config.notion_version.clone(),
            token: config.notion_token.clone(),
            http_client,
        })
    }

    async fn send(&self, method: Method, path: &str, body: Option<&Value>) -> McpResult<Value> {
        let url = format!("{}{}", self.api_base, path);

        debug!(%method, %path, "📡 Calling Notion API");

        let mut request = self
            .http_client
            .request(method.clone(), url.as_str())
            .bearer_auth(self.token.expose())
            .header("Notion-Version", &self.notion_version);
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request
            .send()
            .await
            .map_err(|e| McpError::NetworkError(e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            return response.json::<Value>().await.map_err(|e| {
                if e.is_timeout() {
                    McpError::NetworkError(e.to_string())
                } else {
                    McpError::UpstreamError {
                        status: status.as_u16(),
                        message: format!("Notion returned an unreadable body: {}", e),
                    }
                }
            });
        }

        let retry_after = response
            .headers()
            .get(RETRY_AFTER)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.trim().parse().ok());
        let error_text = response.text().await.unwrap_or_default();

        warn!(%method, %path, status = status.as_u16(), "Notion API call failed");
        Err(error_from_status(status, &error_text, retry_after))
    }
}

/// Maps a non-success Notion response onto the error taxonomy.
///
/// Notion error bodies look like `{"object":"error","status":404,"code":"object_not_found","message":"..."}`.
pub fn error_from_status(status: StatusCode, body: &str, retry_after: Option<u64>) -> McpError {
    let parsed: Option<Value> = serde_json::from_str(body).ok();
    let notion_code = parsed
        .as_ref()
        .and_then(|v| v.get("code"))
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();
    let message = parsed
        .as_ref()
        .and_then(|v| v.get("message"))
        .and_then(Value::as_str)
        .map(str::to_string)
        .unwrap_or_else(|| {
            if body.trim().is_empty() {
                status.canonical_reason().unwrap_or("unknown error").to_string()
            } else {
                body.trim().to_string()
            }
        });

    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => McpError::AuthError(message),
        StatusCode::NOT_FOUND => McpError::NotFound(message),
        StatusCode::TOO_MANY_REQUESTS => McpError::RateLimited { message, retry_after },
        StatusCode::BAD_REQUEST if notion_code == "validation_error" => {
            McpError::InvalidParameters(message)
        }
        _ => McpError::UpstreamError {
            status: status.as_u16(),
            message,
        },
    }
}

#[async_trait]
impl NotionApi for NotionClient {
    async fn search(&self, body: Value) -> McpResult<Value> {
        self.send(Method::POST, "/search", Some(&body)).await
    }

    async fn retrieve_page(&self, page_id: &str) -> McpResult<Value> {
        self.send(Method::GET, &format!("/pages/{}", page_id), None).await
    }

    async fn list_block_children(&self, block_id: &str) -> McpResult<Value> {
        let path = format!(
            "/blocks/{}/children?page_size={}",
            block_id, BLOCK_CHILDREN_PAGE_SIZE
        );
        self.send(Method::GET, &path, None).await
    }

    async fn create_page(&self, body: Value) -> McpResult<Value> {
        self.send(Method::POST, "/pages", Some(&body)).await
    }

    async fn append_block_children(&self, block_id: &str, children: Vec<Value>) -> McpResult<Value> {
        let body = json!({ "children": children });
        self.send(Method::PATCH, &format!("/blocks/{}/children", block_id), Some(&body))
            .await
    }

    async fn query_database(&self, database_id: &str, body: Value) -> McpResult<Value> {
        self.send(
            Method::POST,
            &format!("/databases/{}/query", database_id),
            Some(&body),
        )
        .await
    }
}
