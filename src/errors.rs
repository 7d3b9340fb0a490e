// MCP Error Types
use jsonrpc_core::ErrorCode;
use serde::{Deserialize, Serialize};
use serde_json::json;
use thiserror::Error;

pub type McpResult<T> = Result<T, McpError>;

#[derive(Debug, Error)]
pub enum McpError {
    // Protocol-level failures, reported as JSON-RPC errors
    #[error("Tool not found: {0}")]
    ToolNotFound(String),

    #[error("Method not found: {0}")]
    MethodNotFound(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Invalid params: {0}")]
    InvalidParams(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    // Tool-level failures, reported as tool results with isError set
    #[error("Invalid parameters: {0}")]
    InvalidParameters(String),

    #[error("Notion rejected the integration token: {0}")]
    AuthError(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Rate limited by Notion: {message}")]
    RateLimited {
        message: String,
        retry_after: Option<u64>,
    },

    #[error("Notion API error ({status}): {message}")]
    UpstreamError { status: u16, message: String },

    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct McpErrorResponse {
    pub code: i64,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
}

impl McpError {
    /// Stable identifier surfaced to the calling agent.
    pub fn code(&self) -> &'static str {
        match self {
            McpError::ToolNotFound(_) => "ToolNotFound",
            McpError::MethodNotFound(_) => "MethodNotFound",
            McpError::InvalidRequest(_) => "InvalidRequest",
            McpError::InvalidParams(_) => "InvalidParams",
            McpError::ParseError(_) => "ParseError",
            McpError::InvalidParameters(_) => "InvalidParameters",
            McpError::AuthError(_) => "AuthError",
            McpError::NotFound(_) => "NotFound",
            McpError::RateLimited { .. } => "RateLimited",
            McpError::UpstreamError { .. } => "UpstreamError",
            McpError::NetworkError(_) => "NetworkError",
            McpError::Internal(_) | McpError::Json(_) => "InternalError",
        }
    }

    /// Whether this error belongs inside a tool result rather than a JSON-RPC error.
    pub fn is_tool_error(&self) -> bool {
        matches!(
            self,
            McpError::InvalidParameters(_)
                | McpError::AuthError(_)
                | McpError::NotFound(_)
                | McpError::RateLimited { .. }
                | McpError::UpstreamError { .. }
                | McpError::NetworkError(_)
        )
    }

    /// Structured payload attached to tool error results.
    pub fn to_structured(&self) -> serde_json::Value {
        let mut value = json!({
            "code": self.code(),
            "message": self.to_string(),
        });
        match self {
            McpError::RateLimited { retry_after: Some(secs), .. } => {
                value["retry_after_secs"] = json!(secs);
            }
            McpError::UpstreamError { status, .. } => {
                value["status"] = json!(status);
            }
            _ => {}
        }
        value
    }

    pub fn to_jsonrpc_error(&self) -> McpErrorResponse {
        let code = match self {
            McpError::ToolNotFound(_) | McpError::MethodNotFound(_) => ErrorCode::MethodNotFound,
            McpError::InvalidParameters(_) | McpError::InvalidParams(_) => ErrorCode::InvalidParams,
            McpError::InvalidRequest(_) => ErrorCode::InvalidRequest,
            McpError::ParseError(_) => ErrorCode::ParseError,
            McpError::AuthError(_) => ErrorCode::ServerError(-32001),
            McpError::RateLimited { .. } => ErrorCode::ServerError(-32002),
            _ => ErrorCode::InternalError,
        };
        McpErrorResponse {
            code: code.code(),
            message: self.to_string(),
            data: Some(json!({ "code": self.code() })),
        }
    }
}
