// Notion API Trait - The seam between tool handlers and the Notion transport
use crate::errors::McpResult;
use async_trait::async_trait;
use serde_json::Value;

/// Every operation maps to exactly one Notion endpoint and returns the parsed JSON body.
///
/// Ids passed in are already normalized to the hyphenated UUID form.
#[async_trait]
pub trait NotionApi: Send + Sync {
    /// `POST /search`
    async fn search(&self, body: Value) -> McpResult<Value>;

    /// `GET /pages/{page_id}`
    async fn retrieve_page(&self, page_id: &str) -> McpResult<Value>;

    /// `GET /blocks/{block_id}/children`
    async fn list_block_children(&self, block_id: &str) -> McpResult<Value>;

    /// `POST /pages`
    async fn create_page(&self, body: Value) -> McpResult<Value>;

    /// `PATCH /blocks/{block_id}/children`
    async fn append_block_children(&self, block_id: &str, children: Vec<Value>) -> McpResult<Value>;

    /// `POST /databases/{database_id}/query`
    async fn query_database(&self, database_id: &str, body: Value) -> McpResult<Value>;
}
