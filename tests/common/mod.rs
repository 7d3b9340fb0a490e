// Shared test doubles for the Notion API
#![allow(dead_code)]

use async_trait::async_trait;
use notion_mcp::{McpError, McpResult, NotionApi, ToolRegistry};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// Stateful in-memory stand-in for the Notion API.
///
/// Pages created through it can be read back, appended to and queried.
#[derive(Default)]
pub struct InMemoryNotion {
    pages: Mutex<HashMap<String, StoredPage>>,
    databases: Mutex<Vec<Value>>,
    calls: AtomicUsize,
}

struct StoredPage {
    page: Value,
    children: Vec<Value>,
}

impl InMemoryNotion {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn add_database(&self, id: &str, title: &str) {
        self.databases.lock().unwrap().push(json!({
            "object": "database",
            "id": id,
            "title": [{ "type": "text", "plain_text": title }],
            "url": format!("https://www.notion.so/{}", id.replace('-', "")),
            "last_edited_time": "2024-05-01T12:00:00.000Z"
        }));
    }

    /// Number of API operations invoked so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn record(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
    }

    fn title_of(page: &Value) -> String {
        notion_mcp::format::extract_title(page)
    }
}

pub fn registry(notion: Arc<InMemoryNotion>) -> ToolRegistry {
    ToolRegistry::new(notion, 10).unwrap()
}

#[async_trait]
impl NotionApi for InMemoryNotion {
    async fn search(&self, body: Value) -> McpResult<Value> {
        self.record();
        let query = body["query"].as_str().unwrap_or_default().to_lowercase();
        let wanted = body.pointer("/filter/value").and_then(Value::as_str);

        let mut results: Vec<Value> = Vec::new();
        if wanted != Some("page") {
            results.extend(self.databases.lock().unwrap().iter().cloned());
        }
        if wanted != Some("database") {
            results.extend(self.pages.lock().unwrap().values().map(|p| p.page.clone()));
        }
        results.retain(|item| Self::title_of(item).to_lowercase().contains(&query));

        Ok(json!({ "object": "list", "results": results, "has_more": false, "next_cursor": null }))
    }

    async fn retrieve_page(&self, page_id: &str) -> McpResult<Value> {
        self.record();
        self.pages
            .lock()
            .unwrap()
            .get(page_id)
            .map(|p| p.page.clone())
            .ok_or_else(|| McpError::NotFound(format!("Could not find page with ID: {}", page_id)))
    }

    async fn list_block_children(&self, block_id: &str) -> McpResult<Value> {
        self.record();
        let pages = self.pages.lock().unwrap();
        let page = pages
            .get(block_id)
            .ok_or_else(|| McpError::NotFound(format!("Could not find block with ID: {}", block_id)))?;
        Ok(json!({ "object": "list", "results": page.children, "has_more": false }))
    }

    async fn create_page(&self, body: Value) -> McpResult<Value> {
        self.record();
        let id = uuid::Uuid::new_v4().to_string();

        // Mirror Notion: every property comes back with its type tag
        let mut properties = body["properties"].clone();
        if let Some(map) = properties.as_object_mut() {
            for property in map.values_mut() {
                let kind = property
                    .as_object()
                    .and_then(|p| p.keys().next().cloned())
                    .unwrap_or_default();
                property["type"] = json!(kind);
            }
        }

        let page = json!({
            "object": "page",
            "id": id,
            "parent": body["parent"],
            "url": format!("https://www.notion.so/{}", id.replace('-', "")),
            "last_edited_time": "2024-05-01T12:00:00.000Z",
            "properties": properties
        });
        let children = body["children"].as_array().cloned().unwrap_or_default();

        self.pages.lock().unwrap().insert(
            id,
            StoredPage {
                page: page.clone(),
                children,
            },
        );
        Ok(page)
    }

    async fn append_block_children(&self, block_id: &str, children: Vec<Value>) -> McpResult<Value> {
        self.record();
        let mut pages = self.pages.lock().unwrap();
        let page = pages
            .get_mut(block_id)
            .ok_or_else(|| McpError::NotFound(format!("Could not find block with ID: {}", block_id)))?;
        page.children.extend(children.iter().cloned());
        Ok(json!({ "object": "list", "results": children }))
    }

    async fn query_database(&self, database_id: &str, _body: Value) -> McpResult<Value> {
        self.record();
        let known = self
            .databases
            .lock()
            .unwrap()
            .iter()
            .any(|db| db["id"] == database_id);
        if !known {
            return Err(McpError::NotFound(format!(
                "Could not find database with ID: {}",
                database_id
            )));
        }

        let results: Vec<Value> = self
            .pages
            .lock()
            .unwrap()
            .values()
            .filter(|p| p.page.pointer("/parent/database_id") == Some(&json!(database_id)))
            .map(|p| p.page.clone())
            .collect();
        Ok(json!({ "object": "list", "results": results, "has_more": false }))
    }
}
