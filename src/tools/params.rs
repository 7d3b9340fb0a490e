// Tool Parameters - typed arguments deserialized from tools/call
use crate::{
    errors::{McpError, McpResult},
    notion::blocks::markdown_to_blocks,
};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Map, Value};

/// Notion caps both `page_size` and the number of children per request at 100.
pub const MAX_PAGE_SIZE: u32 = 100;

/// Deserializes tool arguments, reporting any mismatch as `InvalidParameters`.
///
/// Missing arguments are treated as an empty object so tools without required
/// parameters can be called bare.
pub fn parse_params<T: DeserializeOwned>(args: Value) -> McpResult<T> {
    let args = match args {
        Value::Null => Value::Object(Map::new()),
        Value::Object(_) => args,
        other => {
            return Err(McpError::InvalidParameters(format!(
                "arguments must be an object, got {}",
                other
            )))
        }
    };
    serde_json::from_value(args).map_err(|e| McpError::InvalidParameters(e.to_string()))
}

pub fn resolve_page_size(requested: Option<u32>, default: u32) -> McpResult<u32> {
    match requested {
        None => Ok(default),
        Some(size) if (1..=MAX_PAGE_SIZE).contains(&size) => Ok(size),
        Some(size) => Err(McpError::InvalidParameters(format!(
            "`page_size` must be between 1 and {}, got {}",
            MAX_PAGE_SIZE, size
        ))),
    }
}

#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ObjectKind {
    Page,
    Database,
}

impl ObjectKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ObjectKind::Page => "page",
            ObjectKind::Database => "database",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ParentType {
    #[default]
    PageId,
    DatabaseId,
}

impl ParentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ParentType::PageId => "page_id",
            ParentType::DatabaseId => "database_id",
        }
    }
}

/// Markdown text or pre-built Notion blocks.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ContentInput {
    Markdown(String),
    Blocks(Vec<Value>),
}

impl ContentInput {
    pub fn into_blocks(self) -> McpResult<Vec<Value>> {
        let blocks = match self {
            ContentInput::Markdown(markdown) => markdown_to_blocks(&markdown),
            ContentInput::Blocks(blocks) => {
                if let Some(bad) = blocks.iter().find(|b| b.get("type").and_then(Value::as_str).is_none()) {
                    return Err(McpError::InvalidParameters(format!(
                        "every content block must be an object with a `type`, got {}",
                        bad
                    )));
                }
                blocks
            }
        };
        if blocks.len() > MAX_PAGE_SIZE as usize {
            return Err(McpError::InvalidParameters(format!(
                "content produces {} blocks; Notion accepts at most {} per request",
                blocks.len(),
                MAX_PAGE_SIZE
            )));
        }
        Ok(blocks)
    }
}

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    pub query: String,
    #[serde(default)]
    pub filter: Option<ObjectKind>,
    #[serde(default)]
    pub page_size: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub struct GetPageParams {
    pub page_id: String,
}

#[derive(Debug, Deserialize)]
pub struct CreatePageParams {
    pub parent_id: String,
    #[serde(default)]
    pub parent_type: ParentType,
    pub title: String,
    #[serde(default)]
    pub content: Option<ContentInput>,
}

#[derive(Debug, Deserialize)]
pub struct AppendContentParams {
    pub page_id: String,
    pub content: ContentInput,
}

#[derive(Debug, Default, Deserialize)]
pub struct ListDatabasesParams {
    #[serde(default)]
    pub page_size: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub struct QueryDatabaseParams {
    pub database_id: String,
    #[serde(default)]
    pub filter: Option<Value>,
    #[serde(default)]
    pub filter_property: Option<String>,
    #[serde(default)]
    pub filter_value: Option<String>,
    #[serde(default)]
    pub sort: Option<Value>,
    #[serde(default)]
    pub page_size: Option<u32>,
    #[serde(default)]
    pub start_cursor: Option<String>,
}

impl QueryDatabaseParams {
    /// Resolves the raw `filter` or the `filter_property`/`filter_value` shorthand.
    pub fn notion_filter(&self) -> McpResult<Option<Value>> {
        match (&self.filter, &self.filter_property, &self.filter_value) {
            (Some(filter), None, None) => {
                if filter.is_object() {
                    Ok(Some(filter.clone()))
                } else {
                    Err(McpError::InvalidParameters(
                        "`filter` must be a Notion filter object".to_string(),
                    ))
                }
            }
            (Some(_), _, _) => Err(McpError::InvalidParameters(
                "use either `filter` or `filter_property`/`filter_value`, not both".to_string(),
            )),
            (None, Some(property), Some(value)) => Ok(Some(json!({
                "property": property,
                "rich_text": { "contains": value }
            }))),
            (None, Some(_), None) | (None, None, Some(_)) => Err(McpError::InvalidParameters(
                "`filter_property` and `filter_value` must be given together".to_string(),
            )),
            (None, None, None) => Ok(None),
        }
    }

    /// Normalizes `sort` into Notion's `sorts` array.
    pub fn notion_sorts(&self) -> McpResult<Option<Vec<Value>>> {
        match &self.sort {
            None => Ok(None),
            Some(Value::String(property)) => Ok(Some(vec![json!({
                "property": property,
                "direction": "ascending"
            })])),
            Some(sort @ Value::Object(_)) => Ok(Some(vec![sort.clone()])),
            Some(Value::Array(sorts)) if sorts.iter().all(Value::is_object) => {
                Ok(Some(sorts.clone()))
            }
            Some(_) => Err(McpError::InvalidParameters(
                "`sort` must be a property name, a sort object, or an array of sort objects"
                    .to_string(),
            )),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct CreateDatabaseItemParams {
    pub database_id: String,
    pub properties: Map<String, Value>,
    #[serde(default)]
    pub title_property: Option<String>,
}
