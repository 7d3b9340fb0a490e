// Tool Catalog - the closed set of tools and their MCP descriptors
use crate::{errors::McpError, mcp::McpTool};
use serde_json::json;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ToolName {
    Search,
    GetPage,
    CreatePage,
    AppendContent,
    ListDatabases,
    QueryDatabase,
    CreateDatabaseItem,
}

impl ToolName {
    pub const ALL: [ToolName; 7] = [
        ToolName::Search,
        ToolName::GetPage,
        ToolName::CreatePage,
        ToolName::AppendContent,
        ToolName::ListDatabases,
        ToolName::QueryDatabase,
        ToolName::CreateDatabaseItem,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ToolName::Search => "search",
            ToolName::GetPage => "get_page",
            ToolName::CreatePage => "create_page",
            ToolName::AppendContent => "append_content",
            ToolName::ListDatabases => "list_databases",
            ToolName::QueryDatabase => "query_database",
            ToolName::CreateDatabaseItem => "create_database_item",
        }
    }
}

impl fmt::Display for ToolName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ToolName {
    type Err = McpError;

    /// Accepts the catalog names and their `notion_`-prefixed aliases.
    fn from_str(name: &str) -> Result<Self, Self::Err> {
        let bare = name.strip_prefix("notion_").unwrap_or(name);
        ToolName::ALL
            .into_iter()
            .find(|tool| tool.as_str() == bare)
            .ok_or_else(|| McpError::ToolNotFound(format!("Unknown tool: {}", name)))
    }
}

const PAGE_SIZE_SCHEMA_DESCRIPTION: &str = "Maximum number of results (1-100)";

/// Content accepted by create_page and append_content.
fn content_schema(description: &str) -> serde_json::Value {
    json!({
        "description": description,
        "oneOf": [
            { "type": "string" },
            { "type": "array", "items": { "type": "object" } }
        ]
    })
}

pub fn descriptor(tool: ToolName) -> McpTool {
    let (description, input_schema) = match tool {
        ToolName::Search => (
            "Search Notion pages and databases by title.",
            json!({
                "type": "object",
                "properties": {
                    "query": { "type": "string", "description": "Text to search for" },
                    "filter": {
                        "type": "string",
                        "enum": ["page", "database"],
                        "description": "Only return pages or only databases"
                    },
                    "page_size": { "type": "integer", "minimum": 1, "maximum": 100, "description": PAGE_SIZE_SCHEMA_DESCRIPTION }
                },
                "required": ["query"]
            }),
        ),
        ToolName::GetPage => (
            "Get a Notion page: its title, metadata and content rendered as Markdown.",
            json!({
                "type": "object",
                "properties": {
                    "page_id": { "type": "string", "description": "Page ID or page URL (from search results or a share link)" }
                },
                "required": ["page_id"]
            }),
        ),
        ToolName::CreatePage => (
            "Create a Notion page under a parent page or database.",
            json!({
                "type": "object",
                "properties": {
                    "parent_id": { "type": "string", "description": "ID of the parent page or database" },
                    "parent_type": {
                        "type": "string",
                        "enum": ["page_id", "database_id"],
                        "description": "Kind of parent (default: page_id)"
                    },
                    "title": { "type": "string", "description": "Page title" },
                    "content": content_schema("Page body as Markdown, or an array of Notion block objects")
                },
                "required": ["parent_id", "title"]
            }),
        ),
        ToolName::AppendContent => (
            "Append content to the end of an existing Notion page.",
            json!({
                "type": "object",
                "properties": {
                    "page_id": { "type": "string", "description": "Page ID" },
                    "content": content_schema("Content as Markdown, or an array of Notion block objects")
                },
                "required": ["page_id", "content"]
            }),
        ),
        ToolName::ListDatabases => (
            "List the Notion databases shared with this integration.",
            json!({
                "type": "object",
                "properties": {
                    "page_size": { "type": "integer", "minimum": 1, "maximum": 100, "description": PAGE_SIZE_SCHEMA_DESCRIPTION }
                }
            }),
        ),
        ToolName::QueryDatabase => (
            "Query the items of a Notion database, with optional filtering and sorting.",
            json!({
                "type": "object",
                "properties": {
                    "database_id": { "type": "string", "description": "Database ID" },
                    "filter": { "type": "object", "description": "Notion filter object, passed through unchanged" },
                    "filter_property": { "type": "string", "description": "Text property to match (used with filter_value)" },
                    "filter_value": { "type": "string", "description": "Text the property must contain" },
                    "sort": {
                        "description": "Property name to sort ascending, a Notion sort object, or an array of them",
                        "oneOf": [
                            { "type": "string" },
                            { "type": "object" },
                            { "type": "array", "items": { "type": "object" } }
                        ]
                    },
                    "page_size": { "type": "integer", "minimum": 1, "maximum": 100, "description": PAGE_SIZE_SCHEMA_DESCRIPTION },
                    "start_cursor": { "type": "string", "description": "Cursor from a previous query's next_cursor" }
                },
                "required": ["database_id"]
            }),
        ),
        ToolName::CreateDatabaseItem => (
            "Create an item (row) in a Notion database.",
            json!({
                "type": "object",
                "properties": {
                    "database_id": { "type": "string", "description": "Database ID" },
                    "properties": {
                        "type": "object",
                        "description": "Item properties as {name: value}; strings, numbers, booleans, string lists or raw Notion property values"
                    },
                    "title_property": { "type": "string", "description": "Name of the database's title property (default: first string value)" }
                },
                "required": ["database_id", "properties"]
            }),
        ),
    };

    McpTool {
        name: tool.as_str().to_string(),
        description: description.to_string(),
        input_schema,
    }
}

/// Checks that the descriptor table covers exactly the catalog, once each.
pub fn validate_catalog(descriptors: &[McpTool]) -> Result<(), McpError> {
    if descriptors.len() != ToolName::ALL.len() {
        return Err(McpError::Internal(format!(
            "tool table has {} entries, catalog has {}",
            descriptors.len(),
            ToolName::ALL.len()
        )));
    }
    for tool in ToolName::ALL {
        let matches = descriptors.iter().filter(|d| d.name == tool.as_str()).count();
        if matches != 1 {
            return Err(McpError::Internal(format!(
                "tool `{}` is described {} times",
                tool, matches
            )));
        }
    }
    Ok(())
}
