// Tool Registry - validates arguments and routes each tool to its Notion call
use super::catalog::{descriptor, validate_catalog, ToolName};
use super::params::*;
use crate::{
    errors::{McpError, McpResult},
    format::{self, ToolOutput},
    mcp::McpTool,
    notion::{blocks::rich_text, normalize_id, properties::to_notion_properties, NotionApi},
};
use serde_json::{json, Map, Value};
use std::sync::Arc;
use tracing::debug;

pub struct ToolRegistry {
    notion: Arc<dyn NotionApi>,
    tools: Vec<McpTool>,
    default_page_size: u32,
}

impl ToolRegistry {
    pub fn new(notion: Arc<dyn NotionApi>, default_page_size: u32) -> McpResult<Self> {
        let tools: Vec<McpTool> = ToolName::ALL.into_iter().map(descriptor).collect();
        validate_catalog(&tools)?;
        resolve_page_size(Some(default_page_size), default_page_size)?;

        Ok(Self {
            notion,
            tools,
            default_page_size,
        })
    }

    pub fn tool_count(&self) -> usize {
        self.tools.len()
    }

    pub fn list_tools(&self) -> Vec<McpTool> {
        self.tools.clone()
    }

    /// Call a tool by name. Parameters are validated before Notion is contacted.
    pub async fn call_tool(&self, name: &str, args: Value) -> McpResult<ToolOutput> {
        let tool: ToolName = name.parse()?;
        debug!(%tool, "Dispatching tool call");

        match tool {
            ToolName::Search => self.search(parse_params(args)?).await,
            ToolName::GetPage => self.get_page(parse_params(args)?).await,
            ToolName::CreatePage => self.create_page(parse_params(args)?).await,
            ToolName::AppendContent => self.append_content(parse_params(args)?).await,
            ToolName::ListDatabases => self.list_databases(parse_params(args)?).await,
            ToolName::QueryDatabase => self.query_database(parse_params(args)?).await,
            ToolName::CreateDatabaseItem => self.create_database_item(parse_params(args)?).await,
        }
    }

    async fn search(&self, params: SearchParams) -> McpResult<ToolOutput> {
        let page_size = resolve_page_size(params.page_size, self.default_page_size)?;

        let mut body = json!({ "query": params.query, "page_size": page_size });
        if let Some(kind) = params.filter {
            body["filter"] = json!({ "property": "object", "value": kind.as_str() });
        }

        let response = self.notion.search(body).await?;
        Ok(format::format_search_results(&response))
    }

    async fn get_page(&self, params: GetPageParams) -> McpResult<ToolOutput> {
        let page_id = normalize_id(&params.page_id, "page_id")?;

        let (page, children) = futures::try_join!(
            self.notion.retrieve_page(&page_id),
            self.notion.list_block_children(&page_id),
        )?;
        Ok(format::format_page(&page, &children))
    }

    async fn create_page(&self, params: CreatePageParams) -> McpResult<ToolOutput> {
        let parent_id = normalize_id(&params.parent_id, "parent_id")?;
        let title = params.title.trim();
        if title.is_empty() {
            return Err(McpError::InvalidParameters("`title` must not be empty".to_string()));
        }
        let children = match params.content {
            Some(content) => content.into_blocks()?,
            None => Vec::new(),
        };

        let mut parent = Map::new();
        parent.insert(params.parent_type.as_str().to_string(), Value::String(parent_id));

        let mut body = json!({
            "parent": parent,
            "properties": {
                "title": { "title": rich_text(title) }
            }
        });
        if !children.is_empty() {
            body["children"] = Value::Array(children);
        }

        let page = self.notion.create_page(body).await?;
        Ok(format::format_created_page(&page))
    }

    async fn append_content(&self, params: AppendContentParams) -> McpResult<ToolOutput> {
        let page_id = normalize_id(&params.page_id, "page_id")?;
        let blocks = params.content.into_blocks()?;
        if blocks.is_empty() {
            return Err(McpError::InvalidParameters(
                "`content` does not contain any blocks to append".to_string(),
            ));
        }

        let response = self.notion.append_block_children(&page_id, blocks).await?;
        Ok(format::format_appended(&page_id, &response))
    }

    async fn list_databases(&self, params: ListDatabasesParams) -> McpResult<ToolOutput> {
        let page_size = resolve_page_size(params.page_size, self.default_page_size)?;

        let body = json!({
            "filter": { "property": "object", "value": "database" },
            "page_size": page_size
        });
        let response = self.notion.search(body).await?;
        Ok(format::format_databases(&response))
    }

    async fn query_database(&self, params: QueryDatabaseParams) -> McpResult<ToolOutput> {
        let database_id = normalize_id(&params.database_id, "database_id")?;
        let page_size = resolve_page_size(params.page_size, self.default_page_size)?;

        let mut body = json!({ "page_size": page_size });
        if let Some(filter) = params.notion_filter()? {
            body["filter"] = filter;
        }
        if let Some(sorts) = params.notion_sorts()? {
            body["sorts"] = Value::Array(sorts);
        }
        if let Some(cursor) = &params.start_cursor {
            body["start_cursor"] = json!(cursor);
        }

        let response = self.notion.query_database(&database_id, body).await?;
        Ok(format::format_query_results(&response))
    }

    async fn create_database_item(&self, params: CreateDatabaseItemParams) -> McpResult<ToolOutput> {
        let database_id = normalize_id(&params.database_id, "database_id")?;
        if params.properties.is_empty() {
            return Err(McpError::InvalidParameters(
                "`properties` must contain at least one property".to_string(),
            ));
        }
        let properties = to_notion_properties(&params.properties, params.title_property.as_deref())?;

        let body = json!({
            "parent": { "database_id": database_id },
            "properties": properties
        });
        let page = self.notion.create_page(body).await?;
        Ok(format::format_created_item(&page))
    }
}
