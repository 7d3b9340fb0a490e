// Notion MCP - Model Context Protocol server for Notion workspaces
// Exposes search, page and database operations as tools for AI agents

pub mod config;
pub mod errors;
pub mod format;
pub mod health;
pub mod mcp;
pub mod notion;
pub mod tools;

pub use config::McpConfig;
pub use errors::{McpError, McpResult};
pub use mcp::McpServer;
pub use notion::{NotionApi, NotionClient};
pub use tools::ToolRegistry;
