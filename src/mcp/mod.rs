// MCP Protocol - stdio JSON-RPC server and wire types
pub mod server;
pub mod types;

pub use server::McpServer;
pub use types::McpTool;
