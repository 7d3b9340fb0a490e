// Tools - the seven Notion operations exposed over MCP
pub mod catalog;
pub mod params;
pub mod registry;

pub use catalog::ToolName;
pub use registry::ToolRegistry;
