// Notion Adapter - HTTP client and payload conversions for the Notion REST API
pub mod api;
pub mod blocks;
pub mod client;
pub mod id;
pub mod properties;

pub use api::NotionApi;
pub use client::NotionClient;
pub use id::normalize_id;
