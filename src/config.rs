// MCP Service Configuration
use anyhow::{bail, Context, Result};
use std::fmt;

pub const DEFAULT_API_BASE: &str = "https://api.notion.com/v1";
pub const DEFAULT_NOTION_VERSION: &str = "2022-06-28";

/// Notion integration token. Never printed.
#[derive(Clone, PartialEq, Eq)]
pub struct NotionToken(String);

impl NotionToken {
    pub fn new(token: impl Into<String>) -> Result<Self> {
        let token = token.into().trim().to_string();
        if token.is_empty() {
            bail!("NOTION_TOKEN is empty");
        }
        Ok(Self(token))
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for NotionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("NotionToken(***)")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Json,
}

#[derive(Debug, Clone)]
pub struct McpConfig {
    pub notion_token: NotionToken,
    pub api_base: String,
    pub notion_version: String,

    // Timeouts
    pub request_timeout_secs: u64,

    // Defaults for paginated tools
    pub default_page_size: u32,

    // Health endpoint, disabled unless a port is given
    pub health_port: Option<u16>,
    pub log_format: LogFormat,
}

impl McpConfig {
    pub fn new(notion_token: NotionToken) -> Self {
        Self {
            notion_token,
            api_base: DEFAULT_API_BASE.to_string(),
            notion_version: DEFAULT_NOTION_VERSION.to_string(),
            request_timeout_secs: 30,
            default_page_size: 10,
            health_port: None,
            log_format: LogFormat::Pretty,
        }
    }

    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup so tests need not touch the
    /// process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let token = lookup("NOTION_TOKEN").context(
            "NOTION_TOKEN environment variable not set; create an internal integration at \
             https://www.notion.so/my-integrations",
        )?;
        let mut config = Self::new(NotionToken::new(token)?);

        if let Some(base) = lookup("NOTION_API_BASE") {
            config.api_base = base.trim_end_matches('/').to_string();
        }
        if let Some(version) = lookup("NOTION_VERSION") {
            config.notion_version = version;
        }
        if let Some(secs) = lookup("NOTION_REQUEST_TIMEOUT_SECS") {
            config.request_timeout_secs = secs
                .parse()
                .context("NOTION_REQUEST_TIMEOUT_SECS must be a whole number of seconds")?;
        }
        if let Some(size) = lookup("NOTION_DEFAULT_PAGE_SIZE") {
            let size: u32 = size
                .parse()
                .context("NOTION_DEFAULT_PAGE_SIZE must be a number")?;
            if !(1..=100).contains(&size) {
                bail!("NOTION_DEFAULT_PAGE_SIZE must be between 1 and 100, got {}", size);
            }
            config.default_page_size = size;
        }
        if let Some(port) = lookup("MCP_HEALTH_PORT") {
            config.health_port = Some(port.parse().context("MCP_HEALTH_PORT must be a port number")?);
        }
        config.log_format = match lookup("MCP_LOG_FORMAT").as_deref() {
            Some("json") => LogFormat::Json,
            Some("pretty") | None => LogFormat::Pretty,
            Some(other) => bail!("MCP_LOG_FORMAT must be 'pretty' or 'json', got '{}'", other),
        };

        Ok(config)
    }
}
