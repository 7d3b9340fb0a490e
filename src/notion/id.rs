// Notion IDs - accepts hyphenated, compact, or URL forms
use crate::errors::{McpError, McpResult};
use uuid::Uuid;

/// Normalizes a page or database id to the hyphenated UUID form.
///
/// Agents frequently paste share links such as
/// `https://www.notion.so/workspace/Roadmap-1429989fe8ac4effbc8f57f56486db54?pvs=4`,
/// so the trailing 32 hex digits of the last path segment are accepted as well.
pub fn normalize_id(raw: &str, field: &str) -> McpResult<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(McpError::InvalidParameters(format!(
            "`{}` must not be empty",
            field
        )));
    }

    if let Ok(id) = Uuid::try_parse(trimmed) {
        return Ok(id.hyphenated().to_string());
    }

    let path = trimmed
        .split(|c: char| c == '?' || c == '#')
        .next()
        .unwrap_or(trimmed);
    let segment = path
        .trim_end_matches('/')
        .rsplit('/')
        .next()
        .unwrap_or(path);
    let compact: String = segment.chars().filter(|c| *c != '-').collect();

    if compact.len() >= 32 {
        let start = compact.len() - 32;
        if compact.is_char_boundary(start) {
            if let Ok(id) = Uuid::try_parse(&compact[start..]) {
                return Ok(id.hyphenated().to_string());
            }
        }
    }

    Err(McpError::InvalidParameters(format!(
        "`{}` is not a valid Notion id: {}",
        field, trimmed
    )))
}
