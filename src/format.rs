// Response Formatter - turns raw Notion JSON into agent-facing text and structured summaries
use crate::notion::blocks::{blocks_to_markdown, plain_text};
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::{json, Value};

const UNTITLED: &str = "Untitled";

/// Rendered tool payload: a text summary plus a machine-readable equivalent.
#[derive(Debug, Clone, PartialEq)]
pub struct ToolOutput {
    pub text: String,
    pub structured: Value,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EntitySummary {
    pub object: String,
    pub id: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_edited_time: Option<String>,
}

/// Title of a page (its `title`-typed property) or a database (its top-level `title`).
pub fn extract_title(entity: &Value) -> String {
    let title = if entity["object"] == "database" {
        plain_text(&entity["title"])
    } else {
        entity["properties"]
            .as_object()
            .and_then(|properties| {
                properties
                    .values()
                    .find(|property| property["type"] == "title" || property.get("title").is_some())
            })
            .map(|property| plain_text(&property["title"]))
            .unwrap_or_default()
    };

    if title.trim().is_empty() {
        UNTITLED.to_string()
    } else {
        title
    }
}

pub fn summarize(entity: &Value) -> EntitySummary {
    EntitySummary {
        object: entity["object"].as_str().unwrap_or("page").to_string(),
        id: entity["id"].as_str().unwrap_or_default().to_string(),
        title: extract_title(entity),
        url: entity["url"].as_str().map(str::to_string),
        last_edited_time: entity["last_edited_time"].as_str().map(str::to_string),
    }
}

fn results(response: &Value) -> &[Value] {
    response["results"].as_array().map(Vec::as_slice).unwrap_or_default()
}

fn pagination(response: &Value) -> (bool, Option<String>) {
    (
        response["has_more"].as_bool().unwrap_or(false),
        response["next_cursor"].as_str().map(str::to_string),
    )
}

fn display_time(raw: &str) -> String {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc).format("%Y-%m-%d %H:%M UTC").to_string())
        .unwrap_or_else(|_| raw.to_string())
}

fn summary_block(icon: &str, label: &str, summary: &EntitySummary) -> String {
    let mut text = format!("{} {}: {}\n   ID: {}", icon, label, summary.title, summary.id);
    if let Some(url) = &summary.url {
        text.push_str(&format!("\n   URL: {}", url));
    }
    if let Some(edited) = &summary.last_edited_time {
        text.push_str(&format!("\n   Last edited: {}", display_time(edited)));
    }
    text
}

fn more_hint(has_more: bool, next_cursor: &Option<String>) -> String {
    match (has_more, next_cursor) {
        (true, Some(cursor)) => format!("\n\nMore results available (start_cursor: {})", cursor),
        (true, None) => "\n\nMore results available".to_string(),
        _ => String::new(),
    }
}

fn listing(summaries: &[EntitySummary], has_more: bool, next_cursor: Option<String>) -> Value {
    json!({
        "results": summaries,
        "has_more": has_more,
        "next_cursor": next_cursor,
    })
}

pub fn format_search_results(response: &Value) -> ToolOutput {
    let summaries: Vec<EntitySummary> = results(response)
        .iter()
        .filter(|item| item["object"] == "page" || item["object"] == "database")
        .map(summarize)
        .collect();
    let (has_more, next_cursor) = pagination(response);

    let text = if summaries.is_empty() {
        "No matching pages or databases found.".to_string()
    } else {
        let entries: Vec<String> = summaries
            .iter()
            .map(|s| {
                if s.object == "database" {
                    summary_block("📊", "Database", s)
                } else {
                    summary_block("📄", "Page", s)
                }
            })
            .collect();
        entries.join("\n\n") + &more_hint(has_more, &next_cursor)
    };

    ToolOutput {
        text,
        structured: listing(&summaries, has_more, next_cursor),
    }
}

pub fn format_page(page: &Value, children: &Value) -> ToolOutput {
    let summary = summarize(page);
    let markdown = blocks_to_markdown(results(children));
    let (has_more, _) = pagination(children);

    let mut text = format!("# {}\n\nID: {}", summary.title, summary.id);
    if let Some(url) = &summary.url {
        text.push_str(&format!("\nURL: {}", url));
    }
    if let Some(edited) = &summary.last_edited_time {
        text.push_str(&format!("\nLast edited: {}", display_time(edited)));
    }
    text.push_str("\n\n");
    text.push_str(&markdown);
    if has_more {
        text.push_str("\n\n(Content truncated: the page has more blocks than were fetched.)");
    }

    ToolOutput {
        text,
        structured: json!({
            "page": summary,
            "content": markdown,
            "content_truncated": has_more,
        }),
    }
}

pub fn format_created_page(page: &Value) -> ToolOutput {
    let summary = summarize(page);
    let mut text = format!("✅ Page created\nTitle: {}\nID: {}", summary.title, summary.id);
    text.push_str(&format!("\nURL: {}", summary.url.as_deref().unwrap_or("N/A")));
    ToolOutput {
        text,
        structured: json!({ "page": summary }),
    }
}

pub fn format_appended(page_id: &str, response: &Value) -> ToolOutput {
    let count = results(response).len();
    ToolOutput {
        text: format!("✅ Appended {} block(s) to page {}", count, page_id),
        structured: json!({ "page_id": page_id, "blocks_appended": count }),
    }
}

pub fn format_databases(response: &Value) -> ToolOutput {
    let summaries: Vec<EntitySummary> = results(response)
        .iter()
        .filter(|item| item["object"] == "database")
        .map(summarize)
        .collect();
    let (has_more, next_cursor) = pagination(response);

    let text = if summaries.is_empty() {
        "No databases are shared with this integration.".to_string()
    } else {
        let entries: Vec<String> = summaries
            .iter()
            .map(|s| summary_block("📊", "Database", s))
            .collect();
        entries.join("\n\n") + &more_hint(has_more, &next_cursor)
    };

    ToolOutput {
        text,
        structured: listing(&summaries, has_more, next_cursor),
    }
}

pub fn format_query_results(response: &Value) -> ToolOutput {
    let items = results(response);
    let summaries: Vec<EntitySummary> = items.iter().map(summarize).collect();
    let (has_more, next_cursor) = pagination(response);

    let text = if summaries.is_empty() {
        "The database is empty or no items matched.".to_string()
    } else {
        let rows: Vec<String> = summaries
            .iter()
            .map(|s| format!("• {} (ID: {})", s.title, s.id))
            .collect();
        format!("Query returned {} item(s):\n{}", rows.len(), rows.join("\n"))
            + &more_hint(has_more, &next_cursor)
    };

    let rows: Vec<Value> = items
        .iter()
        .zip(&summaries)
        .map(|(item, summary)| {
            json!({
                "id": summary.id,
                "title": summary.title,
                "url": summary.url,
                "last_edited_time": summary.last_edited_time,
                "properties": item["properties"],
            })
        })
        .collect();

    ToolOutput {
        text,
        structured: json!({
            "results": rows,
            "has_more": has_more,
            "next_cursor": next_cursor,
        }),
    }
}

pub fn format_created_item(page: &Value) -> ToolOutput {
    let summary = summarize(page);
    let mut text = format!("✅ Database item created\nID: {}", summary.id);
    if let Some(url) = &summary.url {
        text.push_str(&format!("\nURL: {}", url));
    }
    ToolOutput {
        text,
        structured: json!({ "item": summary }),
    }
}
