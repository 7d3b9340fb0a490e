// Block Conversion - a small Markdown subset to Notion blocks and back
use serde_json::{json, Value};

/// Notion rejects rich text objects whose content exceeds 2000 characters.
const MAX_RICH_TEXT_CHARS: usize = 2000;

/// Builds a rich text array for plain content, splitting long strings across objects.
pub fn rich_text(content: &str) -> Vec<Value> {
    let chars: Vec<char> = content.chars().collect();
    if chars.is_empty() {
        return vec![];
    }
    chars
        .chunks(MAX_RICH_TEXT_CHARS)
        .map(|chunk| {
            let text: String = chunk.iter().collect();
            json!({ "type": "text", "text": { "content": text } })
        })
        .collect()
}

/// Concatenates the plain text of a rich text array.
///
/// Request-shaped objects (no `plain_text`) fall back to `text.content`.
pub fn plain_text(rich_text: &Value) -> String {
    rich_text
        .as_array()
        .map(|parts| {
            parts
                .iter()
                .map(|part| {
                    part.get("plain_text")
                        .and_then(Value::as_str)
                        .or_else(|| part.pointer("/text/content").and_then(Value::as_str))
                        .unwrap_or_default()
                })
                .collect()
        })
        .unwrap_or_default()
}

fn text_block(block_type: &str, content: &str) -> Value {
    let mut block = json!({ "object": "block", "type": block_type });
    block[block_type] = json!({ "rich_text": rich_text(content) });
    block
}

fn code_block(language: &str, lines: &[&str]) -> Value {
    json!({
        "object": "block",
        "type": "code",
        "code": {
            "rich_text": rich_text(&lines.join("\n")),
            "language": code_language(language),
        }
    })
}

/// Notion only accepts languages from a fixed list; common fence aliases are mapped onto it.
fn code_language(fence: &str) -> &'static str {
    match fence.trim().to_ascii_lowercase().as_str() {
        "rust" | "rs" => "rust",
        "python" | "py" => "python",
        "javascript" | "js" => "javascript",
        "typescript" | "ts" => "typescript",
        "bash" | "sh" | "shell" | "zsh" => "shell",
        "json" => "json",
        "yaml" | "yml" => "yaml",
        "toml" => "toml",
        "html" => "html",
        "css" => "css",
        "sql" => "sql",
        "go" => "go",
        "java" => "java",
        "c" => "c",
        "cpp" | "c++" => "c++",
        "markdown" | "md" => "markdown",
        _ => "plain text",
    }
}

/// Splits `1. item` into `item`.
fn numbered_item(line: &str) -> Option<&str> {
    let digits = line.chars().take_while(char::is_ascii_digit).count();
    if digits == 0 {
        return None;
    }
    line[digits..].strip_prefix(". ")
}

/// Converts Markdown to Notion block objects.
///
/// Supported: `#`/`##`/`###` headings, `-`/`*` bullets, `- [ ]`/`- [x]` to-dos, `1.` numbered
/// items, `>` quotes, `---` dividers and fenced code. Every other non-blank line becomes a
/// paragraph.
pub fn markdown_to_blocks(content: &str) -> Vec<Value> {
    let mut blocks = Vec::new();
    let mut fence: Option<(String, Vec<&str>)> = None;

    for raw in content.lines() {
        if let Some((language, lines)) = fence.as_mut() {
            if raw.trim_start().starts_with("```") {
                blocks.push(code_block(language, lines));
                fence = None;
            } else {
                lines.push(raw);
            }
            continue;
        }

        let line = raw.trim_end();
        if line.trim().is_empty() {
            continue;
        }

        if let Some(language) = line.trim_start().strip_prefix("```") {
            fence = Some((language.to_string(), Vec::new()));
        } else if let Some(text) = line.strip_prefix("### ") {
            blocks.push(text_block("heading_3", text));
        } else if let Some(text) = line.strip_prefix("## ") {
            blocks.push(text_block("heading_2", text));
        } else if let Some(text) = line.strip_prefix("# ") {
            blocks.push(text_block("heading_1", text));
        } else if let Some((checked, text)) = line
            .strip_prefix("- [ ] ")
            .map(|t| (false, t))
            .or_else(|| line.strip_prefix("- [x] ").map(|t| (true, t)))
            .or_else(|| line.strip_prefix("- [X] ").map(|t| (true, t)))
        {
            blocks.push(json!({
                "object": "block",
                "type": "to_do",
                "to_do": { "rich_text": rich_text(text), "checked": checked }
            }));
        } else if let Some(text) = line.strip_prefix("- ").or_else(|| line.strip_prefix("* ")) {
            blocks.push(text_block("bulleted_list_item", text));
        } else if let Some(text) = numbered_item(line) {
            blocks.push(text_block("numbered_list_item", text));
        } else if let Some(text) = line.strip_prefix("> ") {
            blocks.push(text_block("quote", text));
        } else if line.trim() == "---" {
            blocks.push(json!({ "object": "block", "type": "divider", "divider": {} }));
        } else {
            blocks.push(text_block("paragraph", line));
        }
    }

    // An unterminated fence still keeps its content
    if let Some((language, lines)) = fence {
        blocks.push(code_block(&language, &lines));
    }

    blocks
}

/// Renders Notion blocks as Markdown. Unsupported block types are skipped.
pub fn blocks_to_markdown(blocks: &[Value]) -> String {
    let mut lines = Vec::new();
    let mut number = 0;

    for block in blocks {
        let block_type = block.get("type").and_then(Value::as_str).unwrap_or_default();
        let body = block.get(block_type).unwrap_or(&Value::Null);
        let text = plain_text(&body["rich_text"]);

        if block_type == "numbered_list_item" {
            number += 1;
        } else {
            number = 0;
        }

        let line = match block_type {
            "paragraph" => text,
            "heading_1" => format!("# {}", text),
            "heading_2" => format!("## {}", text),
            "heading_3" => format!("### {}", text),
            "bulleted_list_item" => format!("- {}", text),
            "numbered_list_item" => format!("{}. {}", number, text),
            "quote" => format!("> {}", text),
            "callout" => format!("> {}", text),
            "toggle" => format!("- {}", text),
            "to_do" => {
                let checked = body["checked"].as_bool().unwrap_or(false);
                format!("- [{}] {}", if checked { "x" } else { " " }, text)
            }
            "code" => {
                let language = body["language"].as_str().unwrap_or_default();
                let language = if language == "plain text" { "" } else { language };
                format!("```{}\n{}\n```", language, text)
            }
            "divider" => "---".to_string(),
            "child_page" => format!(
                "[Page: {}]",
                body["title"].as_str().unwrap_or("Untitled")
            ),
            "child_database" => format!(
                "[Database: {}]",
                body["title"].as_str().unwrap_or("Untitled")
            ),
            _ => continue,
        };
        lines.push(line);
    }

    lines.join("\n")
}
