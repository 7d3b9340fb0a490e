// Property Conversion - simple agent values to Notion property values
use super::blocks::rich_text;
use crate::errors::{McpError, McpResult};
use serde_json::{json, Map, Value};

/// Converts `{name: value}` pairs into Notion property values.
///
/// - objects are assumed to already be Notion property values and pass through
/// - strings become the title (`title_property`, or else the first string) or rich text
/// - booleans become checkboxes, numbers become numbers
/// - arrays of strings become multi-selects
/// - nulls are dropped
pub fn to_notion_properties(
    properties: &Map<String, Value>,
    title_property: Option<&str>,
) -> McpResult<Map<String, Value>> {
    if let Some(title) = title_property {
        match properties.get(title) {
            Some(Value::String(_)) => {}
            Some(_) => {
                return Err(McpError::InvalidParameters(format!(
                    "title property `{}` must be a string",
                    title
                )))
            }
            None => {
                return Err(McpError::InvalidParameters(format!(
                    "title property `{}` is missing from `properties`",
                    title
                )))
            }
        }
    }

    let mut converted = Map::new();
    let mut title_assigned = title_property.is_some();

    for (name, value) in properties {
        let property = match value {
            Value::Null => continue,
            Value::Object(_) => value.clone(),
            Value::String(text) => {
                let is_title = match title_property {
                    Some(title) => title == name,
                    None => !title_assigned,
                };
                if is_title {
                    title_assigned = true;
                    json!({ "title": rich_text(text) })
                } else {
                    json!({ "rich_text": rich_text(text) })
                }
            }
            Value::Bool(checked) => json!({ "checkbox": checked }),
            Value::Number(number) => json!({ "number": number }),
            Value::Array(items) => {
                let options = items
                    .iter()
                    .map(|item| {
                        item.as_str()
                            .map(|option| json!({ "name": option }))
                            .ok_or_else(|| {
                                McpError::InvalidParameters(format!(
                                    "property `{}`: list values must be strings",
                                    name
                                ))
                            })
                    })
                    .collect::<McpResult<Vec<_>>>()?;
                json!({ "multi_select": options })
            }
        };
        converted.insert(name.clone(), property);
    }

    Ok(converted)
}
