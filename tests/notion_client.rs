// HTTP-level behaviour of the Notion client against a mock server
use notion_mcp::{
    config::{McpConfig, NotionToken},
    McpError, NotionClient, ToolRegistry,
};
use serde_json::{json, Value};
use std::sync::Arc;
use wiremock::matchers::{body_partial_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const TOKEN: &str = "secret_test_token";
const PAGE_ID: &str = "1429989f-e8ac-4eff-bc8f-57f56486db54";
const DATABASE_ID: &str = "668d797c-76fa-4934-9b05-ad288df2d136";

fn config_for(base: String) -> McpConfig {
    let mut config = McpConfig::new(NotionToken::new(TOKEN).unwrap());
    config.api_base = base;
    config.request_timeout_secs = 5;
    config
}

fn registry_for(server: &MockServer) -> ToolRegistry {
    let client = NotionClient::new(&config_for(format!("{}/v1", server.uri()))).unwrap();
    ToolRegistry::new(Arc::new(client), 10).unwrap()
}

fn notion_error(status: u16, code: &str, message: &str) -> Value {
    json!({ "object": "error", "status": status, "code": code, "message": message })
}

#[tokio::test]
async fn get_page_sends_auth_headers_and_formats_result() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(format!("/v1/pages/{}", PAGE_ID)))
        .and(header("authorization", format!("Bearer {}", TOKEN).as_str()))
        .and(header("notion-version", "2022-06-28"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "object": "page",
            "id": PAGE_ID,
            "url": "https://www.notion.so/Roadmap-1429989fe8ac4effbc8f57f56486db54",
            "last_edited_time": "2024-02-10T08:00:00.000Z",
            "properties": {
                "title": {
                    "id": "title",
                    "type": "title",
                    "title": [{ "type": "text", "plain_text": "Roadmap" }]
                }
            }
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path(format!("/v1/blocks/{}/children", PAGE_ID)))
        .and(query_param("page_size", "100"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "object": "list",
            "results": [
                { "type": "heading_2", "heading_2": { "rich_text": [{ "plain_text": "Q3" }] } },
                { "type": "bulleted_list_item", "bulleted_list_item": { "rich_text": [{ "plain_text": "Ship v2" }] } }
            ],
            "has_more": false
        })))
        .expect(1)
        .mount(&server)
        .await;

    let tools = registry_for(&server);
    let output = tools
        .call_tool("get_page", json!({ "page_id": "1429989fe8ac4effbc8f57f56486db54" }))
        .await
        .unwrap();

    assert!(output.text.starts_with("# Roadmap"));
    assert!(output.text.contains(PAGE_ID));
    assert!(output.text.contains("## Q3\n- Ship v2"));
    assert_eq!(output.structured["page"]["id"], PAGE_ID);
}

#[tokio::test]
async fn unauthorized_responses_become_auth_errors_for_every_tool() {
    let server = MockServer::start().await;
    Mock::given(wiremock::matchers::any())
        .respond_with(
            ResponseTemplate::new(401)
                .set_body_json(notion_error(401, "unauthorized", "API token is invalid.")),
        )
        .mount(&server)
        .await;

    let tools = registry_for(&server);
    let calls = [
        ("search", json!({ "query": "x" })),
        ("get_page", json!({ "page_id": PAGE_ID })),
        ("create_page", json!({ "parent_id": PAGE_ID, "title": "New" })),
        ("append_content", json!({ "page_id": PAGE_ID, "content": "hello" })),
        ("list_databases", json!({})),
        ("query_database", json!({ "database_id": DATABASE_ID })),
        ("create_database_item", json!({ "database_id": DATABASE_ID, "properties": { "Name": "x" } })),
    ];

    for (tool, args) in calls {
        match tools.call_tool(tool, args).await {
            Err(McpError::AuthError(message)) => assert_eq!(message, "API token is invalid."),
            other => panic!("{} should fail with AuthError, got {:?}", tool, other),
        }
    }
}

#[tokio::test]
async fn throttled_responses_become_rate_limited() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/search"))
        .respond_with(
            ResponseTemplate::new(429)
                .insert_header("Retry-After", "12")
                .set_body_json(notion_error(429, "rate_limited", "You have been rate limited.")),
        )
        .mount(&server)
        .await;

    let tools = registry_for(&server);
    match tools.call_tool("search", json!({ "query": "x" })).await {
        Err(McpError::RateLimited { retry_after, .. }) => assert_eq!(retry_after, Some(12)),
        other => panic!("expected RateLimited, got {:?}", other),
    }
}

#[tokio::test]
async fn missing_objects_and_server_errors_are_distinguished() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(format!("/v1/databases/{}/query", DATABASE_ID)))
        .respond_with(ResponseTemplate::new(404).set_body_json(notion_error(
            404,
            "object_not_found",
            "Could not find database.",
        )))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/v1/search"))
        .respond_with(ResponseTemplate::new(503).set_body_string("service unavailable"))
        .mount(&server)
        .await;

    let tools = registry_for(&server);
    assert!(matches!(
        tools.call_tool("query_database", json!({ "database_id": DATABASE_ID })).await,
        Err(McpError::NotFound(_))
    ));
    match tools.call_tool("list_databases", json!({})).await {
        Err(McpError::UpstreamError { status, .. }) => assert_eq!(status, 503),
        other => panic!("expected UpstreamError, got {:?}", other),
    }
}

#[tokio::test]
async fn request_bodies_follow_notion_shapes() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/search"))
        .and(body_partial_json(json!({
            "query": "roadmap",
            "page_size": 5,
            "filter": { "property": "object", "value": "page" }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "results": [], "has_more": false })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path(format!("/v1/databases/{}/query", DATABASE_ID)))
        .and(body_partial_json(json!({
            "page_size": 10,
            "filter": { "property": "Name", "rich_text": { "contains": "milk" } },
            "sorts": [{ "property": "Due", "direction": "descending" }]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "results": [], "has_more": false })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/v1/pages"))
        .and(body_partial_json(json!({
            "parent": { "database_id": DATABASE_ID },
            "properties": {
                "Name": { "title": [{ "type": "text", "text": { "content": "Milk" } }] },
                "Done": { "checkbox": true }
            }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "object": "page",
            "id": PAGE_ID,
            "url": "https://www.notion.so/1429989fe8ac4effbc8f57f56486db54"
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("PATCH"))
        .and(path(format!("/v1/blocks/{}/children", PAGE_ID)))
        .and(body_partial_json(json!({
            "children": [{ "type": "paragraph", "paragraph": { "rich_text": [{ "type": "text", "text": { "content": "hello" } }] } }]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "object": "list",
            "results": [{ "object": "block", "type": "paragraph" }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let tools = registry_for(&server);

    let output = tools
        .call_tool("search", json!({ "query": "roadmap", "filter": "page", "page_size": 5 }))
        .await
        .unwrap();
    assert_eq!(output.text, "No matching pages or databases found.");

    tools
        .call_tool(
            "query_database",
            json!({
                "database_id": DATABASE_ID,
                "filter_property": "Name",
                "filter_value": "milk",
                "sort": { "property": "Due", "direction": "descending" }
            }),
        )
        .await
        .unwrap();

    let created = tools
        .call_tool(
            "create_database_item",
            json!({ "database_id": DATABASE_ID, "properties": { "Name": "Milk", "Done": true } }),
        )
        .await
        .unwrap();
    assert!(created.text.contains(PAGE_ID));

    let appended = tools
        .call_tool("append_content", json!({ "page_id": PAGE_ID, "content": "hello" }))
        .await
        .unwrap();
    assert_eq!(appended.structured["blocks_appended"], 1);
}

#[tokio::test]
async fn unreachable_api_is_a_network_error() {
    // Nothing listens on the discard port
    let client = NotionClient::new(&config_for("http://127.0.0.1:9/v1".to_string())).unwrap();
    let tools = ToolRegistry::new(Arc::new(client), 10).unwrap();

    assert!(matches!(
        tools.call_tool("list_databases", json!({})).await,
        Err(McpError::NetworkError(_))
    ));
}

#[tokio::test]
async fn create_page_under_a_database_uses_a_database_parent() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/pages"))
        .and(body_partial_json(json!({
            "parent": { "database_id": DATABASE_ID },
            "properties": {
                "title": { "title": [{ "type": "text", "text": { "content": "Sprint 14" } }] }
            },
            "children": [{ "type": "heading_2" }]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "object": "page",
            "id": PAGE_ID,
            "url": "https://www.notion.so/1429989fe8ac4effbc8f57f56486db54"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let tools = registry_for(&server);
    let created = tools
        .call_tool(
            "create_page",
            json!({
                "parent_id": "668d797c76fa49349b05ad288df2d136",
                "parent_type": "database_id",
                "title": "Sprint 14",
                "content": "## Goals"
            }),
        )
        .await
        .unwrap();
    assert!(created.text.contains(PAGE_ID));
}
