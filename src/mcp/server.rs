// MCP Server - JSON-RPC over stdio, one task per request
use crate::{
    errors::{McpError, McpResult},
    mcp::types::*,
    tools::ToolRegistry,
};
use anyhow::Result;
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Instant;
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::sync::mpsc;
use tokio::task::JoinSet;
use tracing::{debug, error, info, warn};

pub struct McpServer {
    handler: Arc<RequestHandler>,
}

impl McpServer {
    pub fn new(registry: ToolRegistry) -> Self {
        Self {
            handler: Arc::new(RequestHandler { registry }),
        }
    }

    pub async fn run(self) -> Result<()> {
        info!("🔗 Notion MCP Server starting on stdio");
        info!(
            "🔌 {} tools available",
            self.handler.registry.tool_count()
        );
        self.serve(tokio::io::stdin(), tokio::io::stdout()).await
    }

    /// Serves newline-delimited JSON-RPC until the reader hits EOF.
    ///
    /// Requests run concurrently; responses are written by a single task so lines
    /// never interleave. In-flight requests are allowed to finish after EOF.
    pub async fn serve<R, W>(self, reader: R, writer: W) -> Result<()>
    where
        R: AsyncRead + Unpin,
        W: AsyncWrite + Unpin + Send + 'static,
    {
        let (tx, rx) = mpsc::unbounded_channel::<JsonRpcResponse>();
        let writer_task = tokio::spawn(write_responses(writer, rx));

        let mut reader = BufReader::new(reader);
        let mut buf = Vec::new();
        let mut in_flight = JoinSet::new();

        loop {
            tokio::select! {
                // Partial reads stay in `buf`, so losing the race to join_next is fine
                read = reader.read_until(b'\n', &mut buf) => {
                    if read? == 0 && buf.is_empty() {
                        break; // EOF
                    }
                    let line = match String::from_utf8(std::mem::take(&mut buf)) {
                        Ok(line) => line,
                        Err(e) => {
                            warn!("Message is not valid UTF-8: {}", e);
                            // The writer only goes away when stdout is gone
                            let _ = tx.send(JsonRpcResponse::error(
                                None,
                                &McpError::ParseError(e.to_string()),
                            ));
                            continue;
                        }
                    };
                    let line = line.trim().to_string();
                    if line.is_empty() {
                        continue;
                    }

                    debug!("📨 Received request: {}", line);

                    let handler = Arc::clone(&self.handler);
                    let tx = tx.clone();
                    in_flight.spawn(async move {
                        if let Some(response) = handler.handle_message(&line).await {
                            // The writer only goes away when stdout is gone
                            let _ = tx.send(response);
                        }
                    });
                }
                Some(joined) = in_flight.join_next(), if !in_flight.is_empty() => {
                    if let Err(e) = joined {
                        error!("❌ Request task failed: {}", e);
                    }
                }
            }
        }

        while let Some(joined) = in_flight.join_next().await {
            if let Err(e) = joined {
                error!("❌ Request task failed: {}", e);
            }
        }
        drop(tx);
        writer_task.await??;

        info!("MCP Server shutting down");
        Ok(())
    }
}

async fn write_responses<W>(mut writer: W, mut rx: mpsc::UnboundedReceiver<JsonRpcResponse>) -> Result<()>
where
    W: AsyncWrite + Unpin,
{
    while let Some(response) = rx.recv().await {
        let response_str = serde_json::to_string(&response)?;
        debug!("📤 Sending response: {}", response_str);

        writer.write_all(response_str.as_bytes()).await?;
        writer.write_all(b"\n").await?;
        writer.flush().await?;
    }
    Ok(())
}

struct RequestHandler {
    registry: ToolRegistry,
}

impl RequestHandler {
    /// Returns `None` for notifications.
    async fn handle_message(&self, message: &str) -> Option<JsonRpcResponse> {
        let value: Value = match serde_json::from_str(message) {
            Ok(value) => value,
            Err(e) => {
                warn!("Unparseable message: {}", e);
                return Some(JsonRpcResponse::error(None, &McpError::ParseError(e.to_string())));
            }
        };

        let id = value.get("id").cloned().filter(|id| !id.is_null());
        let request: JsonRpcRequest = match serde_json::from_value(value) {
            Ok(request) => request,
            Err(e) => {
                return Some(JsonRpcResponse::error(
                    id,
                    &McpError::InvalidRequest(e.to_string()),
                ))
            }
        };

        let Some(id) = request.id else {
            debug!(method = %request.method, "Notification received");
            return None;
        };

        let result = match request.method.as_str() {
            "initialize" => self.initialize(request.params),
            "ping" => Ok(json!({})),
            "tools/list" => self.list_tools(),
            "tools/call" => self.call_tool(request.params).await,
            _ => Err(McpError::MethodNotFound(request.method.clone())),
        };

        Some(match result {
            Ok(value) => JsonRpcResponse::result(Some(id), value),
            Err(e) => {
                error!("❌ Error handling {}: {}", request.method, e);
                JsonRpcResponse::error(Some(id), &e)
            }
        })
    }

    fn initialize(&self, params: Option<Value>) -> McpResult<Value> {
        info!("🔧 Initializing MCP connection");

        let client_info = params
            .and_then(|p| p.get("clientInfo").cloned())
            .and_then(|c| serde_json::from_value::<ClientInfo>(c).ok());

        if let Some(info) = &client_info {
            info!("👤 Client: {} v{}", info.name, info.version);
        }

        Ok(json!({
            "protocolVersion": PROTOCOL_VERSION,
            "capabilities": {
                "tools": {
                    "listChanged": false
                }
            },
            "serverInfo": {
                "name": "notion-mcp",
                "version": env!("CARGO_PKG_VERSION")
            }
        }))
    }

    fn list_tools(&self) -> McpResult<Value> {
        let tools = self.registry.list_tools();
        Ok(json!({ "tools": tools }))
    }

    async fn call_tool(&self, params: Option<Value>) -> McpResult<Value> {
        let call_request: ToolCallRequest = serde_json::from_value(
            params.ok_or_else(|| McpError::InvalidParams("Missing params".to_string()))?,
        )
        .map_err(|e| McpError::InvalidParams(e.to_string()))?;

        let started = Instant::now();
        let outcome = self
            .registry
            .call_tool(&call_request.name, call_request.arguments)
            .await;
        let elapsed_ms = started.elapsed().as_millis() as u64;

        let tool_result = match outcome {
            Ok(output) => {
                info!(tool = %call_request.name, elapsed_ms, "✅ Tool call succeeded");
                ToolCallResult::success(output)
            }
            Err(e) if e.is_tool_error() => {
                warn!(tool = %call_request.name, elapsed_ms, code = e.code(), "Tool call failed: {}", e);
                ToolCallResult::error(&e)
            }
            Err(e) => return Err(e),
        };
        serde_json::to_value(tool_result)
            .map_err(|e| McpError::Internal(format!("Failed to encode tool result: {}", e)))
    }
}
