//! MCP request dispatch for the `cascade_thinking` tool.
//!
//! Requests are handled strictly one at a time against a single [`Engine`];
//! stdout carries nothing but reply frames.

use anyhow::Result;
use serde_json::{Value, json};
use tokio::io::{AsyncRead, AsyncWrite};

use cascade_core::{Engine, EngineOptions};
use cascade_tools::{TOOL_NAME, tool_definition};

use crate::protocol::{
    JsonRpcError, JsonRpcId, JsonRpcMessage, JsonRpcResponse, McpToolDef, McpToolResult,
    PROTOCOL_VERSION, SERVER_NAME, ToolCallParams, error_codes,
};
use crate::transport::{LineReader, LineWriter};

#[derive(Debug, Default)]
pub struct Server {
    engine: Engine,
}

impl Server {
    #[must_use]
    pub fn new(options: EngineOptions) -> Self {
        Self {
            engine: Engine::with_options(options),
        }
    }

    #[must_use]
    pub fn engine(&self) -> &Engine {
        &self.engine
    }

    /// Serve until the reader reaches EOF.
    pub async fn run<R, W>(&mut self, reader: R, writer: W) -> Result<()>
    where
        R: AsyncRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let mut reader = LineReader::new(reader);
        let mut writer = LineWriter::new(writer);

        while let Some(frame) = reader.read_frame().await? {
            if let Some(reply) = self.handle_frame(&frame) {
                writer.write_frame(&reply).await?;
            }
        }

        tracing::info!("stdin closed, shutting down");
        Ok(())
    }

    /// Handle one frame as read off the wire. Returns `None` for notifications.
    pub fn handle_frame(&mut self, frame: &[u8]) -> Option<JsonRpcResponse> {
        match str::from_utf8(frame) {
            Ok(line) => self.handle_line(line),
            Err(err) => {
                tracing::debug!(error = %err, "frame is not UTF-8");
                Some(JsonRpcResponse::error(
                    None,
                    JsonRpcError::new(error_codes::PARSE_ERROR, format!("Parse error: {err}")),
                ))
            }
        }
    }

    /// Handle one frame of text. Returns `None` for notifications.
    pub fn handle_line(&mut self, line: &str) -> Option<JsonRpcResponse> {
        let value: Value = match serde_json::from_str(line) {
            Ok(value) => value,
            Err(err) => {
                tracing::debug!(error = %err, "unparseable frame");
                return Some(JsonRpcResponse::error(
                    None,
                    JsonRpcError::new(error_codes::PARSE_ERROR, format!("Parse error: {err}")),
                ));
            }
        };

        match serde_json::from_value::<JsonRpcMessage>(value.clone()) {
            Ok(message) => self.handle(message),
            Err(err) => {
                let id = value
                    .get("id")
                    .and_then(|id| serde_json::from_value::<JsonRpcId>(id.clone()).ok());
                Some(JsonRpcResponse::error(
                    id,
                    JsonRpcError::new(
                        error_codes::INVALID_REQUEST,
                        format!("Invalid request: {err}"),
                    ),
                ))
            }
        }
    }

    pub fn handle(&mut self, message: JsonRpcMessage) -> Option<JsonRpcResponse> {
        if message.is_notification() {
            tracing::debug!(method = %message.method, "notification");
            return None;
        }

        tracing::debug!(method = %message.method, "request");
        let id = message.id;
        let reply = match message.method.as_str() {
            "initialize" => Ok(initialize_result()),
            "ping" => Ok(json!({})),
            "tools/list" => Ok(tools_list_result()),
            "tools/call" => self.call_tool(message.params),
            other => Err(JsonRpcError::new(
                error_codes::METHOD_NOT_FOUND,
                format!("Method not found: {other}"),
            )),
        };

        Some(match reply {
            Ok(result) => JsonRpcResponse::success(id, result),
            Err(error) => JsonRpcResponse::error(id, error),
        })
    }

    fn call_tool(&mut self, params: Option<Value>) -> Result<Value, JsonRpcError> {
        let params: ToolCallParams = serde_json::from_value(params.unwrap_or(Value::Null))
            .map_err(|err| {
                JsonRpcError::new(error_codes::INVALID_PARAMS, format!("Invalid params: {err}"))
            })?;

        let result = if params.name == TOOL_NAME {
            let outcome = self.engine.process_thought(&params.arguments);
            let text = outcome.to_pretty_json().map_err(internal_error)?;
            McpToolResult::text(text, outcome.is_error())
        } else {
            tracing::debug!(tool = %params.name, "unknown tool");
            McpToolResult::text(format!("Unknown tool: {}", params.name), true)
        };

        serde_json::to_value(result).map_err(internal_error)
    }
}

fn internal_error(err: serde_json::Error) -> JsonRpcError {
    JsonRpcError::new(error_codes::INTERNAL_ERROR, format!("Internal error: {err}"))
}

fn initialize_result() -> Value {
    json!({
        "protocolVersion": PROTOCOL_VERSION,
        "capabilities": { "tools": {} },
        "serverInfo": {
            "name": SERVER_NAME,
            "version": env!("CARGO_PKG_VERSION"),
        },
    })
}

fn tools_list_result() -> Value {
    let tool = tool_definition();
    let def = McpToolDef {
        name: tool.name,
        description: Some(tool.description),
        input_schema: tool.parameters,
    };
    json!({ "tools": [def] })
}
