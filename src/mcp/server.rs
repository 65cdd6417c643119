//! Stdio JSON-RPC server
//!
//! Reads one JSON-RPC request per line, dispatches `initialize`,
//! `tools/list` and `tools/call`, and writes one response per line. Logs go
//! to stderr; stdout carries only responses.

use serde_json::{json, Value};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tracing::{debug, error, info, warn};

use crate::mcp::protocol::*;
use crate::storage::DocumentStore;
use crate::tools;
use crate::{HabitLedger, LedgerError};

/// Tool server over a ledger
pub struct McpServer<S: DocumentStore> {
    ledger: HabitLedger<S>,
    initialized: bool,
}

impl<S: DocumentStore> McpServer<S> {
    pub fn new(ledger: HabitLedger<S>) -> Self {
        Self {
            ledger,
            initialized: false,
        }
    }

    pub fn ledger(&self) -> &HabitLedger<S> {
        &self.ledger
    }

    /// Whether the client has sent `notifications/initialized`
    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Serve stdin/stdout until stdin closes
    pub async fn run(&mut self) -> Result<(), LedgerError> {
        info!("Starting server, waiting for JSON-RPC requests on stdin...");
        let reader = BufReader::new(tokio::io::stdin());
        let writer = tokio::io::stdout();
        self.serve(reader, writer).await
    }

    /// Serve any line-oriented reader/writer pair until the reader is exhausted
    pub async fn serve<R, W>(&mut self, mut reader: R, mut writer: W) -> Result<(), LedgerError>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let mut line = String::new();

        loop {
            line.clear();

            match reader.read_line(&mut line).await {
                Ok(0) => {
                    info!("Server shutting down (input closed)");
                    break;
                }
                Ok(_) => {
                    if let Some(response) = self.process_line(&line) {
                        let response_str = serde_json::to_string(&response)?;

                        writer.write_all(response_str.as_bytes()).await?;
                        writer.write_all(b"\n").await?;
                        writer.flush().await?;

                        debug!("Sent response: {}", response_str);
                    }
                }
                Err(e) => {
                    error!("Failed to read request: {}", e);
                    return Err(e.into());
                }
            }
        }

        Ok(())
    }

    /// Handle one line of input; `None` for blank lines and notifications
    pub fn process_line(&mut self, line: &str) -> Option<JsonRpcResponse> {
        let line = line.trim();
        if line.is_empty() {
            return None;
        }

        debug!("Processing request: {}", line);

        let request: JsonRpcRequest = match serde_json::from_str(line) {
            Ok(req) => req,
            Err(e) => {
                warn!("Failed to parse JSON-RPC request: {}", e);
                return Some(JsonRpcResponse::error(
                    Value::Null,
                    error_codes::PARSE_ERROR,
                    format!("Invalid JSON: {}", e),
                    None,
                ));
            }
        };

        let Some(id) = request.id.clone() else {
            self.handle_notification(&request);
            return None;
        };

        if request.jsonrpc != "2.0" {
            return Some(JsonRpcResponse::error(
                id,
                error_codes::INVALID_REQUEST,
                format!("Unsupported jsonrpc version '{}'", request.jsonrpc),
                None,
            ));
        }

        Some(self.handle_request(id, request))
    }

    fn handle_notification(&mut self, request: &JsonRpcRequest) {
        match request.method.as_str() {
            "notifications/initialized" | "initialized" => {
                self.initialized = true;
                info!("Client finished initialization");
            }
            other => debug!("Ignoring notification '{}'", other),
        }
    }

    fn handle_request(&mut self, id: Value, request: JsonRpcRequest) -> JsonRpcResponse {
        match request.method.as_str() {
            "initialize" => self.handle_initialize(id),
            "ping" => JsonRpcResponse::success(id, json!({})),
            "tools/list" => JsonRpcResponse::success(id, json!({ "tools": tools::definitions() })),
            "tools/call" => self.handle_tools_call(id, request.params),
            _ => JsonRpcResponse::error(
                id,
                error_codes::METHOD_NOT_FOUND,
                format!("Method '{}' not found", request.method),
                None,
            ),
        }
    }

    fn handle_initialize(&mut self, id: Value) -> JsonRpcResponse {
        info!("Client connected");

        let result = InitializeResult {
            protocol_version: PROTOCOL_VERSION.to_string(),
            capabilities: ServerCapabilities {
                tools: Some(ToolsCapability {
                    list_changed: false,
                }),
            },
            server_info: ServerInfo {
                name: "habit-ledger".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
            },
        };

        to_response(id, &result)
    }

    fn handle_tools_call(&mut self, id: Value, params: Option<Value>) -> JsonRpcResponse {
        let Some(params) = params else {
            return JsonRpcResponse::error(
                id,
                error_codes::INVALID_PARAMS,
                "Missing parameters".to_string(),
                None,
            );
        };
        let call: ToolCallParams = match serde_json::from_value(params) {
            Ok(call) => call,
            Err(e) => {
                return JsonRpcResponse::error(
                    id,
                    error_codes::INVALID_PARAMS,
                    format!("Invalid parameters: {}", e),
                    None,
                );
            }
        };

        match tools::call(&self.ledger, &call.name, call.arguments) {
            Ok(response) => to_response(id, &ToolCallResult::success(response.message, response.data)),
            Err(e) => {
                warn!("Tool '{}' failed: {}", call.name, e);
                JsonRpcResponse::error(
                    id,
                    tool_error_code(&e),
                    e.to_string(),
                    Some(json!({ "tool": call.name })),
                )
            }
        }
    }
}

fn to_response<T: serde::Serialize>(id: Value, result: &T) -> JsonRpcResponse {
    match serde_json::to_value(result) {
        Ok(value) => JsonRpcResponse::success(id, value),
        Err(e) => JsonRpcResponse::error(
            id,
            error_codes::INTERNAL_ERROR,
            format!("Failed to serialize result: {}", e),
            None,
        ),
    }
}
