//! JSON-RPC 2.0 message structures for the stdio tool server
//!
//! One request per line in, one response per line out.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::DomainError;
use crate::tools::ToolError;
use crate::LedgerError;

/// Protocol version reported on `initialize`
pub const PROTOCOL_VERSION: &str = "2024-11-05";

/// JSON-RPC 2.0 request message
#[derive(Debug, Deserialize)]
pub struct JsonRpcRequest {
    /// JSON-RPC version (always "2.0")
    pub jsonrpc: String,
    /// Absent for notifications, which get no response
    #[serde(default)]
    pub id: Option<Value>,
    pub method: String,
    #[serde(default)]
    pub params: Option<Value>,
}

/// JSON-RPC 2.0 response message
///
/// Carries either a result or an error, never both.
#[derive(Debug, Serialize)]
pub struct JsonRpcResponse {
    pub jsonrpc: String,
    pub id: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<JsonRpcError>,
}

#[derive(Debug, Serialize)]
pub struct JsonRpcError {
    pub code: i32,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

/// `tools/call` parameters
#[derive(Debug, Deserialize)]
pub struct ToolCallParams {
    pub name: String,
    #[serde(default)]
    pub arguments: Value,
}

/// `tools/call` result: a text rendering plus the structured value
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolCallResult {
    pub content: Vec<ToolContent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub structured_content: Option<Value>,
    pub is_error: bool,
}

#[derive(Debug, Serialize)]
pub struct ToolContent {
    #[serde(rename = "type")]
    pub content_type: String,
    pub text: String,
}

/// One entry of `tools/list`
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolDefinition {
    pub name: String,
    pub description: String,
    /// JSON Schema of the tool's arguments
    pub input_schema: Value,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerCapabilities {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tools: Option<ToolsCapability>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolsCapability {
    pub list_changed: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InitializeResult {
    pub protocol_version: String,
    pub capabilities: ServerCapabilities,
    pub server_info: ServerInfo,
}

#[derive(Debug, Serialize)]
pub struct ServerInfo {
    pub name: String,
    pub version: String,
}

// JSON-RPC error codes
pub mod error_codes {
    /// Parse error - Invalid JSON was received by the server
    pub const PARSE_ERROR: i32 = -32700;
    /// Invalid Request - The JSON sent is not a valid Request object
    pub const INVALID_REQUEST: i32 = -32600;
    /// Method not found - The requested method (or tool) doesn't exist
    pub const METHOD_NOT_FOUND: i32 = -32601;
    /// Invalid parameters - Method exists but parameters are wrong
    pub const INVALID_PARAMS: i32 = -32602;
    /// Internal error - Internal JSON-RPC error
    pub const INTERNAL_ERROR: i32 = -32603;

    // Application-specific codes, in the -32000 to -32099 range
    /// A habit or obligation id that does not exist
    pub const UNKNOWN_ID: i32 = -32001;
    /// A habit name already in use
    pub const DUPLICATE_NAME: i32 = -32002;
    /// Bad date, status, name or other input
    pub const VALIDATION_ERROR: i32 = -32003;
    /// The document store failed
    pub const STORAGE_ERROR: i32 = -32004;
}

impl JsonRpcResponse {
    pub fn success(id: Value, result: Value) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            id,
            result: Some(result),
            error: None,
        }
    }

    pub fn error(id: Value, code: i32, message: String, data: Option<Value>) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            id,
            result: None,
            error: Some(JsonRpcError {
                code,
                message,
                data,
            }),
        }
    }
}

impl ToolCallResult {
    pub fn success(text: String, structured: Value) -> Self {
        Self {
            content: vec![ToolContent {
                content_type: "text".to_string(),
                text,
            }],
            structured_content: Some(structured),
            is_error: false,
        }
    }
}

/// JSON-RPC error code for a failed tool call
pub fn tool_error_code(error: &ToolError) -> i32 {
    match error {
        ToolError::UnknownTool(_) => error_codes::METHOD_NOT_FOUND,
        ToolError::InvalidArguments { .. } => error_codes::INVALID_PARAMS,
        ToolError::Ledger(e) => ledger_error_code(e),
    }
}

/// JSON-RPC error code for a ledger error
pub fn ledger_error_code(error: &LedgerError) -> i32 {
    match error {
        LedgerError::Domain(e) => match e {
            DomainError::UnknownHabit(_) | DomainError::UnknownObligation(_) => {
                error_codes::UNKNOWN_ID
            }
            DomainError::DuplicateName(_) => error_codes::DUPLICATE_NAME,
            DomainError::InvalidDate(_)
            | DomainError::InvalidStatus(_)
            | DomainError::InvalidHabitName(_)
            | DomainError::Validation { .. } => error_codes::VALIDATION_ERROR,
        },
        LedgerError::Storage(_) | LedgerError::Io(_) => error_codes::STORAGE_ERROR,
        LedgerError::Config(_) | LedgerError::Json(_) => error_codes::INTERNAL_ERROR,
    }
}
