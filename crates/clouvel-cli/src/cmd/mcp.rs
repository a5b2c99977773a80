use crate::tools::{self, ClouvelTool};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::io::{BufRead, Write};
use std::path::Path;

const PROTOCOL_VERSION: &str = "2024-11-05";

const PARSE_ERROR: i32 = -32700;
const INVALID_REQUEST: i32 = -32600;
const METHOD_NOT_FOUND: i32 = -32601;
const INVALID_PARAMS: i32 = -32602;
const INTERNAL_ERROR: i32 = -32603;

// ---------------------------------------------------------------------------
// JSON-RPC 2.0 protocol types
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct JsonRpcRequest {
    #[allow(dead_code)]
    pub jsonrpc: String,
    pub id: Option<Value>,
    pub method: String,
    pub params: Option<Value>,
}

#[derive(Debug, Serialize)]
pub struct JsonRpcResponse {
    pub jsonrpc: &'static str,
    pub id: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<JsonRpcError>,
}

#[derive(Debug, Serialize)]
pub struct JsonRpcError {
    pub code: i32,
    pub message: String,
}

impl JsonRpcResponse {
    fn ok(id: Option<Value>, result: Value) -> Self {
        Self {
            jsonrpc: "2.0",
            id,
            result: Some(result),
            error: None,
        }
    }

    fn fail(id: Option<Value>, code: i32, message: impl Into<String>) -> Self {
        Self {
            jsonrpc: "2.0",
            id,
            result: None,
            error: Some(JsonRpcError {
                code,
                message: message.into(),
            }),
        }
    }
}

#[derive(Debug, Serialize)]
struct ToolContent {
    r#type: &'static str,
    text: String,
}

#[derive(Debug, Serialize)]
struct ToolCallResult {
    content: Vec<ToolContent>,
    #[serde(rename = "isError")]
    is_error: bool,
}

// ---------------------------------------------------------------------------
// Server loop
// ---------------------------------------------------------------------------

/// Serve MCP over stdio, one JSON-RPC message per line, until stdin closes.
pub fn run(root: &Path) -> anyhow::Result<()> {
    let stdin = std::io::stdin();
    let stdout = std::io::stdout();
    let tools = tools::all_tools();
    tracing::info!(root = %root.display(), tools = tools.len(), "mcp server ready");

    for line in stdin.lock().lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }

        let response = match serde_json::from_str::<Value>(&line) {
            Err(e) => Some(JsonRpcResponse::fail(
                None,
                PARSE_ERROR,
                format!("parse error: {e}"),
            )),
            // Notifications carry no id and get no response.
            Ok(raw) if !raw.as_object().is_some_and(|o| o.contains_key("id")) => None,
            Ok(raw) => Some(match serde_json::from_value::<JsonRpcRequest>(raw) {
                Ok(request) => handle_request(&request, &tools, root),
                Err(e) => {
                    JsonRpcResponse::fail(None, INVALID_REQUEST, format!("invalid request: {e}"))
                }
            }),
        };

        if let Some(response) = response {
            let mut out = stdout.lock();
            serde_json::to_writer(&mut out, &response)?;
            writeln!(out)?;
            out.flush()?;
        }
    }

    tracing::info!("stdin closed, mcp server exiting");
    Ok(())
}

// ---------------------------------------------------------------------------
// Request dispatch (pub for unit tests)
// ---------------------------------------------------------------------------

pub fn handle_request(
    req: &JsonRpcRequest,
    tools: &[Box<dyn ClouvelTool>],
    root: &Path,
) -> JsonRpcResponse {
    let id = req.id.clone();
    match req.method.as_str() {
        "initialize" => JsonRpcResponse::ok(
            id,
            serde_json::json!({
                "protocolVersion": PROTOCOL_VERSION,
                "capabilities": { "tools": {} },
                "serverInfo": {
                    "name": "clouvel",
                    "version": env!("CARGO_PKG_VERSION")
                }
            }),
        ),

        "ping" => JsonRpcResponse::ok(id, serde_json::json!({})),

        "tools/list" => {
            let list: Vec<Value> = tools
                .iter()
                .map(|t| {
                    serde_json::json!({
                        "name": t.name(),
                        "description": t.description(),
                        "inputSchema": t.schema()
                    })
                })
                .collect();
            JsonRpcResponse::ok(id, serde_json::json!({ "tools": list }))
        }

        "tools/call" => {
            let Some(params) = &req.params else {
                return JsonRpcResponse::fail(id, INVALID_PARAMS, "missing params");
            };
            let Some(name) = params["name"].as_str() else {
                return JsonRpcResponse::fail(id, INVALID_PARAMS, "missing tool name in params");
            };
            let Some(tool) = tools.iter().find(|t| t.name() == name) else {
                return JsonRpcResponse::fail(
                    id,
                    METHOD_NOT_FOUND,
                    format!("tool not found: {name}"),
                );
            };

            let args = params.get("arguments").cloned().unwrap_or(Value::Null);
            let result = call_tool(tool.as_ref(), args, root);
            match serde_json::to_value(&result) {
                Ok(v) => JsonRpcResponse::ok(id, v),
                Err(e) => JsonRpcResponse::fail(id, INTERNAL_ERROR, e.to_string()),
            }
        }

        other => JsonRpcResponse::fail(id, METHOD_NOT_FOUND, format!("method not found: {other}")),
    }
}

/// Run one tool. Failures become `isError` results, never protocol errors.
fn call_tool(tool: &dyn ClouvelTool, args: Value, root: &Path) -> ToolCallResult {
    let (text, is_error) = match tool.call(args, root) {
        Ok(v) => (tool_text(&v), false),
        Err(e) => {
            tracing::debug!(tool = tool.name(), error = %e, "tool call failed");
            (e, true)
        }
    };
    ToolCallResult {
        content: vec![ToolContent {
            r#type: "text",
            text,
        }],
        is_error,
    }
}

/// A top-level `report` string is shown as-is; anything else as pretty JSON.
fn tool_text(value: &Value) -> String {
    if let Some(report) = value["report"].as_str() {
        return report.to_string();
    }
    serde_json::to_string_pretty(value).unwrap_or_else(|e| format!("serialization error: {e}"))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
