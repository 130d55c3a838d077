//! output formatting for scriptable CLI output
//!
//! JSON output follows JSON-RPC 2.0:
//! - success: {"jsonrpc": "2.0", "result": {...}, "id": null}
//! - error: {"jsonrpc": "2.0", "error": {"code": N, "message": "..."}, "id": null}

use serde::Serialize;
use std::io::IsTerminal;

const JSONRPC_VERSION: &str = "2.0";

/// how results are printed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    /// human-readable text
    Text,
    /// JSON-RPC 2.0 objects
    Json,
    /// nothing on success (errors still go to stderr)
    Quiet,
}

impl OutputMode {
    /// priority: quiet > json > no_json > auto-detect (JSON when piped)
    pub fn from_flags(json: bool, no_json: bool, quiet: bool) -> Self {
        if quiet {
            return Self::Quiet;
        }
        if json {
            return Self::Json;
        }
        if no_json {
            return Self::Text;
        }
        if !std::io::stdout().is_terminal() {
            Self::Json
        } else {
            Self::Text
        }
    }

    pub fn is_json(&self) -> bool {
        matches!(self, Self::Json)
    }

    pub fn is_quiet(&self) -> bool {
        matches!(self, Self::Quiet)
    }
}

#[derive(Serialize)]
pub struct JsonRpcResponse<T: Serialize> {
    pub jsonrpc: &'static str,
    pub result: T,
    pub id: Option<String>,
}

impl<T: Serialize> JsonRpcResponse<T> {
    pub fn new(result: T) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION,
            result,
            id: None,
        }
    }
}

#[derive(Serialize)]
pub struct JsonRpcError {
    pub jsonrpc: &'static str,
    pub error: RpcError,
    pub id: Option<String>,
}

#[derive(Serialize)]
pub struct RpcError {
    pub code: i32,
    pub message: String,
}

impl JsonRpcError {
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION,
            error: RpcError {
                code: to_jsonrpc_code(code),
                message: message.into(),
            },
            id: None,
        }
    }
}

/// application errors live in the -32000..-32099 range
fn to_jsonrpc_code(code: i32) -> i32 {
    -32000 - code
}

// ============================================================================
// Result data structures
// ============================================================================

/// one replayed step
#[derive(Debug, Serialize)]
pub struct CycleData {
    pub cycle: usize,
    /// "update" or "reset"
    pub kind: &'static str,
    pub value: f64,
    pub text: String,
    pub fired: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub diagnostics: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct ReplayData {
    pub section: String,
    pub cycles: Vec<CycleData>,
}

#[derive(Debug, Serialize)]
pub struct ThresholdData {
    pub option: &'static str,
    pub value: f64,
    pub action: String,
}

#[derive(Debug, Serialize)]
pub struct EntryData {
    pub key: String,
    pub source: String,
    pub true_action: String,
    pub false_action: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct CheckData {
    pub section: String,
    pub ok: bool,
    pub thresholds: Vec<ThresholdData>,
    pub condition_mode: bool,
    pub conditions: Vec<EntryData>,
    pub match_mode: bool,
    pub matches: Vec<EntryData>,
}

#[derive(Debug, Serialize)]
pub struct SectionsData {
    pub sections: Vec<String>,
}

/// print JSON-RPC success response to stdout
pub fn print_json<T: Serialize>(data: &T) {
    let response = JsonRpcResponse::new(data);
    if let Ok(json) = serde_json::to_string(&response) {
        println!("{}", json);
    }
}

/// print JSON-RPC error to stdout
pub fn print_json_error(code: i32, message: &str) {
    let error = JsonRpcError::new(code, message);
    if let Ok(json) = serde_json::to_string(&error) {
        println!("{}", json);
    }
}
