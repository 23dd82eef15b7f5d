//! JSON output types and serialization for CLI responses.
//!
//! ## Design Principles
//!
//! 1. **Status first:** Every response has `status` as first field
//! 2. **Deterministic:** Same input -> same output (attribute maps are ordered)
//! 3. **Versioned:** Schema version in response enables forward compatibility

use std::io::{self, Write};

use serde::Serialize;

use crate::error::{MathsemError, OutputErrorCode};
use crate::semantic::SemanticTree;
use crate::visitor::TransformStats;

/// Current schema version for all responses.
pub const SCHEMA_VERSION: &str = "1";

/// Response for the transform command.
#[derive(Debug, Clone, Serialize)]
pub struct TransformResponse {
    /// Status: "ok".
    pub status: String,
    /// Schema version for compatibility.
    pub schema_version: String,
    /// Traversal counters.
    pub stats: TransformStats,
    /// The semantic tree.
    pub tree: SemanticTree,
}

impl TransformResponse {
    pub fn new(tree: SemanticTree, stats: TransformStats) -> Self {
        TransformResponse {
            status: "ok".to_string(),
            schema_version: SCHEMA_VERSION.to_string(),
            stats,
            tree,
        }
    }
}

/// Error information for JSON output.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorInfo {
    /// Numeric error code, also the process exit status.
    pub code: u8,
    /// Human-readable message.
    pub message: String,
}

impl ErrorInfo {
    pub fn from_error(err: &MathsemError) -> Self {
        ErrorInfo {
            code: OutputErrorCode::from(err).code(),
            message: err.to_string(),
        }
    }
}

/// Error response for any command.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    /// Status: "error".
    pub status: String,
    /// Schema version for compatibility.
    pub schema_version: String,
    /// Error information.
    pub error: ErrorInfo,
}

impl ErrorResponse {
    /// Create an error response from a MathsemError.
    pub fn from_error(err: &MathsemError) -> Self {
        ErrorResponse {
            status: "error".to_string(),
            schema_version: SCHEMA_VERSION.to_string(),
            error: ErrorInfo::from_error(err),
        }
    }

    /// Create an error response with just code and message.
    pub fn new(code: u8, message: impl Into<String>) -> Self {
        ErrorResponse {
            status: "error".to_string(),
            schema_version: SCHEMA_VERSION.to_string(),
            error: ErrorInfo {
                code,
                message: message.into(),
            },
        }
    }
}

/// Emit a response as pretty-printed JSON to a writer.
pub fn emit_response<T: Serialize>(response: &T, writer: &mut impl Write) -> io::Result<()> {
    let json = serde_json::to_string_pretty(response)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
    writeln!(writer, "{}", json)
}

/// Emit a response as compact JSON (single line) to a writer.
pub fn emit_response_compact<T: Serialize>(
    response: &T,
    writer: &mut impl Write,
) -> io::Result<()> {
    let json = serde_json::to_string(response)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
    writeln!(writer, "{}", json)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TransformError;
    use crate::visitor::transform;
    use mathsem_tree::{InputNode, Kind};

    fn sample_response() -> TransformResponse {
        let input = InputNode::branch(
            Kind::Mfrac,
            vec![
                InputNode::token(Kind::Mi, "a"),
                InputNode::token(Kind::Mn, "2"),
            ],
        );
        let tree = transform(&input).unwrap();
        let stats = TransformStats {
            nodes_visited: 3,
            frames_opened: 3,
            max_depth: 2,
        };
        TransformResponse::new(tree, stats)
    }

    #[test]
    fn transform_response_shape() {
        let json = serde_json::to_value(sample_response()).unwrap();
        assert_eq!(json["status"], "ok");
        assert_eq!(json["schema_version"], SCHEMA_VERSION);
        assert_eq!(json["stats"]["nodes_visited"], 3);
        assert_eq!(json["tree"]["root"]["type"], "fraction");
        assert_eq!(json["tree"]["root"]["children"][1]["role"], "integer");
    }

    #[test]
    fn status_is_first_field() {
        let json = serde_json::to_string(&sample_response()).unwrap();
        assert!(json.starts_with("{\"status\":\"ok\""));
    }

    #[test]
    fn error_response_carries_code() {
        let err = MathsemError::from(TransformError::RootCount { count: 0 });
        let response = ErrorResponse::from_error(&err);
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["status"], "error");
        assert_eq!(json["error"]["code"], 10);
        assert!(json["error"]["message"].as_str().unwrap().contains('0'));
    }

    #[test]
    fn emit_response_is_deterministic() {
        let response = sample_response();
        let mut first = Vec::new();
        let mut second = Vec::new();
        emit_response(&response, &mut first).unwrap();
        emit_response(&response, &mut second).unwrap();
        assert_eq!(first, second);
        let _parsed: serde_json::Value = serde_json::from_slice(&first).unwrap();
    }

    #[test]
    fn emit_compact_is_single_line() {
        let mut out = Vec::new();
        emit_response_compact(&ErrorResponse::new(2, "bad"), &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(text.lines().count(), 1);
        assert!(text.ends_with('\n'));
    }
}
