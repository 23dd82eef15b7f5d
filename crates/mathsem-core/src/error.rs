//! Error types and error code constants for mathsem.
//!
//! ## Error Code Mapping
//!
//! Exit codes used by the CLI and in JSON error responses:
//! - `2`: Invalid input (unreadable file, malformed JSON, unknown element)
//! - `3`: Structural errors (wrong child count, nesting too deep)
//! - `4`: Configuration errors (bad environment value)
//! - `10`: Internal errors (unbalanced accumulation stack, I/O on output)
//!
//! ## Design
//!
//! - **Domain errors**: [`TransformError`] for traversal, [`ConfigError`] for
//!   configuration
//! - **Unified type**: [`MathsemError`] bridges them through `From` impls
//! - **Code mapping**: [`OutputErrorCode`] provides stable integer codes

use std::fmt;

use thiserror::Error;

use mathsem_tree::{InputNode, Kind};

// ============================================================================
// Output Error Codes
// ============================================================================

/// Error codes for JSON output and process exit status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum OutputErrorCode {
    /// Input could not be read or decoded.
    InvalidInput = 2,
    /// The input tree does not have the shape a rule requires.
    StructuralError = 3,
    /// A configuration value could not be used.
    ConfigError = 4,
    /// Internal errors (bugs, unexpected state).
    InternalError = 10,
}

impl OutputErrorCode {
    /// Get the numeric code value.
    pub fn code(&self) -> u8 {
        *self as u8
    }
}

impl fmt::Display for OutputErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

// ============================================================================
// Traversal errors
// ============================================================================

/// Identity of an input node for error reporting: its kind and, when the
/// node carries one, its `id` attribute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeIdentity {
    pub kind: Kind,
    pub id: Option<String>,
}

impl NodeIdentity {
    pub fn of(node: &InputNode) -> Self {
        NodeIdentity {
            kind: node.kind,
            id: node.attributes.get("id").map(str::to_string),
        }
    }
}

impl fmt::Display for NodeIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.id {
            Some(id) => write!(f, "<{} id={:?}>", self.kind, id),
            None => write!(f, "<{}>", self.kind),
        }
    }
}

/// Errors raised while rewriting a presentation tree.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransformError {
    /// A fixed-arity rule received the wrong number of children.
    #[error("{node} expects {expected} children, found {found}")]
    ArityMismatch {
        node: NodeIdentity,
        expected: usize,
        found: usize,
    },

    /// The input nests deeper than the configured limit.
    #[error("{node} exceeds the maximum nesting depth of {limit}")]
    DepthExceeded { node: NodeIdentity, limit: usize },

    /// A frame was appended to or closed while none was open.
    #[error("accumulation stack underflow")]
    FrameUnderflow,

    /// Frames were left open when the traversal finished.
    #[error("accumulation stack unbalanced: {depth} frames open after traversal")]
    UnbalancedFrames { depth: usize },

    /// The bottom frame did not hold exactly one root.
    #[error("traversal produced {count} root nodes, expected 1")]
    RootCount { count: usize },
}

impl From<&TransformError> for OutputErrorCode {
    fn from(err: &TransformError) -> Self {
        match err {
            TransformError::ArityMismatch { .. } => OutputErrorCode::StructuralError,
            TransformError::DepthExceeded { .. } => OutputErrorCode::StructuralError,
            TransformError::FrameUnderflow => OutputErrorCode::InternalError,
            TransformError::UnbalancedFrames { .. } => OutputErrorCode::InternalError,
            TransformError::RootCount { .. } => OutputErrorCode::InternalError,
        }
    }
}

// ============================================================================
// Configuration errors
// ============================================================================

/// Errors raised while resolving configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// A configuration source supplied a value that does not parse.
    #[error("invalid value '{value}' for {name}: {reason}")]
    InvalidValue {
        name: String,
        value: String,
        reason: String,
    },
}

// ============================================================================
// Unified Error Type
// ============================================================================

/// Unified error type for the CLI and other front ends.
#[derive(Debug, Error)]
pub enum MathsemError {
    #[error(transparent)]
    Transform(#[from] TransformError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The input could not be decoded into a presentation tree.
    #[error("invalid input: {message}")]
    InvalidInput { message: String },

    /// Reading input or writing output failed.
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<serde_json::Error> for MathsemError {
    fn from(err: serde_json::Error) -> Self {
        MathsemError::InvalidInput {
            message: err.to_string(),
        }
    }
}

impl From<&MathsemError> for OutputErrorCode {
    fn from(err: &MathsemError) -> Self {
        match err {
            MathsemError::Transform(inner) => OutputErrorCode::from(inner),
            MathsemError::Config(_) => OutputErrorCode::ConfigError,
            MathsemError::InvalidInput { .. } => OutputErrorCode::InvalidInput,
            MathsemError::Io(_) => OutputErrorCode::InternalError,
        }
    }
}
