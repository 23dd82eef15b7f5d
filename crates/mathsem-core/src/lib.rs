//! Core of mathsem.
//!
//! This crate rewrites a presentation tree (from `mathsem-tree`) into a
//! semantic tree:
//! - Semantic node model and its JSON/outline forms
//! - The `SemanticEngine` contract and a non-inferring `BasicEngine`
//! - The accumulation stack that gathers child results per construction point
//! - The per-kind rule table
//! - The rewriting visitor and `transform` entry points
//! - Error types, error codes, layered configuration and JSON responses

pub mod config;
pub mod engine;
pub mod error;
pub mod output;
pub mod rules;
pub mod semantic;
pub mod stack;
pub mod visitor;

pub use config::{StructurePolicy, TransformOptions};
pub use engine::{BasicEngine, SemanticEngine};
pub use error::{MathsemError, OutputErrorCode, TransformError};
pub use semantic::{SemanticNode, SemanticRole, SemanticTree, SemanticType};
pub use visitor::{transform, transform_with, SemanticVisitor, TransformStats};
