//! Compile-only test to verify public API surface.
//!
//! This file serves as a compile-time contract for the public API.
//! If this file fails to compile, the public API has regressed.
//!
//! Run with: cargo test -- api_surface

// Allow unused imports - this test is about compile-time verification, not runtime usage
#![allow(unused_imports)]

// ============================================================================
// Input Tree
// ============================================================================

use mathsem::nodes::{
    attribute_or_default, AttributeLookup, Attributes, InputNode, Kind, UnknownKind,
};
use mathsem_tree::visitor::{walk, walk_children, Visitor};

// ============================================================================
// Core
// ============================================================================

use mathsem::config::{
    CliOverrides, ConfigSource, ConfigValue, ResolvedConfig, StructurePolicy, TransformOptions,
    DEFAULT_MAX_DEPTH, ENV_MAX_DEPTH, ENV_STRUCTURE,
};
use mathsem::engine::{BasicEngine, SemanticEngine};
use mathsem::error::{
    ConfigError, MathsemError, NodeIdentity, OutputErrorCode, TransformError,
};
use mathsem::output::{
    emit_response, emit_response_compact, ErrorInfo, ErrorResponse, TransformResponse,
    SCHEMA_VERSION,
};
use mathsem::rules::{rule_for, LimitKind, Rule};
use mathsem::semantic::{
    NodeId, NodeIdGenerator, SemanticNode, SemanticRole, SemanticTree, SemanticType,
};
use mathsem::stack::{AccumulationStack, Frame};
use mathsem::visitor::{transform, transform_with, SemanticVisitor, TransformStats};

// ============================================================================
// Front Door
// ============================================================================

use mathsem::cli::{
    kind_rules, parse_input, parse_input_with, read_input, render, render_kinds, run_transform,
    RenderFormat,
};

#[test]
fn api_surface_compiles() {
    // The imports above are the test.
}
