//! CLI front door.
//!
//! Helpers behind the `mathsem` binary, kept in the library so they can be
//! tested without spawning a process:
//! - `transform` - read a JSON presentation tree, rewrite it, render it
//! - `kinds` - list every element kind with its rule
//!
//! All functions return `Result<T, MathsemError>`; the binary maps errors to
//! an `ErrorResponse` and an exit code.

use std::fs;
use std::io::{self, Read, Write};
use std::path::Path;

use serde::Deserialize;
use tracing::info;

use mathsem_core::config::{TransformOptions, DEFAULT_MAX_DEPTH};
use mathsem_core::engine::BasicEngine;
use mathsem_core::error::MathsemError;
use mathsem_core::output::{emit_response, emit_response_compact, TransformResponse};
use mathsem_core::rules::{rule_for, Rule};
use mathsem_core::visitor::SemanticVisitor;
use mathsem_tree::{InputNode, Kind};

/// How `transform` renders its result.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RenderFormat {
    /// `TransformResponse` as JSON.
    #[default]
    Json,
    /// Indented outline of the semantic tree.
    Outline,
}

/// Read the input document from `path`, or from stdin when `path` is `None`
/// or `-`.
pub fn read_input(path: Option<&Path>) -> Result<String, MathsemError> {
    match path {
        Some(path) if path != Path::new("-") => Ok(fs::read_to_string(path)?),
        _ => {
            let mut buf = String::new();
            io::stdin().read_to_string(&mut buf)?;
            Ok(buf)
        }
    }
}

/// Decode a JSON presentation tree nested at most [`DEFAULT_MAX_DEPTH`]
/// nodes deep.
pub fn parse_input(json: &str) -> Result<InputNode, MathsemError> {
    parse_input_with(json, DEFAULT_MAX_DEPTH)
}

/// Decode a JSON presentation tree nested at most `max_depth` nodes deep.
///
/// serde_json's own recursion limit is lifted; the document's nesting is
/// bounded up front instead. The bound admits one node level past
/// `max_depth` so that the traversal, not the parser, reports the overflow.
pub fn parse_input_with(json: &str, max_depth: usize) -> Result<InputNode, MathsemError> {
    // Node object and `children` array per level, plus a leaf's attributes.
    let limit = max_depth.saturating_add(1).saturating_mul(2);
    if let Some(depth) = json_nesting_beyond(json, limit) {
        return Err(MathsemError::InvalidInput {
            message: format!(
                "JSON nesting reaches {} levels, above {} for max depth {}",
                depth, limit, max_depth
            ),
        });
    }

    let mut deserializer = serde_json::Deserializer::from_str(json);
    deserializer.disable_recursion_limit();
    let node = InputNode::deserialize(&mut deserializer)?;
    deserializer.end()?;
    Ok(node)
}

/// First nesting depth above `limit` reached by `json`, if any.
///
/// Brackets inside string literals are skipped. Malformed documents are left
/// to the parser.
fn json_nesting_beyond(json: &str, limit: usize) -> Option<usize> {
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;
    for byte in json.bytes() {
        if in_string {
            match byte {
                _ if escaped => escaped = false,
                b'\\' => escaped = true,
                b'"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match byte {
            b'"' => in_string = true,
            b'{' | b'[' => {
                depth += 1;
                if depth > limit {
                    return Some(depth);
                }
            }
            b'}' | b']' => depth = depth.saturating_sub(1),
            _ => {}
        }
    }
    None
}

/// Rewrite `input` with a [`BasicEngine`] and collect statistics.
pub fn run_transform(
    input: &InputNode,
    options: &TransformOptions,
) -> Result<TransformResponse, MathsemError> {
    let mut engine = BasicEngine::new();
    let mut visitor = SemanticVisitor::new(&mut engine, options.clone());
    visitor.run(input);
    let stats = visitor.stats();
    let tree = visitor.into_tree()?;
    info!(
        nodes = stats.nodes_visited,
        semantic_nodes = tree.root.size(),
        "transform complete"
    );
    Ok(TransformResponse::new(tree, stats))
}

/// Write a transform result in the requested format.
pub fn render(
    response: &TransformResponse,
    format: RenderFormat,
    compact: bool,
    writer: &mut impl Write,
) -> Result<(), MathsemError> {
    match format {
        RenderFormat::Json if compact => emit_response_compact(response, writer)?,
        RenderFormat::Json => emit_response(response, writer)?,
        RenderFormat::Outline => write!(writer, "{}", response.tree)?,
    }
    Ok(())
}

/// Every element kind paired with the rule that rewrites it.
pub fn kind_rules() -> Vec<(Kind, Rule)> {
    Kind::ALL.iter().map(|kind| (*kind, rule_for(*kind))).collect()
}

/// Write the kind table, one `tag<TAB>rule` line per kind.
pub fn render_kinds(writer: &mut impl Write) -> Result<(), MathsemError> {
    for (kind, rule) in kind_rules() {
        writeln!(writer, "{}\t{}", kind.tag(), rule)?;
    }
    Ok(())
}
