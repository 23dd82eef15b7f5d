//! The contract between the rewriting visitor and the semantic engine.
//!
//! The engine owns every decision about semantic nodes: it builds them,
//! assigns ids, infers types and roles, and applies normalizations. The
//! visitor only decides *which* call to make for each presentation node and
//! in what order the children arrive.
//!
//! An engine is passed to the visitor by `&mut` reference for the length of
//! one traversal. There is no process-wide factory; tests substitute their
//! own engine per case.

mod basic;

pub use basic::BasicEngine;

use mathsem_tree::{InputNode, Kind};

use crate::rules::LimitKind;
use crate::semantic::{SemanticNode, SemanticType};

/// Node construction and normalization primitives.
pub trait SemanticEngine {
    /// Build an identifier leaf.
    fn identifier_node(
        &mut self,
        text: &str,
        variant: Option<&str>,
        class: Option<&str>,
    ) -> SemanticNode;

    /// Build a leaf whose type is left to the engine (may be unknown).
    fn make_leaf_node(&mut self, text: &str, variant: Option<&str>) -> SemanticNode;

    /// Normalize a leaf that came from a number token.
    fn number(&mut self, node: &mut SemanticNode);

    /// Build a text leaf tagged with the kind it came from.
    fn text(&mut self, text: &str, variant: Option<&str>, source: Kind) -> SemanticNode;

    /// Merge a sequence of nodes into a row.
    fn row(&mut self, children: Vec<SemanticNode>) -> SemanticNode;

    /// Build a fraction-like node; `linethickness` is passed through raw.
    fn fraction_like_node(
        &mut self,
        linethickness: Option<&str>,
        numerator: SemanticNode,
        denominator: SemanticNode,
    ) -> SemanticNode;

    /// Build a branch node of the given type.
    fn make_branch_node(
        &mut self,
        ty: SemanticType,
        children: Vec<SemanticNode>,
        content: Vec<SemanticNode>,
    ) -> SemanticNode;

    /// Build a fenced expression.
    ///
    /// Each of `open`, `close` and `separators` is already resolved: `None`
    /// means the attribute was explicitly blank.
    fn mfenced(
        &mut self,
        open: Option<&str>,
        close: Option<&str>,
        separators: Option<&str>,
        children: Vec<SemanticNode>,
    ) -> SemanticNode;

    /// Build a script or under/over construct from its children.
    fn limit_node(&mut self, kind: LimitKind, children: Vec<SemanticNode>) -> SemanticNode;

    /// Fold a table into a multiline construct where applicable.
    fn table_to_multiline(&mut self, table: &mut SemanticNode);

    /// Placeholder for a construct the engine does not interpret.
    fn make_unprocessed(&mut self, node: &InputNode) -> SemanticNode;

    /// Node standing for nothing.
    fn make_empty_node(&mut self) -> SemanticNode;
}
