// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Walk functions for presentation tree traversal.
//!
//! - **Pre-order**: `visit_node` runs before any of the node's children
//! - **Document order**: children are visited first to last
//! - **Visitor-driven**: children are only reached when the visitor calls
//!   [`walk_children`] from inside `visit_node`

use super::traits::Visitor;
use crate::nodes::InputNode;

/// Walk a tree starting at `root`.
pub fn walk<V: Visitor + ?Sized>(visitor: &mut V, root: &InputNode) {
    visitor.visit_node(root);
}

/// Continue the walk into every child of `node`.
///
/// This is the continuation a visitor invokes to descend. It returns
/// nothing: results computed for the children must be collected by the
/// visitor itself.
pub fn walk_children<V: Visitor + ?Sized>(visitor: &mut V, node: &InputNode) {
    for child in &node.children {
        visitor.visit_node(child);
    }
}
