// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Visitor trait definition for presentation tree traversal.

use crate::nodes::InputNode;

/// A visitor over the presentation tree.
///
/// The walker calls [`Visitor::visit_node`] once for every node it reaches.
/// Implementations decide what to do with the node and whether to descend;
/// descending is always done through [`walk_children`](super::walk_children),
/// which returns nothing. Anything a visitor wants to hand back to an
/// ancestor has to travel through the visitor's own state.
pub trait Visitor {
    /// Visit a node.
    ///
    /// Call [`walk_children`](super::walk_children) to continue into the
    /// node's children, in document order.
    fn visit_node(&mut self, node: &InputNode);
}
