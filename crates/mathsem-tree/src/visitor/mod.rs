// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Visitor infrastructure for presentation tree traversal.
//!
//! The walker owns recursion: a [`Visitor`] is handed one node at a time
//! and asks for the node's children to be visited by calling
//! [`walk_children`]. The call returns nothing, so visitors that build a
//! new tree collect child results on their own side.
//!
//! ```ignore
//! use mathsem_tree::visitor::{walk, walk_children, Visitor};
//!
//! struct TokenCounter {
//!     count: usize,
//! }
//!
//! impl Visitor for TokenCounter {
//!     fn visit_node(&mut self, node: &InputNode) {
//!         if node.kind.is_token() {
//!             self.count += 1;
//!         }
//!         walk_children(self, node);
//!     }
//! }
//! ```

mod dispatch;
mod traits;

pub use dispatch::{walk, walk_children};
pub use traits::Visitor;
