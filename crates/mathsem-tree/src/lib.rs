// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Presentation MathML tree for mathsem.
//!
//! # Overview
//!
//! - **Nodes**: [`InputNode`] with a closed [`Kind`] enumeration, ordered
//!   [`Attributes`] and an optional text payload.
//! - **Attribute defaults**: [`AttributeLookup`] keeps absent, blank and
//!   present attributes apart.
//! - **Traversal**: the [`Visitor`] trait plus [`walk`] and
//!   [`walk_children`].
//!
//! # Quick Start
//!
//! ```
//! use mathsem_tree::{InputNode, Kind};
//!
//! let tree: InputNode = serde_json::from_str(
//!     r#"{"kind": "mrow", "children": [{"kind": "mi", "text": "x"}]}"#,
//! ).unwrap();
//! assert_eq!(tree.children[0].kind, Kind::Mi);
//! ```

pub mod nodes;
pub mod visitor;

pub use nodes::{attribute_or_default, AttributeLookup, Attributes, InputNode, Kind, UnknownKind};
pub use visitor::{walk, walk_children, Visitor};
