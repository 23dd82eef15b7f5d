// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Presentation tree node types.

mod attributes;
mod kind;

pub use attributes::{attribute_or_default, AttributeLookup, Attributes};
pub use kind::{Kind, UnknownKind};

use serde::{Deserialize, Serialize};

/// A node of the presentation tree.
///
/// Nodes are built once upstream (or deserialized from JSON) and only read
/// afterwards. Token kinds carry their content in `text`; every other kind
/// leaves it `None`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputNode {
    pub kind: Kind,
    #[serde(default, skip_serializing_if = "Attributes::is_empty")]
    pub attributes: Attributes,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<InputNode>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

impl InputNode {
    /// Create a node with no attributes, children or text.
    pub fn new(kind: Kind) -> Self {
        InputNode {
            kind,
            attributes: Attributes::new(),
            children: Vec::new(),
            text: None,
        }
    }

    /// Create a token node (`mi`, `mn`, `mo`, ...) holding `text`.
    pub fn token(kind: Kind, text: impl Into<String>) -> Self {
        debug_assert!(kind.is_token(), "{kind} is not a token kind");
        InputNode {
            text: Some(text.into()),
            ..InputNode::new(kind)
        }
    }

    /// Create a text-bearing node of any kind (e.g. `annotation-xml`).
    pub fn with_text(kind: Kind, text: impl Into<String>) -> Self {
        InputNode {
            text: Some(text.into()),
            ..InputNode::new(kind)
        }
    }

    /// Create a branch node with the given children.
    pub fn branch(kind: Kind, children: Vec<InputNode>) -> Self {
        InputNode {
            children,
            ..InputNode::new(kind)
        }
    }

    /// Set an attribute, returning the node for chaining.
    pub fn attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.set(name, value);
        self
    }

    /// Text payload, or `""` for nodes without one.
    pub fn text(&self) -> &str {
        self.text.as_deref().unwrap_or("")
    }

    /// Number of nodes in this subtree, including this one.
    pub fn size(&self) -> usize {
        1 + self.children.iter().map(InputNode::size).sum::<usize>()
    }
}
