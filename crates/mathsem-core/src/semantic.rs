//! Semantic tree types.
//!
//! A [`SemanticNode`] is only ever built by a
//! [`SemanticEngine`](crate::engine::SemanticEngine); the rewriting visitor
//! routes nodes between engine calls but never assembles one itself.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Serialize, Serializer};

// ============================================================================
// Node identity
// ============================================================================

/// Identifier of a semantic node, unique within one engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct NodeId(pub u32);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Hands out sequential [`NodeId`]s starting from 0.
#[derive(Debug, Default)]
pub struct NodeIdGenerator {
    next_id: u32,
}

impl NodeIdGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Generate the next NodeId.
    pub fn next_id(&mut self) -> NodeId {
        let id = NodeId(self.next_id);
        self.next_id += 1;
        id
    }

    /// Number of ids handed out so far.
    pub fn count(&self) -> u32 {
        self.next_id
    }
}

// ============================================================================
// Type and role
// ============================================================================

/// Semantic category of a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SemanticType {
    Identifier,
    Operator,
    Number,
    Text,
    Punctuation,
    Fence,
    Row,
    Fraction,
    Root,
    Sqrt,
    Enclose,
    Table,
    Multiline,
    Line,
    Cell,
    Subscript,
    Superscript,
    Underscore,
    Overscore,
    Fenced,
    Unprocessed,
    Empty,
    Unknown,
}

impl SemanticType {
    pub fn as_str(&self) -> &'static str {
        match self {
            SemanticType::Identifier => "identifier",
            SemanticType::Operator => "operator",
            SemanticType::Number => "number",
            SemanticType::Text => "text",
            SemanticType::Punctuation => "punctuation",
            SemanticType::Fence => "fence",
            SemanticType::Row => "row",
            SemanticType::Fraction => "fraction",
            SemanticType::Root => "root",
            SemanticType::Sqrt => "sqrt",
            SemanticType::Enclose => "enclose",
            SemanticType::Table => "table",
            SemanticType::Multiline => "multiline",
            SemanticType::Line => "line",
            SemanticType::Cell => "cell",
            SemanticType::Subscript => "subscript",
            SemanticType::Superscript => "superscript",
            SemanticType::Underscore => "underscore",
            SemanticType::Overscore => "overscore",
            SemanticType::Fenced => "fenced",
            SemanticType::Unprocessed => "unprocessed",
            SemanticType::Empty => "empty",
            SemanticType::Unknown => "unknown",
        }
    }
}

impl fmt::Display for SemanticType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Finer-grained tag on top of the type. Unknown until something sets it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub enum SemanticRole {
    #[default]
    Unknown,
    Table,
    Integer,
    Float,
    OtherNumber,
    Open,
    Close,
    Separator,
    Leftright,
    /// Any other role name, e.g. an enclosure notation such as `"box"`.
    Other(String),
}

impl SemanticRole {
    /// Map a role name to a role, keeping unrecognized names verbatim.
    pub fn from_name(name: &str) -> Self {
        match name {
            "unknown" => SemanticRole::Unknown,
            "table" => SemanticRole::Table,
            "integer" => SemanticRole::Integer,
            "float" => SemanticRole::Float,
            "othernumber" => SemanticRole::OtherNumber,
            "open" => SemanticRole::Open,
            "close" => SemanticRole::Close,
            "separator" => SemanticRole::Separator,
            "leftright" => SemanticRole::Leftright,
            other => SemanticRole::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            SemanticRole::Unknown => "unknown",
            SemanticRole::Table => "table",
            SemanticRole::Integer => "integer",
            SemanticRole::Float => "float",
            SemanticRole::OtherNumber => "othernumber",
            SemanticRole::Open => "open",
            SemanticRole::Close => "close",
            SemanticRole::Separator => "separator",
            SemanticRole::Leftright => "leftright",
            SemanticRole::Other(name) => name,
        }
    }

    pub fn is_unknown(&self) -> bool {
        *self == SemanticRole::Unknown
    }
}

impl Serialize for SemanticRole {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl fmt::Display for SemanticRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Nodes
// ============================================================================

/// A node of the semantic tree.
///
/// `children` hold the node's structural operands; `content` holds
/// decorations that are kept apart from them (fence symbols, separators).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SemanticNode {
    pub id: NodeId,
    #[serde(rename = "type")]
    pub ty: SemanticType,
    pub role: SemanticRole,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font: Option<String>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub attributes: BTreeMap<String, String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<SemanticNode>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub content: Vec<SemanticNode>,
}

impl SemanticNode {
    /// Create a bare node with unknown role and no payload.
    pub fn new(id: NodeId, ty: SemanticType) -> Self {
        SemanticNode {
            id,
            ty,
            role: SemanticRole::Unknown,
            text: String::new(),
            font: None,
            attributes: BTreeMap::new(),
            children: Vec::new(),
            content: Vec::new(),
        }
    }

    /// Value of a recorded attribute.
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    /// Record an attribute on the node.
    pub fn set_attribute(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.attributes.insert(name.into(), value.into());
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty() && self.content.is_empty()
    }

    /// Number of nodes in this subtree (children and content included).
    pub fn size(&self) -> usize {
        1 + self
            .children
            .iter()
            .chain(&self.content)
            .map(SemanticNode::size)
            .sum::<usize>()
    }

    fn write_outline(&self, f: &mut fmt::Formatter<'_>, indent: usize, marker: &str) -> fmt::Result {
        write!(f, "{:indent$}{}{}", "", marker, self.ty, indent = indent)?;
        if !self.role.is_unknown() {
            write!(f, "[{}]", self.role)?;
        }
        if !self.text.is_empty() {
            write!(f, " {:?}", self.text)?;
        }
        for (name, value) in &self.attributes {
            write!(f, " {}={:?}", name, value)?;
        }
        writeln!(f)?;
        for child in &self.children {
            child.write_outline(f, indent + 2, "")?;
        }
        for extra in &self.content {
            extra.write_outline(f, indent + 2, "~")?;
        }
        Ok(())
    }
}

/// Indented outline, one node per line; `content` nodes are marked `~`.
impl fmt::Display for SemanticNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_outline(f, 0, "")
    }
}

/// The result of one traversal.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SemanticTree {
    pub root: SemanticNode,
}

impl SemanticTree {
    pub fn new(root: SemanticNode) -> Self {
        SemanticTree { root }
    }
}

impl fmt::Display for SemanticTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.root.fmt(f)
    }
}
