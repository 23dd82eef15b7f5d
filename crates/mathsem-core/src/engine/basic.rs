//! A small engine that builds semantic nodes without inference.
//!
//! `BasicEngine` keeps every node structurally faithful and only fills in
//! what can be read off the input directly: number roles from the digit
//! string, fence roles from their position, table folding when every row
//! has a single cell. Leaves built through `make_leaf_node` stay `unknown`.
//!
//! Source tags are recorded in upper case (`MTEXT`, `MSUBSUP`).

use mathsem_tree::{InputNode, Kind};

use super::SemanticEngine;
use crate::rules::LimitKind;
use crate::semantic::{NodeIdGenerator, SemanticNode, SemanticRole, SemanticType};

/// Engine without inference rules.
#[derive(Debug, Default)]
pub struct BasicEngine {
    ids: NodeIdGenerator,
}

impl BasicEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of nodes built so far.
    pub fn node_count(&self) -> u32 {
        self.ids.count()
    }

    fn node(&mut self, ty: SemanticType) -> SemanticNode {
        SemanticNode::new(self.ids.next_id(), ty)
    }

    fn leaf(&mut self, ty: SemanticType, text: &str, variant: Option<&str>) -> SemanticNode {
        let mut node = self.node(ty);
        node.text = text.to_string();
        node.font = variant.map(str::to_string);
        node
    }

    fn fence(&mut self, text: &str, role: SemanticRole) -> SemanticNode {
        let mut node = self.leaf(SemanticType::Fence, text, None);
        node.role = role;
        node
    }
}

/// Role for a number token's text.
fn number_role(text: &str) -> SemanticRole {
    let text = text.trim();
    if !text.is_empty() && text.chars().all(|c| c.is_ascii_digit()) {
        SemanticRole::Integer
    } else if text.contains('.') && text.parse::<f64>().is_ok() {
        SemanticRole::Float
    } else {
        SemanticRole::OtherNumber
    }
}

impl SemanticEngine for BasicEngine {
    fn identifier_node(
        &mut self,
        text: &str,
        variant: Option<&str>,
        class: Option<&str>,
    ) -> SemanticNode {
        let mut node = self.leaf(SemanticType::Identifier, text, variant);
        if let Some(class) = class {
            node.set_attribute("class", class);
        }
        node
    }

    fn make_leaf_node(&mut self, text: &str, variant: Option<&str>) -> SemanticNode {
        self.leaf(SemanticType::Unknown, text, variant)
    }

    fn number(&mut self, node: &mut SemanticNode) {
        node.ty = SemanticType::Number;
        if node.role.is_unknown() {
            node.role = number_role(&node.text);
        }
    }

    fn text(&mut self, text: &str, variant: Option<&str>, source: Kind) -> SemanticNode {
        let mut node = self.leaf(SemanticType::Text, text, variant);
        node.set_attribute("tag", source.tag().to_ascii_uppercase());
        node
    }

    fn row(&mut self, children: Vec<SemanticNode>) -> SemanticNode {
        self.make_branch_node(SemanticType::Row, children, Vec::new())
    }

    fn fraction_like_node(
        &mut self,
        linethickness: Option<&str>,
        numerator: SemanticNode,
        denominator: SemanticNode,
    ) -> SemanticNode {
        let mut node =
            self.make_branch_node(SemanticType::Fraction, vec![numerator, denominator], Vec::new());
        if let Some(thickness) = linethickness {
            node.set_attribute("linethickness", thickness);
        }
        node
    }

    fn make_branch_node(
        &mut self,
        ty: SemanticType,
        children: Vec<SemanticNode>,
        content: Vec<SemanticNode>,
    ) -> SemanticNode {
        let mut node = self.node(ty);
        node.children = children;
        node.content = content;
        node
    }

    fn mfenced(
        &mut self,
        open: Option<&str>,
        close: Option<&str>,
        separators: Option<&str>,
        children: Vec<SemanticNode>,
    ) -> SemanticNode {
        let mut content = Vec::new();
        if let Some(open) = open {
            content.push(self.fence(open, SemanticRole::Open));
        }
        // One separator per gap; the last separator repeats when they run out.
        let symbols: Vec<char> = separators
            .unwrap_or("")
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect();
        if let Some(last) = symbols.last() {
            for gap in 0..children.len().saturating_sub(1) {
                let symbol = symbols.get(gap).unwrap_or(last).to_string();
                let mut separator = self.leaf(SemanticType::Punctuation, &symbol, None);
                separator.role = SemanticRole::Separator;
                content.push(separator);
            }
        }
        if let Some(close) = close {
            content.push(self.fence(close, SemanticRole::Close));
        }

        let mut node = self.make_branch_node(SemanticType::Fenced, children, content);
        if open.is_some() && close.is_some() {
            node.role = SemanticRole::Leftright;
        }
        for (name, value) in [("open", open), ("close", close), ("separators", separators)] {
            if let Some(value) = value {
                node.set_attribute(name, value);
            }
        }
        node
    }

    fn limit_node(&mut self, kind: LimitKind, children: Vec<SemanticNode>) -> SemanticNode {
        let (inner, outer) = match kind {
            LimitKind::Sub => (SemanticType::Subscript, None),
            LimitKind::Sup => (SemanticType::Superscript, None),
            LimitKind::Under => (SemanticType::Underscore, None),
            LimitKind::Over => (SemanticType::Overscore, None),
            LimitKind::SubSup => (SemanticType::Subscript, Some(SemanticType::Superscript)),
            LimitKind::UnderOver => (SemanticType::Underscore, Some(SemanticType::Overscore)),
        };

        let mut children = children;
        let mut node = match outer {
            // base, lower, upper: the lower script binds first.
            Some(outer) if children.len() > 2 => {
                let upper = children.split_off(2);
                let lower = self.make_branch_node(inner, children, Vec::new());
                let mut operands = vec![lower];
                operands.extend(upper);
                self.make_branch_node(outer, operands, Vec::new())
            }
            _ => self.make_branch_node(inner, children, Vec::new()),
        };
        node.set_attribute("tag", kind.tag());
        node
    }

    fn table_to_multiline(&mut self, table: &mut SemanticNode) {
        let single_column = !table.children.is_empty()
            && table
                .children
                .iter()
                .all(|row| row.ty == SemanticType::Row && row.children.len() == 1);
        if !single_column {
            return;
        }
        table.ty = SemanticType::Multiline;
        for row in &mut table.children {
            row.ty = SemanticType::Line;
        }
    }

    fn make_unprocessed(&mut self, node: &InputNode) -> SemanticNode {
        let mut unprocessed = self.leaf(SemanticType::Unprocessed, node.text(), None);
        unprocessed.set_attribute("tag", node.kind.tag().to_ascii_uppercase());
        unprocessed
    }

    fn make_empty_node(&mut self) -> SemanticNode {
        self.node(SemanticType::Empty)
    }
}
