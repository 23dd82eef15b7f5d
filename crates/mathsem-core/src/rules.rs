//! Per-kind rewriting rules.
//!
//! [`rule_for`] is the single table that decides how each presentation kind
//! is rewritten. It is an exhaustive `match` with no fallback arm, so adding
//! a kind to [`Kind`] does not compile until the kind is given a rule here.

use std::fmt;

use mathsem_tree::Kind;

/// Arrangement of a script or under/over construct.
///
/// Passed to the engine as the discriminator for
/// [`SemanticEngine::limit_node`](crate::engine::SemanticEngine::limit_node).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LimitKind {
    Sub,
    Sup,
    SubSup,
    Under,
    Over,
    UnderOver,
}

impl LimitKind {
    /// Number of children the construct takes (base included).
    pub fn arity(self) -> usize {
        match self {
            LimitKind::Sub | LimitKind::Sup | LimitKind::Under | LimitKind::Over => 2,
            LimitKind::SubSup | LimitKind::UnderOver => 3,
        }
    }

    /// The originating element tag in upper case (e.g. `"MSUBSUP"`).
    pub fn tag(self) -> &'static str {
        match self {
            LimitKind::Sub => "MSUB",
            LimitKind::Sup => "MSUP",
            LimitKind::SubSup => "MSUBSUP",
            LimitKind::Under => "MUNDER",
            LimitKind::Over => "MOVER",
            LimitKind::UnderOver => "MUNDEROVER",
        }
    }
}

/// How a node of a given kind is rewritten.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Rule {
    /// Identifier leaf from text, `mathvariant` and `class`.
    Identifier,
    /// Leaf forced to operator type when the engine leaves it unknown.
    Operator,
    /// Leaf followed by number normalization.
    Number,
    /// Text leaf tagged with its source kind.
    Text,
    /// One child collapses to itself, otherwise a row.
    InferredRow,
    /// Two children: numerator, denominator.
    Fraction,
    /// Children wrapped in a row under a square root.
    Sqrt,
    /// Two children `[radicand, index]`, emitted as `[index, radicand]`.
    Root,
    /// Fenced expression with defaulted delimiters and separators.
    Fenced,
    /// Children wrapped in a row under an enclosure, role from `notation`.
    Enclose,
    /// Script or under/over construct.
    Limit(LimitKind),
    /// Table followed by multiline folding.
    Table,
    /// Row of a table.
    TableRow,
    /// Cell of a table, children wrapped in a row.
    TableCell,
    /// Conditional rendering: only the second child is rewritten.
    Action,
    /// Inferred row when it has children, empty otherwise.
    Semantics,
    /// Always empty; children are never visited.
    Annotation,
    /// Empty node.
    Empty,
}

impl Rule {
    /// Number of children the rule requires, if it is fixed.
    pub fn arity(self) -> Option<usize> {
        match self {
            Rule::Fraction | Rule::Root => Some(2),
            Rule::Limit(limit) => Some(limit.arity()),
            _ => None,
        }
    }

    /// Returns true for rules whose nodes open a frame and collect children.
    pub fn collects_children(self) -> bool {
        !matches!(self, Rule::Action | Rule::Annotation | Rule::Empty)
    }

    pub fn name(self) -> &'static str {
        match self {
            Rule::Identifier => "identifier",
            Rule::Operator => "operator",
            Rule::Number => "number",
            Rule::Text => "text",
            Rule::InferredRow => "inferred-row",
            Rule::Fraction => "fraction",
            Rule::Sqrt => "sqrt",
            Rule::Root => "root",
            Rule::Fenced => "fenced",
            Rule::Enclose => "enclose",
            Rule::Limit(_) => "limit",
            Rule::Table => "table",
            Rule::TableRow => "table-row",
            Rule::TableCell => "table-cell",
            Rule::Action => "action",
            Rule::Semantics => "semantics",
            Rule::Annotation => "annotation",
            Rule::Empty => "empty",
        }
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rule::Limit(limit) => write!(f, "limit({})", limit.tag()),
            other => f.write_str(other.name()),
        }
    }
}

/// The rule for a presentation kind.
pub fn rule_for(kind: Kind) -> Rule {
    match kind {
        Kind::Mi => Rule::Identifier,
        Kind::Mo => Rule::Operator,
        Kind::Mn => Rule::Number,
        Kind::Mtext | Kind::Ms | Kind::AnnotationXml => Rule::Text,

        Kind::Math | Kind::Mrow | Kind::Mstyle | Kind::Mpadded => Rule::InferredRow,
        // No dedicated semantics; rewritten as rows so each still yields one node.
        Kind::Merror
        | Kind::Mphantom
        | Kind::Mmultiscripts
        | Kind::Mstack
        | Kind::Mlongdiv
        | Kind::Msgroup
        | Kind::Msrow
        | Kind::Mscarries
        | Kind::Mscarry => Rule::InferredRow,

        Kind::Mfrac => Rule::Fraction,
        Kind::Msqrt => Rule::Sqrt,
        Kind::Mroot => Rule::Root,
        Kind::Mfenced => Rule::Fenced,
        Kind::Menclose => Rule::Enclose,

        Kind::Msub => Rule::Limit(LimitKind::Sub),
        Kind::Msup => Rule::Limit(LimitKind::Sup),
        Kind::Msubsup => Rule::Limit(LimitKind::SubSup),
        Kind::Munder => Rule::Limit(LimitKind::Under),
        Kind::Mover => Rule::Limit(LimitKind::Over),
        Kind::Munderover => Rule::Limit(LimitKind::UnderOver),

        Kind::Mtable => Rule::Table,
        Kind::Mtr | Kind::Mlabeledtr => Rule::TableRow,
        Kind::Mtd => Rule::TableCell,

        Kind::Maction => Rule::Action,
        Kind::Semantics => Rule::Semantics,
        Kind::Annotation => Rule::Annotation,

        Kind::None
        | Kind::Dummy
        | Kind::Mspace
        | Kind::Maligngroup
        | Kind::Malignmark
        | Kind::Mprescripts
        | Kind::Msline => Rule::Empty,
    }
}
