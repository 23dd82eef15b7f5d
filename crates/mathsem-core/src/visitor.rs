//! The rewriting visitor: presentation tree in, semantic tree out.
//!
//! [`SemanticVisitor`] is driven by the tree walker. For each node it looks
//! up the node's [`Rule`], and for rules that build from children it
//!
//! 1. opens a frame on its [`AccumulationStack`],
//! 2. calls [`walk_children`], during which every child appends exactly one
//!    semantic node to that frame,
//! 3. closes the frame and hands the children to the engine,
//! 4. appends the engine's result to the frame below, which belongs to the
//!    parent construction point.
//!
//! Token rules append their node first and then walk their (empty) children
//! inside a frame of their own, which is closed and discarded.
//!
//! # Failure
//!
//! The first error is recorded and every later visit returns immediately.
//! Frames that are already open still close as the recursion unwinds, so
//! the stack is balanced when the walk returns and the error is reported
//! from [`SemanticVisitor::into_tree`].

use serde::Serialize;
use tracing::{debug, warn};

use mathsem_tree::visitor::{walk, walk_children, Visitor};
use mathsem_tree::InputNode;

use crate::config::{StructurePolicy, TransformOptions};
use crate::engine::{BasicEngine, SemanticEngine};
use crate::error::{NodeIdentity, TransformError};
use crate::rules::{rule_for, Rule};
use crate::semantic::{SemanticNode, SemanticRole, SemanticTree, SemanticType};
use crate::stack::AccumulationStack;

/// Counters collected during one traversal.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TransformStats {
    /// Nodes handed to `visit_node`.
    pub nodes_visited: usize,
    /// Frames opened (and closed) for construction points and tokens.
    pub frames_opened: usize,
    /// Deepest nesting reached.
    pub max_depth: usize,
}

/// Rewrite `root` with a fresh [`BasicEngine`] and default options.
pub fn transform(root: &InputNode) -> Result<SemanticTree, TransformError> {
    let mut engine = BasicEngine::new();
    transform_with(&mut engine, root, &TransformOptions::default())
}

/// Rewrite `root` with the given engine and options.
pub fn transform_with<E: SemanticEngine + ?Sized>(
    engine: &mut E,
    root: &InputNode,
    options: &TransformOptions,
) -> Result<SemanticTree, TransformError> {
    let mut visitor = SemanticVisitor::new(engine, options.clone());
    visitor.run(root);
    visitor.into_tree()
}

/// Visitor that rewrites a presentation tree through a [`SemanticEngine`].
///
/// One instance serves one traversal; [`into_tree`](Self::into_tree)
/// consumes it.
pub struct SemanticVisitor<'e, E: SemanticEngine + ?Sized> {
    engine: &'e mut E,
    options: TransformOptions,
    stack: AccumulationStack,
    depth: usize,
    stats: TransformStats,
    error: Option<TransformError>,
}

impl<'e, E: SemanticEngine + ?Sized> SemanticVisitor<'e, E> {
    pub fn new(engine: &'e mut E, options: TransformOptions) -> Self {
        SemanticVisitor {
            engine,
            options,
            stack: AccumulationStack::new(),
            depth: 0,
            stats: TransformStats::default(),
            error: None,
        }
    }

    /// Walk the tree rooted at `root`.
    pub fn run(&mut self, root: &InputNode) {
        debug!(kind = %root.kind, nodes = root.size(), "transform start");
        walk(self, root);
        debug!(
            visited = self.stats.nodes_visited,
            frames = self.stats.frames_opened,
            failed = self.error.is_some(),
            "transform done"
        );
    }

    pub fn stats(&self) -> TransformStats {
        self.stats
    }

    /// Number of frames currently open, bottom frame included.
    pub fn frame_depth(&self) -> usize {
        self.stack.depth()
    }

    /// Number of nodes waiting in the top frame.
    pub fn pending(&self) -> usize {
        self.stack.pending()
    }

    /// The first error recorded, if any.
    pub fn error(&self) -> Option<&TransformError> {
        self.error.as_ref()
    }

    /// Finish the traversal and return the semantic tree.
    pub fn into_tree(self) -> Result<SemanticTree, TransformError> {
        if let Some(err) = self.error {
            return Err(err);
        }
        let mut frame = self.stack.into_root_frame()?;
        match frame.pop() {
            Some(root) if frame.is_empty() => Ok(SemanticTree::new(root)),
            Some(_) => Err(TransformError::RootCount {
                count: frame.len() + 1,
            }),
            None => Err(TransformError::RootCount { count: 0 }),
        }
    }

    // ------------------------------------------------------------------------
    // Stack plumbing
    // ------------------------------------------------------------------------

    fn fail(&mut self, err: TransformError) {
        if self.error.is_none() {
            debug!(error = %err, "transform failed");
            self.error = Some(err);
        }
    }

    fn append(&mut self, node: SemanticNode) {
        if let Err(err) = self.stack.append(node) {
            self.fail(err);
        }
    }

    /// Open a frame, walk the children of `node` into it, close it.
    fn collect_children(&mut self, node: &InputNode) -> Option<Vec<SemanticNode>> {
        self.stack.open_frame();
        self.stats.frames_opened += 1;
        walk_children(self, node);
        match self.stack.close_frame() {
            Ok(children) => Some(children),
            Err(err) => {
                self.fail(err);
                None
            }
        }
    }

    /// Token handling: append first, then walk the children in a frame that
    /// is discarded.
    fn walk_leaf(&mut self, semantic: SemanticNode, node: &InputNode) {
        self.append(semantic);
        if let Some(stray) = self.collect_children(node) {
            if !stray.is_empty() {
                debug!(kind = %node.kind, dropped = stray.len(), "token children discarded");
            }
        }
    }

    /// Construction point: collect the children of `node`, build through
    /// `build`, append the result to the parent frame.
    fn construct<F>(&mut self, node: &InputNode, rule: Rule, build: F)
    where
        F: FnOnce(&mut E, Vec<SemanticNode>) -> Result<SemanticNode, TransformError>,
    {
        let Some(children) = self.collect_children(node) else {
            return;
        };
        if self.error.is_some() {
            return;
        }
        let children = match rule.arity() {
            Some(expected) => match self.fit_arity(node, children, expected) {
                Ok(children) => children,
                Err(err) => return self.fail(err),
            },
            None => children,
        };
        match build(&mut *self.engine, children) {
            Ok(semantic) => self.append(semantic),
            Err(err) => self.fail(err),
        }
    }

    /// Enforce a fixed child count according to the structure policy.
    fn fit_arity(
        &mut self,
        node: &InputNode,
        mut children: Vec<SemanticNode>,
        expected: usize,
    ) -> Result<Vec<SemanticNode>, TransformError> {
        let found = children.len();
        if found == expected {
            return Ok(children);
        }
        match self.options.structure {
            StructurePolicy::Strict => Err(TransformError::ArityMismatch {
                node: NodeIdentity::of(node),
                expected,
                found,
            }),
            StructurePolicy::Repair => {
                warn!(
                    node = %NodeIdentity::of(node),
                    expected,
                    found,
                    "repairing child count"
                );
                children.truncate(expected);
                while children.len() < expected {
                    children.push(self.engine.make_empty_node());
                }
                Ok(children)
            }
        }
    }

    // ------------------------------------------------------------------------
    // Rules
    // ------------------------------------------------------------------------

    fn apply(&mut self, rule: Rule, node: &InputNode) {
        let variant = node.attributes.get("mathvariant");
        match rule {
            Rule::Identifier => {
                let class = node.attributes.get("class");
                let semantic = self.engine.identifier_node(node.text(), variant, class);
                self.walk_leaf(semantic, node);
            }
            Rule::Operator => {
                let mut semantic = self.engine.make_leaf_node(node.text(), variant);
                if semantic.ty == SemanticType::Unknown {
                    semantic.ty = SemanticType::Operator;
                }
                self.walk_leaf(semantic, node);
            }
            Rule::Number => {
                let mut semantic = self.engine.make_leaf_node(node.text(), variant);
                self.engine.number(&mut semantic);
                self.walk_leaf(semantic, node);
            }
            Rule::Text => {
                let semantic = self.engine.text(node.text(), variant, node.kind);
                self.walk_leaf(semantic, node);
            }
            Rule::InferredRow => self.inferred_row(node, rule),
            Rule::Fraction => self.construct(node, rule, |engine, children| {
                let [numerator, denominator] = exactly(node, children)?;
                let thickness = node.attributes.get("linethickness");
                Ok(engine.fraction_like_node(thickness, numerator, denominator))
            }),
            Rule::Sqrt => self.construct(node, rule, |engine, children| {
                let radicand = engine.row(children);
                Ok(engine.make_branch_node(SemanticType::Sqrt, vec![radicand], Vec::new()))
            }),
            Rule::Root => self.construct(node, rule, |engine, children| {
                let [radicand, index] = exactly(node, children)?;
                Ok(engine.make_branch_node(SemanticType::Root, vec![index, radicand], Vec::new()))
            }),
            Rule::Fenced => self.construct(node, rule, |engine, children| {
                let attributes = &node.attributes;
                let open = attributes.lookup("open").or_default("(");
                let close = attributes.lookup("close").or_default(")");
                let separators = attributes.lookup("separators").or_default(",");
                Ok(engine.mfenced(open, close, separators, children))
            }),
            Rule::Enclose => self.construct(node, rule, |engine, children| {
                let body = engine.row(children);
                let mut semantic =
                    engine.make_branch_node(SemanticType::Enclose, vec![body], Vec::new());
                semantic.role = node
                    .attributes
                    .lookup("notation")
                    .value()
                    .map(|notation| SemanticRole::Other(notation.to_string()))
                    .unwrap_or_default();
                Ok(semantic)
            }),
            Rule::Limit(limit) => self.construct(node, rule, |engine, children| {
                Ok(engine.limit_node(limit, children))
            }),
            Rule::Table => self.construct(node, rule, |engine, children| {
                let mut table = engine.make_branch_node(SemanticType::Table, children, Vec::new());
                engine.table_to_multiline(&mut table);
                Ok(table)
            }),
            Rule::TableRow => self.construct(node, rule, |engine, children| {
                let mut row = engine.make_branch_node(SemanticType::Row, children, Vec::new());
                row.role = SemanticRole::Table;
                Ok(row)
            }),
            Rule::TableCell => self.construct(node, rule, |engine, children| {
                let body = engine.row(children);
                let mut cell = engine.make_branch_node(SemanticType::Cell, vec![body], Vec::new());
                cell.role = SemanticRole::Table;
                Ok(cell)
            }),
            Rule::Action => match node.children.get(1) {
                Some(selected) => self.visit_node(selected),
                None => {
                    let placeholder = self.engine.make_unprocessed(node);
                    self.append(placeholder);
                }
            },
            Rule::Semantics => {
                if node.children.is_empty() {
                    let empty = self.engine.make_empty_node();
                    self.append(empty);
                } else {
                    self.inferred_row(node, rule);
                }
            }
            Rule::Annotation | Rule::Empty => {
                let empty = self.engine.make_empty_node();
                self.append(empty);
            }
        }
    }

    fn inferred_row(&mut self, node: &InputNode, rule: Rule) {
        self.construct(node, rule, |engine, mut children| {
            if children.len() == 1 {
                if let Some(only) = children.pop() {
                    return Ok(only);
                }
            }
            Ok(engine.row(children))
        });
    }
}

/// Destructure a child list of known length.
fn exactly<const N: usize>(
    node: &InputNode,
    children: Vec<SemanticNode>,
) -> Result<[SemanticNode; N], TransformError> {
    <[SemanticNode; N]>::try_from(children).map_err(|children| TransformError::ArityMismatch {
        node: NodeIdentity::of(node),
        expected: N,
        found: children.len(),
    })
}

impl<E: SemanticEngine + ?Sized> Visitor for SemanticVisitor<'_, E> {
    fn visit_node(&mut self, node: &InputNode) {
        if self.error.is_some() {
            return;
        }
        self.stats.nodes_visited += 1;
        if self.depth >= self.options.max_depth {
            self.fail(TransformError::DepthExceeded {
                node: NodeIdentity::of(node),
                limit: self.options.max_depth,
            });
            return;
        }

        self.depth += 1;
        self.stats.max_depth = self.stats.max_depth.max(self.depth);
        let rule = rule_for(node.kind);
        debug!(kind = %node.kind, %rule, depth = self.depth, "visit");
        self.apply(rule, node);
        self.depth -= 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mathsem_tree::Kind;

    fn mi(text: &str) -> InputNode {
        InputNode::token(Kind::Mi, text)
    }

    fn mn(text: &str) -> InputNode {
        InputNode::token(Kind::Mn, text)
    }

    fn mo(text: &str) -> InputNode {
        InputNode::token(Kind::Mo, text)
    }

    fn branch(kind: Kind, children: Vec<InputNode>) -> InputNode {
        InputNode::branch(kind, children)
    }

    fn texts(nodes: &[SemanticNode]) -> Vec<&str> {
        nodes.iter().map(|n| n.text.as_str()).collect()
    }

    fn root_of(input: &InputNode) -> SemanticNode {
        transform(input).unwrap().root
    }

    #[test]
    fn test_identifier_leaf() {
        let root = root_of(&mi("x"));
        assert_eq!(root.ty, SemanticType::Identifier);
        assert_eq!(root.text, "x");
        assert!(root.role.is_unknown());
        assert!(root.is_leaf());
    }

    #[test]
    fn test_operator_forced_when_unknown() {
        let root = root_of(&mo("+"));
        assert_eq!(root.ty, SemanticType::Operator);
        assert_eq!(root.text, "+");
    }

    #[test]
    fn test_number_normalized() {
        let root = root_of(&mn("12").attr("mathvariant", "bold"));
        assert_eq!(root.ty, SemanticType::Number);
        assert_eq!(root.role, SemanticRole::Integer);
        assert_eq!(root.font.as_deref(), Some("bold"));
    }

    #[test]
    fn test_text_kinds_are_tagged() {
        for kind in [Kind::Mtext, Kind::Ms, Kind::AnnotationXml] {
            let root = root_of(&InputNode::with_text(kind, "words"));
            assert_eq!(root.ty, SemanticType::Text);
            assert_eq!(
                root.attribute("tag"),
                Some(kind.tag().to_ascii_uppercase().as_str())
            );
        }
    }

    #[test]
    fn test_row_collapse() {
        let single = root_of(&branch(Kind::Mrow, vec![mi("x")]));
        assert_eq!(single.ty, SemanticType::Identifier);

        let empty = root_of(&branch(Kind::Mrow, vec![]));
        assert_eq!(empty.ty, SemanticType::Row);
        assert!(empty.children.is_empty());

        let many = root_of(&branch(Kind::Mstyle, vec![mi("a"), mo("+"), mi("b")]));
        assert_eq!(many.ty, SemanticType::Row);
        assert_eq!(texts(&many.children), vec!["a", "+", "b"]);
    }

    #[test]
    fn test_fraction() {
        let input = branch(Kind::Mfrac, vec![mi("a"), mi("b")]).attr("linethickness", "2");
        let root = root_of(&input);
        assert_eq!(root.ty, SemanticType::Fraction);
        assert_eq!(texts(&root.children), vec!["a", "b"]);
        assert_eq!(root.attribute("linethickness"), Some("2"));
    }

    #[test]
    fn test_sqrt_wraps_row() {
        let root = root_of(&branch(Kind::Msqrt, vec![mi("x")]));
        assert_eq!(root.ty, SemanticType::Sqrt);
        assert_eq!(root.children.len(), 1);
        assert_eq!(root.children[0].ty, SemanticType::Row);
        assert_eq!(texts(&root.children[0].children), vec!["x"]);
    }

    #[test]
    fn test_root_reorders_children() {
        let root = root_of(&branch(Kind::Mroot, vec![mi("radicand"), mn("3")]));
        assert_eq!(root.ty, SemanticType::Root);
        assert_eq!(texts(&root.children), vec!["3", "radicand"]);
    }

    #[test]
    fn test_enclose_role() {
        let boxed = branch(Kind::Menclose, vec![mi("x")]).attr("notation", "box");
        let root = root_of(&boxed);
        assert_eq!(root.ty, SemanticType::Enclose);
        assert_eq!(root.role, SemanticRole::Other("box".to_string()));
        assert_eq!(root.children[0].ty, SemanticType::Row);

        let plain = root_of(&branch(Kind::Menclose, vec![mi("x")]).attr("notation", " "));
        assert!(plain.role.is_unknown());
    }

    #[test]
    fn test_enclose_notation_never_names_builtin_role() {
        for notation in ["table", "unknown", "open"] {
            let input = branch(Kind::Menclose, vec![mi("x")]).attr("notation", notation);
            let root = root_of(&input);
            assert_eq!(root.role, SemanticRole::Other(notation.to_string()));
            assert!(!root.role.is_unknown());
        }
    }

    #[test]
    fn test_table_rows_and_cells() {
        let cell = |text: &str| branch(Kind::Mtd, vec![mi(text)]);
        let input = branch(
            Kind::Mtable,
            vec![
                branch(Kind::Mtr, vec![cell("a"), cell("b")]),
                branch(Kind::Mlabeledtr, vec![cell("c"), cell("d")]),
            ],
        );
        let root = root_of(&input);
        assert_eq!(root.ty, SemanticType::Table);
        assert_eq!(root.children.len(), 2);
        for row in &root.children {
            assert_eq!(row.ty, SemanticType::Row);
            assert_eq!(row.role, SemanticRole::Table);
            for cell in &row.children {
                assert_eq!(cell.ty, SemanticType::Cell);
                assert_eq!(cell.role, SemanticRole::Table);
                assert_eq!(cell.children[0].ty, SemanticType::Row);
            }
        }
        assert_eq!(texts(&root.children[1].children[1].children[0].children), vec!["d"]);
    }

    #[test]
    fn test_single_column_table_folds() {
        let line = |text: &str| branch(Kind::Mtr, vec![branch(Kind::Mtd, vec![mi(text)])]);
        let root = root_of(&branch(Kind::Mtable, vec![line("a"), line("b")]));
        assert_eq!(root.ty, SemanticType::Multiline);
        assert!(root.children.iter().all(|row| row.ty == SemanticType::Line));
    }

    #[test]
    fn test_limit_kinds() {
        let root = root_of(&branch(Kind::Msub, vec![mi("x"), mn("1")]));
        assert_eq!(root.ty, SemanticType::Subscript);
        assert_eq!(texts(&root.children), vec!["x", "1"]);

        let root = root_of(&branch(Kind::Munderover, vec![mo("∑"), mi("i"), mi("n")]));
        assert_eq!(root.ty, SemanticType::Overscore);
        assert_eq!(root.attribute("tag"), Some("MUNDEROVER"));
        assert_eq!(root.children[0].ty, SemanticType::Underscore);
    }

    #[test]
    fn test_action_short_circuit() {
        let lone = root_of(&branch(Kind::Maction, vec![mi("only")]));
        assert_eq!(lone.ty, SemanticType::Unprocessed);
        assert!(lone.is_leaf());

        let mut engine = BasicEngine::new();
        let input = branch(Kind::Maction, vec![mi("first"), mi("second"), mi("third")]);
        let mut visitor = SemanticVisitor::new(&mut engine, TransformOptions::default());
        visitor.run(&input);
        assert_eq!(visitor.stats().nodes_visited, 2);
        let root = visitor.into_tree().unwrap().root;
        assert_eq!(root.text, "second");
    }

    #[test]
    fn test_semantics_and_annotations() {
        let empty = root_of(&branch(Kind::Semantics, vec![]));
        assert_eq!(empty.ty, SemanticType::Empty);

        let input = branch(
            Kind::Semantics,
            vec![
                mi("x"),
                branch(Kind::Annotation, vec![mi("hidden"), mi("also hidden")]),
            ],
        );
        let root = root_of(&input);
        assert_eq!(root.ty, SemanticType::Row);
        assert_eq!(root.children.len(), 2);
        assert_eq!(root.children[0].text, "x");
        assert_eq!(root.children[1].ty, SemanticType::Empty);
        assert!(root.children[1].is_leaf());
    }

    #[test]
    fn test_layout_only_kinds_are_empty() {
        for kind in [Kind::None, Kind::Mspace, Kind::Malignmark, Kind::Dummy] {
            let root = root_of(&InputNode::new(kind));
            assert_eq!(root.ty, SemanticType::Empty, "{kind}");
        }
    }

    #[test]
    fn test_frames_balanced_after_run() {
        let input = branch(
            Kind::Math,
            vec![
                branch(Kind::Mfrac, vec![mi("a"), branch(Kind::Msqrt, vec![mn("2")])]),
                mo("="),
                branch(Kind::Msubsup, vec![mi("x"), mi("i"), mn("2")]),
            ],
        );
        let mut engine = BasicEngine::new();
        let mut visitor = SemanticVisitor::new(&mut engine, TransformOptions::default());
        visitor.run(&input);

        assert_eq!(visitor.frame_depth(), 1);
        assert_eq!(visitor.pending(), 1);
        let stats = visitor.stats();
        assert_eq!(stats.nodes_visited, input.size());
        assert_eq!(stats.frames_opened, input.size());
        assert_eq!(stats.max_depth, 4);
        assert!(visitor.into_tree().is_ok());
    }

    #[test]
    fn test_strict_arity_error() {
        let input = branch(
            Kind::Mrow,
            vec![mi("a"), branch(Kind::Mfrac, vec![mi("x")]).attr("id", "f1")],
        );
        let err = transform(&input).unwrap_err();
        assert_eq!(
            err,
            TransformError::ArityMismatch {
                node: NodeIdentity {
                    kind: Kind::Mfrac,
                    id: Some("f1".to_string()),
                },
                expected: 2,
                found: 1,
            }
        );
    }

    #[test]
    fn test_error_stops_later_visits_and_keeps_frames_balanced() {
        let input = branch(
            Kind::Mrow,
            vec![branch(Kind::Mroot, vec![mi("x")]), mi("after")],
        );
        let mut engine = BasicEngine::new();
        let mut visitor = SemanticVisitor::new(&mut engine, TransformOptions::default());
        visitor.run(&input);

        assert_eq!(visitor.frame_depth(), 1);
        assert_eq!(visitor.stats().nodes_visited, 3);
        assert!(matches!(
            visitor.error(),
            Some(TransformError::ArityMismatch { found: 1, .. })
        ));
        assert!(visitor.into_tree().is_err());
    }

    #[test]
    fn test_repair_pads_and_truncates() {
        crate::test_utils::init_test_logging();
        let options = TransformOptions {
            structure: StructurePolicy::Repair,
            ..TransformOptions::default()
        };
        let mut engine = BasicEngine::new();
        let short = branch(Kind::Mfrac, vec![mi("a")]);
        let root = transform_with(&mut engine, &short, &options).unwrap().root;
        assert_eq!(root.children.len(), 2);
        assert_eq!(root.children[1].ty, SemanticType::Empty);

        let long = branch(Kind::Msup, vec![mi("x"), mn("2"), mn("3")]);
        let root = transform_with(&mut engine, &long, &options).unwrap().root;
        assert_eq!(texts(&root.children), vec!["x", "2"]);
    }

    #[test]
    fn test_depth_limit() {
        let mut input = mi("x");
        for _ in 0..10 {
            input = branch(Kind::Mrow, vec![input, mo("+")]);
        }
        let options = TransformOptions {
            max_depth: 5,
            ..TransformOptions::default()
        };
        let mut engine = BasicEngine::new();
        let err = transform_with(&mut engine, &input, &options).unwrap_err();
        assert!(matches!(err, TransformError::DepthExceeded { limit: 5, .. }));

        let relaxed = TransformOptions {
            max_depth: 11,
            ..TransformOptions::default()
        };
        assert!(transform_with(&mut engine, &input, &relaxed).is_ok());
    }
}
