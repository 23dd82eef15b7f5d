//! mathsem: rewrite presentation MathML trees into semantic trees.
//!
//! A single depth-first pass over a presentation tree builds the semantic
//! tree bottom-up through a pluggable semantic engine.

// Input tree - re-exported from mathsem-tree
pub use mathsem_tree::nodes;

// Core - re-exported from mathsem-core
pub use mathsem_core::config;
pub use mathsem_core::engine;
pub use mathsem_core::error;
pub use mathsem_core::output;
pub use mathsem_core::rules;
pub use mathsem_core::semantic;
pub use mathsem_core::stack;
pub use mathsem_core::visitor;

pub use mathsem_core::{transform, transform_with};
pub use mathsem_tree::{InputNode, Kind};

// Front door
pub mod cli;
