//! Bound Abstract Syntax Tree for filter expressions
//!
//! The AST here is already bound: every comparison carries the resolved
//! property path from the schema binder and a coerced, typed literal. It is
//! immutable once built and scoped to a single compile call.

use std::fmt;

use strainer_schema::ResolvedPath;
use strainer_shared::{Literal, Operator};

/// A property path as written in the filter, plus its schema resolution
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct BoundPath {
    /// The dotted path text from the filter string
    pub text: String,
    /// The binder's resolution of that text
    pub resolved: ResolvedPath,
}

/// A leaf comparison: `path op literal`
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct ComparisonNode {
    /// The bound left-hand property path
    pub path: BoundPath,
    /// The comparison operator, with its case-insensitivity flag
    pub operator: Operator,
    /// The coerced right-hand literal
    pub value: Literal,
}

/// A node of the filter expression tree
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub enum Node {
    /// Leaf comparison
    Comparison(ComparisonNode),
    /// Both children must hold
    And(Box<Node>, Box<Node>),
    /// Either child must hold
    Or(Box<Node>, Box<Node>),
    /// The child must not hold
    Not(Box<Node>),
}

impl Node {
    /// Number of comparison leaves in this tree
    pub fn comparison_count(&self) -> usize {
        match self {
            Node::Comparison(_) => 1,
            Node::And(l, r) | Node::Or(l, r) => l.comparison_count() + r.comparison_count(),
            Node::Not(inner) => inner.comparison_count(),
        }
    }
}

impl fmt::Display for ComparisonNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.path.text, self.operator, self.value)
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Children that bind looser than the parent get explicit parens so
        // the rendered text reparses to the same tree.
        fn child(f: &mut fmt::Formatter<'_>, node: &Node, parens_or: bool) -> fmt::Result {
            match node {
                Node::Or(..) if parens_or => write!(f, "({})", node),
                _ => write!(f, "{}", node),
            }
        }
        match self {
            Node::Comparison(c) => write!(f, "{}", c),
            Node::And(l, r) => {
                child(f, l, true)?;
                write!(f, " && ")?;
                child(f, r, true)
            }
            Node::Or(l, r) => write!(f, "{} || {}", l, r),
            Node::Not(inner) => match **inner {
                Node::Comparison(_) => write!(f, "!{}", inner),
                _ => write!(f, "!({})", inner),
            },
        }
    }
}
