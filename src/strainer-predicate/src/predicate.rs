//! The compiled predicate tree
//!
//! This is the compiler's output type: a backend-neutral boolean tree whose
//! leaves describe one comparison each. Backends consume it as a visitor
//! contract; every `OperatorKind` and `TypedValue` tag a leaf can carry must
//! be handled. The tree is immutable and structurally comparable, so the
//! same filter string against the same schema always compiles to an equal
//! predicate.

use std::fmt;

use strainer_shared::{Literal, OperatorKind};

/// One step of a leaf's access path, in physical (backend) names
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub enum AccessStep {
    /// Read the named field of the current object
    Field {
        /// Backend name of the field
        name: String,
        /// The stored value may be absent; backends must not assume it
        guarded: bool,
    },
    /// Replace the current collection with its element count
    Count,
}

/// The full access path from the document root to the compared value
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct Access {
    /// Steps in traversal order; never empty
    pub steps: Vec<AccessStep>,
}

impl Access {
    /// True when any step other than the last is guarded, i.e. evaluation
    /// may find no value at all rather than a null one
    pub fn has_guarded_parent(&self) -> bool {
        let (_, parents) = self
            .steps
            .split_last()
            .expect("access path has at least one step");
        parents
            .iter()
            .any(|step| matches!(step, AccessStep::Field { guarded: true, .. }))
    }
}

/// A single comparison leaf
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct Comparison {
    /// Where the left-hand value lives in the document
    pub access: Access,
    /// Which comparison to apply
    pub op: OperatorKind,
    /// Compare strings case-insensitively
    pub case_insensitive: bool,
    /// The typed right-hand value
    pub value: Literal,
    /// Result of the comparison when a guarded parent step finds nothing
    pub when_missing: bool,
}

/// A compiled, backend-neutral filter predicate
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub enum Predicate {
    /// Leaf comparison
    Comparison(Comparison),
    /// Both operands must hold
    And(Box<Predicate>, Box<Predicate>),
    /// Either operand must hold
    Or(Box<Predicate>, Box<Predicate>),
    /// The operand must not hold
    Not(Box<Predicate>),
}

impl fmt::Display for AccessStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AccessStep::Field { name, .. } => write!(f, "{}", name),
            AccessStep::Count => write!(f, "#"),
        }
    }
}

impl fmt::Display for Access {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, step) in self.steps.iter().enumerate() {
            if i > 0 {
                write!(f, ".")?;
            }
            write!(f, "{}", step)?;
        }
        Ok(())
    }
}
