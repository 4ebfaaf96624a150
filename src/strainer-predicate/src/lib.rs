//! strainer-predicate: Predicate construction and in-memory evaluation
//!
//! The last stage of the compile pipeline. [`build`] lowers a bound AST
//! into a [`Predicate`]: a backend-neutral boolean tree whose leaves carry
//! physical access paths, typed right-hand values and explicit
//! missing-value semantics. [`matches`] is one conforming backend, matching
//! predicates against `serde_json` documents in memory.
//!
//! # Quick Start
//!
//! ```rust
//! use serde_json::json;
//! use strainer_parser::FilterParser;
//! use strainer_predicate::{build, matches};
//! use strainer_schema::{Property, Schema};
//! use strainer_shared::TypeTag;
//!
//! let schema = Schema::builder("TestDocument")
//!     .property(Property::scalar("Age", TypeTag::Int))
//!     .build();
//! let node = FilterParser::new(&schema).parse("Age >= 21")?;
//! let predicate = build(&node);
//!
//! assert!(matches(&predicate, &json!({ "Age": 30 })));
//! assert!(!matches(&predicate, &json!({ "Age": 20 })));
//! # Ok::<(), strainer_shared::FilterError>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::module_name_repetitions,
    clippy::must_use_candidate,
    clippy::uninlined_format_args,
    clippy::too_many_lines
)]

pub mod builder;
pub mod eval;
pub mod predicate;

pub use builder::build;
pub use eval::matches;
pub use predicate::{Access, AccessStep, Comparison, Predicate};

// Re-export shared types that appear in predicate leaves
pub use strainer_shared::{Literal, OperatorKind, TypedValue};
