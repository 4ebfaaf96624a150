//! strainer-parser: Lexer, parser and literal coercion for the strainer
//! filter language
//!
//! This crate turns a filter string like
//! `Title @=* "waffle" && Age > 30 || Id == "guid"` into a bound Abstract
//! Syntax Tree. Lexing uses nom token recognizers with maximal-munch
//! operator matching; parsing is precedence-climbing over the token stream
//! and consults the schema binder as it goes, so every comparison node in
//! the resulting AST already carries a resolved path and a coerced, typed
//! literal.
//!
//! # Quick Start
//!
//! ```rust
//! use strainer_parser::FilterParser;
//! use strainer_schema::{Property, Schema};
//! use strainer_shared::TypeTag;
//!
//! let schema = Schema::builder("TestDocument")
//!     .property(Property::scalar("Title", TypeTag::String))
//!     .property(Property::scalar("Age", TypeTag::Int))
//!     .build();
//!
//! let parser = FilterParser::new(&schema);
//! let ast = parser.parse(r#"Title @=* "waffle" && Age > 30"#)?;
//! # let _ = ast;
//! # Ok::<(), strainer_shared::FilterError>(())
//! ```
//!
//! # Error Handling
//!
//! Every failure (lexing, binding, parsing, coercion) is a
//! [`FilterError`](strainer_shared::FilterError) displaying as a
//! `parsing failure` with the offending source offset where available.

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

pub mod ast;
pub mod coerce;
pub mod lexer;
mod parser;

pub use ast::{BoundPath, ComparisonNode, Node};
pub use lexer::{tokenize, Token, TokenKind};
pub use parser::FilterParser;

// Re-export shared types callers need alongside the AST
pub use strainer_shared::{FilterError, Literal, Operator, OperatorKind, TypedValue};
