//! strainer-shared: Shared types for the strainer crates
//!
//! This crate contains the leaf types every other strainer crate builds on:
//! runtime type tags, typed literal values, the closed operator enumeration,
//! and the unified compile-error taxonomy.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::module_name_repetitions,
    clippy::must_use_candidate,
    clippy::uninlined_format_args
)]

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Compile-error taxonomy
pub mod error;

/// Operator kinds and their classification
pub mod ops;

/// Runtime type tags and typed literal values
pub mod value;

pub use error::{FilterError, Result};
pub use ops::{Operator, OperatorFamily, OperatorKind};
pub use value::{EnumDef, Literal, TypeTag, TypedValue};
