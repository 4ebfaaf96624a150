//! strainer-schema: Schema binder for the strainer filter compiler
//!
//! A `Schema` is the read-only lookup table that resolves dotted property
//! paths from filter text to typed property descriptors. It is built once
//! per entity type through `Schema::builder`, then shared freely: resolution
//! never mutates it, so concurrent compilations can read the same schema.
//!
//! Per-property configuration (alias remaps, operator allow-list overrides,
//! case-sensitivity defaults) is supplied at build time and fixed
//! thereafter.
//!
//! # Quick Start
//!
//! ```rust
//! use strainer_schema::{Property, Schema};
//! use strainer_shared::TypeTag;
//!
//! let schema = Schema::builder("TestDocument")
//!     .property(Property::scalar("Id", TypeTag::Guid))
//!     .property(Property::scalar("Title", TypeTag::String))
//!     .property(Property::collection("AdditionalIds", TypeTag::Guid))
//!     .build();
//!
//! assert!(schema.property("Title").is_some());
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::module_name_repetitions,
    clippy::must_use_candidate,
    clippy::uninlined_format_args
)]

mod builder;
mod schema;

pub use builder::{Property, SchemaBuilder};
pub use schema::{
    CollectionElement, PathSegment, PropertyDescriptor, PropertyKind, ResolvedPath,
    ResolvedSegment, Schema, SegmentKind,
};
