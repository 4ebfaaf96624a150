//! Runtime type tags and typed literal values
//!
//! A filter string carries only text; the schema fixes the runtime type each
//! property must coerce to. `TypeTag` names those target types and
//! `TypedValue` is the coerced result attached to a comparison.

use std::cmp::Ordering;
use std::fmt;

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveTime};
use uuid::Uuid;

/// Declared members of an enumeration-typed property.
///
/// Bare words in filter text resolve against `members` with a case-sensitive
/// exact match; numeric literals are never accepted for enum properties.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct EnumDef {
    /// Enum type name, used in error messages
    pub name: String,
    /// Declared member names, in declaration order
    pub members: Vec<String>,
}

impl EnumDef {
    /// Create an enum definition from a name and its member names
    pub fn new(name: impl Into<String>, members: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            name: name.into(),
            members: members.into_iter().map(Into::into).collect(),
        }
    }

    /// Exact, case-sensitive member lookup
    pub fn has_member(&self, candidate: &str) -> bool {
        self.members.iter().any(|m| m == candidate)
    }
}

/// Runtime type of a scalar property or collection element
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub enum TypeTag {
    /// UTF-8 string
    String,
    /// Boolean
    Bool,
    /// 64-bit signed integer
    Int,
    /// Decimal number (stored as f64)
    Decimal,
    /// GUID in dashed hex form
    Guid,
    /// Enumeration with declared members
    Enum(EnumDef),
    /// ISO-8601 date-time with offset
    DateTimeOffset,
    /// Calendar date (`YYYY-MM-DD`)
    Date,
    /// Wall-clock time (`HH:MM:SS`)
    Time,
}

impl TypeTag {
    /// Human-readable type name for error messages
    pub fn name(&self) -> &str {
        match self {
            TypeTag::String => "string",
            TypeTag::Bool => "boolean",
            TypeTag::Int => "integer",
            TypeTag::Decimal => "decimal",
            TypeTag::Guid => "GUID",
            TypeTag::Enum(def) => &def.name,
            TypeTag::DateTimeOffset => "date-time",
            TypeTag::Date => "date",
            TypeTag::Time => "time",
        }
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// A literal coerced to the runtime type of its bound property
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub enum TypedValue {
    /// String value
    String(String),
    /// Boolean value
    Bool(bool),
    /// Integer value
    Int(i64),
    /// Decimal value
    Decimal(f64),
    /// GUID value
    Guid(Uuid),
    /// Enum member name (validated against the declared members)
    Enum(String),
    /// Date-time with offset
    DateTimeOffset(DateTime<FixedOffset>),
    /// Calendar date
    Date(NaiveDate),
    /// Wall-clock time
    Time(NaiveTime),
}

impl TypedValue {
    /// Ordering between two values of the same tag, where the tag is ordered.
    ///
    /// Values of different tags never compare; the binder guarantees both
    /// sides of a comparison share a tag before a predicate is built.
    pub fn compare(&self, other: &TypedValue) -> Option<Ordering> {
        match (self, other) {
            (TypedValue::String(a), TypedValue::String(b)) => Some(a.cmp(b)),
            (TypedValue::Int(a), TypedValue::Int(b)) => Some(a.cmp(b)),
            (TypedValue::Decimal(a), TypedValue::Decimal(b)) => a.partial_cmp(b),
            (TypedValue::DateTimeOffset(a), TypedValue::DateTimeOffset(b)) => Some(a.cmp(b)),
            (TypedValue::Date(a), TypedValue::Date(b)) => Some(a.cmp(b)),
            (TypedValue::Time(a), TypedValue::Time(b)) => Some(a.cmp(b)),
            _ => None,
        }
    }
}

impl fmt::Display for TypedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypedValue::String(s) => write!(f, "\"{}\"", s),
            TypedValue::Bool(b) => write!(f, "{}", b),
            TypedValue::Int(i) => write!(f, "{}", i),
            TypedValue::Decimal(d) => write!(f, "{}", d),
            TypedValue::Guid(g) => write!(f, "\"{}\"", g),
            TypedValue::Enum(m) => write!(f, "{}", m),
            TypedValue::DateTimeOffset(dt) => write!(f, "{}", dt.to_rfc3339()),
            TypedValue::Date(d) => write!(f, "{}", d),
            TypedValue::Time(t) => write!(f, "{}", t),
        }
    }
}

/// The right-hand side of a comparison after coercion
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub enum Literal {
    /// A single typed value
    Scalar(TypedValue),
    /// An ordered list of typed values (`In` membership)
    List(Vec<TypedValue>),
    /// The `null` sentinel
    Null,
}

impl Literal {
    /// True for the `null` sentinel
    pub fn is_null(&self) -> bool {
        matches!(self, Literal::Null)
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Literal::Scalar(v) => write!(f, "{}", v),
            Literal::List(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                write!(f, "]")
            }
            Literal::Null => write!(f, "null"),
        }
    }
}
