//! The closed comparison-operator enumeration
//!
//! Operators are classified by an exhaustive match on `OperatorKind` rather
//! than by inspecting type names at runtime, so a missing arm is a compile
//! error. The case-insensitive `*` suffix is a flag on `Operator`, not a
//! separate kind.

use std::fmt;

use crate::value::TypeTag;

/// Broad classification of a comparison operator
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub enum OperatorFamily {
    /// Applies to scalar values (equality, ordering, list membership)
    Scalar,
    /// Applies to string-typed values only
    String,
    /// Applies to collection-typed properties only (element membership)
    Collection,
    /// Applies to the cardinality of a collection-typed property
    Count,
}

/// Every comparison operator the filter grammar knows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize)]
pub enum OperatorKind {
    /// `==`
    Equals,
    /// `!=`
    NotEquals,
    /// `>`
    GreaterThan,
    /// `>=`
    GreaterThanOrEqual,
    /// `<`
    LessThan,
    /// `<=`
    LessThanOrEqual,
    /// `@=`
    Contains,
    /// `!@=`
    NotContains,
    /// `_=`
    StartsWith,
    /// `!_=`
    NotStartsWith,
    /// `_-=`
    EndsWith,
    /// `!_-=`
    NotEndsWith,
    /// `~~`
    SoundsLike,
    /// `!~`
    DoesNotSoundLike,
    /// `^^` (scalar-in-list membership)
    In,
    /// `^$` (collection-has-element membership)
    Has,
    /// `!^$`
    DoesNotHave,
    /// `#==`
    CountEquals,
    /// `#!=`
    CountNotEquals,
    /// `#>`
    CountGreaterThan,
    /// `#>=`
    CountGreaterThanOrEqual,
    /// `#<`
    CountLessThan,
    /// `#<=`
    CountLessThanOrEqual,
}

impl OperatorKind {
    /// The family this operator belongs to
    pub fn family(self) -> OperatorFamily {
        use OperatorKind::*;
        match self {
            Equals | NotEquals | GreaterThan | GreaterThanOrEqual | LessThan
            | LessThanOrEqual | In => OperatorFamily::Scalar,
            Contains | NotContains | StartsWith | NotStartsWith | EndsWith | NotEndsWith
            | SoundsLike | DoesNotSoundLike => OperatorFamily::String,
            Has | DoesNotHave => OperatorFamily::Collection,
            CountEquals | CountNotEquals | CountGreaterThan | CountGreaterThanOrEqual
            | CountLessThan | CountLessThanOrEqual => OperatorFamily::Count,
        }
    }

    /// The base glyph (without the case-insensitive suffix)
    pub fn glyph(self) -> &'static str {
        use OperatorKind::*;
        match self {
            Equals => "==",
            NotEquals => "!=",
            GreaterThan => ">",
            GreaterThanOrEqual => ">=",
            LessThan => "<",
            LessThanOrEqual => "<=",
            Contains => "@=",
            NotContains => "!@=",
            StartsWith => "_=",
            NotStartsWith => "!_=",
            EndsWith => "_-=",
            NotEndsWith => "!_-=",
            SoundsLike => "~~",
            DoesNotSoundLike => "!~",
            In => "^^",
            Has => "^$",
            DoesNotHave => "!^$",
            CountEquals => "#==",
            CountNotEquals => "#!=",
            CountGreaterThan => "#>",
            CountGreaterThanOrEqual => "#>=",
            CountLessThan => "#<",
            CountLessThanOrEqual => "#<=",
        }
    }

    /// Whether the `*` case-insensitive suffix is meaningful for this kind
    pub fn supports_case_insensitive(self) -> bool {
        use OperatorKind::*;
        matches!(
            self,
            Equals
                | NotEquals
                | Contains
                | NotContains
                | StartsWith
                | NotStartsWith
                | EndsWith
                | NotEndsWith
                | In
                | Has
                | DoesNotHave
        )
    }

    /// Whether the right-hand side must be a list literal
    pub fn takes_list(self) -> bool {
        matches!(self, OperatorKind::In)
    }
}

/// A parsed operator: kind plus the case-insensitive flag from the `*` suffix
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub struct Operator {
    /// Which comparison this is
    pub kind: OperatorKind,
    /// True when the `*` suffix was present
    pub case_insensitive: bool,
}

impl Operator {
    /// A case-sensitive operator of the given kind
    pub fn new(kind: OperatorKind) -> Self {
        Self {
            kind,
            case_insensitive: false,
        }
    }

    /// The same operator with the case-insensitive flag set
    pub fn case_insensitive(kind: OperatorKind) -> Self {
        Self {
            kind,
            case_insensitive: true,
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.kind.glyph())?;
        if self.case_insensitive {
            write!(f, "*")?;
        }
        Ok(())
    }
}

/// Every operator glyph the lexer recognizes, longest first so that
/// maximal-munch matching is a plain first-prefix scan over this table.
pub const GLYPH_TABLE: &[(&str, OperatorKind, bool)] = &[
    ("!_-=*", OperatorKind::NotEndsWith, true),
    ("!_-=", OperatorKind::NotEndsWith, false),
    ("_-=*", OperatorKind::EndsWith, true),
    ("!@=*", OperatorKind::NotContains, true),
    ("!_=*", OperatorKind::NotStartsWith, true),
    ("!^$*", OperatorKind::DoesNotHave, true),
    ("_-=", OperatorKind::EndsWith, false),
    ("!@=", OperatorKind::NotContains, false),
    ("!_=", OperatorKind::NotStartsWith, false),
    ("!^$", OperatorKind::DoesNotHave, false),
    ("@=*", OperatorKind::Contains, true),
    ("_=*", OperatorKind::StartsWith, true),
    ("^^*", OperatorKind::In, true),
    ("^$*", OperatorKind::Has, true),
    ("==*", OperatorKind::Equals, true),
    ("!=*", OperatorKind::NotEquals, true),
    ("#==", OperatorKind::CountEquals, false),
    ("#!=", OperatorKind::CountNotEquals, false),
    ("#>=", OperatorKind::CountGreaterThanOrEqual, false),
    ("#<=", OperatorKind::CountLessThanOrEqual, false),
    ("@=", OperatorKind::Contains, false),
    ("_=", OperatorKind::StartsWith, false),
    ("^^", OperatorKind::In, false),
    ("^$", OperatorKind::Has, false),
    ("==", OperatorKind::Equals, false),
    ("!=", OperatorKind::NotEquals, false),
    (">=", OperatorKind::GreaterThanOrEqual, false),
    ("<=", OperatorKind::LessThanOrEqual, false),
    ("~~", OperatorKind::SoundsLike, false),
    ("!~", OperatorKind::DoesNotSoundLike, false),
    ("#>", OperatorKind::CountGreaterThan, false),
    ("#<", OperatorKind::CountLessThan, false),
    (">", OperatorKind::GreaterThan, false),
    ("<", OperatorKind::LessThan, false),
];

/// Default operator allow-list for a scalar property of the given tag.
///
/// The schema may override this per property; collection- and nested-typed
/// properties derive their allow-lists in the schema crate.
pub fn default_operators(tag: &TypeTag) -> Vec<OperatorKind> {
    use OperatorKind::*;
    let ordering = [GreaterThan, GreaterThanOrEqual, LessThan, LessThanOrEqual];
    let string_family = [
        Contains,
        NotContains,
        StartsWith,
        NotStartsWith,
        EndsWith,
        NotEndsWith,
        SoundsLike,
        DoesNotSoundLike,
    ];
    match tag {
        TypeTag::String => {
            let mut ops = vec![Equals, NotEquals, In];
            ops.extend(ordering);
            ops.extend(string_family);
            ops
        }
        TypeTag::Int | TypeTag::Decimal | TypeTag::DateTimeOffset | TypeTag::Date
        | TypeTag::Time => {
            let mut ops = vec![Equals, NotEquals, In];
            ops.extend(ordering);
            ops
        }
        // No ordering and no string family on GUIDs
        TypeTag::Guid => vec![Equals, NotEquals, In],
        TypeTag::Enum(_) => vec![Equals, NotEquals, In],
        TypeTag::Bool => vec![Equals, NotEquals],
    }
}
