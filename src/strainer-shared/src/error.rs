//! Error types for filter compilation
//!
//! Every failure a compile call can produce — lexing, binding, parsing,
//! coercion — surfaces through this one taxonomy, and every variant displays
//! with the `parsing failure` prefix callers match on. Errors are fatal to
//! the single compile call; nothing here is transient or retried.

use thiserror::Error;

/// Result type for compile operations
pub type Result<T> = std::result::Result<T, FilterError>;

/// Everything that can go wrong while compiling a filter string
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FilterError {
    /// Malformed token stream (unterminated string, unrecognized symbol)
    #[error("parsing failure: {message} at offset {offset}")]
    Lex {
        /// What the lexer could not make sense of
        message: String,
        /// Byte offset into the filter string
        offset: usize,
    },

    /// A path segment does not exist on the (possibly nested) schema
    #[error("parsing failure: unknown property `{path}` at offset {offset}")]
    UnknownProperty {
        /// The dotted path as written in the filter
        path: String,
        /// Byte offset of the path token
        offset: usize,
    },

    /// A path traverses through a segment that cannot be traversed
    #[error("parsing failure: invalid path `{path}`: {message} at offset {offset}")]
    InvalidPath {
        /// The dotted path as written in the filter
        path: String,
        /// Why the path does not resolve
        message: String,
        /// Byte offset of the path token
        offset: usize,
    },

    /// Operator not in the resolved property's allow-list
    #[error("parsing failure: operator `{operator}` cannot be applied to `{path}` at offset {offset}")]
    OperatorNotAllowed {
        /// The operator glyph as written
        operator: String,
        /// The property the operator was applied to
        path: String,
        /// Byte offset of the operator token
        offset: usize,
    },

    /// Literal text does not parse as the bound property's type
    #[error("parsing failure: cannot parse `{text}` as {expected} at offset {offset}")]
    Coercion {
        /// The literal text as written
        text: String,
        /// Name of the expected type
        expected: String,
        /// Byte offset of the literal token
        offset: usize,
    },

    /// Structurally invalid expression
    #[error("parsing failure: {message} at offset {offset}")]
    Grammar {
        /// What the parser expected instead
        message: String,
        /// Byte offset where the problem was noticed
        offset: usize,
    },

    /// Empty or whitespace-only filter string
    #[error("parsing failure: empty filter expression")]
    EmptyInput,
}

impl FilterError {
    /// The source offset the error points at, when one is available
    pub fn offset(&self) -> Option<usize> {
        match self {
            FilterError::Lex { offset, .. }
            | FilterError::UnknownProperty { offset, .. }
            | FilterError::InvalidPath { offset, .. }
            | FilterError::OperatorNotAllowed { offset, .. }
            | FilterError::Coercion { offset, .. }
            | FilterError::Grammar { offset, .. } => Some(*offset),
            FilterError::EmptyInput => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_variant_displays_as_parsing_failure() {
        let errors = [
            FilterError::Lex {
                message: "unterminated string literal".into(),
                offset: 3,
            },
            FilterError::UnknownProperty {
                path: "Nope".into(),
                offset: 0,
            },
            FilterError::InvalidPath {
                path: "Title.Length".into(),
                message: "`Title` is not a nested object".into(),
                offset: 0,
            },
            FilterError::OperatorNotAllowed {
                operator: ">".into(),
                path: "Id".into(),
                offset: 3,
            },
            FilterError::Coercion {
                text: "not-a-guid".into(),
                expected: "GUID".into(),
                offset: 6,
            },
            FilterError::Grammar {
                message: "expected a comparison".into(),
                offset: 0,
            },
            FilterError::EmptyInput,
        ];
        for err in errors {
            assert!(
                err.to_string().starts_with("parsing failure"),
                "{}",
                err
            );
        }
    }

    #[test]
    fn test_offset_accessor() {
        let err = FilterError::Coercion {
            text: "x".into(),
            expected: "integer".into(),
            offset: 9,
        };
        assert_eq!(err.offset(), Some(9));
        assert_eq!(FilterError::EmptyInput.offset(), None);
    }
}
