//! Literal coercion against bound property types
//!
//! A literal token carries only text; the bound property fixes the runtime
//! type that text must parse as. Failures here are `FilterError::Coercion`
//! and never silent: a malformed GUID or an unknown enum member rejects the
//! whole compile call.

use chrono::{DateTime, NaiveDate, NaiveTime};
use uuid::Uuid;

use strainer_shared::{FilterError, TypeTag, TypedValue};

use crate::lexer::{Token, TokenKind};

/// Dashed hex form only; the 32-character compact form is rejected.
const GUID_TEXT_LEN: usize = 36;

fn fail(token: &Token, text: &str, expected: impl Into<String>) -> FilterError {
    FilterError::Coercion {
        text: text.to_string(),
        expected: expected.into(),
        offset: token.offset,
    }
}

/// Coerce one literal token to the target runtime type.
///
/// Quoting matters for two targets: `String` requires a quoted literal and
/// enum members must be bare words. Everything else accepts either form,
/// since dates, numbers and GUIDs appear quoted and unquoted in the wild.
pub fn coerce_token(token: &Token, target: &TypeTag) -> Result<TypedValue, FilterError> {
    let (text, quoted) = match &token.kind {
        TokenKind::Str(s) => (s.as_str(), true),
        TokenKind::Path(p) => (p.as_str(), false),
        TokenKind::Word(w) => (w.as_str(), false),
        TokenKind::True => ("true", false),
        TokenKind::False => ("false", false),
        other => {
            return Err(FilterError::Grammar {
                message: format!("expected a literal, found `{}`", other),
                offset: token.offset,
            })
        }
    };

    match target {
        TypeTag::String => {
            if !quoted {
                return Err(fail(token, text, "quoted string"));
            }
            Ok(TypedValue::String(text.to_string()))
        }
        TypeTag::Bool => text
            .parse::<bool>()
            .map(TypedValue::Bool)
            .map_err(|_| fail(token, text, "boolean")),
        TypeTag::Int => text
            .parse::<i64>()
            .map(TypedValue::Int)
            .map_err(|_| fail(token, text, "integer")),
        TypeTag::Decimal => match text.parse::<f64>() {
            Ok(d) if d.is_finite() => Ok(TypedValue::Decimal(d)),
            _ => Err(fail(token, text, "decimal")),
        },
        TypeTag::Guid => {
            if text.len() != GUID_TEXT_LEN {
                return Err(fail(token, text, "GUID"));
            }
            Uuid::try_parse(text)
                .map(TypedValue::Guid)
                .map_err(|_| fail(token, text, "GUID"))
        }
        TypeTag::Enum(def) => {
            if quoted || !matches!(token.kind, TokenKind::Path(_)) {
                return Err(fail(token, text, format!("bare {} member", def.name)));
            }
            if !def.has_member(text) {
                return Err(fail(token, text, format!("{} member", def.name)));
            }
            Ok(TypedValue::Enum(text.to_string()))
        }
        TypeTag::DateTimeOffset => DateTime::parse_from_rfc3339(text)
            .map(TypedValue::DateTimeOffset)
            .map_err(|_| fail(token, text, "date-time with offset")),
        TypeTag::Date => NaiveDate::parse_from_str(text, "%Y-%m-%d")
            .map(TypedValue::Date)
            .map_err(|_| fail(token, text, "date")),
        TypeTag::Time => NaiveTime::parse_from_str(text, "%H:%M:%S")
            .map(TypedValue::Time)
            .map_err(|_| fail(token, text, "time")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strainer_shared::EnumDef;

    fn str_token(text: &str) -> Token {
        Token {
            kind: TokenKind::Str(text.to_string()),
            offset: 0,
        }
    }

    fn word_token(text: &str) -> Token {
        Token {
            kind: TokenKind::Word(text.to_string()),
            offset: 0,
        }
    }

    fn path_token(text: &str) -> Token {
        Token {
            kind: TokenKind::Path(text.to_string()),
            offset: 0,
        }
    }

    #[test]
    fn test_guid_requires_dashed_hex() {
        let good = "550e8400-e29b-41d4-a716-446655440000";
        assert!(matches!(
            coerce_token(&str_token(good), &TypeTag::Guid),
            Ok(TypedValue::Guid(_))
        ));
        for bad in ["", "123", "not-a-guid", "550e8400e29b41d4a716446655440000"] {
            assert!(
                coerce_token(&str_token(bad), &TypeTag::Guid).is_err(),
                "accepted `{}`",
                bad
            );
        }
        // Right length, non-hex content
        let bad_hex = "zzze8400-e29b-41d4-a716-446655440000";
        assert!(coerce_token(&str_token(bad_hex), &TypeTag::Guid).is_err());
    }

    #[test]
    fn test_string_requires_quotes() {
        assert!(matches!(
            coerce_token(&str_token("waffle"), &TypeTag::String),
            Ok(TypedValue::String(ref s)) if s == "waffle"
        ));
        assert!(coerce_token(&path_token("waffle"), &TypeTag::String).is_err());
    }

    #[test]
    fn test_empty_string_is_a_value() {
        assert_eq!(
            coerce_token(&str_token(""), &TypeTag::String).unwrap(),
            TypedValue::String(String::new())
        );
    }

    #[test]
    fn test_date_time_variants_parse_independently() {
        assert!(matches!(
            coerce_token(&word_token("2022-07-01T00:00:03Z"), &TypeTag::DateTimeOffset),
            Ok(TypedValue::DateTimeOffset(_))
        ));
        assert!(matches!(
            coerce_token(&word_token("2022-07-01"), &TypeTag::Date),
            Ok(TypedValue::Date(_))
        ));
        assert!(matches!(
            coerce_token(&word_token("10:30:00"), &TypeTag::Time),
            Ok(TypedValue::Time(_))
        ));
        // Shapes do not cross over
        assert!(coerce_token(&word_token("2022-07-01"), &TypeTag::DateTimeOffset).is_err());
        assert!(coerce_token(&word_token("10:30:00"), &TypeTag::Date).is_err());
    }

    #[test]
    fn test_enum_members_are_bare_and_exact() {
        let tag = TypeTag::Enum(EnumDef::new("BirthMonth", ["January", "February"]));
        assert_eq!(
            coerce_token(&path_token("January"), &tag).unwrap(),
            TypedValue::Enum("January".to_string())
        );
        assert!(coerce_token(&path_token("january"), &tag).is_err());
        assert!(coerce_token(&str_token("January"), &tag).is_err());
        // Numeric enum literals are rejected
        assert!(coerce_token(&word_token("1"), &tag).is_err());
    }

    #[test]
    fn test_numeric_parsing() {
        assert_eq!(
            coerce_token(&word_token("30"), &TypeTag::Int).unwrap(),
            TypedValue::Int(30)
        );
        assert_eq!(
            coerce_token(&word_token("-3.5"), &TypeTag::Decimal).unwrap(),
            TypedValue::Decimal(-3.5)
        );
        assert!(coerce_token(&word_token("3.5"), &TypeTag::Int).is_err());
        assert!(coerce_token(&word_token("99999999999999999999"), &TypeTag::Int).is_err());
    }

    #[test]
    fn test_coercion_error_carries_offset() {
        let token = Token {
            kind: TokenKind::Str("oops".to_string()),
            offset: 17,
        };
        let err = coerce_token(&token, &TypeTag::Guid).unwrap_err();
        assert_eq!(err.offset(), Some(17));
    }
}
