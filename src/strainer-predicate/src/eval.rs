//! In-memory evaluation of compiled predicates over JSON documents
//!
//! One conforming consumer of the predicate contract: every operator kind
//! and typed-value tag is handled, with the null-propagation rules of the
//! compiler honored at access time. Dates, times and GUIDs are read from
//! ISO-8601 / dashed-hex strings in the document; GUID comparison is by
//! value, so text case never matters.

use chrono::{DateTime, NaiveDate, NaiveTime};
use serde_json::Value;
use uuid::Uuid;

use strainer_shared::{Literal, OperatorKind, TypedValue};

use crate::predicate::{AccessStep, Comparison, Predicate};

/// Evaluate a compiled predicate against one JSON document
pub fn matches(predicate: &Predicate, document: &Value) -> bool {
    match predicate {
        Predicate::Comparison(cmp) => eval_comparison(cmp, document),
        Predicate::And(l, r) => matches(l, document) && matches(r, document),
        Predicate::Or(l, r) => matches(l, document) || matches(r, document),
        Predicate::Not(inner) => !matches(inner, document),
    }
}

fn eval_comparison(cmp: &Comparison, document: &Value) -> bool {
    let mut current = Some(document);
    for step in &cmp.access.steps {
        match step {
            AccessStep::Field { name, .. } => {
                current = match current {
                    Some(Value::Object(map)) => map.get(name),
                    _ => None,
                };
            }
            AccessStep::Count => {
                // An absent or null collection counts as empty
                let count = match current {
                    Some(Value::Array(items)) => items.len() as i64,
                    _ => 0,
                };
                return eval_count(cmp, count);
            }
        }
    }

    match current {
        // Absent and null are one case at the leaf: an is-null test holds,
        // a does-not-have test holds vacuously, everything else fails.
        None | Some(Value::Null) => match cmp.op {
            OperatorKind::DoesNotHave => true,
            _ => cmp.when_missing,
        },
        Some(value) => eval_present(cmp, value),
    }
}

fn eval_count(cmp: &Comparison, count: i64) -> bool {
    let Literal::Scalar(TypedValue::Int(expected)) = cmp.value else {
        return false;
    };
    match cmp.op {
        OperatorKind::CountEquals => count == expected,
        OperatorKind::CountNotEquals => count != expected,
        OperatorKind::CountGreaterThan => count > expected,
        OperatorKind::CountGreaterThanOrEqual => count >= expected,
        OperatorKind::CountLessThan => count < expected,
        OperatorKind::CountLessThanOrEqual => count <= expected,
        _ => false,
    }
}

fn eval_present(cmp: &Comparison, value: &Value) -> bool {
    match (&cmp.value, cmp.op) {
        // A present, non-null value never equals null
        (Literal::Null, OperatorKind::Equals) => false,
        (Literal::Null, OperatorKind::NotEquals) => true,
        (Literal::Null, _) => false,
        (Literal::List(items), OperatorKind::In) => items
            .iter()
            .any(|item| typed_equals(value, item, cmp.case_insensitive)),
        (Literal::List(_), _) => false,
        (Literal::Scalar(expected), op) => eval_scalar(op, cmp.case_insensitive, value, expected),
    }
}

fn eval_scalar(op: OperatorKind, ci: bool, value: &Value, expected: &TypedValue) -> bool {
    match op {
        OperatorKind::Equals => typed_equals(value, expected, ci),
        OperatorKind::NotEquals => !typed_equals(value, expected, ci),
        OperatorKind::GreaterThan
        | OperatorKind::GreaterThanOrEqual
        | OperatorKind::LessThan
        | OperatorKind::LessThanOrEqual => {
            let Some(actual) = document_value(value, expected) else {
                return false;
            };
            match actual.compare(expected) {
                Some(ordering) => match op {
                    OperatorKind::GreaterThan => ordering.is_gt(),
                    OperatorKind::GreaterThanOrEqual => ordering.is_ge(),
                    OperatorKind::LessThan => ordering.is_lt(),
                    _ => ordering.is_le(),
                },
                None => false,
            }
        }
        OperatorKind::Contains
        | OperatorKind::NotContains
        | OperatorKind::StartsWith
        | OperatorKind::NotStartsWith
        | OperatorKind::EndsWith
        | OperatorKind::NotEndsWith
        | OperatorKind::SoundsLike
        | OperatorKind::DoesNotSoundLike => eval_string(op, ci, value, expected),
        OperatorKind::Has => match value {
            Value::Array(items) => items
                .iter()
                .any(|item| typed_equals(item, expected, ci)),
            _ => false,
        },
        OperatorKind::DoesNotHave => match value {
            Value::Array(items) => !items
                .iter()
                .any(|item| typed_equals(item, expected, ci)),
            _ => true,
        },
        // List-valued and count operators never reach here
        _ => false,
    }
}

fn eval_string(op: OperatorKind, ci: bool, value: &Value, expected: &TypedValue) -> bool {
    let (Value::String(actual), TypedValue::String(needle)) = (value, expected) else {
        return false;
    };
    let (actual, needle) = if ci {
        (actual.to_lowercase(), needle.to_lowercase())
    } else {
        (actual.clone(), needle.clone())
    };
    match op {
        OperatorKind::Contains => actual.contains(&needle),
        OperatorKind::NotContains => !actual.contains(&needle),
        OperatorKind::StartsWith => actual.starts_with(&needle),
        OperatorKind::NotStartsWith => !actual.starts_with(&needle),
        OperatorKind::EndsWith => actual.ends_with(&needle),
        OperatorKind::NotEndsWith => !actual.ends_with(&needle),
        OperatorKind::SoundsLike => soundex(&actual) == soundex(&needle),
        OperatorKind::DoesNotSoundLike => soundex(&actual) != soundex(&needle),
        _ => false,
    }
}

fn typed_equals(value: &Value, expected: &TypedValue, ci: bool) -> bool {
    match (document_value(value, expected), expected) {
        (Some(TypedValue::String(a)), TypedValue::String(b)) if ci => {
            a.to_lowercase() == b.to_lowercase()
        }
        (Some(actual), _) => actual == *expected,
        (None, _) => false,
    }
}

/// Read the document value at the leaf as the same tag as the literal.
///
/// `None` when the document holds something of a different shape; such a
/// value simply never matches.
fn document_value(value: &Value, like: &TypedValue) -> Option<TypedValue> {
    match like {
        TypedValue::String(_) => value.as_str().map(|s| TypedValue::String(s.to_string())),
        TypedValue::Bool(_) => value.as_bool().map(TypedValue::Bool),
        TypedValue::Int(_) => value.as_i64().map(TypedValue::Int),
        TypedValue::Decimal(_) => value.as_f64().map(TypedValue::Decimal),
        TypedValue::Guid(_) => value
            .as_str()
            .and_then(|s| Uuid::try_parse(s).ok())
            .map(TypedValue::Guid),
        TypedValue::Enum(_) => value.as_str().map(|s| TypedValue::Enum(s.to_string())),
        TypedValue::DateTimeOffset(_) => value
            .as_str()
            .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
            .map(TypedValue::DateTimeOffset),
        TypedValue::Date(_) => value
            .as_str()
            .and_then(|s| NaiveDate::parse_from_str(s, "%Y-%m-%d").ok())
            .map(TypedValue::Date),
        TypedValue::Time(_) => value
            .as_str()
            .and_then(|s| NaiveTime::parse_from_str(s, "%H:%M:%S").ok())
            .map(TypedValue::Time),
    }
}

/// American Soundex code of a string, e.g. `Robert` -> `R163`.
///
/// Non-ASCII-alphabetic characters are skipped; an input with no letters
/// codes to the empty string, which only matches itself.
fn soundex(input: &str) -> String {
    fn digit(c: char) -> Option<char> {
        match c {
            'B' | 'F' | 'P' | 'V' => Some('1'),
            'C' | 'G' | 'J' | 'K' | 'Q' | 'S' | 'X' | 'Z' => Some('2'),
            'D' | 'T' => Some('3'),
            'L' => Some('4'),
            'M' | 'N' => Some('5'),
            'R' => Some('6'),
            _ => None,
        }
    }

    let mut letters = input
        .chars()
        .filter(char::is_ascii_alphabetic)
        .map(|c| c.to_ascii_uppercase());
    let Some(first) = letters.next() else {
        return String::new();
    };

    let mut code = String::with_capacity(4);
    code.push(first);
    let mut previous = digit(first);
    for letter in letters {
        let current = digit(letter);
        if let Some(d) = current {
            if current != previous {
                code.push(d);
                if code.len() == 4 {
                    break;
                }
            }
        }
        // H and W are transparent: the previous code survives them
        if letter != 'H' && letter != 'W' {
            previous = current;
        }
    }
    while code.len() < 4 {
        code.push('0');
    }
    code
}
