//! Tokenizer for the filter language
//!
//! Produces a flat token stream with byte offsets. Operator glyphs are
//! matched maximal-munch against the shared glyph table (longest glyph
//! first), string literals are double-quote delimited with no escape
//! processing, and unquoted literal text is carried as bare words for the
//! coercer to interpret against the bound property type.

use std::fmt;

use nom::{
    bytes::complete::{take_while, take_while1},
    character::complete::char,
    combinator::{opt, recognize},
    multi::many0,
    sequence::{delimited, preceded},
    IResult, Parser,
};

use strainer_shared::{ops, FilterError, Operator};

/// What a token is
#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    /// Dotted property path (also bare enum member names in value position)
    Path(String),
    /// Double-quoted string literal, quotes stripped, content verbatim
    Str(String),
    /// Digit-leading bare word: number, date, time or date-time text
    Word(String),
    /// `true`
    True,
    /// `false`
    False,
    /// `null`
    Null,
    /// A comparison operator glyph
    Op(Operator),
    /// `&&`
    And,
    /// `||`
    Or,
    /// `!`
    Not,
    /// `(`
    GroupOpen,
    /// `)`
    GroupClose,
    /// `[`
    ListOpen,
    /// `]`
    ListClose,
    /// `,`
    ListSeparator,
}

/// One token with its source location
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    /// What the token is
    pub kind: TokenKind,
    /// Byte offset of the first character in the filter string
    pub offset: usize,
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenKind::Path(p) => write!(f, "{}", p),
            TokenKind::Str(s) => write!(f, "\"{}\"", s),
            TokenKind::Word(w) => write!(f, "{}", w),
            TokenKind::True => write!(f, "true"),
            TokenKind::False => write!(f, "false"),
            TokenKind::Null => write!(f, "null"),
            TokenKind::Op(op) => write!(f, "{}", op),
            TokenKind::And => write!(f, "&&"),
            TokenKind::Or => write!(f, "||"),
            TokenKind::Not => write!(f, "!"),
            TokenKind::GroupOpen => write!(f, "("),
            TokenKind::GroupClose => write!(f, ")"),
            TokenKind::ListOpen => write!(f, "["),
            TokenKind::ListClose => write!(f, "]"),
            TokenKind::ListSeparator => write!(f, ","),
        }
    }
}

/// One identifier segment: letter or underscore, then word characters
fn ident(input: &str) -> IResult<&str, &str> {
    recognize((
        take_while1(|c: char| c.is_alphabetic() || c == '_'),
        take_while(|c: char| c.is_alphanumeric() || c == '_'),
    ))
    .parse(input)
}

/// Greedy dotted path: `ident ('.' ident)*`
fn path(input: &str) -> IResult<&str, &str> {
    recognize((ident, many0(preceded(char('.'), ident)))).parse(input)
}

/// Quoted string; content is everything up to the closing quote
fn quoted(input: &str) -> IResult<&str, &str> {
    delimited(char('"'), take_while(|c: char| c != '"'), char('"')).parse(input)
}

/// Digit-leading bare word. The continuation set covers numeric, date,
/// time and date-time shapes (`2022-07-01T00:00:03Z`, `10:30:00`, `-3.5`);
/// the coercer decides what the text means once the target type is known.
fn bare_word(input: &str) -> IResult<&str, &str> {
    recognize((
        opt(char('-')),
        take_while1(|c: char| c.is_ascii_digit()),
        take_while(|c: char| c.is_alphanumeric() || matches!(c, '.' | ':' | '-' | '+')),
    ))
    .parse(input)
}

fn keyword_or_path(text: &str) -> TokenKind {
    match text {
        "true" => TokenKind::True,
        "false" => TokenKind::False,
        "null" => TokenKind::Null,
        _ => TokenKind::Path(text.to_string()),
    }
}

/// Maximal-munch operator/punctuation match at the head of `rest`.
fn symbol(rest: &str) -> Option<(TokenKind, usize)> {
    // Logical glyphs first; they share no prefix with the operator table
    if rest.starts_with("&&") {
        return Some((TokenKind::And, 2));
    }
    if rest.starts_with("||") {
        return Some((TokenKind::Or, 2));
    }
    for &(glyph, kind, case_insensitive) in ops::GLYPH_TABLE {
        if rest.starts_with(glyph) {
            return Some((
                TokenKind::Op(Operator {
                    kind,
                    case_insensitive,
                }),
                glyph.len(),
            ));
        }
    }
    // Bare `!` only after the negated operator glyphs failed to match
    let first = rest.chars().next()?;
    let kind = match first {
        '!' => TokenKind::Not,
        '(' => TokenKind::GroupOpen,
        ')' => TokenKind::GroupClose,
        '[' => TokenKind::ListOpen,
        ']' => TokenKind::ListClose,
        ',' => TokenKind::ListSeparator,
        _ => return None,
    };
    Some((kind, first.len_utf8()))
}

/// Tokenize a filter string.
///
/// Fails on unterminated quoted strings, unrecognized symbols and
/// unbalanced group/list brackets. Whitespace between tokens is
/// insignificant.
pub fn tokenize(input: &str) -> Result<Vec<Token>, FilterError> {
    let mut tokens = Vec::new();
    let mut brackets: Vec<(char, usize)> = Vec::new();
    let mut rest = input;

    loop {
        rest = rest.trim_start();
        if rest.is_empty() {
            break;
        }
        let offset = input.len() - rest.len();
        // Resolution order: quoted strings, identifiers/keywords, numeric
        // bare words, then operator and punctuation glyphs.
        let first = rest.chars().next().expect("non-empty input");

        let (kind, consumed) = if first == '"' {
            match quoted(rest) {
                Ok((after, content)) => {
                    (TokenKind::Str(content.to_string()), rest.len() - after.len())
                }
                Err(_) => {
                    return Err(FilterError::Lex {
                        message: "unterminated string literal".to_string(),
                        offset,
                    })
                }
            }
        } else if first.is_alphabetic() || first == '_' {
            let (after, text) = path(rest).map_err(|_| FilterError::Lex {
                message: format!("malformed property path starting with `{}`", first),
                offset,
            })?;
            (keyword_or_path(text), rest.len() - after.len())
        } else if first.is_ascii_digit()
            || (first == '-' && rest.chars().nth(1).is_some_and(|c| c.is_ascii_digit()))
        {
            let (after, text) = bare_word(rest).map_err(|_| FilterError::Lex {
                message: format!("malformed literal starting with `{}`", first),
                offset,
            })?;
            (TokenKind::Word(text.to_string()), rest.len() - after.len())
        } else if let Some((kind, len)) = symbol(rest) {
            (kind, len)
        } else {
            return Err(FilterError::Lex {
                message: format!("unrecognized symbol `{}`", first),
                offset,
            });
        };

        match kind {
            TokenKind::GroupOpen => brackets.push(('(', offset)),
            TokenKind::ListOpen => brackets.push(('[', offset)),
            TokenKind::GroupClose => {
                if brackets.pop().map(|(c, _)| c) != Some('(') {
                    return Err(FilterError::Lex {
                        message: "unbalanced `)`".to_string(),
                        offset,
                    });
                }
            }
            TokenKind::ListClose => {
                if brackets.pop().map(|(c, _)| c) != Some('[') {
                    return Err(FilterError::Lex {
                        message: "unbalanced `]`".to_string(),
                        offset,
                    });
                }
            }
            _ => {}
        }

        tokens.push(Token { kind, offset });
        rest = &rest[consumed..];
    }

    if let Some((open, offset)) = brackets.pop() {
        return Err(FilterError::Lex {
            message: format!("unbalanced `{}`", open),
            offset,
        });
    }

    Ok(tokens)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use strainer_shared::OperatorKind;

    fn kinds(input: &str) -> Vec<TokenKind> {
        tokenize(input)
            .unwrap()
            .into_iter()
            .map(|t| t.kind)
            .collect()
    }

    #[test]
    fn test_simple_comparison() {
        assert_eq!(
            kinds(r#"Title == "waffle""#),
            vec![
                TokenKind::Path("Title".into()),
                TokenKind::Op(Operator::new(OperatorKind::Equals)),
                TokenKind::Str("waffle".into()),
            ]
        );
    }

    #[test]
    fn test_offsets() {
        let tokens = tokenize(r#"Age > 30"#).unwrap();
        assert_eq!(tokens[0].offset, 0);
        assert_eq!(tokens[1].offset, 4);
        assert_eq!(tokens[2].offset, 6);
    }

    #[test]
    fn test_maximal_munch_prefers_longest_glyph() {
        assert_eq!(
            kinds(r#"Title @=* "w""#)[1],
            TokenKind::Op(Operator::case_insensitive(OperatorKind::Contains))
        );
        assert_eq!(
            kinds(r#"Title !_-=* "w""#)[1],
            TokenKind::Op(Operator::case_insensitive(OperatorKind::NotEndsWith))
        );
        assert_eq!(
            kinds("Tags #>= 2")[1],
            TokenKind::Op(Operator::new(OperatorKind::CountGreaterThanOrEqual))
        );
    }

    #[test]
    fn test_negated_glyphs_beat_logical_not() {
        assert_eq!(
            kinds(r#"Title != "w""#)[1],
            TokenKind::Op(Operator::new(OperatorKind::NotEquals))
        );
        assert_eq!(kinds(r#"!(Age > 1)"#)[0], TokenKind::Not);
    }

    #[test]
    fn test_dotted_path_is_one_token() {
        assert_eq!(
            kinds(r#"SingleNestItem.Name != null"#),
            vec![
                TokenKind::Path("SingleNestItem.Name".into()),
                TokenKind::Op(Operator::new(OperatorKind::NotEquals)),
                TokenKind::Null,
            ]
        );
    }

    #[test]
    fn test_bare_word_shapes() {
        assert_eq!(kinds("Age > -5")[2], TokenKind::Word("-5".into()));
        assert_eq!(kinds("Rating > 3.5")[2], TokenKind::Word("3.5".into()));
        assert_eq!(
            kinds("SpecificDate > 2022-07-01T00:00:03Z")[2],
            TokenKind::Word("2022-07-01T00:00:03Z".into())
        );
        assert_eq!(kinds("Time == 10:30:00")[2], TokenKind::Word("10:30:00".into()));
    }

    #[test]
    fn test_empty_string_literal_is_distinct_from_null() {
        assert_eq!(kinds(r#"Name == """#)[2], TokenKind::Str(String::new()));
        assert_eq!(kinds("Name == null")[2], TokenKind::Null);
    }

    #[test]
    fn test_list_literal() {
        assert_eq!(
            kinds(r#"Id ^^ ["a", "b"]"#),
            vec![
                TokenKind::Path("Id".into()),
                TokenKind::Op(Operator::new(OperatorKind::In)),
                TokenKind::ListOpen,
                TokenKind::Str("a".into()),
                TokenKind::ListSeparator,
                TokenKind::Str("b".into()),
                TokenKind::ListClose,
            ]
        );
    }

    #[test]
    fn test_whitespace_is_insignificant() {
        assert_eq!(kinds("Age>30"), kinds("Age  >  30"));
        assert_eq!(kinds("(A==1)&&(B==2)").len(), 11);
    }

    #[test]
    fn test_unterminated_string() {
        let err = tokenize(r#"Title == "waffle"#).unwrap_err();
        assert!(matches!(err, FilterError::Lex { offset: 9, .. }), "{err:?}");
    }

    #[test]
    fn test_unbalanced_brackets() {
        assert!(matches!(
            tokenize("(Age > 1").unwrap_err(),
            FilterError::Lex { .. }
        ));
        assert!(matches!(
            tokenize("Age > 1)").unwrap_err(),
            FilterError::Lex { .. }
        ));
        assert!(matches!(
            tokenize(r#"Id ^^ ["a""#).unwrap_err(),
            FilterError::Lex { .. }
        ));
    }

    #[test]
    fn test_unrecognized_symbol() {
        let err = tokenize("Age $ 30").unwrap_err();
        assert!(matches!(err, FilterError::Lex { offset: 4, .. }), "{err:?}");
    }
}
