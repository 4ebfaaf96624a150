//! Precedence-climbing parser over the token stream
//!
//! Grammar, lowest to highest precedence:
//!
//! ```text
//! Or         := And ( '||' And )*
//! And        := Unary ( '&&' Unary )*
//! Unary      := [ '!' ] Comparison | '(' Or ')'
//! Comparison := PropertyPath Operator Literal
//! ```
//!
//! `&&` binds tighter than `||`; both are left-associative. Unary `!`
//! applies to a single comparison or a parenthesized group, never to an
//! unparenthesized `&&`/`||` chain.
//!
//! Parsing interleaves with binding: each property path is resolved through
//! the schema and each operator is checked against the resolved allow-list
//! before the comparison node is emitted, and literals are coerced to the
//! bound type on the spot. The schema is borrowed immutably, so parsing is
//! referentially transparent given a fixed schema.

use strainer_schema::{CollectionElement, PathSegment, ResolvedPath, Schema, SegmentKind};
use strainer_shared::{FilterError, Literal, Operator, OperatorFamily, OperatorKind, TypeTag};

use crate::ast::{BoundPath, ComparisonNode, Node};
use crate::coerce::coerce_token;
use crate::lexer::{tokenize, Token, TokenKind};

/// Parser for filter expressions against one schema
pub struct FilterParser<'a> {
    schema: &'a Schema,
}

struct Cursor<'t> {
    tokens: &'t [Token],
    pos: usize,
    end_offset: usize,
}

impl Cursor<'_> {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn advance(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.pos).cloned();
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    /// Offset of the current token, or of the end of input
    fn offset(&self) -> usize {
        self.peek().map_or(self.end_offset, |t| t.offset)
    }
}

impl<'a> FilterParser<'a> {
    /// Create a parser bound to a schema
    pub fn new(schema: &'a Schema) -> Self {
        Self { schema }
    }

    /// Parse a filter string into a bound AST
    pub fn parse(&self, input: &str) -> Result<Node, FilterError> {
        if input.trim().is_empty() {
            return Err(FilterError::EmptyInput);
        }
        let tokens = tokenize(input)?;
        let mut cursor = Cursor {
            tokens: &tokens,
            pos: 0,
            end_offset: input.len(),
        };
        let node = self.parse_or(&mut cursor)?;
        if let Some(token) = cursor.peek() {
            return Err(FilterError::Grammar {
                message: format!("unexpected token `{}`", token.kind),
                offset: token.offset,
            });
        }
        Ok(node)
    }

    fn parse_or(&self, cursor: &mut Cursor<'_>) -> Result<Node, FilterError> {
        let mut left = self.parse_and(cursor)?;
        while matches!(cursor.peek().map(|t| &t.kind), Some(TokenKind::Or)) {
            cursor.advance();
            let right = self.parse_and(cursor)?;
            left = Node::Or(Box::new(left), Box::new(right));
        }
        Ok(left)
    }

    fn parse_and(&self, cursor: &mut Cursor<'_>) -> Result<Node, FilterError> {
        let mut left = self.parse_unary(cursor)?;
        while matches!(cursor.peek().map(|t| &t.kind), Some(TokenKind::And)) {
            cursor.advance();
            let right = self.parse_unary(cursor)?;
            left = Node::And(Box::new(left), Box::new(right));
        }
        Ok(left)
    }

    fn parse_unary(&self, cursor: &mut Cursor<'_>) -> Result<Node, FilterError> {
        if matches!(cursor.peek().map(|t| &t.kind), Some(TokenKind::Not)) {
            cursor.advance();
            // `!` binds to one comparison or one parenthesized group only
            let operand = self.parse_primary(cursor)?;
            return Ok(Node::Not(Box::new(operand)));
        }
        self.parse_primary(cursor)
    }

    fn parse_primary(&self, cursor: &mut Cursor<'_>) -> Result<Node, FilterError> {
        if matches!(cursor.peek().map(|t| &t.kind), Some(TokenKind::GroupOpen)) {
            cursor.advance();
            let node = self.parse_or(cursor)?;
            match cursor.advance() {
                Some(Token {
                    kind: TokenKind::GroupClose,
                    ..
                }) => Ok(node),
                other => Err(FilterError::Grammar {
                    message: "expected `)`".to_string(),
                    offset: other.map_or(cursor.end_offset, |t| t.offset),
                }),
            }
        } else {
            self.parse_comparison(cursor)
        }
    }

    fn parse_comparison(&self, cursor: &mut Cursor<'_>) -> Result<Node, FilterError> {
        let at = cursor.offset();
        let Some(path_token) = cursor.advance() else {
            return Err(FilterError::Grammar {
                message: "expected a property path".to_string(),
                offset: at,
            });
        };
        let TokenKind::Path(path_text) = path_token.kind else {
            return Err(FilterError::Grammar {
                message: format!("expected a property path, found `{}`", path_token.kind),
                offset: path_token.offset,
            });
        };

        let at = cursor.offset();
        let Some(op_token) = cursor.advance() else {
            return Err(FilterError::Grammar {
                message: "expected a comparison operator".to_string(),
                offset: at,
            });
        };
        let TokenKind::Op(operator) = op_token.kind else {
            return Err(FilterError::Grammar {
                message: format!("expected a comparison operator, found `{}`", op_token.kind),
                offset: op_token.offset,
            });
        };

        let resolved = self.bind_path(&path_text, operator, path_token.offset)?;
        self.check_operator(&resolved, &path_text, operator, op_token.offset)?;

        let value = self.parse_value(cursor, &resolved, &path_text, operator, op_token.offset)?;

        Ok(Node::Comparison(ComparisonNode {
            path: BoundPath {
                text: path_text,
                resolved,
            },
            operator,
            value,
        }))
    }

    fn bind_path(
        &self,
        path_text: &str,
        operator: Operator,
        offset: usize,
    ) -> Result<ResolvedPath, FilterError> {
        let mut segments: Vec<PathSegment<'_>> =
            path_text.split('.').map(PathSegment::Named).collect();
        // A count operator addresses the cardinality of the path, so the
        // count pseudo-segment is appended before binding.
        if operator.kind.family() == OperatorFamily::Count {
            segments.push(PathSegment::Count);
        }
        self.schema.resolve(&segments, path_text, offset)
    }

    fn check_operator(
        &self,
        resolved: &ResolvedPath,
        path_text: &str,
        operator: Operator,
        offset: usize,
    ) -> Result<(), FilterError> {
        let not_allowed = || {
            Err(FilterError::OperatorNotAllowed {
                operator: operator.to_string(),
                path: path_text.to_string(),
                offset,
            })
        };
        if !resolved.allowed.contains(&operator.kind) {
            return not_allowed();
        }
        // The allow-list is configuration; the structural constraints of
        // each family hold regardless of overrides.
        match operator.kind.family() {
            OperatorFamily::String => {
                if !matches!(resolved.leaf().kind, SegmentKind::Scalar(TypeTag::String)) {
                    return not_allowed();
                }
            }
            OperatorFamily::Collection => {
                if !matches!(
                    resolved.leaf().kind,
                    SegmentKind::Collection(CollectionElement::Scalar(_))
                ) {
                    return not_allowed();
                }
            }
            OperatorFamily::Scalar | OperatorFamily::Count => {}
        }
        Ok(())
    }

    fn parse_value(
        &self,
        cursor: &mut Cursor<'_>,
        resolved: &ResolvedPath,
        path_text: &str,
        operator: Operator,
        op_offset: usize,
    ) -> Result<Literal, FilterError> {
        let at = cursor.offset();
        let Some(token) = cursor.advance() else {
            return Err(FilterError::Grammar {
                message: "expected a literal".to_string(),
                offset: at,
            });
        };

        match &token.kind {
            TokenKind::ListOpen => {
                if !operator.kind.takes_list() {
                    return Err(FilterError::Grammar {
                        message: "a list literal is only valid with the `^^` operator"
                            .to_string(),
                        offset: token.offset,
                    });
                }
                let target = self.scalar_target(resolved, path_text, operator, op_offset)?;
                self.parse_list(cursor, &target)
            }
            TokenKind::Null => {
                if !matches!(
                    operator.kind,
                    OperatorKind::Equals | OperatorKind::NotEquals
                ) {
                    return Err(FilterError::Grammar {
                        message: "`null` may only be compared with `==` or `!=`".to_string(),
                        offset: token.offset,
                    });
                }
                if !resolved.leaf_nullable {
                    return Err(FilterError::Grammar {
                        message: format!("property `{}` is not nullable", path_text),
                        offset: token.offset,
                    });
                }
                Ok(Literal::Null)
            }
            _ => {
                if operator.kind.takes_list() {
                    return Err(FilterError::Grammar {
                        message: format!(
                            "operator `{}` requires a list literal",
                            operator
                        ),
                        offset: token.offset,
                    });
                }
                let target = self.scalar_target(resolved, path_text, operator, op_offset)?;
                coerce_token(&token, &target).map(Literal::Scalar)
            }
        }
    }

    /// The runtime type a scalar literal must coerce to for this comparison
    fn scalar_target(
        &self,
        resolved: &ResolvedPath,
        path_text: &str,
        operator: Operator,
        op_offset: usize,
    ) -> Result<TypeTag, FilterError> {
        match operator.kind.family() {
            OperatorFamily::Count => Ok(TypeTag::Int),
            OperatorFamily::Collection => match &resolved.leaf().kind {
                SegmentKind::Collection(CollectionElement::Scalar(tag)) => Ok(tag.clone()),
                // Structural check already rejected everything else
                _ => unreachable!("collection operator bound to non-collection path"),
            },
            OperatorFamily::Scalar | OperatorFamily::String => match &resolved.leaf().kind {
                SegmentKind::Scalar(tag) => Ok(tag.clone()),
                SegmentKind::Nested => Err(FilterError::Grammar {
                    message: format!(
                        "nested object `{}` can only be compared to `null`",
                        path_text
                    ),
                    offset: op_offset,
                }),
                SegmentKind::Collection(_) | SegmentKind::Count => {
                    Err(FilterError::OperatorNotAllowed {
                        operator: operator.to_string(),
                        path: path_text.to_string(),
                        offset: op_offset,
                    })
                }
            },
        }
    }

    fn parse_list(
        &self,
        cursor: &mut Cursor<'_>,
        target: &TypeTag,
    ) -> Result<Literal, FilterError> {
        let mut items = Vec::new();
        // Each element is coerced independently; one malformed element
        // rejects the whole comparison.
        loop {
            let at = cursor.offset();
            let Some(token) = cursor.advance() else {
                return Err(FilterError::Grammar {
                    message: "expected `]`".to_string(),
                    offset: at,
                });
            };
            match &token.kind {
                TokenKind::ListClose if items.is_empty() => return Ok(Literal::List(items)),
                TokenKind::Null => {
                    return Err(FilterError::Grammar {
                        message: "`null` is not valid inside a list literal".to_string(),
                        offset: token.offset,
                    })
                }
                _ => items.push(coerce_token(&token, target)?),
            }
            let at = cursor.offset();
            match cursor.advance() {
                Some(Token {
                    kind: TokenKind::ListSeparator,
                    ..
                }) => {}
                Some(Token {
                    kind: TokenKind::ListClose,
                    ..
                }) => return Ok(Literal::List(items)),
                other => {
                    return Err(FilterError::Grammar {
                        message: "expected `,` or `]`".to_string(),
                        offset: other.map_or(at, |t| t.offset),
                    })
                }
            }
        }
    }
}
