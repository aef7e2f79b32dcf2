//! Shunting Yard parser building [`Expression`] trees from token sequences.
//!
//! Two stacks drive the parse: pending operator tokens (with `(` kept as a
//! marker) and finished sub-expressions. Operators are reduced into the
//! expression stack as soon as precedence allows, so no recursion is needed.

use crate::errors::{ErrorLocation, TagExpressionError};
use crate::expression::Expression;
use crate::lexer::tokenize;
use crate::token::{Token, TokenType, classify};

const BEGIN: &str = "BEGIN";

/// Parser for boolean tag expressions.
///
/// Supports binary `and` and `or`, unary `not`, and parentheses:
///
/// ```
/// use tag_expressions::TagExpressionParser;
///
/// let expr = TagExpressionParser::parse("(a and not b) or (c and d)")?;
/// assert!(expr.evaluate(&["a"]));
/// assert!(expr.evaluate(&["c", "d", "b"]));
/// assert!(!expr.evaluate(&["a", "b"]));
/// # Ok::<(), tag_expressions::TagExpressionError>(())
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct TagExpressionParser;

impl TagExpressionParser {
    /// Parse `text` into an expression tree.
    ///
    /// # Errors
    /// Returns [`TagExpressionError`] for illegal escapes, grammar violations,
    /// and unbalanced parentheses. No partial tree is ever returned.
    pub fn parse(text: &str) -> Result<Expression, TagExpressionError> {
        let result = tokenize(text).and_then(|tokens| {
            if tokens.is_empty() {
                return Ok(Expression::True);
            }
            ShuntingYard::new(text, &tokens).run()
        });
        match &result {
            Ok(expr) => log::trace!("parsed tag expression {text:?} as {expr}"),
            Err(err) => log::debug!("rejected tag expression {text:?}: {err}"),
        }
        result
    }

    /// Split `text` into token strings.
    ///
    /// # Errors
    /// Returns [`TagExpressionError::IllegalEscape`] for an invalid escape.
    pub fn tokenize(text: &str) -> Result<Vec<String>, TagExpressionError> {
        tokenize(text)
    }

    /// Select the keyword token matching `text`, or `None` for an operand.
    #[must_use]
    pub fn select_token(text: &str) -> Option<Token> {
        classify(text)
    }
}

struct ShuntingYard<'a> {
    text: &'a str,
    tokens: &'a [String],
    operators: Vec<Token>,
    expressions: Vec<Expression>,
    expected: TokenType,
    last_part: &'a str,
}

impl<'a> ShuntingYard<'a> {
    fn new(text: &'a str, tokens: &'a [String]) -> Self {
        Self {
            text,
            tokens,
            operators: Vec::new(),
            expressions: Vec::new(),
            expected: TokenType::Operand,
            last_part: BEGIN,
        }
    }

    fn run(mut self) -> Result<Expression, TagExpressionError> {
        let tokens = self.tokens;
        for (index, part) in tokens.iter().enumerate() {
            match classify(part) {
                None => {
                    self.expect(TokenType::Operand, index)?;
                    self.expressions.push(Expression::literal(part.as_str()));
                    self.expected = TokenType::Operator;
                }
                Some(token @ (Token::Not | Token::OpenParen)) => {
                    self.expect(TokenType::Operand, index)?;
                    self.operators.push(token);
                    self.expected = TokenType::Operand;
                }
                Some(token @ (Token::And | Token::Or)) => {
                    self.expect(TokenType::Operator, index)?;
                    self.reduce_while_lower(token)?;
                    self.operators.push(token);
                    self.expected = TokenType::Operand;
                }
                Some(Token::CloseParen) => {
                    self.expect(TokenType::Operator, index)?;
                    self.close_paren(index)?;
                    self.expected = TokenType::Operator;
                }
            }
            self.last_part = part;
        }
        self.finish()
    }

    fn expect(&self, token_type: TokenType, index: usize) -> Result<(), TagExpressionError> {
        if self.expected == token_type {
            return Ok(());
        }
        Err(TagExpressionError::UnexpectedToken {
            expected: self.expected,
            after: self.last_part.to_string(),
            location: ErrorLocation::new(self.tokens, index),
        })
    }

    fn reduce_while_lower(&mut self, incoming: Token) -> Result<(), TagExpressionError> {
        while let Some(&top) = self.operators.last() {
            if !(top.is_operator() && incoming.has_lower_precedence_than(top)) {
                break;
            }
            self.operators.pop();
            self.reduce(top)?;
        }
        Ok(())
    }

    fn close_paren(&mut self, index: usize) -> Result<(), TagExpressionError> {
        loop {
            match self.operators.pop() {
                Some(Token::OpenParen) => return Ok(()),
                Some(operator) => self.reduce(operator)?,
                None => {
                    return Err(TagExpressionError::TooFewOpenParens {
                        text: self.text.to_string(),
                        location: ErrorLocation::new(self.tokens, index),
                    });
                }
            }
        }
    }

    fn finish(mut self) -> Result<Expression, TagExpressionError> {
        // A trailing `and`, `or`, `not` or `(` still waits for its operand.
        self.expect(TokenType::Operator, self.tokens.len())?;

        while let Some(operator) = self.operators.pop() {
            if operator == Token::OpenParen {
                return Err(TagExpressionError::UnclosedParen {
                    text: self.text.to_string(),
                });
            }
            self.reduce(operator)?;
        }

        let found = self.expressions.len();
        match self.expressions.pop() {
            Some(expr) if found == 1 => Ok(expr),
            _ => Err(TagExpressionError::UnbalancedExpression {
                text: self.text.to_string(),
                found,
            }),
        }
    }

    /// Pop `operator`'s operands and push the combined expression.
    ///
    /// Operands keep their source order: the first popped is the right-hand
    /// side.
    fn reduce(&mut self, operator: Token) -> Result<(), TagExpressionError> {
        if !operator.is_operator() {
            return Err(TagExpressionError::NotAnOperator { token: operator });
        }
        let found = self.expressions.len();
        let arity = operator.arity();
        let too_few = TagExpressionError::TooFewOperands {
            operator,
            expected: arity,
            found,
        };
        if found < arity {
            return Err(too_few);
        }
        let mut operands = self.expressions.split_off(found - arity).into_iter();
        let expr = match (operator, operands.next(), operands.next()) {
            (Token::And, Some(lhs), Some(rhs)) => Expression::and(lhs, rhs),
            (Token::Or, Some(lhs), Some(rhs)) => Expression::or(lhs, rhs),
            (Token::Not, Some(term), None) => Expression::not(term),
            _ => return Err(too_few),
        };
        self.expressions.push(expr);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{lit, parse_err, parse_ok};
    use rstest::rstest;

    #[test]
    fn empty_text_is_always_true() {
        assert_eq!(parse_ok(""), Expression::True);
        assert_eq!(parse_ok(" \t "), Expression::True);
    }

    #[test]
    fn builds_left_associative_binary_nodes() {
        let expr = parse_ok("a and b and c");
        assert_eq!(
            expr,
            Expression::and(Expression::and(lit("a"), lit("b")), lit("c"))
        );
    }

    #[test]
    fn and_binds_tighter_than_or() {
        assert_eq!(
            parse_ok("a or b and c"),
            Expression::or(lit("a"), Expression::and(lit("b"), lit("c")))
        );
        assert_eq!(
            parse_ok("a and b or c"),
            Expression::or(Expression::and(lit("a"), lit("b")), lit("c"))
        );
    }

    #[test]
    fn not_binds_tightest_and_chains() {
        assert_eq!(
            parse_ok("not a and b"),
            Expression::and(Expression::not(lit("a")), lit("b"))
        );
        assert_eq!(
            parse_ok("not not a"),
            Expression::not(Expression::not(lit("a")))
        );
    }

    #[test]
    fn parentheses_override_precedence() {
        assert_eq!(
            parse_ok("(a or b) and c"),
            Expression::and(Expression::or(lit("a"), lit("b")), lit("c"))
        );
        assert_eq!(
            parse_ok("not (a and b)"),
            Expression::not(Expression::and(lit("a"), lit("b")))
        );
    }

    #[test]
    fn keywords_are_case_sensitive() {
        assert_eq!(parse_ok("AND"), lit("AND"));
    }

    #[rstest]
    #[case("a b", TokenType::Operator, "a", 2)]
    #[case("and a", TokenType::Operand, "BEGIN", 0)]
    #[case("a and or b", TokenType::Operand, "and", 6)]
    #[case("a not b", TokenType::Operator, "a", 2)]
    #[case("a (b)", TokenType::Operator, "a", 2)]
    #[case("()", TokenType::Operand, "(", 2)]
    #[case("a and", TokenType::Operand, "and", 6)]
    #[case("not", TokenType::Operand, "not", 4)]
    fn reports_grammar_violations(
        #[case] input: &str,
        #[case] expected: TokenType,
        #[case] after: &str,
        #[case] column: usize,
    ) {
        let err = parse_err(input);
        let TagExpressionError::UnexpectedToken {
            expected: found_expected,
            after: found_after,
            location,
        } = &err
        else {
            panic!("expected grammar violation for `{input}`, got {err:?}");
        };
        assert_eq!(*found_expected, expected, "input `{input}`");
        assert_eq!(found_after, after, "input `{input}`");
        assert_eq!(location.column(), column, "input `{input}`");
    }

    #[test]
    fn reports_unmatched_close_paren() {
        let err = parse_err("a)");
        assert_eq!(
            err.to_string(),
            "Missing '(': Too few open-parens in: a)\nExpression: a )\n______________^ (HERE)"
        );
    }

    #[test]
    fn reports_unclosed_paren() {
        assert_eq!(
            parse_err("(a"),
            TagExpressionError::UnclosedParen { text: "(a".into() }
        );
        assert!(matches!(
            parse_err("((a) and b"),
            TagExpressionError::UnclosedParen { .. }
        ));
    }

    #[test]
    fn guards_reduction_without_operands() {
        let mut state = ShuntingYard::new("", &[]);
        state.expressions.push(lit("a"));
        assert_eq!(
            state.reduce(Token::Or),
            Err(TagExpressionError::TooFewOperands {
                operator: Token::Or,
                expected: 2,
                found: 1,
            })
        );
        state.expressions.clear();
        assert!(state.reduce(Token::Not).is_err());
    }

    #[rstest]
    #[case(Token::OpenParen)]
    #[case(Token::CloseParen)]
    fn refuses_to_reduce_parentheses(#[case] token: Token) {
        let mut state = ShuntingYard::new("", &[]);
        state.expressions.push(lit("a"));
        let err = state.reduce(token);
        assert_eq!(err, Err(TagExpressionError::NotAnOperator { token }));
        assert_eq!(state.expressions, [lit("a")]);
        let message = format!("Unexpected token: {token} is not an operator");
        assert_eq!(err.map_err(|e| e.to_string()), Err(message));
    }

    #[test]
    fn rejects_operands_left_without_an_operator() {
        let mut state = ShuntingYard::new("a b", &[]);
        state.expected = TokenType::Operator;
        state.expressions.extend([lit("a"), lit("b")]);
        let err = state.finish();
        assert_eq!(
            err,
            Err(TagExpressionError::UnbalancedExpression {
                text: "a b".into(),
                found: 2,
            })
        );
        assert_eq!(
            err.map_err(|e| e.to_string()),
            Err("Invalid expression: expected exactly one result, found 2 in: a b".to_string())
        );
    }

    #[test]
    fn class_style_parser_exposes_lexing_helpers() {
        assert_eq!(TagExpressionParser::select_token("or"), Some(Token::Or));
        assert_eq!(TagExpressionParser::select_token("@or"), None);
        let tokens = TagExpressionParser::tokenize("not(a)");
        assert_eq!(tokens, Ok(vec!["not".into(), "(".into(), "a".into(), ")".into()]));
    }
}
