//! Test helpers for asserting parser outcomes.
use crate::errors::TagExpressionError;
use crate::expression::Expression;
use crate::parser::TagExpressionParser;

pub(crate) fn lit(name: &str) -> Expression {
    Expression::literal(name)
}

pub(crate) fn parse_ok(text: &str) -> Expression {
    match TagExpressionParser::parse(text) {
        Ok(expr) => expr,
        Err(err) => panic!("tag expression `{text}` should parse: {err}"),
    }
}

pub(crate) fn parse_err(text: &str) -> TagExpressionError {
    match TagExpressionParser::parse(text) {
        Ok(expr) => panic!("tag expression `{text}` should fail, parsed as {expr}"),
        Err(err) => err,
    }
}
