//! Boolean tag expressions for test selection.
//!
//! A tag expression combines literal tags with `and`, `or`, `not`, and
//! parentheses, for example `@fast and (not @wip or @nightly)`. The crate
//! tokenises the text, builds an expression tree with the Shunting Yard
//! algorithm, and evaluates the tree against a set of tags.
//!
//! ```
//! use std::collections::HashSet;
//!
//! let expr = tag_expressions::parse("a and (b or not c)")?;
//! let tags: HashSet<&str> = ["a", "other"].into_iter().collect();
//! assert!(expr.evaluate(&tags));
//! assert_eq!(expr.to_string(), "( a and ( b or not ( c ) ) )");
//! # Ok::<(), tag_expressions::TagExpressionError>(())
//! ```

mod errors;
mod expression;
mod lexer;
mod parser;
#[cfg(test)]
pub(crate) mod test_support;
mod token;

pub use errors::{ErrorLocation, TagExpressionError};
pub use expression::{Expression, Tags};
pub use lexer::tokenize;
pub use parser::TagExpressionParser;
pub use token::{Associativity, Token, TokenParseError, TokenType, classify};

/// Parse a tag expression into an evaluable [`Expression`] tree.
///
/// Empty (or whitespace-only) text yields [`Expression::True`].
///
/// # Errors
/// Returns [`TagExpressionError`] when the text contains an illegal escape,
/// violates the operand/operator grammar, or has unbalanced parentheses.
///
/// # Examples
/// ```
/// let expr = tag_expressions::parse("not @slow")?;
/// assert!(expr.evaluate(&["@fast"]));
/// assert!(!expr.evaluate(&["@slow"]));
/// # Ok::<(), tag_expressions::TagExpressionError>(())
/// ```
pub fn parse(text: &str) -> Result<Expression, TagExpressionError> {
    TagExpressionParser::parse(text)
}
