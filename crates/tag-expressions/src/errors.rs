//! Error types raised while tokenising and parsing tag expressions.

use std::fmt;
use thiserror::Error;

use crate::token::{Token, TokenType};

const LOCATION_LABEL: &str = "Expression: ";

/// Position of a syntax error within the tokenised expression.
///
/// Renders as two lines: the tokens joined by single spaces, and a caret
/// line pointing at the start of the offending token.
///
/// # Examples
/// ```
/// use tag_expressions::ErrorLocation;
/// let tokens = ["a".to_string(), "b".to_string()];
/// let location = ErrorLocation::new(&tokens, 1);
/// assert_eq!(location.column(), 2);
/// assert_eq!(
///     location.to_string(),
///     "Expression: a b\n______________^ (HERE)"
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorLocation {
    expression: String,
    column: usize,
}

impl ErrorLocation {
    /// Locate the token at `index` within `tokens`.
    ///
    /// An index past the end points just beyond the last token.
    #[must_use]
    pub fn new(tokens: &[String], index: usize) -> Self {
        let index = index.min(tokens.len());
        let preceding = tokens.get(..index).unwrap_or_default();
        let preceding_chars = preceding.join(" ").chars().count();
        let column = if index == 0 {
            0
        } else {
            preceding_chars + 1
        };
        Self {
            expression: tokens.join(" "),
            column,
        }
    }

    /// Token sequence joined by single spaces.
    #[must_use]
    pub fn expression(&self) -> &str {
        &self.expression
    }

    /// Zero-based character column of the offending token.
    #[must_use]
    pub fn column(&self) -> usize {
        self.column
    }
}

impl fmt::Display for ErrorLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let marker = "_".repeat(LOCATION_LABEL.len() + self.column);
        write!(
            f,
            "{LOCATION_LABEL}{}\n{marker}^ (HERE)",
            self.expression
        )
    }
}

/// Errors surfaced while converting text into an expression tree.
///
/// Evaluation and stringification of a parsed tree never fail, so this is the
/// only error a caller has to handle.
///
/// # Examples
/// ```
/// use tag_expressions::{TagExpressionError, parse};
/// let Err(err) = parse("a and") else {
///     panic!("dangling operator should be rejected");
/// };
/// assert!(matches!(err, TagExpressionError::UnexpectedToken { .. }));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TagExpressionError {
    /// A backslash preceded a character that cannot be escaped.
    #[error(
        "Tag expression \"{text}\" could not be parsed because of syntax error: Illegal escape before \"{character}\"."
    )]
    IllegalEscape {
        /// Original expression text.
        text: String,
        /// Character following the backslash.
        character: char,
    },
    /// The grammar required one token type and found the other.
    #[error("Syntax error. Expected {expected} after {after}\n{location}")]
    UnexpectedToken {
        /// Token type the grammar allowed at this position.
        expected: TokenType,
        /// Text of the preceding token, or `BEGIN` at the start.
        after: String,
        /// Where the offending token sits.
        location: ErrorLocation,
    },
    /// A closing parenthesis had no matching opening parenthesis.
    #[error("Missing '(': Too few open-parens in: {text}\n{location}")]
    TooFewOpenParens {
        /// Original expression text.
        text: String,
        /// Where the unmatched `)` sits.
        location: ErrorLocation,
    },
    /// An opening parenthesis was never closed.
    #[error("Unclosed '(': Too many open-parens in: {text}")]
    UnclosedParen {
        /// Original expression text.
        text: String,
    },
    /// An operator was reduced with fewer operands than it takes.
    #[error("{operator}: Too few operands (expected {expected}, found {found})")]
    TooFewOperands {
        /// Operator being reduced.
        operator: Token,
        /// Operands the operator requires.
        expected: usize,
        /// Operands available on the expression stack.
        found: usize,
    },
    /// A token other than an operator reached reduction.
    #[error("Unexpected token: {token} is not an operator")]
    NotAnOperator {
        /// Token taken from the operator stack.
        token: Token,
    },
    /// The operands did not combine into a single expression.
    #[error("Invalid expression: expected exactly one result, found {found} in: {text}")]
    UnbalancedExpression {
        /// Original expression text.
        text: String,
        /// Expressions left on the stack.
        found: usize,
    },
}

impl TagExpressionError {
    /// Full human-readable message, including any location diagnostic.
    #[must_use]
    pub fn message(&self) -> String {
        self.to_string()
    }

    /// Location of the offending token, when the error has one.
    #[must_use]
    pub fn location(&self) -> Option<&ErrorLocation> {
        match self {
            Self::UnexpectedToken { location, .. } | Self::TooFewOpenParens { location, .. } => {
                Some(location)
            }
            Self::IllegalEscape { .. }
            | Self::UnclosedParen { .. }
            | Self::TooFewOperands { .. }
            | Self::NotAnOperator { .. }
            | Self::UnbalancedExpression { .. } => None,
        }
    }
}
