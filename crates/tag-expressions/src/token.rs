//! Keyword tokens recognised by the tag-expression grammar.
//!
//! Every token that is not one of these keywords is an operand (a literal tag
//! name). Each keyword carries the precedence and associativity the parser
//! needs to group operators without explicit parentheses.

use std::fmt;
use std::str::FromStr;

/// How operators of equal precedence group in the absence of parentheses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Associativity {
    /// `a and b and c` groups as `(a and b) and c`.
    Left,
    /// `not not a` groups as `not (not a)`.
    Right,
}

/// Grammatical role the parser expects from the next token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenType {
    /// A literal, `not`, or `(`.
    Operand,
    /// A binary operator or `)`.
    Operator,
}

impl TokenType {
    /// Lowercase name used in diagnostics.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Operand => "operand",
            Self::Operator => "operator",
        }
    }
}

impl fmt::Display for TokenType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Keyword token of the tag-expression grammar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Token {
    /// Binary disjunction, lowest precedence.
    Or,
    /// Binary conjunction.
    And,
    /// Unary negation, highest precedence.
    Not,
    /// Opening parenthesis; kept on the operator stack as a marker.
    OpenParen,
    /// Closing parenthesis.
    CloseParen,
}

impl Token {
    /// Every keyword token, in precedence order.
    pub const ALL: [Self; 5] = [
        Self::Or,
        Self::And,
        Self::Not,
        Self::OpenParen,
        Self::CloseParen,
    ];

    /// Exact text that selects this token.
    ///
    /// # Examples
    ///
    /// ```
    /// use tag_expressions::Token;
    ///
    /// assert_eq!(Token::And.keyword(), "and");
    /// assert_eq!(Token::OpenParen.keyword(), "(");
    /// ```
    #[must_use]
    pub const fn keyword(self) -> &'static str {
        match self {
            Self::Or => "or",
            Self::And => "and",
            Self::Not => "not",
            Self::OpenParen => "(",
            Self::CloseParen => ")",
        }
    }

    /// Binding strength; parentheses carry negative sentinel values.
    #[must_use]
    pub const fn precedence(self) -> i8 {
        match self {
            Self::Or => 0,
            Self::And => 1,
            Self::Not => 2,
            Self::OpenParen => -2,
            Self::CloseParen => -1,
        }
    }

    /// Associativity of operators; parentheses have none.
    #[must_use]
    pub const fn associativity(self) -> Option<Associativity> {
        match self {
            Self::Or | Self::And => Some(Associativity::Left),
            Self::Not => Some(Associativity::Right),
            Self::OpenParen | Self::CloseParen => None,
        }
    }

    /// Token type the grammar must expect for this token to be accepted.
    ///
    /// `not` and `(` start an operand; `and`, `or` and `)` follow one.
    #[must_use]
    pub const fn token_type(self) -> TokenType {
        match self {
            Self::Not | Self::OpenParen => TokenType::Operand,
            Self::Or | Self::And | Self::CloseParen => TokenType::Operator,
        }
    }

    /// Whether the token is a boolean operator rather than a parenthesis.
    #[must_use]
    pub const fn is_operator(self) -> bool {
        self.associativity().is_some()
    }

    /// Whether the token combines two operands.
    #[must_use]
    pub const fn is_binary(self) -> bool {
        matches!(self, Self::Or | Self::And)
    }

    /// Whether the token negates a single operand.
    #[must_use]
    pub const fn is_unary(self) -> bool {
        matches!(self, Self::Not)
    }

    /// Number of operands the operator consumes when reduced.
    #[must_use]
    pub const fn arity(self) -> usize {
        match self {
            Self::Or | Self::And => 2,
            Self::Not => 1,
            Self::OpenParen | Self::CloseParen => 0,
        }
    }

    /// Whether `text` is exactly this token's keyword.
    #[must_use]
    pub fn matches(self, text: &str) -> bool {
        self.keyword() == text
    }

    /// Whether an incoming `self` must wait for `other` on the stack to be
    /// reduced first.
    ///
    /// Left-associative operators yield to equal precedence, right-associative
    /// ones only to strictly higher precedence.
    ///
    /// # Examples
    ///
    /// ```
    /// use tag_expressions::Token;
    ///
    /// assert!(Token::And.has_lower_precedence_than(Token::And));
    /// assert!(Token::Or.has_lower_precedence_than(Token::And));
    /// assert!(!Token::And.has_lower_precedence_than(Token::Or));
    /// assert!(!Token::Not.has_lower_precedence_than(Token::Not));
    /// ```
    #[must_use]
    pub const fn has_lower_precedence_than(self, other: Self) -> bool {
        match self.associativity() {
            Some(Associativity::Left) => self.precedence() <= other.precedence(),
            Some(Associativity::Right) => self.precedence() < other.precedence(),
            None => false,
        }
    }
}

/// Select the keyword token spelled exactly as `text`.
///
/// Returns `None` for operands. Matching is case sensitive: `AND` is a tag.
#[must_use]
pub fn classify(text: &str) -> Option<Token> {
    Token::ALL.into_iter().find(|token| token.matches(text))
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

/// Error returned when parsing a [`Token`] from text that is not a keyword.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenParseError(pub String);

impl fmt::Display for TokenParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "not a tag-expression keyword: {}", self.0)
    }
}

impl std::error::Error for TokenParseError {}

impl FromStr for Token {
    type Err = TokenParseError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        classify(value).ok_or_else(|| TokenParseError(value.to_string()))
    }
}
