//! Tokeniser splitting tag-expression text into keyword and operand strings.

use crate::errors::TagExpressionError;

fn is_escapable(ch: char) -> bool {
    matches!(ch, '(' | ')' | '\\') || ch.is_whitespace()
}

/// Split `text` into tokens.
///
/// Whitespace separates tokens and is dropped; `(` and `)` are emitted as
/// tokens of their own. A backslash escapes the next parenthesis, backslash,
/// or whitespace character so it becomes part of the current token.
///
/// # Errors
/// Returns [`TagExpressionError::IllegalEscape`] when a backslash precedes any
/// other character.
///
/// # Examples
/// ```
/// use tag_expressions::tokenize;
/// let tokens = tokenize("(a\\ b or not c)")?;
/// assert_eq!(tokens, ["(", "a b", "or", "not", "c", ")"]);
/// # Ok::<(), tag_expressions::TagExpressionError>(())
/// ```
pub fn tokenize(text: &str) -> Result<Vec<String>, TagExpressionError> {
    let mut tokens = Vec::new();
    let mut token = String::new();
    let mut escaped = false;

    let flush_token = |token: &mut String, tokens: &mut Vec<String>| {
        if !token.is_empty() {
            tokens.push(std::mem::take(token));
        }
    };

    for ch in text.chars() {
        if escaped {
            if !is_escapable(ch) {
                return Err(TagExpressionError::IllegalEscape {
                    text: text.to_string(),
                    character: ch,
                });
            }
            token.push(ch);
            escaped = false;
            continue;
        }
        match ch {
            '\\' => escaped = true,
            '(' | ')' => {
                flush_token(&mut token, &mut tokens);
                tokens.push(ch.to_string());
            }
            c if c.is_whitespace() => flush_token(&mut token, &mut tokens),
            _ => token.push(ch),
        }
    }

    // A trailing lone backslash escapes nothing and is dropped.
    flush_token(&mut token, &mut tokens);
    Ok(tokens)
}
