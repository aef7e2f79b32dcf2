//! Expression tree produced by the parser, with evaluation and canonical
//! formatting.
//!
//! Evaluation checks literal membership in a tag set and short-circuits `and`
//! and `or`. Formatting renders every combinator inside its own parentheses so
//! the output parses back into an equivalent tree:
//! `a and (b or not c)` becomes `( a and ( b or not ( c ) ) )`.

use std::borrow::Borrow;
use std::collections::{BTreeSet, HashSet};
use std::fmt;
use std::hash::{BuildHasher, Hash, Hasher};
use std::iter;
use std::str::FromStr;

use crate::errors::TagExpressionError;

/// Set-like collection of tags an [`Expression`] is evaluated against.
///
/// Implemented for hash and B-tree sets, slices, arrays, and vectors of
/// string-like items. Slices use a linear scan.
pub trait Tags {
    /// Whether `tag` is a member of the collection.
    fn contains_tag(&self, tag: &str) -> bool;
}

impl<S, H> Tags for HashSet<S, H>
where
    S: Borrow<str> + Eq + Hash,
    H: BuildHasher,
{
    fn contains_tag(&self, tag: &str) -> bool {
        self.contains(tag)
    }
}

impl<S> Tags for BTreeSet<S>
where
    S: Borrow<str> + Ord,
{
    fn contains_tag(&self, tag: &str) -> bool {
        self.contains(tag)
    }
}

impl<S: AsRef<str>> Tags for [S] {
    fn contains_tag(&self, tag: &str) -> bool {
        self.iter().any(|candidate| candidate.as_ref() == tag)
    }
}

impl<S: AsRef<str>, const N: usize> Tags for [S; N] {
    fn contains_tag(&self, tag: &str) -> bool {
        self.as_slice().contains_tag(tag)
    }
}

impl<S: AsRef<str>> Tags for Vec<S> {
    fn contains_tag(&self, tag: &str) -> bool {
        self.as_slice().contains_tag(tag)
    }
}

/// Parsed tag expression.
///
/// The tree owns its children exclusively and is never mutated after
/// parsing, so it can be shared freely between threads.
///
/// `And` and `Or` hold an ordered term list. The parser always builds them
/// with two terms; an empty `And` evaluates to `true`, an empty `Or` to
/// `false`, and both format as the empty string.
///
/// Chains such as `a or b or c ...` nest one level per operator. Evaluation,
/// formatting, comparison, hashing, and dropping walk the tree with a heap
/// work list, so depth is bounded by memory rather than the thread stack.
/// `Clone` and `Debug` are derived and still recurse.
#[derive(Clone, Debug)]
pub enum Expression {
    /// A single tag name.
    Literal(String),
    /// True when every term is true.
    And(Vec<Expression>),
    /// True when any term is true.
    Or(Vec<Expression>),
    /// Negation of the inner expression.
    Not(Box<Expression>),
    /// The empty expression; always true.
    True,
}

impl Expression {
    /// Build a literal for `name`.
    #[must_use]
    pub fn literal(name: impl Into<String>) -> Self {
        Self::Literal(name.into())
    }

    /// Build the conjunction `lhs and rhs`.
    #[must_use]
    pub fn and(lhs: Self, rhs: Self) -> Self {
        Self::And(vec![lhs, rhs])
    }

    /// Build the disjunction `lhs or rhs`.
    #[must_use]
    pub fn or(lhs: Self, rhs: Self) -> Self {
        Self::Or(vec![lhs, rhs])
    }

    /// Build the negation `not term`.
    #[must_use]
    pub fn not(term: Self) -> Self {
        Self::Not(Box::new(term))
    }

    /// Evaluate the expression against a set of tags.
    ///
    /// # Examples
    /// ```
    /// use std::collections::BTreeSet;
    /// use tag_expressions::Expression;
    ///
    /// let expr = Expression::and(Expression::literal("a"), Expression::literal("b"));
    /// assert!(expr.evaluate(&["a", "b"]));
    /// assert!(!expr.evaluate(&vec!["a".to_string()]));
    /// assert!(!expr.evaluate(&BTreeSet::<String>::new()));
    /// ```
    #[must_use]
    pub fn evaluate<T: Tags + ?Sized>(&self, tags: &T) -> bool {
        // Each frame is a combinator and the index of its next unvisited term.
        let mut frames: Vec<(&Self, usize)> = Vec::new();
        let mut node = self;
        'descend: loop {
            let mut value = match node {
                Self::Literal(name) => tags.contains_tag(name),
                Self::True => true,
                Self::Not(term) => {
                    frames.push((node, 0));
                    node = term.as_ref();
                    continue 'descend;
                }
                Self::And(terms) | Self::Or(terms) => {
                    if let Some(first) = terms.first() {
                        frames.push((node, 1));
                        node = first;
                        continue 'descend;
                    }
                    matches!(node, Self::And(_))
                }
            };
            while let Some((parent, next)) = frames.pop() {
                match parent {
                    Self::Not(_) => value = !value,
                    Self::And(terms) | Self::Or(terms) => {
                        // `and` settles on false, `or` on true.
                        if value != matches!(parent, Self::And(_)) {
                            continue;
                        }
                        if let Some(term) = terms.get(next) {
                            frames.push((parent, next + 1));
                            node = term;
                            continue 'descend;
                        }
                    }
                    Self::Literal(_) | Self::True => {}
                }
            }
            return value;
        }
    }

    /// Borrow the expression as a predicate over tag collections.
    ///
    /// # Examples
    /// ```
    /// let expr = tag_expressions::parse("@fast and not @wip")?;
    /// let selected: Vec<&[&str]> = [&["@fast"][..], &["@fast", "@wip"][..]]
    ///     .into_iter()
    ///     .filter(|tags| expr.as_predicate()(*tags))
    ///     .collect();
    /// assert_eq!(selected, [&["@fast"][..]]);
    /// # Ok::<(), tag_expressions::TagExpressionError>(())
    /// ```
    #[must_use]
    pub fn as_predicate<T: Tags + ?Sized>(&self) -> impl Fn(&T) -> bool + '_ {
        move |tags| self.evaluate(tags)
    }

    /// Nodes in pre-order, parents before their terms.
    fn preorder(&self) -> impl Iterator<Item = &Self> {
        let mut pending = vec![self];
        iter::from_fn(move || {
            let node = pending.pop()?;
            match node {
                Self::And(terms) | Self::Or(terms) => pending.extend(terms.iter().rev()),
                Self::Not(term) => pending.push(term.as_ref()),
                Self::Literal(_) | Self::True => {}
            }
            Some(node)
        })
    }

    /// Move the direct terms into `pending`, leaving this node childless.
    fn detach_terms(&mut self, pending: &mut Vec<Self>) {
        match self {
            Self::And(terms) | Self::Or(terms) => pending.append(terms),
            Self::Not(term) => pending.push(std::mem::replace(term.as_mut(), Self::True)),
            Self::Literal(_) | Self::True => {}
        }
    }

    fn shape(&self) -> Shape<'_> {
        match self {
            Self::Literal(name) => Shape::Literal(name),
            Self::And(terms) => Shape::And(terms.len()),
            Self::Or(terms) => Shape::Or(terms.len()),
            Self::Not(_) => Shape::Not,
            Self::True => Shape::True,
        }
    }
}

/// A node without its children. A pre-order sequence of shapes identifies a
/// tree uniquely.
#[derive(PartialEq, Eq, Hash)]
enum Shape<'a> {
    Literal(&'a str),
    And(usize),
    Or(usize),
    Not,
    True,
}

impl PartialEq for Expression {
    fn eq(&self, other: &Self) -> bool {
        self.preorder()
            .map(Self::shape)
            .eq(other.preorder().map(Self::shape))
    }
}

impl Eq for Expression {}

impl Hash for Expression {
    fn hash<H: Hasher>(&self, state: &mut H) {
        for node in self.preorder() {
            node.shape().hash(state);
        }
    }
}

impl Drop for Expression {
    fn drop(&mut self) {
        let mut pending = Vec::new();
        self.detach_terms(&mut pending);
        while let Some(mut node) = pending.pop() {
            node.detach_terms(&mut pending);
        }
    }
}

fn write_escaped(f: &mut fmt::Formatter<'_>, name: &str) -> fmt::Result {
    for ch in name.chars() {
        if matches!(ch, '\\' | '(' | ')') || ch.is_whitespace() {
            f.write_str("\\")?;
        }
        write!(f, "{ch}")?;
    }
    Ok(())
}

enum Pending<'a> {
    Node(&'a Expression),
    Text(&'static str),
}

fn push_terms<'a>(
    pending: &mut Vec<Pending<'a>>,
    terms: &'a [Expression],
    separator: &'static str,
) {
    let Some((first, rest)) = terms.split_first() else {
        return;
    };
    pending.push(Pending::Text(" )"));
    for term in rest.iter().rev() {
        pending.push(Pending::Node(term));
        pending.push(Pending::Text(separator));
    }
    pending.push(Pending::Node(first));
    pending.push(Pending::Text("( "));
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut pending = vec![Pending::Node(self)];
        while let Some(item) = pending.pop() {
            let node = match item {
                Pending::Text(text) => {
                    f.write_str(text)?;
                    continue;
                }
                Pending::Node(node) => node,
            };
            match node {
                Self::Literal(name) => write_escaped(f, name)?,
                Self::And(terms) => push_terms(&mut pending, terms, " and "),
                Self::Or(terms) => push_terms(&mut pending, terms, " or "),
                Self::Not(term) => {
                    if matches!(term.as_ref(), Self::And(_) | Self::Or(_)) {
                        f.write_str("not ")?;
                    } else {
                        f.write_str("not ( ")?;
                        pending.push(Pending::Text(" )"));
                    }
                    pending.push(Pending::Node(term.as_ref()));
                }
                Self::True => f.write_str("true")?,
            }
        }
        Ok(())
    }
}

impl FromStr for Expression {
    type Err = TagExpressionError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        crate::parse(text)
    }
}

impl TryFrom<&str> for Expression {
    type Error = TagExpressionError;

    fn try_from(text: &str) -> Result<Self, Self::Error> {
        text.parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn lit(name: &str) -> Expression {
        Expression::literal(name)
    }

    #[rstest]
    #[case(&[], false)]
    #[case(&["a"], true)]
    #[case(&["ab"], false)]
    #[case(&["A"], false)]
    fn literal_checks_membership(#[case] tags: &[&str], #[case] expected: bool) {
        assert_eq!(lit("a").evaluate(tags), expected);
    }

    #[test]
    fn accepts_owned_and_borrowed_collections() {
        let expr = Expression::or(lit("a"), lit("b"));
        let owned: HashSet<String> = ["b".to_string()].into_iter().collect();
        let borrowed: BTreeSet<&str> = ["a"].into_iter().collect();
        assert!(expr.evaluate(&owned));
        assert!(expr.evaluate(&borrowed));
        assert!(!expr.evaluate(&Vec::<String>::new()));
    }

    #[test]
    fn negation_inverts_the_term() {
        let expr = Expression::not(lit("a"));
        assert!(!expr.evaluate(&["a"]));
        assert!(expr.evaluate(&["b"]));
        assert!(expr.evaluate::<[&str]>(&[]));
    }

    #[test]
    fn n_ary_terms_evaluate_and_format() {
        let all = Expression::And(vec![lit("a"), lit("b"), lit("c")]);
        assert!(all.evaluate(&["a", "b", "c"]));
        assert!(!all.evaluate(&["a", "c"]));
        assert_eq!(all.to_string(), "( a and b and c )");

        let any = Expression::Or(vec![lit("a"), lit("b"), lit("c")]);
        assert!(any.evaluate(&["c"]));
        assert_eq!(any.to_string(), "( a or b or c )");
    }

    #[test]
    fn empty_term_lists_follow_identity_elements() {
        assert!(Expression::And(Vec::new()).evaluate(&["a"]));
        assert!(!Expression::Or(Vec::new()).evaluate(&["a"]));
        assert_eq!(Expression::And(Vec::new()).to_string(), "");
        assert_eq!(Expression::Or(Vec::new()).to_string(), "");
    }

    #[test]
    fn true_ignores_tags() {
        assert!(Expression::True.evaluate::<[&str]>(&[]));
        assert!(Expression::True.evaluate(&["anything"]));
        assert_eq!(Expression::True.to_string(), "true");
    }

    #[rstest]
    #[case("a b", "a\\ b")]
    #[case("a(1)", "a\\(1\\)")]
    #[case("x\\y", "x\\\\y")]
    #[case("a\tb", "a\\\tb")]
    #[case("\\(", "\\\\\\(")]
    fn escapes_structural_characters(#[case] name: &str, #[case] expected: &str) {
        assert_eq!(lit(name).to_string(), expected);
    }

    #[test]
    fn negated_combinators_reuse_their_parentheses() {
        let expr = Expression::not(Expression::and(lit("a"), lit("b")));
        assert_eq!(expr.to_string(), "not ( a and b )");
        let expr = Expression::not(Expression::not(lit("a")));
        assert_eq!(expr.to_string(), "not ( not ( a ) )");
    }

    #[test]
    fn predicate_matches_evaluate() {
        let expr = Expression::and(lit("a"), Expression::not(lit("b")));
        let predicate = expr.as_predicate::<[&str]>();
        assert!(predicate(&["a"]));
        assert!(!predicate(&["a", "b"]));
    }

    #[test]
    fn equality_and_hashing_follow_tree_shape() {
        use std::collections::hash_map::DefaultHasher;
        use std::hash::Hasher;

        fn hash_of(expr: &Expression) -> u64 {
            let mut hasher = DefaultHasher::new();
            expr.hash(&mut hasher);
            hasher.finish()
        }

        let nested = Expression::and(Expression::and(lit("a"), lit("b")), lit("c"));
        let flat = Expression::And(vec![lit("a"), lit("b"), lit("c")]);
        assert_ne!(nested, flat);
        assert_ne!(Expression::and(lit("a"), lit("b")), Expression::or(lit("a"), lit("b")));
        assert_ne!(Expression::not(lit("a")), lit("a"));
        assert_eq!(nested.clone(), nested);
        assert_eq!(hash_of(&nested.clone()), hash_of(&nested));
    }

    #[test]
    fn trees_are_shareable_across_threads() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Expression>();
    }
}
