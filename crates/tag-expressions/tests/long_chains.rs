//! Very long filters nest one tree level per operator. Parsing, evaluation,
//! formatting, comparison, and dropping must not depend on the thread stack.
#![expect(clippy::expect_used, reason = "tests assert on parser success")]

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::thread;

use tag_expressions::{Expression, parse};

const SMALL_STACK: usize = 256 * 1024;

fn on_small_stack(check: impl FnOnce() + Send + 'static) {
    thread::Builder::new()
        .stack_size(SMALL_STACK)
        .spawn(check)
        .expect("test thread should spawn")
        .join()
        .expect("deep expression check should not panic");
}

fn parse_ok(text: &str) -> Expression {
    parse(text).expect("long expression should parse")
}

fn hash_of(expr: &Expression) -> u64 {
    let mut hasher = DefaultHasher::new();
    expr.hash(&mut hasher);
    hasher.finish()
}

#[test]
fn or_chain_of_many_terms() {
    on_small_stack(|| {
        let terms = 100_000;
        let text = (0..terms)
            .map(|i| format!("t{i}"))
            .collect::<Vec<_>>()
            .join(" or ");
        let expr = parse_ok(&text);

        assert!(expr.evaluate(&["t0"]));
        assert!(expr.evaluate(&["t99999"]));
        assert!(!expr.evaluate(&["t100000"]));

        let formatted = expr.to_string();
        assert!(formatted.starts_with("( ( ( "));
        assert!(formatted.ends_with(" or t99999 )"));

        let reparsed = parse_ok(&formatted);
        assert!(reparsed == expr, "canonical form should parse back to the same tree");
        assert_eq!(hash_of(&reparsed), hash_of(&expr));
        assert!(reparsed != parse_ok(&text.replace("t5 ", "t6 ")));
    });
}

#[test]
fn and_chain_short_circuits_on_the_first_miss() {
    on_small_stack(|| {
        let text = vec!["a"; 100_000].join(" and ");
        let expr = parse_ok(&text);
        assert!(expr.evaluate(&["a"]));
        assert!(!expr.evaluate(&["b"]));
    });
}

#[test]
fn deeply_nested_negation() {
    on_small_stack(|| {
        let depth = 200_000;
        let text = format!("{}a", "not ".repeat(depth));
        let expr = parse_ok(&text);

        assert!(expr.evaluate(&["a"]));
        assert!(!expr.evaluate::<[&str]>(&[]));

        let formatted = expr.to_string();
        assert_eq!(formatted.len(), depth * "not (  )".len() + 1);
        assert!(formatted.starts_with("not ( not ( "));
        assert!(formatted.ends_with("a ) )"));
        assert!(parse_ok(&formatted) == expr);
    });
}

#[test]
fn deeply_parenthesised_literal() {
    on_small_stack(|| {
        let depth = 100_000;
        let text = format!("{}a{}", "(".repeat(depth), ")".repeat(depth));
        let expr = parse_ok(&text);
        assert!(expr == Expression::literal("a"));
        assert_eq!(expr.to_string(), "a");
    });
}
