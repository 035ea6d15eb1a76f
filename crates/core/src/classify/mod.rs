//! Multi-label classification of test blocks into behavioral categories.
//!
//! Four independent content rules are applied to the same input text; the
//! result is the union of whichever matched. Rules are kept as a flat list of
//! (include, optional exclude, label) entries rather than a decision tree so
//! new categories can be added without disturbing existing ones.

use std::collections::BTreeSet;
use std::sync::OnceLock;

use regex::Regex;

use crate::model::Category;

/// Classify one block's text (name plus body) into a set of categories.
///
/// Total over all inputs: any string, including the empty string, yields a
/// (possibly empty) set. Depends only on `block_text`; no external state.
pub fn classify(block_text: &str) -> BTreeSet<Category> {
    let mut categories = BTreeSet::new();
    for rule in RULES {
        if !(rule.include)().is_match(block_text) {
            continue;
        }
        if let Some(exclude) = rule.exclude {
            if exclude().is_match(block_text) {
                continue;
            }
        }
        categories.insert(rule.category);
    }
    categories
}

struct Rule {
    category: Category,
    include: fn() -> &'static Regex,
    exclude: Option<fn() -> &'static Regex>,
}

const RULES: &[Rule] = &[
    Rule { category: Category::Auth, include: auth_pattern, exclude: None },
    Rule { category: Category::EmptyDb, include: empty_db_pattern, exclude: None },
    Rule { category: Category::Negative, include: negative_pattern, exclude: None },
    Rule {
        category: Category::Positive,
        include: positive_pattern,
        exclude: Some(positive_exclude_pattern),
    },
];

/// An explicit unauthorized-status expectation.
fn auth_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)should return 401").unwrap())
}

/// An empty result set: empty collection/structure, "no <entities> exist",
/// or a zero-count assertion.
fn empty_db_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r"(?i)empty (array|object|dates)|no (runs|snapshots|orders|developers|holidays) exist|uniqueCount 0",
        )
        .unwrap()
    })
}

/// A client- or server-error status expectation.
fn negative_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)should return (400|403|404|409|500)").unwrap())
}

/// A success expectation: success status or "should <verb> ... successfully"
/// phrasing.
fn positive_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r"(?i)should return (200|201)|should validate|should (create|update|delete|refresh|save|return .* successfully)",
        )
        .unwrap()
    })
}

/// Fires when the text simultaneously carries error-status or empty-result
/// phrasing; suppresses the positive label.
fn positive_exclude_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)should return (400|401|403|404|409|500)|empty (array|object|dates)|no .* exist")
            .unwrap()
    })
}
