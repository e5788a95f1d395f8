//! Bag-of-words description similarity.

use std::collections::HashSet;

use once_cell::sync::Lazy;
use regex::Regex;

// ASCII word characters only; anything else separates tokens.
static NON_WORD_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^0-9A-Za-z_]+").unwrap());

/// Lower-case `text` and split it on runs of non-word characters.
///
/// Empty tokens are dropped, so a missing or blank description yields an
/// empty list.
pub fn tokenize(text: Option<&str>) -> Vec<String> {
    let lower = text.unwrap_or("").to_lowercase();
    NON_WORD_RE
        .split(&lower)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

/// Overlap ratio between two descriptions, in `[0, 1]`.
///
/// Counts every token of `a` (duplicates included) that also appears in `b`,
/// divided by the longer token list. Two empty descriptions score 0.
pub fn similarity(a: Option<&str>, b: Option<&str>) -> f64 {
    let tokens_a = tokenize(a);
    let tokens_b = tokenize(b);
    token_overlap(&tokens_a, &tokens_b)
}

/// Same as [`similarity`] over already tokenized descriptions.
pub fn token_overlap(tokens_a: &[String], tokens_b: &[String]) -> f64 {
    let in_b: HashSet<&str> = tokens_b.iter().map(String::as_str).collect();
    let overlap = tokens_a.iter().filter(|t| in_b.contains(t.as_str())).count();
    let denominator = tokens_a.len().max(tokens_b.len().max(1));
    overlap as f64 / denominator as f64
}
