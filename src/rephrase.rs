//! # Response shaper
//!
//! ## Responsibility
//! Rewrite hostile phrasing before a user commits to it. Substitution rules
//! apply sequentially over the working text (later rules see earlier rules'
//! output), then an escalation scan replaces the whole result with a fixed
//! suggestion when a second-person pronoun co-occurs with a residual
//! hostility marker.
//!
//! ## Guarantees
//! - Total: any input, including empty, yields a defined output.
//! - Deterministic: output depends only on the input and the rule tables.
//! - Whole-word: rules never fire inside a longer word ("class" survives
//!   an "ass" entry; "your" never matches a "you" rule).
//!
//! ## NOT Responsible For
//! - Tone classification (see `lexicon`)
//! - Deciding *when* to shape — callers invoke it on demand.

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

/// Fixed replacement text the escalation rule substitutes for the entire
/// output when softening is judged insufficient.
pub const ESCALATION_MESSAGE: &str = "Consider rephrasing more constructively.";

// ---------------------------------------------------------------------------
// Rule tables
// ---------------------------------------------------------------------------

/// One ordered substitution: `from` (a word or phrase, matched whole and
/// case-insensitively) rewritten to `to` everywhere it occurs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RephraseRule {
    pub from: String,
    pub to: String,
}

impl RephraseRule {
    pub fn new(from: &str, to: &str) -> Self {
        RephraseRule {
            from: from.to_string(),
            to: to.to_string(),
        }
    }
}

/// Built-in substitution table, applied in declared order.
pub static DEFAULT_RULES: Lazy<Vec<RephraseRule>> = Lazy::new(|| {
    vec![
        RephraseRule::new("hate", "really dislike"),
        RephraseRule::new("angry", "frustrated"),
        RephraseRule::new("stupid", "not very thoughtful"),
        RephraseRule::new("idiot", "person I disagree with"),
        RephraseRule::new("lazy", "unmotivated"),
        RephraseRule::new("worthless", "undervalued"),
        RephraseRule::new("shut up", "please pause"),
    ]
});

/// Residual hostility markers checked after substitution. Both the raw
/// words and their post-substitution forms appear so escalation fires on
/// whichever variant survives in the working text.
pub static DEFAULT_MARKERS: Lazy<Vec<String>> = Lazy::new(|| {
    [
        "wrong",
        "lazy",
        "bad",
        "stupid",
        "idiot",
        "fool",
        "pathetic",
        "worthless",
        "unmotivated",
        "not very thoughtful",
        "undervalued",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
});

/// Words masked with asterisks before a message leaves through a transport.
/// History always records the unmasked original.
pub static DEFAULT_RUDE_WORDS: Lazy<Vec<String>> = Lazy::new(|| {
    ["stupid", "idiot", "fool", "pathetic", "worthless", "dumb", "shut up"]
        .iter()
        .map(|s| s.to_string())
        .collect()
});

// ---------------------------------------------------------------------------
// Whole-word scanning
// ---------------------------------------------------------------------------

/// True when the byte before a candidate match is absent or not
/// alphanumeric, i.e. the match does not start inside a longer word.
fn boundary_before(bytes: &[u8], idx: usize) -> bool {
    idx == 0 || !bytes[idx - 1].is_ascii_alphanumeric()
}

/// True when the byte at `idx` (one past the match) is absent or not
/// alphanumeric.
fn boundary_after(bytes: &[u8], idx: usize) -> bool {
    idx >= bytes.len() || !bytes[idx].is_ascii_alphanumeric()
}

/// Replace every whole-word, case-insensitive occurrence of `from` with
/// `to`. Patterns are ASCII (the rule tables are), so byte-wise
/// `eq_ignore_ascii_case` is exact; a matched region is pure ASCII, which
/// keeps the scan on UTF-8 char boundaries.
fn replace_whole_word(text: &str, from: &str, to: &str) -> String {
    let bytes = text.as_bytes();
    let pat = from.as_bytes();
    if pat.is_empty() {
        return text.to_string();
    }

    let mut out = String::with_capacity(text.len());
    let mut i = 0;
    while i < bytes.len() {
        let end = i + pat.len();
        if end <= bytes.len()
            && bytes[i..end].eq_ignore_ascii_case(pat)
            && boundary_before(bytes, i)
            && boundary_after(bytes, end)
        {
            out.push_str(to);
            i = end;
        } else {
            let ch = text[i..].chars().next().unwrap_or('\u{FFFD}');
            out.push(ch);
            i += ch.len_utf8();
        }
    }
    out
}

/// Whole-word, case-insensitive containment test using the same boundary
/// rules as [`replace_whole_word`].
fn contains_whole_word(text: &str, word: &str) -> bool {
    let bytes = text.as_bytes();
    let pat = word.as_bytes();
    if pat.is_empty() || pat.len() > bytes.len() {
        return false;
    }
    for i in 0..=(bytes.len() - pat.len()) {
        let end = i + pat.len();
        if bytes[i..end].eq_ignore_ascii_case(pat)
            && boundary_before(bytes, i)
            && boundary_after(bytes, end)
        {
            return true;
        }
    }
    false
}

// ---------------------------------------------------------------------------
// Rephraser
// ---------------------------------------------------------------------------

/// The rule-driven shaper. Tables are fixed at construction and never
/// mutated; the struct is cheap to share across call sites.
#[derive(Debug, Clone)]
pub struct Rephraser {
    rules: Vec<RephraseRule>,
    markers: Vec<String>,
    rude_words: Vec<String>,
}

impl Rephraser {
    pub fn new(rules: Vec<RephraseRule>, markers: Vec<String>, rude_words: Vec<String>) -> Self {
        Rephraser {
            rules,
            markers,
            rude_words,
        }
    }

    /// Soften a message. Trims, applies the substitution table in order
    /// (each rule operating on the previous rule's output), then escalates
    /// to [`ESCALATION_MESSAGE`] when the shaped text still pairs a
    /// second-person pronoun with a residual hostility marker.
    pub fn rephrase(&self, text: &str) -> String {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return String::new();
        }

        let mut shaped = trimmed.to_string();
        for rule in &self.rules {
            shaped = replace_whole_word(&shaped, &rule.from, &rule.to);
        }

        let second_person =
            contains_whole_word(&shaped, "you") || contains_whole_word(&shaped, "your");
        if second_person && self.markers.iter().any(|m| contains_whole_word(&shaped, m)) {
            return ESCALATION_MESSAGE.to_string();
        }

        shaped
    }

    /// Mask configured rude words with asterisks of equal length. Used on
    /// the outbound copy of a message only.
    pub fn censor(&self, text: &str) -> String {
        let mut masked = text.to_string();
        for word in &self.rude_words {
            let mask = "*".repeat(word.chars().count());
            masked = replace_whole_word(&masked, word, &mask);
        }
        masked
    }
}

impl Default for Rephraser {
    fn default() -> Self {
        Rephraser::new(
            DEFAULT_RULES.clone(),
            DEFAULT_MARKERS.clone(),
            DEFAULT_RUDE_WORDS.clone(),
        )
    }
}
