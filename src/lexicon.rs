//! # Tone lexicon
//!
//! ## Responsibility
//! Map free text to exactly one tone category using an ordered keyword
//! table. The table order is part of the contract: when keywords from two
//! tones both appear in a message, the earlier-declared tone wins.
//!
//! ## Guarantees
//! - Total: every string, including the empty string, resolves to a tone.
//! - Deterministic: same input and table always produce the same verdict.
//! - Pure: no I/O, no shared mutable state, safe to call concurrently.
//!
//! ## NOT Responsible For
//! - Recording the verdict (see `history`)
//! - Rendering zone highlights (see `viz`)

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::error::NeurotapError;

// ---------------------------------------------------------------------------
// Zones
// ---------------------------------------------------------------------------

/// A simulated anatomical brain region highlighted per tone. Closed set —
/// the display layer iterates [`Zone::ALL`] to draw the full map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Zone {
    Amygdala,
    Pfc,
    Hippocampus,
    Acc,
}

impl Zone {
    pub const ALL: [Zone; 4] = [Zone::Amygdala, Zone::Pfc, Zone::Hippocampus, Zone::Acc];
}

impl std::fmt::Display for Zone {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Zone::Amygdala => write!(f, "amygdala"),
            Zone::Pfc => write!(f, "pfc"),
            Zone::Hippocampus => write!(f, "hippocampus"),
            Zone::Acc => write!(f, "acc"),
        }
    }
}

// ---------------------------------------------------------------------------
// Tone entries
// ---------------------------------------------------------------------------

/// One row of the lexicon: a tone, the keywords that trigger it, and the
/// display attributes attached to a verdict. An entry with no keywords is
/// the fallback and can only be reached when nothing else matches.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToneEntry {
    pub tone: String,
    #[serde(default)]
    pub keywords: Vec<String>,
    pub zones: Vec<Zone>,
    pub neurotransmitters: Vec<String>,
    pub color: String,
}

impl ToneEntry {
    pub fn is_fallback(&self) -> bool {
        self.keywords.is_empty()
    }
}

/// Built-in tone table. Order is load-bearing: classification scans top to
/// bottom and returns the first match.
pub static DEFAULT_TONES: Lazy<Vec<ToneEntry>> = Lazy::new(|| {
    vec![
        ToneEntry {
            tone: "empathy".to_string(),
            keywords: words(&["sorry", "thank you", "appreciate", "forgive"]),
            zones: vec![Zone::Acc, Zone::Hippocampus],
            neurotransmitters: words(&["oxytocin", "serotonin"]),
            color: "#6cc".to_string(),
        },
        ToneEntry {
            tone: "anger".to_string(),
            keywords: words(&["angry", "hate", "annoyed", "furious"]),
            zones: vec![Zone::Amygdala],
            neurotransmitters: words(&["adrenaline", "cortisol"]),
            color: "#e66".to_string(),
        },
        ToneEntry {
            tone: "focus".to_string(),
            keywords: words(&["study", "focus", "discipline", "practice"]),
            zones: vec![Zone::Pfc],
            neurotransmitters: words(&["dopamine"]),
            color: "#6c6".to_string(),
        },
        ToneEntry {
            tone: "joy".to_string(),
            keywords: words(&["happy", "excited", "great", "love"]),
            zones: vec![Zone::Pfc, Zone::Hippocampus],
            neurotransmitters: words(&["dopamine", "serotonin"]),
            color: "#fc6".to_string(),
        },
        ToneEntry {
            tone: "neutral".to_string(),
            keywords: vec![],
            zones: vec![Zone::Pfc],
            neurotransmitters: words(&["baseline"]),
            color: "#bbb".to_string(),
        },
    ]
});

fn words(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

// ---------------------------------------------------------------------------
// Lexicon
// ---------------------------------------------------------------------------

/// The validated, ordered tone table. Built once at startup and read-only
/// afterwards.
#[derive(Debug, Clone)]
pub struct Lexicon {
    entries: Vec<ToneEntry>,
    fallback: usize,
}

impl Lexicon {
    /// Validates the table: exactly one entry must have an empty keyword
    /// set (the fallback). Keywords are lowercased here so classification
    /// never re-normalizes the table.
    pub fn new(mut entries: Vec<ToneEntry>) -> Result<Self, NeurotapError> {
        let fallbacks: Vec<usize> = entries
            .iter()
            .enumerate()
            .filter(|(_, e)| e.is_fallback())
            .map(|(i, _)| i)
            .collect();

        let fallback = match fallbacks.as_slice() {
            [i] => *i,
            [] => {
                return Err(NeurotapError::Config(
                    "lexicon has no fallback entry (one entry must have no keywords)".to_string(),
                ))
            }
            _ => {
                return Err(NeurotapError::Config(format!(
                    "lexicon has {} fallback entries, expected exactly one",
                    fallbacks.len()
                )))
            }
        };

        for entry in &mut entries {
            for keyword in &mut entry.keywords {
                *keyword = keyword.to_lowercase();
            }
        }

        Ok(Lexicon { entries, fallback })
    }

    /// Classify a message. Scans entries in declared order, skipping the
    /// fallback, and returns the first entry with any keyword contained in
    /// the lowercased text. No match resolves to the fallback.
    pub fn classify(&self, text: &str) -> &ToneEntry {
        let normalized = text.to_lowercase();
        for entry in &self.entries {
            if entry.is_fallback() {
                continue;
            }
            if entry.keywords.iter().any(|k| normalized.contains(k.as_str())) {
                return entry;
            }
        }
        &self.entries[self.fallback]
    }

    pub fn fallback(&self) -> &ToneEntry {
        &self.entries[self.fallback]
    }

    pub fn entries(&self) -> &[ToneEntry] {
        &self.entries
    }

    /// Look up an entry by tone identifier.
    pub fn get(&self, tone: &str) -> Option<&ToneEntry> {
        self.entries.iter().find(|e| e.tone == tone)
    }
}

impl Default for Lexicon {
    fn default() -> Self {
        Lexicon::new(DEFAULT_TONES.clone()).expect("built-in tone table upholds the fallback invariant")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(tone: &str, keywords: &[&str]) -> ToneEntry {
        ToneEntry {
            tone: tone.to_string(),
            keywords: words(keywords),
            zones: vec![Zone::Pfc],
            neurotransmitters: vec![],
            color: "#fff".to_string(),
        }
    }

    // -- Classification --

    #[test]
    fn test_classify_single_keyword() {
        let lex = Lexicon::default();
        assert_eq!(lex.classify("I am so happy today").tone, "joy");
    }

    #[test]
    fn test_classify_case_insensitive() {
        let lex = Lexicon::default();
        assert_eq!(lex.classify("FURIOUS about this").tone, "anger");
    }

    #[test]
    fn test_classify_multiword_keyword() {
        let lex = Lexicon::default();
        assert_eq!(lex.classify("thank you for waiting").tone, "empathy");
    }

    #[test]
    fn test_classify_no_match_falls_back() {
        let lex = Lexicon::default();
        assert_eq!(lex.classify("the sky is blue").tone, "neutral");
    }

    #[test]
    fn test_classify_empty_string_falls_back() {
        let lex = Lexicon::default();
        assert_eq!(lex.classify("").tone, "neutral");
    }

    #[test]
    fn test_classify_first_declared_entry_wins() {
        // "sorry" (empathy, declared first) and "hate" (anger) both present.
        let lex = Lexicon::default();
        assert_eq!(lex.classify("sorry but I hate waiting").tone, "empathy");
    }

    #[test]
    fn test_classify_substring_containment() {
        // "hate" inside "hateful" still matches: containment, not whole-word.
        let lex = Lexicon::default();
        assert_eq!(lex.classify("such hateful weather").tone, "anger");
    }

    #[test]
    fn test_classify_is_deterministic() {
        let lex = Lexicon::default();
        let a = lex.classify("love to study").tone.clone();
        let b = lex.classify("love to study").tone.clone();
        assert_eq!(a, b);
        // "study" (focus) is declared before "love" (joy).
        assert_eq!(a, "focus");
    }

    // -- Validation --

    #[test]
    fn test_new_rejects_missing_fallback() {
        let result = Lexicon::new(vec![entry("anger", &["hate"])]);
        assert!(matches!(result, Err(NeurotapError::Config(_))));
    }

    #[test]
    fn test_new_rejects_multiple_fallbacks() {
        let result = Lexicon::new(vec![
            entry("neutral", &[]),
            entry("calm", &[]),
        ]);
        assert!(matches!(result, Err(NeurotapError::Config(_))));
    }

    #[test]
    fn test_new_lowercases_keywords() {
        let lex = Lexicon::new(vec![entry("anger", &["HATE"]), entry("neutral", &[])])
            .expect("valid table");
        assert_eq!(lex.classify("i hate this").tone, "anger");
    }

    #[test]
    fn test_fallback_not_reachable_by_keyword() {
        let lex = Lexicon::default();
        // "neutral" as literal text matches no keyword set.
        assert_eq!(lex.classify("neutral").tone, "neutral");
        assert!(lex.fallback().is_fallback());
    }

    #[test]
    fn test_get_by_tone_name() {
        let lex = Lexicon::default();
        assert!(lex.get("joy").is_some());
        assert!(lex.get("despair").is_none());
    }

    // -- Zone display --

    #[test]
    fn test_zone_display_lowercase() {
        assert_eq!(Zone::Amygdala.to_string(), "amygdala");
        assert_eq!(Zone::Pfc.to_string(), "pfc");
        assert_eq!(Zone::Hippocampus.to_string(), "hippocampus");
        assert_eq!(Zone::Acc.to_string(), "acc");
    }

    #[test]
    fn test_zone_serde_roundtrip() {
        let json = serde_json::to_string(&Zone::Acc).expect("serialize");
        assert_eq!(json, "\"acc\"");
        let zone: Zone = serde_json::from_str("\"hippocampus\"").expect("deserialize");
        assert_eq!(zone, Zone::Hippocampus);
    }

    #[test]
    fn test_default_table_order() {
        let tones: Vec<&str> = DEFAULT_TONES.iter().map(|e| e.tone.as_str()).collect();
        assert_eq!(tones, vec!["empathy", "anger", "focus", "joy", "neutral"]);
    }
}
