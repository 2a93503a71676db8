//! Engine configuration. Every table the core consumes — tone lexicon,
//! substitution rules, hostility markers, rude-word list, history path —
//! has a built-in default and can be overridden from one optional TOML
//! file. Loaded once at startup, never mutated at runtime.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::NeurotapError;
use crate::history::DEFAULT_HISTORY_KEY;
use crate::lexicon::{ToneEntry, DEFAULT_TONES};
use crate::rephrase::{RephraseRule, DEFAULT_MARKERS, DEFAULT_RUDE_WORDS, DEFAULT_RULES};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// The single storage key the history log lives under.
    pub history_path: PathBuf,
    /// Residual hostility markers for the escalation check.
    pub markers: Vec<String>,
    /// Words masked on the outbound copy of a message.
    pub rude_words: Vec<String>,
    /// Ordered tone table; order decides classification tie-breaks.
    pub tones: Vec<ToneEntry>,
    /// Ordered substitution rules for the rephraser.
    pub rules: Vec<RephraseRule>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            history_path: PathBuf::from(DEFAULT_HISTORY_KEY),
            markers: DEFAULT_MARKERS.clone(),
            rude_words: DEFAULT_RUDE_WORDS.clone(),
            tones: DEFAULT_TONES.clone(),
            rules: DEFAULT_RULES.clone(),
        }
    }
}

impl EngineConfig {
    /// Read and parse a TOML config file. Fields absent from the file keep
    /// their built-in defaults.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, NeurotapError> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path)
            .map_err(|e| NeurotapError::Config(format!("cannot read {}: {e}", path.display())))?;
        let config = toml::from_str(&raw)?;
        Ok(config)
    }

    /// Convenience for the binary: a path if the user gave one, built-in
    /// defaults otherwise.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, NeurotapError> {
        match path {
            Some(p) => Self::load(p),
            None => Ok(Self::default()),
        }
    }
}
