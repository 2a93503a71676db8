use thiserror::Error;

/// Crate-level error type. The classifier and rephraser are total functions
/// and never produce one of these; errors come from configuration loading,
/// history persistence, and transport delivery only.
#[derive(Debug, Error)]
pub enum NeurotapError {
    /// The lexicon or rule tables violate a structural invariant
    /// (e.g. zero or multiple fallback tone entries).
    #[error("invalid configuration: {0}")]
    Config(String),

    /// A config file exists but is not valid TOML for `EngineConfig`.
    #[error("failed to parse config file: {0}")]
    ConfigFile(#[from] toml::de::Error),

    /// History log I/O failed on a write path. Read-side corruption is
    /// not an error — the store degrades to an empty log instead.
    #[error("history persistence failed: {0}")]
    Persist(#[from] std::io::Error),

    /// History log serialization failed on a write path.
    #[error("history serialization failed: {0}")]
    Serialize(#[from] serde_json::Error),

    /// A transport backend refused or failed delivery. History is already
    /// recorded by the time this surfaces.
    #[error("transport delivery failed: {0}")]
    Transport(String),
}
