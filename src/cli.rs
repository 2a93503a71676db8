use std::path::PathBuf;

use clap::Parser;

use crate::transport::Backend;

#[derive(Parser)]
#[command(name = "neurotap")]
#[command(version)]
#[command(about = "Tone-aware chat demo: classify, soften, and relay messages")]
pub struct Args {
    /// Message to classify and record
    pub message: Option<String>,

    /// Rephrase the given text instead of handling a message
    #[arg(long)]
    pub rephrase: Option<String>,

    /// Print the interaction history, most recent first
    #[arg(long)]
    pub history: bool,

    /// Clear the interaction history
    #[arg(long)]
    pub clear_history: bool,

    /// Show the zone activation map for the classified message
    #[arg(long, short)]
    pub visual: bool,

    /// Forward the message through the selected backend
    #[arg(long)]
    pub send: bool,

    /// Chat backend: loopback or relay
    #[arg(long, value_enum, default_value = "loopback")]
    pub backend: Backend,

    /// Base URL of the relay backend
    #[arg(long, default_value = "http://localhost:3000")]
    pub relay_url: String,

    /// Sender name attached to outbound messages
    #[arg(long, default_value = "New User")]
    pub username: String,

    /// Thread outbound messages are tagged with
    #[arg(long, default_value = "demo-thread")]
    pub thread: String,

    /// Path to a TOML config overriding the built-in tables
    #[arg(long)]
    pub config: Option<PathBuf>,
}

/// Fall back to the default sender name when the supplied one is blank
/// after trimming.
pub fn resolve_username(name: &str) -> String {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        "New User".to_string()
    } else {
        trimmed.to_string()
    }
}
