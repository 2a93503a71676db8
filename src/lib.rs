//! # Neurotap core
//!
//! The original logic behind the Neurotap chat prototypes: an ordered
//! keyword lexicon that classifies a message's emotional tone, a rule-based
//! rephraser that softens hostile phrasing, and a durable append-only
//! history of classified interactions. Chat backends (Firestore, Realtime
//! Database, socket relays, chat SaaS) are external collaborators behind
//! the [`transport::Transport`] seam — the core never assumes which one is
//! wired in.

pub mod cli;
pub mod config;
pub mod error;
pub mod history;
pub mod lexicon;
pub mod rephrase;
pub mod transport;
pub mod viz;

use std::time::{SystemTime, UNIX_EPOCH};

use serde::Serialize;
use tracing::{debug, info};

pub use config::EngineConfig;
pub use error::NeurotapError;
pub use history::{HistoryEntry, HistoryStore};
pub use lexicon::{Lexicon, ToneEntry, Zone};
pub use rephrase::{RephraseRule, Rephraser, ESCALATION_MESSAGE};
pub use transport::{DeliveryReceipt, OutboundMessage, Transport};

// ---------------------------------------------------------------------------
// Verdict
// ---------------------------------------------------------------------------

/// The result of classifying one message: the resolved tone plus the
/// display attributes denormalized from the matched lexicon entry, stamped
/// with the classification time.
#[derive(Debug, Clone, Serialize)]
pub struct ToneVerdict {
    pub tone: String,
    pub zones: Vec<Zone>,
    pub neurotransmitters: Vec<String>,
    pub color: String,
    pub timestamp: u64,
}

// ---------------------------------------------------------------------------
// Engine
// ---------------------------------------------------------------------------

/// Wires the three core components together. Tables are loaded once at
/// construction and read-only afterwards; the engine is the only writer to
/// its history store.
pub struct NeurotapEngine {
    lexicon: Lexicon,
    rephraser: Rephraser,
    history: HistoryStore,
}

impl NeurotapEngine {
    pub fn new(config: EngineConfig) -> Result<Self, NeurotapError> {
        let history = HistoryStore::open(&config.history_path);
        let lexicon = Lexicon::new(config.tones)?;
        let rephraser = Rephraser::new(config.rules, config.markers, config.rude_words);
        info!(
            tones = lexicon.entries().len(),
            history = %history.path().display(),
            "engine ready"
        );
        Ok(NeurotapEngine {
            lexicon,
            rephraser,
            history,
        })
    }

    pub fn lexicon(&self) -> &Lexicon {
        &self.lexicon
    }

    pub fn history(&self) -> &HistoryStore {
        &self.history
    }

    /// Pure classification, no recording.
    pub fn classify(&self, text: &str) -> &ToneEntry {
        self.lexicon.classify(text)
    }

    /// Rule-based softening; independent of any message being sent.
    pub fn rephrase(&self, text: &str) -> String {
        self.rephraser.rephrase(text)
    }

    /// Rude-word masking for the outbound copy of a message.
    pub fn censor(&self, text: &str) -> String {
        self.rephraser.censor(text)
    }

    /// Classify a message and append it to the history log. A blank
    /// message still yields a (fallback) verdict but is not recorded —
    /// history entries carry non-empty text only.
    pub fn process(&self, text: &str) -> Result<ToneVerdict, NeurotapError> {
        let entry = self.lexicon.classify(text);
        let verdict = ToneVerdict {
            tone: entry.tone.clone(),
            zones: entry.zones.clone(),
            neurotransmitters: entry.neurotransmitters.clone(),
            color: entry.color.clone(),
            timestamp: now_ms(),
        };

        let trimmed = text.trim();
        if trimmed.is_empty() {
            debug!("blank message, verdict not recorded");
            return Ok(verdict);
        }

        self.history.append(HistoryEntry {
            text: trimmed.to_string(),
            tone: verdict.tone.clone(),
            color: verdict.color.clone(),
            timestamp: verdict.timestamp,
        })?;
        Ok(verdict)
    }

    /// [`process`](Self::process), then forward the censored text through
    /// the given transport. History is recorded before the send, so a
    /// transport failure surfaces without losing the entry. A blank message
    /// is classified but neither recorded nor sent (`None` receipt).
    pub async fn process_and_send<T: Transport>(
        &self,
        text: &str,
        sender: &str,
        thread_id: &str,
        transport: &T,
    ) -> Result<(ToneVerdict, Option<DeliveryReceipt>), NeurotapError> {
        let verdict = self.process(text)?;

        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Ok((verdict, None));
        }

        let outbound = OutboundMessage::new(
            thread_id,
            sender,
            &self.rephraser.censor(trimmed),
            &verdict.tone,
            verdict.timestamp,
        );
        debug!(id = %outbound.id, tone = %outbound.tone, "forwarding message");
        let receipt = transport.send(&outbound).await?;
        Ok((verdict, Some(receipt)))
    }
}

/// Wall-clock milliseconds; a pre-epoch clock reads as zero and the history
/// store's monotonic clamp covers the rest.
fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::LoopbackTransport;
    use tempfile::TempDir;

    fn make_test_engine() -> (NeurotapEngine, TempDir) {
        let dir = tempfile::tempdir().expect("tempdir");
        let config = EngineConfig {
            history_path: dir.path().join("history.json"),
            ..EngineConfig::default()
        };
        (NeurotapEngine::new(config).expect("engine"), dir)
    }

    // -- process --

    #[test]
    fn test_process_records_history() {
        let (engine, _dir) = make_test_engine();
        let verdict = engine.process("I am happy").expect("process");
        assert_eq!(verdict.tone, "joy");

        let all = engine.history().load_all();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].text, "I am happy");
        assert_eq!(all[0].tone, "joy");
        assert_eq!(all[0].color, verdict.color);
    }

    #[test]
    fn test_process_blank_message_not_recorded() {
        let (engine, _dir) = make_test_engine();
        let verdict = engine.process("   ").expect("process");
        assert_eq!(verdict.tone, "neutral");
        assert!(engine.history().is_empty());
    }

    #[test]
    fn test_process_denormalizes_color_at_write_time() {
        let (engine, _dir) = make_test_engine();
        engine.process("I hate waiting").expect("process");
        let all = engine.history().load_all();
        assert_eq!(all[0].color, "#e66");
    }

    #[test]
    fn test_verdict_carries_zones() {
        let (engine, _dir) = make_test_engine();
        let verdict = engine.process("thank you so much").expect("process");
        assert_eq!(verdict.tone, "empathy");
        assert_eq!(verdict.zones, vec![Zone::Acc, Zone::Hippocampus]);
    }

    // -- process_and_send --

    #[test]
    fn test_process_and_send_records_then_delivers() {
        tokio_test::block_on(async {
            let (engine, _dir) = make_test_engine();
            let transport = LoopbackTransport::default();

            let (verdict, receipt) = engine
                .process_and_send("feeling great", "Ada", "demo-thread", &transport)
                .await
                .expect("send");

            assert_eq!(verdict.tone, "joy");
            assert!(receipt.expect("receipt").accepted);
            assert_eq!(engine.history().len(), 1);
        });
    }

    #[test]
    fn test_process_and_send_censors_outbound_only() {
        tokio_test::block_on(async {
            use tokio_stream::StreamExt;

            let (engine, _dir) = make_test_engine();
            let transport = LoopbackTransport::default();
            let mut incoming = transport.subscribe();

            engine
                .process_and_send("what an idiot", "Ada", "demo-thread", &transport)
                .await
                .expect("send");

            let wire = incoming.next().await.expect("item").expect("no lag");
            assert_eq!(wire.text, "what an *****");
            // History keeps the original.
            assert_eq!(engine.history().load_all()[0].text, "what an idiot");
        });
    }

    #[test]
    fn test_process_and_send_blank_is_a_noop_send() {
        tokio_test::block_on(async {
            let (engine, _dir) = make_test_engine();
            let transport = LoopbackTransport::default();
            let (_, receipt) = engine
                .process_and_send("", "Ada", "demo-thread", &transport)
                .await
                .expect("send");
            assert!(receipt.is_none());
            assert!(engine.history().is_empty());
        });
    }

    #[test]
    fn test_transport_failure_keeps_history() {
        struct FailingTransport;
        impl Transport for FailingTransport {
            async fn send(
                &self,
                _msg: &OutboundMessage,
            ) -> Result<DeliveryReceipt, NeurotapError> {
                Err(NeurotapError::Transport("backend down".to_string()))
            }
        }

        tokio_test::block_on(async {
            let (engine, _dir) = make_test_engine();
            let result = engine
                .process_and_send("hello there", "Ada", "demo-thread", &FailingTransport)
                .await;
            assert!(result.is_err());
            // The entry was recorded before the failed send.
            assert_eq!(engine.history().len(), 1);
        });
    }

    // -- delegation --

    #[test]
    fn test_engine_rephrase_delegates() {
        let (engine, _dir) = make_test_engine();
        assert_eq!(engine.rephrase("I hate this"), "I really dislike this");
        assert!(engine.history().is_empty());
    }

    #[test]
    fn test_engine_classify_is_pure() {
        let (engine, _dir) = make_test_engine();
        engine.classify("so happy");
        engine.classify("so happy");
        assert!(engine.history().is_empty());
    }
}
