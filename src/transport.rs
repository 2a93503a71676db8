//! Transport seam. The core is transport-agnostic: it hands a finished
//! [`OutboundMessage`] to whatever backend is wired in and gets a
//! [`DeliveryReceipt`] or an error back. Delivery guarantees belong to the
//! backend, never to the core — history is already recorded by the time a
//! send happens, and a failed send leaves it intact.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use tokio_stream::wrappers::BroadcastStream;
use tracing::debug;
use uuid::Uuid;

use crate::error::NeurotapError;

// -- Backend selection ------------------------------------------------------

/// Which concrete backend the demo binary wires in. The library itself only
/// sees the [`Transport`] trait.
#[derive(Debug, Clone, ValueEnum, PartialEq)]
pub enum Backend {
    /// In-process broadcast channel; every subscriber sees every message.
    Loopback,
    /// HTTP client for a bespoke relay that rebroadcasts posted messages.
    Relay,
}

impl std::fmt::Display for Backend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Backend::Loopback => write!(f, "loopback"),
            Backend::Relay => write!(f, "relay"),
        }
    }
}

// -- Wire types -------------------------------------------------------------

/// The envelope a backend carries. Mirrors the prototypes' message record:
/// thread, sender, text, resolved tone, client send time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutboundMessage {
    pub id: String,
    pub thread_id: String,
    pub sender: String,
    pub text: String,
    pub tone: String,
    pub sent_at: u64,
}

impl OutboundMessage {
    pub fn new(thread_id: &str, sender: &str, text: &str, tone: &str, sent_at: u64) -> Self {
        OutboundMessage {
            id: Uuid::new_v4().to_string(),
            thread_id: thread_id.to_string(),
            sender: sender.to_string(),
            text: text.to_string(),
            tone: tone.to_string(),
            sent_at,
        }
    }
}

/// Acknowledgement a backend returns for one send.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeliveryReceipt {
    pub accepted: bool,
    pub id: String,
}

// -- Transport trait --------------------------------------------------------

/// The single capability the core requires of any backend: text in,
/// acknowledgement or error out.
#[allow(async_fn_in_trait)]
pub trait Transport {
    async fn send(&self, msg: &OutboundMessage) -> Result<DeliveryReceipt, NeurotapError>;
}

// -- Loopback ---------------------------------------------------------------

/// In-process broadcast backend. Stands in for the hosted chat services in
/// tests and the demo binary: a send fans out to every live subscriber,
/// sender included.
pub struct LoopbackTransport {
    tx: broadcast::Sender<OutboundMessage>,
}

impl LoopbackTransport {
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        LoopbackTransport { tx }
    }

    /// Stream of every message sent after this call.
    pub fn subscribe(&self) -> BroadcastStream<OutboundMessage> {
        BroadcastStream::new(self.tx.subscribe())
    }

    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl Default for LoopbackTransport {
    fn default() -> Self {
        LoopbackTransport::new(64)
    }
}

impl Transport for LoopbackTransport {
    async fn send(&self, msg: &OutboundMessage) -> Result<DeliveryReceipt, NeurotapError> {
        // An empty room is not a delivery failure.
        let listeners = self.tx.send(msg.clone()).unwrap_or(0);
        debug!(listeners, id = %msg.id, "loopback broadcast");
        Ok(DeliveryReceipt {
            accepted: true,
            id: msg.id.clone(),
        })
    }
}

// -- Relay ------------------------------------------------------------------

/// Thin HTTP client for the socket-relay experiment: POST the envelope,
/// read back a receipt. The relay owns broadcasting to connected peers.
pub struct RelayTransport {
    client: reqwest::Client,
    base_url: String,
}

impl RelayTransport {
    pub fn new(base_url: &str) -> Self {
        RelayTransport {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

impl Transport for RelayTransport {
    async fn send(&self, msg: &OutboundMessage) -> Result<DeliveryReceipt, NeurotapError> {
        let url = format!("{}/messages", self.base_url);
        let response = self
            .client
            .post(&url)
            .json(msg)
            .send()
            .await
            .map_err(|e| NeurotapError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(NeurotapError::Transport(format!(
                "relay returned {status}"
            )));
        }

        // Older relay builds reply with an empty body; treat 2xx as accepted.
        match response.json::<DeliveryReceipt>().await {
            Ok(receipt) => Ok(receipt),
            Err(_) => Ok(DeliveryReceipt {
                accepted: true,
                id: msg.id.clone(),
            }),
        }
    }
}
