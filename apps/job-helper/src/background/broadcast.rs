//! Best-effort push of state changes to whichever popup happens to be open.

use thiserror::Error;
use tokio::sync::broadcast;
use tracing::{error, trace};

use super::store::ApplicationState;

/// Buffered broadcasts per subscriber before the oldest are dropped.
const CHANNEL_CAPACITY: usize = 16;

#[derive(Debug, Error, PartialEq)]
pub enum DeliveryError {
    /// No popup is listening. Expected whenever the popup is closed.
    #[error("Receiving end does not exist.")]
    NoReceiver,

    #[error("message delivery failed: {0}")]
    Failed(String),
}

/// Sends a state to the popup side.
pub trait Messenger: Send + Sync {
    fn send(&self, state: &ApplicationState) -> Result<(), DeliveryError>;
}

/// Swallows `NoReceiver`, logs everything else.
pub fn report_delivery(result: Result<(), DeliveryError>) {
    match result {
        Ok(()) => {}
        Err(DeliveryError::NoReceiver) => trace!("No popup listening; broadcast dropped"),
        Err(e) => error!("Error sending message to popup: {e}"),
    }
}

/// `Messenger` over a tokio broadcast channel. Subscribers receive the
/// serialized state, exactly what goes on the wire.
#[derive(Clone)]
pub struct BroadcastMessenger {
    tx: broadcast::Sender<String>,
}

impl Default for BroadcastMessenger {
    fn default() -> Self {
        Self::new()
    }
}

impl BroadcastMessenger {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(CHANNEL_CAPACITY);
        Self { tx }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<String> {
        self.tx.subscribe()
    }
}

impl Messenger for BroadcastMessenger {
    fn send(&self, state: &ApplicationState) -> Result<(), DeliveryError> {
        let payload =
            serde_json::to_string(state).map_err(|e| DeliveryError::Failed(e.to_string()))?;
        self.tx
            .send(payload)
            .map(|_| ())
            .map_err(|_| DeliveryError::NoReceiver)
    }
}
