use crate::application::broker::Broker;
use crate::domain::card::deal;
use crate::domain::event::{AdmissionNotice, OracleEvent};
use crate::domain::identity::ActorId;
use crate::error::Result;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, warn};

/// Off-ledger collaborator that answers admission notices.
///
/// For each admitted request it deals exactly the requested number of cards
/// (freshly shuffled deck per request when `shuffle` is set, fixed deck
/// order otherwise) and calls back into the broker under its own identity,
/// which must have been granted resolve rights.
pub struct Fulfiller {
    identity: ActorId,
    broker: Arc<Broker>,
}

impl Fulfiller {
    pub fn new(identity: ActorId, broker: Arc<Broker>) -> Self {
        Self { identity, broker }
    }

    /// Computes and delivers the answer for a single admission.
    pub async fn handle(&self, notice: &AdmissionNotice) -> Result<()> {
        debug!(id = %notice.id, quantity = notice.quantity, shuffle = notice.shuffle, "fulfilling");
        let cards = deal(notice.quantity as usize, notice.shuffle);
        self.broker.resolve(self.identity, notice.id, cards).await
    }

    /// Consumes the broker's notification stream until it closes, answering
    /// every admission. Resolution failures are logged and skipped; the
    /// record stays open for a retry.
    pub async fn run(self, mut events: mpsc::UnboundedReceiver<OracleEvent>) {
        while let Some(event) = events.recv().await {
            if let OracleEvent::Admission(notice) = event
                && let Err(err) = self.handle(&notice).await
            {
                warn!(id = %notice.id, %err, "fulfillment failed");
            }
        }
    }
}
