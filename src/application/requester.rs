use crate::application::broker::Broker;
use crate::domain::card::Card;
use crate::domain::identity::ActorId;
use crate::domain::payment::Balance;
use crate::domain::ports::ResultSink;
use crate::domain::request::RequestId;
use crate::error::{OracleError, Result};
use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info};

#[derive(Default)]
struct RequesterState {
    pending: Option<RequestId>,
    last_results: Vec<Card>,
}

/// Client-side actor wrapping a single broker.
///
/// Enforces the one-outstanding-request contract: a new draw is only
/// accepted once the previous one has been delivered through `on_result`.
/// The broker binding is fixed at construction and is the sole identity
/// allowed to deliver results.
pub struct Requester {
    identity: ActorId,
    owner: ActorId,
    broker: Arc<Broker>,
    broker_id: ActorId,
    state: Mutex<RequesterState>,
}

impl Requester {
    pub fn new(identity: ActorId, owner: ActorId, broker: Arc<Broker>) -> Arc<Self> {
        let broker_id = broker.identity();
        Arc::new(Self {
            identity,
            owner,
            broker,
            broker_id,
            state: Mutex::new(RequesterState::default()),
        })
    }

    /// Forwards a draw request to the bound broker with this requester as
    /// the result sink.
    ///
    /// Broker failures are surfaced verbatim and leave no pending state
    /// behind.
    pub async fn request_draw(
        self: &Arc<Self>,
        quantity: u8,
        shuffle: bool,
        payment: Balance,
    ) -> Result<RequestId> {
        let mut state = self.state.lock().await;
        if let Some(pending) = state.pending {
            return Err(OracleError::RequestAlreadyPending(pending));
        }

        let sink: Arc<dyn ResultSink> = self.clone();
        let id = self
            .broker
            .submit(self.identity, quantity, shuffle, sink, payment)
            .await?;
        state.pending = Some(id);
        debug!(%id, quantity, shuffle, "draw requested");
        Ok(id)
    }

    pub fn identity(&self) -> ActorId {
        self.identity
    }

    pub fn owner(&self) -> ActorId {
        self.owner
    }

    pub async fn pending(&self) -> Option<RequestId> {
        self.state.lock().await.pending
    }

    pub async fn last_results(&self) -> Vec<Card> {
        self.state.lock().await.last_results.clone()
    }
}

#[async_trait]
impl ResultSink for Requester {
    /// Delivery entry point, callable only by the bound broker.
    ///
    /// An id that does not match the pending slot means the binding between
    /// requester and broker is corrupted; that is a fatal defect, not an
    /// error the caller can handle, hence the hard assertion.
    async fn on_result(&self, caller: ActorId, id: RequestId, cards: Vec<Card>) -> Result<()> {
        if caller != self.broker_id {
            return Err(OracleError::Unauthorized(caller));
        }

        let mut state = self.state.lock().await;
        assert_eq!(
            state.pending,
            Some(id),
            "broker delivered {id} but the pending slot holds {:?}",
            state.pending
        );
        info!(%id, n_cards = cards.len(), "draw delivered");
        state.last_results = cards;
        state.pending = None;
        Ok(())
    }
}
