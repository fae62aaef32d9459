use crate::domain::card::Card;
use crate::domain::event::{unix_now, AdmissionNotice, FulfillmentNotice, OracleEvent};
use crate::domain::identity::ActorId;
use crate::domain::payment::Balance;
use crate::domain::ports::{Payout, RequestLedgerBox, ResultSink};
use crate::domain::request::{DrawRequest, Quantity, RequestId};
use crate::error::{OracleError, Result};
use std::collections::HashSet;
use std::sync::Arc;
use tokio::sync::{mpsc, Mutex};
use tracing::{debug, error, info, warn};

const FIRST_REQUEST_ID: u32 = 1;

struct BrokerState {
    fee: Balance,
    balance: Balance,
    next_id: u32,
    paused: bool,
    fulfillers: HashSet<ActorId>,
}

impl BrokerState {
    fn ensure_owner(&self, owner: ActorId, caller: ActorId) -> Result<()> {
        if caller == owner {
            Ok(())
        } else {
            Err(OracleError::Unauthorized(caller))
        }
    }

    fn ensure_fulfiller(&self, caller: ActorId) -> Result<()> {
        if self.fulfillers.contains(&caller) {
            Ok(())
        } else {
            Err(OracleError::Unauthorized(caller))
        }
    }
}

/// The trust-mediated bridge between requesters and the off-ledger
/// fulfiller.
///
/// Owns the request ledger, the fee policy, the accumulated balance and the
/// pause switch. All mutating operations take the caller's identity
/// explicitly; `resolve` is restricted to the authorized fulfiller set
/// (seeded with the owner), admin operations to the owner alone.
pub struct Broker {
    identity: ActorId,
    owner: ActorId,
    ledger: RequestLedgerBox,
    state: Mutex<BrokerState>,
    events: mpsc::UnboundedSender<OracleEvent>,
}

impl Broker {
    /// Creates a broker and the receiving end of its notification stream.
    pub fn new(
        identity: ActorId,
        owner: ActorId,
        fee: Balance,
        ledger: RequestLedgerBox,
    ) -> (Self, mpsc::UnboundedReceiver<OracleEvent>) {
        let (events, events_rx) = mpsc::unbounded_channel();
        let broker = Self {
            identity,
            owner,
            ledger,
            state: Mutex::new(BrokerState {
                fee,
                balance: Balance::ZERO,
                next_id: FIRST_REQUEST_ID,
                paused: false,
                fulfillers: HashSet::from([owner]),
            }),
            events,
        };
        (broker, events_rx)
    }

    /// Admits a new draw request and returns its id.
    ///
    /// The full payment is retained, including any excess over the fee (no
    /// refund, documented policy). On any failure nothing is recorded and
    /// `next_id` is unchanged.
    pub async fn submit(
        &self,
        caller: ActorId,
        quantity: u8,
        shuffle: bool,
        sink: Arc<dyn ResultSink>,
        payment: Balance,
    ) -> Result<RequestId> {
        let quantity = Quantity::new(quantity)?;
        let mut state = self.state.lock().await;
        if state.paused {
            return Err(OracleError::BrokerPaused);
        }
        if payment < state.fee {
            return Err(OracleError::InsufficientPayment {
                paid: payment.value(),
                fee: state.fee.value(),
            });
        }

        let id = RequestId(state.next_id);
        let request = DrawRequest::new(id, quantity, shuffle, caller, sink);
        self.ledger.admit(request).await?;
        state.next_id += 1;
        state.balance += payment;

        info!(%id, quantity = quantity.get(), shuffle, submitter = %caller, "request admitted");
        // A dropped receiver only means nobody is listening yet.
        let _ = self.events.send(OracleEvent::Admission(AdmissionNotice {
            id,
            shuffle,
            quantity: quantity.get(),
            submitter: caller,
            timestamp: unix_now(),
        }));
        Ok(id)
    }

    /// Records the results for `id` and delivers them to the request's sink.
    ///
    /// The fulfilled flag is committed to the ledger before the sink runs;
    /// the commit is the ledger's atomic `mark_fulfilled`, so of any number
    /// of racing or reentrant resolutions for the same id exactly one wins
    /// and the rest see `AlreadyFulfilled`. If the sink fails, the flag is
    /// rolled back and the record stays resolvable by a retry; the
    /// fulfillment notice is only emitted once the whole transition has
    /// stuck.
    pub async fn resolve(&self, caller: ActorId, id: RequestId, cards: Vec<Card>) -> Result<()> {
        {
            let state = self.state.lock().await;
            state.ensure_fulfiller(caller)?;
            if state.paused {
                return Err(OracleError::BrokerPaused);
            }
        }

        let request = self
            .ledger
            .get(id)
            .await?
            .ok_or(OracleError::RequestNotFound(id))?;
        if request.fulfilled {
            return Err(OracleError::AlreadyFulfilled(id));
        }
        let expected = request.quantity.get() as usize;
        if cards.len() != expected {
            return Err(OracleError::QuantityMismatch {
                expected,
                actual: cards.len(),
            });
        }

        self.ledger.mark_fulfilled(id).await?;
        if let Err(err) = request
            .sink
            .on_result(self.identity, id, cards.clone())
            .await
        {
            warn!(%id, %err, "result callback failed, rolling back");
            if let Err(rollback) = self.ledger.clear_fulfilled(id).await {
                // The ledger contract says this cannot fail for a record we
                // just marked; if it does, the record is stuck fulfilled.
                error!(%id, %rollback, "rollback failed");
            }
            return Err(OracleError::CallbackFailed(Box::new(err)));
        }

        info!(%id, n_cards = cards.len(), fulfiller = %caller, "request fulfilled");
        let _ = self
            .events
            .send(OracleEvent::Fulfillment(FulfillmentNotice {
                id,
                cards,
                fulfiller: caller,
                timestamp: unix_now(),
            }));
        Ok(())
    }

    /// Owner-only, idempotent. While paused both `submit` and `resolve`
    /// reject with `BrokerPaused`.
    pub async fn pause(&self, caller: ActorId) -> Result<()> {
        let mut state = self.state.lock().await;
        state.ensure_owner(self.owner, caller)?;
        state.paused = true;
        info!("broker paused");
        Ok(())
    }

    pub async fn resume(&self, caller: ActorId) -> Result<()> {
        let mut state = self.state.lock().await;
        state.ensure_owner(self.owner, caller)?;
        state.paused = false;
        info!("broker resumed");
        Ok(())
    }

    /// Owner-only. Applies to subsequent submissions; already-admitted
    /// requests are unaffected.
    pub async fn set_fee(&self, caller: ActorId, fee: Balance) -> Result<()> {
        let mut state = self.state.lock().await;
        state.ensure_owner(self.owner, caller)?;
        debug!(old = %state.fee, new = %fee, "fee updated");
        state.fee = fee;
        Ok(())
    }

    /// Owner-only. Transfers the entire accumulated balance to
    /// `destination`; if the transfer fails the balance is restored.
    pub async fn withdraw(&self, caller: ActorId, destination: &dyn Payout) -> Result<Balance> {
        let amount = {
            let mut state = self.state.lock().await;
            state.ensure_owner(self.owner, caller)?;
            let amount = state.balance;
            state.balance = Balance::ZERO;
            amount
        };
        // The outlet runs outside the state lock, so it may call back into
        // the broker. Fees submitted during the transfer are not part of
        // `amount`, hence the restore is additive.
        if let Err(err) = destination.receive(amount).await {
            self.state.lock().await.balance += amount;
            return Err(OracleError::TransferFailed(err.to_string()));
        }
        info!(%amount, "balance withdrawn");
        Ok(amount)
    }

    /// Owner-only. Adds an identity to the set allowed to call `resolve`.
    pub async fn grant_fulfiller(&self, caller: ActorId, who: ActorId) -> Result<()> {
        let mut state = self.state.lock().await;
        state.ensure_owner(self.owner, caller)?;
        state.fulfillers.insert(who);
        Ok(())
    }

    /// Owner-only. The owner itself cannot be revoked.
    pub async fn revoke_fulfiller(&self, caller: ActorId, who: ActorId) -> Result<()> {
        let mut state = self.state.lock().await;
        state.ensure_owner(self.owner, caller)?;
        if who != self.owner {
            state.fulfillers.remove(&who);
        }
        Ok(())
    }

    pub fn identity(&self) -> ActorId {
        self.identity
    }

    pub fn owner(&self) -> ActorId {
        self.owner
    }

    pub async fn fee(&self) -> Balance {
        self.state.lock().await.fee
    }

    pub async fn balance(&self) -> Balance {
        self.state.lock().await.balance
    }

    pub async fn is_paused(&self) -> bool {
        self.state.lock().await.paused
    }

    pub async fn next_id(&self) -> u32 {
        self.state.lock().await.next_id
    }

    /// Looks up the retained record for `id`, if one was ever admitted.
    pub async fn request(&self, id: RequestId) -> Result<Option<DrawRequest>> {
        self.ledger.get(id).await
    }
}
