use crate::domain::card::Card;
use crate::domain::identity::ActorId;
use crate::domain::payment::Balance;
use crate::domain::request::{DrawRequest, RequestId};
use crate::error::Result;
use async_trait::async_trait;

pub type RequestLedgerBox = Box<dyn RequestLedger>;

/// Storage for admitted request records.
///
/// Implementations must never delete a record and never hand out an id for
/// reuse. `mark_fulfilled` is the at-most-once gate: it must flip the flag
/// false to true atomically and fail with `AlreadyFulfilled` when the flag
/// is already set, so two racing resolutions cannot both win.
/// `clear_fulfilled` undoes a mark after a failed delivery; it must not fail
/// for a record that was just marked.
#[async_trait]
pub trait RequestLedger: Send + Sync {
    async fn admit(&self, request: DrawRequest) -> Result<()>;
    async fn get(&self, id: RequestId) -> Result<Option<DrawRequest>>;
    async fn mark_fulfilled(&self, id: RequestId) -> Result<()>;
    async fn clear_fulfilled(&self, id: RequestId) -> Result<()>;
}

/// Capability through which a requester receives its draw. The broker holds
/// one per admitted request and invokes it exactly once on resolution.
#[async_trait]
pub trait ResultSink: Send + Sync {
    async fn on_result(&self, caller: ActorId, id: RequestId, cards: Vec<Card>) -> Result<()>;
}

/// Destination for the owner's fee withdrawal.
#[async_trait]
pub trait Payout: Send + Sync {
    async fn receive(&self, amount: Balance) -> Result<()>;
}
