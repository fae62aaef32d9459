use crate::domain::card::DECK_SIZE;
use crate::domain::identity::ActorId;
use crate::domain::ports::ResultSink;
use crate::error::{OracleError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Broker-assigned request identifier. Strictly increasing across the
/// broker's lifetime, never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RequestId(pub u32);

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "req:{}", self.0)
    }
}

/// Number of cards asked for in a single draw, validated to `1..=52`.
/// Deserialization goes through the same validation as `new`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "u8")]
pub struct Quantity(u8);

impl Quantity {
    pub fn new(value: u8) -> Result<Self> {
        if value == 0 {
            return Err(OracleError::InvalidRequest(
                "quantity must be positive".to_string(),
            ));
        }
        if value as usize > DECK_SIZE {
            return Err(OracleError::InvalidRequest(format!(
                "quantity {value} exceeds deck size {DECK_SIZE}"
            )));
        }
        Ok(Self(value))
    }

    pub fn get(&self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for Quantity {
    type Error = OracleError;

    fn try_from(value: u8) -> Result<Self> {
        Self::new(value)
    }
}

/// A request record as retained by the broker's ledger.
///
/// Records are mutated exactly once (`fulfilled` false to true) and never
/// deleted; the ledger doubles as the idempotency audit trail. The sink
/// replaces the source's raw callback target/selector pair, so the callback
/// end point cannot be null or mistyped.
#[derive(Clone)]
pub struct DrawRequest {
    pub id: RequestId,
    pub quantity: Quantity,
    pub shuffle: bool,
    pub submitter: ActorId,
    pub sink: Arc<dyn ResultSink>,
    pub fulfilled: bool,
}

impl DrawRequest {
    pub fn new(
        id: RequestId,
        quantity: Quantity,
        shuffle: bool,
        submitter: ActorId,
        sink: Arc<dyn ResultSink>,
    ) -> Self {
        Self {
            id,
            quantity,
            shuffle,
            submitter,
            sink,
            fulfilled: false,
        }
    }
}

impl fmt::Debug for DrawRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DrawRequest")
            .field("id", &self.id)
            .field("quantity", &self.quantity)
            .field("shuffle", &self.shuffle)
            .field("submitter", &self.submitter)
            .field("fulfilled", &self.fulfilled)
            .finish_non_exhaustive()
    }
}
