use crate::domain::identity::ActorId;
use crate::domain::request::RequestId;
use rust_decimal::Decimal;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, OracleError>;

#[derive(Error, Debug)]
pub enum OracleError {
    #[error("invalid request: {0}")]
    InvalidRequest(String),
    #[error("payment {paid} is below the current fee {fee}")]
    InsufficientPayment { paid: Decimal, fee: Decimal },
    #[error("broker is paused")]
    BrokerPaused,
    #[error("caller {0} is not authorized")]
    Unauthorized(ActorId),
    #[error("no request admitted under id {0}")]
    RequestNotFound(RequestId),
    #[error("request {0} has already been fulfilled")]
    AlreadyFulfilled(RequestId),
    #[error("expected {expected} cards, got {actual}")]
    QuantityMismatch { expected: usize, actual: usize },
    #[error("result callback failed")]
    CallbackFailed(#[source] Box<OracleError>),
    #[error("draw request {0} is still pending")]
    RequestAlreadyPending(RequestId),
    #[error("payout transfer failed: {0}")]
    TransferFailed(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
