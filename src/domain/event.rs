use crate::domain::card::Card;
use crate::domain::identity::ActorId;
use crate::domain::request::RequestId;
use serde::Serialize;
use std::time::{SystemTime, UNIX_EPOCH};

/// Emitted when a request is admitted to the ledger. This is what an
/// off-ledger fulfiller subscribes to.
#[derive(Debug, Clone, Serialize)]
pub struct AdmissionNotice {
    pub id: RequestId,
    pub shuffle: bool,
    pub quantity: u8,
    pub submitter: ActorId,
    pub timestamp: u64,
}

/// Emitted after a resolution has been delivered to the requester.
#[derive(Debug, Clone, Serialize)]
pub struct FulfillmentNotice {
    pub id: RequestId,
    pub cards: Vec<Card>,
    pub fulfiller: ActorId,
    pub timestamp: u64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum OracleEvent {
    Admission(AdmissionNotice),
    Fulfillment(FulfillmentNotice),
}

/// Seconds since the Unix epoch, used as the notification timestamp.
pub fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_admission_notice_json_shape() {
        let notice = OracleEvent::Admission(AdmissionNotice {
            id: RequestId(7),
            shuffle: true,
            quantity: 5,
            submitter: ActorId(2),
            timestamp: 1700000000,
        });
        let json = serde_json::to_string(&notice).unwrap();
        assert!(json.contains("\"event\":\"admission\""));
        assert!(json.contains("\"quantity\":5"));
    }

    #[test]
    fn test_unix_now_is_nonzero() {
        assert!(unix_now() > 0);
    }
}
