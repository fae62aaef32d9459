use crate::domain::ports::RequestLedger;
use crate::domain::request::{DrawRequest, RequestId};
use crate::error::{OracleError, Result};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// A thread-safe in-memory request ledger.
///
/// Uses `Arc<RwLock<HashMap<RequestId, DrawRequest>>>` for shared concurrent
/// access. Records are only ever inserted or flipped, never removed; the map
/// is the audit trail the at-most-once guarantee rests on.
#[derive(Default, Clone)]
pub struct InMemoryRequestLedger {
    requests: Arc<RwLock<HashMap<RequestId, DrawRequest>>>,
}

impl InMemoryRequestLedger {
    /// Creates a new, empty ledger.
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.requests.read().await.len()
    }
}

#[async_trait]
impl RequestLedger for InMemoryRequestLedger {
    async fn admit(&self, request: DrawRequest) -> Result<()> {
        let mut requests = self.requests.write().await;
        requests.insert(request.id, request);
        Ok(())
    }

    async fn get(&self, id: RequestId) -> Result<Option<DrawRequest>> {
        let requests = self.requests.read().await;
        Ok(requests.get(&id).cloned())
    }

    async fn mark_fulfilled(&self, id: RequestId) -> Result<()> {
        let mut requests = self.requests.write().await;
        let request = requests
            .get_mut(&id)
            .ok_or(OracleError::RequestNotFound(id))?;
        if request.fulfilled {
            return Err(OracleError::AlreadyFulfilled(id));
        }
        request.fulfilled = true;
        Ok(())
    }

    async fn clear_fulfilled(&self, id: RequestId) -> Result<()> {
        let mut requests = self.requests.write().await;
        let request = requests
            .get_mut(&id)
            .ok_or(OracleError::RequestNotFound(id))?;
        request.fulfilled = false;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::card::Card;
    use crate::domain::identity::ActorId;
    use crate::domain::ports::ResultSink;
    use crate::domain::request::Quantity;

    struct NullSink;

    #[async_trait]
    impl ResultSink for NullSink {
        async fn on_result(
            &self,
            _caller: ActorId,
            _id: RequestId,
            _cards: Vec<Card>,
        ) -> Result<()> {
            Ok(())
        }
    }

    fn request(id: u32) -> DrawRequest {
        DrawRequest::new(
            RequestId(id),
            Quantity::new(5).unwrap(),
            false,
            ActorId(2),
            Arc::new(NullSink),
        )
    }

    #[tokio::test]
    async fn test_admit_and_get() {
        let ledger = InMemoryRequestLedger::new();
        ledger.admit(request(1)).await.unwrap();

        let stored = ledger.get(RequestId(1)).await.unwrap().unwrap();
        assert_eq!(stored.id, RequestId(1));
        assert!(!stored.fulfilled);

        assert!(ledger.get(RequestId(2)).await.unwrap().is_none());
        assert_eq!(ledger.len().await, 1);
    }

    #[tokio::test]
    async fn test_mark_and_clear_round_trip() {
        let ledger = InMemoryRequestLedger::new();
        ledger.admit(request(1)).await.unwrap();

        ledger.mark_fulfilled(RequestId(1)).await.unwrap();
        assert!(ledger.get(RequestId(1)).await.unwrap().unwrap().fulfilled);

        ledger.clear_fulfilled(RequestId(1)).await.unwrap();
        assert!(!ledger.get(RequestId(1)).await.unwrap().unwrap().fulfilled);
    }

    #[tokio::test]
    async fn test_mark_fulfilled_wins_only_once() {
        let ledger = InMemoryRequestLedger::new();
        ledger.admit(request(1)).await.unwrap();

        ledger.mark_fulfilled(RequestId(1)).await.unwrap();
        let err = ledger.mark_fulfilled(RequestId(1)).await.unwrap_err();
        assert!(matches!(err, OracleError::AlreadyFulfilled(_)));
    }

    #[tokio::test]
    async fn test_mark_fulfilled_unknown_id() {
        let ledger = InMemoryRequestLedger::new();
        let err = ledger.mark_fulfilled(RequestId(9)).await.unwrap_err();
        assert!(matches!(err, OracleError::RequestNotFound(_)));
    }
}
