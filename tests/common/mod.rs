use deckoracle::application::broker::Broker;
use deckoracle::application::fulfiller::Fulfiller;
use deckoracle::application::requester::Requester;
use deckoracle::domain::event::OracleEvent;
use deckoracle::domain::identity::ActorId;
use deckoracle::domain::payment::Balance;
use deckoracle::infrastructure::in_memory::InMemoryRequestLedger;
use std::sync::Arc;
use tokio::sync::mpsc;

pub const OWNER: ActorId = ActorId(1);
pub const BROKER_ID: ActorId = ActorId(10);
pub const CLIENT: ActorId = ActorId(2);

pub struct Harness {
    pub broker: Arc<Broker>,
    pub requester: Arc<Requester>,
    pub fulfiller: Fulfiller,
    pub events: mpsc::UnboundedReceiver<OracleEvent>,
}

/// Wires a broker, a requester bound to it, and a fulfiller running under
/// the owner's identity.
pub fn wiring(fee: Balance) -> Harness {
    let (broker, events) = Broker::new(
        BROKER_ID,
        OWNER,
        fee,
        Box::new(InMemoryRequestLedger::new()),
    );
    let broker = Arc::new(broker);
    let requester = Requester::new(CLIENT, CLIENT, Arc::clone(&broker));
    let fulfiller = Fulfiller::new(OWNER, Arc::clone(&broker));
    Harness {
        broker,
        requester,
        fulfiller,
        events,
    }
}

impl Harness {
    /// Pops the next event, which must be an admission, and answers it.
    pub async fn fulfill_next(&mut self) {
        let OracleEvent::Admission(notice) = self.events.try_recv().expect("no event queued")
        else {
            panic!("expected an admission notice");
        };
        self.fulfiller.handle(&notice).await.expect("fulfillment failed");
    }
}
