use clap::Parser;
use deckoracle::application::broker::Broker;
use deckoracle::application::fulfiller::Fulfiller;
use deckoracle::application::requester::Requester;
use deckoracle::domain::event::OracleEvent;
use deckoracle::domain::identity::ActorId;
use deckoracle::domain::payment::Balance;
use deckoracle::infrastructure::in_memory::InMemoryRequestLedger;
use deckoracle::interfaces::json::event_writer::EventWriter;
use miette::{IntoDiagnostic, Result};
use rust_decimal::Decimal;
use std::io;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Number of cards to draw (1-52)
    #[arg(long, default_value_t = 5)]
    cards: u8,

    /// Shuffle the deck before dealing
    #[arg(long)]
    shuffle: bool,

    /// Broker fee per request
    #[arg(long, default_value = "1.0")]
    fee: Decimal,

    /// Payment sent with the request; defaults to the fee
    #[arg(long)]
    payment: Option<Decimal>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();
    let cli = Cli::parse();

    let owner = ActorId(1);
    let client = ActorId(2);
    let (broker, mut events) = Broker::new(
        ActorId(10),
        owner,
        Balance::new(cli.fee),
        Box::new(InMemoryRequestLedger::new()),
    );
    let broker = Arc::new(broker);
    let requester = Requester::new(client, client, Arc::clone(&broker));
    let fulfiller = Fulfiller::new(owner, Arc::clone(&broker));

    let payment = Balance::new(cli.payment.unwrap_or(cli.fee));
    let id = requester
        .request_draw(cli.cards, cli.shuffle, payment)
        .await
        .into_diagnostic()?;

    // Drive admission through fulfillment, echoing the notification stream.
    let stdout = io::stdout();
    let mut writer = EventWriter::new(stdout.lock());
    while let Ok(event) = events.try_recv() {
        writer.write_event(&event).into_diagnostic()?;
        match &event {
            OracleEvent::Admission(notice) => {
                fulfiller.handle(notice).await.into_diagnostic()?;
            }
            OracleEvent::Fulfillment(_) => break,
        }
    }
    drop(writer);

    let hand: Vec<String> = requester
        .last_results()
        .await
        .iter()
        .map(ToString::to_string)
        .collect();
    let balance = broker.balance().await;
    println!(
        "{}",
        serde_json::json!({ "id": id, "hand": hand, "balance": balance })
    );
    Ok(())
}
