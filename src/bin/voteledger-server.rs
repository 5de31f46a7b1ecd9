#![forbid(unsafe_code)]
//! Serves the ballot REST API over a freshly seeded dev ledger.

use log::info;
use parking_lot::RwLock;
use std::sync::Arc;
use voteledger::api::{build_api_router, AppState};
use voteledger::cli;
use voteledger::config::load_config;
use voteledger::crypto::address_to_hex;
use voteledger::ledger::Ledger;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let config = load_config()?;
    let mut ledger = Ledger::new()?;
    let chairperson = ledger.signer(0)?;

    cli::print_proposals(&config.ballot.proposals)?;
    let (ballot, receipt) = ledger.deploy_ballot(chairperson, &config.ballot.proposals)?;
    info!(
        "Ballot deployed at {} (tx {})",
        address_to_hex(&ballot),
        receipt.tx_hash
    );

    let state = Arc::new(AppState {
        ledger: RwLock::new(ledger),
        ballot,
    });
    let app = build_api_router(state);

    let bind = format!("{}:{}", config.network.bind_address, config.network.api_port);
    let listener = tokio::net::TcpListener::bind(&bind).await?;
    info!("API server listening on {}", bind);
    axum::serve(listener, app).await?;

    Ok(())
}
