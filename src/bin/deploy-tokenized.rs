#![forbid(unsafe_code)]
//! Deploys the vote token and the token-weighted ballot, then prints both
//! contract addresses.

use colored::*;
use voteledger::cli;
use voteledger::config::load_config;
use voteledger::crypto::address_to_hex;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config()?;
    let wallet = cli::script_wallet()?;
    let mut ledger = cli::bootstrap_ledger(&wallet, &config)?;

    cli::check_deploy_balance(&ledger, &wallet, &config)?;

    println!("Deploying Token contract");
    println!("Ballot Proposals:");
    cli::print_proposals(&config.ballot.proposals)?;

    let deployer = wallet.address();
    let (token, _) = ledger.deploy_token(deployer, "Vote Token", "VTK")?;
    println!("Awaiting confirmations token contract");

    let (ballot, _) = ledger.deploy_custom_ballot(deployer, &config.ballot.proposals, token)?;
    println!("Awaiting confirmations ballot contract");

    println!("{}", "Completed".bright_green());
    println!("Ballot Contract deployed at {}", address_to_hex(&ballot));
    println!("VoteToken Contract deployed at {}", address_to_hex(&token));

    Ok(())
}
