#![forbid(unsafe_code)]
//! Deploys a chairperson ballot and runs the five-voter scenario.

use colored::*;
use voteledger::cli;
use voteledger::config::load_config;
use voteledger::crypto::address_to_hex;
use voteledger::ledger::Ledger;

/// One vote per dev signer, in signer order.
const VOTES: [usize; 5] = [0, 1, 0, 2, 0];

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config()?;
    let mut ledger = Ledger::new()?;
    let chairperson = ledger.signer(0)?;

    println!("{}", "Deploying Ballot contract".bright_cyan());
    println!("Ballot Proposals:");
    cli::print_proposals(&config.ballot.proposals)?;

    let (ballot, receipt) = ledger.deploy_ballot(chairperson, &config.ballot.proposals)?;
    println!(
        "Ballot Contract deployed at {}",
        address_to_hex(&ballot).bright_green()
    );
    println!("Deployment tx {}", receipt.tx_hash);

    // The chairperson votes with the weight the constructor granted;
    // the other signers need rights first.
    for index in 1..VOTES.len() {
        let voter = ledger.signer(index)?;
        let receipt = ledger.give_right_to_vote(chairperson, ballot, voter)?;
        println!(
            "Gave right to vote to {} (tx {})",
            address_to_hex(&voter).bright_yellow(),
            receipt.tx_hash
        );
    }

    println!("\n{}", "===== VOTING =====".bright_cyan());
    for (index, &proposal) in VOTES.iter().enumerate() {
        let voter = ledger.signer(index)?;
        let receipt = ledger.vote(voter, ballot, proposal)?;
        println!(
            "Signer {} voted for proposal {} (block {})",
            index, proposal, receipt.block_number
        );
    }

    println!("\n{}", "===== Proposal Result =====".bright_cyan());
    let contract = ledger.ballot(&ballot)?;
    for proposal in contract.proposals() {
        println!("{}: {} votes", proposal.name, proposal.vote_count);
    }

    println!("\nWinning Proposal: {}", contract.winning_proposal());
    println!(
        "Winner Name: {}",
        contract.winner_name().to_string().bright_green()
    );

    Ok(())
}
