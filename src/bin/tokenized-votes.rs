#![forbid(unsafe_code)]
//! Full token-weighted voting scenario: deploy the token and ballot, listen
//! for `Voted` events, mint voting tokens to four wallets, self-delegate
//! each, spend part of the power on the proposals, and print the winner.

use colored::*;
use voteledger::cli;
use voteledger::config::load_config;
use voteledger::crypto::{address_to_hex, Address};
use voteledger::encoding::{format_ether, parse_ether};
use voteledger::ledger::{Ledger, VotedLog};

/// Tokens minted to each wallet, in whole tokens.
const BASE_VOTE_POWER: &str = "10";

/// Power each wallet spends on its vote, in whole tokens.
const USED_VOTE_POWER: &str = "5";

/// Proposal each wallet votes for, in wallet order.
const WALLET_VOTES: [usize; 4] = [0, 1, 2, 0];

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config()?;
    let wallet = cli::script_wallet()?;
    let mut ledger = cli::bootstrap_ledger(&wallet, &config)?;

    cli::check_deploy_balance(&ledger, &wallet, &config)?;
    cli::print_proposals(&config.ballot.proposals)?;

    let deployer = wallet.address();
    let (token, _) = ledger.deploy_token(deployer, "Vote Token", "VTK")?;
    println!("Awaiting confirmations token contract");
    let (ballot, _) = ledger.deploy_custom_ballot(deployer, &config.ballot.proposals, token)?;
    println!("Awaiting confirmations ballot contract");

    println!("Setting listeners on");
    let voted_events = ledger.subscribe_voted(Some(ballot));
    println!("Total of {} listeners set", ledger.listener_count());

    println!("{}", "Populating transactions".bright_cyan());
    let mut wallets: Vec<Address> = Vec::with_capacity(WALLET_VOTES.len());
    for _ in 0..WALLET_VOTES.len() {
        wallets.push(ledger.create_wallet()?);
    }

    println!("Minting token to {} wallets", wallets.len());
    let base_power = parse_ether(BASE_VOTE_POWER)?;
    for address in &wallets {
        ledger.mint(deployer, token, *address, base_power)?;
        println!(
            "Success minted vote token to {} wallet address",
            address_to_hex(address).bright_yellow()
        );
    }

    for (index, proposal) in ledger.custom_ballot(&ballot)?.proposals().iter().enumerate() {
        println!("Proposal {}: {}", index + 1, proposal.name);
    }

    for address in &wallets {
        println!(
            "\nVoting power: {}",
            format_ether(ledger.voting_power(&ballot, address)?)
        );
        println!("Delegate address: {}", address_to_hex(address));
        ledger.delegate_votes(*address, token, *address)?;
        println!(
            "Voting power after delegation: {}",
            format_ether(ledger.voting_power(&ballot, address)?)
        );
    }

    println!("\n{}", "===== VOTING =====".bright_cyan());
    let used_power = parse_ether(USED_VOTE_POWER)?;
    for (index, (address, &proposal)) in wallets.iter().zip(WALLET_VOTES.iter()).enumerate() {
        println!("\nWallet {} (vote proposal {})", index + 1, proposal);
        let receipt = ledger.vote_with_power(*address, ballot, proposal, used_power)?;
        println!("Vote tx {}", receipt.tx_hash);
        println!(
            "Remaining vote power: {}",
            format_ether(ledger.voting_power(&ballot, address)?)
        );
    }

    for log in voted_events.try_iter() {
        print_voted(&log);
    }

    println!("\n{}", "===== Done Voting =====".bright_cyan());
    println!("{}", "===== Proposal Result =====".bright_cyan());

    let contract = ledger.custom_ballot(&ballot)?;
    println!("\nWinning Proposal: {}", contract.winning_proposal());
    println!(
        "Winner Name: {}",
        contract.winner_name().to_string().bright_green()
    );

    println!("Done");
    Ok(())
}

fn print_voted(log: &VotedLog) {
    println!("{}", "New vote cast".bright_green());
    println!(
        "  voter {} proposal {} amount {} total {} (block {})",
        address_to_hex(&log.event.voter),
        log.event.proposal,
        format_ether(log.event.amount),
        format_ether(log.event.proposal_votes),
        log.block_number
    );
}
