//! Shared helpers for the script binaries

use crate::config::{Config, EXPOSED_KEY};
use crate::crypto::{address_to_hex, KeyPair};
use crate::encoding::{format_ether, parse_ether};
use crate::error::{LedgerError, Result};
use crate::ledger::Ledger;
use colored::*;

/// Environment variable holding an override for the script wallet key.
pub const PRIVATE_KEY_ENV: &str = "VOTELEDGER_PRIVATE_KEY";

/// Resolve the wallet the scripts sign with: the key from the environment
/// if set, otherwise the embedded demo key.
pub fn script_wallet() -> Result<KeyPair> {
    match std::env::var(PRIVATE_KEY_ENV) {
        Ok(key) if !key.is_empty() => KeyPair::from_secret_hex(&key),
        _ => KeyPair::from_secret_hex(EXPOSED_KEY),
    }
}

/// Boot a dev ledger, register the script wallet's key, and let the faucet
/// grant it its working balance.
pub fn bootstrap_ledger(wallet: &KeyPair, config: &Config) -> Result<Ledger> {
    let mut ledger = Ledger::new()?;
    let address = ledger.import_wallet(wallet);
    let grant = parse_ether(&config.funding.faucet_grant)?;
    ledger.fund(address, grant);
    Ok(ledger)
}

/// Print the wallet address and balance, and bail out if the balance is
/// below the configured deployment threshold.
pub fn check_deploy_balance(ledger: &Ledger, wallet: &KeyPair, config: &Config) -> Result<()> {
    let address = wallet.address();
    println!("Using address {}", address_to_hex(&address).bright_yellow());
    let balance = ledger.balance(&address);
    println!("Wallet balance {}", format_ether(balance));
    if balance < parse_ether(&config.funding.min_deploy_balance)? {
        return Err(LedgerError::InsufficientBalance);
    }
    Ok(())
}

/// Print the numbered proposal banner the scripts open with.
pub fn print_proposals(proposals: &[String]) -> Result<()> {
    if proposals.len() < 2 {
        return Err(LedgerError::NotEnoughProposals);
    }
    for (index, proposal) in proposals.iter().enumerate() {
        println!("Proposal N. {}: {}", index + 1, proposal);
    }
    Ok(())
}
