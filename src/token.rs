//! Mintable vote token with checkpointed delegation
//!
//! Balances and voting units are tracked separately: a holder's balance
//! only counts as voting power once they delegate it (self-delegation
//! activates it). Every movement of voting units writes a per-address
//! checkpoint so past voting power can be read at a given block.

use crate::crypto::Address;
use crate::error::{LedgerError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Checkpoint {
    pub from_block: u64,
    pub votes: u128,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VoteToken {
    name: String,
    symbol: String,
    total_supply: u128,
    balances: HashMap<Address, u128>,
    delegates: HashMap<Address, Address>,
    checkpoints: HashMap<Address, Vec<Checkpoint>>,
}

impl VoteToken {
    pub fn new(name: &str, symbol: &str) -> Self {
        VoteToken {
            name: name.to_string(),
            symbol: symbol.to_string(),
            total_supply: 0,
            balances: HashMap::new(),
            delegates: HashMap::new(),
            checkpoints: HashMap::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn total_supply(&self) -> u128 {
        self.total_supply
    }

    pub fn balance_of(&self, account: &Address) -> u128 {
        self.balances.get(account).copied().unwrap_or(0)
    }

    /// The account's chosen delegate, if any.
    pub fn delegates(&self, account: &Address) -> Option<Address> {
        self.delegates.get(account).copied()
    }

    /// Current voting units held by `account`.
    pub fn get_votes(&self, account: &Address) -> u128 {
        self.checkpoints
            .get(account)
            .and_then(|cps| cps.last())
            .map(|cp| cp.votes)
            .unwrap_or(0)
    }

    /// Voting units held by `account` at the end of `block`.
    pub fn get_past_votes(&self, account: &Address, block: u64) -> u128 {
        let Some(cps) = self.checkpoints.get(account) else {
            return 0;
        };
        // Last checkpoint written at or before `block`
        match cps.partition_point(|cp| cp.from_block <= block) {
            0 => 0,
            n => cps[n - 1].votes,
        }
    }

    /// Mint new tokens to `to` at `block`. If the recipient has a delegate,
    /// the minted units immediately count as that delegate's voting power.
    pub fn mint(&mut self, to: Address, amount: u128, block: u64) {
        *self.balances.entry(to).or_insert(0) += amount;
        self.total_supply += amount;
        if let Some(delegate) = self.delegates(&to) {
            self.move_voting_power(None, Some(delegate), amount, block);
        }
    }

    /// Point the caller's voting units at `to`, moving their whole balance
    /// from the previous delegate.
    pub fn delegate(&mut self, caller: Address, to: Address, block: u64) {
        let previous = self.delegates.insert(caller, to);
        let balance = self.balance_of(&caller);
        self.move_voting_power(previous, Some(to), balance, block);
    }

    /// Transfer tokens between holders, shifting voting units between their
    /// delegates.
    pub fn transfer(&mut self, from: Address, to: Address, amount: u128, block: u64) -> Result<()> {
        let from_balance = self.balance_of(&from);
        if from_balance < amount {
            return Err(LedgerError::InsufficientTokenBalance {
                have: from_balance,
                need: amount,
            });
        }
        self.balances.insert(from, from_balance - amount);
        *self.balances.entry(to).or_insert(0) += amount;
        let src = self.delegates(&from);
        let dst = self.delegates(&to);
        self.move_voting_power(src, dst, amount, block);
        Ok(())
    }

    fn move_voting_power(
        &mut self,
        from: Option<Address>,
        to: Option<Address>,
        amount: u128,
        block: u64,
    ) {
        if amount == 0 || from == to {
            return;
        }
        if let Some(src) = from {
            let votes = self.get_votes(&src).saturating_sub(amount);
            self.write_checkpoint(src, votes, block);
        }
        if let Some(dst) = to {
            let votes = self.get_votes(&dst) + amount;
            self.write_checkpoint(dst, votes, block);
        }
    }

    fn write_checkpoint(&mut self, account: Address, votes: u128, block: u64) {
        let cps = self.checkpoints.entry(account).or_default();
        match cps.last_mut() {
            // Several movements in one block collapse into one checkpoint
            Some(last) if last.from_block == block => last.votes = votes,
            _ => cps.push(Checkpoint {
                from_block: block,
                votes,
            }),
        }
    }
}
