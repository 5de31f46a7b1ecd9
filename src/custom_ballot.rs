//! Token-weighted ballot
//!
//! Voting power comes from the vote token's current delegated units and is
//! spent in caller-chosen portions. Every accepted vote produces a `Voted`
//! event.

use crate::ballot::Proposal;
use crate::crypto::Address;
use crate::encoding::Bytes32;
use crate::error::{LedgerError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Event emitted on every accepted vote.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VotedEvent {
    pub voter: Address,
    pub proposal: usize,
    pub amount: u128,
    /// Proposal's running total after this vote.
    pub proposal_votes: u128,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CustomBallot {
    proposals: Vec<Proposal>,
    spent_vote_power: HashMap<Address, u128>,
}

impl CustomBallot {
    pub fn new(proposal_names: &[Bytes32]) -> Result<Self> {
        if proposal_names.len() < 2 {
            return Err(LedgerError::NotEnoughProposals);
        }
        let proposals = proposal_names
            .iter()
            .map(|name| Proposal {
                name: *name,
                vote_count: 0,
            })
            .collect();
        Ok(CustomBallot {
            proposals,
            spent_vote_power: HashMap::new(),
        })
    }

    pub fn proposal(&self, index: usize) -> Result<&Proposal> {
        self.proposals
            .get(index)
            .ok_or(LedgerError::ProposalOutOfRange(index))
    }

    pub fn proposals(&self) -> &[Proposal] {
        &self.proposals
    }

    pub fn spent_vote_power(&self, account: &Address) -> u128 {
        self.spent_vote_power.get(account).copied().unwrap_or(0)
    }

    /// Remaining power for an account whose current token votes are
    /// `token_votes`.
    pub fn voting_power(&self, account: &Address, token_votes: u128) -> u128 {
        token_votes.saturating_sub(self.spent_vote_power(account))
    }

    /// Spend `amount` of the caller's remaining power on a proposal.
    /// `token_votes` is the caller's current token voting power, read by
    /// the hosting ledger.
    pub fn vote(
        &mut self,
        caller: Address,
        proposal: usize,
        amount: u128,
        token_votes: u128,
    ) -> Result<VotedEvent> {
        if proposal >= self.proposals.len() {
            return Err(LedgerError::ProposalOutOfRange(proposal));
        }
        if self.voting_power(&caller, token_votes) < amount {
            return Err(LedgerError::InsufficientVotingPower);
        }
        *self.spent_vote_power.entry(caller).or_insert(0) += amount;
        self.proposals[proposal].vote_count += amount;
        Ok(VotedEvent {
            voter: caller,
            proposal,
            amount,
            proposal_votes: self.proposals[proposal].vote_count,
        })
    }

    /// Index of the proposal with the strictly greatest count; ties resolve
    /// to the lowest index.
    pub fn winning_proposal(&self) -> usize {
        let mut winner = 0;
        let mut winning_count = 0u128;
        for (index, proposal) in self.proposals.iter().enumerate() {
            if proposal.vote_count > winning_count {
                winning_count = proposal.vote_count;
                winner = index;
            }
        }
        winner
    }

    pub fn winner_name(&self) -> Bytes32 {
        self.proposals[self.winning_proposal()].name
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::address_from_string;
    use crate::encoding::names_to_bytes32;

    fn new_ballot() -> CustomBallot {
        let names = names_to_bytes32(&[
            "Proposal 1".to_string(),
            "Proposal 2".to_string(),
            "Proposal 3".to_string(),
        ])
        .unwrap();
        CustomBallot::new(&names).unwrap()
    }

    #[test]
    fn test_requires_two_proposals() {
        let names = names_to_bytes32(&["Only".to_string()]).unwrap();
        assert_eq!(
            CustomBallot::new(&names).unwrap_err(),
            LedgerError::NotEnoughProposals
        );
    }

    #[test]
    fn test_partial_power_spend() {
        let mut ballot = new_ballot();
        let alice = address_from_string("alice");

        let event = ballot.vote(alice, 1, 4, 10).unwrap();
        assert_eq!(event.proposal_votes, 4);
        assert_eq!(ballot.spent_vote_power(&alice), 4);
        assert_eq!(ballot.voting_power(&alice, 10), 6);

        // Second spend from the same budget
        ballot.vote(alice, 0, 6, 10).unwrap();
        assert_eq!(ballot.voting_power(&alice, 10), 0);
    }

    #[test]
    fn test_overspend_is_rejected() {
        let mut ballot = new_ballot();
        let alice = address_from_string("alice");

        ballot.vote(alice, 0, 8, 10).unwrap();
        let err = ballot.vote(alice, 0, 3, 10).unwrap_err();
        assert_eq!(err.to_string(), "Has not enough voting power");
        // Tally unchanged by the failed vote
        assert_eq!(ballot.proposal(0).unwrap().vote_count, 8);
    }

    #[test]
    fn test_vote_out_of_range() {
        let mut ballot = new_ballot();
        let alice = address_from_string("alice");
        assert_eq!(
            ballot.vote(alice, 3, 1, 10).unwrap_err(),
            LedgerError::ProposalOutOfRange(3)
        );
    }

    #[test]
    fn test_winner_before_any_votes_is_zero() {
        let ballot = new_ballot();
        assert_eq!(ballot.winning_proposal(), 0);
        assert_eq!(ballot.winner_name().to_string(), "Proposal 1");
    }

    #[test]
    fn test_event_carries_running_total() {
        let mut ballot = new_ballot();
        let alice = address_from_string("alice");
        let bob = address_from_string("bob");

        ballot.vote(alice, 2, 5, 5).unwrap();
        let event = ballot.vote(bob, 2, 5, 5).unwrap();
        assert_eq!(
            event,
            VotedEvent {
                voter: bob,
                proposal: 2,
                amount: 5,
                proposal_votes: 10,
            }
        );
    }
}
