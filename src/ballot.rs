//! Chairperson ballot state machine
//!
//! Proposals are fixed at construction. The chairperson hands out voting
//! rights, voters either vote directly or delegate their weight forward,
//! and the winner is the proposal with the strictly greatest count.

use crate::crypto::Address;
use crate::encoding::Bytes32;
use crate::error::{LedgerError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Proposal {
    pub name: Bytes32,
    pub vote_count: u128,
}

/// Per-address voting record. Reading an address that never interacted
/// yields the default record, the same as a contract mapping would.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Voter {
    pub weight: u128,
    pub voted: bool,
    pub delegate: Option<Address>,
    pub vote: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ballot {
    chairperson: Address,
    voters: HashMap<Address, Voter>,
    proposals: Vec<Proposal>,
}

impl Ballot {
    /// Create a ballot over the given proposal names. The chairperson starts
    /// with voting weight 1; all counts start at zero.
    pub fn new(chairperson: Address, proposal_names: &[Bytes32]) -> Result<Self> {
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

        let mut voters = HashMap::new();
        voters.insert(
            chairperson,
            Voter {
                weight: 1,
                ..Voter::default()
            },
        );

        Ok(Ballot {
            chairperson,
            voters,
            proposals,
        })
    }

    pub fn chairperson(&self) -> Address {
        self.chairperson
    }

    pub fn proposal(&self, index: usize) -> Result<&Proposal> {
        self.proposals
            .get(index)
            .ok_or(LedgerError::ProposalOutOfRange(index))
    }

    pub fn proposals(&self) -> &[Proposal] {
        &self.proposals
    }

    /// Voting record for an address; unknown addresses read as the default.
    pub fn voter(&self, address: &Address) -> Voter {
        self.voters.get(address).cloned().unwrap_or_default()
    }

    /// Grant `voter` the right to vote. Only the chairperson may call this,
    /// and only for an address that has neither voted nor been granted
    /// weight before.
    pub fn give_right_to_vote(&mut self, caller: Address, voter: Address) -> Result<()> {
        if caller != self.chairperson {
            return Err(LedgerError::NotChairperson);
        }
        let record = self.voters.entry(voter).or_default();
        if record.voted {
            return Err(LedgerError::VoterAlreadyVoted);
        }
        if record.weight != 0 {
            return Err(LedgerError::AlreadyHasVotingRight);
        }
        record.weight = 1;
        Ok(())
    }

    /// Cast the caller's full weight on a proposal.
    pub fn vote(&mut self, caller: Address, proposal: usize) -> Result<()> {
        let record = self.voters.entry(caller).or_default();
        if record.weight == 0 {
            return Err(LedgerError::NoRightToVote);
        }
        if record.voted {
            return Err(LedgerError::AlreadyVoted);
        }
        if proposal >= self.proposals.len() {
            return Err(LedgerError::ProposalOutOfRange(proposal));
        }
        record.voted = true;
        record.vote = proposal;
        let weight = record.weight;
        self.proposals[proposal].vote_count += weight;
        Ok(())
    }

    /// Delegate the caller's weight to `to`, following `to`'s own delegation
    /// chain to its end first. If the final delegate already voted the weight
    /// goes straight onto their proposal, otherwise it adds to their weight.
    pub fn delegate(&mut self, caller: Address, to: Address) -> Result<()> {
        if self.voter(&caller).voted {
            return Err(LedgerError::DelegatorAlreadyVoted);
        }
        if to == caller {
            return Err(LedgerError::SelfDelegation);
        }

        // Walk the chain. Delegation edges are written exactly once (a voter
        // is marked voted when delegating), so every chain ends at an
        // undelegated voter; the only possible cycle runs through the caller.
        let mut target = to;
        while let Some(next) = self.voters.get(&target).and_then(|v| v.delegate) {
            target = next;
            if target == caller {
                return Err(LedgerError::DelegationLoop);
            }
        }

        let sender = self.voters.entry(caller).or_default();
        sender.voted = true;
        sender.delegate = Some(target);
        let weight = sender.weight;

        let delegate = self.voters.entry(target).or_default();
        if delegate.voted {
            self.proposals[delegate.vote].vote_count += weight;
        } else {
            delegate.weight += weight;
        }
        Ok(())
    }

    /// Index of the proposal with the strictly greatest count. Ties resolve
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

    /// Name of the winning proposal.
    pub fn winner_name(&self) -> Bytes32 {
        self.proposals[self.winning_proposal()].name
    }
}
