//! Error types for VoteLedger
//!
//! Ballot and token failures carry the exact message strings the contract
//! surface reports, since scripts and tests assert on them.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerError {
    #[error("Only chairperson can give right to vote.")]
    NotChairperson,
    #[error("The voter already voted.")]
    VoterAlreadyVoted,
    #[error("Voter already has the right to vote")]
    AlreadyHasVotingRight,
    #[error("Has no right to vote")]
    NoRightToVote,
    #[error("Already voted.")]
    AlreadyVoted,
    #[error("You already voted.")]
    DelegatorAlreadyVoted,
    #[error("Self-delegation is disallowed.")]
    SelfDelegation,
    #[error("Found loop in delegation.")]
    DelegationLoop,
    #[error("Has not enough voting power")]
    InsufficientVotingPower,
    #[error("Not enough ether")]
    InsufficientBalance,
    #[error("Not enough proposals provided")]
    NotEnoughProposals,
    #[error("Proposal {0} out of range")]
    ProposalOutOfRange(usize),
    #[error("Insufficient token balance: have {have}, need {need}")]
    InsufficientTokenBalance { have: u128, need: u128 },
    #[error("No contract deployed at {0}")]
    UnknownContract(String),
    #[error("Contract at {0} is not a {1}")]
    ContractTypeMismatch(String, &'static str),
    #[error("No signer at index {0}")]
    UnknownSigner(usize),
    #[error("No wallet key for {0}")]
    UnknownWallet(String),
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),
    #[error("Invalid bytes32 string: {0}")]
    InvalidBytes32(String),
    #[error("Cryptographic error: {0}")]
    CryptoError(String),
    #[error("Config error: {0}")]
    ConfigError(String),
}

/// Convenience alias used across the crate
pub type Result<T> = std::result::Result<T, LedgerError>;
