//! VoteLedger - a chairperson ballot and token-weighted voting ledger
//!
//! # Architecture
//!
//! The crate is organized into logical modules:
//!
//! ## Voting Contracts
//! - [`ballot`] - Chairperson ballot with delegation
//! - [`token`] - Mintable vote token with checkpointed delegation
//! - [`custom_ballot`] - Token-weighted ballot emitting `Voted` events
//!
//! ## Ledger
//! - [`ledger`] - In-process dev ledger: signers, deployment, receipts, events
//!
//! ## Cryptography
//! - [`crypto`] - Keys, addresses and signatures (secp256k1)
//! - [`encoding`] - Fixed-length name strings and ether amounts
//!
//! ## Integration
//! - [`api`] - REST API server
//!
//! ## Configuration & Utilities
//! - [`config`] - Configuration management
//! - [`error`] - Error types
//! - [`cli`] - Script helpers

#![forbid(unsafe_code)]

// ============================================================================
// Voting Contracts
// ============================================================================
pub mod ballot;
pub mod custom_ballot;
pub mod token;

// ============================================================================
// Ledger
// ============================================================================
pub mod ledger;

// ============================================================================
// Cryptography & Encoding
// ============================================================================
pub mod crypto;
pub mod encoding;

// ============================================================================
// Integration
// ============================================================================
#[cfg(feature = "api")]
pub mod api;

// ============================================================================
// Configuration & Utilities
// ============================================================================
pub mod cli;
pub mod config;
pub mod error;
