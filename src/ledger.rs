//! In-process dev ledger
//!
//! Stands in for a JSON-RPC provider with funded dev accounts: deploys
//! contract instances at derived addresses, routes calls to them, charges a
//! flat deployment fee, stamps every state change with a transaction
//! receipt, and fans `Voted` events out to subscribed listeners. Every
//! state-changing call is signed with the caller's stored key and the
//! signature verified before any state mutates.

use crate::ballot::{Ballot, Voter};
use crate::crypto::{
    address_to_hex, contract_address, verify_signature, Address, KeyPair, SignatureBytes,
};
use crate::custom_ballot::{CustomBallot, VotedEvent};
use crate::encoding::{names_to_bytes32, WEI_PER_ETHER};
use crate::error::{LedgerError, Result};
use crate::token::VoteToken;
use chrono::{DateTime, Utc};
use crossbeam_channel::{unbounded, Receiver, Sender};
use serde::Serialize;
use sha2::{Digest, Sha256};
use std::collections::HashMap;

/// Number of prefunded dev signers.
pub const DEV_SIGNERS: usize = 10;

/// Starting balance of each dev signer, in wei.
pub const SIGNER_BALANCE: u128 = 10_000 * WEI_PER_ETHER;

/// Flat fee charged for a contract deployment, in wei.
pub const DEPLOYMENT_FEE: u128 = WEI_PER_ETHER / 1_000;

/// Receipt returned for every state-changing call.
#[derive(Debug, Clone, Serialize)]
pub struct TxReceipt {
    pub tx_hash: String,
    pub block_number: u64,
    pub from: Address,
    pub timestamp: DateTime<Utc>,
}

/// A `Voted` event together with where and when it was recorded.
#[derive(Debug, Clone, Serialize)]
pub struct VotedLog {
    pub contract: Address,
    pub block_number: u64,
    pub tx_hash: String,
    pub event: VotedEvent,
}

/// Fan-out of `Voted` events to listeners, optionally filtered by contract.
#[derive(Debug, Default)]
struct EventBus {
    subscribers: Vec<(Option<Address>, Sender<VotedLog>)>,
}

impl EventBus {
    fn subscribe(&mut self, filter: Option<Address>) -> Receiver<VotedLog> {
        let (tx, rx) = unbounded();
        self.subscribers.push((filter, tx));
        rx
    }

    fn publish(&mut self, log: VotedLog) {
        // Drop subscribers whose receiving end is gone
        self.subscribers.retain(|(filter, tx)| match filter {
            Some(addr) if *addr != log.contract => true,
            _ => tx.send(log.clone()).is_ok(),
        });
    }

    fn len(&self) -> usize {
        self.subscribers.len()
    }
}

#[derive(Debug, Clone)]
enum Contract {
    Ballot(Ballot),
    Token(VoteToken),
    Custom { ballot: CustomBallot, token: Address },
}

impl Contract {
    fn kind(&self) -> &'static str {
        match self {
            Contract::Ballot(_) => "Ballot",
            Contract::Token(_) => "VoteToken",
            Contract::Custom { .. } => "CustomBallot",
        }
    }
}

pub struct Ledger {
    signers: Vec<Address>,
    wallets: HashMap<Address, KeyPair>,
    balances: HashMap<Address, u128>,
    nonces: HashMap<Address, u64>,
    contracts: HashMap<Address, Contract>,
    block_height: u64,
    bus: EventBus,
}

impl Ledger {
    /// Fresh ledger with `DEV_SIGNERS` prefunded accounts.
    pub fn new() -> Result<Self> {
        let mut signers = Vec::with_capacity(DEV_SIGNERS);
        let mut wallets = HashMap::new();
        let mut balances = HashMap::new();
        for _ in 0..DEV_SIGNERS {
            let keypair = KeyPair::generate()?;
            let address = keypair.address();
            balances.insert(address, SIGNER_BALANCE);
            signers.push(address);
            wallets.insert(address, keypair);
        }
        Ok(Ledger {
            signers,
            wallets,
            balances,
            nonces: HashMap::new(),
            contracts: HashMap::new(),
            block_height: 0,
            bus: EventBus::default(),
        })
    }

    /// Address of the n-th prefunded signer.
    pub fn signer(&self, index: usize) -> Result<Address> {
        self.signers
            .get(index)
            .copied()
            .ok_or(LedgerError::UnknownSigner(index))
    }

    pub fn signer_count(&self) -> usize {
        self.signers.len()
    }

    /// Generate a fresh, unfunded wallet and register its key so the wallet
    /// can sign calls.
    pub fn create_wallet(&mut self) -> Result<Address> {
        let keypair = KeyPair::generate()?;
        let address = keypair.address();
        self.wallets.insert(address, keypair);
        Ok(address)
    }

    /// Register an externally held keypair, returning its address.
    pub fn import_wallet(&mut self, keypair: &KeyPair) -> Address {
        let address = keypair.address();
        self.wallets.insert(address, keypair.clone());
        address
    }

    pub fn balance(&self, account: &Address) -> u128 {
        self.balances.get(account).copied().unwrap_or(0)
    }

    /// Credit an account, dev-faucet style.
    pub fn fund(&mut self, account: Address, wei: u128) {
        *self.balances.entry(account).or_insert(0) += wei;
    }

    pub fn block_number(&self) -> u64 {
        self.block_height
    }

    /// Listen for `Voted` events, optionally only from one contract.
    pub fn subscribe_voted(&mut self, filter: Option<Address>) -> Receiver<VotedLog> {
        self.bus.subscribe(filter)
    }

    pub fn listener_count(&self) -> usize {
        self.bus.len()
    }

    // ------------------------------------------------------------------
    // Deployment
    // ------------------------------------------------------------------

    fn charge_deployment_fee(&mut self, deployer: Address) -> Result<()> {
        let balance = self.balance(&deployer);
        if balance < DEPLOYMENT_FEE {
            return Err(LedgerError::InsufficientBalance);
        }
        self.balances.insert(deployer, balance - DEPLOYMENT_FEE);
        Ok(())
    }

    fn install(&mut self, deployer: Address, contract: Contract) -> Result<(Address, TxReceipt)> {
        let description = format!("deploy {}", contract.kind());
        let signature = self.authorize(&deployer, &description)?;
        self.charge_deployment_fee(deployer)?;
        let nonce = self.nonces.get(&deployer).copied().unwrap_or(0);
        let address = contract_address(&deployer, nonce);
        self.contracts.insert(address, contract);
        let receipt = self.transact(deployer, &description, &signature);
        Ok((address, receipt))
    }

    /// Deploy a chairperson ballot; the deployer becomes the chairperson.
    pub fn deploy_ballot(
        &mut self,
        deployer: Address,
        proposal_names: &[String],
    ) -> Result<(Address, TxReceipt)> {
        let names = names_to_bytes32(proposal_names)?;
        let ballot = Ballot::new(deployer, &names)?;
        self.install(deployer, Contract::Ballot(ballot))
    }

    /// Deploy a fresh vote token.
    pub fn deploy_token(
        &mut self,
        deployer: Address,
        name: &str,
        symbol: &str,
    ) -> Result<(Address, TxReceipt)> {
        self.install(deployer, Contract::Token(VoteToken::new(name, symbol)))
    }

    /// Deploy a token-weighted ballot bound to an existing token.
    pub fn deploy_custom_ballot(
        &mut self,
        deployer: Address,
        proposal_names: &[String],
        token: Address,
    ) -> Result<(Address, TxReceipt)> {
        // The token must exist before the ballot can reference it
        self.token(&token)?;
        let names = names_to_bytes32(proposal_names)?;
        let ballot = CustomBallot::new(&names)?;
        self.install(deployer, Contract::Custom { ballot, token })
    }

    // ------------------------------------------------------------------
    // Chairperson ballot calls
    // ------------------------------------------------------------------

    pub fn ballot(&self, address: &Address) -> Result<&Ballot> {
        match self.contract(address)? {
            Contract::Ballot(ballot) => Ok(ballot),
            _ => Err(LedgerError::ContractTypeMismatch(
                address_to_hex(address),
                "Ballot",
            )),
        }
    }

    pub fn give_right_to_vote(
        &mut self,
        caller: Address,
        ballot: Address,
        voter: Address,
    ) -> Result<TxReceipt> {
        let signature = self.authorize(&caller, "giveRightToVote")?;
        self.ballot_mut(&ballot)?.give_right_to_vote(caller, voter)?;
        Ok(self.transact(caller, "giveRightToVote", &signature))
    }

    pub fn vote(&mut self, caller: Address, ballot: Address, proposal: usize) -> Result<TxReceipt> {
        let signature = self.authorize(&caller, "vote")?;
        self.ballot_mut(&ballot)?.vote(caller, proposal)?;
        Ok(self.transact(caller, "vote", &signature))
    }

    pub fn delegate(&mut self, caller: Address, ballot: Address, to: Address) -> Result<TxReceipt> {
        let signature = self.authorize(&caller, "delegate")?;
        self.ballot_mut(&ballot)?.delegate(caller, to)?;
        Ok(self.transact(caller, "delegate", &signature))
    }

    /// Voting record read, defaulting for unknown addresses.
    pub fn voter(&self, ballot: &Address, account: &Address) -> Result<Voter> {
        Ok(self.ballot(ballot)?.voter(account))
    }

    // ------------------------------------------------------------------
    // Token calls
    // ------------------------------------------------------------------

    pub fn token(&self, address: &Address) -> Result<&VoteToken> {
        match self.contract(address)? {
            Contract::Token(token) => Ok(token),
            _ => Err(LedgerError::ContractTypeMismatch(
                address_to_hex(address),
                "VoteToken",
            )),
        }
    }

    pub fn mint(
        &mut self,
        caller: Address,
        token: Address,
        to: Address,
        amount: u128,
    ) -> Result<TxReceipt> {
        let signature = self.authorize(&caller, "mint")?;
        let block = self.block_height + 1;
        self.token_mut(&token)?.mint(to, amount, block);
        Ok(self.transact(caller, "mint", &signature))
    }

    pub fn delegate_votes(
        &mut self,
        caller: Address,
        token: Address,
        to: Address,
    ) -> Result<TxReceipt> {
        let signature = self.authorize(&caller, "delegate")?;
        let block = self.block_height + 1;
        self.token_mut(&token)?.delegate(caller, to, block);
        Ok(self.transact(caller, "delegate", &signature))
    }

    pub fn transfer(
        &mut self,
        caller: Address,
        token: Address,
        to: Address,
        amount: u128,
    ) -> Result<TxReceipt> {
        let signature = self.authorize(&caller, "transfer")?;
        let block = self.block_height + 1;
        self.token_mut(&token)?.transfer(caller, to, amount, block)?;
        Ok(self.transact(caller, "transfer", &signature))
    }

    pub fn get_votes(&self, token: &Address, account: &Address) -> Result<u128> {
        Ok(self.token(token)?.get_votes(account))
    }

    // ------------------------------------------------------------------
    // Token-weighted ballot calls
    // ------------------------------------------------------------------

    pub fn custom_ballot(&self, address: &Address) -> Result<&CustomBallot> {
        match self.contract(address)? {
            Contract::Custom { ballot, .. } => Ok(ballot),
            _ => Err(LedgerError::ContractTypeMismatch(
                address_to_hex(address),
                "CustomBallot",
            )),
        }
    }

    /// Remaining voting power of `account` on a token-weighted ballot.
    pub fn voting_power(&self, ballot: &Address, account: &Address) -> Result<u128> {
        let token = self.custom_ballot_token(ballot)?;
        let votes = self.token(&token)?.get_votes(account);
        Ok(self.custom_ballot(ballot)?.voting_power(account, votes))
    }

    /// Spend `amount` voting power on a proposal of a token-weighted ballot,
    /// publishing the resulting `Voted` event.
    pub fn vote_with_power(
        &mut self,
        caller: Address,
        ballot: Address,
        proposal: usize,
        amount: u128,
    ) -> Result<TxReceipt> {
        let signature = self.authorize(&caller, "vote")?;
        let token = self.custom_ballot_token(&ballot)?;
        let votes = self.token(&token)?.get_votes(&caller);

        let event = match self.contracts.get_mut(&ballot) {
            Some(Contract::Custom { ballot: cb, .. }) => {
                cb.vote(caller, proposal, amount, votes)?
            }
            _ => {
                return Err(LedgerError::ContractTypeMismatch(
                    address_to_hex(&ballot),
                    "CustomBallot",
                ))
            }
        };

        let receipt = self.transact(caller, "vote", &signature);
        self.bus.publish(VotedLog {
            contract: ballot,
            block_number: receipt.block_number,
            tx_hash: receipt.tx_hash.clone(),
            event,
        });
        Ok(receipt)
    }

    // ------------------------------------------------------------------
    // Internals
    // ------------------------------------------------------------------

    fn contract(&self, address: &Address) -> Result<&Contract> {
        self.contracts
            .get(address)
            .ok_or_else(|| LedgerError::UnknownContract(address_to_hex(address)))
    }

    fn ballot_mut(&mut self, address: &Address) -> Result<&mut Ballot> {
        match self.contracts.get_mut(address) {
            Some(Contract::Ballot(ballot)) => Ok(ballot),
            Some(_) => Err(LedgerError::ContractTypeMismatch(
                address_to_hex(address),
                "Ballot",
            )),
            None => Err(LedgerError::UnknownContract(address_to_hex(address))),
        }
    }

    fn token_mut(&mut self, address: &Address) -> Result<&mut VoteToken> {
        match self.contracts.get_mut(address) {
            Some(Contract::Token(token)) => Ok(token),
            Some(_) => Err(LedgerError::ContractTypeMismatch(
                address_to_hex(address),
                "VoteToken",
            )),
            None => Err(LedgerError::UnknownContract(address_to_hex(address))),
        }
    }

    /// Address of the vote token backing a token-weighted ballot.
    pub fn custom_ballot_token(&self, address: &Address) -> Result<Address> {
        match self.contract(address)? {
            Contract::Custom { token, .. } => Ok(*token),
            _ => Err(LedgerError::ContractTypeMismatch(
                address_to_hex(address),
                "CustomBallot",
            )),
        }
    }

    /// Sign the call payload with the caller's stored key and verify the
    /// signature, as a provider would before accepting a transaction. Fails
    /// for addresses the ledger holds no key for.
    fn authorize(&self, caller: &Address, description: &str) -> Result<SignatureBytes> {
        let keypair = self
            .wallets
            .get(caller)
            .ok_or_else(|| LedgerError::UnknownWallet(address_to_hex(caller)))?;
        let signature = keypair.sign(description.as_bytes())?;
        verify_signature(
            &keypair.public_key_bytes(),
            description.as_bytes(),
            &signature,
        )?;
        Ok(signature)
    }

    /// Record a successful state change: bump the caller nonce, advance one
    /// block, and produce a receipt hashing the signed call.
    fn transact(&mut self, caller: Address, description: &str, signature: &SignatureBytes) -> TxReceipt {
        let nonce = self.nonces.entry(caller).or_insert(0);
        *nonce += 1;
        let nonce = *nonce;
        self.block_height += 1;

        let mut hasher = Sha256::new();
        hasher.update(caller);
        hasher.update(nonce.to_be_bytes());
        hasher.update(description.as_bytes());
        hasher.update(signature);
        let tx_hash = format!("0x{}", hex::encode(hasher.finalize()));

        TxReceipt {
            tx_hash,
            block_number: self.block_height,
            from: caller,
            timestamp: Utc::now(),
        }
    }
}
