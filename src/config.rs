//! Configuration management for VoteLedger

use crate::error::LedgerError;
use serde::Deserialize;
use std::fs;

// This key is already public on Herong's Tutorial Examples - v1.03, by Dr. Herong Yang
// Do never expose your keys like this
pub const EXPOSED_KEY: &str = "8da4ef21b864d2cc526dbdb2a120bd2874c36c9d0a1fb7f8c63d7f7a8b41de8f";

#[derive(Debug, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub network: NetworkConfig,
    #[serde(default)]
    pub ballot: BallotConfig,
    #[serde(default)]
    pub funding: FundingConfig,
}

#[derive(Debug, Deserialize)]
pub struct NetworkConfig {
    #[serde(default = "default_api_port")]
    pub api_port: u16,
    #[serde(default = "default_bind_address")]
    pub bind_address: String,
}

#[derive(Debug, Deserialize)]
pub struct BallotConfig {
    #[serde(default = "default_proposals")]
    pub proposals: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct FundingConfig {
    /// Minimum deployer balance, in ether, before a script will deploy.
    #[serde(default = "default_min_deploy_balance")]
    pub min_deploy_balance: String,
    /// Ether granted to the script wallet by the dev faucet.
    #[serde(default = "default_faucet_grant")]
    pub faucet_grant: String,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        NetworkConfig {
            api_port: default_api_port(),
            bind_address: default_bind_address(),
        }
    }
}

impl Default for BallotConfig {
    fn default() -> Self {
        BallotConfig {
            proposals: default_proposals(),
        }
    }
}

impl Default for FundingConfig {
    fn default() -> Self {
        FundingConfig {
            min_deploy_balance: default_min_deploy_balance(),
            faucet_grant: default_faucet_grant(),
        }
    }
}

fn default_api_port() -> u16 {
    3000
}

fn default_bind_address() -> String {
    "127.0.0.1".to_string()
}

fn default_proposals() -> Vec<String> {
    vec![
        "Proposal 1".to_string(),
        "Proposal 2".to_string(),
        "Proposal 3".to_string(),
    ]
}

fn default_min_deploy_balance() -> String {
    "0.01".to_string()
}

fn default_faucet_grant() -> String {
    "1".to_string()
}

/// Load `config.toml`, falling back to defaults when it is absent.
pub fn load_config() -> Result<Config, LedgerError> {
    let config_str = fs::read_to_string("config.toml").unwrap_or_default();
    let config: Config = if config_str.is_empty() {
        Config {
            network: NetworkConfig::default(),
            ballot: BallotConfig::default(),
            funding: FundingConfig::default(),
        }
    } else {
        toml::from_str(&config_str)
            .map_err(|e| LedgerError::ConfigError(format!("Failed to parse config.toml: {}", e)))?
    };

    // Validate critical values
    if config.ballot.proposals.len() < 2 {
        return Err(LedgerError::NotEnoughProposals);
    }
    crate::encoding::parse_ether(&config.funding.min_deploy_balance)?;
    crate::encoding::parse_ether(&config.funding.faucet_grant)?;

    Ok(config)
}
