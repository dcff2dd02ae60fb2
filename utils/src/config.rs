use std::{
    fmt::{Debug, Formatter},
    time::Duration,
};

use alloy::primitives::{address, Address};
use serde::{Deserialize, Serialize};

use crate::disk_storage::DiskStorageInterface;

/// Bored Ape Yacht Club.
pub const DEFAULT_COLLECTION: Address = address!("0xBC4CA0EdA7647A8aB7C2061c2E118A18a936f13D");
pub const DEFAULT_BATCH_SIZE: usize = 200;
pub const DEFAULT_INTER_BATCH_DELAY_MS: u64 = 1000;
pub const DEFAULT_FETCH_TIMEOUT_MS: u64 = 30_000;
pub const DEFAULT_ETHERSCAN_API_URL: &str = "https://api.etherscan.io/v2/api";
pub const DEFAULT_ALCHEMY_NETWORK: &str = "eth-mainnet";

/// Run configuration. Loaded once at start from `~/.epochval/config.toml`,
/// overlaid with CLI flags and environment, then handed by reference to every
/// client constructor.
#[derive(Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct Config {
    pub alchemy_api_key: Option<String>,
    pub etherscan_api_key: Option<String>,
    /// NFT contract whose owners are aggregated.
    pub collection: Address,
    /// Alchemy network slug, e.g. `eth-mainnet`.
    pub alchemy_network: String,
    /// Chain id passed to the Etherscan v2 API.
    pub chain_id: u64,
    pub etherscan_api_url: String,
    /// JSON-RPC endpoint for balance lookups. Defaults to Alchemy's endpoint
    /// for `alchemy_network`.
    pub rpc_url: Option<String>,
    pub batch_size: usize,
    pub inter_batch_delay_ms: u64,
    pub fetch_timeout_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            alchemy_api_key: None,
            etherscan_api_key: None,
            collection: DEFAULT_COLLECTION,
            alchemy_network: DEFAULT_ALCHEMY_NETWORK.to_string(),
            chain_id: 1,
            etherscan_api_url: DEFAULT_ETHERSCAN_API_URL.to_string(),
            rpc_url: None,
            batch_size: DEFAULT_BATCH_SIZE,
            inter_batch_delay_ms: DEFAULT_INTER_BATCH_DELAY_MS,
            fetch_timeout_ms: DEFAULT_FETCH_TIMEOUT_MS,
        }
    }
}

impl Debug for Config {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        fn mask(key: &Option<String>) -> &'static str {
            if key.is_some() {
                "Some(***)"
            } else {
                "None"
            }
        }

        f.debug_struct("Config")
            .field("alchemy_api_key", &mask(&self.alchemy_api_key))
            .field("etherscan_api_key", &mask(&self.etherscan_api_key))
            .field("collection", &self.collection)
            .field("alchemy_network", &self.alchemy_network)
            .field("chain_id", &self.chain_id)
            .field("etherscan_api_url", &self.etherscan_api_url)
            .field("rpc_url", &self.rpc_url.as_ref().map(|_| "***"))
            .field("batch_size", &self.batch_size)
            .field("inter_batch_delay_ms", &self.inter_batch_delay_ms)
            .field("fetch_timeout_ms", &self.fetch_timeout_ms)
            .finish()
    }
}

impl DiskStorageInterface for Config {
    const FILE_NAME: &'static str = "config";
}

impl Config {
    pub fn alchemy_api_key(&self) -> crate::Result<&str> {
        self.alchemy_api_key
            .as_deref()
            .filter(|key| !key.is_empty())
            .ok_or(crate::Error::AlchemyApiKeyNotSet)
    }

    pub fn etherscan_api_key(&self) -> crate::Result<&str> {
        self.etherscan_api_key
            .as_deref()
            .filter(|key| !key.is_empty())
            .ok_or(crate::Error::EtherscanApiKeyNotSet)
    }

    /// Time bound for a single outbound request: a balance lookup, the block
    /// resolution call, or one owner page.
    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_millis(self.fetch_timeout_ms)
    }

    pub fn get_rpc(&self) -> crate::Result<String> {
        if let Some(rpc_url) = &self.rpc_url {
            Ok(rpc_url.clone())
        } else {
            Ok(format!(
                "https://{}.g.alchemy.com/v2/{}",
                self.alchemy_network,
                self.alchemy_api_key()?
            ))
        }
    }

    pub fn set_api_keys(alchemy: Option<String>, etherscan: Option<String>) -> crate::Result<()> {
        let mut config = Config::load()?;
        if alchemy.is_some() {
            config.alchemy_api_key = alchemy;
        }
        if etherscan.is_some() {
            config.etherscan_api_key = etherscan;
        }
        config.save()
    }
}
