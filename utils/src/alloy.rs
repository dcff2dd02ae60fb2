use alloy::{
    eips::BlockId,
    primitives::{Address, U256},
    providers::{DynProvider, Provider, ProviderBuilder},
};

use crate::config::Config;

pub trait StringExt {
    fn parse_as_address(&self) -> crate::Result<Address>;

    fn to_alloy_provider(&self) -> crate::Result<DynProvider>;
}

impl StringExt for str {
    fn parse_as_address(&self) -> crate::Result<Address> {
        self.trim()
            .parse::<Address>()
            .map_err(|_| crate::Error::InvalidAddress(self.to_string()))
    }

    fn to_alloy_provider(&self) -> crate::Result<DynProvider> {
        self.parse()
            .map_err(|e| crate::Error::UrlParsingFailed(self.to_string(), e))
            .map(|rpc_url| ProviderBuilder::new().connect_http(rpc_url).erased())
    }
}

impl StringExt for String {
    fn parse_as_address(&self) -> crate::Result<Address> {
        self.as_str().parse_as_address()
    }

    fn to_alloy_provider(&self) -> crate::Result<DynProvider> {
        self.as_str().to_alloy_provider()
    }
}

/// Historical native balances over JSON-RPC (`eth_getBalance` at a block).
#[derive(Clone)]
pub struct RpcBalances {
    provider: DynProvider,
}

impl RpcBalances {
    pub fn new(config: &Config) -> crate::Result<Self> {
        Ok(Self {
            provider: config.get_rpc()?.to_alloy_provider()?,
        })
    }

    pub async fn balance_at(&self, address: &str, block: u64) -> crate::Result<U256> {
        let address = address.parse_as_address()?;
        self.provider
            .get_balance(address)
            .block_id(BlockId::number(block))
            .await
            .map_err(|e| crate::Error::Rpc(e.to_string()))
    }
}
