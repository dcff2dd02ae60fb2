//! Seams to the outside world. The pipeline only sees these traits; the
//! concrete Etherscan / Alchemy / JSON-RPC clients live in `epochval-utils`.

use std::future::Future;

use alloy::primitives::{Address, U256};
use epochval_common::Height;
use epochval_utils::{alchemy::Alchemy, alloy::RpcBalances, config::Config, etherscan::Etherscan};

/// Maps a unix timestamp to the last block at or before it.
pub trait TimestampResolver: Send + Sync {
    fn resolve(
        &self,
        epoch_seconds: u64,
    ) -> impl Future<Output = epochval_utils::Result<Height>> + Send;
}

/// Lists the owners of a fixed collection as of a block.
pub trait OwnershipSnapshotSource: Send + Sync {
    fn snapshot(
        &self,
        height: Height,
    ) -> impl Future<Output = epochval_utils::Result<Vec<String>>> + Send;
}

/// Native balance of one address as of a block, in wei.
pub trait BalanceOracle: Send + Sync {
    fn balance_at(
        &self,
        address: &str,
        height: Height,
    ) -> impl Future<Output = epochval_utils::Result<U256>> + Send;
}

impl TimestampResolver for Etherscan {
    async fn resolve(&self, epoch_seconds: u64) -> epochval_utils::Result<Height> {
        self.block_number_by_timestamp(epoch_seconds).await
    }
}

/// Owners of one NFT contract, served by Alchemy's NFT API.
pub struct CollectionOwners {
    alchemy: Alchemy,
    collection: Address,
}

impl CollectionOwners {
    pub fn new(config: &Config) -> epochval_utils::Result<Self> {
        Ok(Self {
            alchemy: Alchemy::new(config)?,
            collection: config.collection,
        })
    }
}

impl OwnershipSnapshotSource for CollectionOwners {
    async fn snapshot(&self, height: Height) -> epochval_utils::Result<Vec<String>> {
        self.alchemy
            .get_owners_for_collection(self.collection, height)
            .await
    }
}

impl BalanceOracle for RpcBalances {
    async fn balance_at(&self, address: &str, height: Height) -> epochval_utils::Result<U256> {
        RpcBalances::balance_at(self, address, height).await
    }
}
