use std::time::Duration;

use epochval_common::{BalanceRecord, Height};
use futures::future::join_all;

use crate::{collaborators::BalanceOracle, fetch::fetch_balance, AggregatorError};

/// Runs one group of lookups concurrently and returns only once every lookup
/// of the group has settled. Records come back in input order.
pub struct BatchExecutor<'a, O> {
    oracle: &'a O,
    height: Height,
    max_batch_size: usize,
    fetch_timeout: Duration,
}

impl<'a, O: BalanceOracle> BatchExecutor<'a, O> {
    pub fn new(
        oracle: &'a O,
        height: Height,
        max_batch_size: usize,
        fetch_timeout: Duration,
    ) -> Self {
        Self {
            oracle,
            height,
            max_batch_size,
            fetch_timeout,
        }
    }

    pub async fn run_batch(&self, addresses: &[String]) -> crate::Result<Vec<BalanceRecord>> {
        if addresses.len() > self.max_batch_size {
            return Err(AggregatorError::BatchTooLarge {
                len: addresses.len(),
                max: self.max_batch_size,
            });
        }

        let lookups = addresses
            .iter()
            .map(|address| fetch_balance(self.oracle, address, self.height, self.fetch_timeout));

        Ok(join_all(lookups).await)
    }
}
