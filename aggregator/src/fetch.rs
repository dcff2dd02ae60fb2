use std::time::Duration;

use epochval_common::{BalanceRecord, Height, Wei};

use crate::collaborators::BalanceOracle;

/// Looks up one address's balance at `height`. Never fails: oracle errors and
/// timeouts come back as a failed record with a zero amount.
pub async fn fetch_balance<O: BalanceOracle>(
    oracle: &O,
    address: &str,
    height: Height,
    timeout: Duration,
) -> BalanceRecord {
    match tokio::time::timeout(timeout, oracle.balance_at(address, height)).await {
        Ok(Ok(balance)) => BalanceRecord::success(address, Wei::new(balance)),
        Ok(Err(err)) => {
            log::debug!("Balance lookup for {address} at block {height} failed: {err}");
            BalanceRecord::failure(address, err)
        }
        Err(_) => {
            log::debug!("Balance lookup for {address} at block {height} timed out");
            BalanceRecord::failure(
                address,
                format!("timed out after {}ms", timeout.as_millis()),
            )
        }
    }
}
