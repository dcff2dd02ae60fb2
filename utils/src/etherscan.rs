use std::time::Duration;

use serde::Deserialize;
use serde_json::Value;

use crate::{config::Config, Reqwest};

// docs: https://docs.etherscan.io/api-reference/endpoint/getblocknobytime
#[derive(Debug, Deserialize)]
struct EtherscanResponse {
    #[serde(default)]
    status: String,
    #[serde(default)]
    message: String,
    #[serde(default)]
    result: Value,
}

impl EtherscanResponse {
    fn into_block_number(self) -> crate::Result<u64> {
        if self.status != "1" {
            return Err(crate::Error::EtherscanStatus {
                status: self.status,
                message: self.message,
                result: value_to_string(&self.result),
            });
        }
        parse_block_number(&self.result)
    }
}

fn value_to_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Etherscan answers with a decimal string, but accept a bare number or a hex
/// quantity as well.
fn parse_block_number(value: &Value) -> crate::Result<u64> {
    let invalid = || crate::Error::InvalidBlockNumber(value_to_string(value));
    match value {
        Value::Number(n) => n.as_u64().ok_or_else(invalid),
        Value::String(s) => {
            let s = s.trim();
            match s.strip_prefix("0x") {
                Some(hex) => u64::from_str_radix(hex, 16).map_err(|_| invalid()),
                None => s.parse().map_err(|_| invalid()),
            }
        }
        _ => Err(invalid()),
    }
}

pub struct Etherscan {
    api_url: String,
    api_key: String,
    chain_id: u64,
    timeout: Duration,
}

impl Etherscan {
    pub fn new(config: &Config) -> crate::Result<Self> {
        Ok(Self {
            api_url: config.etherscan_api_url.clone(),
            api_key: config.etherscan_api_key()?.to_string(),
            chain_id: config.chain_id,
            timeout: config.fetch_timeout(),
        })
    }

    /// Block number of the last block mined at or before `timestamp`.
    pub async fn block_number_by_timestamp(&self, timestamp: u64) -> crate::Result<u64> {
        let chain_id = self.chain_id.to_string();
        let timestamp = timestamp.to_string();

        let response = Reqwest::get(&self.api_url)?
            .query(&[
                ("chainid", chain_id.as_str()),
                ("module", "block"),
                ("action", "getblocknobytime"),
                ("timestamp", timestamp.as_str()),
                ("closest", "before"),
                ("apikey", self.api_key.as_str()),
            ])
            .timeout(self.timeout)
            .redact(&self.api_key)
            .receive_json::<EtherscanResponse>()
            .await?;

        response.into_block_number()
    }
}
