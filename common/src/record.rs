use serde::Serialize;

use crate::{
    text_truncate::{truncate_with_count, FAILURE_REASON_LIMIT},
    Wei,
};

/// Outcome of one balance lookup. A failed lookup always carries a zero amount.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BalanceRecord {
    address: String,
    amount: Wei,
    failed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    failure_reason: Option<String>,
}

impl BalanceRecord {
    pub fn success(address: impl Into<String>, amount: Wei) -> Self {
        Self {
            address: address.into(),
            amount,
            failed: false,
            failure_reason: None,
        }
    }

    pub fn failure(address: impl Into<String>, reason: impl ToString) -> Self {
        Self {
            address: address.into(),
            amount: Wei::ZERO,
            failed: true,
            failure_reason: Some(truncate_with_count(
                &reason.to_string(),
                FAILURE_REASON_LIMIT,
            )),
        }
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    pub fn amount(&self) -> Wei {
        self.amount
    }

    pub fn failed(&self) -> bool {
        self.failed
    }

    pub fn failure_reason(&self) -> Option<&str> {
        self.failure_reason.as_deref()
    }
}
