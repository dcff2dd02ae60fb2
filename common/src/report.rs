use std::fmt::{Display, Formatter};

use serde::Serialize;

use crate::{BalanceRecord, EpochTime, Height, Wei};

/// Final result of an aggregation run.
///
/// Totals and counts are derived from `details` at construction, so
/// `address_count == details.len()` and `total_amount == sum(details.amount)`
/// hold for every report, partial or not.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregateReport {
    timestamp: String,
    epoch: EpochTime,
    height: Height,
    address_count: usize,
    failed_count: usize,
    total_amount: Wei,
    /// `None` when no address was processed.
    average_amount: Option<Wei>,
    partial: bool,
    details: Vec<BalanceRecord>,
}

impl AggregateReport {
    pub fn new(
        epoch: EpochTime,
        height: Height,
        details: Vec<BalanceRecord>,
        partial: bool,
    ) -> Self {
        let total_amount: Wei = details.iter().map(BalanceRecord::amount).sum();
        let failed_count = details.iter().filter(|r| r.failed()).count();
        let address_count = details.len();

        Self {
            timestamp: epoch.to_iso8601(),
            epoch,
            height,
            address_count,
            failed_count,
            total_amount,
            average_amount: total_amount.checked_mean(address_count),
            partial,
            details,
        }
    }

    pub fn timestamp(&self) -> &str {
        &self.timestamp
    }

    pub fn epoch(&self) -> EpochTime {
        self.epoch
    }

    pub fn height(&self) -> Height {
        self.height
    }

    pub fn address_count(&self) -> usize {
        self.address_count
    }

    pub fn failed_count(&self) -> usize {
        self.failed_count
    }

    pub fn succeeded_count(&self) -> usize {
        self.address_count - self.failed_count
    }

    pub fn total_amount(&self) -> Wei {
        self.total_amount
    }

    pub fn average_amount(&self) -> Option<Wei> {
        self.average_amount
    }

    /// True when the run had no addresses, which is why there is no average.
    pub fn is_empty(&self) -> bool {
        self.address_count == 0
    }

    /// True when the run was cancelled before every batch completed.
    pub fn is_partial(&self) -> bool {
        self.partial
    }

    pub fn details(&self) -> &[BalanceRecord] {
        &self.details
    }

    /// Addresses whose lookup failed, in report order. Feed these into a new
    /// run at the same height to retry just the failed subset.
    pub fn failed_addresses(&self) -> Vec<String> {
        self.details
            .iter()
            .filter(|r| r.failed())
            .map(|r| r.address().to_string())
            .collect()
    }

    /// Replaces failed records with the records of a follow-up run over
    /// `failed_addresses()`. Records are matched positionally and only taken
    /// when the address lines up; anything the retry did not cover keeps its
    /// original failed record.
    pub fn merge_retry(self, retry: AggregateReport) -> AggregateReport {
        let mut replacements = retry.details.into_iter();

        let details = self
            .details
            .into_iter()
            .map(|record| {
                if !record.failed() {
                    return record;
                }
                match replacements.next() {
                    Some(replacement) if replacement.address() == record.address() => replacement,
                    _ => record,
                }
            })
            .collect();

        AggregateReport::new(self.epoch, self.height, details, self.partial)
    }
}

impl Display for AggregateReport {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Results Summary:")?;
        if self.partial {
            writeln!(f, "(partial: run was cancelled before all batches completed)")?;
        }
        writeln!(f, "Timestamp: {}", self.timestamp)?;
        writeln!(f, "Block Number: {}", self.height)?;
        writeln!(f, "Total Addresses Processed: {}", self.address_count)?;
        writeln!(f, "Failed Lookups: {}", self.failed_count)?;
        writeln!(f, "Total ETH: {:.4} ETH", self.total_amount.to_ether_f64())?;
        match self.average_amount {
            Some(average) => write!(
                f,
                "Average ETH per Address: {:.4} ETH",
                average.to_ether_f64()
            ),
            None if self.partial => write!(
                f,
                "Average ETH per Address: n/a (cancelled before any batch completed)"
            ),
            None => write!(f, "Average ETH per Address: n/a (no addresses)"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn epoch() -> EpochTime {
        EpochTime::new(1630000000).unwrap()
    }

    fn eth(s: &str) -> Wei {
        Wei::from_ether(s).unwrap()
    }

    #[test]
    fn test_totals_derive_from_details() {
        let report = AggregateReport::new(
            epoch(),
            13_100_000,
            vec![
                BalanceRecord::success("0x1", eth("1.5")),
                BalanceRecord::success("0x2", eth("1.5")),
                BalanceRecord::failure("0x3", "RPC Error"),
            ],
            false,
        );

        assert_eq!(report.address_count(), 3);
        assert_eq!(report.failed_count(), 1);
        assert_eq!(report.succeeded_count(), 2);
        assert_eq!(report.total_amount(), eth("3"));
        assert_eq!(report.average_amount(), Some(eth("1")));
        assert_eq!(report.timestamp(), "2021-08-26T17:46:40.000Z");
        assert_eq!(report.failed_addresses(), vec!["0x3".to_string()]);
    }

    #[test]
    fn test_empty_is_distinct_from_zero_average() {
        let empty = AggregateReport::new(epoch(), 1, vec![], false);
        assert!(empty.is_empty());
        assert_eq!(empty.average_amount(), None);

        let zero = AggregateReport::new(
            epoch(),
            1,
            vec![BalanceRecord::success("0x1", Wei::ZERO)],
            false,
        );
        assert!(!zero.is_empty());
        assert_eq!(zero.average_amount(), Some(Wei::ZERO));
    }

    #[test]
    fn test_merge_retry_replaces_only_matching_failures() {
        let first = AggregateReport::new(
            epoch(),
            7,
            vec![
                BalanceRecord::failure("0xa", "timeout"),
                BalanceRecord::success("0xb", eth("2")),
                BalanceRecord::failure("0xc", "RPC Error"),
            ],
            false,
        );
        assert_eq!(first.failed_addresses(), vec!["0xa", "0xc"]);

        let retry = AggregateReport::new(
            epoch(),
            7,
            vec![
                BalanceRecord::success("0xa", eth("0.5")),
                BalanceRecord::failure("0xc", "RPC Error"),
            ],
            false,
        );

        let merged = first.merge_retry(retry);
        assert_eq!(merged.address_count(), 3);
        assert_eq!(merged.failed_count(), 1);
        assert_eq!(merged.total_amount(), eth("2.5"));
        assert_eq!(merged.details()[0], BalanceRecord::success("0xa", eth("0.5")));
        assert_eq!(merged.failed_addresses(), vec!["0xc"]);
    }

    #[test]
    fn test_merge_retry_with_short_retry_keeps_originals() {
        let first = AggregateReport::new(
            epoch(),
            7,
            vec![
                BalanceRecord::failure("0xa", "timeout"),
                BalanceRecord::failure("0xb", "timeout"),
            ],
            false,
        );
        let retry = AggregateReport::new(
            epoch(),
            7,
            vec![BalanceRecord::success("0xa", eth("1"))],
            true,
        );

        let merged = first.merge_retry(retry);
        assert_eq!(merged.failed_addresses(), vec!["0xb"]);
        assert_eq!(merged.total_amount(), eth("1"));
        assert!(!merged.is_partial());
    }

    #[test]
    fn test_summary_display() {
        let report = AggregateReport::new(
            epoch(),
            13_100_000,
            vec![
                BalanceRecord::success("0x1", eth("1.5")),
                BalanceRecord::success("0x2", eth("1.5")),
            ],
            false,
        );
        let summary = report.to_string();
        assert!(summary.contains("Block Number: 13100000"));
        assert!(summary.contains("Total ETH: 3.0000 ETH"));
        assert!(summary.contains("Average ETH per Address: 1.5000 ETH"));

        let empty = AggregateReport::new(epoch(), 1, vec![], false).to_string();
        assert!(empty.contains("n/a (no addresses)"));
    }

    #[test]
    fn test_summary_display_cancelled_before_first_batch() {
        let summary = AggregateReport::new(epoch(), 1, vec![], true).to_string();
        assert!(summary.contains("(partial: run was cancelled before all batches completed)"));
        assert!(summary.contains("n/a (cancelled before any batch completed)"));
        assert!(!summary.contains("no addresses"));
    }
}
