use epochval_common::{AggregateReport, BalanceRecord, EpochTime, Height, Wei};
use epochval_utils::shutdown::handle_abort;
use tokio_util::sync::CancellationToken;

use crate::{
    backpressure::FixedDelay, batch::BatchExecutor, collaborators::BalanceOracle,
    settings::PipelineSettings,
};

/// Drives the batch executor over a full address list, one batch at a time,
/// with a fixed pause between batches.
pub struct Pipeline<O> {
    oracle: O,
    settings: PipelineSettings,
    throttle: FixedDelay,
}

impl<O: BalanceOracle> Pipeline<O> {
    pub fn new(oracle: O, settings: PipelineSettings) -> crate::Result<Self> {
        settings.validate()?;
        Ok(Self {
            oracle,
            settings,
            throttle: FixedDelay::new(settings.inter_batch_delay),
        })
    }

    pub fn settings(&self) -> &PipelineSettings {
        &self.settings
    }

    pub fn oracle(&self) -> &O {
        &self.oracle
    }

    /// Fetches every address's balance at `height` and aggregates them.
    ///
    /// Lookup failures never abort the run, they show up as failed records.
    /// When `shutdown_signal` fires, no further batch is started, the batch in
    /// flight is dropped, and the records of all completed batches are
    /// returned as a partial report.
    pub async fn run(
        &self,
        epoch: EpochTime,
        height: Height,
        addresses: &[String],
        shutdown_signal: &CancellationToken,
    ) -> crate::Result<AggregateReport> {
        let batch_size = self.settings.batch_size;
        let total_batches = self.settings.batch_count(addresses.len());
        let executor =
            BatchExecutor::new(&self.oracle, height, batch_size, self.settings.fetch_timeout);

        let mut details: Vec<BalanceRecord> = Vec::with_capacity(addresses.len());
        let mut running_total = Wei::ZERO;
        let mut failed = 0;
        let mut completed_batches = 0;

        for (index, group) in addresses.chunks(batch_size).enumerate() {
            if index > 0 && self.throttle.checkpoint(shutdown_signal).await.is_err() {
                break;
            }

            log::info!(
                "Processing batch {}/{} ({} addresses)",
                index + 1,
                total_batches,
                group.len()
            );

            let Ok(records) = handle_abort(shutdown_signal, || executor.run_batch(group)).await
            else {
                break;
            };
            let records = records?;

            let batch_total: Wei = records.iter().map(BalanceRecord::amount).sum();
            let batch_failed = records.iter().filter(|r| r.failed()).count();
            running_total += batch_total;
            failed += batch_failed;
            completed_batches += 1;

            if batch_failed > 0 {
                log::warn!(
                    "Batch {}/{}: {batch_failed} of {} lookups failed",
                    index + 1,
                    total_batches,
                    group.len()
                );
            }
            log::debug!("Running total after batch {}: {running_total} ETH", index + 1);

            details.extend(records);
        }

        let partial = completed_batches < total_batches;
        if partial {
            log::warn!(
                "Cancelled after {completed_batches}/{total_batches} batches, {} of {} addresses processed",
                details.len(),
                addresses.len()
            );
        }

        let report = AggregateReport::new(epoch, height, details, partial);
        debug_assert_eq!(report.total_amount(), running_total);
        debug_assert_eq!(report.failed_count(), failed);

        Ok(report)
    }
}
