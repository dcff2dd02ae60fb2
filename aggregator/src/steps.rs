use epochval_common::{AggregateReport, EpochTime, Height};
use epochval_utils::{
    alloy::RpcBalances, config::Config, etherscan::Etherscan, shutdown::handle_abort,
};
use tokio_util::sync::CancellationToken;

use crate::{
    collaborators::{BalanceOracle, CollectionOwners, OwnershipSnapshotSource, TimestampResolver},
    pipeline::Pipeline,
    settings::PipelineSettings,
    AggregatorError,
};

/// Block at or before `epoch`. Any collaborator failure is fatal.
pub async fn resolve_height<R: TimestampResolver>(
    resolver: &R,
    epoch: EpochTime,
) -> crate::Result<Height> {
    resolver
        .resolve(epoch.seconds())
        .await
        .map_err(AggregatorError::Resolution)
}

/// Owners as of `height`, exactly as the source lists them.
///
/// A source that cannot be reached, answers with an HTTP error or breaks off
/// mid-pagination fails the run. A source that answers with a body of the
/// wrong shape is treated as having no owners, which yields an empty report.
pub async fn fetch_snapshot<S: OwnershipSnapshotSource>(
    source: &S,
    height: Height,
) -> crate::Result<Vec<String>> {
    match source.snapshot(height).await {
        Ok(owners) => Ok(owners),
        Err(err) if err.is_malformed_response() => {
            log::warn!(
                "Malformed owner snapshot at block {height}, continuing with no owners: {err}"
            );
            Ok(Vec::new())
        }
        Err(err) => Err(AggregatorError::Snapshot(err)),
    }
}

/// End to end: timestamp to height, height to owners, owners to report.
pub struct EpochValuation<R, S, O> {
    resolver: R,
    snapshot: S,
    pipeline: Pipeline<O>,
}

impl EpochValuation<Etherscan, CollectionOwners, RpcBalances> {
    pub fn from_config(config: &Config) -> crate::Result<Self> {
        Self::new(
            Etherscan::new(config)?,
            CollectionOwners::new(config)?,
            RpcBalances::new(config)?,
            PipelineSettings::from_config(config),
        )
    }
}

impl<R, S, O> EpochValuation<R, S, O>
where
    R: TimestampResolver,
    S: OwnershipSnapshotSource,
    O: BalanceOracle,
{
    pub fn new(
        resolver: R,
        snapshot: S,
        oracle: O,
        settings: PipelineSettings,
    ) -> crate::Result<Self> {
        Ok(Self {
            resolver,
            snapshot,
            pipeline: Pipeline::new(oracle, settings)?,
        })
    }

    pub fn pipeline(&self) -> &Pipeline<O> {
        &self.pipeline
    }

    /// Cancellation before the owner list is in hand is an error, there is
    /// nothing to report yet. Once batches run it yields a partial report.
    pub async fn value_at_epoch(
        &self,
        epoch: EpochTime,
        shutdown_signal: &CancellationToken,
    ) -> crate::Result<AggregateReport> {
        let height =
            handle_abort(shutdown_signal, || resolve_height(&self.resolver, epoch)).await??;
        log::info!("Target block: {height}");

        let owners =
            handle_abort(shutdown_signal, || fetch_snapshot(&self.snapshot, height)).await??;
        log::info!("Unique historical owners: {}", owners.len());

        self.pipeline
            .run(epoch, height, &owners, shutdown_signal)
            .await
    }

    /// Runs the failed subset of `report` once more at the same height and
    /// folds the new records back in. A report without failures is returned
    /// untouched.
    pub async fn retry_failed(
        &self,
        report: AggregateReport,
        shutdown_signal: &CancellationToken,
    ) -> crate::Result<AggregateReport> {
        let failed = report.failed_addresses();
        if failed.is_empty() {
            return Ok(report);
        }

        log::info!("Retrying {} failed lookups", failed.len());
        let retry = self
            .pipeline
            .run(report.epoch(), report.height(), &failed, shutdown_signal)
            .await?;

        Ok(report.merge_retry(retry))
    }
}
