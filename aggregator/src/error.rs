pub type Result<T> = std::result::Result<T, AggregatorError>;

#[derive(Debug, thiserror::Error)]
pub enum AggregatorError {
    #[error(transparent)]
    Utils(#[from] epochval_utils::Error),

    #[error(transparent)]
    Common(#[from] epochval_common::Error),

    #[error("Failed to resolve a block number for the timestamp. (Error: {0})")]
    Resolution(#[source] epochval_utils::Error),

    #[error("Failed to fetch the owner snapshot. (Error: {0})")]
    Snapshot(#[source] epochval_utils::Error),

    #[error("Batch size must be at least 1.")]
    ZeroBatchSize,

    #[error("Fetch timeout must be greater than zero.")]
    ZeroFetchTimeout,

    #[error("Batch of {len} addresses exceeds the configured batch size of {max}.")]
    BatchTooLarge { len: usize, max: usize },
}
