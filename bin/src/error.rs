pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Aggregator(#[from] epochval_aggregator::AggregatorError),

    #[error(transparent)]
    Utils(#[from] epochval_utils::Error),

    #[error(transparent)]
    Inquire(#[from] inquire::InquireError),

    #[error("Failed to format the report as JSON. (Error: {0})")]
    ReportJson(#[from] serde_json::Error),

    #[error("Nothing to save, pass --alchemy and/or --etherscan.")]
    NoKeysGiven,
}
