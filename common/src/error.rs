use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Epoch time must be a positive number of seconds, got '{0}'.")]
    InvalidEpoch(String),

    #[error("Epoch time {0} is outside the representable date range.")]
    EpochOutOfRange(u64),
}
