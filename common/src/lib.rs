pub mod amount;
pub mod epoch;
pub mod error;
pub mod record;
pub mod report;
pub mod text_truncate;

pub use amount::Wei;
pub use epoch::EpochTime;
pub use error::Error;
pub use record::BalanceRecord;
pub use report::AggregateReport;

pub type Result<T> = std::result::Result<T, Error>;

/// Block number on the queried chain.
pub type Height = u64;
