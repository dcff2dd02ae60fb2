pub mod alchemy;
pub mod alloy;
pub mod config;
pub mod disk_storage;
pub mod error;
pub mod etherscan;
pub mod log;
pub mod reqwest;
pub mod serde;
pub mod shutdown;

pub use error::{Result, UtilsError as Error};

pub use reqwest::Reqwest;
