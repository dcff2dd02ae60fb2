use std::path::PathBuf;

use url::Url;

use crate::reqwest::{ReqwestErrorContext, ReqwestInnerError, ReqwestStage};

pub type Result<T> = std::result::Result<T, UtilsError>;

#[derive(Debug, thiserror::Error)]
pub enum UtilsError {
    #[error(transparent)]
    Common(#[from] epochval_common::Error),

    #[error("Alchemy API key not set, pass --alchemy-api-key, export ALCHEMY_API_KEY or save it with `epochval config set-key`.")]
    AlchemyApiKeyNotSet,

    #[error("Etherscan API key not set, pass --etherscan-api-key, export ETHERSCAN_API_KEY or save it with `epochval config set-key`.")]
    EtherscanApiKeyNotSet,

    #[error("Alchemy owner pagination failed after {pages} pages: {reason}.")]
    AlchemyPagination { reason: &'static str, pages: usize },

    #[error("Etherscan returned status '{status}' ({message}): {result}")]
    EtherscanStatus {
        status: String,
        message: String,
        result: String,
    },

    #[error("Block number '{0}' returned by Etherscan is not a valid integer.")]
    InvalidBlockNumber(String),

    #[error("Address '{0}' is not a valid Ethereum address.")]
    InvalidAddress(String),

    #[error("{0}")]
    Rpc(String),

    #[error("Failed to get base directories.")]
    BaseDirsFailed,

    #[error("Failed to create directory: {0:?}. (Error: {1:?})")]
    CreateDirAllFailed(PathBuf, std::io::Error),

    #[error("Failed to read the file: {0}. (Error: {1:?})")]
    FileReadFailed(PathBuf, std::io::Error),

    #[error("Failed to write to the file: {0}. (Error: {1:?})")]
    FileWriteFailed(PathBuf, std::io::Error),

    #[error("Parsing the toml file failed: {0}. (Error: {1:?})")]
    TomlParsingFailed(PathBuf, toml::de::Error),

    #[error("Formatting to toml format failed: {0}. (Error: {1:?})")]
    TomlFormattingFailed(String, toml::ser::Error),

    #[error("Failed to parse URL: {0}. (Error: {1:?})")]
    UrlParsingFailed(String, url::ParseError),

    #[error(transparent)]
    SerdePathToError(#[from] serde_path_to_error::Error<serde_json::Error>),

    #[error("Please check your internet connection, the URL seems to be unreachable: {0}")]
    Internet(Url),

    #[error("Request '{url}' failed at stage '{stage:?}' (Error='{inner:?}', Context='{context:?}')", url = context.url)]
    ReqwestFailed {
        stage: ReqwestStage,
        context: Box<ReqwestErrorContext>,
        inner: ReqwestInnerError,
    },

    #[error("Reqwest builder missing error context, this is a bug please report it.")]
    ReqwestErrorContextMissing,

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Aborted due to shutdown signal.")]
    AbortDueToShutdown,
}

impl UtilsError {
    pub fn is_connect(&self) -> bool {
        match self {
            Self::Internet(_) => true,
            Self::ReqwestFailed { inner, .. } => inner.is_connect(),
            _ => false,
        }
    }

    /// The remote answered, but with a body that does not have the expected
    /// shape. A pagination failure is not one: earlier pages were fine.
    pub fn is_malformed_response(&self) -> bool {
        matches!(
            self,
            Self::SerdePathToError(_)
                | Self::ReqwestFailed {
                    stage: ReqwestStage::Deserialise,
                    ..
                }
        )
    }
}
