//! Utilities for storing a struct in a TOML file on the disk.
//! The struct should implement Serialize and Deserialize from serde.

use std::{
    fmt::Debug,
    fs,
    path::{Path, PathBuf},
};

use directories::BaseDirs;
use serde::{de::DeserializeOwned, Serialize};

pub const STORAGE_DIR: &str = ".epochval";

pub trait DiskStorageInterface
where
    Self: Sized + Debug + Default + Serialize + DeserializeOwned,
{
    const FILE_NAME: &'static str;

    /// Get the path to the file
    fn path() -> crate::Result<PathBuf> {
        let dirs = BaseDirs::new().ok_or(crate::Error::BaseDirsFailed)?;
        Ok(dirs
            .home_dir()
            .join(STORAGE_DIR)
            .join(Self::FILE_NAME)
            .with_extension("toml"))
    }

    /// Load the content from the file if it exists otherwise return the default value
    fn load() -> crate::Result<Self> {
        Self::load_from(&Self::path()?)
    }

    fn load_from(path: &Path) -> crate::Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .map_err(|e| crate::Error::FileReadFailed(path.to_path_buf(), e))?;

        toml::from_str(&content).map_err(|e| crate::Error::TomlParsingFailed(path.to_path_buf(), e))
    }

    /// Save content to a file, creating the directories and file as necessary
    fn save(&self) -> crate::Result<()> {
        self.save_to(&Self::path()?)
    }

    fn save_to(&self, path: &Path) -> crate::Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| crate::Error::CreateDirAllFailed(path.to_path_buf(), e))?;
        }

        let content = toml::to_string_pretty(self)
            .map_err(|e| crate::Error::TomlFormattingFailed(format!("{self:?}"), e))?;

        fs::write(path, content).map_err(|e| crate::Error::FileWriteFailed(path.to_path_buf(), e))?;

        Ok(())
    }
}
