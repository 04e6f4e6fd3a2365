//! Configuration for local data storage

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use steward_common::TASKS_FILENAME;

use crate::error::{Result, StewardError};

/// Where task and filter data lives on disk
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StewardConfig {
    /// Directory holding the JSON data files
    pub data_dir: PathBuf,
    /// Create the data directory on first use instead of erroring
    #[serde(default = "default_create_missing")]
    pub create_missing: bool,
}

const fn default_create_missing() -> bool {
    true
}

impl StewardConfig {
    /// Create a configuration with a custom data directory
    #[must_use]
    pub fn new<P: AsRef<Path>>(data_dir: P, create_missing: bool) -> Self {
        Self {
            data_dir: data_dir.as_ref().to_path_buf(),
            create_missing,
        }
    }

    /// Configuration with the default data directory (`~/.steward`)
    #[must_use]
    pub fn with_default_dir() -> Self {
        Self {
            data_dir: Self::default_data_dir(),
            create_missing: true,
        }
    }

    /// The default data directory under the user's home
    #[must_use]
    pub fn default_data_dir() -> PathBuf {
        let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
        PathBuf::from(home).join(".steward")
    }

    /// Load configuration from a YAML file, then apply env overrides
    ///
    /// # Errors
    /// Returns `StewardError::Io` when the file cannot be read and
    /// `StewardError::Configuration` when it is not valid YAML.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        let mut config: Self = serde_yaml::from_str(&raw)
            .map_err(|e| StewardError::configuration(format!("invalid config file: {e}")))?;
        config.apply_env();
        Ok(config)
    }

    /// Build configuration from environment variables alone.
    ///
    /// Reads `STEWARD_DATA_DIR` and `STEWARD_CREATE_DATA_DIR`.
    #[must_use]
    pub fn from_env() -> Self {
        let mut config = Self::with_default_dir();
        config.apply_env();
        config
    }

    fn apply_env(&mut self) {
        if let Ok(dir) = std::env::var("STEWARD_DATA_DIR") {
            if !dir.is_empty() {
                self.data_dir = PathBuf::from(dir);
            }
        }
        if let Ok(flag) = std::env::var("STEWARD_CREATE_DATA_DIR") {
            self.create_missing = matches!(
                flag.to_lowercase().as_str(),
                "true" | "1" | "yes" | "on"
            );
        }
    }

    /// Resolve the data directory, creating it when permitted
    ///
    /// # Errors
    /// Returns `StewardError::Configuration` when the directory is absent
    /// and `create_missing` is disabled, `StewardError::Io` when creation
    /// itself fails.
    pub fn effective_data_dir(&self) -> Result<PathBuf> {
        if self.data_dir.is_dir() {
            return Ok(self.data_dir.clone());
        }
        if self.create_missing {
            std::fs::create_dir_all(&self.data_dir)?;
            return Ok(self.data_dir.clone());
        }
        Err(StewardError::configuration(format!(
            "data directory {} does not exist and creation is disabled",
            self.data_dir.display()
        )))
    }

    /// Path of the task collection file inside the data directory
    #[must_use]
    pub fn tasks_file(&self) -> PathBuf {
        self.data_dir.join(TASKS_FILENAME)
    }

    /// Configuration rooted in a fresh temporary directory
    ///
    /// # Errors
    /// Returns `StewardError::Io` when the directory cannot be created.
    pub fn for_testing() -> Result<(Self, tempfile::TempDir)> {
        let dir = tempfile::tempdir()?;
        let config = Self::new(dir.path(), false);
        Ok((config, dir))
    }
}

impl Default for StewardConfig {
    fn default() -> Self {
        Self::with_default_dir()
    }
}
