//! Host configuration
//!
//! Configuration only seeds the built-in search locations and tells the
//! filesystem host what an artifact looks like. Locations registered during a
//! session are never written back.

use std::ffi::OsStr;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::artifact::DEFAULT_ARTIFACT_SUFFIX;
use crate::{Error, Result};

/// Environment variable holding extra built-in locations (platform path list)
pub const SEARCH_PATH_ENV: &str = "SHADOW_CONTRACTS_PATH";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HostConfig {
    /// Locations every session starts with, lowest precedence first
    pub builtin_locations: Vec<PathBuf>,
    /// File name suffix identifying shadow artifacts
    pub artifact_suffix: String,
    /// Descend into subdirectories of each location
    pub recursive: bool,
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            builtin_locations: Vec::new(),
            artifact_suffix: DEFAULT_ARTIFACT_SUFFIX.to_string(),
            recursive: false,
        }
    }
}

impl HostConfig {
    /// Load a JSON configuration file. Missing keys take their defaults.
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("cannot read {}: {}", path.display(), e)))?;
        let config: HostConfig = serde_json::from_str(&text)
            .map_err(|e| Error::Config(format!("invalid {}: {}", path.display(), e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Append the locations listed in `SHADOW_CONTRACTS_PATH`, if set.
    pub fn with_env_overlay(self) -> Self {
        let value = std::env::var_os(SEARCH_PATH_ENV);
        self.with_search_path_list(value.as_deref())
    }

    /// Append a platform path list (`:`-separated on Unix, `;` on Windows).
    ///
    /// Empty entries are dropped.
    pub fn with_search_path_list(mut self, list: Option<&OsStr>) -> Self {
        if let Some(list) = list {
            self.builtin_locations.extend(
                std::env::split_paths(list).filter(|p| !p.as_os_str().is_empty()),
            );
        }
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.artifact_suffix.trim().is_empty() {
            return Err(Error::Config("artifact_suffix must not be empty".to_string()));
        }
        Ok(())
    }
}
