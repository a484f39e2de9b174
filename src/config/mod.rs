use serde::{Deserialize, Serialize};
use std::{
    env, fmt, fs,
    path::{Path, PathBuf},
    str::FromStr,
};

use crate::{
    core::utils::{ensure_dir, write_atomic, PathResolver},
    errors::BudgetError,
};

pub const STORAGE_ENV: &str = "ZBB_STORAGE";
pub const LOG_ENV: &str = "ZBB_LOG";
pub const DEFAULT_LOG_FILTER: &str = "zbb_core=info";

/// Which repository implementation backs the services.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageKind {
    Memory,
    Json,
}

impl fmt::Display for StorageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            StorageKind::Memory => "memory",
            StorageKind::Json => "json",
        })
    }
}

impl FromStr for StorageKind {
    type Err = BudgetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "memory" => Ok(StorageKind::Memory),
            "json" => Ok(StorageKind::Json),
            other => Err(BudgetError::Storage(format!(
                "unknown storage kind `{}` (expected memory or json)",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    pub storage: StorageKind,
    /// Root of the JSON stores; defaults to `<home>/data`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<PathBuf>,
    #[serde(default = "default_log_filter")]
    pub log_filter: String,
}

fn default_log_filter() -> String {
    DEFAULT_LOG_FILTER.to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            storage: StorageKind::Json,
            data_dir: None,
            log_filter: default_log_filter(),
        }
    }
}

impl Config {
    /// Applies `ZBB_STORAGE` and `ZBB_LOG` from the process environment.
    pub fn apply_env(self) -> Result<Self, BudgetError> {
        self.apply_overrides(|key| env::var(key).ok())
    }

    /// Applies overrides read through `lookup`, keyed by environment variable name.
    pub fn apply_overrides<F>(mut self, lookup: F) -> Result<Self, BudgetError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(storage) = lookup(STORAGE_ENV) {
            self.storage = storage.parse()?;
        }
        if let Some(filter) = lookup(LOG_ENV).filter(|value| !value.trim().is_empty()) {
            self.log_filter = filter;
        }
        Ok(self)
    }

    /// Directory the JSON stores live under.
    pub fn data_root(&self) -> PathBuf {
        self.data_dir
            .clone()
            .unwrap_or_else(|| PathResolver::data_dir_in(&PathResolver::base_dir()))
    }
}

/// Loads and saves `<home>/config/config.json`.
pub struct ConfigManager {
    base: PathBuf,
    path: PathBuf,
}

impl ConfigManager {
    pub fn with_base_dir(base: PathBuf) -> Result<Self, BudgetError> {
        ensure_dir(&base)?;
        ensure_dir(&PathResolver::config_dir_in(&base))?;
        Ok(Self {
            path: PathResolver::config_file_in(&base),
            base,
        })
    }

    /// Reads the stored configuration, then applies `ZBB_STORAGE` and `ZBB_LOG`.
    pub fn load(&self) -> Result<Config, BudgetError> {
        self.read_stored()?.apply_env()
    }

    /// Like [`ConfigManager::load`], with overrides read through `lookup`.
    pub fn load_with<F>(&self, lookup: F) -> Result<Config, BudgetError>
    where
        F: Fn(&str) -> Option<String>,
    {
        self.read_stored()?.apply_overrides(lookup)
    }

    /// The saved configuration, or the defaults when none was saved. A missing
    /// `dataDir` resolves under this manager's home.
    fn read_stored(&self) -> Result<Config, BudgetError> {
        let mut config = if self.path.exists() {
            let data = fs::read_to_string(&self.path)?;
            serde_json::from_str(&data)?
        } else {
            Config::default()
        };
        if config.data_dir.is_none() {
            config.data_dir = Some(PathResolver::data_dir_in(&self.base));
        }
        Ok(config)
    }

    pub fn save(&self, config: &Config) -> Result<(), BudgetError> {
        let json = serde_json::to_string_pretty(config)?;
        write_atomic(&self.path, &json)?;
        tracing::debug!(path = %self.path.display(), "configuration saved");
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn base(&self) -> &Path {
        &self.base
    }
}
