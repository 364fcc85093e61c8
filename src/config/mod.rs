use serde::{Deserialize, Serialize};
use std::{
    fs::{self, File},
    io::Write,
    path::{Path, PathBuf},
    time::Duration,
};
use tracing::{debug, warn};

use crate::core::{
    errors::BudgetError,
    services::SortOrder,
    utils::{ensure_dir, PathResolver},
};
use crate::domain::CategoryCatalog;

const TMP_SUFFIX: &str = "tmp";
const DEFAULT_SEARCH_DEBOUNCE_MS: u64 = 150;
const MIN_SEARCH_DEBOUNCE_MS: u64 = 120;
const MAX_SEARCH_DEBOUNCE_MS: u64 = 150;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub categories: CategoryCatalog,
    pub search_debounce_ms: u64,
    pub default_sort: SortOrder,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            categories: CategoryCatalog::default(),
            search_debounce_ms: DEFAULT_SEARCH_DEBOUNCE_MS,
            default_sort: SortOrder::default(),
            data_dir: None,
        }
    }
}

impl Config {
    /// Quiet period for search input, held to 120..=150 ms.
    pub fn search_debounce(&self) -> Duration {
        Duration::from_millis(
            self.search_debounce_ms
                .clamp(MIN_SEARCH_DEBOUNCE_MS, MAX_SEARCH_DEBOUNCE_MS),
        )
    }

    /// Directory holding the entry records; `data_dir` wins over `base`.
    pub fn resolve_data_dir(&self, base: &Path) -> PathBuf {
        self.data_dir
            .clone()
            .unwrap_or_else(|| PathResolver::data_dir_in(base))
    }
}

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

    /// Reads the stored configuration. A missing or unreadable file yields
    /// the defaults; the file itself is left untouched.
    pub fn load(&self) -> Config {
        if !self.path.exists() {
            debug!(path = %self.path.display(), "no config file; using defaults");
            return Config::default();
        }
        match self.read_file() {
            Ok(config) => config,
            Err(err) => {
                warn!(
                    path = %self.path.display(),
                    error = %err,
                    "config unreadable; using defaults"
                );
                Config::default()
            }
        }
    }

    /// Loads the configuration, writing the defaults out on first run.
    pub fn load_or_init(&self) -> Config {
        if self.path.exists() {
            return self.load();
        }
        let config = Config::default();
        match self.save(&config) {
            Ok(()) => debug!(path = %self.path.display(), "default config written"),
            Err(err) => warn!(error = %err, "could not write default config"),
        }
        config
    }

    fn read_file(&self) -> Result<Config, BudgetError> {
        let data = fs::read_to_string(&self.path)?;
        serde_json::from_str(&data)
            .map_err(|err| BudgetError::Config(format!("{}: {err}", self.path.display())))
    }

    pub fn save(&self, config: &Config) -> Result<(), BudgetError> {
        let json = serde_json::to_string_pretty(config)
            .map_err(|err| BudgetError::Config(err.to_string()))?;
        let tmp = tmp_path(&self.path);
        write_atomic(&tmp, &json)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn base_dir(&self) -> &Path {
        &self.base
    }
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut tmp = path.to_path_buf();
    let ext = match path.extension().and_then(|ext| ext.to_str()) {
        Some(existing) => format!("{}.{}", existing, TMP_SUFFIX),
        None => TMP_SUFFIX.to_string(),
    };
    tmp.set_extension(ext);
    tmp
}

fn write_atomic(path: &Path, data: &str) -> Result<(), BudgetError> {
    if let Some(parent) = path.parent() {
        ensure_dir(parent)?;
    }
    let mut file = File::create(path)?;
    file.write_all(data.as_bytes())?;
    file.flush()?;
    Ok(())
}
