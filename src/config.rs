use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::db::StoreOptions;
use crate::schema::{EVENT, REGION};

const CONFIG_FILE: &str = "config.toml";
const DATABASE_FILE: &str = "paralympics.sqlite";
const DATA_DIR: &str = "data";

/// Values read from `config.toml`; every key is optional
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct FileConfig {
    database: Option<PathBuf>,
    regions_csv: Option<PathBuf>,
    events_csv: Option<PathBuf>,
    busy_timeout_ms: Option<u64>,
}

/// Resolved application configuration
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub instance_dir: PathBuf,
    pub database: PathBuf,
    pub regions_csv: PathBuf,
    pub events_csv: PathBuf,
    pub busy_timeout: Duration,
}

impl Config {
    /// Resolve the instance directory (creating it), then layer
    /// `config.toml` from it over the defaults. A missing file is not an error.
    pub fn load(instance_dir: Option<PathBuf>) -> Result<Self> {
        let instance_dir = match instance_dir {
            Some(dir) => dir,
            None => {
                let proj_dirs = ProjectDirs::from("", "", "paralympics")
                    .context("Could not determine instance directory")?;
                proj_dirs.data_dir().to_path_buf()
            }
        };

        fs::create_dir_all(&instance_dir).with_context(|| {
            format!("Failed to create instance directory: {:?}", instance_dir)
        })?;

        let file = read_file_config(&instance_dir.join(CONFIG_FILE))?;
        Ok(Self::from_parts(instance_dir, file))
    }

    fn from_parts(instance_dir: PathBuf, file: FileConfig) -> Self {
        let defaults = Self::defaults(instance_dir);
        Self {
            database: file
                .database
                .map(|p| resolve(&defaults.instance_dir, p))
                .unwrap_or(defaults.database),
            regions_csv: file.regions_csv.unwrap_or(defaults.regions_csv),
            events_csv: file.events_csv.unwrap_or(defaults.events_csv),
            busy_timeout: file
                .busy_timeout_ms
                .map(Duration::from_millis)
                .unwrap_or(defaults.busy_timeout),
            instance_dir: defaults.instance_dir,
        }
    }

    fn defaults(instance_dir: PathBuf) -> Self {
        Self {
            database: instance_dir.join(DATABASE_FILE),
            regions_csv: PathBuf::from(DATA_DIR).join(REGION.source_file),
            events_csv: PathBuf::from(DATA_DIR).join(EVENT.source_file),
            busy_timeout: StoreOptions::default().busy_timeout,
            instance_dir,
        }
    }

    /// Apply command-line overrides. A relative database path resolves
    /// against the instance directory, as it does in `config.toml`.
    pub fn with_overrides(
        mut self,
        database: Option<PathBuf>,
        regions_csv: Option<PathBuf>,
        events_csv: Option<PathBuf>,
    ) -> Self {
        if let Some(db) = database {
            self.database = resolve(&self.instance_dir, db);
        }
        if let Some(path) = regions_csv {
            self.regions_csv = path;
        }
        if let Some(path) = events_csv {
            self.events_csv = path;
        }
        self
    }

    pub fn store_options(&self) -> StoreOptions {
        StoreOptions {
            busy_timeout: self.busy_timeout,
        }
    }
}

/// Relative database paths are relative to the instance dir
fn resolve(instance_dir: &Path, path: PathBuf) -> PathBuf {
    if path.is_absolute() {
        path
    } else {
        instance_dir.join(path)
    }
}

fn read_file_config(path: &Path) -> Result<FileConfig> {
    if !path.exists() {
        return Ok(FileConfig::default());
    }
    let text =
        fs::read_to_string(path).with_context(|| format!("Failed to read config: {:?}", path))?;
    toml::from_str(&text).with_context(|| format!("Failed to parse config: {:?}", path))
}
