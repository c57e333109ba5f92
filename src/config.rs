// ⚙️ Configuration - Where the spot check reads and writes
//
// Resolution order:
//   1. --config <file>
//   2. billtext-spotcheck.json in the working directory
//   3. built-in defaults
// BILLTEXT_SPOTCHECK_DB always wins for the database path.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

pub const DEFAULT_CONFIG_FILE: &str = "billtext-spotcheck.json";
pub const DATABASE_ENV_VAR: &str = "BILLTEXT_SPOTCHECK_DB";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    #[default]
    Csv,
    Json,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpotcheckConfig {
    pub database_path: PathBuf,
    /// Pages waiting for ingest
    pub incoming_dir: PathBuf,
    pub archive_dir: PathBuf,
    /// Drop directory the external fetcher writes to
    pub scrape_source_dir: PathBuf,
    pub report_path: PathBuf,
    pub report_format: ReportFormat,
}

impl Default for SpotcheckConfig {
    fn default() -> Self {
        SpotcheckConfig {
            database_path: PathBuf::from("billtext_spotcheck.db"),
            incoming_dir: PathBuf::from("data/incoming"),
            archive_dir: PathBuf::from("data/archive"),
            scrape_source_dir: PathBuf::from("data/scraped"),
            report_path: PathBuf::from("billtext_spotcheck_report.csv"),
            report_format: ReportFormat::Csv,
        }
    }
}

impl SpotcheckConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config: {}", path.display()))?;
        let config = serde_json::from_str(&raw)
            .with_context(|| format!("Invalid config: {}", path.display()))?;
        Ok(config)
    }

    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let mut config = match explicit {
            Some(path) => Self::from_file(path)?,
            None if Path::new(DEFAULT_CONFIG_FILE).exists() => {
                Self::from_file(Path::new(DEFAULT_CONFIG_FILE))?
            }
            None => Self::default(),
        };

        if let Ok(db) = std::env::var(DATABASE_ENV_VAR) {
            config.apply_database_override(&db);
        }

        debug!("Loaded config: {:?}", config);
        Ok(config)
    }

    fn apply_database_override(&mut self, value: &str) {
        if !value.trim().is_empty() {
            self.database_path = PathBuf::from(value);
        }
    }

    pub fn ensure_dirs(&self) -> Result<()> {
        for dir in [&self.incoming_dir, &self.archive_dir] {
            fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create directory: {}", dir.display()))?;
        }
        Ok(())
    }
}

// ============================================================================
// TESTS
// ============================================================================
