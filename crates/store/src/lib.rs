//! Snapshot persistence for the portfolio aggregate.
//!
//! One JSON document under one well-known file name, read in full on load
//! and fully overwritten on save. Overwriting is the whole concurrency
//! story: the last writer wins and nothing ever merges, which is also what
//! keeps two racing sessions from corrupting each other's state.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use models::PortfolioData;
use tracing::debug;

/// File name standing in for the original single storage key.
pub const SNAPSHOT_FILE: &str = "portfolio_app_data.json";

#[derive(Debug, Clone)]
pub struct SnapshotStore {
    path: PathBuf,
}

impl SnapshotStore {
    /// Store rooted at a data directory, using the well-known file name.
    pub fn new<P: AsRef<Path>>(data_dir: P) -> Self {
        Self {
            path: data_dir.as_ref().join(SNAPSHOT_FILE),
        }
    }

    /// Store over an explicit file path.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.is_file()
    }

    /// Loads the aggregate, or the default one when nothing has been saved
    /// yet (first use).
    pub fn load(&self) -> Result<PortfolioData> {
        if !self.exists() {
            debug!(path = %self.path.display(), "no snapshot yet, starting from defaults");
            return Ok(PortfolioData::default());
        }
        let raw = fs::read_to_string(&self.path)
            .with_context(|| format!("Reading snapshot file: {}", self.path.display()))?;
        let data: PortfolioData = serde_json::from_str(&raw)
            .with_context(|| format!("Parsing snapshot JSON in {}", self.path.display()))?;
        Ok(data)
    }

    /// Writes the aggregate, replacing whatever was there.
    pub fn save(&self, data: &PortfolioData) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.exists() {
                fs::create_dir_all(parent)
                    .with_context(|| format!("Creating data directory: {}", parent.display()))?;
            }
        }
        let json = serde_json::to_string_pretty(data).context("Serializing snapshot")?;
        fs::write(&self.path, json)
            .with_context(|| format!("Writing snapshot file: {}", self.path.display()))?;
        debug!(path = %self.path.display(), "snapshot saved");
        Ok(())
    }

    /// Deletes the snapshot. The next load starts from defaults again.
    pub fn clear(&self) -> Result<()> {
        if self.exists() {
            fs::remove_file(&self.path)
                .with_context(|| format!("Removing snapshot file: {}", self.path.display()))?;
        }
        Ok(())
    }
}
