// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Batch configuration

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default configuration file looked up in the working directory
pub const CONFIG_FILE: &str = "stl-dimensions.toml";

/// Batch run configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BatchConfig {
    /// Descend into subfolders
    pub recursive: bool,
    /// Maximum parallel workers
    pub parallelism: Option<usize>,
    /// Where reports are written; defaults to the scanned folder
    pub output_dir: Option<PathBuf>,
    /// Also write a JSON report
    pub write_json: bool,
    /// Decimal places for values in the CSV and log
    pub precision: usize,
    /// Show a progress bar
    pub progress: bool,
    /// Verbose output
    pub verbose: bool,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            recursive: true,
            parallelism: None, // Auto-detect
            output_dir: None,
            write_json: false,
            precision: 3,
            progress: true,
            verbose: false,
        }
    }
}

impl BatchConfig {
    /// Load configuration from file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {:?}", path.as_ref()))?;
        let config: BatchConfig = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {:?}", path.as_ref()))?;
        Ok(config)
    }

    /// Load `path` (or `stl-dimensions.toml` if present) and apply
    /// environment variable overrides
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None if Path::new(CONFIG_FILE).exists() => Self::from_file(CONFIG_FILE)?,
            None => Self::default(),
        };
        config.apply_env();
        Ok(config)
    }

    fn apply_env(&mut self) {
        if let Ok(parallelism) = std::env::var("STL_DIMENSIONS_PARALLELISM") {
            self.parallelism = parallelism.parse().ok().filter(|&n: &usize| n > 0);
        }

        if let Ok(output_dir) = std::env::var("STL_DIMENSIONS_OUTPUT_DIR") {
            self.output_dir = Some(PathBuf::from(output_dir));
        }

        if let Ok(verbose) = std::env::var("STL_DIMENSIONS_VERBOSE") {
            self.verbose = verbose.parse().unwrap_or(false);
        }
    }

    /// Save configuration to file
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;
        std::fs::write(path.as_ref(), content)
            .with_context(|| format!("Failed to write config file: {:?}", path.as_ref()))?;
        Ok(())
    }

    /// Report directory for a scan of `root`
    pub fn output_dir_for(&self, root: &Path) -> PathBuf {
        self.output_dir
            .clone()
            .unwrap_or_else(|| root.to_path_buf())
    }
}
