// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Parallel batch measurement

use super::config::BatchConfig;
use super::discovery::{DiscoveredFile, StlDiscovery};
use crate::measure::{measure_file, Measurement};
use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

fn serialize_duration<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_f64(duration.as_secs_f64())
}

fn deserialize_duration<'de, D>(deserializer: D) -> Result<Duration, D::Error>
where
    D: Deserializer<'de>,
{
    let secs = f64::deserialize(deserializer)?;
    Ok(Duration::from_secs_f64(secs))
}

/// Measurement of one discovered file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileMeasurement {
    #[serde(flatten)]
    pub file: DiscoveredFile,
    pub measurement: Measurement,
    #[serde(serialize_with = "serialize_duration", deserialize_with = "deserialize_duration")]
    pub duration: Duration,
}

/// Results of a batch run, in discovery order
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchOutcome {
    pub root: PathBuf,
    pub results: Vec<FileMeasurement>,
    #[serde(serialize_with = "serialize_duration", deserialize_with = "deserialize_duration")]
    pub duration: Duration,
}

impl BatchOutcome {
    pub fn total(&self) -> usize {
        self.results.len()
    }

    pub fn successful(&self) -> usize {
        self.count(|m| m.status.is_ok())
    }

    pub fn empty(&self) -> usize {
        self.count(|m| m.status.is_empty())
    }

    pub fn failed(&self) -> usize {
        self.count(|m| m.status.is_error())
    }

    pub fn measured(&self) -> impl Iterator<Item = &FileMeasurement> {
        self.results.iter().filter(|r| r.measurement.status.is_ok())
    }

    fn count(&self, predicate: impl Fn(&Measurement) -> bool) -> usize {
        self.results.iter().filter(|r| predicate(&r.measurement)).count()
    }
}

/// Batch runner
pub struct BatchRunner {
    config: BatchConfig,
}

impl BatchRunner {
    pub fn new(config: BatchConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &BatchConfig {
        &self.config
    }

    /// Discover and measure every STL file under `root`.
    pub fn run(&self, root: &Path) -> Result<BatchOutcome> {
        let files = StlDiscovery::discover(root, self.config.recursive)?;
        tracing::info!(root = %root.display(), files = files.len(), "starting batch");
        self.run_files(root, files)
    }

    /// Measure an explicit list of files. A failing file only affects its
    /// own result.
    pub fn run_files(&self, root: &Path, files: Vec<DiscoveredFile>) -> Result<BatchOutcome> {
        let start = Instant::now();

        let results = match self.config.parallelism {
            Some(threads) => rayon::ThreadPoolBuilder::new()
                .num_threads(threads)
                .build()
                .context("Failed to build worker pool")?
                .install(|| self.measure_all(files)),
            None => self.measure_all(files),
        };

        Ok(BatchOutcome {
            root: root.to_path_buf(),
            results,
            duration: start.elapsed(),
        })
    }

    fn measure_all(&self, files: Vec<DiscoveredFile>) -> Vec<FileMeasurement> {
        let progress = if self.config.progress && !files.is_empty() {
            let pb = ProgressBar::new(files.len() as u64);
            if let Ok(style) = ProgressStyle::default_bar().template(
                "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta}) {msg}",
            ) {
                pb.set_style(style.progress_chars("#>-"));
            }
            Some(pb)
        } else {
            None
        };

        let results: Vec<_> = files
            .into_par_iter()
            .map(|file| {
                if let Some(ref pb) = progress {
                    pb.set_message(file.file.clone());
                }

                let start = Instant::now();
                let measurement = measure_file(&file.path);
                let duration = start.elapsed();

                if let Some(ref pb) = progress {
                    pb.inc(1);
                }

                FileMeasurement {
                    file,
                    measurement,
                    duration,
                }
            })
            .collect();

        if let Some(pb) = progress {
            pb.finish_and_clear();
        }

        results
    }
}
