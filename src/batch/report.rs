// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Report generation (CSV, log and JSON)

use super::config::BatchConfig;
use super::record::{round_to, MeasurementRecord, CSV_HEADER};
use super::runner::{BatchOutcome, FileMeasurement};
use crate::measure::{MeasurementStatus, UNIT};
use anyhow::{Context, Result};
use chrono::{DateTime, Local};
use csv::WriterBuilder;
use std::fs;
use std::path::{Path, PathBuf};

/// Number of measured files listed in the log preview
const PREVIEW_LIMIT: usize = 3;

/// Base name shared by the report files of one run
pub fn output_base_name(now: &DateTime<Local>) -> String {
    format!("stl_dimensions_{}", now.format("%Y%m%d_%H%M%S"))
}

/// Locations of the files written for one run
#[derive(Debug, Clone)]
pub struct ReportPaths {
    pub csv: PathBuf,
    pub log: PathBuf,
    pub json: Option<PathBuf>,
}

impl ReportPaths {
    pub fn new(dir: &Path, base_name: &str, with_json: bool) -> Self {
        Self {
            csv: dir.join(format!("{}.csv", base_name)),
            log: dir.join(format!("{}.log", base_name)),
            json: with_json.then(|| dir.join(format!("{}.json", base_name))),
        }
    }
}

/// Report writer
pub struct ReportWriter;

impl ReportWriter {
    /// Write CSV, log and (if configured) JSON reports next to each other
    pub fn write_all(
        outcome: &BatchOutcome,
        config: &BatchConfig,
        now: &DateTime<Local>,
    ) -> Result<ReportPaths> {
        let dir = config.output_dir_for(&outcome.root);
        fs::create_dir_all(&dir)
            .with_context(|| format!("Failed to create output directory: {}", dir.display()))?;

        let paths = ReportPaths::new(&dir, &output_base_name(now), config.write_json);
        Self::write_csv(outcome, &paths.csv, config.precision)?;
        let lines = Self::log_lines(outcome, &paths, config.precision, now);
        Self::write_log(&lines, &paths.log)?;
        if let Some(ref json) = paths.json {
            Self::write_json(outcome, json)?;
        }

        tracing::info!(csv = %paths.csv.display(), "reports written");
        Ok(paths)
    }

    /// Write the CSV report
    pub fn write_csv(outcome: &BatchOutcome, path: &Path, precision: usize) -> Result<()> {
        let mut writer = WriterBuilder::new()
            .has_headers(false)
            .from_path(path)
            .with_context(|| format!("Failed to create CSV file: {}", path.display()))?;

        writer.write_record(CSV_HEADER)?;
        for result in &outcome.results {
            writer.serialize(MeasurementRecord::new(
                &result.file,
                &result.measurement,
                precision,
            ))?;
        }
        writer.flush()?;
        Ok(())
    }

    /// Write the JSON report
    pub fn write_json(outcome: &BatchOutcome, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(outcome)?;
        fs::write(path, json)
            .with_context(|| format!("Failed to write JSON report: {}", path.display()))?;
        Ok(())
    }

    /// Write prepared log lines
    pub fn write_log(lines: &[String], path: &Path) -> Result<()> {
        let mut content = lines.join("\n");
        content.push('\n');
        fs::write(path, content)
            .with_context(|| format!("Failed to write log file: {}", path.display()))?;
        Ok(())
    }

    /// Human-readable log of a run, one line per entry
    pub fn log_lines(
        outcome: &BatchOutcome,
        paths: &ReportPaths,
        precision: usize,
        now: &DateTime<Local>,
    ) -> Vec<String> {
        let separator = "=".repeat(60);
        let mut lines = vec![
            format!(
                "=== STL ANALYSIS LOG - {} ===",
                now.format("%Y-%m-%d %H:%M:%S")
            ),
            String::new(),
            "STL Dimensions Analyzer - Processing Started".to_string(),
            separator.clone(),
            format!("Source directory: {}", outcome.root.display()),
            format!("Output CSV file: {}", file_name(&paths.csv)),
            format!("Log file: {}", file_name(&paths.log)),
            separator.clone(),
            format!("Analyzing {} unique STL file(s)...", outcome.total()),
            "-".repeat(80),
        ];

        let total = outcome.total();
        for (i, result) in outcome.results.iter().enumerate() {
            lines.push(format!(
                "[{}/{}] Processing: {} ... {}",
                i + 1,
                total,
                display_name(result),
                Self::describe(result, precision)
            ));
        }

        lines.push(separator);
        lines.push(format!(
            "Analysis completed! {} unique file(s) processed in {:.2}s",
            total,
            outcome.duration.as_secs_f64()
        ));
        lines.push(format!("Successful: {} file(s)", outcome.successful()));
        if outcome.empty() > 0 {
            lines.push(format!("Empty meshes: {} file(s)", outcome.empty()));
        }
        if outcome.failed() > 0 {
            lines.push(format!("Errors: {} file(s)", outcome.failed()));
        }

        let measured: Vec<_> = outcome.measured().collect();
        if !measured.is_empty() {
            lines.push(String::new());
            lines.push("Preview of results:".to_string());
            for result in measured.iter().take(PREVIEW_LIMIT) {
                lines.push(format!(
                    "   {}: {}",
                    display_name(result),
                    Self::describe(result, precision)
                ));
            }
            if measured.len() > PREVIEW_LIMIT {
                lines.push(format!(
                    "   ... and {} more files",
                    measured.len() - PREVIEW_LIMIT
                ));
            }
        }

        lines
    }

    /// `W×D×H mm` for measured files, the status text otherwise
    pub fn describe(result: &FileMeasurement, precision: usize) -> String {
        match (&result.measurement.status, result.measurement.dimensions) {
            (MeasurementStatus::Ok, Some(dims)) => format!(
                "{}×{}×{} {}",
                round_to(dims.width, precision),
                round_to(dims.depth, precision),
                round_to(dims.height, precision),
                UNIT
            ),
            (status, _) => status.to_string(),
        }
    }
}

fn display_name(result: &FileMeasurement) -> String {
    if result.file.folder == super::discovery::ROOT_FOLDER {
        result.file.file.clone()
    } else {
        format!("{}/{}", result.file.folder, result.file.file)
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string())
}
