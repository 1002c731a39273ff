// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! CLI output reporter with colored formatting

use crate::batch::{BatchOutcome, ReportPaths, ReportWriter};
use crate::measure::{Measurement, MeasurementStatus, UNIT};
use colored::*;
use std::time::Duration;

/// CLI reporter for formatted output
pub struct Reporter;

impl Reporter {
    /// Report the analytics of a single file
    pub fn report_measurement(file: &str, measurement: &Measurement, duration: Duration) {
        println!("\n{}", "━".repeat(80).bright_black());
        println!("{} {}", "File:".bold(), file.cyan());
        println!("{}", "━".repeat(80).bright_black());

        match &measurement.status {
            MeasurementStatus::Ok => {}
            MeasurementStatus::Empty => {
                println!("{} {}", "⚠️".yellow(), "Mesh contains no triangles".yellow());
                println!("{}", "━".repeat(80).bright_black());
                return;
            }
            MeasurementStatus::Error(message) => {
                println!("{} {}", "❌".red(), message.red());
                println!("{}", "━".repeat(80).bright_black());
                return;
            }
        }

        let (Some(dims), Some(bounds)) = (measurement.dimensions, measurement.bounds) else {
            return;
        };

        println!("╔══════════════════════════════════════════════════════════╗");
        println!("║              STL DIMENSIONS                              ║");
        println!("╠══════════════════════════════════════════════════════════╣");
        println!(
            "║ Size:  {:>10.3} × {:>10.3} × {:>10.3} {}        ║",
            dims.width, dims.depth, dims.height, UNIT
        );
        println!(
            "║   Min: ({:>10.3}, {:>10.3}, {:>10.3})            ║",
            bounds.min.x, bounds.min.y, bounds.min.z
        );
        println!(
            "║   Max: ({:>10.3}, {:>10.3}, {:>10.3})            ║",
            bounds.max.x, bounds.max.y, bounds.max.z
        );
        println!("║                                                          ║");
        println!(
            "║ Volume:        {:>14.3} {}³                         ║",
            measurement.volume.unwrap_or_default(),
            UNIT
        );
        println!(
            "║ Surface Area:  {:>14.3} {}²                         ║",
            measurement.surface_area.unwrap_or_default(),
            UNIT
        );
        println!(
            "║ Triangles:     {:>14}                             ║",
            measurement.triangle_count
        );
        println!(
            "║ Format:        {:>14}                             ║",
            measurement
                .format
                .map(|f| f.as_str())
                .unwrap_or("unknown")
        );
        println!("╚══════════════════════════════════════════════════════════╝");

        if measurement.is_inverted() {
            Self::report_warning("Facets wind inward (negative signed volume)");
        }

        println!(
            "  {} {}",
            "Time:".bright_black(),
            Self::format_duration(duration).yellow()
        );
    }

    /// Report the outcome of a batch run
    pub fn report_batch_summary(outcome: &BatchOutcome, paths: &ReportPaths, precision: usize) {
        println!("\n{}", "═".repeat(80).bright_black());
        println!("{}", "Analysis Summary".bold());
        println!("{}", "═".repeat(80).bright_black());
        println!(
            "  {} {}",
            "Files:".bright_black(),
            outcome.total().to_string().cyan()
        );
        println!(
            "  {} {}",
            "Successful:".bright_black(),
            outcome.successful().to_string().green()
        );
        if outcome.empty() > 0 {
            println!(
                "  {} {}",
                "Empty:".bright_black(),
                outcome.empty().to_string().yellow()
            );
        }
        println!(
            "  {} {}",
            "Errors:".bright_black(),
            if outcome.failed() > 0 {
                outcome.failed().to_string().red()
            } else {
                outcome.failed().to_string().green()
            }
        );
        println!(
            "  {} {}",
            "Time:".bright_black(),
            Self::format_duration(outcome.duration).yellow()
        );

        let failures: Vec<_> = outcome
            .results
            .iter()
            .filter(|r| r.measurement.status.is_error())
            .collect();
        if !failures.is_empty() {
            println!("\n  {}", "Errors:".red().bold());
            for result in failures {
                println!("    {} {}/{}", "❌".red(), result.file.folder, result.file.file);
                println!(
                    "       {}",
                    ReportWriter::describe(result, precision).bright_black()
                );
            }
        }

        println!(
            "\n  {} {}",
            "CSV Report:".bright_black(),
            paths.csv.display().to_string().cyan()
        );
        println!(
            "  {} {}",
            "Log File:".bright_black(),
            paths.log.display().to_string().cyan()
        );
        if let Some(ref json) = paths.json {
            println!(
                "  {} {}",
                "JSON Report:".bright_black(),
                json.display().to_string().cyan()
            );
        }
        println!("{}", "═".repeat(80).bright_black());
    }

    /// Report error
    pub fn report_error(message: &str) {
        eprintln!("\n{} {}", "❌ Error:".red().bold(), message);
    }

    /// Report warning
    pub fn report_warning(message: &str) {
        println!("\n{} {}", "⚠️  Warning:".yellow().bold(), message);
    }

    /// Report info
    pub fn report_info(message: &str) {
        println!("{} {}", "ℹ️".bright_blue(), message);
    }

    /// Print success message
    pub fn success(message: &str) {
        println!("{} {}", "✅".green(), message.green());
    }

    /// Format duration for display
    pub fn format_duration(duration: Duration) -> String {
        let micros = duration.as_micros();

        if micros < 1_000 {
            format!("{}µs", micros)
        } else if micros < 1_000_000 {
            format!("{:.2}ms", micros as f64 / 1_000.0)
        } else {
            format!("{:.2}s", micros as f64 / 1_000_000.0)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_duration() {
        assert_eq!(
            Reporter::format_duration(Duration::from_micros(500)),
            "500µs"
        );
        assert_eq!(
            Reporter::format_duration(Duration::from_millis(5)),
            "5.00ms"
        );
        assert_eq!(Reporter::format_duration(Duration::from_secs(2)), "2.00s");
    }
}
