// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Batch measurement of STL folders

pub mod config;
pub mod discovery;
pub mod record;
pub mod report;
pub mod runner;

pub use config::BatchConfig;
pub use discovery::{DiscoveredFile, StlDiscovery};
pub use record::{MeasurementRecord, CSV_HEADER};
pub use report::{output_base_name, ReportPaths, ReportWriter};
pub use runner::{BatchOutcome, BatchRunner, FileMeasurement};
