// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! STL file discovery

use ahash::AHashSet;
use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};
use std::path::{Component, Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

/// Folder label used for files directly inside the scanned root
pub const ROOT_FOLDER: &str = ".";

/// STL file found under a scan root
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscoveredFile {
    pub path: PathBuf,
    /// Folder relative to the scan root, `/`-separated
    pub folder: String,
    pub file: String,
}

/// STL discovery
pub struct StlDiscovery;

impl StlDiscovery {
    /// Find `.stl` files (any case) under `root`, sorted by folder then name.
    ///
    /// Hidden files and folders are skipped. When two files in one folder
    /// differ only in the case of their name, the first in sort order is
    /// kept.
    pub fn discover(root: &Path, recursive: bool) -> Result<Vec<DiscoveredFile>> {
        if !root.exists() {
            bail!("Directory {} does not exist", root.display());
        }
        if !root.is_dir() {
            bail!("Path is not a directory: {}", root.display());
        }

        let max_depth = if recursive { usize::MAX } else { 1 };
        let mut seen = AHashSet::new();
        let mut files = Vec::new();

        for entry in WalkDir::new(root)
            .max_depth(max_depth)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|e| e.depth() == 0 || !Self::is_hidden(e))
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file() && Self::is_stl(e.path()))
        {
            let path = entry.path().to_path_buf();
            let file = entry.file_name().to_string_lossy().to_string();
            let folder = Self::relative_folder(root, &path);

            if !seen.insert((folder.clone(), file.to_lowercase())) {
                tracing::debug!(path = %path.display(), "skipping case-insensitive duplicate");
                continue;
            }

            files.push(DiscoveredFile { path, folder, file });
        }

        files.sort_by(|a, b| (&a.folder, &a.file).cmp(&(&b.folder, &b.file)));
        Ok(files)
    }

    /// True for paths with an `stl` extension, in any case
    pub fn is_stl(path: &Path) -> bool {
        path.extension()
            .map(|ext| ext.eq_ignore_ascii_case("stl"))
            .unwrap_or(false)
    }

    fn is_hidden(entry: &DirEntry) -> bool {
        entry.file_name().to_string_lossy().starts_with('.')
    }

    fn relative_folder(root: &Path, path: &Path) -> String {
        let parent = path.parent().unwrap_or(root);
        let relative = parent.strip_prefix(root).unwrap_or(parent);
        let parts: Vec<String> = relative
            .components()
            .filter_map(|c| match c {
                Component::Normal(name) => Some(name.to_string_lossy().to_string()),
                _ => None,
            })
            .collect();

        if parts.is_empty() {
            ROOT_FOLDER.to_string()
        } else {
            parts.join("/")
        }
    }
}
