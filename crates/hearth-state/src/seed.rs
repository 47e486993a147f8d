//! Bulk loading of operational records from text files.
//!
//! A seed directory holds one `<category>-data-load.txt` per namespace.
//! Each non-blank line is `key:value`, split at the first `:` with both
//! sides trimmed, so values may themselves contain colons.

use std::path::Path;

use hearth_core::Category;
use serde::Serialize;
use tracing::{info, warn};

use crate::error::{StateError, StateResult};
use crate::store::Store;

/// Suffix of seed file names (`utilization-data-load.txt`).
pub const SEED_FILE_SUFFIX: &str = "-data-load.txt";

/// Outcome of loading one namespace.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SeedReport {
    pub namespace: Category,
    pub loaded: usize,
    /// Lines that were not blank but had no `:` or an empty key.
    pub skipped: usize,
}

/// Seed file name for `namespace`.
pub fn seed_file_name(namespace: Category) -> String {
    format!("{}{SEED_FILE_SUFFIX}", namespace.name())
}

/// Split one seed line. `None` for lines that are not `key:value`.
fn parse_line(line: &str) -> Option<(&str, &str)> {
    let (key, value) = line.split_once(':')?;
    let key = key.trim();
    if key.is_empty() {
        return None;
    }
    Some((key, value.trim()))
}

impl Store {
    /// Load `key:value` lines from `content` into `namespace` in one
    /// transaction.
    pub fn load_seed_str(&self, namespace: Category, content: &str) -> StateResult<SeedReport> {
        let mut entries = Vec::new();
        let mut skipped = 0;
        for (lineno, line) in content.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            match parse_line(line) {
                Some(entry) => entries.push(entry),
                None => {
                    warn!(%namespace, line = lineno + 1, "invalid seed line: {line:?}");
                    skipped += 1;
                }
            }
        }
        let loaded = self.put_batch(namespace, entries)?;
        Ok(SeedReport {
            namespace,
            loaded,
            skipped,
        })
    }

    pub fn load_seed_file(&self, namespace: Category, path: &Path) -> StateResult<SeedReport> {
        let content = std::fs::read_to_string(path).map_err(|e| StateError::SeedFile {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        let report = self.load_seed_str(namespace, &content)?;
        info!(
            %namespace,
            path = ?path,
            loaded = report.loaded,
            skipped = report.skipped,
            "seed file loaded"
        );
        Ok(report)
    }

    /// Load the seed file of every opened namespace found in `dir`.
    /// Namespaces without a file are skipped with a warning.
    pub fn load_seed_dir(&self, dir: &Path) -> StateResult<Vec<SeedReport>> {
        let mut reports = Vec::new();
        for namespace in self.namespaces().to_vec() {
            let path = dir.join(seed_file_name(namespace));
            if !path.is_file() {
                warn!(%namespace, path = ?path, "seed file not found");
                continue;
            }
            reports.push(self.load_seed_file(namespace, &path)?);
        }
        Ok(reports)
    }
}
