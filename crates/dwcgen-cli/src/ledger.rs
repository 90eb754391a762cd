//! Persistent override ledger.
//!
//! A CSV file of `(workId, resourceId, reason)` rows, appended when an
//! operator signs off on a flagged resource. A row whose second column
//! equals a resource ID bypasses the quality gate for that resource on
//! later passes. Appends are flushed and synced before returning, so a
//! recorded sign-off cannot be lost to a crash between two prompts.

use anyhow::{Context, Result};
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

pub struct OverrideLedger {
    path: PathBuf,
}

impl OverrideLedger {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        OverrideLedger { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether any row records an override for this resource. Exact
    /// match on the second column; a missing ledger file means no
    /// overrides.
    pub fn contains(&self, resource_id: &str) -> Result<bool> {
        if !self.path.exists() {
            return Ok(false);
        }
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_path(&self.path)
            .with_context(|| format!("opening ledger {}", self.path.display()))?;
        for record in reader.records() {
            let record = record.with_context(|| format!("reading ledger {}", self.path.display()))?;
            if record.get(1) == Some(resource_id) {
                return Ok(true);
            }
        }
        Ok(false)
    }

    /// Append one override row and flush it to disk.
    pub fn append(&self, work_id: &str, resource_id: &str, reason: &str) -> Result<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .with_context(|| format!("opening ledger {}", self.path.display()))?;

        // A hand-edited ledger may be missing its final newline; do
        // not glue our row onto the previous one.
        if needs_leading_newline(&self.path)? {
            file.write_all(b"\n")?;
        }

        let mut writer = csv::Writer::from_writer(&mut file);
        writer.write_record([work_id, resource_id, reason])?;
        writer.flush()?;
        drop(writer);

        file.sync_all()
            .with_context(|| format!("syncing ledger {}", self.path.display()))?;
        Ok(())
    }
}

fn needs_leading_newline(path: &Path) -> Result<bool> {
    let bytes = std::fs::read(path)?;
    Ok(!bytes.is_empty() && !bytes.ends_with(b"\n"))
}
