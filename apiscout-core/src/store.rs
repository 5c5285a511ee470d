// Durable output: an append-only text report plus a merged JSON array

use apiscout_scanner::ProbeOutcome;
use serde_json::Value;
use std::ffi::OsString;
use std::fs::{self, OpenOptions};
use std::io::{BufWriter, ErrorKind, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use thiserror::Error;
use tracing::{debug, warn};

pub const DEFAULT_TEXT_OUTPUT: &str = "data/bugbounty_apis.txt";

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializeError(#[from] serde_json::Error),

    #[error("Failed to replace results file: {0}")]
    PersistError(#[from] tempfile::PersistError),
}

pub type Result<T> = std::result::Result<T, StoreError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PersistStats {
    /// Lines appended to the text report.
    pub lines_appended: usize,
    /// Entries found in the JSON file before merging.
    pub prior_entries: usize,
    /// Entries in the JSON file after merging.
    pub total_entries: usize,
}

/// `data/apis.txt` pairs with `data/apis.json`. A text path that already ends
/// in `.json` gets a second `.json` suffix so the two files never collide.
pub fn companion_json_path(text_path: &Path) -> PathBuf {
    if text_path.extension().is_some_and(|ext| ext == "json") {
        let mut name: OsString = text_path.as_os_str().to_owned();
        name.push(".json");
        PathBuf::from(name)
    } else {
        text_path.with_extension("json")
    }
}

pub fn format_text_line(outcome: &ProbeOutcome) -> String {
    let kind = outcome.kind.map(|k| k.label()).unwrap_or("Unknown");
    let status = outcome
        .status_code
        .map(|code| code.to_string())
        .unwrap_or_else(|| "N/A".to_string());
    let cdn = if outcome.behind_cdn { " (Cloudflare)" } else { "" };
    format!("{} | {} | Status: {}{}", outcome.url, kind, status, cdn)
}

fn ensure_parent_dir(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)?;
    }
    Ok(())
}

pub struct ResultStore {
    text_path: PathBuf,
    json_path: PathBuf,
}

impl ResultStore {
    pub fn new(text_path: impl Into<PathBuf>) -> Self {
        let text_path = text_path.into();
        let json_path = companion_json_path(&text_path);
        Self {
            text_path,
            json_path,
        }
    }

    pub fn with_paths(text_path: impl Into<PathBuf>, json_path: impl Into<PathBuf>) -> Self {
        Self {
            text_path: text_path.into(),
            json_path: json_path.into(),
        }
    }

    pub fn text_path(&self) -> &Path {
        &self.text_path
    }

    pub fn json_path(&self) -> &Path {
        &self.json_path
    }

    /// Appends API-positive outcomes to the text report and merges them into
    /// the JSON array. Non-API outcomes are ignored.
    pub fn persist(&self, outcomes: &[ProbeOutcome]) -> Result<PersistStats> {
        let api_outcomes: Vec<&ProbeOutcome> = outcomes.iter().filter(|o| o.is_api).collect();
        if api_outcomes.is_empty() {
            debug!("Nothing to persist");
            return Ok(PersistStats::default());
        }

        // Merge and write the JSON first so a failure leaves both files untouched
        let mut entries = self.load_existing()?;
        let prior_entries = entries.len();
        for outcome in &api_outcomes {
            entries.push(serde_json::to_value(outcome)?);
        }
        self.replace_json(&entries)?;

        let lines_appended = self.append_text(&api_outcomes)?;

        Ok(PersistStats {
            lines_appended,
            prior_entries,
            total_entries: entries.len(),
        })
    }

    fn append_text(&self, outcomes: &[&ProbeOutcome]) -> Result<usize> {
        ensure_parent_dir(&self.text_path)?;

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.text_path)?;
        let mut writer = BufWriter::new(file);
        for outcome in outcomes {
            writeln!(writer, "{}", format_text_line(outcome))?;
        }
        writer.flush()?;

        Ok(outcomes.len())
    }

    /// Entries from a previous run. A missing file, or one that does not
    /// decode as a JSON array, counts as empty.
    pub fn load_existing(&self) -> Result<Vec<Value>> {
        let content = match fs::read(&self.json_path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        match serde_json::from_slice::<Vec<Value>>(&content) {
            Ok(entries) => Ok(entries),
            Err(e) => {
                warn!(
                    "Ignoring unreadable results file {}: {}",
                    self.json_path.display(),
                    e
                );
                Ok(Vec::new())
            }
        }
    }

    /// Writes to a sibling temp file and renames it over the target, so an
    /// interrupted run leaves either the old or the new file in place.
    fn replace_json(&self, entries: &[Value]) -> Result<()> {
        ensure_parent_dir(&self.json_path)?;
        let dir = match self.json_path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };

        let mut temp = NamedTempFile::new_in(dir)?;
        {
            let mut writer = BufWriter::new(temp.as_file_mut());
            serde_json::to_writer_pretty(&mut writer, entries)?;
            writer.write_all(b"\n")?;
            writer.flush()?;
        }
        temp.as_file().sync_all()?;
        temp.persist(&self.json_path)?;
        Ok(())
    }
}

/// Persist `outcomes` to an explicit text/JSON path pair.
pub fn persist(outcomes: &[ProbeOutcome], text_path: &Path, json_path: &Path) -> Result<PersistStats> {
    ResultStore::with_paths(text_path, json_path).persist(outcomes)
}
