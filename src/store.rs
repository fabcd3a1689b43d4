//! Month files on disk.
//!
//! Each month is one pretty-printed JSON array named `MM.json` inside the
//! output directory. [`merge_months`] concatenates whatever month files exist,
//! in calendar order, into a single array file.

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, info, instrument};

use crate::calendar::Month;
use crate::event::Event;

/// Failure reading or writing a month file.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid JSON in {}: {source}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

impl StoreError {
    fn io(path: &Path, source: std::io::Error) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }

    fn json(path: &Path, source: serde_json::Error) -> Self {
        Self::Json {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// `01.json` through `12.json`.
#[must_use]
pub fn month_file_name(month: Month) -> String {
    format!("{:02}.json", month.number())
}

/// Path of `month`'s file inside `dir`.
#[must_use]
pub fn month_path(dir: &Path, month: Month) -> PathBuf {
    dir.join(month_file_name(month))
}

/// Writes `events` as `month`'s file, creating `dir` if needed. Returns the
/// written path.
///
/// # Errors
///
/// Returns [`StoreError`] when the directory or file cannot be written.
#[instrument(skip(events), fields(dir = %dir.display(), month = %month, events = events.len()))]
pub fn write_month(dir: &Path, month: Month, events: &[Event]) -> Result<PathBuf, StoreError> {
    fs::create_dir_all(dir).map_err(|e| StoreError::io(dir, e))?;
    let path = month_path(dir, month);
    write_events(&path, events)?;
    debug!(path = %path.display(), "month file written");
    Ok(path)
}

/// Replaces the events of `days` in `month`'s file and keeps every other
/// day's events. Missing files start empty. The result is ordered by day;
/// events within a day keep their order.
///
/// # Errors
///
/// Returns [`StoreError`] when an existing file is unreadable or the new file
/// cannot be written.
pub fn update_month(
    dir: &Path,
    month: Month,
    days: &[u8],
    events: &[Event],
) -> Result<PathBuf, StoreError> {
    let path = month_path(dir, month);
    let mut merged = if path.exists() {
        read_events(&path)?
    } else {
        Vec::new()
    };
    merged.retain(|event| !days.contains(&event.day));
    merged.extend_from_slice(events);
    merged.sort_by_key(|event| event.day);
    write_month(dir, month, &merged)
}

/// Reads `month`'s file from `dir`.
///
/// # Errors
///
/// Returns [`StoreError`] when the file is missing or not an event array.
pub fn read_month(dir: &Path, month: Month) -> Result<Vec<Event>, StoreError> {
    read_events(&month_path(dir, month))
}

/// Concatenates every existing month file under `dir` into `out`, January
/// first. Missing months are skipped. Returns the number of events written.
///
/// # Errors
///
/// Returns [`StoreError`] when a month file is unreadable or `out` cannot be
/// written.
#[instrument(fields(dir = %dir.display(), out = %out.display()))]
pub fn merge_months(dir: &Path, out: &Path) -> Result<usize, StoreError> {
    let mut merged = Vec::new();
    for month in Month::all() {
        let path = month_path(dir, month);
        if !path.exists() {
            debug!(month = %month, "no month file, skipping");
            continue;
        }
        merged.extend(read_events(&path)?);
    }

    if let Some(parent) = out.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| StoreError::io(parent, e))?;
    }
    write_events(out, &merged)?;
    info!(events = merged.len(), "month files merged");
    Ok(merged.len())
}

fn write_events(path: &Path, events: &[Event]) -> Result<(), StoreError> {
    let json = serde_json::to_string_pretty(events).map_err(|e| StoreError::json(path, e))?;
    fs::write(path, json).map_err(|e| StoreError::io(path, e))
}

fn read_events(path: &Path) -> Result<Vec<Event>, StoreError> {
    let contents = fs::read_to_string(path).map_err(|e| StoreError::io(path, e))?;
    serde_json::from_str(&contents).map_err(|e| StoreError::json(path, e))
}
