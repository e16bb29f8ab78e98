// Save, load and export of the task collection

use crate::kv::KeyValueStore;
use crate::models::Task;
use chrono::{NaiveDate, Utc};
use eyre::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, error, info};

/// Application name, used in file names
pub const APP_NAME: &str = "focusflow";

/// Fixed key the task collection is stored under
pub const STORAGE_KEY: &str = "focusflow_tasks";

/// Serialize `tasks` and write them under [`STORAGE_KEY`]
pub fn try_save_tasks<K: KeyValueStore + ?Sized>(kv: &mut K, tasks: &[Task]) -> Result<()> {
    let json = serde_json::to_string(tasks).context("Failed to serialize tasks")?;
    kv.set(STORAGE_KEY, &json).context("Failed to write tasks to storage")?;
    debug!(count = tasks.len(), "Saved tasks");
    Ok(())
}

/// Best-effort save: failures are logged and swallowed
///
/// The in-memory collection stays authoritative when this fails, but the
/// change will not survive a reload.
pub fn save_tasks<K: KeyValueStore + ?Sized>(kv: &mut K, tasks: &[Task]) {
    if let Err(e) = try_save_tasks(kv, tasks) {
        error!(error = ?e, count = tasks.len(), "Failed to save tasks");
    }
}

/// Read the stored collection; an absent key yields an empty collection
pub fn try_load_tasks<K: KeyValueStore + ?Sized>(kv: &K) -> Result<Vec<Task>> {
    let Some(data) = kv.get(STORAGE_KEY).context("Failed to read tasks from storage")? else {
        debug!("No stored tasks");
        return Ok(Vec::new());
    };

    let tasks: Vec<Task> = serde_json::from_str(&data).context("Failed to parse stored tasks")?;
    info!(count = tasks.len(), "Loaded tasks");
    Ok(tasks)
}

/// Best-effort load: unreadable or corrupt data is treated as no data
pub fn load_tasks<K: KeyValueStore + ?Sized>(kv: &K) -> Vec<Task> {
    try_load_tasks(kv).unwrap_or_else(|e| {
        error!(error = ?e, "Failed to load tasks, starting empty");
        Vec::new()
    })
}

/// `focusflow_tasks_<YYYY-MM-DD>.json`
pub fn export_file_name(date: NaiveDate) -> String {
    format!("{}_tasks_{}.json", APP_NAME, date.format("%Y-%m-%d"))
}

/// Write the full collection as pretty JSON into `dir`, named for today's date
pub fn export_tasks(tasks: &[Task], dir: &Path) -> Result<PathBuf> {
    export_tasks_on(tasks, dir, Utc::now().date_naive())
}

pub(crate) fn export_tasks_on(tasks: &[Task], dir: &Path, date: NaiveDate) -> Result<PathBuf> {
    fs::create_dir_all(dir).with_context(|| format!("Failed to create export directory {}", dir.display()))?;

    let path = dir.join(export_file_name(date));
    let json = serde_json::to_string_pretty(tasks).context("Failed to serialize tasks for export")?;
    fs::write(&path, json).with_context(|| format!("Failed to write export file {}", path.display()))?;

    info!(path = ?path, count = tasks.len(), "Exported tasks");
    Ok(path)
}
