use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::task::TaskData;

/// Default storage file name, resolved against the working directory when
/// nothing overrides it (see `config::resolve_tasks_file`).
pub const TASKS_FILE: &str = "tasks.json";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to access tasks file: {0}")]
    Io(#[from] io::Error),
    #[error("invalid task data: {0}")]
    Json(#[from] serde_json::Error),
    #[error("tasks file is empty")]
    Empty,
}

/// File-backed task storage. The path is injected by the caller; nothing in
/// this module reads ambient global state.
///
/// Failure semantics: no error escapes this type. Reads recover to the
/// default collection (resetting the file so disk and memory stay in sync),
/// writes log to stderr and continue.
#[derive(Debug, Clone)]
pub struct TaskStore {
    path: PathBuf,
}

impl TaskStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        TaskStore { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads the full collection. A missing file is created with the default
    /// collection; empty, unparsable, or wrong-shape content is reported on
    /// stderr and reset to the default.
    pub fn load(&self) -> TaskData {
        if !self.path.exists() {
            let data = TaskData::default();
            if let Err(err) = self.try_save(&data) {
                eprintln!(
                    "Error creating tasks file {}: {}",
                    self.path.display(),
                    err
                );
            }
            return data;
        }
        match self.try_load() {
            Ok(data) => data,
            Err(err) => {
                eprintln!(
                    "Error reading tasks file {}: {}. Resetting to an empty collection.",
                    self.path.display(),
                    err
                );
                let data = TaskData::default();
                if let Err(err) = self.try_save(&data) {
                    eprintln!(
                        "Error resetting tasks file {}: {}",
                        self.path.display(),
                        err
                    );
                }
                data
            }
        }
    }

    /// Serializes the whole collection with two-space indentation and
    /// overwrites the file. An I/O failure is logged and swallowed; the
    /// in-memory state is not rolled back.
    pub fn save(&self, data: &TaskData) {
        if let Err(err) = self.try_save(data) {
            eprintln!(
                "Error writing tasks file {}: {}",
                self.path.display(),
                err
            );
        }
    }

    fn try_load(&self) -> Result<TaskData, StoreError> {
        let text = fs::read_to_string(&self.path)?;
        if text.trim().is_empty() {
            return Err(StoreError::Empty);
        }
        Ok(serde_json::from_str(&text)?)
    }

    fn try_save(&self, data: &TaskData) -> Result<(), StoreError> {
        let body = serde_json::to_string_pretty(data)?;
        fs::write(&self.path, body)?;
        Ok(())
    }
}
