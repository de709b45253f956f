// store/mod.rs — File-backed task store.
//
// Owns the in-memory ordered task list and the JSON file behind it. Every
// successful mutation rewrites the full file before returning. IDs are
// assigned monotonically (last ID + 1) and never reused, so gaps appear
// after deletions.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, info};

// ─── Types ────────────────────────────────────────────────────────────────────

/// A single todo item.
///
/// Serialized field names are capitalized (`ID`, `Name`, `Due`, `Done`) —
/// both the task file on disk and the REST clients expect that exact shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    #[serde(rename = "ID")]
    pub id: i16,
    #[serde(rename = "Name")]
    pub name: String,
    /// Free-form due label — a date string by convention, not parsed.
    #[serde(rename = "Due")]
    pub due: String,
    #[serde(rename = "Done")]
    pub done: bool,
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("task file name must be non-empty and end in .json")]
    InvalidConfig,
    #[error("{0}")]
    Validation(&'static str),
    #[error("task #{0} not found")]
    NotFound(i16),
    #[error("task file error: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed task file: {0}")]
    Parse(#[from] serde_json::Error),
}

// ─── Store ────────────────────────────────────────────────────────────────────

/// In-memory ordered task list plus the JSON file that persists it.
///
/// `set_file` must be called before `load` or any mutating operation; every
/// mutation persists the whole list before reporting success.
#[derive(Debug, Default)]
pub struct TaskStore {
    tasks: Vec<Task>,
    file: Option<PathBuf>,
}

impl TaskStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Configure the backing file. Rejects empty/whitespace paths and paths
    /// without a `.json` extension.
    pub fn set_file(&mut self, path: &str) -> Result<(), StoreError> {
        if path.trim().is_empty() || !path.ends_with(".json") {
            return Err(StoreError::InvalidConfig);
        }
        self.file = Some(PathBuf::from(path));
        Ok(())
    }

    fn file(&self) -> Result<&Path, StoreError> {
        self.file.as_deref().ok_or(StoreError::InvalidConfig)
    }

    /// Read the task list from the backing file.
    ///
    /// A missing file is not an error: an empty JSON array is written to the
    /// path and the store starts empty. Any read or parse failure leaves the
    /// in-memory list empty.
    pub async fn load(&mut self) -> Result<(), StoreError> {
        self.tasks.clear();
        let path = self.file()?.to_path_buf();

        let data = match fs::read(&path).await {
            Ok(data) => data,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                info!(file = %path.display(), "task file does not exist, creating one");
                return self.save().await;
            }
            Err(e) => return Err(StoreError::Io(e)),
        };

        self.tasks = serde_json::from_slice(&data)?;
        debug!(count = self.tasks.len(), file = %path.display(), "tasks loaded");
        Ok(())
    }

    /// Current list, in insertion order.
    pub fn get(&self) -> &[Task] {
        &self.tasks
    }

    /// Append a new task and persist. `name` and `due` must be non-empty
    /// after trimming; the stored values keep their original whitespace.
    pub async fn add(&mut self, name: String, due: String) -> Result<i16, StoreError> {
        if name.trim().is_empty() {
            return Err(StoreError::Validation("task name must not be empty"));
        }
        if due.trim().is_empty() {
            return Err(StoreError::Validation("task due date must not be empty"));
        }

        let id = match self.tasks.last() {
            Some(last) => last
                .id
                .checked_add(1)
                .ok_or(StoreError::Validation("task id space exhausted"))?,
            None => 1,
        };

        self.tasks.push(Task {
            id,
            name,
            due,
            done: false,
        });
        self.save().await?;
        info!(id, "task added");
        Ok(id)
    }

    /// Remove the task with the given ID, preserving the order of the rest.
    pub async fn remove(&mut self, id: i16) -> Result<(), StoreError> {
        let idx = self.position(id)?;
        self.tasks.remove(idx);
        self.save().await?;
        info!(id, "task removed");
        Ok(())
    }

    /// Clear the whole list. Idempotent.
    pub async fn remove_all(&mut self) -> Result<(), StoreError> {
        self.tasks.clear();
        self.save().await
    }

    /// Overwrite name, due, and done of an existing task.
    ///
    /// Unlike `add`, emptiness is not re-validated here — clients that clear
    /// a field via update get exactly what they sent.
    pub async fn update(
        &mut self,
        id: i16,
        name: String,
        due: String,
        done: bool,
    ) -> Result<(), StoreError> {
        let idx = self.position(id)?;
        let task = &mut self.tasks[idx];
        task.name = name;
        task.due = due;
        task.done = done;
        self.save().await?;
        info!(id, "task updated");
        Ok(())
    }

    /// Set `done = true` on an existing task.
    pub async fn mark_done(&mut self, id: i16) -> Result<(), StoreError> {
        let idx = self.position(id)?;
        self.tasks[idx].done = true;
        self.save().await?;
        info!(id, "task marked as done");
        Ok(())
    }

    fn position(&self, id: i16) -> Result<usize, StoreError> {
        self.tasks
            .iter()
            .position(|t| t.id == id)
            .ok_or(StoreError::NotFound(id))
    }

    /// Persist the full list, pretty-printed, to the backing file.
    ///
    /// Written to a tmp file first, then renamed over the target, so a crash
    /// mid-write cannot leave a truncated file behind.
    pub async fn save(&self) -> Result<(), StoreError> {
        let path = self.file()?;
        let json = serde_json::to_string_pretty(&self.tasks)?;

        let tmp_path = path.with_extension("json.tmp");
        fs::write(&tmp_path, json).await?;
        fs::rename(&tmp_path, path).await?;

        debug!(count = self.tasks.len(), file = %path.display(), "tasks persisted");
        Ok(())
    }
}

// ─── Tests ────────────────────────────────────────────────────────────────────
