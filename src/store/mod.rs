//! Durable storage for the task collection.
//!
//! Two interchangeable backends implement [`TaskStore`]: [`JsonFileStore`]
//! keeps the whole collection in one JSON file, [`MemoryStore`] keeps one
//! record per task in process. A deployment uses exactly one of them.

mod file;
mod memory;

pub use file::JsonFileStore;
pub use memory::MemoryStore;

use crate::models::{Status, SubTask, Task};
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to serialize tasks: {0}")]
    Serialize(#[source] serde_json::Error),

    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("task store lock poisoned")]
    Poisoned,
}

impl StoreError {
    /// True when the failure happened while loading the collection, before
    /// any mutation was attempted.
    pub fn is_read(&self) -> bool {
        matches!(self, StoreError::Read { .. } | StoreError::Parse { .. } | StoreError::Poisoned)
    }
}

/// Operations every storage backend supports.
///
/// Lookups that miss are not errors: status updates and deletes against an
/// unknown id succeed without changing anything, and `add_subtask` against an
/// unknown task returns the record it was given.
pub trait TaskStore: Send + Sync {
    fn list(&self) -> Result<Vec<Task>, StoreError>;

    /// Persists `task`. The stored id may differ from the supplied one when
    /// the supplied id is blank or already in use.
    fn create(&self, task: Task) -> Result<Task, StoreError>;

    fn update_task_status(&self, task_id: &str, status: Status) -> Result<(), StoreError>;

    fn update_subtask_status(
        &self,
        task_id: &str,
        subtask_id: &str,
        status: Status,
    ) -> Result<(), StoreError>;

    fn delete_task(&self, task_id: &str) -> Result<(), StoreError>;

    fn delete_subtask(&self, task_id: &str, subtask_id: &str) -> Result<(), StoreError>;

    fn add_subtask(&self, task_id: &str, subtask: SubTask) -> Result<SubTask, StoreError>;
}
