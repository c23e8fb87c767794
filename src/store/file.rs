use super::{StoreError, TaskStore};
use crate::models::{Status, SubTask, Task, TaskCollection};
use chrono::Utc;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::{debug, info};

/// Whole-collection JSON file store.
///
/// Each operation reads the entire file, mutates it in memory and writes the
/// entire file back. The cycle runs under `lock`, so requests served by one
/// process never overwrite each other's changes.
pub struct JsonFileStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    /// Opens the store, writing an empty collection first if the file does
    /// not exist yet.
    pub fn open_or_init(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let store = Self::new(path);
        if !store.path.exists() {
            info!("Creating empty task file at {}", store.path.display());
            store.write(&TaskCollection::default())?;
        }
        Ok(store)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read(&self) -> Result<TaskCollection, StoreError> {
        let data = fs::read_to_string(&self.path).map_err(|source| StoreError::Read {
            path: self.path.clone(),
            source,
        })?;
        serde_json::from_str(&data).map_err(|source| StoreError::Parse {
            path: self.path.clone(),
            source,
        })
    }

    fn write(&self, collection: &TaskCollection) -> Result<(), StoreError> {
        let data = serde_json::to_string_pretty(collection).map_err(StoreError::Serialize)?;
        let tmp = self.path.with_extension("json.tmp");
        let write_err = |source: std::io::Error| StoreError::Write {
            path: self.path.clone(),
            source,
        };
        fs::write(&tmp, data).map_err(write_err)?;
        fs::rename(&tmp, &self.path).map_err(write_err)
    }

    /// Runs one read-modify-write cycle under the store lock.
    fn modify<T>(&self, f: impl FnOnce(&mut TaskCollection) -> T) -> Result<T, StoreError> {
        let _guard = self.lock.lock().map_err(|_| StoreError::Poisoned)?;
        let mut collection = self.read()?;
        let out = f(&mut collection);
        self.write(&collection)?;
        Ok(out)
    }
}

impl TaskStore for JsonFileStore {
    fn list(&self) -> Result<Vec<Task>, StoreError> {
        let _guard = self.lock.lock().map_err(|_| StoreError::Poisoned)?;
        Ok(self.read()?.into_tasks())
    }

    fn create(&self, task: Task) -> Result<Task, StoreError> {
        self.modify(|tasks| tasks.push_task(task))
    }

    fn update_task_status(&self, task_id: &str, status: Status) -> Result<(), StoreError> {
        let matched = self.modify(|tasks| tasks.set_task_status(task_id, status, Utc::now()))?;
        if !matched {
            debug!("Status update for unknown task {task_id} ignored");
        }
        Ok(())
    }

    fn update_subtask_status(
        &self,
        task_id: &str,
        subtask_id: &str,
        status: Status,
    ) -> Result<(), StoreError> {
        let matched = self.modify(|tasks| {
            tasks.set_subtask_status(task_id, subtask_id, status, Utc::now())
        })?;
        if !matched {
            debug!("Status update for unknown subtask {task_id}/{subtask_id} ignored");
        }
        Ok(())
    }

    fn delete_task(&self, task_id: &str) -> Result<(), StoreError> {
        let removed = self.modify(|tasks| tasks.remove_task(task_id))?;
        if !removed {
            debug!("Delete of unknown task {task_id} ignored");
        }
        Ok(())
    }

    fn delete_subtask(&self, task_id: &str, subtask_id: &str) -> Result<(), StoreError> {
        let removed = self.modify(|tasks| tasks.remove_subtask(task_id, subtask_id))?;
        if !removed {
            debug!("Delete of unknown subtask {task_id}/{subtask_id} ignored");
        }
        Ok(())
    }

    fn add_subtask(&self, task_id: &str, subtask: SubTask) -> Result<SubTask, StoreError> {
        let fallback = subtask.clone();
        let added = self.modify(|tasks| tasks.push_subtask(task_id, subtask))?;
        Ok(added.unwrap_or_else(|| {
            debug!("Subtask for unknown task {task_id} not stored");
            fallback
        }))
    }
}
