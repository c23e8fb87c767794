use super::{StoreError, TaskStore};
use crate::models::{Status, SubTask, Task, TaskCollection};
use chrono::Utc;
use std::sync::{Mutex, MutexGuard};
use tracing::debug;

/// In-process store holding one record per task.
///
/// Each operation is applied atomically to the affected record. Subtask
/// changes replace the parent's whole `subTasks` list, so concurrent subtask
/// edits on the same task are last-writer-wins.
#[derive(Default)]
pub struct MemoryStore {
    tasks: Mutex<TaskCollection>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tasks(tasks: Vec<Task>) -> Self {
        Self {
            tasks: Mutex::new(TaskCollection::new(tasks)),
        }
    }

    fn tasks(&self) -> Result<MutexGuard<'_, TaskCollection>, StoreError> {
        self.tasks.lock().map_err(|_| StoreError::Poisoned)
    }
}

impl TaskStore for MemoryStore {
    fn list(&self) -> Result<Vec<Task>, StoreError> {
        Ok(self.tasks()?.tasks().to_vec())
    }

    fn create(&self, task: Task) -> Result<Task, StoreError> {
        Ok(self.tasks()?.push_task(task))
    }

    fn update_task_status(&self, task_id: &str, status: Status) -> Result<(), StoreError> {
        if !self.tasks()?.set_task_status(task_id, status, Utc::now()) {
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
        let mut tasks = self.tasks()?;
        let Some(task) = tasks.get(task_id) else {
            debug!("Status update for subtask of unknown task {task_id} ignored");
            return Ok(());
        };
        let now = Utc::now();
        let sub_tasks: Vec<SubTask> = task
            .sub_tasks
            .iter()
            .cloned()
            .map(|mut s| {
                if s.id == subtask_id {
                    s.set_status(status, now);
                }
                s
            })
            .collect();
        replace_sub_tasks(&mut tasks, task_id, sub_tasks);
        Ok(())
    }

    fn delete_task(&self, task_id: &str) -> Result<(), StoreError> {
        if !self.tasks()?.remove_task(task_id) {
            debug!("Delete of unknown task {task_id} ignored");
        }
        Ok(())
    }

    fn delete_subtask(&self, task_id: &str, subtask_id: &str) -> Result<(), StoreError> {
        let mut tasks = self.tasks()?;
        let Some(task) = tasks.get(task_id) else {
            debug!("Delete of subtask of unknown task {task_id} ignored");
            return Ok(());
        };
        let sub_tasks: Vec<SubTask> = task
            .sub_tasks
            .iter()
            .filter(|s| s.id != subtask_id)
            .cloned()
            .collect();
        replace_sub_tasks(&mut tasks, task_id, sub_tasks);
        Ok(())
    }

    fn add_subtask(&self, task_id: &str, subtask: SubTask) -> Result<SubTask, StoreError> {
        let fallback = subtask.clone();
        Ok(self
            .tasks()?
            .push_subtask(task_id, subtask)
            .unwrap_or_else(|| {
                debug!("Subtask for unknown task {task_id} not stored");
                fallback
            }))
    }
}

fn replace_sub_tasks(tasks: &mut TaskCollection, task_id: &str, sub_tasks: Vec<SubTask>) {
    if let Some(task) = tasks.0.iter_mut().find(|t| t.id == task_id) {
        task.sub_tasks = sub_tasks;
    }
}
