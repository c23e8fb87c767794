use super::tasks::{self, ClientError};
use crate::models::{Status, SubTask, Task};
use chrono::Utc;
use tracing::error;

/// Local copy of the server's task list.
///
/// The copy has no authority: it changes only after the matching server call
/// succeeds, and always by building a new list rather than editing the old
/// one in place. A failed call is logged and leaves the copy untouched.
#[derive(Debug, Clone)]
pub struct TaskMirror {
    base_url: String,
    tasks: Vec<Task>,
}

impl TaskMirror {
    /// An empty mirror that has not talked to the server yet.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            tasks: Vec::new(),
        }
    }

    /// Creates a mirror and performs the initial fetch. A failed fetch leaves
    /// it empty.
    pub async fn load(base_url: impl Into<String>) -> Self {
        let mut mirror = Self::new(base_url);
        let _ = mirror.refresh().await;
        mirror
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub async fn refresh(&mut self) -> Result<(), ClientError> {
        let tasks = tasks::fetch_tasks(&self.base_url)
            .await
            .inspect_err(|e| error!("Error fetching tasks: {e}"))?;
        self.tasks = tasks;
        Ok(())
    }

    pub async fn add_task(&mut self, task: Task) -> Result<(), ClientError> {
        let created = tasks::create_task(&self.base_url, &task)
            .await
            .inspect_err(|e| error!("Error adding task: {e}"))?;
        self.tasks = self
            .tasks
            .iter()
            .cloned()
            .chain(std::iter::once(created))
            .collect();
        Ok(())
    }

    /// Builds a fresh `working` subtask from form input and sends it.
    pub async fn add_subtask(
        &mut self,
        task_id: &str,
        title: &str,
        description: &str,
    ) -> Result<(), ClientError> {
        let subtask = SubTask::new(title, description);
        let created = tasks::add_subtask(&self.base_url, task_id, &subtask)
            .await
            .inspect_err(|e| error!("Error adding subtask: {e}"))?;
        self.tasks = self
            .tasks
            .iter()
            .map(|task| {
                if task.id != task_id {
                    return task.clone();
                }
                let mut sub_tasks = task.sub_tasks.clone();
                sub_tasks.push(created.clone());
                Task {
                    sub_tasks,
                    ..task.clone()
                }
            })
            .collect();
        Ok(())
    }

    pub async fn change_status(&mut self, task_id: &str, status: Status) -> Result<(), ClientError> {
        tasks::update_task_status(&self.base_url, task_id, status)
            .await
            .inspect_err(|e| error!("Error updating task status: {e}"))?;
        let completed_at = status.completed_at(Utc::now());
        self.tasks = self
            .tasks
            .iter()
            .map(|task| {
                if task.id == task_id {
                    Task {
                        status,
                        completed_at,
                        ..task.clone()
                    }
                } else {
                    task.clone()
                }
            })
            .collect();
        Ok(())
    }

    pub async fn change_subtask_status(
        &mut self,
        task_id: &str,
        subtask_id: &str,
        status: Status,
    ) -> Result<(), ClientError> {
        tasks::update_subtask_status(&self.base_url, task_id, subtask_id, status)
            .await
            .inspect_err(|e| error!("Error updating subtask status: {e}"))?;
        let completed_at = status.completed_at(Utc::now());
        self.tasks = self
            .tasks
            .iter()
            .map(|task| {
                if task.id != task_id {
                    return task.clone();
                }
                let sub_tasks = task
                    .sub_tasks
                    .iter()
                    .map(|sub| {
                        if sub.id == subtask_id {
                            SubTask {
                                status,
                                completed_at,
                                ..sub.clone()
                            }
                        } else {
                            sub.clone()
                        }
                    })
                    .collect();
                Task {
                    sub_tasks,
                    ..task.clone()
                }
            })
            .collect();
        Ok(())
    }

    pub async fn delete_task(&mut self, task_id: &str) -> Result<(), ClientError> {
        tasks::delete_task(&self.base_url, task_id)
            .await
            .inspect_err(|e| error!("Error deleting task: {e}"))?;
        self.tasks = self
            .tasks
            .iter()
            .filter(|task| task.id != task_id)
            .cloned()
            .collect();
        Ok(())
    }

    pub async fn delete_subtask(&mut self, task_id: &str, subtask_id: &str) -> Result<(), ClientError> {
        tasks::delete_subtask(&self.base_url, task_id, subtask_id)
            .await
            .inspect_err(|e| error!("Error deleting subtask: {e}"))?;
        self.tasks = self
            .tasks
            .iter()
            .map(|task| {
                if task.id != task_id {
                    return task.clone();
                }
                Task {
                    sub_tasks: task
                        .sub_tasks
                        .iter()
                        .filter(|sub| sub.id != subtask_id)
                        .cloned()
                        .collect(),
                    ..task.clone()
                }
            })
            .collect();
        Ok(())
    }
}
