use crate::models::{Month, Task};

/// Input captured by the new-task modal.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewTaskForm {
    pub title: String,
    pub description: String,
    pub month: Month,
}

impl NewTaskForm {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds the complete record to send, then resets the form. A blank
    /// title produces nothing and keeps the input.
    pub fn submit(&mut self) -> Option<Task> {
        if self.title.trim().is_empty() {
            return None;
        }
        let form = std::mem::take(self);
        Some(Task::new(form.title, form.description, form.month))
    }
}

/// The inline add-subtask form shown under an expanded task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubTaskDraft {
    pub task_id: String,
    pub title: String,
    pub description: String,
}

impl SubTaskDraft {
    pub fn new(task_id: impl Into<String>) -> Self {
        Self {
            task_id: task_id.into(),
            title: String::new(),
            description: String::new(),
        }
    }
}

/// What a submitted add-subtask form asks for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubTaskSubmission {
    pub task_id: String,
    pub title: String,
    pub description: String,
}
