//! Task and subtask records as they are stored on disk and sent over the wire.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

pub const DEFAULT_OWNER_NAME: &str = "John Doe";
pub const DEFAULT_OWNER_AVATAR: &str = "/assets/profile.jpg";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Owner {
    pub name: String,
    pub avatar: String,
}

impl Default for Owner {
    fn default() -> Self {
        Self {
            name: DEFAULT_OWNER_NAME.to_string(),
            avatar: DEFAULT_OWNER_AVATAR.to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Done,
    Working,
    Stuck,
}

impl Status {
    /// Selector order used by the board.
    pub const ALL: [Status; 3] = [Status::Done, Status::Working, Status::Stuck];

    pub fn label(self) -> &'static str {
        match self {
            Status::Done => "Done",
            Status::Working => "Working on it",
            Status::Stuck => "Stuck",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Status::Done => "done",
            Status::Working => "working",
            Status::Stuck => "stuck",
        }
    }

    /// `completedAt` value implied by moving into this status at `now`.
    pub fn completed_at(self, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
        match self {
            Status::Done => Some(now),
            Status::Working | Status::Stuck => None,
        }
    }
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Status {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "done" => Ok(Status::Done),
            "working" => Ok(Status::Working),
            "stuck" => Ok(Status::Stuck),
            other => Err(format!("unknown status '{other}' (expected done, working or stuck)")),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Month {
    #[default]
    This,
    Next,
}

impl Month {
    pub const ALL: [Month; 2] = [Month::This, Month::Next];

    pub fn section_title(self) -> &'static str {
        match self {
            Month::This => "This month",
            Month::Next => "Next month",
        }
    }
}

impl std::str::FromStr for Month {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "this" => Ok(Month::This),
            "next" => Ok(Month::Next),
            other => Err(format!("unknown month '{other}' (expected this or next)")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubTask {
    pub id: String,
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub completed: bool,
    pub status: Status,
    pub created_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
    pub owner: Owner,
    /// Fields this model does not know, kept so rewrites do not drop them.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl SubTask {
    /// A fresh `working` subtask owned by the default owner.
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            title: title.into(),
            description: description.into(),
            completed: false,
            status: Status::Working,
            created_at: Utc::now(),
            completed_at: None,
            owner: Owner::default(),
            extra: Map::new(),
        }
    }

    pub fn set_status(&mut self, status: Status, now: DateTime<Utc>) {
        self.status = status;
        self.completed_at = status.completed_at(now);
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: String,
    pub title: String,
    pub description: String,
    pub start_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub completed: bool,
    #[serde(default)]
    pub sub_tasks: Vec<SubTask>,
    pub status: Status,
    pub created_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
    pub owner: Owner,
    pub month: Month,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Task {
    /// A fresh `working` task with no subtasks, owned by the default owner.
    pub fn new(title: impl Into<String>, description: impl Into<String>, month: Month) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            title: title.into(),
            description: description.into(),
            start_time: None,
            completed: false,
            sub_tasks: Vec::new(),
            status: Status::Working,
            created_at: Utc::now(),
            completed_at: None,
            owner: Owner::default(),
            month,
            extra: Map::new(),
        }
    }

    pub fn set_status(&mut self, status: Status, now: DateTime<Utc>) {
        self.status = status;
        self.completed_at = status.completed_at(now);
    }

    pub fn subtask(&self, subtask_id: &str) -> Option<&SubTask> {
        self.sub_tasks.iter().find(|s| s.id == subtask_id)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusUpdate {
    pub status: Status,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

/// The whole task list, in insertion order.
///
/// Every mutation reports whether a record matched; callers treat a miss as
/// a successful no-op.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskCollection(pub Vec<Task>);

impl TaskCollection {
    pub fn new(tasks: Vec<Task>) -> Self {
        Self(tasks)
    }

    pub fn tasks(&self) -> &[Task] {
        &self.0
    }

    pub fn into_tasks(self) -> Vec<Task> {
        self.0
    }

    pub fn get(&self, task_id: &str) -> Option<&Task> {
        self.0.iter().find(|t| t.id == task_id)
    }

    pub fn contains(&self, task_id: &str) -> bool {
        self.get(task_id).is_some()
    }

    /// Appends `task`, replacing its id with a fresh one when it is blank or
    /// already taken.
    pub fn push_task(&mut self, mut task: Task) -> Task {
        if task.id.trim().is_empty() || self.contains(&task.id) {
            task.id = Uuid::new_v4().to_string();
        }
        self.0.push(task.clone());
        task
    }

    /// Appends `subtask` to the end of its parent's list. Returns `None` when
    /// the parent does not exist.
    pub fn push_subtask(&mut self, task_id: &str, mut subtask: SubTask) -> Option<SubTask> {
        let task = self.0.iter_mut().find(|t| t.id == task_id)?;
        if subtask.id.trim().is_empty() || task.sub_tasks.iter().any(|s| s.id == subtask.id) {
            subtask.id = Uuid::new_v4().to_string();
        }
        task.sub_tasks.push(subtask.clone());
        Some(subtask)
    }

    pub fn set_task_status(&mut self, task_id: &str, status: Status, now: DateTime<Utc>) -> bool {
        match self.0.iter_mut().find(|t| t.id == task_id) {
            Some(task) => {
                task.set_status(status, now);
                true
            }
            None => false,
        }
    }

    pub fn set_subtask_status(
        &mut self,
        task_id: &str,
        subtask_id: &str,
        status: Status,
        now: DateTime<Utc>,
    ) -> bool {
        let subtask = self
            .0
            .iter_mut()
            .find(|t| t.id == task_id)
            .and_then(|t| t.sub_tasks.iter_mut().find(|s| s.id == subtask_id));
        match subtask {
            Some(subtask) => {
                subtask.set_status(status, now);
                true
            }
            None => false,
        }
    }

    pub fn remove_task(&mut self, task_id: &str) -> bool {
        let before = self.0.len();
        self.0.retain(|t| t.id != task_id);
        self.0.len() != before
    }

    pub fn remove_subtask(&mut self, task_id: &str, subtask_id: &str) -> bool {
        match self.0.iter_mut().find(|t| t.id == task_id) {
            Some(task) => {
                let before = task.sub_tasks.len();
                task.sub_tasks.retain(|s| s.id != subtask_id);
                task.sub_tasks.len() != before
            }
            None => false,
        }
    }
}
