//! Text rendering of the planning board.
//!
//! Tasks are split into the two month sections, each drawn as a table with
//! Task / Owner / Status / Dates columns. Which tasks are expanded and which
//! inline form is open lives in [`BoardView`], which is never persisted.

pub mod forms;

pub use forms::{NewTaskForm, SubTaskDraft, SubTaskSubmission};

use crate::models::{Month, Owner, Status, Task};
use chrono::{DateTime, Utc};
use std::collections::HashSet;
use std::fmt::Write;

const TASK_WIDTH: usize = 40;
const OWNER_WIDTH: usize = 12;
const STATUS_WIDTH: usize = 15;
const SUBTASK_INDENT: &str = "    ";

#[derive(Debug, Clone, Default)]
pub struct BoardView {
    expanded: HashSet<String>,
    subtask_form: Option<SubTaskDraft>,
    show_ids: bool,
}

impl BoardView {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append record ids to titles so they can be passed back to commands.
    pub fn with_ids(mut self, show_ids: bool) -> Self {
        self.show_ids = show_ids;
        self
    }

    pub fn shows_ids(&self) -> bool {
        self.show_ids
    }

    pub fn toggle_expansion(&mut self, task_id: &str) {
        if !self.expanded.remove(task_id) {
            self.expanded.insert(task_id.to_string());
        }
    }

    pub fn expand_all<'a>(&mut self, task_ids: impl IntoIterator<Item = &'a str>) {
        self.expanded.extend(task_ids.into_iter().map(str::to_string));
    }

    pub fn is_expanded(&self, task_id: &str) -> bool {
        self.expanded.contains(task_id)
    }

    /// Opens an empty add-subtask form under `task_id`, replacing any form
    /// that was open elsewhere.
    pub fn open_subtask_form(&mut self, task_id: &str) {
        self.subtask_form = Some(SubTaskDraft::new(task_id));
    }

    pub fn subtask_form(&self) -> Option<&SubTaskDraft> {
        self.subtask_form.as_ref()
    }

    pub fn subtask_form_mut(&mut self) -> Option<&mut SubTaskDraft> {
        self.subtask_form.as_mut()
    }

    /// Closes the form and hands back its contents, unless the title is blank
    /// in which case nothing happens.
    pub fn submit_subtask_form(&mut self) -> Option<SubTaskSubmission> {
        let draft = self.subtask_form.as_ref()?;
        if draft.title.trim().is_empty() {
            return None;
        }
        let draft = self.subtask_form.take()?;
        Some(SubTaskSubmission {
            task_id: draft.task_id,
            title: draft.title,
            description: draft.description,
        })
    }

    pub fn cancel_subtask_form(&mut self) {
        self.subtask_form = None;
    }
}

pub fn format_date(date: &DateTime<Utc>) -> String {
    date.format("%b %-d, %I:%M %p").to_string()
}

/// Options offered by the status selector, with their labels.
pub fn status_options() -> impl Iterator<Item = (Status, &'static str)> {
    Status::ALL.into_iter().map(|s| (s, s.label()))
}

pub fn render_board(tasks: &[Task], view: &BoardView) -> String {
    let mut out = String::new();
    for (i, month) in Month::ALL.into_iter().enumerate() {
        if i > 0 {
            out.push('\n');
        }
        render_section(&mut out, tasks, month, view);
    }
    out
}

fn render_section(out: &mut String, tasks: &[Task], month: Month, view: &BoardView) {
    let _ = writeln!(out, "{}", month.section_title());
    let _ = writeln!(
        out,
        "  {:<tw$} {:<ow$} {:<sw$} {}",
        "Task",
        "Owner",
        "Status",
        "Dates",
        tw = TASK_WIDTH,
        ow = OWNER_WIDTH,
        sw = STATUS_WIDTH,
    );

    for task in tasks.iter().filter(|t| t.month == month) {
        let expanded = view.is_expanded(&task.id);
        let marker = if expanded { "▾" } else { "▸" };
        let title = titled(&task.title, &task.id, view.shows_ids());
        render_row(
            out,
            &format!("{marker} {title}"),
            &task.owner,
            task.status,
            &task.created_at,
            task.completed_at.as_ref(),
        );

        if !expanded {
            continue;
        }
        for sub in &task.sub_tasks {
            let title = titled(&sub.title, &sub.id, view.shows_ids());
            render_row(
                out,
                &format!("{SUBTASK_INDENT}{title}"),
                &sub.owner,
                sub.status,
                &sub.created_at,
                sub.completed_at.as_ref(),
            );
        }
        match view.subtask_form() {
            Some(draft) if draft.task_id == task.id => {
                let _ = writeln!(
                    out,
                    "  {SUBTASK_INDENT}[new subtask] title: {:?} description: {:?}",
                    draft.title, draft.description
                );
            }
            _ => {
                let _ = writeln!(out, "  {SUBTASK_INDENT}+ Add subtask");
            }
        }
    }
}

fn render_row(
    out: &mut String,
    title: &str,
    owner: &Owner,
    status: Status,
    created_at: &DateTime<Utc>,
    completed_at: Option<&DateTime<Utc>>,
) {
    let mut dates = format!("Created: {}", format_date(created_at));
    if let Some(done) = completed_at {
        let _ = write!(dates, "  Completed: {}", format_date(done));
    }
    let _ = writeln!(
        out,
        "  {:<tw$} {:<ow$} {:<sw$} {}",
        clip(title, TASK_WIDTH),
        clip(&owner.name, OWNER_WIDTH),
        status.label(),
        dates,
        tw = TASK_WIDTH,
        ow = OWNER_WIDTH,
        sw = STATUS_WIDTH,
    );
}

fn titled(title: &str, id: &str, show_id: bool) -> String {
    if show_id {
        format!("{title} [{id}]")
    } else {
        title.to_string()
    }
}

fn clip(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_string();
    }
    let mut clipped: String = text.chars().take(width.saturating_sub(1)).collect();
    clipped.push('…');
    clipped
}
