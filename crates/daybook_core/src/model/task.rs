//! Task domain model.
//!
//! # Invariants
//! - `completed_at` is `Some` exactly when `completed` is `true`.
//! - Subtask order is insertion order.

use super::{
    new_id, normalize_optional, normalize_title, Entity, EntityId, Patch, Timestamp,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

pub type TaskId = EntityId;

/// Task urgency. Ordered so that `High > Medium > Low`.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

impl Priority {
    /// Parses `low|medium|high` (case-insensitive).
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "low" => Some(Self::Low),
            "medium" | "normal" => Some(Self::Medium),
            "high" | "urgent" => Some(Self::High),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subtask {
    pub id: EntityId,
    pub title: String,
    pub completed: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: TaskId,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub due_date: Option<NaiveDate>,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub completed: bool,
    #[serde(default)]
    pub completed_at: Option<Timestamp>,
    #[serde(default)]
    pub subtasks: Vec<Subtask>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Task {
    /// Builds a new task from a draft with a generated id.
    pub fn from_draft(draft: TaskDraft, now: Timestamp) -> Self {
        let subtasks = draft
            .subtasks
            .iter()
            .map(|title| title.trim())
            .filter(|title| !title.is_empty())
            .map(|title| Subtask {
                id: new_id(),
                title: title.to_string(),
                completed: false,
            })
            .collect();

        Self {
            id: new_id(),
            title: normalize_title(&draft.title, "Untitled task"),
            description: normalize_optional(draft.description),
            due_date: draft.due_date,
            priority: draft.priority,
            category: draft.category.trim().to_string(),
            completed: false,
            completed_at: None,
            subtasks,
            created_at: now,
            updated_at: now,
        }
    }

    /// Sets completion and keeps `completed_at` in sync.
    pub fn set_completed(&mut self, completed: bool, now: Timestamp) {
        self.completed = completed;
        self.completed_at = if completed { Some(now) } else { None };
    }

    /// Whether the task is past due and still open.
    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        !self.completed && self.due_date.is_some_and(|due| due < today)
    }

    /// Whether the task is due on `today`.
    pub fn is_due_on(&self, today: NaiveDate) -> bool {
        self.due_date == Some(today)
    }

    /// Returns `(completed, total)` subtask counts.
    pub fn subtask_progress(&self) -> (usize, usize) {
        let done = self.subtasks.iter().filter(|s| s.completed).count();
        (done, self.subtasks.len())
    }
}

impl Entity for Task {
    fn id(&self) -> EntityId {
        self.id
    }

    fn touch(&mut self, now: Timestamp) {
        self.updated_at = now;
    }
}

/// Input for `TaskStore::add`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskDraft {
    pub title: String,
    pub description: Option<String>,
    pub due_date: Option<NaiveDate>,
    pub priority: Priority,
    pub category: String,
    pub subtasks: Vec<String>,
}

impl TaskDraft {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    pub fn with_due_date(mut self, due_date: NaiveDate) -> Self {
        self.due_date = Some(due_date);
        self
    }

    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }
}

/// Partial update for a task. `Some(None)` clears an optional field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskPatch {
    pub title: Option<String>,
    pub description: Option<Option<String>>,
    pub due_date: Option<Option<NaiveDate>>,
    pub priority: Option<Priority>,
    pub category: Option<String>,
    pub completed: Option<bool>,
}

impl Patch<Task> for TaskPatch {
    fn apply_to(self, task: &mut Task, now: Timestamp) {
        if let Some(title) = self.title {
            task.title = normalize_title(&title, &task.title);
        }
        if let Some(description) = self.description {
            task.description = normalize_optional(description);
        }
        if let Some(due_date) = self.due_date {
            task.due_date = due_date;
        }
        if let Some(priority) = self.priority {
            task.priority = priority;
        }
        if let Some(category) = self.category {
            task.category = category.trim().to_string();
        }
        if let Some(completed) = self.completed {
            if completed != task.completed {
                task.set_completed(completed, now);
            }
        }
    }

    fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}
