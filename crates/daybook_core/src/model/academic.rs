//! Academic artifacts: course assignments.

use super::task::Priority;
use super::{new_id, normalize_optional, normalize_title, Entity, EntityId, Patch, Timestamp};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

pub const MAX_GRADE: f32 = 100.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Assignment {
    pub id: EntityId,
    pub title: String,
    #[serde(default)]
    pub course: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub due_date: Option<NaiveDate>,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub completed: bool,
    #[serde(default)]
    pub grade: Option<f32>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Assignment {
    pub fn from_draft(draft: AssignmentDraft, now: Timestamp) -> Self {
        Self {
            id: new_id(),
            title: normalize_title(&draft.title, "Untitled assignment"),
            course: draft.course.trim().to_string(),
            description: normalize_optional(draft.description),
            due_date: draft.due_date,
            priority: draft.priority,
            completed: false,
            grade: None,
            created_at: now,
            updated_at: now,
        }
    }
}

impl Entity for Assignment {
    fn id(&self) -> EntityId {
        self.id
    }

    fn touch(&mut self, now: Timestamp) {
        self.updated_at = now;
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AssignmentDraft {
    pub title: String,
    pub course: String,
    pub description: Option<String>,
    pub due_date: Option<NaiveDate>,
    pub priority: Priority,
}

impl AssignmentDraft {
    pub fn new(title: impl Into<String>, course: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            course: course.into(),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AssignmentPatch {
    pub title: Option<String>,
    pub course: Option<String>,
    pub description: Option<Option<String>>,
    pub due_date: Option<Option<NaiveDate>>,
    pub priority: Option<Priority>,
}

impl Patch<Assignment> for AssignmentPatch {
    fn apply_to(self, assignment: &mut Assignment, _now: Timestamp) {
        if let Some(title) = self.title {
            assignment.title = normalize_title(&title, &assignment.title);
        }
        if let Some(course) = self.course {
            assignment.course = course.trim().to_string();
        }
        if let Some(description) = self.description {
            assignment.description = normalize_optional(description);
        }
        if let Some(due_date) = self.due_date {
            assignment.due_date = due_date;
        }
        if let Some(priority) = self.priority {
            assignment.priority = priority;
        }
    }

    fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}

/// Completion summary of one course.
#[derive(Debug, Clone, PartialEq)]
pub struct CourseProgress {
    pub course: String,
    pub completed: usize,
    pub total: usize,
    /// Mean of recorded grades, if any.
    pub average_grade: Option<f32>,
}

impl CourseProgress {
    pub fn percent(&self) -> u8 {
        if self.total == 0 {
            return 0;
        }
        u8::try_from(self.completed * 100 / self.total).unwrap_or(100)
    }
}
