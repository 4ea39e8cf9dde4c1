//! Academic store: course assignments.

use super::{apply_patch, find, modify, remove, PersistedState};
use crate::model::academic::{
    Assignment, AssignmentDraft, AssignmentPatch, CourseProgress, MAX_GRADE,
};
use crate::model::{EntityId, Patch};
use crate::storage::{SharedStorage, ACADEMIC_KEY};
use chrono::{NaiveDate, Utc};
use std::collections::BTreeMap;

pub struct AcademicStore {
    state: PersistedState<Vec<Assignment>>,
}

impl AcademicStore {
    pub fn load(storage: SharedStorage) -> Self {
        Self {
            state: PersistedState::load(storage, ACADEMIC_KEY),
        }
    }

    pub fn assignments(&self) -> &[Assignment] {
        self.state.get()
    }

    pub fn get(&self, id: EntityId) -> Option<&Assignment> {
        find(self.state.get(), id)
    }

    pub fn add(&mut self, draft: AssignmentDraft) -> EntityId {
        let assignment = Assignment::from_draft(draft, Utc::now());
        let id = assignment.id;
        self.state.commit("assignment_add", |items| {
            items.push(assignment);
            Some(())
        });
        id
    }

    pub fn update(&mut self, id: EntityId, patch: AssignmentPatch) -> bool {
        if patch.is_empty() {
            return self.get(id).is_some();
        }
        let now = Utc::now();
        self.state
            .commit("assignment_update", |items| {
                apply_patch(items, id, patch, now)
            })
            .is_some()
    }

    pub fn delete(&mut self, id: EntityId) -> bool {
        self.state
            .commit("assignment_delete", |items| remove(items, id))
            .is_some()
    }

    pub fn toggle_complete(&mut self, id: EntityId) -> Option<bool> {
        let now = Utc::now();
        self.state.commit("assignment_toggle", |items| {
            modify(items, id, now, |assignment| {
                assignment.completed = !assignment.completed;
                Some(assignment.completed)
            })
        })
    }

    /// Records a grade clamped to `0..=100`; `None` clears it.
    ///
    /// Non-finite grades are ignored.
    pub fn set_grade(&mut self, id: EntityId, grade: Option<f32>) -> bool {
        let grade = match grade {
            Some(value) if !value.is_finite() => return false,
            Some(value) => Some(value.clamp(0.0, MAX_GRADE)),
            None => None,
        };
        let now = Utc::now();
        self.state
            .commit("assignment_grade", |items| {
                modify(items, id, now, |assignment| {
                    assignment.grade = grade;
                    Some(())
                })
            })
            .is_some()
    }

    /// Open assignments due on or after `today`, soonest first.
    pub fn upcoming(&self, today: NaiveDate) -> Vec<&Assignment> {
        let mut items: Vec<&Assignment> = self
            .state
            .get()
            .iter()
            .filter(|a| !a.completed && a.due_date.is_some_and(|due| due >= today))
            .collect();
        items.sort_by(|a, b| {
            a.due_date
                .cmp(&b.due_date)
                .then_with(|| b.priority.cmp(&a.priority))
        });
        items
    }

    /// Completion per course, sorted by course name.
    pub fn course_progress(&self) -> Vec<CourseProgress> {
        let mut by_course: BTreeMap<&str, (usize, usize, Vec<f32>)> = BTreeMap::new();
        for assignment in self.state.get() {
            let entry = by_course
                .entry(assignment.course.as_str())
                .or_insert_with(|| (0, 0, Vec::new()));
            entry.1 += 1;
            if assignment.completed {
                entry.0 += 1;
            }
            if let Some(grade) = assignment.grade {
                entry.2.push(grade);
            }
        }

        by_course
            .into_iter()
            .map(|(course, (completed, total, grades))| CourseProgress {
                course: course.to_string(),
                completed,
                total,
                average_grade: if grades.is_empty() {
                    None
                } else {
                    Some(grades.iter().sum::<f32>() / grades.len() as f32)
                },
            })
            .collect()
    }
}
