//! Task store.
//!
//! # Invariants
//! - Tasks keep insertion order in storage; sorting is a query concern.
//! - Subtask mutations stamp the parent task's update time.

use super::{apply_patch, find, modify, remove, PersistedState};
use crate::model::task::{Priority, Subtask, Task, TaskDraft, TaskId, TaskPatch};
use crate::model::{new_id, EntityId, Patch};
use crate::storage::{SharedStorage, TASKS_KEY};
use chrono::{NaiveDate, Utc};
use std::cmp::Ordering;

/// Sort order for task listings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TaskSort {
    /// Earliest due date first; undated tasks last.
    #[default]
    DueDate,
    /// High priority first.
    Priority,
    /// Newest first.
    Created,
}

/// Filter options for task listings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskQuery {
    pub category: Option<String>,
    pub priority: Option<Priority>,
    pub completed: Option<bool>,
    /// Case-insensitive match over title and description.
    pub text: Option<String>,
    pub sort: TaskSort,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TaskStats {
    pub total: usize,
    pub completed: usize,
    pub overdue: usize,
}

impl TaskStats {
    pub fn completion_percent(&self) -> u8 {
        if self.total == 0 {
            return 0;
        }
        u8::try_from(self.completed * 100 / self.total).unwrap_or(100)
    }
}

pub struct TaskStore {
    state: PersistedState<Vec<Task>>,
}

impl TaskStore {
    pub fn load(storage: SharedStorage) -> Self {
        Self {
            state: PersistedState::load(storage, TASKS_KEY),
        }
    }

    pub fn tasks(&self) -> &[Task] {
        self.state.get()
    }

    pub fn get(&self, id: TaskId) -> Option<&Task> {
        find(self.state.get(), id)
    }

    pub fn len(&self) -> usize {
        self.state.get().len()
    }

    pub fn is_empty(&self) -> bool {
        self.state.get().is_empty()
    }

    /// Appends a new task and returns its generated id.
    pub fn add(&mut self, draft: TaskDraft) -> TaskId {
        let task = Task::from_draft(draft, Utc::now());
        let id = task.id;
        self.state.commit("task_add", |tasks| {
            tasks.push(task);
            Some(())
        });
        id
    }

    /// Merges `patch` into the task. Returns `false` when `id` is unknown.
    pub fn update(&mut self, id: TaskId, patch: TaskPatch) -> bool {
        if patch.is_empty() {
            return self.get(id).is_some();
        }
        let now = Utc::now();
        self.state
            .commit("task_update", |tasks| apply_patch(tasks, id, patch, now))
            .is_some()
    }

    pub fn delete(&mut self, id: TaskId) -> bool {
        self.state
            .commit("task_delete", |tasks| remove(tasks, id))
            .is_some()
    }

    /// Flips completion. Returns the new state, or `None` for an unknown id.
    pub fn toggle_complete(&mut self, id: TaskId) -> Option<bool> {
        let now = Utc::now();
        self.state.commit("task_toggle", |tasks| {
            modify(tasks, id, now, |task| {
                let completed = !task.completed;
                task.set_completed(completed, now);
                Some(completed)
            })
        })
    }

    /// Removes every completed task and returns how many were removed.
    pub fn clear_completed(&mut self) -> usize {
        self.state
            .commit("task_clear_completed", |tasks| {
                let before = tasks.len();
                tasks.retain(|task| !task.completed);
                let removed = before - tasks.len();
                (removed > 0).then_some(removed)
            })
            .unwrap_or(0)
    }

    pub fn add_subtask(&mut self, id: TaskId, title: &str) -> Option<EntityId> {
        let title = title.trim();
        if title.is_empty() {
            return None;
        }
        let now = Utc::now();
        self.state.commit("subtask_add", |tasks| {
            modify(tasks, id, now, |task| {
                let subtask_id = new_id();
                task.subtasks.push(Subtask {
                    id: subtask_id,
                    title: title.to_string(),
                    completed: false,
                });
                Some(subtask_id)
            })
        })
    }

    pub fn toggle_subtask(&mut self, id: TaskId, subtask_id: EntityId) -> Option<bool> {
        let now = Utc::now();
        self.state.commit("subtask_toggle", |tasks| {
            modify(tasks, id, now, |task| {
                let subtask = task.subtasks.iter_mut().find(|s| s.id == subtask_id)?;
                subtask.completed = !subtask.completed;
                Some(subtask.completed)
            })
        })
    }

    pub fn remove_subtask(&mut self, id: TaskId, subtask_id: EntityId) -> bool {
        let now = Utc::now();
        self.state
            .commit("subtask_remove", |tasks| {
                modify(tasks, id, now, |task| {
                    let index = task.subtasks.iter().position(|s| s.id == subtask_id)?;
                    task.subtasks.remove(index);
                    Some(())
                })
            })
            .is_some()
    }

    /// Filters and sorts tasks without mutating the store.
    pub fn query(&self, query: &TaskQuery) -> Vec<&Task> {
        let category = query
            .category
            .as_deref()
            .map(str::trim)
            .filter(|value| !value.is_empty());
        let text = query
            .text
            .as_deref()
            .map(|value| value.trim().to_lowercase())
            .filter(|value| !value.is_empty());

        let mut items: Vec<&Task> = self
            .state
            .get()
            .iter()
            .filter(|task| category.map_or(true, |c| task.category.eq_ignore_ascii_case(c)))
            .filter(|task| query.priority.map_or(true, |p| task.priority == p))
            .filter(|task| query.completed.map_or(true, |c| task.completed == c))
            .filter(|task| {
                text.as_deref().map_or(true, |needle| {
                    task.title.to_lowercase().contains(needle)
                        || task
                            .description
                            .as_deref()
                            .is_some_and(|d| d.to_lowercase().contains(needle))
                })
            })
            .collect();

        items.sort_by(|a, b| compare_tasks(a, b, query.sort));
        items
    }

    /// Open tasks due exactly on `today`.
    pub fn due_today(&self, today: NaiveDate) -> Vec<&Task> {
        self.state
            .get()
            .iter()
            .filter(|task| !task.completed && task.is_due_on(today))
            .collect()
    }

    pub fn overdue(&self, today: NaiveDate) -> Vec<&Task> {
        let mut items: Vec<&Task> = self
            .state
            .get()
            .iter()
            .filter(|task| task.is_overdue(today))
            .collect();
        items.sort_by(|a, b| compare_tasks(a, b, TaskSort::DueDate));
        items
    }

    /// Distinct non-empty categories, sorted.
    pub fn categories(&self) -> Vec<String> {
        let mut categories: Vec<String> = self
            .state
            .get()
            .iter()
            .map(|task| task.category.clone())
            .filter(|category| !category.is_empty())
            .collect();
        categories.sort();
        categories.dedup();
        categories
    }

    pub fn stats(&self, today: NaiveDate) -> TaskStats {
        let tasks = self.state.get();
        TaskStats {
            total: tasks.len(),
            completed: tasks.iter().filter(|task| task.completed).count(),
            overdue: tasks.iter().filter(|task| task.is_overdue(today)).count(),
        }
    }
}

fn compare_tasks(a: &Task, b: &Task, sort: TaskSort) -> Ordering {
    match sort {
        TaskSort::DueDate => match (a.due_date, b.due_date) {
            (Some(x), Some(y)) => x.cmp(&y),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        }
        .then_with(|| b.priority.cmp(&a.priority))
        .then_with(|| a.created_at.cmp(&b.created_at)),
        TaskSort::Priority => b
            .priority
            .cmp(&a.priority)
            .then_with(|| a.created_at.cmp(&b.created_at)),
        TaskSort::Created => b.created_at.cmp(&a.created_at),
    }
}
