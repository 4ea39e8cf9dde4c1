use chrono::NaiveDate;
use daybook_core::model::new_id;
use daybook_core::model::task::{Priority, TaskDraft, TaskPatch};
use daybook_core::storage::{KeyValueStore, MemoryKeyValueStore, SharedStorage, TASKS_KEY};
use daybook_core::store::task_store::{TaskQuery, TaskSort, TaskStore};
use std::rc::Rc;

#[test]
fn add_then_delete_leaves_store_empty() {
    let mut store = TaskStore::load(memory());

    let id = store.add(TaskDraft::new("Buy milk"));
    assert_eq!(store.len(), 1);
    assert_eq!(store.get(id).unwrap().priority, Priority::Medium);

    assert!(store.delete(id));
    assert!(store.is_empty());
    assert!(!store.delete(id));
}

#[test]
fn update_unknown_id_is_a_noop_and_writes_nothing() {
    let storage = memory();
    let mut store = TaskStore::load(Rc::clone(&storage));

    let patch = TaskPatch {
        title: Some("Renamed".to_string()),
        ..TaskPatch::default()
    };
    assert!(!store.update(new_id(), patch));
    assert!(storage.get(TASKS_KEY).unwrap().is_none());
}

#[test]
fn update_merges_only_set_fields() {
    let mut store = TaskStore::load(memory());
    let id = store.add(
        TaskDraft::new("Essay")
            .with_category("school")
            .with_due_date(date(2024, 3, 1)),
    );

    let patch = TaskPatch {
        priority: Some(Priority::High),
        due_date: Some(None),
        ..TaskPatch::default()
    };
    assert!(store.update(id, patch));

    let task = store.get(id).unwrap();
    assert_eq!(task.title, "Essay");
    assert_eq!(task.category, "school");
    assert_eq!(task.priority, Priority::High);
    assert_eq!(task.due_date, None);
    assert!(task.updated_at >= task.created_at);
}

#[test]
fn toggle_complete_sets_and_clears_completed_at() {
    let mut store = TaskStore::load(memory());
    let id = store.add(TaskDraft::new("Read chapter 4"));

    assert_eq!(store.toggle_complete(id), Some(true));
    assert!(store.get(id).unwrap().completed_at.is_some());

    assert_eq!(store.toggle_complete(id), Some(false));
    assert!(store.get(id).unwrap().completed_at.is_none());

    assert_eq!(store.toggle_complete(new_id()), None);
}

#[test]
fn subtasks_toggle_and_remove() {
    let mut store = TaskStore::load(memory());
    let id = store.add(TaskDraft::new("Lab report"));

    let intro = store.add_subtask(id, "Intro").unwrap();
    let _method = store.add_subtask(id, "Method").unwrap();
    assert_eq!(store.add_subtask(id, "   "), None);

    assert_eq!(store.toggle_subtask(id, intro), Some(true));
    assert_eq!(store.get(id).unwrap().subtask_progress(), (1, 2));

    assert!(store.remove_subtask(id, intro));
    assert_eq!(store.get(id).unwrap().subtask_progress(), (0, 1));
    assert!(!store.remove_subtask(id, intro));
}

#[test]
fn queries_sort_and_filter_without_mutation() {
    let mut store = TaskStore::load(memory());
    let today = date(2024, 5, 10);

    let undated = store.add(TaskDraft::new("Someday"));
    let late = store.add(TaskDraft::new("Late").with_due_date(date(2024, 5, 8)));
    let due = store.add(
        TaskDraft::new("Due today")
            .with_due_date(today)
            .with_priority(Priority::High),
    );
    let done = store.add(TaskDraft::new("Finished").with_due_date(date(2024, 5, 1)));
    store.toggle_complete(done);

    let by_due: Vec<_> = store
        .query(&TaskQuery::default())
        .iter()
        .map(|task| task.id)
        .collect();
    assert_eq!(by_due, vec![done, late, due, undated]);

    let by_priority = store.query(&TaskQuery {
        sort: TaskSort::Priority,
        completed: Some(false),
        ..TaskQuery::default()
    });
    assert_eq!(by_priority[0].id, due);
    assert_eq!(by_priority.len(), 3);

    assert_eq!(store.due_today(today).len(), 1);
    let overdue: Vec<_> = store.overdue(today).iter().map(|task| task.id).collect();
    assert_eq!(overdue, vec![late]);

    let stats = store.stats(today);
    assert_eq!((stats.total, stats.completed, stats.overdue), (4, 1, 1));
    assert_eq!(stats.completion_percent(), 25);

    let text = store.query(&TaskQuery {
        text: Some("LATE".to_string()),
        ..TaskQuery::default()
    });
    assert_eq!(text.len(), 1);
}

#[test]
fn clear_completed_removes_only_completed() {
    let mut store = TaskStore::load(memory());
    let keep = store.add(TaskDraft::new("Keep"));
    let drop_id = store.add(TaskDraft::new("Drop"));
    store.toggle_complete(drop_id);

    assert_eq!(store.clear_completed(), 1);
    assert_eq!(store.clear_completed(), 0);
    assert_eq!(store.tasks().len(), 1);
    assert_eq!(store.tasks()[0].id, keep);
}

fn memory() -> SharedStorage {
    Rc::new(MemoryKeyValueStore::new())
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}
