use chrono::NaiveDate;
use daybook_core::db::open_db;
use daybook_core::model::growth::HabitDraft;
use daybook_core::model::note::NoteDraft;
use daybook_core::model::task::{Priority, TaskDraft};
use daybook_core::storage::{
    KeyValueStore, MemoryKeyValueStore, SharedStorage, SqliteKeyValueStore, NOTES_KEY, TASKS_KEY,
};
use daybook_core::store::assistant_store::{AssistantStore, MAX_PERSISTED_MESSAGES};
use daybook_core::store::growth_store::GrowthStore;
use daybook_core::store::note_store::NoteStore;
use daybook_core::store::task_store::TaskStore;
use daybook_core::{AppConfig, Workspace};
use std::rc::Rc;

#[test]
fn sqlite_file_round_trip_reproduces_stores() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("daybook.sqlite3");

    let (task_id, note_id, habit_id) = {
        let storage: SharedStorage = Rc::new(SqliteKeyValueStore::new(open_db(&path).unwrap()));
        let mut tasks = TaskStore::load(Rc::clone(&storage));
        let mut notes = NoteStore::load(Rc::clone(&storage));
        let mut growth = GrowthStore::load(Rc::clone(&storage));

        let task_id = tasks.add(
            TaskDraft::new("Submit lab")
                .with_priority(Priority::High)
                .with_due_date(NaiveDate::from_ymd_opt(2024, 11, 2).unwrap()),
        );
        tasks.add_subtask(task_id, "Graphs");
        let note_id = notes.add(NoteDraft::new("Ohm's law", "V = IR").with_tags(&["physics"]));
        let habit_id = growth.add_habit(HabitDraft::daily("Flashcards"));
        growth.toggle_habit(habit_id, NaiveDate::from_ymd_opt(2024, 11, 1).unwrap());
        (task_id, note_id, habit_id)
    };

    let storage: SharedStorage = Rc::new(SqliteKeyValueStore::new(open_db(&path).unwrap()));
    let tasks = TaskStore::load(Rc::clone(&storage));
    let notes = NoteStore::load(Rc::clone(&storage));
    let growth = GrowthStore::load(Rc::clone(&storage));

    let task = tasks.get(task_id).unwrap();
    assert_eq!(task.priority, Priority::High);
    assert_eq!(task.subtasks.len(), 1);
    assert_eq!(notes.get(note_id).unwrap().tags, vec!["physics".to_string()]);
    assert_eq!(growth.habit(habit_id).unwrap().current_streak, 1);
}

#[test]
fn assistant_blob_keeps_only_last_fifty_messages() {
    let storage: SharedStorage = Rc::new(MemoryKeyValueStore::new());
    let mut store = AssistantStore::load(Rc::clone(&storage));
    for i in 0..60 {
        store.push_user(&format!("message {i}"));
    }
    assert_eq!(store.len(), 60);

    let reloaded = AssistantStore::load(storage);
    assert_eq!(reloaded.len(), MAX_PERSISTED_MESSAGES);
    assert_eq!(reloaded.messages()[0].text, "message 10");
    assert_eq!(reloaded.messages()[49].text, "message 59");
}

#[test]
fn malformed_blob_loads_as_empty_store() {
    let storage: SharedStorage = Rc::new(MemoryKeyValueStore::new());
    storage.set(TASKS_KEY, "{not json").unwrap();
    storage.set(NOTES_KEY, "[{\"id\": 42}]").unwrap();

    assert!(TaskStore::load(Rc::clone(&storage)).is_empty());
    assert!(NoteStore::load(Rc::clone(&storage)).is_empty());

    // The first mutation overwrites the malformed blob.
    let mut tasks = TaskStore::load(Rc::clone(&storage));
    tasks.add(TaskDraft::new("Fresh start"));
    assert_eq!(TaskStore::load(storage).len(), 1);
}

#[test]
fn workspace_open_creates_data_dir_and_persists() {
    let dir = tempfile::tempdir().unwrap();
    let config = AppConfig {
        data_dir: dir.path().join("nested").join("data"),
        ..AppConfig::default()
    };

    {
        let mut workspace = Workspace::open(&config).unwrap();
        workspace.tasks_mut().add(TaskDraft::new("Persist me"));
    }

    assert!(config.database_path().exists());
    let workspace = Workspace::open(&config).unwrap();
    assert_eq!(workspace.tasks().len(), 1);
    assert_eq!(workspace.tasks().tasks()[0].title, "Persist me");
}
