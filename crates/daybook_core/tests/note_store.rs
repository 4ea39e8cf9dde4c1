use chrono::{NaiveDate, TimeZone, Utc};
use daybook_core::model::note::{NoteDraft, NotePatch};
use daybook_core::model::new_id;
use daybook_core::storage::{MemoryKeyValueStore, SharedStorage};
use daybook_core::store::note_store::{NoteQuery, NoteStore};
use std::rc::Rc;

#[test]
fn tags_are_normalized_on_add_and_set() {
    let mut store = NoteStore::load(memory());
    let id = store.add(NoteDraft::new("Graphs", "BFS and DFS").with_tags(&["#CS", "cs", " Algo "]));

    assert_eq!(store.get(id).unwrap().tags, vec!["algo".to_string(), "cs".to_string()]);

    assert!(store.set_tags(id, &["Exam".to_string(), "".to_string()]));
    assert_eq!(store.get(id).unwrap().tags, vec!["exam".to_string()]);
    assert_eq!(store.tags(), vec!["exam".to_string()]);
}

#[test]
fn update_unknown_note_is_noop() {
    let mut store = NoteStore::load(memory());
    let patch = NotePatch {
        content: Some("x".to_string()),
        ..NotePatch::default()
    };
    assert!(!store.update(new_id(), patch));
}

#[test]
fn bidirectional_link_is_mirrored_and_unlink_removes_both() {
    let mut store = NoteStore::load(memory());
    let a = store.add(NoteDraft::new("A", ""));
    let b = store.add(NoteDraft::new("B", ""));

    assert!(store.link(a, b, true));
    assert!(store.get(a).unwrap().links_to(b));
    assert!(store.get(b).unwrap().links_to(a));
    assert_eq!(store.backlinks(a).len(), 1);

    assert!(store.unlink(a, b));
    assert!(store.get(a).unwrap().links.is_empty());
    assert!(store.get(b).unwrap().links.is_empty());
    assert!(!store.unlink(a, b));
}

#[test]
fn self_links_missing_targets_and_duplicates_are_ignored() {
    let mut store = NoteStore::load(memory());
    let a = store.add(NoteDraft::new("A", ""));
    let b = store.add(NoteDraft::new("B", ""));

    assert!(!store.link(a, a, false));
    assert!(!store.link(a, new_id(), false));

    assert!(store.link(a, b, false));
    assert!(!store.link(a, b, false));
    assert!(!store.get(b).unwrap().links_to(a));

    // A later bidirectional link upgrades the existing one.
    assert!(store.link(a, b, true));
    assert_eq!(store.get(a).unwrap().links.len(), 1);
    assert!(store.get(a).unwrap().links[0].bidirectional);
    assert!(store.get(b).unwrap().links_to(a));
}

#[test]
fn delete_cascades_links_pointing_at_deleted_note() {
    let mut store = NoteStore::load(memory());
    let a = store.add(NoteDraft::new("A", ""));
    let b = store.add(NoteDraft::new("B", ""));
    let c = store.add(NoteDraft::new("C", ""));
    store.link(a, b, false);
    store.link(c, b, true);

    assert!(store.delete(b));
    assert!(store.get(a).unwrap().links.is_empty());
    assert!(store.get(c).unwrap().links.is_empty());
    assert!(store.backlinks(b).is_empty());
}

#[test]
fn listing_puts_pinned_first_and_hides_archived() {
    let mut store = NoteStore::load(memory());
    let plain = store.add(NoteDraft::new("Plain", "lecture notes"));
    let pinned = store.add(NoteDraft::new("Pinned", "todo"));
    let archived = store.add(NoteDraft::new("Old", "lecture archive"));
    store.toggle_pin(pinned);
    assert_eq!(store.toggle_archive(archived), Some(true));

    let ids: Vec<_> = store.query(&NoteQuery::default()).iter().map(|n| n.id).collect();
    assert_eq!(ids, vec![pinned, plain]);

    let search = store.query(&NoteQuery {
        text: Some("LECTURE".to_string()),
        include_archived: true,
        ..NoteQuery::default()
    });
    assert_eq!(search.len(), 2);
}

#[test]
fn sm2_passing_review_on_interval_one_moves_to_six() {
    let mut store = NoteStore::load(memory());
    let id = store.add(NoteDraft::new("Flashcard", "mitochondria"));
    let today = date(2024, 9, 1);
    assert!(store.enable_review(id, today));
    assert!(!store.enable_review(id, today));
    assert_eq!(store.due_for_review(today).len(), 1);

    let interval = store.review(id, 4, at(2024, 9, 1)).unwrap();
    assert_eq!(interval, 6);

    let schedule = store.get(id).unwrap().review.clone().unwrap();
    assert_eq!(schedule.repetitions, 1);
    assert_eq!(schedule.next_review, date(2024, 9, 7));
    assert_eq!(schedule.history.len(), 1);
    assert!(store.due_for_review(today).is_empty());
    assert_eq!(store.due_for_review(date(2024, 9, 7)).len(), 1);
}

#[test]
fn sm2_failing_review_resets_interval() {
    let mut store = NoteStore::load(memory());
    let id = store.add(NoteDraft::new("Flashcard", "krebs cycle"));

    // First review creates the schedule.
    assert_eq!(store.review(id, 5, at(2024, 9, 1)), Some(6));
    assert_eq!(store.review(id, 5, at(2024, 9, 7)), Some(16));
    assert_eq!(store.review(id, 2, at(2024, 9, 24)), Some(1));

    let schedule = store.get(id).unwrap().review.clone().unwrap();
    assert_eq!(schedule.repetitions, 0);
    assert!(schedule.ease_factor >= 1.3);
    assert_eq!(store.review(new_id(), 4, at(2024, 9, 24)), None);
}

fn memory() -> SharedStorage {
    Rc::new(MemoryKeyValueStore::new())
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn at(y: i32, m: u32, d: u32) -> chrono::DateTime<Utc> {
    Utc.with_ymd_and_hms(y, m, d, 9, 0, 0).unwrap()
}
