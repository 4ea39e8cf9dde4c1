use chrono::{NaiveDate, TimeZone, Utc};
use daybook_core::model::growth::{
    HabitDraft, LearningGoalDraft, ProductivitySession, SessionMode, SkillDraft,
};
use daybook_core::model::new_id;
use daybook_core::storage::{MemoryKeyValueStore, SharedStorage};
use daybook_core::store::growth_store::GrowthStore;
use std::rc::Rc;

#[test]
fn daily_streak_grows_on_consecutive_days() {
    let mut store = GrowthStore::load(memory());
    let id = store.add_habit(HabitDraft::daily("Read 20 pages"));

    for (day, expected) in [(1, 1), (2, 2), (3, 3)] {
        assert_eq!(store.toggle_habit(id, date(2024, 4, day)), Some(true));
        assert_eq!(store.habit(id).unwrap().current_streak, expected);
    }
    assert_eq!(store.habit(id).unwrap().longest_streak, 3);
}

#[test]
fn skipped_day_resets_current_streak_to_one() {
    let mut store = GrowthStore::load(memory());
    let id = store.add_habit(HabitDraft::daily("Stretch"));
    store.toggle_habit(id, date(2024, 4, 1));
    store.toggle_habit(id, date(2024, 4, 2));

    store.toggle_habit(id, date(2024, 4, 4));

    let habit = store.habit(id).unwrap();
    assert_eq!(habit.current_streak, 1);
    assert_eq!(habit.longest_streak, 2);
}

#[test]
fn untoggling_recomputes_streaks() {
    let mut store = GrowthStore::load(memory());
    let id = store.add_habit(HabitDraft::daily("Water"));
    store.toggle_habit(id, date(2024, 4, 1));
    store.toggle_habit(id, date(2024, 4, 2));

    assert_eq!(store.toggle_habit(id, date(2024, 4, 2)), Some(false));
    assert_eq!(store.habit(id).unwrap().current_streak, 1);
    assert_eq!(store.toggle_habit(new_id(), date(2024, 4, 2)), None);
}

#[test]
fn weekly_habit_counts_consecutive_weeks() {
    let mut store = GrowthStore::load(memory());
    let id = store.add_habit(HabitDraft::weekly("Long run"));
    // Monday, then Sunday of the following week, then Wednesday after that.
    store.toggle_habit(id, date(2024, 4, 1));
    store.toggle_habit(id, date(2024, 4, 14));
    store.toggle_habit(id, date(2024, 4, 17));

    let habit = store.habit(id).unwrap();
    assert_eq!(habit.current_streak, 3);
    assert!(habit.is_completed_on(date(2024, 4, 19)));
    assert_eq!(store.habits_completed_on(date(2024, 4, 8)).len(), 1);
    assert!(store.habits_completed_on(date(2024, 4, 22)).is_empty());
}

#[test]
fn milestone_toggles_drive_goal_progress() {
    let mut store = GrowthStore::load(memory());
    let goal = store.add_goal(LearningGoalDraft {
        title: "Linear algebra".to_string(),
        ..LearningGoalDraft::default()
    });
    let vectors = store.add_milestone(goal, "Vectors").unwrap();
    let matrices = store.add_milestone(goal, "Matrices").unwrap();
    let eigen = store.add_milestone(goal, "Eigenvalues").unwrap();

    assert_eq!(store.toggle_milestone(goal, vectors), Some(33));
    assert_eq!(store.toggle_milestone(goal, matrices), Some(66));
    assert!(!store.goal(goal).unwrap().completed);
    assert_eq!(store.toggle_milestone(goal, eigen), Some(100));
    assert!(store.goal(goal).unwrap().completed);

    assert_eq!(store.toggle_milestone(goal, new_id()), None);
    assert!(store.delete_goal(goal));
    assert!(store.goals().is_empty());
}

#[test]
fn practice_hours_raise_level_and_ignore_bad_input() {
    let mut store = GrowthStore::load(memory());
    let id = store.add_skill(SkillDraft {
        name: "Piano".to_string(),
        category: "music".to_string(),
        target_hours: 40.0,
    });
    assert_eq!(store.skill(id).unwrap().level, 1);

    assert_eq!(store.log_practice(id, 12.0), Some(2));
    assert_eq!(store.skill(id).unwrap().progress, 30);
    assert_eq!(store.log_practice(id, -3.0), None);
    assert_eq!(store.log_practice(id, f64::NAN), None);

    assert_eq!(store.log_practice(id, 200.0), Some(10));
    assert_eq!(store.skill(id).unwrap().progress, 100);
}

#[test]
fn focus_minutes_sum_completed_focus_sessions_per_day() {
    let mut store = GrowthStore::load(memory());
    let day = date(2024, 6, 3);
    let start = Utc.with_ymd_and_hms(2024, 6, 3, 9, 0, 0).unwrap();
    let end = Utc.with_ymd_and_hms(2024, 6, 3, 9, 25, 0).unwrap();

    store.record_session(ProductivitySession::completed(SessionMode::Focus, 25, start, end));
    store.record_session(ProductivitySession::completed(SessionMode::Focus, 25, start, end));
    store.record_session(ProductivitySession::completed(SessionMode::ShortBreak, 5, start, end));

    assert_eq!(store.focus_minutes_on(day), 50);
    assert_eq!(store.completed_focus_sessions_on(day), 2);
    assert_eq!(store.focus_minutes_on(date(2024, 6, 4)), 0);
    assert_eq!(store.sessions().len(), 3);
}

fn memory() -> SharedStorage {
    Rc::new(MemoryKeyValueStore::new())
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}
