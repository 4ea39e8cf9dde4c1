use chrono::{NaiveDate, TimeZone, Utc};
use daybook_core::model::growth::SessionMode;
use daybook_core::model::task::Priority;
use daybook_core::{AppliedAction, Category, Intent, ReplySource, Sender, Workspace};

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 11, 4).unwrap()
}

#[test]
fn task_request_creates_task_with_relative_due_date() {
    let mut workspace = Workspace::in_memory();

    let outcome = workspace
        .chat_on("add a task to buy milk tomorrow", today())
        .unwrap();

    let Some(AppliedAction::TaskCreated(id)) = outcome.applied else {
        panic!("expected a created task, got {:?}", outcome.applied);
    };
    let task = workspace.tasks().get(id).unwrap();
    assert_eq!(task.title, "buy milk");
    assert_eq!(task.due_date, NaiveDate::from_ymd_opt(2024, 11, 5));
    assert_eq!(task.priority, Priority::Medium);
    assert_eq!(outcome.reply.source, ReplySource::Template);
    assert!(outcome.reply.text.contains("buy milk"));
}

#[test]
fn urgent_task_request_sets_high_priority() {
    let mut workspace = Workspace::in_memory();

    let outcome = workspace
        .chat_on("create an urgent task to email the professor today", today())
        .unwrap();

    let Some(AppliedAction::TaskCreated(id)) = outcome.applied else {
        panic!("expected a created task");
    };
    let task = workspace.tasks().get(id).unwrap();
    assert_eq!(task.priority, Priority::High);
    assert_eq!(task.due_date, Some(today()));
}

#[test]
fn note_phrase_creates_note() {
    let mut workspace = Workspace::in_memory();

    let outcome = workspace
        .chat_on("take a note about the chemistry midterm moving to Friday", today())
        .unwrap();

    assert_eq!(outcome.reply.classification.category, Category::Note);
    let Some(AppliedAction::NoteCreated(id)) = outcome.applied else {
        panic!("expected a created note");
    };
    let note = workspace.notes().get(id).unwrap();
    assert!(note.content.contains("chemistry midterm"));
    assert_eq!(workspace.notes().len(), 1);
}

#[test]
fn focus_request_is_reported_without_store_change() {
    let mut workspace = Workspace::in_memory();

    let outcome = workspace.chat_on("start a pomodoro", today()).unwrap();

    assert_eq!(outcome.applied, Some(AppliedAction::FocusRequested));
    assert_eq!(outcome.reply.classification.intent, Intent::Start);
    assert!(workspace.tasks().is_empty());
    assert!(workspace.notes().is_empty());
}

#[test]
fn each_turn_appends_user_and_assistant_messages() {
    let mut workspace = Workspace::in_memory();

    workspace.chat_on("hello there", today()).unwrap();
    workspace.chat_on("what is recursion?", today()).unwrap();

    let messages = workspace.assistant().messages();
    assert_eq!(messages.len(), 4);
    assert_eq!(messages[0].sender, Sender::User);
    assert_eq!(messages[0].text, "hello there");
    assert_eq!(messages[1].sender, Sender::Assistant);
    assert_eq!(messages[1].intent, Some(Intent::Greeting));
    assert_eq!(messages[3].category, Some(Category::Coding));
    assert!(messages[3].text.contains("```"));
}

#[test]
fn blank_input_is_ignored() {
    let mut workspace = Workspace::in_memory();

    assert!(workspace.chat_on("   \n", today()).is_none());
    assert!(workspace.assistant().is_empty());
}

#[test]
fn completed_focus_countdown_is_recorded_as_session() {
    let mut workspace = Workspace::in_memory();
    let mut timer = workspace.focus_timer();
    assert_eq!(timer.remaining_secs(), 25 * 60);

    timer.start();
    let mut event = None;
    while event.is_none() {
        event = timer.tick();
    }
    let event = event.unwrap();
    assert_eq!(event.completed, SessionMode::Focus);
    assert_eq!(event.next, SessionMode::ShortBreak);

    let started = Utc.with_ymd_and_hms(2024, 11, 4, 9, 0, 0).unwrap();
    let ended = Utc.with_ymd_and_hms(2024, 11, 4, 9, 25, 0).unwrap();
    workspace.record_timer_event(&event, started, ended);

    assert_eq!(workspace.growth().focus_minutes_on(today()), 25);
    assert_eq!(workspace.growth().completed_focus_sessions_on(today()), 1);
}

#[test]
fn create_replies_confirm_even_with_coding_words() {
    let mut workspace = Workspace::in_memory();

    let outcome = workspace
        .chat_on("add a task to fetch the kids from school", today())
        .unwrap();
    assert!(matches!(outcome.applied, Some(AppliedAction::TaskCreated(_))));
    assert_eq!(outcome.reply.text, "Added \"fetch the kids from school\" to your tasks.");

    let outcome = workspace
        .chat_on("add a task to finish sorting laundry", today())
        .unwrap();
    assert_eq!(outcome.reply.text, "Added \"finish sorting laundry\" to your tasks.");

    let outcome = workspace
        .chat_on("make a note: push the git branch tonight", today())
        .unwrap();
    assert!(matches!(outcome.applied, Some(AppliedAction::NoteCreated(_))));
    assert!(!outcome.reply.text.contains("```"));
    assert!(outcome.reply.text.contains("push the git branch tonight"));
}
