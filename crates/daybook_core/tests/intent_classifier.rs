use daybook_core::assistant::intent::{
    classify, ENTITY_CONTENT, ENTITY_DUE, ENTITY_PRIORITY, ENTITY_TITLE, ENTITY_TOPIC,
};
use daybook_core::{Category, Intent};

#[test]
fn add_a_task_is_create_task() {
    let result = classify("add a task to buy milk");

    assert_eq!(result.intent, Intent::Create);
    assert_eq!(result.category, Category::Task);
    assert_eq!(result.entity(ENTITY_TITLE), Some("buy milk"));
    assert_eq!(result.entity(ENTITY_DUE), None);
}

#[test]
fn what_is_binary_search_is_a_coding_query() {
    let result = classify("what is binary search");

    assert_eq!(result.intent, Intent::GeneralQuery);
    assert_eq!(result.category, Category::Coding);
    assert_eq!(result.entity(ENTITY_TOPIC), Some("binary search"));
}

#[test]
fn plain_question_is_general_query() {
    let result = classify("Why is the sky blue?");

    assert_eq!(result.intent, Intent::GeneralQuery);
    assert_eq!(result.category, Category::General);
}

#[test]
fn note_phrases_capture_content() {
    for input in [
        "take a note: quiz on Friday covers chapters 3-5",
        "jot down quiz on Friday covers chapters 3-5",
        "remember that quiz on Friday covers chapters 3-5",
    ] {
        let result = classify(input);
        assert_eq!(result.intent, Intent::Create, "{input}");
        assert_eq!(result.category, Category::Note, "{input}");
        assert_eq!(
            result.entity(ENTITY_CONTENT),
            Some("quiz on Friday covers chapters 3-5"),
            "{input}"
        );
    }
}

#[test]
fn verb_noun_pairs_map_to_intents() {
    let cases = [
        ("show my tasks", Intent::List, Category::Task),
        ("mark the essay task done", Intent::Complete, Category::Task),
        ("delete that reminder", Intent::Delete, Category::Task),
        ("list my notes", Intent::List, Category::Note),
        ("begin a focus session", Intent::Start, Category::Focus),
        ("create a habit to meditate", Intent::Create, Category::Habit),
        ("set up a goal to learn French", Intent::Create, Category::Goal),
    ];
    for (input, intent, category) in cases {
        let result = classify(input);
        assert_eq!((result.intent, result.category), (intent, category), "{input}");
    }
}

#[test]
fn priority_and_due_entities() {
    let result = classify("add an important task to email the professor today");

    assert_eq!(result.entity(ENTITY_TITLE), Some("email the professor"));
    assert_eq!(result.entity(ENTITY_DUE), Some("today"));
    assert_eq!(result.entity(ENTITY_PRIORITY), Some("high"));
}

#[test]
fn greeting_and_unknown() {
    assert_eq!(classify("hey there").intent, Intent::Greeting);
    assert_eq!(classify("good morning!").intent, Intent::Greeting);

    let unknown = classify("banana");
    assert_eq!(unknown.intent, Intent::Unknown);
    assert_eq!(unknown.category, Category::General);
    assert!(unknown.confidence < classify("hey there").confidence);
}

#[test]
fn blank_input_has_zero_confidence() {
    let result = classify("   ");
    assert_eq!(result.intent, Intent::Unknown);
    assert_eq!(result.confidence, 0.0);
    assert!(result.entities.is_empty());
}

#[test]
fn bare_sort_is_a_coding_keyword() {
    let result = classify("how do I sort a list");

    assert_eq!(result.intent, Intent::GeneralQuery);
    assert_eq!(result.category, Category::Coding);
    assert_eq!(result.entity(ENTITY_TOPIC), Some("sort"));

    // "sorting" alone stays out of the coding rule.
    assert_eq!(classify("add a task to finish sorting laundry").category, Category::Task);
}
