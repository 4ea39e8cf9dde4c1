//! Rule-based intent classifier.
//!
//! # Responsibility
//! - Map one line of free text to `(intent, category, confidence, entities)`.
//!
//! # Invariants
//! - Rules run in a fixed order and the first match wins:
//!   note phrase, coding keyword, question prefix, verb + noun, greeting.
//! - Classification is pure and deterministic.

use crate::model::message::{Category, Intent};
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeMap;

pub const ENTITY_TITLE: &str = "title";
pub const ENTITY_CONTENT: &str = "content";
pub const ENTITY_TOPIC: &str = "topic";
pub const ENTITY_DUE: &str = "due";
pub const ENTITY_PRIORITY: &str = "priority";

const NOTE_PHRASE_CONFIDENCE: f32 = 0.9;
const CODING_CONFIDENCE: f32 = 0.8;
const QUESTION_CONFIDENCE: f32 = 0.6;
const VERB_NOUN_CONFIDENCE: f32 = 0.85;
const GREETING_CONFIDENCE: f32 = 0.7;
const UNKNOWN_CONFIDENCE: f32 = 0.2;
const NOTE_TITLE_MAX_CHARS: usize = 60;

static NOTE_PHRASE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)\b(?:(?:create|make|take|add|write|save|start)\s+(?:a\s+|an\s+)?(?:new\s+|quick\s+)?note|jot\s+(?:this\s+|that\s+)?down|note\s+(?:this\s+|that\s+)?down|remember\s+that)\b[\s:,\-]*(?P<body>.*)$",
    )
    .expect("valid note phrase regex")
});
static NOTE_BODY_CONNECTOR_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^(?:about|that|saying|titled|called|named|on|to)\s+")
        .expect("valid note connector regex")
});
static CODING_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)\b(binary search|linked lists?|hash ?maps?|data structures?|time complexity|big[- ]o|sorting algorithms?|quick ?sort|merge ?sort|bubble ?sort|sort|recursion|recursive|algorithms?|regular expressions?|regex|sql|api|endpoints?|javascript|typescript|python|rust|java|html|css|react|git|compiler?|syntax error|debug(?:ging)?|bugs?|functions?|programming|coding|code)\b",
    )
    .expect("valid coding keyword regex")
});
static QUESTION_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^\s*(?:what|how|why|when|where|who|which|can|could|should|would|is|are|do|does|explain)\b")
        .expect("valid question regex")
});
static GREETING_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^\s*(?:hi|hello|hey|yo|good\s+(?:morning|afternoon|evening))\b")
        .expect("valid greeting regex")
});
static CREATE_VERB_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(?:add|create|make|new|schedule|set\s+up|plan)\b").expect("valid create regex")
});
static COMPLETE_VERB_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(?:complete|finish|finished|done|mark|check\s+off|tick\s+off)\b")
        .expect("valid complete regex")
});
static DELETE_VERB_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(?:delete|remove|cancel|drop)\b").expect("valid delete regex")
});
static LIST_VERB_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(?:show|list|view|display|see)\b").expect("valid list regex")
});
static START_VERB_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(?:start|begin|launch)\b").expect("valid start regex")
});
static TASK_NOUN_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(?:tasks?|todos?|to-dos?|reminders?)\b").expect("valid task noun regex")
});
static NOTE_NOUN_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\bnotes?\b").expect("valid note noun regex"));
static FOCUS_NOUN_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(?:focus|pomodoros?|timers?)\b").expect("valid focus noun regex")
});
static HABIT_NOUN_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\bhabits?\b").expect("valid habit noun regex"));
static GOAL_NOUN_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\bgoals?\b").expect("valid goal noun regex"));
static TITLE_AFTER_NOUN_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)\b(?:tasks?|todos?|to-dos?|reminders?|notes?|habits?|goals?)\b[\s:,\-]*(?:to\s+|for\s+|of\s+|called\s+|named\s+|titled\s+|that\s+)?(?P<title>.+)$",
    )
    .expect("valid title regex")
});
static DUE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\s*\b(?:(?:by|on|for|due)\s+)?(?P<due>today|tonight|tomorrow)\b[.!]?\s*$")
        .expect("valid due regex")
});
static HIGH_PRIORITY_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(?:urgent|urgently|important|asap|high\s+priority)\b")
        .expect("valid high priority regex")
});
static LOW_PRIORITY_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(?:low\s+priority|whenever|someday)\b").expect("valid low priority regex")
});

/// Result of classifying one input line.
#[derive(Debug, Clone, PartialEq)]
pub struct Classification {
    pub intent: Intent,
    pub category: Category,
    pub confidence: f32,
    pub entities: BTreeMap<String, String>,
}

impl Classification {
    fn new(intent: Intent, category: Category, confidence: f32) -> Self {
        Self {
            intent,
            category,
            confidence,
            entities: BTreeMap::new(),
        }
    }

    fn with_entity(mut self, key: &str, value: impl Into<String>) -> Self {
        let value = value.into();
        if !value.trim().is_empty() {
            self.entities.insert(key.to_string(), value.trim().to_string());
        }
        self
    }

    pub fn entity(&self, key: &str) -> Option<&str> {
        self.entities.get(key).map(String::as_str)
    }
}

/// Classifies one line of free text.
pub fn classify(input: &str) -> Classification {
    let text = input.trim();
    if text.is_empty() {
        return Classification::new(Intent::Unknown, Category::General, 0.0);
    }

    if let Some(classification) = classify_note_phrase(text) {
        return classification;
    }

    if let Some(caps) = CODING_RE.captures(text) {
        return Classification::new(Intent::GeneralQuery, Category::Coding, CODING_CONFIDENCE)
            .with_entity(ENTITY_TOPIC, caps[1].to_lowercase());
    }

    if QUESTION_RE.is_match(text) {
        return Classification::new(Intent::GeneralQuery, Category::General, QUESTION_CONFIDENCE);
    }

    if let Some(classification) = classify_verb_noun(text) {
        return classification;
    }

    if GREETING_RE.is_match(text) {
        return Classification::new(Intent::Greeting, Category::General, GREETING_CONFIDENCE);
    }

    Classification::new(Intent::Unknown, Category::General, UNKNOWN_CONFIDENCE)
}

fn classify_note_phrase(text: &str) -> Option<Classification> {
    let caps = NOTE_PHRASE_RE.captures(text)?;
    let body = caps.name("body").map_or("", |m| m.as_str()).trim();
    let content = NOTE_BODY_CONNECTOR_RE.replace(body, "").trim().to_string();
    let title = note_title(&content);

    Some(
        Classification::new(Intent::Create, Category::Note, NOTE_PHRASE_CONFIDENCE)
            .with_entity(ENTITY_TITLE, title)
            .with_entity(ENTITY_CONTENT, content),
    )
}

fn note_title(content: &str) -> String {
    let first_line = content.lines().next().unwrap_or("").trim();
    let mut title: String = first_line.chars().take(NOTE_TITLE_MAX_CHARS).collect();
    if first_line.chars().count() > NOTE_TITLE_MAX_CHARS {
        title.push_str("...");
    }
    title
}

fn classify_verb_noun(text: &str) -> Option<Classification> {
    let category = if TASK_NOUN_RE.is_match(text) {
        Category::Task
    } else if NOTE_NOUN_RE.is_match(text) {
        Category::Note
    } else if FOCUS_NOUN_RE.is_match(text) {
        Category::Focus
    } else if HABIT_NOUN_RE.is_match(text) {
        Category::Habit
    } else if GOAL_NOUN_RE.is_match(text) {
        Category::Goal
    } else {
        return None;
    };

    let intent = if CREATE_VERB_RE.is_match(text) {
        Intent::Create
    } else if COMPLETE_VERB_RE.is_match(text) {
        Intent::Complete
    } else if DELETE_VERB_RE.is_match(text) {
        Intent::Delete
    } else if LIST_VERB_RE.is_match(text) {
        Intent::List
    } else if START_VERB_RE.is_match(text) {
        Intent::Start
    } else {
        return None;
    };

    let mut classification = Classification::new(intent, category, VERB_NOUN_CONFIDENCE);
    if intent == Intent::Create {
        classification = with_create_entities(classification, text);
    }
    Some(classification)
}

fn with_create_entities(classification: Classification, text: &str) -> Classification {
    let mut title = TITLE_AFTER_NOUN_RE
        .captures(text)
        .and_then(|caps| caps.name("title"))
        .map_or(String::new(), |m| m.as_str().trim().to_string());

    let due = DUE_RE.captures(&title).and_then(|caps| {
        caps.name("due").map(|m| match m.as_str().to_lowercase().as_str() {
            "tomorrow" => "tomorrow",
            _ => "today",
        })
    });
    if due.is_some() {
        title = DUE_RE.replace(&title, "").trim().to_string();
    }

    let priority = if HIGH_PRIORITY_RE.is_match(text) {
        Some("high")
    } else if LOW_PRIORITY_RE.is_match(text) {
        Some("low")
    } else {
        None
    };

    let title = title.trim_end_matches(['.', '!']).trim().to_string();
    let mut classification = classification.with_entity(ENTITY_TITLE, title);
    if let Some(due) = due {
        classification = classification.with_entity(ENTITY_DUE, due);
    }
    if let Some(priority) = priority {
        classification = classification.with_entity(ENTITY_PRIORITY, priority);
    }
    classification
}
