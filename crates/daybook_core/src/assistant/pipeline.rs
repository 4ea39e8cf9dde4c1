//! Assistant resolution pipeline.
//!
//! # Responsibility
//! - Classify one input line and produce the reply text for it.
//! - Walk configured providers and their model fallback lists in order.
//! - Derive the suggested action a caller may apply to the stores.
//!
//! # Invariants
//! - `resolve` never fails; the terminal remote fallback is [`APOLOGY`].
//! - Only the last [`HISTORY_TURNS`] messages are forwarded to a provider.
//! - The first model that answers is cached per provider and tried first
//!   on the next request.

use super::intent::{
    classify, Classification, ENTITY_CONTENT, ENTITY_DUE, ENTITY_PRIORITY, ENTITY_TITLE,
};
use super::provider::{
    ChatPrompt, ChatTransport, HttpTransport, PromptTurn, ProviderConfig, ProviderKind, Role,
};
use super::templates::template_reply;
use crate::model::message::{Category, Intent, Message, Sender};
use crate::model::task::Priority;
use crate::storage::{load_json, preferred_model_key, save_json, SharedStorage};
use chrono::{Days, NaiveDate};
use log::{debug, info, warn};
use std::cell::Cell;
use std::time::Duration;

pub const APOLOGY: &str =
    "Sorry, I couldn't reach the assistant service right now. Please try again in a moment.";
pub const HISTORY_TURNS: usize = 5;
const DEFAULT_NOTE_TITLE: &str = "Quick note";

const CODING_SYSTEM_PROMPT: &str = "You are a patient programming tutor for students. Explain concepts step by step, include short examples in fenced markdown code blocks, and mention time and space complexity when it matters.";
const PRODUCTIVITY_SYSTEM_PROMPT: &str = "You are a friendly productivity coach inside a study planner. Give short, practical advice about tasks, focus sessions, habits, and goals. Prefer concrete next steps over general motivation.";
const NOTE_SYSTEM_PROMPT: &str = "You are a note-taking assistant. Help the student capture, summarize, and organize ideas. Answer in concise markdown with headings or bullet points when useful.";
const GENERAL_SYSTEM_PROMPT: &str = "You are a helpful study and productivity assistant. Answer clearly and concisely in markdown.";

/// Coarse per-request lifecycle, observable between calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolveStage {
    Idle,
    Classifying,
    Responding,
}

/// Relative due date mentioned in a create-task request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DueHint {
    Today,
    Tomorrow,
}

impl DueHint {
    fn parse(value: &str) -> Option<Self> {
        match value {
            "today" => Some(Self::Today),
            "tomorrow" => Some(Self::Tomorrow),
            _ => None,
        }
    }

    pub fn resolve(self, today: NaiveDate) -> NaiveDate {
        match self {
            Self::Today => today,
            Self::Tomorrow => today.checked_add_days(Days::new(1)).unwrap_or(today),
        }
    }
}

/// Store mutation suggested by a classified input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssistantAction {
    CreateTask {
        title: String,
        due: Option<DueHint>,
        priority: Option<Priority>,
    },
    CreateNote {
        title: String,
        content: String,
    },
    StartFocus,
}

impl AssistantAction {
    pub fn from_classification(classification: &Classification) -> Option<Self> {
        match (classification.intent, classification.category) {
            (Intent::Create, Category::Task) => {
                let title = classification.entity(ENTITY_TITLE)?.to_string();
                Some(Self::CreateTask {
                    title,
                    due: classification.entity(ENTITY_DUE).and_then(DueHint::parse),
                    priority: classification.entity(ENTITY_PRIORITY).and_then(Priority::parse),
                })
            }
            (Intent::Create, Category::Note) => {
                let content = classification.entity(ENTITY_CONTENT).unwrap_or("").to_string();
                let title = classification
                    .entity(ENTITY_TITLE)
                    .unwrap_or(DEFAULT_NOTE_TITLE)
                    .to_string();
                Some(Self::CreateNote { title, content })
            }
            (Intent::Start, Category::Focus) => Some(Self::StartFocus),
            _ => None,
        }
    }
}

/// Where the reply text came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplySource {
    Remote { provider: ProviderKind, model: String },
    Template,
    Apology,
}

#[derive(Debug, Clone)]
pub struct AssistantReply {
    pub text: String,
    pub classification: Classification,
    pub source: ReplySource,
    pub action: Option<AssistantAction>,
}

pub struct AssistantPipeline {
    providers: Vec<ProviderConfig>,
    transport: Box<dyn ChatTransport>,
    storage: SharedStorage,
    stage: Cell<ResolveStage>,
}

impl AssistantPipeline {
    pub fn new(
        providers: Vec<ProviderConfig>,
        transport: Box<dyn ChatTransport>,
        storage: SharedStorage,
    ) -> Self {
        let providers: Vec<ProviderConfig> = providers
            .into_iter()
            .filter(|provider| !provider.api_key.trim().is_empty() && !provider.models.is_empty())
            .collect();
        info!(
            "event=assistant_init module=assistant status=ok providers={}",
            providers.len()
        );
        Self {
            providers,
            transport,
            storage,
            stage: Cell::new(ResolveStage::Idle),
        }
    }

    /// Builds a pipeline with the blocking HTTP transport.
    pub fn with_http(providers: Vec<ProviderConfig>, timeout: Duration, storage: SharedStorage) -> Self {
        Self::new(providers, Box::new(HttpTransport::new(timeout)), storage)
    }

    /// Template-only pipeline.
    pub fn offline(storage: SharedStorage) -> Self {
        Self::with_http(Vec::new(), Duration::from_secs(1), storage)
    }

    pub fn has_remote(&self) -> bool {
        !self.providers.is_empty()
    }

    pub fn stage(&self) -> ResolveStage {
        self.stage.get()
    }

    /// Produces the reply for `input` given prior conversation `history`.
    ///
    /// `history` must not include `input` itself.
    pub fn resolve(&self, input: &str, history: &[Message]) -> AssistantReply {
        self.stage.set(ResolveStage::Classifying);
        let classification = classify(input);
        debug!(
            "event=assistant_classify module=assistant status=ok intent={} category={} confidence={:.2}",
            classification.intent.as_str(),
            classification.category.as_str(),
            classification.confidence
        );

        self.stage.set(ResolveStage::Responding);
        let (text, source) = if self.has_remote() {
            let prompt = build_prompt(input, &classification, history);
            match self.complete_remote(&prompt) {
                Some((provider, model, text)) => (text, ReplySource::Remote { provider, model }),
                None => (APOLOGY.to_string(), ReplySource::Apology),
            }
        } else {
            (template_reply(input, &classification), ReplySource::Template)
        };

        let action = AssistantAction::from_classification(&classification);
        self.stage.set(ResolveStage::Idle);
        AssistantReply {
            text,
            classification,
            source,
            action,
        }
    }

    /// Model order for one provider: cached preferred model first.
    pub fn model_order(&self, provider: &ProviderConfig) -> Vec<String> {
        let mut models = provider.models.clone();
        if let Some(preferred) = self.preferred_model(provider.kind) {
            if let Some(index) = models.iter().position(|model| *model == preferred) {
                let model = models.remove(index);
                models.insert(0, model);
            }
        }
        models
    }

    pub fn preferred_model(&self, kind: ProviderKind) -> Option<String> {
        load_json::<String>(self.storage.as_ref(), &preferred_model_key(kind.id()))
    }

    fn complete_remote(&self, prompt: &ChatPrompt) -> Option<(ProviderKind, String, String)> {
        for provider in &self.providers {
            for model in self.model_order(provider) {
                match provider.complete(self.transport.as_ref(), &model, prompt) {
                    Ok(text) => {
                        info!(
                            "event=assistant_remote module=assistant status=ok provider={} model={model}",
                            provider.kind.id()
                        );
                        self.remember_model(provider.kind, &model);
                        return Some((provider.kind, model, text));
                    }
                    Err(err) => {
                        warn!(
                            "event=assistant_remote module=assistant status=error provider={} model={model} error_code={}",
                            provider.kind.id(),
                            err.code()
                        );
                    }
                }
            }
        }
        warn!("event=assistant_remote module=assistant status=error error_code=all_models_failed");
        None
    }

    fn remember_model(&self, kind: ProviderKind, model: &str) {
        if self.preferred_model(kind).as_deref() == Some(model) {
            return;
        }
        save_json(self.storage.as_ref(), &preferred_model_key(kind.id()), model);
    }
}

fn system_prompt(category: Category) -> &'static str {
    match category {
        Category::Coding => CODING_SYSTEM_PROMPT,
        Category::Task | Category::Focus | Category::Habit | Category::Goal => {
            PRODUCTIVITY_SYSTEM_PROMPT
        }
        Category::Note => NOTE_SYSTEM_PROMPT,
        Category::General => GENERAL_SYSTEM_PROMPT,
    }
}

fn build_prompt(input: &str, classification: &Classification, history: &[Message]) -> ChatPrompt {
    let start = history.len().saturating_sub(HISTORY_TURNS);
    let mut turns: Vec<PromptTurn> = history[start..]
        .iter()
        .map(|message| {
            let role = match message.sender {
                Sender::User => Role::User,
                Sender::Assistant => Role::Assistant,
            };
            PromptTurn::new(role, message.text.clone())
        })
        .collect();
    turns.push(PromptTurn::new(Role::User, input.trim()));

    ChatPrompt {
        system: system_prompt(classification.category).to_string(),
        turns,
    }
}

#[cfg(test)]
mod tests {
    use super::{
        build_prompt, AssistantAction, AssistantPipeline, DueHint, ReplySource, APOLOGY, HISTORY_TURNS,
    };
    use crate::assistant::intent::classify;
    use crate::assistant::provider::{HttpTransport, ProviderConfig};
    use crate::storage::{MemoryKeyValueStore, SharedStorage};
    use std::rc::Rc;
    use crate::model::message::{Message, Sender};
    use crate::model::task::Priority;
    use chrono::{NaiveDate, Utc};

    #[test]
    fn prompt_keeps_last_history_turns() {
        let history: Vec<Message> = (0..8)
            .map(|i| {
                let sender = if i % 2 == 0 { Sender::User } else { Sender::Assistant };
                Message::new(sender, format!("turn {i}"), Utc::now())
            })
            .collect();
        let prompt = build_prompt("what is sql", &classify("what is sql"), &history);

        assert_eq!(prompt.turns.len(), HISTORY_TURNS + 1);
        assert_eq!(prompt.turns[0].content, "turn 3");
        assert_eq!(prompt.turns[HISTORY_TURNS].content, "what is sql");
        assert!(prompt.system.contains("programming tutor"));
    }

    #[test]
    fn create_task_action_carries_due_and_priority() {
        let action = AssistantAction::from_classification(&classify(
            "add an urgent task to call the bank tomorrow",
        ));
        assert_eq!(
            action,
            Some(AssistantAction::CreateTask {
                title: "call the bank".to_string(),
                due: Some(DueHint::Tomorrow),
                priority: Some(Priority::High),
            })
        );
    }

    #[test]
    fn due_hint_resolves_relative_to_today() {
        let today = NaiveDate::from_ymd_opt(2024, 2, 28).unwrap();
        assert_eq!(DueHint::Today.resolve(today), today);
        assert_eq!(
            DueHint::Tomorrow.resolve(today),
            NaiveDate::from_ymd_opt(2024, 2, 29).unwrap()
        );
    }

    #[test]
    fn questions_suggest_no_action() {
        assert_eq!(AssistantAction::from_classification(&classify("how are you?")), None);
    }

    #[test]
    fn unusable_http_client_ends_in_apology() {
        let storage: SharedStorage = Rc::new(MemoryKeyValueStore::new());
        let pipeline = AssistantPipeline::new(
            vec![ProviderConfig::openai("sk-test").with_models(vec!["m-1".to_string()])],
            Box::new(HttpTransport::unavailable("tls backend missing")),
            storage,
        );

        let reply = pipeline.resolve("what is recursion", &[]);
        assert_eq!(reply.source, ReplySource::Apology);
        assert_eq!(reply.text, APOLOGY);
    }
}
