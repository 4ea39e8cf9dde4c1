//! Workspace facade wiring local storage, domain stores, and the assistant.
//!
//! # Responsibility
//! - Open local storage and load every store from it.
//! - Run one chat turn end to end: record, resolve, apply, record.
//!
//! # Invariants
//! - All stores share one storage handle.
//! - A chat turn appends exactly two messages, or none for blank input.

use crate::assistant::pipeline::{AssistantAction, AssistantPipeline, AssistantReply, HISTORY_TURNS};
use crate::config::{AppConfig, ConfigError};
use crate::db::{open_db, DbError};
use crate::model::growth::ProductivitySession;
use crate::model::note::{NoteDraft, NoteId};
use crate::model::task::{TaskDraft, TaskId};
use crate::model::{EntityId, Timestamp};
use crate::storage::{MemoryKeyValueStore, SharedStorage, SqliteKeyValueStore};
use crate::store::academic_store::AcademicStore;
use crate::store::assistant_store::AssistantStore;
use crate::store::growth_store::GrowthStore;
use crate::store::journal_store::JournalStore;
use crate::store::note_store::NoteStore;
use crate::store::research_store::ResearchStore;
use crate::store::task_store::TaskStore;
use crate::timer::{FocusTimer, TimerDurations, TimerEvent};
use chrono::{Local, NaiveDate};
use log::info;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::rc::Rc;

#[derive(Debug)]
pub enum WorkspaceError {
    Config(ConfigError),
    Db(DbError),
}

impl Display for WorkspaceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Config(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "failed to open local storage: {err}"),
        }
    }
}

impl Error for WorkspaceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Config(err) => Some(err),
            Self::Db(err) => Some(err),
        }
    }
}

impl From<ConfigError> for WorkspaceError {
    fn from(value: ConfigError) -> Self {
        Self::Config(value)
    }
}

impl From<DbError> for WorkspaceError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

/// Store change made while handling a chat turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppliedAction {
    TaskCreated(TaskId),
    NoteCreated(NoteId),
    /// The caller owns the timer; the facade only reports the request.
    FocusRequested,
}

#[derive(Debug, Clone)]
pub struct ChatOutcome {
    pub reply: AssistantReply,
    pub applied: Option<AppliedAction>,
}

pub struct Workspace {
    storage: SharedStorage,
    tasks: TaskStore,
    notes: NoteStore,
    assistant: AssistantStore,
    growth: GrowthStore,
    academic: AcademicStore,
    research: ResearchStore,
    journal: JournalStore,
    pipeline: AssistantPipeline,
    timer_durations: TimerDurations,
}

impl Workspace {
    /// Opens the SQLite local storage under the configured data directory.
    pub fn open(config: &AppConfig) -> Result<Self, WorkspaceError> {
        config.ensure_data_dir()?;
        let path = config.database_path();
        let conn = open_db(&path)?;
        let storage: SharedStorage = Rc::new(SqliteKeyValueStore::new(conn));
        let pipeline = AssistantPipeline::with_http(
            config.assistant.providers.clone(),
            config.assistant.http_timeout,
            Rc::clone(&storage),
        );
        info!(
            "event=workspace_open module=workspace status=ok providers={}",
            config.assistant.providers.len()
        );
        Ok(Self::from_parts(storage, pipeline, config.timer))
    }

    /// Ephemeral workspace with template-only replies.
    pub fn in_memory() -> Self {
        let storage: SharedStorage = Rc::new(MemoryKeyValueStore::new());
        let pipeline = AssistantPipeline::offline(Rc::clone(&storage));
        Self::from_parts(storage, pipeline, TimerDurations::default())
    }

    /// Loads every store from `storage`. `pipeline` should share the same
    /// storage so preferred models persist alongside the stores.
    pub fn from_parts(
        storage: SharedStorage,
        pipeline: AssistantPipeline,
        timer_durations: TimerDurations,
    ) -> Self {
        Self {
            tasks: TaskStore::load(Rc::clone(&storage)),
            notes: NoteStore::load(Rc::clone(&storage)),
            assistant: AssistantStore::load(Rc::clone(&storage)),
            growth: GrowthStore::load(Rc::clone(&storage)),
            academic: AcademicStore::load(Rc::clone(&storage)),
            research: ResearchStore::load(Rc::clone(&storage)),
            journal: JournalStore::load(Rc::clone(&storage)),
            storage,
            pipeline,
            timer_durations,
        }
    }

    pub fn storage(&self) -> &SharedStorage {
        &self.storage
    }

    pub fn tasks(&self) -> &TaskStore {
        &self.tasks
    }

    pub fn tasks_mut(&mut self) -> &mut TaskStore {
        &mut self.tasks
    }

    pub fn notes(&self) -> &NoteStore {
        &self.notes
    }

    pub fn notes_mut(&mut self) -> &mut NoteStore {
        &mut self.notes
    }

    pub fn assistant(&self) -> &AssistantStore {
        &self.assistant
    }

    pub fn assistant_mut(&mut self) -> &mut AssistantStore {
        &mut self.assistant
    }

    pub fn growth(&self) -> &GrowthStore {
        &self.growth
    }

    pub fn growth_mut(&mut self) -> &mut GrowthStore {
        &mut self.growth
    }

    pub fn academic(&self) -> &AcademicStore {
        &self.academic
    }

    pub fn academic_mut(&mut self) -> &mut AcademicStore {
        &mut self.academic
    }

    pub fn research(&self) -> &ResearchStore {
        &self.research
    }

    pub fn research_mut(&mut self) -> &mut ResearchStore {
        &mut self.research
    }

    pub fn journal(&self) -> &JournalStore {
        &self.journal
    }

    pub fn journal_mut(&mut self) -> &mut JournalStore {
        &mut self.journal
    }

    pub fn pipeline(&self) -> &AssistantPipeline {
        &self.pipeline
    }

    /// Fresh timer with the configured durations.
    pub fn focus_timer(&self) -> FocusTimer {
        FocusTimer::new(self.timer_durations)
    }

    pub fn chat(&mut self, input: &str) -> Option<ChatOutcome> {
        self.chat_on(input, Local::now().date_naive())
    }

    /// Runs one chat turn; relative due dates resolve against `today`.
    /// Blank input is ignored.
    pub fn chat_on(&mut self, input: &str, today: NaiveDate) -> Option<ChatOutcome> {
        let input = input.trim();
        if input.is_empty() {
            return None;
        }

        let history = self.assistant.recent_history(HISTORY_TURNS).to_vec();
        self.assistant.push_user(input);

        let reply = self.pipeline.resolve(input, &history);
        let applied = reply
            .action
            .as_ref()
            .map(|action| self.apply_action(action, today));

        self.assistant.push_assistant(
            &reply.text,
            reply.classification.category,
            reply.classification.intent,
        );
        Some(ChatOutcome { reply, applied })
    }

    fn apply_action(&mut self, action: &AssistantAction, today: NaiveDate) -> AppliedAction {
        let applied = match action {
            AssistantAction::CreateTask {
                title,
                due,
                priority,
            } => {
                let mut draft = TaskDraft::new(title.as_str());
                if let Some(due) = due {
                    draft = draft.with_due_date(due.resolve(today));
                }
                if let Some(priority) = priority {
                    draft = draft.with_priority(*priority);
                }
                AppliedAction::TaskCreated(self.tasks.add(draft))
            }
            AssistantAction::CreateNote { title, content } => {
                AppliedAction::NoteCreated(self.notes.add(NoteDraft::new(title.as_str(), content.as_str())))
            }
            AssistantAction::StartFocus => AppliedAction::FocusRequested,
        };
        info!(
            "event=assistant_action module=workspace status=ok action={}",
            match applied {
                AppliedAction::TaskCreated(_) => "task_created",
                AppliedAction::NoteCreated(_) => "note_created",
                AppliedAction::FocusRequested => "focus_requested",
            }
        );
        applied
    }

    /// Records a completed timer countdown as a productivity session.
    pub fn record_timer_event(
        &mut self,
        event: &TimerEvent,
        started_at: Timestamp,
        ended_at: Timestamp,
    ) -> EntityId {
        self.growth.record_session(ProductivitySession::completed(
            event.completed,
            event.planned_minutes,
            started_at,
            ended_at,
        ))
    }
}
