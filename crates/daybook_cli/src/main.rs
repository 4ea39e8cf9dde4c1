//! Daybook command-line front end.
//!
//! Thin layer over `daybook_core::Workspace`; all domain rules live in core.

use std::io::Write;
use std::time::Duration;

use anyhow::{anyhow, bail, Context};
use chrono::{Local, NaiveDate, Utc};
use clap::{Parser, Subcommand};
use colored::Colorize;
use daybook_core::model::growth::{HabitDraft, SessionMode};
use daybook_core::model::journal::JournalDraft;
use daybook_core::model::note::NoteDraft;
use daybook_core::model::task::{Priority, TaskDraft};
use daybook_core::model::EntityId;
use daybook_core::store::note_store::NoteQuery;
use daybook_core::store::task_store::TaskQuery;
use daybook_core::{init_logging, AppConfig, AppliedAction, ReplySource, Sender, Workspace};
use log::info;

/// Daybook - tasks, notes, habits, journal, and an assistant
#[derive(Parser)]
#[command(name = "daybook")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Personal productivity workspace on the command line")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage tasks
    Task {
        #[command(subcommand)]
        action: TaskCommand,
    },
    /// Manage notes and spaced review
    Note {
        #[command(subcommand)]
        action: NoteCommand,
    },
    /// Track habits
    Habit {
        #[command(subcommand)]
        action: HabitCommand,
    },
    /// Write and read journal entries
    Journal {
        #[command(subcommand)]
        action: JournalCommand,
    },
    /// Send one message to the assistant
    Chat {
        /// Message text
        #[arg(required = true, num_args = 1..)]
        text: Vec<String>,
    },
    /// Show recent assistant conversation
    History {
        #[arg(long, default_value = "20")]
        limit: usize,
    },
    /// Run the focus timer in the foreground
    Timer {
        /// Focus sessions to complete before exiting
        #[arg(long, default_value = "1")]
        sessions: u32,
    },
    /// Print version information
    Version,
}

#[derive(Subcommand)]
enum TaskCommand {
    Add {
        title: String,
        /// Due date (YYYY-MM-DD)
        #[arg(long)]
        due: Option<NaiveDate>,
        /// low, medium, or high
        #[arg(long)]
        priority: Option<String>,
        #[arg(long)]
        category: Option<String>,
    },
    List {
        /// Include completed tasks
        #[arg(long)]
        all: bool,
        #[arg(long)]
        category: Option<String>,
    },
    /// Toggle completion (id or unique id prefix)
    Done { id: String },
    Rm { id: String },
}

#[derive(Subcommand)]
enum NoteCommand {
    Add {
        title: String,
        #[arg(long, default_value = "")]
        content: String,
        /// Tags (comma-separated)
        #[arg(long)]
        tags: Option<String>,
    },
    List {
        #[arg(long)]
        tag: Option<String>,
        #[arg(long)]
        search: Option<String>,
    },
    Link {
        from: String,
        to: String,
        #[arg(long)]
        bidirectional: bool,
    },
    /// Record a review with quality 1-5
    Review { id: String, quality: u8 },
    /// List notes due for review today
    Due,
}

#[derive(Subcommand)]
enum HabitCommand {
    Add {
        name: String,
        #[arg(long)]
        weekly: bool,
    },
    /// Toggle completion for a date (default today)
    Check {
        id: String,
        #[arg(long)]
        date: Option<NaiveDate>,
    },
    List,
}

#[derive(Subcommand)]
enum JournalCommand {
    Add {
        content: String,
        /// Mood 1-5
        #[arg(long)]
        mood: Option<u8>,
        #[arg(long)]
        date: Option<NaiveDate>,
    },
    List {
        #[arg(long, default_value = "10")]
        limit: usize,
    },
}

impl Commands {
    fn name(&self) -> &'static str {
        match self {
            Self::Task { .. } => "task",
            Self::Note { .. } => "note",
            Self::Habit { .. } => "habit",
            Self::Journal { .. } => "journal",
            Self::Chat { .. } => "chat",
            Self::History { .. } => "history",
            Self::Timer { .. } => "timer",
            Self::Version => "version",
        }
    }
}

fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();
    let config = AppConfig::from_env();

    if let Err(err) = init_logging(&config.log_level, &config.log_dir()) {
        eprintln!("{} {err}", "warning: logging disabled:".yellow());
    }

    if let Commands::Version = cli.command {
        println!("daybook {}", daybook_core::core_version());
        return Ok(());
    }

    let mut workspace = Workspace::open(&config)
        .with_context(|| format!("cannot open workspace at {}", config.data_dir.display()))?;
    let today = Local::now().date_naive();
    info!(
        "event=cli_command module=cli status=start command={}",
        cli.command.name()
    );

    match cli.command {
        Commands::Task { action } => run_task(&mut workspace, action, today),
        Commands::Note { action } => run_note(&mut workspace, action, today),
        Commands::Habit { action } => run_habit(&mut workspace, action, today),
        Commands::Journal { action } => run_journal(&mut workspace, action, today),
        Commands::Chat { text } => run_chat(&mut workspace, &text.join(" ")),
        Commands::History { limit } => run_history(&workspace, limit),
        Commands::Timer { sessions } => run_timer(&mut workspace, sessions),
        Commands::Version => Ok(()),
    }
}

fn run_task(workspace: &mut Workspace, action: TaskCommand, today: NaiveDate) -> anyhow::Result<()> {
    match action {
        TaskCommand::Add {
            title,
            due,
            priority,
            category,
        } => {
            let mut draft = TaskDraft::new(title);
            if let Some(due) = due {
                draft = draft.with_due_date(due);
            }
            if let Some(raw) = priority {
                let priority =
                    Priority::parse(&raw).ok_or_else(|| anyhow!("unknown priority `{raw}`"))?;
                draft = draft.with_priority(priority);
            }
            if let Some(category) = category {
                draft = draft.with_category(category);
            }
            let id = workspace.tasks_mut().add(draft);
            println!("{} {}", "Added task".green(), short_id(id));
        }
        TaskCommand::List { all, category } => {
            let query = TaskQuery {
                category,
                completed: if all { None } else { Some(false) },
                ..TaskQuery::default()
            };
            let tasks = workspace.tasks().query(&query);
            if tasks.is_empty() {
                println!("{}", "No tasks.".dimmed());
            }
            for task in tasks {
                let mark = if task.completed { "[x]" } else { "[ ]" };
                let due = task
                    .due_date
                    .map(|d| format!(" due {d}"))
                    .unwrap_or_default();
                let line = format!(
                    "{} {mark} {} ({}){due}",
                    short_id(task.id),
                    task.title,
                    task.priority.as_str()
                );
                if task.is_overdue(today) {
                    println!("{}", line.red());
                } else {
                    println!("{line}");
                }
            }
            let stats = workspace.tasks().stats(today);
            println!(
                "{}",
                format!(
                    "{}/{} done ({}%)",
                    stats.completed,
                    stats.total,
                    stats.completion_percent()
                )
                .dimmed()
            );
        }
        TaskCommand::Done { id } => {
            let id = resolve_id(workspace.tasks().tasks().iter().map(|t| t.id), &id)?;
            match workspace.tasks_mut().toggle_complete(id) {
                Some(true) => println!("{}", "Task completed.".green()),
                Some(false) => println!("Task reopened."),
                None => bail!("task not found"),
            }
        }
        TaskCommand::Rm { id } => {
            let id = resolve_id(workspace.tasks().tasks().iter().map(|t| t.id), &id)?;
            workspace.tasks_mut().delete(id);
            println!("Task deleted.");
        }
    }
    Ok(())
}

fn run_note(workspace: &mut Workspace, action: NoteCommand, today: NaiveDate) -> anyhow::Result<()> {
    match action {
        NoteCommand::Add {
            title,
            content,
            tags,
        } => {
            let tags: Vec<&str> = tags
                .as_deref()
                .map(|raw| raw.split(',').collect())
                .unwrap_or_default();
            let id = workspace
                .notes_mut()
                .add(NoteDraft::new(title, content).with_tags(&tags));
            println!("{} {}", "Added note".green(), short_id(id));
        }
        NoteCommand::List { tag, search } => {
            let query = NoteQuery {
                tag,
                text: search,
                ..NoteQuery::default()
            };
            let notes = workspace.notes().query(&query);
            if notes.is_empty() {
                println!("{}", "No notes.".dimmed());
            }
            for note in notes {
                let pin = if note.pinned { "*" } else { " " };
                let tags = note
                    .tags
                    .iter()
                    .map(|tag| format!("#{tag}"))
                    .collect::<Vec<_>>()
                    .join(" ");
                println!("{} {pin} {} {}", short_id(note.id), note.title.bold(), tags.cyan());
            }
        }
        NoteCommand::Link {
            from,
            to,
            bidirectional,
        } => {
            let from = resolve_id(workspace.notes().notes().iter().map(|n| n.id), &from)?;
            let to = resolve_id(workspace.notes().notes().iter().map(|n| n.id), &to)?;
            if workspace.notes_mut().link(from, to, bidirectional) {
                println!("{}", "Linked.".green());
            } else {
                println!("{}", "Nothing to link.".dimmed());
            }
        }
        NoteCommand::Review { id, quality } => {
            if !(1..=5).contains(&quality) {
                bail!("quality must be between 1 and 5");
            }
            let id = resolve_id(workspace.notes().notes().iter().map(|n| n.id), &id)?;
            let interval = workspace
                .notes_mut()
                .review(id, quality, Utc::now())
                .ok_or_else(|| anyhow!("note not found"))?;
            println!("Next review in {interval} day(s).");
        }
        NoteCommand::Due => {
            let due = workspace.notes().due_for_review(today);
            if due.is_empty() {
                println!("{}", "Nothing due for review.".dimmed());
            }
            for note in due {
                println!("{} {}", short_id(note.id), note.title);
            }
        }
    }
    Ok(())
}

fn run_habit(workspace: &mut Workspace, action: HabitCommand, today: NaiveDate) -> anyhow::Result<()> {
    match action {
        HabitCommand::Add { name, weekly } => {
            let draft = if weekly {
                HabitDraft::weekly(name)
            } else {
                HabitDraft::daily(name)
            };
            let id = workspace.growth_mut().add_habit(draft);
            println!("{} {}", "Added habit".green(), short_id(id));
        }
        HabitCommand::Check { id, date } => {
            let id = resolve_id(workspace.growth().habits().iter().map(|h| h.id), &id)?;
            let date = date.unwrap_or(today);
            let done = workspace
                .growth_mut()
                .toggle_habit(id, date)
                .ok_or_else(|| anyhow!("habit not found"))?;
            let streak = workspace.growth().habit(id).map_or(0, |h| h.current_streak);
            if done {
                println!("{} streak {streak}", "Checked.".green());
            } else {
                println!("Unchecked. streak {streak}");
            }
        }
        HabitCommand::List => {
            let habits = workspace.growth().habits();
            if habits.is_empty() {
                println!("{}", "No habits.".dimmed());
            }
            for habit in habits {
                let mark = if habit.is_completed_on(today) { "[x]" } else { "[ ]" };
                println!(
                    "{} {mark} {} streak {} (best {})",
                    short_id(habit.id),
                    habit.name,
                    habit.current_streak,
                    habit.longest_streak
                );
            }
        }
    }
    Ok(())
}

fn run_journal(
    workspace: &mut Workspace,
    action: JournalCommand,
    today: NaiveDate,
) -> anyhow::Result<()> {
    match action {
        JournalCommand::Add {
            content,
            mood,
            date,
        } => {
            let mut draft = JournalDraft::new(date.unwrap_or(today), content);
            draft.mood = mood;
            let id = workspace.journal_mut().add(draft);
            println!("{} {}", "Saved entry".green(), short_id(id));
        }
        JournalCommand::List { limit } => {
            for entry in workspace.journal().entries().into_iter().take(limit) {
                let mood = entry.mood.map(|m| format!(" mood {m}")).unwrap_or_default();
                println!("{}{mood}", entry.date.to_string().bold());
                println!("  {}", entry.content);
            }
        }
    }
    Ok(())
}

fn run_chat(workspace: &mut Workspace, text: &str) -> anyhow::Result<()> {
    let outcome = workspace
        .chat(text)
        .ok_or_else(|| anyhow!("message is empty"))?;

    println!("{}", outcome.reply.text);
    match &outcome.reply.source {
        ReplySource::Remote { provider, model } => {
            println!("{}", format!("({} / {model})", provider.id()).dimmed());
        }
        ReplySource::Apology | ReplySource::Template => {}
    }
    match outcome.applied {
        Some(AppliedAction::TaskCreated(id)) => {
            println!("{} {}", "Created task".green(), short_id(id));
        }
        Some(AppliedAction::NoteCreated(id)) => {
            println!("{} {}", "Created note".green(), short_id(id));
        }
        Some(AppliedAction::FocusRequested) => {
            println!("{}", "Run `daybook timer` to start focusing.".dimmed());
        }
        None => {}
    }
    Ok(())
}

fn run_history(workspace: &Workspace, limit: usize) -> anyhow::Result<()> {
    let messages = workspace.assistant().recent_history(limit);
    if messages.is_empty() {
        println!("{}", "No conversation yet.".dimmed());
    }
    for message in messages {
        let who = match message.sender {
            Sender::User => "you".cyan(),
            Sender::Assistant => "assistant".magenta(),
        };
        let time = message.timestamp.with_timezone(&Local).format("%H:%M");
        println!("[{time}] {who}: {}", message.text);
    }
    Ok(())
}

fn run_timer(workspace: &mut Workspace, sessions: u32) -> anyhow::Result<()> {
    let mut timer = workspace.focus_timer();
    let mut completed = 0;
    let mut started_at = Utc::now();
    timer.start();
    println!("{} {} min", "Focus".green().bold(), timer.durations().focus_minutes);

    while completed < sessions.max(1) {
        std::thread::sleep(Duration::from_secs(1));
        let remaining = timer.remaining_secs();
        print!("\r{} {:02}:{:02} ", timer.mode().as_str(), remaining / 60, remaining % 60);
        std::io::stdout().flush().ok();

        if let Some(event) = timer.tick() {
            let ended_at = Utc::now();
            workspace.record_timer_event(&event, started_at, ended_at);
            if event.completed == SessionMode::Focus {
                completed += 1;
            }
            println!(
                "\n{} {} -> {}",
                "Completed".green(),
                event.completed.as_str(),
                event.next.as_str()
            );
            started_at = ended_at;
            timer.start();
        }
    }

    let minutes = workspace.growth().focus_minutes_on(Local::now().date_naive());
    println!("{} {minutes} focus minutes today", "Done.".green().bold());
    Ok(())
}

fn short_id(id: EntityId) -> String {
    id.to_string().chars().take(8).collect()
}

fn resolve_id(ids: impl Iterator<Item = EntityId>, needle: &str) -> anyhow::Result<EntityId> {
    let needle = needle.trim().to_ascii_lowercase();
    if needle.is_empty() {
        bail!("id cannot be empty");
    }
    let matches: Vec<EntityId> = ids
        .filter(|id| id.to_string().starts_with(&needle))
        .collect();
    match matches.as_slice() {
        [id] => Ok(*id),
        [] => bail!("no item matches id `{needle}`"),
        _ => bail!("id `{needle}` is ambiguous"),
    }
}
