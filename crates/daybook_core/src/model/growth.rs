//! Growth tracking model: habits, learning goals, skills and focus sessions.
//!
//! # Invariants
//! - `Habit::current_streak`/`longest_streak` are always recomputed from
//!   `completed_dates`; they are never edited directly.
//! - `LearningGoal::progress` is `completed * 100 / total` milestones.
//! - `Skill::level` and `Skill::progress` derive from `hours_logged`.

use super::{new_id, normalize_optional, normalize_title, Entity, EntityId, Patch, Timestamp};
use chrono::{Datelike, Days, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

pub const HOURS_PER_SKILL_LEVEL: f64 = 10.0;
pub const MAX_SKILL_LEVEL: u32 = 10;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HabitFrequency {
    #[default]
    Daily,
    Weekly,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Habit {
    pub id: EntityId,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub frequency: HabitFrequency,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub completed_dates: BTreeSet<NaiveDate>,
    #[serde(default)]
    pub current_streak: u32,
    #[serde(default)]
    pub longest_streak: u32,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Habit {
    pub fn from_draft(draft: HabitDraft, now: Timestamp) -> Self {
        Self {
            id: new_id(),
            name: normalize_title(&draft.name, "Untitled habit"),
            description: normalize_optional(draft.description),
            frequency: draft.frequency,
            category: draft.category.trim().to_string(),
            completed_dates: BTreeSet::new(),
            current_streak: 0,
            longest_streak: 0,
            created_at: now,
            updated_at: now,
        }
    }

    /// Toggles completion on `date` and recomputes streaks.
    ///
    /// Returns `true` when the date is now completed.
    pub fn toggle_on(&mut self, date: NaiveDate) -> bool {
        let completed = if self.completed_dates.remove(&date) {
            false
        } else {
            self.completed_dates.insert(date);
            true
        };
        self.recompute_streaks();
        completed
    }

    pub fn is_completed_on(&self, date: NaiveDate) -> bool {
        match self.frequency {
            HabitFrequency::Daily => self.completed_dates.contains(&date),
            HabitFrequency::Weekly => {
                let week = week_start(date);
                self.completed_dates.iter().any(|d| week_start(*d) == week)
            }
        }
    }

    pub fn recompute_streaks(&mut self) {
        let (current, longest) = compute_streaks(&self.completed_dates, self.frequency);
        self.current_streak = current;
        self.longest_streak = longest;
    }
}

impl Entity for Habit {
    fn id(&self) -> EntityId {
        self.id
    }

    fn touch(&mut self, now: Timestamp) {
        self.updated_at = now;
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HabitDraft {
    pub name: String,
    pub description: Option<String>,
    pub frequency: HabitFrequency,
    pub category: String,
}

impl HabitDraft {
    pub fn daily(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn weekly(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            frequency: HabitFrequency::Weekly,
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HabitPatch {
    pub name: Option<String>,
    pub description: Option<Option<String>>,
    pub frequency: Option<HabitFrequency>,
    pub category: Option<String>,
}

impl Patch<Habit> for HabitPatch {
    fn apply_to(self, habit: &mut Habit, _now: Timestamp) {
        if let Some(name) = self.name {
            habit.name = normalize_title(&name, &habit.name);
        }
        if let Some(description) = self.description {
            habit.description = normalize_optional(description);
        }
        if let Some(frequency) = self.frequency {
            habit.frequency = frequency;
            habit.recompute_streaks();
        }
        if let Some(category) = self.category {
            habit.category = category.trim().to_string();
        }
    }

    fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}

/// Returns `(current, longest)` streaks over completion dates.
///
/// The current streak is the run of consecutive periods ending at the latest
/// completion. Periods are days for daily habits and ISO weeks for weekly ones.
pub fn compute_streaks(dates: &BTreeSet<NaiveDate>, frequency: HabitFrequency) -> (u32, u32) {
    let periods: BTreeSet<NaiveDate> = match frequency {
        HabitFrequency::Daily => dates.clone(),
        HabitFrequency::Weekly => dates.iter().map(|d| week_start(*d)).collect(),
    };
    let step = match frequency {
        HabitFrequency::Daily => Days::new(1),
        HabitFrequency::Weekly => Days::new(7),
    };

    let mut current = 0u32;
    let mut longest = 0u32;
    let mut previous: Option<NaiveDate> = None;
    for period in periods {
        let consecutive = previous
            .and_then(|prev| prev.checked_add_days(step))
            .is_some_and(|expected| expected == period);
        current = if consecutive { current + 1 } else { 1 };
        longest = longest.max(current);
        previous = Some(period);
    }
    (current, longest)
}

fn week_start(date: NaiveDate) -> NaiveDate {
    let offset = u64::from(date.weekday().num_days_from_monday());
    date.checked_sub_days(Days::new(offset)).unwrap_or(date)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Milestone {
    pub id: EntityId,
    pub title: String,
    pub completed: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LearningGoal {
    pub id: EntityId,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub target_date: Option<NaiveDate>,
    #[serde(default)]
    pub milestones: Vec<Milestone>,
    #[serde(default)]
    pub progress: u8,
    #[serde(default)]
    pub completed: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl LearningGoal {
    pub fn from_draft(draft: LearningGoalDraft, now: Timestamp) -> Self {
        let mut goal = Self {
            id: new_id(),
            title: normalize_title(&draft.title, "Untitled goal"),
            description: normalize_optional(draft.description),
            target_date: draft.target_date,
            milestones: draft
                .milestones
                .iter()
                .map(|title| title.trim())
                .filter(|title| !title.is_empty())
                .map(|title| Milestone {
                    id: new_id(),
                    title: title.to_string(),
                    completed: false,
                })
                .collect(),
            progress: 0,
            completed: false,
            created_at: now,
            updated_at: now,
        };
        goal.recompute_progress();
        goal
    }

    pub fn recompute_progress(&mut self) {
        let total = self.milestones.len();
        let done = self.milestones.iter().filter(|m| m.completed).count();
        self.progress = if total == 0 {
            0
        } else {
            u8::try_from(done * 100 / total).unwrap_or(100)
        };
        self.completed = total > 0 && done == total;
    }
}

impl Entity for LearningGoal {
    fn id(&self) -> EntityId {
        self.id
    }

    fn touch(&mut self, now: Timestamp) {
        self.updated_at = now;
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LearningGoalDraft {
    pub title: String,
    pub description: Option<String>,
    pub target_date: Option<NaiveDate>,
    pub milestones: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LearningGoalPatch {
    pub title: Option<String>,
    pub description: Option<Option<String>>,
    pub target_date: Option<Option<NaiveDate>>,
}

impl Patch<LearningGoal> for LearningGoalPatch {
    fn apply_to(self, goal: &mut LearningGoal, _now: Timestamp) {
        if let Some(title) = self.title {
            goal.title = normalize_title(&title, &goal.title);
        }
        if let Some(description) = self.description {
            goal.description = normalize_optional(description);
        }
        if let Some(target_date) = self.target_date {
            goal.target_date = target_date;
        }
    }

    fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Skill {
    pub id: EntityId,
    pub name: String,
    #[serde(default)]
    pub category: String,
    pub target_hours: f64,
    #[serde(default)]
    pub hours_logged: f64,
    #[serde(default = "default_skill_level")]
    pub level: u32,
    #[serde(default)]
    pub progress: u8,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

fn default_skill_level() -> u32 {
    1
}

impl Skill {
    pub fn from_draft(draft: SkillDraft, now: Timestamp) -> Self {
        let mut skill = Self {
            id: new_id(),
            name: normalize_title(&draft.name, "Untitled skill"),
            category: draft.category.trim().to_string(),
            target_hours: sanitize_hours(draft.target_hours),
            hours_logged: 0.0,
            level: 1,
            progress: 0,
            created_at: now,
            updated_at: now,
        };
        skill.recompute();
        skill
    }

    pub fn recompute(&mut self) {
        let level = (self.hours_logged / HOURS_PER_SKILL_LEVEL).floor() as u32 + 1;
        self.level = level.min(MAX_SKILL_LEVEL);
        self.progress = if self.target_hours <= 0.0 {
            0
        } else {
            (self.hours_logged / self.target_hours * 100.0).clamp(0.0, 100.0) as u8
        };
    }
}

impl Entity for Skill {
    fn id(&self) -> EntityId {
        self.id
    }

    fn touch(&mut self, now: Timestamp) {
        self.updated_at = now;
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SkillDraft {
    pub name: String,
    pub category: String,
    pub target_hours: f64,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SkillPatch {
    pub name: Option<String>,
    pub category: Option<String>,
    pub target_hours: Option<f64>,
}

impl Patch<Skill> for SkillPatch {
    fn apply_to(self, skill: &mut Skill, _now: Timestamp) {
        if let Some(name) = self.name {
            skill.name = normalize_title(&name, &skill.name);
        }
        if let Some(category) = self.category {
            skill.category = category.trim().to_string();
        }
        if let Some(target_hours) = self.target_hours {
            skill.target_hours = sanitize_hours(target_hours);
        }
        skill.recompute();
    }

    fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}

/// Non-finite or negative hours count as zero.
pub(crate) fn sanitize_hours(hours: f64) -> f64 {
    if hours.is_finite() && hours > 0.0 {
        hours
    } else {
        0.0
    }
}

/// Timer mode of one productivity session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionMode {
    Focus,
    ShortBreak,
    LongBreak,
}

impl SessionMode {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Focus => "focus",
            Self::ShortBreak => "short_break",
            Self::LongBreak => "long_break",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductivitySession {
    pub id: EntityId,
    pub mode: SessionMode,
    pub planned_minutes: u32,
    pub started_at: Timestamp,
    #[serde(default)]
    pub ended_at: Option<Timestamp>,
    #[serde(default)]
    pub completed: bool,
    #[serde(default)]
    pub task_id: Option<EntityId>,
}

impl ProductivitySession {
    pub fn completed(
        mode: SessionMode,
        planned_minutes: u32,
        started_at: Timestamp,
        ended_at: Timestamp,
    ) -> Self {
        Self {
            id: new_id(),
            mode,
            planned_minutes,
            started_at,
            ended_at: Some(ended_at),
            completed: true,
            task_id: None,
        }
    }
}

impl Entity for ProductivitySession {
    fn id(&self) -> EntityId {
        self.id
    }

    fn touch(&mut self, _now: Timestamp) {}
}
