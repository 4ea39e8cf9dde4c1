//! Growth store: habits, learning goals, skills and productivity sessions.
//!
//! All four collections share one blob.

use super::{apply_patch, find, modify, remove, PersistedState};
use crate::model::growth::{
    sanitize_hours, Habit, HabitDraft, HabitPatch, LearningGoal, LearningGoalDraft,
    LearningGoalPatch, Milestone, ProductivitySession, SessionMode, Skill, SkillDraft, SkillPatch,
};
use crate::model::{new_id, EntityId, Patch};
use crate::storage::{SharedStorage, GROWTH_KEY};
use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GrowthState {
    #[serde(default)]
    habits: Vec<Habit>,
    #[serde(default)]
    goals: Vec<LearningGoal>,
    #[serde(default)]
    skills: Vec<Skill>,
    #[serde(default)]
    sessions: Vec<ProductivitySession>,
}

pub struct GrowthStore {
    state: PersistedState<GrowthState>,
}

impl GrowthStore {
    pub fn load(storage: SharedStorage) -> Self {
        Self {
            state: PersistedState::load(storage, GROWTH_KEY),
        }
    }

    // --- habits ---

    pub fn habits(&self) -> &[Habit] {
        &self.state.get().habits
    }

    pub fn habit(&self, id: EntityId) -> Option<&Habit> {
        find(&self.state.get().habits, id)
    }

    pub fn add_habit(&mut self, draft: HabitDraft) -> EntityId {
        let habit = Habit::from_draft(draft, Utc::now());
        let id = habit.id;
        self.state.commit("habit_add", |state| {
            state.habits.push(habit);
            Some(())
        });
        id
    }

    pub fn update_habit(&mut self, id: EntityId, patch: HabitPatch) -> bool {
        if patch.is_empty() {
            return self.habit(id).is_some();
        }
        let now = Utc::now();
        self.state
            .commit("habit_update", |state| {
                apply_patch(&mut state.habits, id, patch, now)
            })
            .is_some()
    }

    pub fn delete_habit(&mut self, id: EntityId) -> bool {
        self.state
            .commit("habit_delete", |state| remove(&mut state.habits, id))
            .is_some()
    }

    /// Toggles completion on `date` and recomputes streaks.
    ///
    /// Returns whether the date is now completed, or `None` for an unknown id.
    pub fn toggle_habit(&mut self, id: EntityId, date: NaiveDate) -> Option<bool> {
        let now = Utc::now();
        self.state.commit("habit_toggle", |state| {
            modify(&mut state.habits, id, now, |habit| Some(habit.toggle_on(date)))
        })
    }

    /// Habits already completed for the period containing `date`.
    pub fn habits_completed_on(&self, date: NaiveDate) -> Vec<&Habit> {
        self.state
            .get()
            .habits
            .iter()
            .filter(|habit| habit.is_completed_on(date))
            .collect()
    }

    // --- learning goals ---

    pub fn goals(&self) -> &[LearningGoal] {
        &self.state.get().goals
    }

    pub fn goal(&self, id: EntityId) -> Option<&LearningGoal> {
        find(&self.state.get().goals, id)
    }

    pub fn add_goal(&mut self, draft: LearningGoalDraft) -> EntityId {
        let goal = LearningGoal::from_draft(draft, Utc::now());
        let id = goal.id;
        self.state.commit("goal_add", |state| {
            state.goals.push(goal);
            Some(())
        });
        id
    }

    pub fn update_goal(&mut self, id: EntityId, patch: LearningGoalPatch) -> bool {
        if patch.is_empty() {
            return self.goal(id).is_some();
        }
        let now = Utc::now();
        self.state
            .commit("goal_update", |state| {
                apply_patch(&mut state.goals, id, patch, now)
            })
            .is_some()
    }

    pub fn delete_goal(&mut self, id: EntityId) -> bool {
        self.state
            .commit("goal_delete", |state| remove(&mut state.goals, id))
            .is_some()
    }

    pub fn add_milestone(&mut self, goal_id: EntityId, title: &str) -> Option<EntityId> {
        let title = title.trim();
        if title.is_empty() {
            return None;
        }
        let now = Utc::now();
        self.state.commit("milestone_add", |state| {
            modify(&mut state.goals, goal_id, now, |goal| {
                let id = new_id();
                goal.milestones.push(Milestone {
                    id,
                    title: title.to_string(),
                    completed: false,
                });
                goal.recompute_progress();
                Some(id)
            })
        })
    }

    /// Flips one milestone and returns the goal's new progress percent.
    pub fn toggle_milestone(&mut self, goal_id: EntityId, milestone_id: EntityId) -> Option<u8> {
        let now = Utc::now();
        self.state.commit("milestone_toggle", |state| {
            modify(&mut state.goals, goal_id, now, |goal| {
                let milestone = goal.milestones.iter_mut().find(|m| m.id == milestone_id)?;
                milestone.completed = !milestone.completed;
                goal.recompute_progress();
                Some(goal.progress)
            })
        })
    }

    // --- skills ---

    pub fn skills(&self) -> &[Skill] {
        &self.state.get().skills
    }

    pub fn skill(&self, id: EntityId) -> Option<&Skill> {
        find(&self.state.get().skills, id)
    }

    pub fn add_skill(&mut self, draft: SkillDraft) -> EntityId {
        let skill = Skill::from_draft(draft, Utc::now());
        let id = skill.id;
        self.state.commit("skill_add", |state| {
            state.skills.push(skill);
            Some(())
        });
        id
    }

    pub fn update_skill(&mut self, id: EntityId, patch: SkillPatch) -> bool {
        if patch.is_empty() {
            return self.skill(id).is_some();
        }
        let now = Utc::now();
        self.state
            .commit("skill_update", |state| {
                apply_patch(&mut state.skills, id, patch, now)
            })
            .is_some()
    }

    pub fn delete_skill(&mut self, id: EntityId) -> bool {
        self.state
            .commit("skill_delete", |state| remove(&mut state.skills, id))
            .is_some()
    }

    /// Adds practice hours and returns the new level.
    ///
    /// Zero, negative and non-finite hours are ignored.
    pub fn log_practice(&mut self, id: EntityId, hours: f64) -> Option<u32> {
        let hours = sanitize_hours(hours);
        if hours == 0.0 {
            return None;
        }
        let now = Utc::now();
        self.state.commit("skill_log_practice", |state| {
            modify(&mut state.skills, id, now, |skill| {
                skill.hours_logged += hours;
                skill.recompute();
                Some(skill.level)
            })
        })
    }

    // --- productivity sessions ---

    pub fn sessions(&self) -> &[ProductivitySession] {
        &self.state.get().sessions
    }

    pub fn record_session(&mut self, session: ProductivitySession) -> EntityId {
        let id = session.id;
        self.state.commit("session_record", |state| {
            state.sessions.push(session);
            Some(())
        });
        id
    }

    /// Planned minutes of completed focus sessions that ended on `date` (UTC).
    pub fn focus_minutes_on(&self, date: NaiveDate) -> u32 {
        self.completed_focus_on(date)
            .map(|session| session.planned_minutes)
            .sum()
    }

    pub fn completed_focus_sessions_on(&self, date: NaiveDate) -> usize {
        self.completed_focus_on(date).count()
    }

    fn completed_focus_on(&self, date: NaiveDate) -> impl Iterator<Item = &ProductivitySession> {
        self.state.get().sessions.iter().filter(move |session| {
            session.completed
                && session.mode == SessionMode::Focus
                && session
                    .ended_at
                    .is_some_and(|ended| ended.date_naive() == date)
        })
    }
}
