//! Research sessions with collected sources.

use super::{new_id, normalize_optional, normalize_title, Entity, EntityId, Patch, Timestamp};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResearchStatus {
    #[default]
    Active,
    Completed,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Source {
    pub id: EntityId,
    pub title: String,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub notes: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResearchSession {
    pub id: EntityId,
    pub topic: String,
    #[serde(default)]
    pub question: Option<String>,
    #[serde(default)]
    pub sources: Vec<Source>,
    #[serde(default)]
    pub findings: String,
    #[serde(default)]
    pub status: ResearchStatus,
    pub started_at: Timestamp,
    #[serde(default)]
    pub ended_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl ResearchSession {
    pub fn start(topic: &str, question: Option<String>, now: Timestamp) -> Self {
        Self {
            id: new_id(),
            topic: normalize_title(topic, "Untitled research"),
            question: normalize_optional(question),
            sources: Vec::new(),
            findings: String::new(),
            status: ResearchStatus::Active,
            started_at: now,
            ended_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Whole minutes between start and end (or `now` while active).
    pub fn duration_minutes(&self, now: Timestamp) -> i64 {
        let end = self.ended_at.unwrap_or(now);
        (end - self.started_at).num_minutes().max(0)
    }
}

impl Entity for ResearchSession {
    fn id(&self) -> EntityId {
        self.id
    }

    fn touch(&mut self, now: Timestamp) {
        self.updated_at = now;
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResearchPatch {
    pub topic: Option<String>,
    pub question: Option<Option<String>>,
    pub findings: Option<String>,
}

impl Patch<ResearchSession> for ResearchPatch {
    fn apply_to(self, session: &mut ResearchSession, _now: Timestamp) {
        if let Some(topic) = self.topic {
            session.topic = normalize_title(&topic, &session.topic);
        }
        if let Some(question) = self.question {
            session.question = normalize_optional(question);
        }
        if let Some(findings) = self.findings {
            session.findings = findings;
        }
    }

    fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}
