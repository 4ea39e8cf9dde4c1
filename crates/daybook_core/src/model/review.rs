//! SM-2 style spaced-repetition schedule for notes.
//!
//! # Invariants
//! - `ease_factor` never drops below [`MIN_EASE_FACTOR`].
//! - `quality` is clamped to `1..=5` before any arithmetic.
//! - `next_review` is always `reviewed_on + interval_days`.

use super::Timestamp;
use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};

pub const DEFAULT_EASE_FACTOR: f64 = 2.5;
pub const MIN_EASE_FACTOR: f64 = 1.3;
pub const MIN_QUALITY: u8 = 1;
pub const MAX_QUALITY: u8 = 5;
/// Lowest quality that counts as a successful recall.
pub const PASSING_QUALITY: u8 = 3;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewRecord {
    pub reviewed_at: Timestamp,
    pub quality: u8,
    pub interval_days: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewSchedule {
    pub interval_days: u32,
    pub ease_factor: f64,
    pub repetitions: u32,
    pub next_review: NaiveDate,
    #[serde(default)]
    pub history: Vec<ReviewRecord>,
}

impl ReviewSchedule {
    /// Fresh schedule: interval 1, default ease, due on `today`.
    pub fn new(today: NaiveDate) -> Self {
        Self {
            interval_days: 1,
            ease_factor: DEFAULT_EASE_FACTOR,
            repetitions: 0,
            next_review: today,
            history: Vec::new(),
        }
    }

    /// Applies one review event and returns the new interval in days.
    pub fn apply_review(&mut self, quality: u8, now: Timestamp) -> u32 {
        let quality = quality.clamp(MIN_QUALITY, MAX_QUALITY);

        if quality >= PASSING_QUALITY {
            self.interval_days = match self.interval_days {
                0 => 1,
                1 => 6,
                interval => (f64::from(interval) * self.ease_factor).round() as u32,
            };
            self.repetitions += 1;
        } else {
            self.repetitions = 0;
            self.interval_days = 1;
        }

        self.ease_factor = next_ease_factor(self.ease_factor, quality);
        let reviewed_on = now.date_naive();
        self.next_review = reviewed_on
            .checked_add_days(Days::new(u64::from(self.interval_days)))
            .unwrap_or(NaiveDate::MAX);
        self.history.push(ReviewRecord {
            reviewed_at: now,
            quality,
            interval_days: self.interval_days,
        });

        self.interval_days
    }

    pub fn is_due(&self, today: NaiveDate) -> bool {
        self.next_review <= today
    }
}

/// SM-2 ease update: `EF + (0.1 - (5 - q) * (0.08 + (5 - q) * 0.02))`, floored.
pub fn next_ease_factor(ease_factor: f64, quality: u8) -> f64 {
    let miss = f64::from(MAX_QUALITY - quality.clamp(MIN_QUALITY, MAX_QUALITY));
    let next = ease_factor + (0.1 - miss * (0.08 + miss * 0.02));
    next.max(MIN_EASE_FACTOR)
}
