//! Pomodoro-style focus timer.
//!
//! # Responsibility
//! - Count down the current mode one second per `tick`.
//! - Decide the next mode when a countdown completes.
//!
//! # Invariants
//! - Every `long_break_every`-th completed focus session is followed by a
//!   long break; other focus sessions by a short break; breaks return to focus.
//! - `skip` changes mode without counting a focus session.
//! - In-progress state is never persisted.

use crate::model::growth::SessionMode;
use log::info;

pub const DEFAULT_FOCUS_MINUTES: u32 = 25;
pub const DEFAULT_SHORT_BREAK_MINUTES: u32 = 5;
pub const DEFAULT_LONG_BREAK_MINUTES: u32 = 15;
pub const DEFAULT_LONG_BREAK_EVERY: u32 = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimerDurations {
    pub focus_minutes: u32,
    pub short_break_minutes: u32,
    pub long_break_minutes: u32,
    pub long_break_every: u32,
}

impl Default for TimerDurations {
    fn default() -> Self {
        Self {
            focus_minutes: DEFAULT_FOCUS_MINUTES,
            short_break_minutes: DEFAULT_SHORT_BREAK_MINUTES,
            long_break_minutes: DEFAULT_LONG_BREAK_MINUTES,
            long_break_every: DEFAULT_LONG_BREAK_EVERY,
        }
    }
}

impl TimerDurations {
    pub fn minutes(&self, mode: SessionMode) -> u32 {
        match mode {
            SessionMode::Focus => self.focus_minutes,
            SessionMode::ShortBreak => self.short_break_minutes,
            SessionMode::LongBreak => self.long_break_minutes,
        }
    }

    fn seconds(&self, mode: SessionMode) -> u32 {
        self.minutes(mode).max(1).saturating_mul(60)
    }
}

/// Emitted by [`FocusTimer::tick`] when a countdown reaches zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimerEvent {
    pub completed: SessionMode,
    pub planned_minutes: u32,
    pub next: SessionMode,
    pub focus_sessions: u32,
}

#[derive(Debug, Clone)]
pub struct FocusTimer {
    durations: TimerDurations,
    mode: SessionMode,
    remaining_secs: u32,
    running: bool,
    focus_sessions: u32,
}

impl FocusTimer {
    pub fn new(durations: TimerDurations) -> Self {
        Self {
            durations,
            mode: SessionMode::Focus,
            remaining_secs: durations.seconds(SessionMode::Focus),
            running: false,
            focus_sessions: 0,
        }
    }

    pub fn mode(&self) -> SessionMode {
        self.mode
    }

    pub fn remaining_secs(&self) -> u32 {
        self.remaining_secs
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Completed focus sessions since this timer was created.
    pub fn focus_sessions(&self) -> u32 {
        self.focus_sessions
    }

    pub fn durations(&self) -> TimerDurations {
        self.durations
    }

    /// Returns whether the timer changed from paused to running.
    pub fn start(&mut self) -> bool {
        let started = !self.running;
        self.running = true;
        started
    }

    pub fn pause(&mut self) -> bool {
        let paused = self.running;
        self.running = false;
        paused
    }

    /// Stops the timer and refills the current mode.
    pub fn reset(&mut self) {
        self.running = false;
        self.remaining_secs = self.durations.seconds(self.mode);
    }

    pub fn skip(&mut self) -> SessionMode {
        let next = match self.mode {
            SessionMode::Focus => SessionMode::ShortBreak,
            SessionMode::ShortBreak | SessionMode::LongBreak => SessionMode::Focus,
        };
        info!(
            "event=timer_skip module=timer status=ok from={} to={}",
            self.mode.as_str(),
            next.as_str()
        );
        self.enter(next);
        next
    }

    /// Advances one second. Returns the completion event when the countdown
    /// reaches zero; the timer is stopped in the next mode afterwards.
    pub fn tick(&mut self) -> Option<TimerEvent> {
        if !self.running {
            return None;
        }
        self.remaining_secs = self.remaining_secs.saturating_sub(1);
        if self.remaining_secs > 0 {
            return None;
        }

        let completed = self.mode;
        let next = match completed {
            SessionMode::Focus => {
                self.focus_sessions += 1;
                if self.focus_sessions % self.durations.long_break_every.max(1) == 0 {
                    SessionMode::LongBreak
                } else {
                    SessionMode::ShortBreak
                }
            }
            SessionMode::ShortBreak | SessionMode::LongBreak => SessionMode::Focus,
        };
        info!(
            "event=timer_complete module=timer status=ok mode={} next={} focus_sessions={}",
            completed.as_str(),
            next.as_str(),
            self.focus_sessions
        );
        self.enter(next);

        Some(TimerEvent {
            completed,
            planned_minutes: self.durations.minutes(completed),
            next,
            focus_sessions: self.focus_sessions,
        })
    }

    fn enter(&mut self, mode: SessionMode) {
        self.mode = mode;
        self.running = false;
        self.remaining_secs = self.durations.seconds(mode);
    }
}

impl Default for FocusTimer {
    fn default() -> Self {
        Self::new(TimerDurations::default())
    }
}

#[cfg(test)]
mod tests {
    use super::{FocusTimer, TimerDurations};
    use crate::model::growth::SessionMode;

    fn one_minute_timer() -> FocusTimer {
        FocusTimer::new(TimerDurations {
            focus_minutes: 1,
            short_break_minutes: 1,
            long_break_minutes: 1,
            long_break_every: 4,
        })
    }

    fn run_to_completion(timer: &mut FocusTimer) -> SessionMode {
        timer.start();
        loop {
            if let Some(event) = timer.tick() {
                return event.next;
            }
        }
    }

    #[test]
    fn paused_timer_does_not_tick() {
        let mut timer = FocusTimer::default();
        assert_eq!(timer.tick(), None);
        assert_eq!(timer.remaining_secs(), 25 * 60);
    }

    #[test]
    fn every_fourth_focus_gets_long_break() {
        let mut timer = one_minute_timer();
        let mut breaks = Vec::new();
        for _ in 0..4 {
            breaks.push(run_to_completion(&mut timer));
            assert_eq!(run_to_completion(&mut timer), SessionMode::Focus);
        }
        assert_eq!(
            breaks,
            vec![
                SessionMode::ShortBreak,
                SessionMode::ShortBreak,
                SessionMode::ShortBreak,
                SessionMode::LongBreak
            ]
        );
        assert_eq!(timer.focus_sessions(), 4);
    }

    #[test]
    fn completion_stops_timer_in_next_mode() {
        let mut timer = one_minute_timer();
        timer.start();
        for _ in 0..59 {
            assert_eq!(timer.tick(), None);
        }
        let event = timer.tick().unwrap();
        assert_eq!(event.completed, SessionMode::Focus);
        assert_eq!(event.planned_minutes, 1);
        assert!(!timer.is_running());
        assert_eq!(timer.mode(), SessionMode::ShortBreak);
        assert_eq!(timer.remaining_secs(), 60);
    }

    #[test]
    fn skip_and_reset_do_not_count_sessions() {
        let mut timer = FocusTimer::default();
        timer.start();
        timer.tick();
        timer.reset();
        assert_eq!(timer.remaining_secs(), 25 * 60);
        assert!(!timer.is_running());

        assert_eq!(timer.skip(), SessionMode::ShortBreak);
        assert_eq!(timer.skip(), SessionMode::Focus);
        assert_eq!(timer.focus_sessions(), 0);
    }
}
