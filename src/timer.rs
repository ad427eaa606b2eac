//! Stopwatch and pomodoro timers
//!
//! Timers never read the clock themselves; every operation takes the current
//! local time from the caller.

use chrono::{Duration, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// A pausable stopwatch. Elapsed time accumulates across pauses.
#[derive(Debug, Clone, PartialEq)]
pub struct Stopwatch {
    started_at: NaiveDateTime,
    running_since: Option<NaiveDateTime>,
    accumulated: Duration,
}

/// A stopped stopwatch
#[derive(Debug, Clone, PartialEq)]
pub struct Interval {
    pub started_at: NaiveDateTime,
    pub ended_at: NaiveDateTime,
    pub elapsed: Duration,
}

impl Interval {
    /// Elapsed time rounded to the nearest minute, never less than one
    pub fn minutes(&self) -> i64 {
        ((self.elapsed.num_seconds() + 30) / 60).max(1)
    }
}

fn since(start: NaiveDateTime, now: NaiveDateTime) -> Duration {
    // a clock that went backwards contributes nothing
    (now - start).max(Duration::zero())
}

impl Stopwatch {
    pub fn start(now: NaiveDateTime) -> Self {
        Self {
            started_at: now,
            running_since: Some(now),
            accumulated: Duration::zero(),
        }
    }

    pub fn started_at(&self) -> NaiveDateTime {
        self.started_at
    }

    pub fn is_running(&self) -> bool {
        self.running_since.is_some()
    }

    pub fn elapsed(&self, now: NaiveDateTime) -> Duration {
        match self.running_since {
            Some(since_at) => self.accumulated + since(since_at, now),
            None => self.accumulated,
        }
    }

    /// Returns false if already paused
    pub fn pause(&mut self, now: NaiveDateTime) -> bool {
        match self.running_since.take() {
            Some(since_at) => {
                self.accumulated = self.accumulated + since(since_at, now);
                true
            }
            None => false,
        }
    }

    /// Returns false if already running
    pub fn resume(&mut self, now: NaiveDateTime) -> bool {
        if self.running_since.is_some() {
            return false;
        }
        self.running_since = Some(now);
        true
    }

    pub fn stop(self, now: NaiveDateTime) -> Interval {
        Interval {
            started_at: self.started_at,
            ended_at: now,
            elapsed: self.elapsed(now),
        }
    }
}

/// Pomodoro lengths, in minutes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PomodoroSettings {
    pub work_minutes: u32,
    pub short_break_minutes: u32,
    pub long_break_minutes: u32,
    /// A long break replaces the short one after this many work phases
    pub long_break_every: u32,
}

impl Default for PomodoroSettings {
    fn default() -> Self {
        Self {
            work_minutes: 25,
            short_break_minutes: 5,
            long_break_minutes: 15,
            long_break_every: 4,
        }
    }
}

/// Longest single pomodoro phase, in minutes
pub const MAX_PHASE_MINUTES: u32 = 240;
/// Most work phases allowed before a long break
pub const MAX_LONG_BREAK_EVERY: u32 = 12;

impl PomodoroSettings {
    pub fn validate(&self) -> Result<(), String> {
        for (name, minutes) in [
            ("work_minutes", self.work_minutes),
            ("short_break_minutes", self.short_break_minutes),
            ("long_break_minutes", self.long_break_minutes),
        ] {
            if !(1..=MAX_PHASE_MINUTES).contains(&minutes) {
                return Err(format!(
                    "{} must be between 1 and {}, got {}",
                    name, MAX_PHASE_MINUTES, minutes
                ));
            }
        }
        if !(1..=MAX_LONG_BREAK_EVERY).contains(&self.long_break_every) {
            return Err(format!(
                "long_break_every must be between 1 and {}, got {}",
                MAX_LONG_BREAK_EVERY, self.long_break_every
            ));
        }
        Ok(())
    }

    fn work(&self) -> Duration {
        Duration::minutes(i64::from(self.work_minutes))
    }

    fn break_after(&self, completed_work: u32) -> (PomodoroPhase, Duration) {
        if completed_work % self.long_break_every == 0 {
            (
                PomodoroPhase::LongBreak,
                Duration::minutes(i64::from(self.long_break_minutes)),
            )
        } else {
            (
                PomodoroPhase::ShortBreak,
                Duration::minutes(i64::from(self.short_break_minutes)),
            )
        }
    }

    /// One full round: `long_break_every` work phases and their breaks
    fn round(&self) -> Duration {
        let every = i64::from(self.long_break_every);
        Duration::minutes(
            i64::from(self.work_minutes) * every
                + i64::from(self.short_break_minutes) * (every - 1)
                + i64::from(self.long_break_minutes),
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PomodoroPhase {
    Work,
    ShortBreak,
    LongBreak,
}

impl std::fmt::Display for PomodoroPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            PomodoroPhase::Work => "Work",
            PomodoroPhase::ShortBreak => "Short break",
            PomodoroPhase::LongBreak => "Long break",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PhaseState {
    pub phase: PomodoroPhase,
    /// Work phases finished before this point
    pub completed: u32,
    pub remaining: Duration,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Pomodoro {
    settings: PomodoroSettings,
    started_at: NaiveDateTime,
}

impl Pomodoro {
    pub fn start(settings: PomodoroSettings, now: NaiveDateTime) -> Result<Self, String> {
        settings.validate()?;
        Ok(Self {
            settings,
            started_at: now,
        })
    }

    pub fn settings(&self) -> &PomodoroSettings {
        &self.settings
    }

    pub fn started_at(&self) -> NaiveDateTime {
        self.started_at
    }

    /// Phase in effect at `now`, derived from time since start
    pub fn phase_at(&self, now: NaiveDateTime) -> PhaseState {
        let s = &self.settings;
        let mut left = since(self.started_at, now);

        let round = s.round();
        let rounds = left.num_seconds() / round.num_seconds();
        left = left - Duration::seconds(round.num_seconds() * rounds);
        let mut completed = u32::try_from(rounds)
            .unwrap_or(u32::MAX)
            .saturating_mul(s.long_break_every);

        loop {
            if left < s.work() {
                return PhaseState {
                    phase: PomodoroPhase::Work,
                    completed,
                    remaining: s.work() - left,
                };
            }
            left = left - s.work();
            completed = completed.saturating_add(1);

            let (phase, length) = s.break_after(completed);
            if left < length {
                return PhaseState {
                    phase,
                    completed,
                    remaining: length - left,
                };
            }
            left = left - length;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(h: u32, m: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 3, 10)
            .unwrap()
            .and_hms_opt(h, m, s)
            .unwrap()
    }

    #[test]
    fn test_stopwatch_accumulates_across_pauses() {
        let mut sw = Stopwatch::start(at(9, 0, 0));
        assert!(sw.is_running());
        assert!(sw.pause(at(9, 20, 0)));
        assert!(!sw.pause(at(9, 25, 0)));
        assert_eq!(sw.elapsed(at(10, 0, 0)), Duration::minutes(20));
        assert!(sw.resume(at(10, 0, 0)));
        assert!(!sw.resume(at(10, 1, 0)));

        let interval = sw.stop(at(10, 10, 0));
        assert_eq!(interval.elapsed, Duration::minutes(30));
        assert_eq!(interval.started_at, at(9, 0, 0));
        assert_eq!(interval.minutes(), 30);
    }

    #[test]
    fn test_interval_minutes_round_and_floor_at_one() {
        let short = Stopwatch::start(at(9, 0, 0)).stop(at(9, 0, 10));
        assert_eq!(short.minutes(), 1);
        let rounded = Stopwatch::start(at(9, 0, 0)).stop(at(9, 10, 31));
        assert_eq!(rounded.minutes(), 11);
    }

    #[test]
    fn test_backwards_clock_is_zero() {
        let sw = Stopwatch::start(at(9, 0, 0));
        assert_eq!(sw.elapsed(at(8, 0, 0)), Duration::zero());
    }

    #[test]
    fn test_pomodoro_phases() {
        let p = Pomodoro::start(PomodoroSettings::default(), at(9, 0, 0)).unwrap();

        let s = p.phase_at(at(9, 10, 0));
        assert_eq!(s.phase, PomodoroPhase::Work);
        assert_eq!(s.remaining, Duration::minutes(15));
        assert_eq!(s.completed, 0);

        let s = p.phase_at(at(9, 27, 0));
        assert_eq!(s.phase, PomodoroPhase::ShortBreak);
        assert_eq!(s.completed, 1);

        // 4 x 25 work + 3 x 5 short = 115 minutes, then the long break
        let s = p.phase_at(at(10, 56, 0));
        assert_eq!(s.phase, PomodoroPhase::LongBreak);
        assert_eq!(s.completed, 4);
        assert_eq!(s.remaining, Duration::minutes(14));

        // one full round is 130 minutes
        let s = p.phase_at(at(11, 10, 0));
        assert_eq!(s.phase, PomodoroPhase::Work);
        assert_eq!(s.completed, 4);
        assert_eq!(s.remaining, Duration::minutes(25));
    }

    #[test]
    fn test_pomodoro_rejects_zero_lengths() {
        let settings = PomodoroSettings {
            work_minutes: 0,
            ..Default::default()
        };
        assert!(Pomodoro::start(settings, at(9, 0, 0)).is_err());
    }

    #[test]
    fn test_pomodoro_rejects_oversized_settings() {
        let too_long = PomodoroSettings {
            long_break_minutes: MAX_PHASE_MINUTES + 1,
            ..Default::default()
        };
        assert!(too_long.validate().unwrap_err().contains("long_break_minutes"));

        let too_many = PomodoroSettings {
            long_break_every: u32::MAX,
            ..Default::default()
        };
        assert!(Pomodoro::start(too_many, at(9, 0, 0)).is_err());

        let largest = PomodoroSettings {
            work_minutes: MAX_PHASE_MINUTES,
            short_break_minutes: MAX_PHASE_MINUTES,
            long_break_minutes: MAX_PHASE_MINUTES,
            long_break_every: MAX_LONG_BREAK_EVERY,
        };
        assert!(largest.validate().is_ok());
    }

    #[test]
    fn test_pomodoro_phase_years_later() {
        let settings = PomodoroSettings {
            work_minutes: 1,
            short_break_minutes: 1,
            long_break_minutes: 1,
            long_break_every: 1,
        };
        let pomodoro = Pomodoro::start(settings, at(9, 0, 0)).unwrap();
        // one round is two minutes
        let state = pomodoro.phase_at(at(9, 0, 0) + Duration::days(3650));
        assert_eq!(state.phase, PomodoroPhase::Work);
        assert_eq!(state.completed, 3650 * 24 * 30);
    }

    #[test]
    fn test_pomodoro_settings_from_partial_toml() {
        let settings: PomodoroSettings = toml::from_str("work_minutes = 50").unwrap();
        assert_eq!(settings.work_minutes, 50);
        assert_eq!(settings.short_break_minutes, 5);
    }
}
