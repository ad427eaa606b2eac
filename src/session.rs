//! Per-server session state: who is working and which timers are running
//!
//! A `Session` is created with the server handler and disposed when the
//! handler goes away. Disposing stops the pomodoro and hands back a running
//! stopwatch so the caller can persist it as a time entry.

use crate::model::{MAX_ENTRY_MINUTES, NewTimeEntry, TeamMember};
use crate::timer::{Interval, Pomodoro, Stopwatch};
use chrono::NaiveDateTime;
use tracing::debug;

/// Stored setting holding the current user's email; the config file wins
pub const CURRENT_USER_SETTING: &str = "current_user";

/// What the running stopwatch is being tracked against
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TimerTarget {
    pub project_id: Option<i64>,
    pub task_id: Option<i64>,
    pub description: Option<String>,
    pub billable: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RunningTimer {
    pub stopwatch: Stopwatch,
    pub target: TimerTarget,
}

/// A stopped timer ready to become a time entry
#[derive(Debug, Clone, PartialEq)]
pub struct FinishedTimer {
    pub interval: Interval,
    pub target: TimerTarget,
}

impl FinishedTimer {
    /// Time entry for this interval. Start and end times are kept only when
    /// the interval stays within one day; the duration is capped at one day.
    pub fn to_time_entry(&self, member_id: Option<i64>) -> NewTimeEntry {
        let Interval {
            started_at,
            ended_at,
            ..
        } = self.interval;
        let same_day = started_at.date() == ended_at.date();
        NewTimeEntry {
            member_id,
            date: started_at.date(),
            project_id: self.target.project_id,
            task_id: self.target.task_id,
            description: self.target.description.clone(),
            start_time: same_day.then(|| started_at.time()),
            end_time: same_day.then(|| ended_at.time()),
            duration_minutes: Some(self.interval.minutes().min(MAX_ENTRY_MINUTES)),
            billable: self.target.billable,
            tags: Vec::new(),
        }
    }
}

#[derive(Debug, Default)]
pub struct Session {
    current_user: Option<TeamMember>,
    timer: Option<RunningTimer>,
    pomodoro: Option<Pomodoro>,
}

impl Session {
    pub fn new(current_user: Option<TeamMember>) -> Self {
        Self {
            current_user,
            timer: None,
            pomodoro: None,
        }
    }

    pub fn current_user(&self) -> Option<&TeamMember> {
        self.current_user.as_ref()
    }

    pub fn current_user_id(&self) -> Option<i64> {
        self.current_user.as_ref().map(|m| m.id)
    }

    pub fn set_current_user(&mut self, user: Option<TeamMember>) {
        self.current_user = user;
    }

    pub fn timer(&self) -> Option<&RunningTimer> {
        self.timer.as_ref()
    }

    pub fn timer_mut(&mut self) -> Option<&mut RunningTimer> {
        self.timer.as_mut()
    }

    /// Start tracking. Only one stopwatch runs per session.
    pub fn start_timer(
        &mut self,
        target: TimerTarget,
        now: NaiveDateTime,
    ) -> Result<&RunningTimer, String> {
        if self.timer.is_some() {
            return Err("A timer is already running; stop it first".to_string());
        }
        debug!(?target, "timer started");
        Ok(self.timer.insert(RunningTimer {
            stopwatch: Stopwatch::start(now),
            target,
        }))
    }

    /// Put back a timer taken out by `stop_timer`. Returns false (and drops
    /// `timer`) if another timer was started in the meantime.
    pub fn restore_timer(&mut self, timer: RunningTimer) -> bool {
        if self.timer.is_some() {
            return false;
        }
        debug!(target = ?timer.target, "timer restored");
        self.timer = Some(timer);
        true
    }

    pub fn stop_timer(&mut self, now: NaiveDateTime) -> Option<FinishedTimer> {
        self.timer.take().map(|t| FinishedTimer {
            interval: t.stopwatch.stop(now),
            target: t.target,
        })
    }

    pub fn pomodoro(&self) -> Option<&Pomodoro> {
        self.pomodoro.as_ref()
    }

    /// Replace any running pomodoro
    pub fn start_pomodoro(&mut self, pomodoro: Pomodoro) -> &Pomodoro {
        self.pomodoro.insert(pomodoro)
    }

    pub fn stop_pomodoro(&mut self) -> Option<Pomodoro> {
        self.pomodoro.take()
    }

    /// Stop every timer. Returns the stopwatch interval that still needs
    /// persisting, if one was running. Safe to call more than once.
    pub fn dispose(&mut self, now: NaiveDateTime) -> Option<FinishedTimer> {
        if self.pomodoro.take().is_some() {
            debug!("pomodoro stopped on dispose");
        }
        self.stop_timer(now)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timer::PomodoroSettings;
    use chrono::{NaiveDate, NaiveTime};

    fn at(day: u32, h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 3, day)
            .unwrap()
            .and_hms_opt(h, m, 0)
            .unwrap()
    }

    #[test]
    fn test_single_running_timer() {
        let mut session = Session::new(None);
        session
            .start_timer(TimerTarget::default(), at(10, 9, 0))
            .unwrap();
        assert!(session.start_timer(TimerTarget::default(), at(10, 9, 5)).is_err());

        let finished = session.stop_timer(at(10, 9, 45)).unwrap();
        assert_eq!(finished.interval.minutes(), 45);
        assert!(session.timer().is_none());
        assert!(session.stop_timer(at(10, 10, 0)).is_none());
    }

    #[test]
    fn test_finished_timer_to_time_entry() {
        let mut session = Session::new(None);
        let target = TimerTarget {
            project_id: Some(3),
            description: Some("Pairing".to_string()),
            billable: true,
            ..Default::default()
        };
        session.start_timer(target, at(10, 9, 0)).unwrap();
        let entry = session.stop_timer(at(10, 10, 30)).unwrap().to_time_entry(Some(7));
        assert_eq!(entry.member_id, Some(7));
        assert_eq!(entry.project_id, Some(3));
        assert_eq!(entry.start_time, NaiveTime::from_hms_opt(9, 0, 0));
        assert_eq!(entry.end_time, NaiveTime::from_hms_opt(10, 30, 0));
        assert_eq!(entry.resolved_duration(), Ok(90));
        assert!(entry.billable);
    }

    #[test]
    fn test_overnight_timer_drops_clock_times() {
        let mut session = Session::new(None);
        session
            .start_timer(TimerTarget::default(), at(10, 23, 0))
            .unwrap();
        let entry = session.stop_timer(at(11, 1, 0)).unwrap().to_time_entry(None);
        assert_eq!(entry.date, NaiveDate::from_ymd_opt(2025, 3, 10).unwrap());
        assert_eq!(entry.start_time, None);
        assert_eq!(entry.resolved_duration(), Ok(120));
    }

    #[test]
    fn test_multi_day_timer_is_capped() {
        let mut session = Session::new(None);
        session
            .start_timer(TimerTarget::default(), at(10, 9, 0))
            .unwrap();
        let entry = session.stop_timer(at(13, 9, 0)).unwrap().to_time_entry(None);
        assert_eq!(entry.resolved_duration(), Ok(MAX_ENTRY_MINUTES));
    }

    #[test]
    fn test_restore_timer_keeps_elapsed_time() {
        let mut session = Session::new(None);
        session
            .start_timer(TimerTarget::default(), at(10, 9, 0))
            .unwrap();
        let running = session.timer().cloned().unwrap();
        session.stop_timer(at(10, 9, 20)).unwrap();

        assert!(session.restore_timer(running.clone()));
        let finished = session.stop_timer(at(10, 9, 50)).unwrap();
        assert_eq!(finished.interval.minutes(), 50);

        session
            .start_timer(TimerTarget::default(), at(10, 10, 0))
            .unwrap();
        assert!(!session.restore_timer(running));
        assert_eq!(session.timer().unwrap().stopwatch.started_at(), at(10, 10, 0));
    }

    #[test]
    fn test_dispose_stops_everything() {
        let mut session = Session::new(None);
        let pomodoro = Pomodoro::start(PomodoroSettings::default(), at(10, 9, 0)).unwrap();
        session.start_pomodoro(pomodoro);
        session
            .start_timer(TimerTarget::default(), at(10, 9, 0))
            .unwrap();

        let finished = session.dispose(at(10, 9, 30));
        assert!(finished.is_some());
        assert!(session.pomodoro().is_none());
        assert!(session.timer().is_none());
        assert!(session.dispose(at(10, 9, 40)).is_none());
    }
}
