//! Time tracking handlers: manual entries, approvals, the stopwatch and the
//! pomodoro timer

use crate::WorkboardServerHandler;
use crate::access::{self, TimeEntryFilter};
use crate::formatting::{self, format_minutes};
use crate::model::{ApprovalStatus, NewTimeEntry, Project, Task};
use crate::session::TimerTarget;
use crate::timer::Pomodoro;
use crate::validation::{
    parse_optional, parse_optional_date, parse_optional_time, parse_param, parse_tags,
};
use mcp_attr::{Result as McpResult, bail_public};
use tracing::warn;

impl WorkboardServerHandler {
    /// Reject references to projects or tasks that do not exist
    fn check_targets(&self, project_id: Option<i64>, task_id: Option<i64>) -> McpResult<()> {
        let store = self.store();
        if let Some(id) = project_id
            && matches!(store.get::<Project>(id), Ok(None))
        {
            drop(store);
            bail_public!(_, "Project {} does not exist", id);
        }
        if let Some(id) = task_id
            && matches!(store.get::<Task>(id), Ok(None))
        {
            drop(store);
            bail_public!(_, "Task {} does not exist", id);
        }
        Ok(())
    }

    #[allow(clippy::too_many_arguments)]
    pub async fn handle_log_time(
        &self,
        date: Option<String>,
        project_id: Option<i64>,
        task_id: Option<i64>,
        description: Option<String>,
        start_time: Option<String>,
        end_time: Option<String>,
        duration_minutes: Option<i64>,
        billable: Option<bool>,
        tags: Option<String>,
        member_id: Option<i64>,
    ) -> McpResult<String> {
        self.check_targets(project_id, task_id)?;
        let entry = NewTimeEntry {
            member_id: member_id.or_else(|| self.session().current_user_id()),
            date: parse_optional_date(date.as_deref())?.unwrap_or(Self::now().date()),
            project_id,
            task_id,
            description: description.filter(|d| !d.trim().is_empty()),
            start_time: parse_optional_time(start_time.as_deref())?,
            end_time: parse_optional_time(end_time.as_deref())?,
            duration_minutes,
            billable: billable.unwrap_or(true),
            tags: parse_tags(tags.as_deref()),
        };
        if let Err(e) = entry.resolved_duration() {
            bail_public!(_, "Invalid time entry: {}", e);
        }

        let created = match self.store().insert_time_entry(&entry) {
            Ok(e) => e,
            Err(e) => bail_public!(_, "Failed to log time: {:#}", e),
        };

        if let Err(e) = self.persist(&format!("Log time entry {}", created.id)) {
            bail_public!(_, "Failed to save: {:#}", e);
        }

        Ok(format!(
            "Time entry created with ID: {} ({} on {}, {})",
            created.id,
            format_minutes(created.duration_minutes),
            created.date,
            created.approval
        ))
    }

    #[allow(clippy::too_many_arguments)]
    pub async fn handle_list_time_entries(
        &self,
        member_id: Option<i64>,
        project_id: Option<i64>,
        from: Option<String>,
        to: Option<String>,
        approval: Option<String>,
        query: Option<String>,
        limit: Option<usize>,
    ) -> McpResult<String> {
        let filter = TimeEntryFilter {
            member_id,
            project_id,
            from: parse_optional_date(from.as_deref())?,
            to: parse_optional_date(to.as_deref())?,
            approval: parse_optional(approval.as_deref())?,
            description_contains: query,
            limit,
        };
        let entries = access::fetch_time_entries(&self.store(), &filter);
        Ok(formatting::format_time_entries(&entries))
    }

    pub async fn handle_review_time_entry(&self, id: i64, approval: String) -> McpResult<String> {
        let approval: ApprovalStatus = parse_param(&approval)?;

        match self.store().set_time_entry_approval(id, approval) {
            Ok(true) => {}
            Ok(false) => bail_public!(_, "Time entry {} not found", id),
            Err(e) => bail_public!(_, "Failed to review time entry {}: {:#}", id, e),
        }

        if let Err(e) = self.persist(&format!("Mark time entry {} {}", id, approval)) {
            bail_public!(_, "Failed to save: {:#}", e);
        }

        Ok(format!("Time entry {} marked {}", id, approval))
    }

    pub async fn handle_time_summary(
        &self,
        member_id: Option<i64>,
        project_id: Option<i64>,
        from: Option<String>,
        to: Option<String>,
    ) -> McpResult<String> {
        let filter = TimeEntryFilter {
            member_id,
            project_id,
            from: parse_optional_date(from.as_deref())?,
            to: parse_optional_date(to.as_deref())?,
            ..Default::default()
        };
        let summary = access::time_summary(&self.store(), &filter);
        Ok(formatting::format_time_summary(&summary))
    }

    /// Stopwatch control: start, pause, resume, stop or status. Stopping
    /// logs the elapsed time as a time entry.
    pub async fn handle_timer(
        &self,
        action: String,
        project_id: Option<i64>,
        task_id: Option<i64>,
        description: Option<String>,
        billable: Option<bool>,
    ) -> McpResult<String> {
        let now = Self::now();
        match action.trim().to_lowercase().as_str() {
            "start" => {
                self.check_targets(project_id, task_id)?;
                let target = TimerTarget {
                    project_id,
                    task_id,
                    description: description.filter(|d| !d.trim().is_empty()),
                    billable: billable.unwrap_or(true),
                };
                let mut session = self.session();
                if let Err(e) = session.start_timer(target, now) {
                    bail_public!(_, "{}", e);
                }
                Ok(format!("Timer started at {}", now.format("%H:%M")))
            }
            "pause" | "resume" => {
                let mut session = self.session();
                let Some(timer) = session.timer_mut() else {
                    bail_public!(_, "No timer is running");
                };
                let changed = if action.trim().eq_ignore_ascii_case("pause") {
                    timer.stopwatch.pause(now)
                } else {
                    timer.stopwatch.resume(now)
                };
                let elapsed = timer.stopwatch.elapsed(now).num_minutes();
                drop(session);
                if changed {
                    Ok(format!(
                        "Timer {}d ({} elapsed)",
                        action.trim().to_lowercase(),
                        format_minutes(elapsed)
                    ))
                } else {
                    Ok(format!(
                        "Timer already {}",
                        if action.trim().eq_ignore_ascii_case("pause") {
                            "paused"
                        } else {
                            "running"
                        }
                    ))
                }
            }
            "stop" => {
                let mut session = self.session();
                let member_id = session.current_user_id();
                let running = session.timer().cloned();
                let (Some(running), Some(finished)) = (running, session.stop_timer(now)) else {
                    drop(session);
                    bail_public!(_, "No timer is running");
                };
                drop(session);

                let entry = finished.to_time_entry(member_id);
                let logged = self.store().insert_time_entry(&entry);
                let created = match logged {
                    Ok(e) => e,
                    Err(e) => {
                        // keep tracking so the elapsed time is not lost
                        if !self.session().restore_timer(running) {
                            warn!("timer could not be restored after a failed insert");
                        }
                        bail_public!(_, "Failed to log timer: {:#}", e);
                    }
                };
                if let Err(e) = self.persist(&format!("Log time entry {}", created.id)) {
                    bail_public!(_, "Failed to save: {:#}", e);
                }
                Ok(format!(
                    "Timer stopped: {} logged as time entry {}",
                    format_minutes(created.duration_minutes),
                    created.id
                ))
            }
            "status" => {
                let session = self.session();
                Ok(match session.timer() {
                    Some(timer) => {
                        let state = if timer.stopwatch.is_running() {
                            "running"
                        } else {
                            "paused"
                        };
                        format!(
                            "Timer {} since {} ({} elapsed)",
                            state,
                            timer.stopwatch.started_at().format("%H:%M"),
                            format_minutes(timer.stopwatch.elapsed(now).num_minutes())
                        )
                    }
                    None => "No timer is running".to_string(),
                })
            }
            _ => bail_public!(
                _,
                "Invalid timer action '{}'. Valid actions: start, pause, resume, stop, status",
                action
            ),
        }
    }

    /// Pomodoro control: start, status or stop
    pub async fn handle_pomodoro(&self, action: String) -> McpResult<String> {
        let now = Self::now();
        let mut session = self.session();
        match action.trim().to_lowercase().as_str() {
            "start" => {
                let pomodoro = match Pomodoro::start(self.config.pomodoro, now) {
                    Ok(p) => p,
                    Err(e) => {
                        drop(session);
                        bail_public!(_, "{}", e);
                    }
                };
                let settings = *session.start_pomodoro(pomodoro).settings();
                Ok(format!(
                    "Pomodoro started: {}m work, {}m short break, {}m long break every {} rounds",
                    settings.work_minutes,
                    settings.short_break_minutes,
                    settings.long_break_minutes,
                    settings.long_break_every
                ))
            }
            "status" => Ok(match session.pomodoro() {
                Some(p) => {
                    let state = p.phase_at(now);
                    format!(
                        "{}: {} remaining ({} work session(s) completed)",
                        state.phase,
                        format_minutes((state.remaining.num_seconds() + 59) / 60),
                        state.completed
                    )
                }
                None => "No pomodoro is running".to_string(),
            }),
            "stop" => Ok(match session.stop_pomodoro() {
                Some(p) => format!(
                    "Pomodoro stopped after {} work session(s)",
                    p.phase_at(now).completed
                ),
                None => "No pomodoro is running".to_string(),
            }),
            _ => {
                drop(session);
                bail_public!(
                    _,
                    "Invalid pomodoro action '{}'. Valid actions: start, status, stop",
                    action
                )
            }
        }
    }
}
