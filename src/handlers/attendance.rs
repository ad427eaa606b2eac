//! Attendance handlers

use crate::WorkboardServerHandler;
use crate::access;
use crate::formatting;
use crate::model::{AttendanceStatus, TeamMember};
use crate::stats::summarize_attendance;
use crate::validation::{parse_optional_date, parse_optional_time};
use chrono::Duration;
use mcp_attr::{Result as McpResult, bail_public};

/// Default look-back of the attendance summary, in days
const SUMMARY_DAYS: i64 = 30;

impl WorkboardServerHandler {
    /// Explicit member id, else the configured current user
    fn resolve_member(&self, member_id: Option<i64>) -> McpResult<i64> {
        if let Some(id) = member_id {
            return match self.store().get::<TeamMember>(id) {
                Ok(Some(_)) => Ok(id),
                Ok(None) => bail_public!(_, "Team member {} does not exist", id),
                Err(e) => bail_public!(_, "Failed to look up team member {}: {:#}", id, e),
            };
        }
        match self.session().current_user_id() {
            Some(id) => Ok(id),
            None => bail_public!(
                _,
                "No member_id given and no current user configured. Pass member_id or set current_user in the config file."
            ),
        }
    }

    pub async fn handle_check_in(
        &self,
        member_id: Option<i64>,
        date: Option<String>,
        time: Option<String>,
    ) -> McpResult<String> {
        let member_id = self.resolve_member(member_id)?;
        let now = Self::now();
        let date = parse_optional_date(date.as_deref())?.unwrap_or(now.date());
        let at = parse_optional_time(time.as_deref())?.unwrap_or(now.time());
        let status = AttendanceStatus::for_check_in(at, self.config.workday_start);

        let record = match self.store().check_in(member_id, date, at, status) {
            Ok(r) => r,
            Err(e) => bail_public!(_, "Failed to check in: {:#}", e),
        };

        if let Err(e) = self.persist(&format!("Check in member {} on {}", member_id, date)) {
            bail_public!(_, "Failed to save: {:#}", e);
        }

        Ok(format!(
            "Member {} checked in at {} on {} ({})",
            member_id,
            at.format("%H:%M"),
            date,
            record.status
        ))
    }

    pub async fn handle_check_out(
        &self,
        member_id: Option<i64>,
        date: Option<String>,
        time: Option<String>,
    ) -> McpResult<String> {
        let member_id = self.resolve_member(member_id)?;
        let now = Self::now();
        let date = parse_optional_date(date.as_deref())?.unwrap_or(now.date());
        let at = parse_optional_time(time.as_deref())?.unwrap_or(now.time());

        let record = match self.store().check_out(member_id, date, at) {
            Ok(Some(r)) => r,
            Ok(None) => bail_public!(_, "Member {} has not checked in on {}", member_id, date),
            Err(e) => bail_public!(_, "Failed to check out: {:#}", e),
        };

        if let Err(e) = self.persist(&format!("Check out member {} on {}", member_id, date)) {
            bail_public!(_, "Failed to save: {:#}", e);
        }

        let worked = record
            .worked_minutes()
            .map(formatting::format_minutes)
            .unwrap_or_else(|| "unknown".to_string());
        Ok(format!(
            "Member {} checked out at {} on {} (worked {})",
            member_id,
            at.format("%H:%M"),
            date,
            worked
        ))
    }

    /// Attendance records and rate over a date range, last 30 days by default
    pub async fn handle_attendance_summary(
        &self,
        member_id: Option<i64>,
        from: Option<String>,
        to: Option<String>,
    ) -> McpResult<String> {
        let to = parse_optional_date(to.as_deref())?.unwrap_or(Self::now().date());
        let from = parse_optional_date(from.as_deref())?
            .unwrap_or(to - Duration::days(SUMMARY_DAYS - 1));
        if from > to {
            bail_public!(_, "Invalid range: from {} is after to {}", from, to);
        }

        let records = access::fetch_attendance(&self.store(), member_id, from, to);
        let mut out = format!("Attendance from {} to {}\n", from, to);
        out.push_str(&formatting::format_attendance_summary(&summarize_attendance(&records)));
        out.push('\n');
        out.push_str(&formatting::format_attendance(&records));
        Ok(out)
    }
}
