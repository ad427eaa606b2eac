use super::aggregate::histogram;
use crate::model::{
    ApprovalStatus, AttendanceRecord, AttendanceStatus, MemberStatus, TeamMember, TimeEntry,
};
use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TimeSummary {
    pub entries: usize,
    pub total_minutes: i64,
    pub billable_minutes: i64,
    /// Keyed by project id; entries without a project are under `None`
    pub minutes_by_project: BTreeMap<Option<i64>, i64>,
    pub by_approval: BTreeMap<ApprovalStatus, usize>,
}

impl TimeSummary {
    /// Share of billable time in `[0, 1]`; 0 when nothing was logged
    pub fn billable_ratio(&self) -> f64 {
        if self.total_minutes <= 0 {
            0.0
        } else {
            self.billable_minutes as f64 / self.total_minutes as f64
        }
    }
}

pub fn summarize_time(entries: &[TimeEntry]) -> TimeSummary {
    let mut summary = TimeSummary {
        entries: entries.len(),
        by_approval: histogram(entries, |e| e.approval),
        ..Default::default()
    };
    for entry in entries {
        let minutes = entry.duration_minutes;
        summary.total_minutes = summary.total_minutes.saturating_add(minutes);
        if entry.billable {
            summary.billable_minutes = summary.billable_minutes.saturating_add(minutes);
        }
        let by_project = summary.minutes_by_project.entry(entry.project_id).or_insert(0);
        *by_project = by_project.saturating_add(minutes);
    }
    summary
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AttendanceSummary {
    pub total: usize,
    pub by_status: BTreeMap<AttendanceStatus, usize>,
    pub worked_minutes: i64,
}

impl AttendanceSummary {
    pub fn count(&self, status: AttendanceStatus) -> usize {
        self.by_status.get(&status).copied().unwrap_or(0)
    }

    /// (present + late) / total, 0 for no records
    pub fn attendance_rate(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        let attended = self.count(AttendanceStatus::Present) + self.count(AttendanceStatus::Late);
        attended as f64 / self.total as f64
    }
}

pub fn summarize_attendance(records: &[AttendanceRecord]) -> AttendanceSummary {
    AttendanceSummary {
        total: records.len(),
        by_status: histogram(records, |r| r.status),
        worked_minutes: records.iter().filter_map(|r| r.worked_minutes()).sum(),
    }
}

/// Headcount by department and member status
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TeamStats {
    pub total: usize,
    pub by_department: BTreeMap<String, usize>,
    pub by_status: BTreeMap<MemberStatus, usize>,
}

impl TeamStats {
    pub fn active(&self) -> usize {
        self.by_status.get(&MemberStatus::Active).copied().unwrap_or(0)
    }
}

pub fn team_stats(members: &[TeamMember]) -> TeamStats {
    TeamStats {
        total: members.len(),
        by_department: histogram(members, |m| m.department.clone()),
        by_status: histogram(members, |m| m.status),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveTime, TimeZone, Utc};

    fn entry(
        project_id: Option<i64>,
        minutes: i64,
        billable: bool,
        approval: ApprovalStatus,
    ) -> TimeEntry {
        TimeEntry {
            id: 0,
            member_id: None,
            date: NaiveDate::from_ymd_opt(2025, 3, 3).unwrap(),
            project_id,
            task_id: None,
            description: None,
            start_time: None,
            end_time: None,
            duration_minutes: minutes,
            billable,
            tags: Vec::new(),
            approval,
            created_at: Utc.with_ymd_and_hms(2025, 3, 3, 9, 0, 0).unwrap(),
        }
    }

    fn record(status: AttendanceStatus, hours: Option<(u32, u32)>) -> AttendanceRecord {
        AttendanceRecord {
            id: 0,
            member_id: 1,
            date: NaiveDate::from_ymd_opt(2025, 3, 3).unwrap(),
            check_in: hours.and_then(|(i, _)| NaiveTime::from_hms_opt(i, 0, 0)),
            check_out: hours.and_then(|(_, o)| NaiveTime::from_hms_opt(o, 0, 0)),
            status,
        }
    }

    #[test]
    fn test_summarize_time() {
        let entries = vec![
            entry(Some(1), 60, true, ApprovalStatus::Approved),
            entry(Some(1), 30, false, ApprovalStatus::Pending),
            entry(None, 30, true, ApprovalStatus::Pending),
        ];
        let summary = summarize_time(&entries);
        assert_eq!(summary.total_minutes, 120);
        assert_eq!(summary.billable_minutes, 90);
        assert_eq!(summary.minutes_by_project[&Some(1)], 90);
        assert_eq!(summary.minutes_by_project[&None], 30);
        assert_eq!(summary.by_approval[&ApprovalStatus::Pending], 2);
        assert!((summary.billable_ratio() - 0.75).abs() < f64::EPSILON);
    }

    #[test]
    fn test_summarize_time_saturates() {
        let entries = vec![
            entry(Some(1), i64::MAX, true, ApprovalStatus::Pending),
            entry(Some(1), 1, true, ApprovalStatus::Pending),
        ];
        let summary = summarize_time(&entries);
        assert_eq!(summary.total_minutes, i64::MAX);
        assert_eq!(summary.billable_minutes, i64::MAX);
        assert_eq!(summary.minutes_by_project[&Some(1)], i64::MAX);
    }

    #[test]
    fn test_empty_summaries_are_zeroed() {
        let time = summarize_time(&[]);
        assert_eq!(time, TimeSummary::default());
        assert_eq!(time.billable_ratio(), 0.0);

        let attendance = summarize_attendance(&[]);
        assert_eq!(attendance.total, 0);
        assert_eq!(attendance.attendance_rate(), 0.0);
    }

    #[test]
    fn test_attendance_rate_counts_late_as_attended() {
        let records = vec![
            record(AttendanceStatus::Present, Some((9, 17))),
            record(AttendanceStatus::Late, Some((10, 17))),
            record(AttendanceStatus::Absent, None),
            record(AttendanceStatus::OnLeave, None),
        ];
        let summary = summarize_attendance(&records);
        assert_eq!(summary.count(AttendanceStatus::Present), 1);
        assert_eq!(summary.count(AttendanceStatus::Late), 1);
        assert_eq!(summary.attendance_rate(), 0.5);
        assert_eq!(summary.worked_minutes, 8 * 60 + 7 * 60);
    }
}
