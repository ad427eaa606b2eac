use super::labeled_enum;
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

labeled_enum! {
    /// Manager review state of a time entry
    ApprovalStatus ("approval status") {
        Pending => "Pending",
        Approved => "Approved",
        Rejected => "Rejected",
    }
}

/// Longest duration a single entry may record: one full day
pub const MAX_ENTRY_MINUTES: i64 = 24 * 60;

/// A row from the `time_entries` table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeEntry {
    pub id: i64,
    pub member_id: Option<i64>,
    pub date: NaiveDate,
    pub project_id: Option<i64>,
    pub task_id: Option<i64>,
    pub description: Option<String>,
    pub start_time: Option<NaiveTime>,
    pub end_time: Option<NaiveTime>,
    pub duration_minutes: i64,
    pub billable: bool,
    #[serde(default)]
    pub tags: Vec<String>,
    pub approval: ApprovalStatus,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewTimeEntry {
    pub member_id: Option<i64>,
    pub date: NaiveDate,
    pub project_id: Option<i64>,
    pub task_id: Option<i64>,
    pub description: Option<String>,
    pub start_time: Option<NaiveTime>,
    pub end_time: Option<NaiveTime>,
    pub duration_minutes: Option<i64>,
    pub billable: bool,
    pub tags: Vec<String>,
}

impl NewTimeEntry {
    /// Resolve the duration: an explicit value wins, otherwise it is derived
    /// from start/end on the same day. Entries crossing midnight must pass
    /// the duration explicitly.
    pub fn resolved_duration(&self) -> Result<i64, String> {
        match (self.duration_minutes, self.start_time, self.end_time) {
            (Some(minutes), _, _) if minutes < 0 => {
                Err(format!("duration must not be negative, got {}", minutes))
            }
            (Some(minutes), _, _) if minutes > MAX_ENTRY_MINUTES => Err(format!(
                "duration must be at most {} minutes, got {}",
                MAX_ENTRY_MINUTES, minutes
            )),
            (Some(minutes), _, _) => Ok(minutes),
            (None, Some(start), Some(end)) if end >= start => Ok((end - start).num_minutes()),
            (None, Some(start), Some(end)) => Err(format!(
                "end time {} is before start time {}",
                end.format("%H:%M"),
                start.format("%H:%M")
            )),
            (None, _, _) => Err("either duration or both start and end time are required".into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry() -> NewTimeEntry {
        NewTimeEntry {
            member_id: None,
            date: NaiveDate::from_ymd_opt(2025, 3, 10).unwrap(),
            project_id: None,
            task_id: None,
            description: None,
            start_time: None,
            end_time: None,
            duration_minutes: None,
            billable: true,
            tags: Vec::new(),
        }
    }

    #[test]
    fn test_duration_from_times() {
        let mut e = entry();
        e.start_time = NaiveTime::from_hms_opt(9, 15, 0);
        e.end_time = NaiveTime::from_hms_opt(11, 0, 0);
        assert_eq!(e.resolved_duration(), Ok(105));
    }

    #[test]
    fn test_explicit_duration_wins() {
        let mut e = entry();
        e.start_time = NaiveTime::from_hms_opt(9, 0, 0);
        e.end_time = NaiveTime::from_hms_opt(10, 0, 0);
        e.duration_minutes = Some(30);
        assert_eq!(e.resolved_duration(), Ok(30));
    }

    #[test]
    fn test_duration_errors() {
        let mut e = entry();
        assert!(e.resolved_duration().is_err());

        e.start_time = NaiveTime::from_hms_opt(17, 0, 0);
        e.end_time = NaiveTime::from_hms_opt(9, 0, 0);
        assert!(e.resolved_duration().unwrap_err().contains("before start"));

        e.duration_minutes = Some(-5);
        assert!(e.resolved_duration().unwrap_err().contains("negative"));
    }

    #[test]
    fn test_duration_capped_at_one_day() {
        let mut e = entry();
        e.duration_minutes = Some(MAX_ENTRY_MINUTES);
        assert_eq!(e.resolved_duration(), Ok(1440));

        e.duration_minutes = Some(MAX_ENTRY_MINUTES + 1);
        assert!(e.resolved_duration().unwrap_err().contains("at most 1440"));

        e.duration_minutes = Some(i64::MAX);
        assert!(e.resolved_duration().is_err());
    }
}
