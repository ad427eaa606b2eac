use super::labeled_enum;
use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

labeled_enum! {
    /// Attendance state for one member on one day
    AttendanceStatus ("attendance status") {
        Present => "Present",
        Late => "Late",
        Absent => "Absent",
        OnLeave => "On Leave",
    }
}

/// A row from the `attendance` table. There is at most one record per
/// member per day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttendanceRecord {
    pub id: i64,
    pub member_id: i64,
    pub date: NaiveDate,
    pub check_in: Option<NaiveTime>,
    pub check_out: Option<NaiveTime>,
    pub status: AttendanceStatus,
}

impl AttendanceStatus {
    /// Status for a check-in at `at` given the configured workday start
    pub fn for_check_in(at: NaiveTime, workday_start: NaiveTime) -> Self {
        if at > workday_start {
            AttendanceStatus::Late
        } else {
            AttendanceStatus::Present
        }
    }
}

impl AttendanceRecord {
    /// Minutes between check-in and check-out, if both are recorded
    pub fn worked_minutes(&self) -> Option<i64> {
        match (self.check_in, self.check_out) {
            (Some(start), Some(end)) if end >= start => Some((end - start).num_minutes()),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    #[test]
    fn test_check_in_status() {
        assert_eq!(
            AttendanceStatus::for_check_in(t(8, 55), t(9, 0)),
            AttendanceStatus::Present
        );
        assert_eq!(
            AttendanceStatus::for_check_in(t(9, 0), t(9, 0)),
            AttendanceStatus::Present
        );
        assert_eq!(
            AttendanceStatus::for_check_in(t(9, 1), t(9, 0)),
            AttendanceStatus::Late
        );
    }

    #[test]
    fn test_worked_minutes() {
        let mut record = AttendanceRecord {
            id: 1,
            member_id: 1,
            date: NaiveDate::from_ymd_opt(2025, 3, 10).unwrap(),
            check_in: Some(t(9, 0)),
            check_out: None,
            status: AttendanceStatus::Present,
        };
        assert_eq!(record.worked_minutes(), None);
        record.check_out = Some(t(17, 30));
        assert_eq!(record.worked_minutes(), Some(510));
    }
}
