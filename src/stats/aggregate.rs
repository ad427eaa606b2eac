use crate::model::{Priority, Project, Task};
use chrono::{Duration, NaiveDate};
use serde::Serialize;
use std::collections::BTreeMap;

/// Width of the "due this week" window in days, starting today
pub const DUE_SOON_DAYS: i64 = 7;

/// A row that carries a status label and, optionally, a due date
pub trait StatusRow {
    fn status_label(&self) -> &str;
    fn due_date(&self) -> Option<NaiveDate>;
}

impl StatusRow for Project {
    fn status_label(&self) -> &str {
        self.status.as_str()
    }

    fn due_date(&self) -> Option<NaiveDate> {
        self.due_date
    }
}

impl StatusRow for Task {
    fn status_label(&self) -> &str {
        self.status.as_str()
    }

    fn due_date(&self) -> Option<NaiveDate> {
        self.due_date
    }
}

/// Status histogram plus the derived counts shown on dashboard cards
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StatusSummary {
    pub total: usize,
    /// Exact (case-sensitive) status label -> count
    pub by_status: BTreeMap<String, usize>,
    /// Due in `[today, today + 7 days)`
    pub due_this_week: usize,
    /// Due before today and not completed
    pub overdue: usize,
    pub completed: usize,
    pub in_progress: usize,
}

/// Count rows by status and derive the dashboard counters.
///
/// Rows without a due date are never counted as due this week or overdue.
/// "completed" and "in progress" are matched after lower-casing; everything
/// else compares labels exactly.
pub fn aggregate_by_status<R: StatusRow>(rows: &[R], today: NaiveDate) -> StatusSummary {
    let week_end = today + Duration::days(DUE_SOON_DAYS);
    let mut summary = StatusSummary {
        total: rows.len(),
        ..Default::default()
    };

    for row in rows {
        let label = row.status_label();
        *summary.by_status.entry(label.to_string()).or_insert(0) += 1;

        let folded = label.to_lowercase();
        let is_completed = folded == "completed";
        if is_completed {
            summary.completed += 1;
        } else if folded == "in progress" {
            summary.in_progress += 1;
        }

        if let Some(due) = row.due_date() {
            if due >= today && due < week_end {
                summary.due_this_week += 1;
            }
            if due < today && !is_completed {
                summary.overdue += 1;
            }
        }
    }

    summary
}

/// Count rows by an arbitrary key
pub fn histogram<R, K, F>(rows: &[R], key: F) -> BTreeMap<K, usize>
where
    K: Ord,
    F: Fn(&R) -> K,
{
    let mut counts = BTreeMap::new();
    for row in rows {
        *counts.entry(key(row)).or_insert(0) += 1;
    }
    counts
}

/// Task counts per priority; every priority is present, possibly with zero
pub fn aggregate_by_priority(tasks: &[Task]) -> BTreeMap<Priority, usize> {
    let mut counts: BTreeMap<Priority, usize> = Priority::ALL.iter().map(|p| (*p, 0)).collect();
    for (priority, n) in histogram(tasks, |t| t.priority) {
        counts.insert(priority, n);
    }
    counts
}
