//! Text rendering for tool responses

use crate::activity::Activity;
use crate::model::{AttendanceRecord, Project, Task, TeamMember, TimeEntry};
use crate::stats::{AttendanceSummary, Quadrant, Quadrants, StatusSummary, TeamStats, TimeSummary};
use std::fmt::Write;

/// "1h 30m", "45m"
pub fn format_minutes(minutes: i64) -> String {
    let (h, m) = (minutes / 60, minutes % 60);
    match (h, m) {
        (0, m) => format!("{}m", m),
        (h, 0) => format!("{}h", h),
        (h, m) => format!("{}h {}m", h, m),
    }
}

fn percent(ratio: f64) -> String {
    format!("{:.0}%", ratio * 100.0)
}

pub fn format_projects(projects: &[Project]) -> String {
    if projects.is_empty() {
        return "No projects found".to_string();
    }
    let mut out = format!("Found {} project(s):\n\n", projects.len());
    for p in projects {
        let star = if p.is_starred { " ★" } else { "" };
        let _ = writeln!(out, "- [{}] {}{} (status: {})", p.id, p.name, star, p.status);
        if let Some(due) = p.due_date {
            let _ = writeln!(out, "  Due: {}", due);
        }
        if let Some(ref d) = p.description {
            let _ = writeln!(out, "  Description: {}", d);
        }
    }
    out
}

pub fn format_tasks(tasks: &[Task]) -> String {
    if tasks.is_empty() {
        return "No tasks found".to_string();
    }
    let mut out = format!("Found {} task(s):\n\n", tasks.len());
    for t in tasks {
        let _ = writeln!(
            out,
            "- [{}] {} (status: {}, priority: {}, importance: {}, urgency: {})",
            t.id, t.title, t.status, t.priority, t.importance, t.urgency
        );
        if let Some(due) = t.due_date {
            let _ = writeln!(out, "  Due: {}", due);
        }
        if let Some(project_id) = t.project_id {
            let _ = writeln!(out, "  Project: {}", project_id);
        }
        if let Some(assignee_id) = t.assignee_id {
            let _ = writeln!(out, "  Assignee: {}", assignee_id);
        }
        if !t.tags.is_empty() {
            let _ = writeln!(out, "  Tags: {}", t.tags.join(", "));
        }
    }
    out
}

pub fn format_members(members: &[TeamMember]) -> String {
    if members.is_empty() {
        return "No team members found".to_string();
    }
    let mut out = format!("Found {} team member(s):\n\n", members.len());
    for m in members {
        let _ = writeln!(
            out,
            "- [{}] {} ({}) <{}>, {} / {}, {}",
            m.id,
            m.name,
            m.initials(),
            m.email,
            m.role,
            m.department,
            m.status
        );
    }
    out
}

pub fn format_time_entries(entries: &[TimeEntry]) -> String {
    if entries.is_empty() {
        return "No time entries found".to_string();
    }
    let mut out = format!("Found {} time entr(y/ies):\n\n", entries.len());
    for e in entries {
        let span = match (e.start_time, e.end_time) {
            (Some(s), Some(t)) => format!(" {}-{}", s.format("%H:%M"), t.format("%H:%M")),
            _ => String::new(),
        };
        let billable = if e.billable { "billable" } else { "non-billable" };
        let _ = writeln!(
            out,
            "- [{}] {}{} {} ({}, {})",
            e.id,
            e.date,
            span,
            format_minutes(e.duration_minutes),
            billable,
            e.approval
        );
        if let Some(ref d) = e.description {
            let _ = writeln!(out, "  {}", d);
        }
        if let Some(project_id) = e.project_id {
            let _ = writeln!(out, "  Project: {}", project_id);
        }
    }
    out
}

pub fn format_attendance(records: &[AttendanceRecord]) -> String {
    if records.is_empty() {
        return "No attendance records found".to_string();
    }
    let mut out = format!("Found {} attendance record(s):\n\n", records.len());
    for r in records {
        let time = |t: Option<chrono::NaiveTime>| {
            t.map(|t| t.format("%H:%M").to_string())
                .unwrap_or_else(|| "--:--".to_string())
        };
        let _ = writeln!(
            out,
            "- {} member {}: {} (in {}, out {})",
            r.date,
            r.member_id,
            r.status,
            time(r.check_in),
            time(r.check_out)
        );
    }
    out
}

pub fn format_status_summary(title: &str, s: &StatusSummary) -> String {
    let mut out = format!("{} ({} total)\n", title, s.total);
    for (status, n) in &s.by_status {
        let _ = writeln!(out, "  {}: {}", status, n);
    }
    let _ = writeln!(out, "In progress: {}", s.in_progress);
    let _ = writeln!(out, "Completed: {}", s.completed);
    let _ = writeln!(out, "Due this week: {}", s.due_this_week);
    let _ = writeln!(out, "Overdue: {}", s.overdue);
    out
}

/// Dated task lists under the task counts: what is coming up, what slipped
pub fn format_task_agenda(upcoming: &[Task], overdue: &[Task], unscheduled: usize) -> String {
    let mut out = String::new();
    for (title, tasks) in [("Upcoming", upcoming), ("Overdue open tasks", overdue)] {
        let _ = writeln!(out, "{} ({}):", title, tasks.len());
        for t in tasks {
            if let Some(due) = t.due_date {
                let _ = writeln!(out, "  - {} [{}] {} ({})", due, t.id, t.title, t.status);
            }
        }
    }
    let _ = writeln!(out, "Unscheduled: {}", unscheduled);
    out
}

pub fn format_quadrants(q: &Quadrants<'_, Task>) -> String {
    let mut out = format!(
        "Priority matrix over {} task(s) (avg importance {:.1}, avg urgency {:.1})\n",
        q.len(),
        q.avg_importance,
        q.avg_urgency
    );
    for quadrant in Quadrant::ALL {
        let tasks = q.get(quadrant);
        let _ = writeln!(out, "\n{}: {}", quadrant.title(), tasks.len());
        for t in tasks {
            let _ = writeln!(
                out,
                "- [{}] {} (importance: {}, urgency: {})",
                t.id, t.title, t.importance, t.urgency
            );
        }
    }
    out
}

pub fn format_time_summary(s: &TimeSummary) -> String {
    let mut out = format!("Time summary ({} entr(y/ies))\n", s.entries);
    let _ = writeln!(out, "Total: {}", format_minutes(s.total_minutes));
    let _ = writeln!(
        out,
        "Billable: {} ({})",
        format_minutes(s.billable_minutes),
        percent(s.billable_ratio())
    );
    if !s.minutes_by_project.is_empty() {
        let _ = writeln!(out, "By project:");
        for (project, minutes) in &s.minutes_by_project {
            let label = project.map_or("(none)".to_string(), |id| id.to_string());
            let _ = writeln!(out, "  {}: {}", label, format_minutes(*minutes));
        }
    }
    if !s.by_approval.is_empty() {
        let _ = writeln!(out, "By approval:");
        for (approval, n) in &s.by_approval {
            let _ = writeln!(out, "  {}: {}", approval, n);
        }
    }
    out
}

pub fn format_attendance_summary(s: &AttendanceSummary) -> String {
    let mut out = format!("Attendance ({} record(s))\n", s.total);
    for (status, n) in &s.by_status {
        let _ = writeln!(out, "  {}: {}", status, n);
    }
    let _ = writeln!(out, "Attendance rate: {}", percent(s.attendance_rate()));
    let _ = writeln!(out, "Worked: {}", format_minutes(s.worked_minutes));
    out
}

pub fn format_team_stats(s: &TeamStats) -> String {
    let mut out = format!("Team ({} member(s), {} active)\n", s.total, s.active());
    if !s.by_department.is_empty() {
        let _ = writeln!(out, "By department:");
        for (department, n) in &s.by_department {
            let _ = writeln!(out, "  {}: {}", department, n);
        }
    }
    if !s.by_status.is_empty() {
        let _ = writeln!(out, "By status:");
        for (status, n) in &s.by_status {
            let _ = writeln!(out, "  {}: {}", status, n);
        }
    }
    out
}

pub fn format_feed(feed: &[Activity]) -> String {
    if feed.is_empty() {
        return "No recent activity".to_string();
    }
    let mut out = format!("Recent activity ({}):\n\n", feed.len());
    for a in feed {
        let _ = writeln!(out, "- {}", a);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_minutes() {
        assert_eq!(format_minutes(45), "45m");
        assert_eq!(format_minutes(120), "2h");
        assert_eq!(format_minutes(90), "1h 30m");
        assert_eq!(format_minutes(0), "0m");
    }

    #[test]
    fn test_empty_lists() {
        assert_eq!(format_projects(&[]), "No projects found");
        assert_eq!(format_tasks(&[]), "No tasks found");
        assert_eq!(format_feed(&[]), "No recent activity");
    }

    #[test]
    fn test_status_summary_lists_counts() {
        let mut s = StatusSummary {
            total: 3,
            overdue: 1,
            ..Default::default()
        };
        s.by_status.insert("Planning".to_string(), 3);
        let text = format_status_summary("Projects", &s);
        assert!(text.starts_with("Projects (3 total)"));
        assert!(text.contains("  Planning: 3"));
        assert!(text.contains("Overdue: 1"));
    }

    #[test]
    fn test_task_agenda_lists_dated_tasks() {
        let text = format_task_agenda(&[], &[], 2);
        assert_eq!(text, "Upcoming (0):\nOverdue open tasks (0):\nUnscheduled: 2\n");
    }
}
