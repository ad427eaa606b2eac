//! Team activity feed built from recent rows

use crate::model::{Project, Task, TimeEntry};
use chrono::{DateTime, Utc};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ActivityKind {
    ProjectCreated,
    TaskCreated,
    TaskUpdated,
    TimeLogged,
}

impl ActivityKind {
    fn verb(&self) -> &'static str {
        match self {
            ActivityKind::ProjectCreated => "created project",
            ActivityKind::TaskCreated => "created task",
            ActivityKind::TaskUpdated => "updated task",
            ActivityKind::TimeLogged => "logged time",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Activity {
    pub at: DateTime<Utc>,
    pub kind: ActivityKind,
    pub member_id: Option<i64>,
    pub project_id: Option<i64>,
    pub summary: String,
}

impl std::fmt::Display for Activity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} {}: {}",
            self.at.format("%Y-%m-%d %H:%M"),
            self.kind.verb(),
            self.summary
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeedParams {
    pub limit: usize,
    /// Only activity attributed to this member; projects carry no member
    /// and drop out of a filtered feed
    pub member_id: Option<i64>,
}

impl Default for FeedParams {
    fn default() -> Self {
        Self {
            limit: 20,
            member_id: None,
        }
    }
}

fn project_activity(p: &Project) -> Activity {
    Activity {
        at: p.created_at,
        kind: ActivityKind::ProjectCreated,
        member_id: None,
        project_id: Some(p.id),
        summary: p.name.clone(),
    }
}

fn task_activity(t: &Task) -> Activity {
    let (kind, at) = if t.updated_at > t.created_at {
        (ActivityKind::TaskUpdated, t.updated_at)
    } else {
        (ActivityKind::TaskCreated, t.created_at)
    };
    Activity {
        at,
        kind,
        member_id: t.assignee_id,
        project_id: t.project_id,
        summary: format!("{} [{}]", t.title, t.status),
    }
}

fn time_activity(e: &TimeEntry) -> Activity {
    let what = e.description.as_deref().unwrap_or("untitled work");
    Activity {
        at: e.created_at,
        kind: ActivityKind::TimeLogged,
        member_id: e.member_id,
        project_id: e.project_id,
        summary: format!("{} min on {} ({})", e.duration_minutes, what, e.date),
    }
}

/// Merge recent rows into one feed, newest first, at most `params.limit`
/// items
pub fn build_feed(
    projects: &[Project],
    tasks: &[Task],
    time_entries: &[TimeEntry],
    params: &FeedParams,
) -> Vec<Activity> {
    let mut feed: Vec<Activity> = projects
        .iter()
        .map(project_activity)
        .chain(tasks.iter().map(task_activity))
        .chain(time_entries.iter().map(time_activity))
        .filter(|a| params.member_id.is_none() || a.member_id == params.member_id)
        .collect();
    feed.sort_by(|a, b| b.at.cmp(&a.at));
    feed.truncate(params.limit);
    feed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ApprovalStatus, Priority, ProjectStatus, TaskStatus};
    use chrono::{NaiveDate, TimeZone};

    fn ts(h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 10, h, 0, 0).unwrap()
    }

    fn project(id: i64, h: u32) -> Project {
        Project {
            id,
            name: format!("Project {id}"),
            description: None,
            status: ProjectStatus::Planning,
            due_date: None,
            is_starred: false,
            created_at: ts(h),
        }
    }

    fn task(id: i64, assignee: Option<i64>, created: u32, updated: u32) -> Task {
        Task {
            id,
            title: format!("Task {id}"),
            description: None,
            status: TaskStatus::InProgress,
            priority: Priority::Medium,
            due_date: None,
            project_id: Some(1),
            assignee_id: assignee,
            importance: 5,
            urgency: 5,
            tags: Vec::new(),
            created_at: ts(created),
            updated_at: ts(updated),
        }
    }

    fn entry(member: Option<i64>, h: u32) -> TimeEntry {
        TimeEntry {
            id: 1,
            member_id: member,
            date: NaiveDate::from_ymd_opt(2025, 3, 10).unwrap(),
            project_id: Some(1),
            task_id: None,
            description: Some("Standup".to_string()),
            start_time: None,
            end_time: None,
            duration_minutes: 15,
            billable: false,
            tags: Vec::new(),
            approval: ApprovalStatus::Pending,
            created_at: ts(h),
        }
    }

    #[test]
    fn test_feed_is_newest_first_and_limited() {
        let feed = build_feed(
            &[project(1, 8)],
            &[task(1, Some(2), 9, 12), task(2, None, 10, 10)],
            &[entry(Some(2), 11)],
            &FeedParams {
                limit: 3,
                member_id: None,
            },
        );
        let kinds: Vec<ActivityKind> = feed.iter().map(|a| a.kind).collect();
        assert_eq!(
            kinds,
            vec![
                ActivityKind::TaskUpdated,
                ActivityKind::TimeLogged,
                ActivityKind::TaskCreated
            ]
        );
    }

    #[test]
    fn test_member_filter() {
        let feed = build_feed(
            &[project(1, 8)],
            &[task(1, Some(2), 9, 9), task(2, Some(3), 10, 10)],
            &[entry(Some(2), 11), entry(None, 12)],
            &FeedParams {
                limit: 10,
                member_id: Some(2),
            },
        );
        assert_eq!(feed.len(), 2);
        assert!(feed.iter().all(|a| a.member_id == Some(2)));
    }

    #[test]
    fn test_empty_inputs() {
        assert!(build_feed(&[], &[], &[], &FeedParams::default()).is_empty());
    }

    #[test]
    fn test_display() {
        let a = time_activity(&entry(None, 9));
        assert_eq!(
            a.to_string(),
            "2025-03-10 09:00 logged time: 15 min on Standup (2025-03-10)"
        );
    }
}
