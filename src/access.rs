//! Read-side data access
//!
//! Each `fetch_*` runs one filtered, sorted query against the store. A failed
//! read is logged and yields an empty collection (or zeroed stats); callers
//! cannot tell "no rows" from "query failed". Writes live on `Store` and do
//! report their errors.

use crate::model::{
    ApprovalStatus, AttendanceRecord, Priority, Project, ProjectStatus, Setting, SortOrder, Task,
    TaskStatus, TeamMember, TimeEntry,
};
use crate::stats::{self, StatusSummary, TeamStats, TimeSummary};
use crate::store::{FromRow, Select, Store, Table, contains_pattern, day};
use anyhow::Result;
use chrono::{Duration, NaiveDate};
use tracing::warn;

fn or_empty<T: Default>(what: &str, result: Result<T>) -> T {
    result.unwrap_or_else(|e| {
        warn!(error = %format!("{e:#}"), what, "read failed, returning empty result");
        T::default()
    })
}

fn fetch<T: FromRow>(store: &Store, query: &Select) -> Vec<T> {
    or_empty(T::TABLE.name(), store.select(query))
}

/// Number of rows matching `query`, 0 on failure
pub fn count(store: &Store, query: &Select) -> usize {
    or_empty(query.table().name(), store.count(query))
}

#[derive(Debug, Clone, Default)]
pub struct ProjectFilter {
    pub status: Option<ProjectStatus>,
    pub starred_only: bool,
}

pub fn fetch_projects(store: &Store, filter: &ProjectFilter) -> Vec<Project> {
    let mut query = Select::from(Table::Projects);
    if let Some(status) = filter.status {
        query = query.eq("status", status);
    }
    if filter.starred_only {
        query = query.eq("is_starred", true);
    }
    fetch(store, &query.order_by("created_at", SortOrder::Desc))
}

#[derive(Debug, Clone, Default)]
pub struct TaskFilter {
    pub status: Option<TaskStatus>,
    pub priority: Option<Priority>,
    pub project_id: Option<i64>,
    pub assignee_id: Option<i64>,
    /// Due strictly before this day
    pub due_before: Option<NaiveDate>,
    /// Only tasks without a due date
    pub unscheduled: bool,
    pub limit: Option<usize>,
}

pub fn fetch_tasks(store: &Store, filter: &TaskFilter) -> Vec<Task> {
    let mut query = Select::from(Table::Tasks);
    if let Some(status) = filter.status {
        query = query.eq("status", status);
    }
    if let Some(priority) = filter.priority {
        query = query.eq("priority", priority);
    }
    if let Some(project_id) = filter.project_id {
        query = query.eq("project_id", project_id);
    }
    if let Some(assignee_id) = filter.assignee_id {
        query = query.eq("assignee_id", assignee_id);
    }
    if let Some(before) = filter.due_before {
        query = query.lt("due_date", day(before));
    }
    if filter.unscheduled {
        query = query.is_null("due_date");
    }
    query = query.order_by("updated_at", SortOrder::Desc);
    if let Some(limit) = filter.limit {
        query = query.limit(limit);
    }
    fetch(store, &query)
}

/// Tasks due in `[today, today + days]`, soonest first
pub fn fetch_upcoming_tasks(store: &Store, today: NaiveDate, days: i64) -> Vec<Task> {
    let query = Select::from(Table::Tasks)
        .gte("due_date", day(today))
        .lte("due_date", day(today + Duration::days(days)))
        .order_by("due_date", SortOrder::Asc);
    fetch(store, &query)
}

pub fn fetch_team_members(store: &Store, department: Option<&str>) -> Vec<TeamMember> {
    let mut query = Select::from(Table::TeamMembers);
    if let Some(department) = department {
        query = query.eq("department", department.to_string());
    }
    fetch(store, &query.order_by("name", SortOrder::Asc))
}

/// Member with this email, compared case-insensitively
pub fn find_member_by_email(store: &Store, email: &str) -> Option<TeamMember> {
    let query = Select::from(Table::TeamMembers)
        .eq("email", email.trim().to_lowercase())
        .limit(1);
    fetch(store, &query).into_iter().next()
}

#[derive(Debug, Clone, Default)]
pub struct TimeEntryFilter {
    pub member_id: Option<i64>,
    pub project_id: Option<i64>,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    pub approval: Option<ApprovalStatus>,
    pub description_contains: Option<String>,
    pub limit: Option<usize>,
}

pub fn fetch_time_entries(store: &Store, filter: &TimeEntryFilter) -> Vec<TimeEntry> {
    let mut query = Select::from(Table::TimeEntries);
    if let Some(member_id) = filter.member_id {
        query = query.eq("member_id", member_id);
    }
    if let Some(project_id) = filter.project_id {
        query = query.eq("project_id", project_id);
    }
    if let Some(from) = filter.from {
        query = query.gte("date", day(from));
    }
    if let Some(to) = filter.to {
        query = query.lte("date", day(to));
    }
    if let Some(approval) = filter.approval {
        query = query.eq("approval_status", approval);
    }
    if let Some(needle) = filter
        .description_contains
        .as_deref()
        .filter(|s| !s.trim().is_empty())
    {
        query = query.ilike("description", contains_pattern(needle.trim()));
    }
    query = query
        .order_by("date", SortOrder::Desc)
        .order_by("created_at", SortOrder::Desc);
    if let Some(limit) = filter.limit {
        query = query.limit(limit);
    }
    fetch(store, &query)
}

/// Most recently logged entries first, whatever day they were logged for
pub fn fetch_recent_time_entries(
    store: &Store,
    member_id: Option<i64>,
    limit: usize,
) -> Vec<TimeEntry> {
    let mut query = Select::from(Table::TimeEntries);
    if let Some(member_id) = member_id {
        query = query.eq("member_id", member_id);
    }
    let query = query
        .order_by("created_at", SortOrder::Desc)
        .order_by("id", SortOrder::Desc)
        .limit(limit);
    fetch(store, &query)
}

pub fn fetch_attendance(
    store: &Store,
    member_id: Option<i64>,
    from: NaiveDate,
    to: NaiveDate,
) -> Vec<AttendanceRecord> {
    let mut query = Select::from(Table::Attendance)
        .gte("date", day(from))
        .lte("date", day(to));
    if let Some(member_id) = member_id {
        query = query.eq("member_id", member_id);
    }
    fetch(
        store,
        &query
            .order_by("date", SortOrder::Desc)
            .order_by("member_id", SortOrder::Asc),
    )
}

pub fn fetch_settings(store: &Store) -> Vec<Setting> {
    fetch(store, &Select::from(Table::Settings).order_by("key", SortOrder::Asc))
}

pub fn fetch_setting(store: &Store, key: &str) -> Option<String> {
    let query = Select::from(Table::Settings).eq("key", key.to_string());
    fetch::<Setting>(store, &query)
        .into_iter()
        .next()
        .map(|s| s.value)
}

pub fn project_stats(store: &Store, today: NaiveDate) -> StatusSummary {
    stats::aggregate_by_status(&fetch_projects(store, &ProjectFilter::default()), today)
}

pub fn task_stats(store: &Store, today: NaiveDate) -> StatusSummary {
    stats::aggregate_by_status(&fetch_tasks(store, &TaskFilter::default()), today)
}

pub fn team_stats(store: &Store) -> TeamStats {
    stats::team_stats(&fetch_team_members(store, None))
}

pub fn time_summary(store: &Store, filter: &TimeEntryFilter) -> TimeSummary {
    stats::summarize_time(&fetch_time_entries(store, filter))
}
