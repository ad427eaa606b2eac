//! In-memory search, filter and sort over fetched rows

use crate::model::{Priority, Project, ProjectStatus, SortOrder, Task, TaskStatus, TeamMember};
use chrono::NaiveDate;
use std::cmp::Ordering;
use std::str::FromStr;

/// Sort key for list views
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortKey {
    #[default]
    Name,
    DueDate,
}

impl FromStr for SortKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace(['_', '-', ' '], "").as_str() {
            "name" | "title" => Ok(SortKey::Name),
            "duedate" | "due" => Ok(SortKey::DueDate),
            _ => Err(format!(
                "Invalid sort key '{}'. Valid options are: name, due_date",
                s
            )),
        }
    }
}

/// Exact-match filter where `All` disables filtering
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Filter<T> {
    #[default]
    All,
    Only(T),
}

impl<T: PartialEq> Filter<T> {
    pub fn matches(&self, value: &T) -> bool {
        match self {
            Filter::All => true,
            Filter::Only(wanted) => wanted == value,
        }
    }

    /// The wanted value, `None` for `All`
    pub fn wanted(&self) -> Option<&T> {
        match self {
            Filter::All => None,
            Filter::Only(wanted) => Some(wanted),
        }
    }
}

impl<T> FromStr for Filter<T>
where
    T: FromStr<Err = String>,
{
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("all") {
            Ok(Filter::All)
        } else {
            s.parse().map(Filter::Only)
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ProjectQuery {
    pub query: String,
    pub status: Filter<ProjectStatus>,
    pub sort_by: SortKey,
    pub order: SortOrder,
}

#[derive(Debug, Clone, Default)]
pub struct TaskQuery {
    pub query: String,
    pub status: Filter<TaskStatus>,
    pub priority: Filter<Priority>,
    pub sort_by: SortKey,
    pub order: SortOrder,
}

#[derive(Debug, Clone, Default)]
pub struct MemberQuery {
    pub query: String,
    pub department: Filter<String>,
}

/// Case-insensitive substring test; an empty needle matches everything
fn contains_folded(haystack: &str, needle_folded: &str) -> bool {
    needle_folded.is_empty() || haystack.to_lowercase().contains(needle_folded)
}

/// Name ordering that approximates a locale collator: case-folded first,
/// raw text as the tie-break
fn compare_names(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}

/// Midnight UTC in epoch milliseconds; a missing date is 0
fn epoch_millis(date: Option<NaiveDate>) -> i64 {
    date.and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc().timestamp_millis())
        .unwrap_or(0)
}

fn sort_rows<T>(
    rows: &mut [T],
    key: SortKey,
    order: SortOrder,
    name: fn(&T) -> &str,
    due: fn(&T) -> Option<NaiveDate>,
) {
    // slice::sort_by is stable, and reversing the comparator keeps it so
    rows.sort_by(|a, b| {
        let ord = match key {
            SortKey::Name => compare_names(name(a), name(b)),
            SortKey::DueDate => epoch_millis(due(a)).cmp(&epoch_millis(due(b))),
        };
        match order {
            SortOrder::Asc => ord,
            SortOrder::Desc => ord.reverse(),
        }
    });
}

pub fn filter_sort_projects(rows: &[Project], params: &ProjectQuery) -> Vec<Project> {
    let needle = params.query.trim().to_lowercase();
    let mut out: Vec<Project> = rows
        .iter()
        .filter(|p| {
            contains_folded(&p.name, &needle)
                || p.description
                    .as_deref()
                    .is_some_and(|d| contains_folded(d, &needle))
        })
        .filter(|p| params.status.matches(&p.status))
        .cloned()
        .collect();
    sort_rows(&mut out, params.sort_by, params.order, |p| &p.name, |p| p.due_date);
    out
}

pub fn filter_sort_tasks(rows: &[Task], params: &TaskQuery) -> Vec<Task> {
    let needle = params.query.trim().to_lowercase();
    let mut out: Vec<Task> = rows
        .iter()
        .filter(|t| {
            contains_folded(&t.title, &needle)
                || t.description
                    .as_deref()
                    .is_some_and(|d| contains_folded(d, &needle))
                || t.tags.iter().any(|tag| contains_folded(tag, &needle))
        })
        .filter(|t| params.status.matches(&t.status))
        .filter(|t| params.priority.matches(&t.priority))
        .cloned()
        .collect();
    sort_rows(&mut out, params.sort_by, params.order, |t| &t.title, |t| t.due_date);
    out
}

/// Team directory search, ordered by name
pub fn filter_team_members(rows: &[TeamMember], params: &MemberQuery) -> Vec<TeamMember> {
    let needle = params.query.trim().to_lowercase();
    let mut out: Vec<TeamMember> = rows
        .iter()
        .filter(|m| {
            contains_folded(&m.name, &needle)
                || contains_folded(&m.email, &needle)
                || contains_folded(&m.role, &needle)
        })
        .filter(|m| params.department.matches(&m.department))
        .cloned()
        .collect();
    out.sort_by(|a, b| compare_names(&a.name, &b.name));
    out
}
