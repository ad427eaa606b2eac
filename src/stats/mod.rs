//! Derived statistics
//!
//! Pure reducers over rows already fetched from the store. Nothing in here
//! touches the database or the clock; callers pass `today` explicitly.

mod aggregate;
mod pipeline;
mod quadrant;
mod summary;

pub use aggregate::{
    DUE_SOON_DAYS, StatusRow, StatusSummary, aggregate_by_priority, aggregate_by_status, histogram,
};
pub use pipeline::{
    Filter, MemberQuery, ProjectQuery, SortKey, TaskQuery, filter_sort_projects, filter_sort_tasks,
    filter_team_members,
};
pub use quadrant::{Prioritized, Quadrant, Quadrants, quadrant_split};
pub use summary::{
    AttendanceSummary, TeamStats, TimeSummary, summarize_attendance, summarize_time, team_stats,
};
