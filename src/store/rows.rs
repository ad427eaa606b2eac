use super::Table;
use crate::model::{
    AttendanceRecord, Project, Setting, Task, TeamMember, TimeEntry, split_tags,
};
use rusqlite::Row;

/// A record that can be read from one row of its table.
///
/// Implementations read columns positionally, in the order given by
/// `Table::columns`.
pub trait FromRow: Sized {
    const TABLE: Table;

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self>;
}

impl FromRow for Project {
    const TABLE: Table = Table::Projects;

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Project {
            id: row.get(0)?,
            name: row.get(1)?,
            description: row.get(2)?,
            status: row.get(3)?,
            due_date: row.get(4)?,
            is_starred: row.get(5)?,
            created_at: row.get(6)?,
        })
    }
}

impl FromRow for Task {
    const TABLE: Table = Table::Tasks;

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Task {
            id: row.get(0)?,
            title: row.get(1)?,
            description: row.get(2)?,
            status: row.get(3)?,
            priority: row.get(4)?,
            due_date: row.get(5)?,
            project_id: row.get(6)?,
            assignee_id: row.get(7)?,
            importance: row.get(8)?,
            urgency: row.get(9)?,
            tags: split_tags(row.get::<_, Option<String>>(10)?.as_deref()),
            created_at: row.get(11)?,
            updated_at: row.get(12)?,
        })
    }
}

impl FromRow for TeamMember {
    const TABLE: Table = Table::TeamMembers;

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(TeamMember {
            id: row.get(0)?,
            name: row.get(1)?,
            email: row.get(2)?,
            role: row.get(3)?,
            department: row.get(4)?,
            status: row.get(5)?,
            avatar: row.get(6)?,
            created_at: row.get(7)?,
        })
    }
}

impl FromRow for TimeEntry {
    const TABLE: Table = Table::TimeEntries;

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(TimeEntry {
            id: row.get(0)?,
            member_id: row.get(1)?,
            date: row.get(2)?,
            project_id: row.get(3)?,
            task_id: row.get(4)?,
            description: row.get(5)?,
            start_time: row.get(6)?,
            end_time: row.get(7)?,
            duration_minutes: row.get(8)?,
            billable: row.get(9)?,
            tags: split_tags(row.get::<_, Option<String>>(10)?.as_deref()),
            approval: row.get(11)?,
            created_at: row.get(12)?,
        })
    }
}

impl FromRow for AttendanceRecord {
    const TABLE: Table = Table::Attendance;

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(AttendanceRecord {
            id: row.get(0)?,
            member_id: row.get(1)?,
            date: row.get(2)?,
            check_in: row.get(3)?,
            check_out: row.get(4)?,
            status: row.get(5)?,
        })
    }
}

impl FromRow for Setting {
    const TABLE: Table = Table::Settings;

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Setting {
            key: row.get(0)?,
            value: row.get(1)?,
        })
    }
}
