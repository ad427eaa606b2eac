//! SQLite-backed store for dashboard records
//!
//! The store owns one `rusqlite::Connection`. Reads go through the `Select`
//! builder; writes are the typed methods in `writes.rs`.

mod query;
mod rows;
mod schema;
mod writes;

pub use query::{Select, contains_pattern, day};
pub use rows::FromRow;

use anyhow::{Context, Result, ensure};
use rusqlite::{Connection, params_from_iter};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Tables of the backing store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Table {
    Projects,
    Tasks,
    TeamMembers,
    TimeEntries,
    Attendance,
    Settings,
}

impl Table {
    pub fn name(&self) -> &'static str {
        match self {
            Table::Projects => "projects",
            Table::Tasks => "tasks",
            Table::TeamMembers => "team_members",
            Table::TimeEntries => "time_entries",
            Table::Attendance => "attendance",
            Table::Settings => "settings",
        }
    }

    /// Columns in the order `FromRow` implementations read them
    pub fn columns(&self) -> &'static [&'static str] {
        match self {
            Table::Projects => &[
                "id",
                "name",
                "description",
                "status",
                "due_date",
                "is_starred",
                "created_at",
            ],
            Table::Tasks => &[
                "id",
                "title",
                "description",
                "status",
                "priority",
                "due_date",
                "project_id",
                "assignee_id",
                "importance",
                "urgency",
                "tags",
                "created_at",
                "updated_at",
            ],
            Table::TeamMembers => &[
                "id",
                "name",
                "email",
                "role",
                "department",
                "status",
                "avatar",
                "created_at",
            ],
            Table::TimeEntries => &[
                "id",
                "member_id",
                "date",
                "project_id",
                "task_id",
                "description",
                "start_time",
                "end_time",
                "duration_minutes",
                "billable",
                "tags",
                "approval_status",
                "created_at",
            ],
            Table::Attendance => &[
                "id",
                "member_id",
                "date",
                "check_in",
                "check_out",
                "status",
            ],
            Table::Settings => &["key", "value"],
        }
    }
}

impl std::fmt::Display for Table {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

pub struct Store {
    conn: Connection,
    path: Option<PathBuf>,
}

impl Store {
    /// Open the database file, creating it and its schema if needed
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let existed = path.exists();
        let conn = Connection::open(path)
            .with_context(|| format!("Failed to open database {}", path.display()))?;
        schema::init_schema(&conn)?;
        if existed {
            debug!(path = %path.display(), "opened existing database");
        } else {
            info!(path = %path.display(), "created new database");
        }
        Ok(Self {
            conn,
            path: Some(path.to_path_buf()),
        })
    }

    /// Open a private in-memory database
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().context("Failed to open in-memory database")?;
        schema::init_schema(&conn)?;
        Ok(Self { conn, path: None })
    }

    /// Database file path, `None` for in-memory stores
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Run a `Select` and map every row into `T`
    pub fn select<T: FromRow>(&self, query: &Select) -> Result<Vec<T>> {
        ensure!(
            query.table() == T::TABLE,
            "Query on '{}' cannot produce rows of '{}'",
            query.table(),
            T::TABLE
        );
        let (sql, values) = query.to_sql()?;
        debug!(%sql, params = values.len(), "select");

        let mut stmt = self
            .conn
            .prepare(&sql)
            .with_context(|| format!("Failed to prepare query on {}", T::TABLE))?;
        let rows = stmt
            .query_map(params_from_iter(values.iter()), T::from_row)
            .with_context(|| format!("Failed to query {}", T::TABLE))?;

        let mut out = Vec::new();
        for row in rows {
            out.push(row.with_context(|| format!("Failed to read row from {}", T::TABLE))?);
        }
        Ok(out)
    }

    /// First row of a `Select`, if any
    pub fn select_one<T: FromRow>(&self, query: Select) -> Result<Option<T>> {
        Ok(self.select(&query.limit(1))?.into_iter().next())
    }

    /// Count the rows matching a `Select`
    pub fn count(&self, query: &Select) -> Result<usize> {
        let (sql, values) = query.to_count_sql()?;
        debug!(%sql, params = values.len(), "count");
        let count = self
            .conn
            .query_row(&sql, params_from_iter(values.iter()), |row| {
                row.get::<_, i64>(0)
            })
            .with_context(|| format!("Failed to count rows in {}", query.table()))?;
        Ok(usize::try_from(count).unwrap_or(0))
    }
}
