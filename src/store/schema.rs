use anyhow::{Context, Result};
use rusqlite::Connection;
use tracing::debug;

/// Bumped whenever a statement below changes shape
pub const SCHEMA_VERSION: i32 = 1;

const STATEMENTS: &[(&str, &str)] = &[
    (
        "projects table",
        "CREATE TABLE IF NOT EXISTS projects (
                  id              INTEGER PRIMARY KEY AUTOINCREMENT,
                  name            TEXT NOT NULL,
                  description     TEXT,
                  status          TEXT NOT NULL,
                  due_date        TEXT,
                  is_starred      INTEGER NOT NULL DEFAULT 0,
                  created_at      TEXT NOT NULL
                  )",
    ),
    (
        "team_members table",
        "CREATE TABLE IF NOT EXISTS team_members (
                  id              INTEGER PRIMARY KEY AUTOINCREMENT,
                  name            TEXT NOT NULL,
                  email           TEXT NOT NULL UNIQUE,
                  role            TEXT NOT NULL,
                  department      TEXT NOT NULL,
                  status          TEXT NOT NULL,
                  avatar          TEXT,
                  created_at      TEXT NOT NULL
                  )",
    ),
    (
        "tasks table",
        "CREATE TABLE IF NOT EXISTS tasks (
                  id              INTEGER PRIMARY KEY AUTOINCREMENT,
                  title           TEXT NOT NULL,
                  description     TEXT,
                  status          TEXT NOT NULL,
                  priority        TEXT NOT NULL,
                  due_date        TEXT,
                  project_id      INTEGER REFERENCES projects(id) ON DELETE SET NULL,
                  assignee_id     INTEGER REFERENCES team_members(id) ON DELETE SET NULL,
                  importance      INTEGER NOT NULL CHECK (importance BETWEEN 1 AND 10),
                  urgency         INTEGER NOT NULL CHECK (urgency BETWEEN 1 AND 10),
                  tags            TEXT,
                  created_at      TEXT NOT NULL,
                  updated_at      TEXT NOT NULL
                  )",
    ),
    (
        "time_entries table",
        "CREATE TABLE IF NOT EXISTS time_entries (
                  id              INTEGER PRIMARY KEY AUTOINCREMENT,
                  member_id       INTEGER REFERENCES team_members(id) ON DELETE SET NULL,
                  date            TEXT NOT NULL,
                  project_id      INTEGER REFERENCES projects(id) ON DELETE SET NULL,
                  task_id         INTEGER REFERENCES tasks(id) ON DELETE SET NULL,
                  description     TEXT,
                  start_time      TEXT,
                  end_time        TEXT,
                  duration_minutes INTEGER NOT NULL CHECK (duration_minutes >= 0),
                  billable        INTEGER NOT NULL DEFAULT 1,
                  tags            TEXT,
                  approval_status TEXT NOT NULL,
                  created_at      TEXT NOT NULL
                  )",
    ),
    (
        "attendance table",
        "CREATE TABLE IF NOT EXISTS attendance (
                  id              INTEGER PRIMARY KEY AUTOINCREMENT,
                  member_id       INTEGER NOT NULL REFERENCES team_members(id) ON DELETE CASCADE,
                  date            TEXT NOT NULL,
                  check_in        TEXT,
                  check_out       TEXT,
                  status          TEXT NOT NULL
                  )",
    ),
    (
        "settings table",
        "CREATE TABLE IF NOT EXISTS settings (
                  key             TEXT PRIMARY KEY,
                  value           TEXT NOT NULL
                  )",
    ),
    (
        "unique index on attendance",
        "CREATE UNIQUE INDEX IF NOT EXISTS attendance_member_day ON attendance (member_id, date)",
    ),
    (
        "index on tasks.due_date",
        "CREATE INDEX IF NOT EXISTS tasks_due_date ON tasks (due_date)",
    ),
    (
        "index on time_entries.date",
        "CREATE INDEX IF NOT EXISTS time_entries_date ON time_entries (date)",
    ),
];

/// Create every table and index that does not exist yet
pub fn init_schema(conn: &Connection) -> Result<()> {
    conn.pragma_update(None, "foreign_keys", true)
        .context("Failed to enable foreign keys.")?;

    for (what, sql) in STATEMENTS {
        conn.execute(sql, [])
            .with_context(|| format!("Failed to create {}.", what))?;
    }

    let version: i32 = conn
        .pragma_query_value(None, "user_version", |row| row.get(0))
        .context("Failed to read schema version.")?;
    if version < SCHEMA_VERSION {
        conn.pragma_update(None, "user_version", SCHEMA_VERSION)
            .context("Failed to record schema version.")?;
        debug!(from = version, to = SCHEMA_VERSION, "schema version updated");
    }
    Ok(())
}
