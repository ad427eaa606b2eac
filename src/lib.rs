//! Workboard MCP Server Library
//!
//! A Model Context Protocol server for a team workboard: projects, tasks,
//! the team directory, attendance and time tracking, backed by SQLite.
//!
//! # Architecture
//!
//! - **MCP Layer**: `WorkboardServerHandler` and `handlers` turn tool calls
//!   into store reads and writes and render text
//! - **Stats Layer**: `stats` holds the pure reducers (status histograms,
//!   importance/urgency quadrants, search/filter/sort)
//! - **Access Layer**: `access` runs filtered queries; failed reads come back
//!   empty
//! - **Persistence Layer**: `store` (SQLite) plus an optional TOML `snapshot`
//!   kept in git
//!
//! # Example
//!
//! ```no_run
//! use workboard::{Config, WorkboardServerHandler};
//! use anyhow::Result;
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let handler = WorkboardServerHandler::new(Config::for_database("board.sqlite"))?;
//!     // Use handler with MCP server...
//!     Ok(())
//! }
//! ```

pub mod access;
pub mod activity;
pub mod config;
mod formatting;
mod git_ops;
mod handlers;
pub mod model;
pub mod session;
pub mod snapshot;
pub mod stats;
pub mod store;
pub mod timer;
mod validation;

use anyhow::Result;
use chrono::{Local, NaiveDateTime};
use mcp_attr::Result as McpResult;
use mcp_attr::server::{McpServer, mcp_server};
use std::sync::{Mutex, MutexGuard, PoisonError};
use tracing::{info, warn};

pub use config::Config;
pub use session::Session;
pub use snapshot::{Snapshot, SnapshotData};
pub use store::Store;

/// MCP server handler for the workboard
///
/// Owns the database connection, the session (current user and running
/// timers) and the optional snapshot. Every mutation is written to SQLite
/// first and then exported to the snapshot file when one is configured.
pub struct WorkboardServerHandler {
    pub(crate) store: Mutex<Store>,
    pub(crate) session: Mutex<Session>,
    pub(crate) snapshot: Option<Snapshot>,
    pub(crate) config: Config,
}

impl WorkboardServerHandler {
    /// Open the database named by `config` and set up the session
    ///
    /// A fresh database is seeded from the snapshot file when one exists.
    ///
    /// # Example
    /// ```no_run
    /// # use workboard::{Config, WorkboardServerHandler};
    /// # use anyhow::Result;
    /// # fn main() -> Result<()> {
    /// let handler = WorkboardServerHandler::new(Config::for_database("board.sqlite"))?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn new(config: Config) -> Result<Self> {
        let mut store = Store::open(&config.database)?;
        let snapshot = config
            .snapshot
            .as_ref()
            .map(|path| Snapshot::new(path, config.sync_git));

        if let Some(snapshot) = &snapshot
            && store.is_empty()?
            && let Some(data) = snapshot.load()?
            && data.row_count() > 0
        {
            store.import(&data)?;
            info!(
                rows = data.row_count(),
                path = %snapshot.file_path().display(),
                "database seeded from snapshot"
            );
        }

        let email = config
            .current_user
            .clone()
            .or_else(|| access::fetch_setting(&store, session::CURRENT_USER_SETTING));
        let current_user = email.as_deref().and_then(|email| {
            let member = access::find_member_by_email(&store, email);
            if member.is_none() {
                warn!(email, "configured current user is not a team member");
            }
            member
        });

        Ok(Self {
            store: Mutex::new(store),
            session: Mutex::new(Session::new(current_user)),
            snapshot,
            config,
        })
    }

    pub(crate) fn store(&self) -> MutexGuard<'_, Store> {
        self.store.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub(crate) fn session(&self) -> MutexGuard<'_, Session> {
        self.session.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Local wall-clock time used for timers and attendance
    pub(crate) fn now() -> NaiveDateTime {
        Local::now().naive_local()
    }

    /// Export the store to the snapshot file, if one is configured
    pub(crate) fn persist(&self, message: &str) -> Result<()> {
        let Some(snapshot) = &self.snapshot else {
            return Ok(());
        };
        let data = self.store().export()?;
        snapshot.save_with_message(&data, message)
    }

    /// Stop running timers, logging a running stopwatch as a time entry,
    /// and push snapshot commits. Called on drop; calling it earlier is
    /// harmless.
    pub fn dispose(&self) {
        let (finished, member_id) = {
            let mut session = self.session();
            let member_id = session.current_user_id();
            (session.dispose(Self::now()), member_id)
        };

        if let Some(finished) = finished {
            let entry = finished.to_time_entry(member_id);
            let logged = self.store().insert_time_entry(&entry);
            match logged {
                Ok(created) => {
                    info!(
                        id = created.id,
                        minutes = created.duration_minutes,
                        "running timer logged on shutdown"
                    );
                    if let Err(e) = self.persist(&format!("Log time entry {}", created.id)) {
                        warn!(error = %format!("{e:#}"), "snapshot export on shutdown failed");
                    }
                }
                Err(e) => warn!(
                    error = %format!("{e:#}"),
                    "failed to log running timer on shutdown"
                ),
            }
        }
    }
}

impl Drop for WorkboardServerHandler {
    fn drop(&mut self) {
        self.dispose();
        // Push to git on shutdown if sync is enabled
        if let Some(snapshot) = &self.snapshot
            && let Err(e) = snapshot.shutdown()
        {
            warn!(error = %format!("{e:#}"), "shutdown git sync failed");
        }
    }
}

/// Team workboard server: projects, tasks, team directory, attendance and
/// time tracking.
///
/// Key concepts:
/// - **Project status**: Planning, In Progress, Review, Completed, On Hold, Cancelled
/// - **Task status**: To Do, In Progress, Review, Completed, Blocked
/// - **Priority**: Low, Medium, High; tasks also carry importance and urgency (1-10)
/// - **Approval**: time entries start Pending and are Approved or Rejected
/// - **Current user**: the team member named in the config; used when a
///   member_id is omitted
///
/// Records are referenced by numeric ID. Dates are YYYY-MM-DD, times HH:MM.
#[mcp_server]
impl McpServer for WorkboardServerHandler {
    /// **Projects**: List projects with search, status filter and sorting.
    /// **Use**: query matches name or description; status="all" or empty shows every project.
    #[tool]
    async fn list_projects(
        &self,
        /// Case-insensitive text to find in name or description (optional)
        query: Option<String>,
        /// Status filter: Planning/In Progress/Review/Completed/On Hold/Cancelled/all (optional)
        status: Option<String>,
        /// Sort key: name or due_date (default: name)
        sort_by: Option<String>,
        /// Sort order: asc or desc (default: asc). Projects without a due date sort as the oldest.
        order: Option<String>,
        /// Only starred projects (default: false)
        starred_only: Option<bool>,
    ) -> McpResult<String> {
        self.handle_list_projects(query, status, sort_by, order, starred_only)
            .await
    }

    /// **Projects**: Create a project. Status defaults to Planning.
    #[tool]
    async fn create_project(
        &self,
        /// Project name
        name: String,
        /// Description (optional)
        description: Option<String>,
        /// Initial status (optional)
        status: Option<String>,
        /// Due date YYYY-MM-DD (optional)
        due_date: Option<String>,
    ) -> McpResult<String> {
        self.handle_create_project(name, description, status, due_date)
            .await
    }

    /// **Projects**: Move a project to another status.
    #[tool]
    async fn update_project_status(
        &self,
        /// Project ID
        id: i64,
        /// New status: Planning/In Progress/Review/Completed/On Hold/Cancelled
        status: String,
    ) -> McpResult<String> {
        self.handle_update_project_status(id, status).await
    }

    /// **Projects**: Star or unstar a project.
    #[tool]
    async fn star_project(
        &self,
        /// Project ID
        id: i64,
        /// true to star, false to unstar (default: true)
        starred: Option<bool>,
    ) -> McpResult<String> {
        self.handle_star_project(id, starred).await
    }

    /// **Dashboard**: Project counts by status, due this week and overdue.
    #[tool]
    async fn project_stats(&self) -> McpResult<String> {
        self.handle_project_stats().await
    }

    /// **Tasks**: List tasks with search, filters and sorting.
    /// **Use**: query matches title, description or tags.
    #[allow(clippy::too_many_arguments)]
    #[tool]
    async fn list_tasks(
        &self,
        /// Case-insensitive text to find in title, description or tags (optional)
        query: Option<String>,
        /// Status filter: To Do/In Progress/Review/Completed/Blocked/all (optional)
        status: Option<String>,
        /// Priority filter: Low/Medium/High/all (optional)
        priority: Option<String>,
        /// Only tasks of this project (optional)
        project_id: Option<i64>,
        /// Only tasks assigned to this member (optional)
        assignee_id: Option<i64>,
        /// Sort key: name or due_date (default: name)
        sort_by: Option<String>,
        /// Sort order: asc or desc (default: asc)
        order: Option<String>,
    ) -> McpResult<String> {
        self.handle_list_tasks(
            query,
            status,
            priority,
            project_id,
            assignee_id,
            sort_by,
            order,
        )
        .await
    }

    /// **Tasks**: Create a task. Defaults: To Do, Medium priority, importance 5, urgency 5.
    #[allow(clippy::too_many_arguments)]
    #[tool]
    async fn create_task(
        &self,
        /// Task title
        title: String,
        /// Description (optional)
        description: Option<String>,
        /// Status (optional)
        status: Option<String>,
        /// Priority: Low/Medium/High (optional)
        priority: Option<String>,
        /// Due date YYYY-MM-DD (optional)
        due_date: Option<String>,
        /// Parent project ID (optional)
        project_id: Option<i64>,
        /// Assignee team member ID (optional)
        assignee_id: Option<i64>,
        /// Importance 1-10 (optional)
        importance: Option<u8>,
        /// Urgency 1-10 (optional)
        urgency: Option<u8>,
        /// Comma-separated tags (optional)
        tags: Option<String>,
    ) -> McpResult<String> {
        self.handle_create_task(
            title,
            description,
            status,
            priority,
            due_date,
            project_id,
            assignee_id,
            importance,
            urgency,
            tags,
        )
        .await
    }

    /// **Tasks**: Move a task to another status.
    #[tool]
    async fn update_task_status(
        &self,
        /// Task ID
        id: i64,
        /// New status: To Do/In Progress/Review/Completed/Blocked
        status: String,
    ) -> McpResult<String> {
        self.handle_update_task_status(id, status).await
    }

    /// **Dashboard**: Task counts by status and priority, due this week and overdue.
    /// Also lists the open tasks due in the coming week and those already overdue.
    #[tool]
    async fn task_stats(&self) -> McpResult<String> {
        self.handle_task_stats().await
    }

    /// **Prioritize**: Importance/urgency matrix. Tasks are split around the
    /// average importance and urgency of the listed tasks, not a fixed midpoint.
    #[tool]
    async fn task_matrix(
        &self,
        /// Only tasks of this project (optional)
        project_id: Option<i64>,
        /// Include completed tasks (default: false)
        include_completed: Option<bool>,
    ) -> McpResult<String> {
        self.handle_task_matrix(project_id, include_completed).await
    }

    /// **Team**: Search the team directory by name, email or role.
    #[tool]
    async fn list_team(
        &self,
        /// Case-insensitive text to find in name, email or role (optional)
        query: Option<String>,
        /// Department filter, exact match; "all" or empty shows everyone (optional)
        department: Option<String>,
    ) -> McpResult<String> {
        self.handle_list_team(query, department).await
    }

    /// **Team**: Add a team member. Emails are unique.
    #[tool]
    async fn add_team_member(
        &self,
        /// Full name
        name: String,
        /// Email address
        email: String,
        /// Role, e.g. "Engineer"
        role: String,
        /// Department, e.g. "Engineering"
        department: String,
        /// Status: Active/Inactive/On Leave (default: Active)
        status: Option<String>,
        /// Avatar URL (optional)
        avatar: Option<String>,
    ) -> McpResult<String> {
        self.handle_add_team_member(name, email, role, department, status, avatar)
            .await
    }

    /// **Team**: Headcount by department and status.
    #[tool]
    async fn team_stats(&self) -> McpResult<String> {
        self.handle_team_stats().await
    }

    /// **Attendance**: Check in. After the configured workday start the record is marked Late.
    #[tool]
    async fn check_in(
        &self,
        /// Team member ID (default: current user)
        member_id: Option<i64>,
        /// Date YYYY-MM-DD (default: today)
        date: Option<String>,
        /// Time HH:MM (default: now)
        time: Option<String>,
    ) -> McpResult<String> {
        self.handle_check_in(member_id, date, time).await
    }

    /// **Attendance**: Check out of a day already checked in.
    #[tool]
    async fn check_out(
        &self,
        /// Team member ID (default: current user)
        member_id: Option<i64>,
        /// Date YYYY-MM-DD (default: today)
        date: Option<String>,
        /// Time HH:MM (default: now)
        time: Option<String>,
    ) -> McpResult<String> {
        self.handle_check_out(member_id, date, time).await
    }

    /// **Attendance**: Records and attendance rate for a date range (default: last 30 days).
    #[tool]
    async fn attendance_summary(
        &self,
        /// Team member ID (optional, default: everyone)
        member_id: Option<i64>,
        /// From date YYYY-MM-DD (optional)
        from: Option<String>,
        /// To date YYYY-MM-DD (optional, default: today)
        to: Option<String>,
    ) -> McpResult<String> {
        self.handle_attendance_summary(member_id, from, to).await
    }

    /// **Time**: Log a time entry. Give duration_minutes, or start_time and end_time.
    #[allow(clippy::too_many_arguments)]
    #[tool]
    async fn log_time(
        &self,
        /// Date YYYY-MM-DD (default: today)
        date: Option<String>,
        /// Project ID (optional)
        project_id: Option<i64>,
        /// Task ID (optional)
        task_id: Option<i64>,
        /// What was done (optional)
        description: Option<String>,
        /// Start time HH:MM (optional)
        start_time: Option<String>,
        /// End time HH:MM (optional)
        end_time: Option<String>,
        /// Duration in minutes; wins over start/end (optional)
        duration_minutes: Option<i64>,
        /// Billable (default: true)
        billable: Option<bool>,
        /// Comma-separated tags (optional)
        tags: Option<String>,
        /// Team member ID (default: current user)
        member_id: Option<i64>,
    ) -> McpResult<String> {
        self.handle_log_time(
            date,
            project_id,
            task_id,
            description,
            start_time,
            end_time,
            duration_minutes,
            billable,
            tags,
            member_id,
        )
        .await
    }

    /// **Time**: List time entries, newest first.
    #[allow(clippy::too_many_arguments)]
    #[tool]
    async fn list_time_entries(
        &self,
        /// Team member ID (optional)
        member_id: Option<i64>,
        /// Project ID (optional)
        project_id: Option<i64>,
        /// From date YYYY-MM-DD, inclusive (optional)
        from: Option<String>,
        /// To date YYYY-MM-DD, inclusive (optional)
        to: Option<String>,
        /// Approval filter: Pending/Approved/Rejected (optional)
        approval: Option<String>,
        /// Case-insensitive text to find in the description (optional)
        query: Option<String>,
        /// Maximum number of entries (optional)
        limit: Option<usize>,
    ) -> McpResult<String> {
        self.handle_list_time_entries(member_id, project_id, from, to, approval, query, limit)
            .await
    }

    /// **Time**: Approve or reject a time entry.
    #[tool]
    async fn review_time_entry(
        &self,
        /// Time entry ID
        id: i64,
        /// Approval: Pending/Approved/Rejected
        approval: String,
    ) -> McpResult<String> {
        self.handle_review_time_entry(id, approval).await
    }

    /// **Time**: Total and billable time, by project and by approval.
    #[tool]
    async fn time_summary(
        &self,
        /// Team member ID (optional)
        member_id: Option<i64>,
        /// Project ID (optional)
        project_id: Option<i64>,
        /// From date YYYY-MM-DD (optional)
        from: Option<String>,
        /// To date YYYY-MM-DD (optional)
        to: Option<String>,
    ) -> McpResult<String> {
        self.handle_time_summary(member_id, project_id, from, to)
            .await
    }

    /// **Time**: Stopwatch. action=start/pause/resume/stop/status. Stop logs a time entry.
    #[tool]
    async fn timer(
        &self,
        /// start, pause, resume, stop or status
        action: String,
        /// Project ID, for start (optional)
        project_id: Option<i64>,
        /// Task ID, for start (optional)
        task_id: Option<i64>,
        /// Description, for start (optional)
        description: Option<String>,
        /// Billable, for start (default: true)
        billable: Option<bool>,
    ) -> McpResult<String> {
        self.handle_timer(action, project_id, task_id, description, billable)
            .await
    }

    /// **Focus**: Pomodoro timer. action=start/status/stop. Lengths come from the config.
    #[tool]
    async fn pomodoro(
        &self,
        /// start, status or stop
        action: String,
    ) -> McpResult<String> {
        self.handle_pomodoro(action).await
    }

    /// **Collaboration**: Recent team activity, newest first.
    #[tool]
    async fn activity_feed(
        &self,
        /// Maximum number of items (default: 20)
        limit: Option<usize>,
        /// Only activity of this team member (optional)
        member_id: Option<i64>,
    ) -> McpResult<String> {
        self.handle_activity_feed(limit, member_id).await
    }

    /// **Settings**: Show server configuration and stored settings.
    #[tool]
    async fn settings(&self) -> McpResult<String> {
        self.handle_settings().await
    }

    /// **Settings**: Store a setting value.
    /// **Use**: key "current_user" with a team member's email switches the current user.
    #[tool]
    async fn set_setting(
        &self,
        /// Setting key
        key: String,
        /// Setting value
        value: String,
    ) -> McpResult<String> {
        self.handle_set_setting(key, value).await
    }

    /// **Settings**: Write the snapshot file now (committed when git sync is on).
    #[tool]
    async fn export_snapshot(&self) -> McpResult<String> {
        self.handle_export_snapshot().await
    }
}
