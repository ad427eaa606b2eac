use super::{FromRow, Select, Store, Table};
use crate::model::{
    ApprovalStatus, AttendanceRecord, AttendanceStatus, NewProject, NewTask, NewTeamMember,
    NewTimeEntry, Project, ProjectStatus, Task, TaskStatus, TeamMember, TimeEntry, join_tags,
};
use crate::snapshot::SnapshotData;
use anyhow::{Context, Result, anyhow, bail};
use chrono::{NaiveDate, NaiveTime, Utc};
use rusqlite::params;
use tracing::{debug, info};

impl Store {
    fn fetch_by_id<T: FromRow>(&self, id: i64) -> Result<T> {
        self.select_one(Select::from(T::TABLE).eq("id", id))?
            .ok_or_else(|| anyhow!("Row {} not found in {}", id, T::TABLE))
    }

    /// Look up one record by primary key
    pub fn get<T: FromRow>(&self, id: i64) -> Result<Option<T>> {
        self.select_one(Select::from(T::TABLE).eq("id", id))
    }

    pub fn insert_project(&self, project: &NewProject) -> Result<Project> {
        if project.name.trim().is_empty() {
            bail!("Project name must not be empty");
        }
        self.conn
            .execute(
                "INSERT INTO projects (name, description, status, due_date, is_starred, created_at) VALUES (?1, ?2, ?3, ?4, 0, ?5)",
                params![
                    project.name.trim(),
                    project.description,
                    project.status,
                    project.due_date,
                    Utc::now()
                ],
            )
            .context("Failed to insert project to database.")?;
        let id = self.conn.last_insert_rowid();
        debug!(id, name = %project.name, "project inserted");
        self.fetch_by_id(id)
    }

    /// Returns false when no project has this id
    pub fn set_project_status(&self, id: i64, status: ProjectStatus) -> Result<bool> {
        let changed = self
            .conn
            .execute(
                "UPDATE projects SET status = ?1 WHERE id = ?2",
                params![status, id],
            )
            .context("Failed to update project status in the database.")?;
        Ok(changed > 0)
    }

    /// Returns false when no project has this id
    pub fn set_project_starred(&self, id: i64, starred: bool) -> Result<bool> {
        let changed = self
            .conn
            .execute(
                "UPDATE projects SET is_starred = ?1 WHERE id = ?2",
                params![starred, id],
            )
            .context("Failed to star project in the database.")?;
        Ok(changed > 0)
    }

    pub fn insert_task(&self, task: &NewTask) -> Result<Task> {
        if task.title.trim().is_empty() {
            bail!("Task title must not be empty");
        }
        task.validate_scores().map_err(|e| anyhow!(e))?;
        let now = Utc::now();
        self.conn
            .execute(
                "INSERT INTO tasks (title, description, status, priority, due_date, project_id, assignee_id, importance, urgency, tags, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?11)",
                params![
                    task.title.trim(),
                    task.description,
                    task.status,
                    task.priority,
                    task.due_date,
                    task.project_id,
                    task.assignee_id,
                    task.importance,
                    task.urgency,
                    join_tags(&task.tags),
                    now
                ],
            )
            .context("Failed to insert task to database.")?;
        let id = self.conn.last_insert_rowid();
        debug!(id, title = %task.title, "task inserted");
        self.fetch_by_id(id)
    }

    /// Change a task's status and bump `updated_at`. Returns false when no
    /// task has this id.
    pub fn set_task_status(&self, id: i64, status: TaskStatus) -> Result<bool> {
        let changed = self
            .conn
            .execute(
                "UPDATE tasks SET status = ?1, updated_at = ?2 WHERE id = ?3",
                params![status, Utc::now(), id],
            )
            .context("Failed to update task status in the database.")?;
        Ok(changed > 0)
    }

    pub fn insert_member(&self, member: &NewTeamMember) -> Result<TeamMember> {
        if member.name.trim().is_empty() || member.email.trim().is_empty() {
            bail!("Team member name and email must not be empty");
        }
        let email = member.email.trim().to_lowercase();
        let taken = self.count(&Select::from(Table::TeamMembers).eq("email", email.clone()))?;
        if taken > 0 {
            bail!("A team member with email '{}' already exists", email);
        }
        self.conn
            .execute(
                "INSERT INTO team_members (name, email, role, department, status, avatar, created_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                params![
                    member.name.trim(),
                    email,
                    member.role,
                    member.department,
                    member.status,
                    member.avatar,
                    Utc::now()
                ],
            )
            .context("Failed to insert team member to database.")?;
        self.fetch_by_id(self.conn.last_insert_rowid())
    }

    pub fn insert_time_entry(&self, entry: &NewTimeEntry) -> Result<TimeEntry> {
        let duration = entry.resolved_duration().map_err(|e| anyhow!(e))?;
        self.conn
            .execute(
                "INSERT INTO time_entries (member_id, date, project_id, task_id, description, start_time, end_time, duration_minutes, billable, tags, approval_status, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)",
                params![
                    entry.member_id,
                    entry.date,
                    entry.project_id,
                    entry.task_id,
                    entry.description,
                    entry.start_time,
                    entry.end_time,
                    duration,
                    entry.billable,
                    join_tags(&entry.tags),
                    ApprovalStatus::Pending,
                    Utc::now()
                ],
            )
            .context("Failed to insert time entry to database.")?;
        self.fetch_by_id(self.conn.last_insert_rowid())
    }

    /// Returns false when no time entry has this id
    pub fn set_time_entry_approval(&self, id: i64, approval: ApprovalStatus) -> Result<bool> {
        let changed = self
            .conn
            .execute(
                "UPDATE time_entries SET approval_status = ?1 WHERE id = ?2",
                params![approval, id],
            )
            .context("Failed to update time entry approval in the database.")?;
        Ok(changed > 0)
    }

    /// Attendance record of a member for one day
    pub fn attendance_for(
        &self,
        member_id: i64,
        date: NaiveDate,
    ) -> Result<Option<AttendanceRecord>> {
        self.select_one(
            Select::from(Table::Attendance)
                .eq("member_id", member_id)
                .eq("date", super::day(date)),
        )
    }

    /// Record a check-in. A member checks in at most once per day.
    pub fn check_in(
        &self,
        member_id: i64,
        date: NaiveDate,
        at: NaiveTime,
        status: AttendanceStatus,
    ) -> Result<AttendanceRecord> {
        if let Some(existing) = self.attendance_for(member_id, date)? {
            bail!(
                "Member {} already has an attendance record for {} ({})",
                member_id,
                date,
                existing.status
            );
        }
        self.conn
            .execute(
                "INSERT INTO attendance (member_id, date, check_in, status) VALUES (?1, ?2, ?3, ?4)",
                params![member_id, date, at, status],
            )
            .context("Failed to insert attendance record to database.")?;
        self.fetch_by_id(self.conn.last_insert_rowid())
    }

    /// Record a check-out. Returns `None` when the member never checked in
    /// that day.
    pub fn check_out(
        &self,
        member_id: i64,
        date: NaiveDate,
        at: NaiveTime,
    ) -> Result<Option<AttendanceRecord>> {
        let Some(record) = self.attendance_for(member_id, date)? else {
            return Ok(None);
        };
        if record.check_in.is_some_and(|start| at < start) {
            bail!("Check-out time {} is before check-in", at.format("%H:%M"));
        }
        self.conn
            .execute(
                "UPDATE attendance SET check_out = ?1 WHERE id = ?2",
                params![at, record.id],
            )
            .context("Failed to record check-out in the database.")?;
        self.get(record.id)
    }

    pub fn put_setting(&self, key: &str, value: &str) -> Result<()> {
        if key.trim().is_empty() {
            bail!("Setting key must not be empty");
        }
        self.conn
            .execute(
                "INSERT INTO settings (key, value) VALUES (?1, ?2) ON CONFLICT(key) DO UPDATE SET value = excluded.value",
                params![key.trim(), value],
            )
            .context("Failed to save setting to database.")?;
        Ok(())
    }

    /// True when no project, task or team member exists yet
    pub fn is_empty(&self) -> Result<bool> {
        let rows = self.count(&Select::from(Table::Projects))?
            + self.count(&Select::from(Table::Tasks))?
            + self.count(&Select::from(Table::TeamMembers))?;
        Ok(rows == 0)
    }

    /// Read every table into one snapshot
    pub fn export(&self) -> Result<SnapshotData> {
        use crate::model::SortOrder::Asc;
        Ok(SnapshotData {
            format_version: SnapshotData::FORMAT_VERSION,
            exported_at: Some(Utc::now()),
            projects: self.select(&Select::from(Table::Projects).order_by("id", Asc))?,
            team_members: self.select(&Select::from(Table::TeamMembers).order_by("id", Asc))?,
            tasks: self.select(&Select::from(Table::Tasks).order_by("id", Asc))?,
            time_entries: self.select(&Select::from(Table::TimeEntries).order_by("id", Asc))?,
            attendance: self.select(&Select::from(Table::Attendance).order_by("id", Asc))?,
            settings: self.select(&Select::from(Table::Settings).order_by("key", Asc))?,
        })
    }

    /// Load a snapshot into an empty database, keeping every id. All rows are
    /// written in one transaction.
    pub fn import(&mut self, data: &SnapshotData) -> Result<()> {
        if !self.is_empty()? {
            bail!("Refusing to import a snapshot into a non-empty database");
        }

        let tx = self
            .conn
            .transaction()
            .context("Failed to start import transaction")?;

        for p in &data.projects {
            tx.execute(
                "INSERT INTO projects (id, name, description, status, due_date, is_starred, created_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                params![
                    p.id,
                    p.name,
                    p.description,
                    p.status,
                    p.due_date,
                    p.is_starred,
                    p.created_at
                ],
            )
            .with_context(|| format!("Failed to import project {}", p.id))?;
        }
        for m in &data.team_members {
            tx.execute(
                "INSERT INTO team_members (id, name, email, role, department, status, avatar, created_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
                params![
                    m.id,
                    m.name,
                    m.email,
                    m.role,
                    m.department,
                    m.status,
                    m.avatar,
                    m.created_at
                ],
            )
            .with_context(|| format!("Failed to import team member {}", m.id))?;
        }
        for t in &data.tasks {
            tx.execute(
                "INSERT INTO tasks (id, title, description, status, priority, due_date, project_id, assignee_id, importance, urgency, tags, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)",
                params![
                    t.id,
                    t.title,
                    t.description,
                    t.status,
                    t.priority,
                    t.due_date,
                    t.project_id,
                    t.assignee_id,
                    t.importance,
                    t.urgency,
                    join_tags(&t.tags),
                    t.created_at,
                    t.updated_at
                ],
            )
            .with_context(|| format!("Failed to import task {}", t.id))?;
        }
        for e in &data.time_entries {
            tx.execute(
                "INSERT INTO time_entries (id, member_id, date, project_id, task_id, description, start_time, end_time, duration_minutes, billable, tags, approval_status, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)",
                params![
                    e.id,
                    e.member_id,
                    e.date,
                    e.project_id,
                    e.task_id,
                    e.description,
                    e.start_time,
                    e.end_time,
                    e.duration_minutes,
                    e.billable,
                    join_tags(&e.tags),
                    e.approval,
                    e.created_at
                ],
            )
            .with_context(|| format!("Failed to import time entry {}", e.id))?;
        }
        for a in &data.attendance {
            tx.execute(
                "INSERT INTO attendance (id, member_id, date, check_in, check_out, status) VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                params![a.id, a.member_id, a.date, a.check_in, a.check_out, a.status],
            )
            .with_context(|| format!("Failed to import attendance record {}", a.id))?;
        }
        for s in &data.settings {
            tx.execute(
                "INSERT INTO settings (key, value) VALUES (?1, ?2)",
                params![s.key, s.value],
            )
            .with_context(|| format!("Failed to import setting {}", s.key))?;
        }

        tx.commit().context("Failed to commit snapshot import")?;
        info!(
            projects = data.projects.len(),
            tasks = data.tasks.len(),
            members = data.team_members.len(),
            "snapshot imported"
        );
        Ok(())
    }
}
