//! TOML snapshot of the whole store
//!
//! The SQLite file is the source of truth; the snapshot is a readable,
//! diff-friendly export written after every mutation when configured. With
//! git sync enabled each write is committed, and the branch is pulled on
//! startup and pushed on shutdown.

use crate::git_ops::GitOps;
use crate::model::{AttendanceRecord, Project, Setting, Task, TeamMember, TimeEntry};
use anyhow::{Context, Result, bail};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Every table of the store, in id order
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SnapshotData {
    pub format_version: u32,
    pub exported_at: Option<DateTime<Utc>>,
    pub projects: Vec<Project>,
    pub team_members: Vec<TeamMember>,
    pub tasks: Vec<Task>,
    pub time_entries: Vec<TimeEntry>,
    pub attendance: Vec<AttendanceRecord>,
    pub settings: Vec<Setting>,
}

impl SnapshotData {
    pub const FORMAT_VERSION: u32 = 1;

    pub fn row_count(&self) -> usize {
        self.projects.len()
            + self.team_members.len()
            + self.tasks.len()
            + self.time_entries.len()
            + self.attendance.len()
            + self.settings.len()
    }
}

pub struct Snapshot {
    file_path: PathBuf,
    git: Option<GitOps>,
}

impl Snapshot {
    pub fn new(file_path: impl AsRef<Path>, sync_git: bool) -> Self {
        let file_path = file_path.as_ref().to_path_buf();
        let git = if sync_git {
            let ops = GitOps::new(&file_path);
            if !ops.is_git_managed() {
                warn!(
                    path = %file_path.display(),
                    "git sync requested but snapshot is not inside a git repository"
                );
                None
            } else {
                if let Err(e) = ops.pull() {
                    warn!(error = %format!("{e:#}"), "git pull on startup failed");
                }
                Some(ops)
            }
        } else {
            None
        };
        Self { file_path, git }
    }

    pub fn file_path(&self) -> &Path {
        &self.file_path
    }

    pub fn is_git_synced(&self) -> bool {
        self.git.is_some()
    }

    /// Read the snapshot file; `None` when it does not exist yet
    pub fn load(&self) -> Result<Option<SnapshotData>> {
        if !self.file_path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(&self.file_path)
            .with_context(|| format!("Failed to read snapshot {}", self.file_path.display()))?;
        if content.trim().is_empty() {
            return Ok(None);
        }
        let data: SnapshotData = toml::from_str(&content)
            .with_context(|| format!("Failed to parse snapshot {}", self.file_path.display()))?;
        if data.format_version > SnapshotData::FORMAT_VERSION {
            bail!(
                "Snapshot format version {} is newer than supported version {}",
                data.format_version,
                SnapshotData::FORMAT_VERSION
            );
        }
        Ok(Some(data))
    }

    /// Write the snapshot and, with git sync enabled, commit it
    pub fn save_with_message(&self, data: &SnapshotData, message: &str) -> Result<()> {
        let content = toml::to_string_pretty(data).context("Failed to serialize snapshot")?;
        fs::write(&self.file_path, content)
            .with_context(|| format!("Failed to write snapshot {}", self.file_path.display()))?;
        debug!(rows = data.row_count(), path = %self.file_path.display(), "snapshot written");

        if let Some(git) = &self.git {
            git.commit(&self.file_path, message)
                .context("Failed to commit snapshot")?;
        }
        Ok(())
    }

    /// Push pending commits when git sync is enabled
    pub fn shutdown(&self) -> Result<()> {
        match &self.git {
            Some(git) => git.push().context("Failed to push snapshot commits"),
            None => Ok(()),
        }
    }
}
