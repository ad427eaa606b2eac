//! Settings and snapshot export

use crate::WorkboardServerHandler;
use crate::access;
use crate::session::CURRENT_USER_SETTING;
use mcp_attr::{Result as McpResult, bail_public};
use std::fmt::Write;
use tracing::info;

impl WorkboardServerHandler {
    /// Stored settings plus the effective server configuration
    pub async fn handle_settings(&self) -> McpResult<String> {
        let settings = access::fetch_settings(&self.store());
        let session = self.session();

        let mut out = String::from("Server configuration:\n");
        let _ = writeln!(out, "  Database: {}", self.config.database.display());
        match &self.snapshot {
            Some(snapshot) => {
                let _ = writeln!(
                    out,
                    "  Snapshot: {} (git sync: {})",
                    snapshot.file_path().display(),
                    if snapshot.is_git_synced() { "on" } else { "off" }
                );
            }
            None => {
                let _ = writeln!(out, "  Snapshot: none");
            }
        }
        match session.current_user() {
            Some(user) => {
                let _ = writeln!(out, "  Current user: {} <{}>", user.name, user.email);
            }
            None => {
                let _ = writeln!(out, "  Current user: none");
            }
        }
        let _ = writeln!(
            out,
            "  Workday start: {}",
            self.config.workday_start.format("%H:%M")
        );
        drop(session);

        if settings.is_empty() {
            out.push_str("\nNo stored settings\n");
        } else {
            let _ = writeln!(out, "\nStored settings ({}):", settings.len());
            for s in &settings {
                let _ = writeln!(out, "  {} = {}", s.key, s.value);
            }
        }
        Ok(out)
    }

    /// Store a setting. `current_user` must name a team member's email and
    /// switches the session's current user too.
    pub async fn handle_set_setting(&self, key: String, value: String) -> McpResult<String> {
        let key = key.trim();
        let mut value = value;
        let mut switch_to = None;
        if key == CURRENT_USER_SETTING {
            let Some(member) = access::find_member_by_email(&self.store(), &value) else {
                bail_public!(_, "No team member with email '{}'", value.trim());
            };
            value = member.email.clone();
            switch_to = Some(member);
        }

        if let Err(e) = self.store().put_setting(key, &value) {
            bail_public!(_, "Failed to save setting: {:#}", e);
        }
        if let Some(member) = switch_to {
            info!(id = member.id, "current user changed");
            self.session().set_current_user(Some(member));
        }

        if let Err(e) = self.persist(&format!("Set setting {}", key)) {
            bail_public!(_, "Failed to save: {:#}", e);
        }

        Ok(format!("Setting '{}' saved", key))
    }

    /// Write the snapshot file now (and commit it when git sync is on)
    pub async fn handle_export_snapshot(&self) -> McpResult<String> {
        let Some(snapshot) = &self.snapshot else {
            bail_public!(
                _,
                "No snapshot file configured. Start the server with --snapshot FILE or set snapshot in the config file."
            );
        };

        if let Err(e) = self.persist("Export snapshot") {
            bail_public!(_, "Failed to export snapshot: {:#}", e);
        }

        Ok(format!("Snapshot written to {}", snapshot.file_path().display()))
    }
}
