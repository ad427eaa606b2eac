//! Team directory handlers

use crate::WorkboardServerHandler;
use crate::access;
use crate::formatting;
use crate::model::{MemberStatus, NewTeamMember};
use crate::stats::{Filter, MemberQuery, filter_team_members};
use crate::validation::parse_optional;
use mcp_attr::{Result as McpResult, bail_public};

impl WorkboardServerHandler {
    pub async fn handle_list_team(
        &self,
        query: Option<String>,
        department: Option<String>,
    ) -> McpResult<String> {
        let department = match department.as_deref().map(str::trim) {
            None | Some("") => Filter::All,
            Some(d) if d.eq_ignore_ascii_case("all") => Filter::All,
            Some(d) => Filter::Only(d.to_string()),
        };
        let params = MemberQuery {
            query: query.unwrap_or_default(),
            department,
        };
        let rows = access::fetch_team_members(&self.store(), None);
        Ok(formatting::format_members(&filter_team_members(&rows, &params)))
    }

    pub async fn handle_add_team_member(
        &self,
        name: String,
        email: String,
        role: String,
        department: String,
        status: Option<String>,
        avatar: Option<String>,
    ) -> McpResult<String> {
        let member = NewTeamMember {
            name,
            email,
            role,
            department,
            status: parse_optional(status.as_deref())?.unwrap_or(MemberStatus::Active),
            avatar: avatar.filter(|a| !a.trim().is_empty()),
        };

        let created = match self.store().insert_member(&member) {
            Ok(m) => m,
            Err(e) => bail_public!(_, "Failed to add team member: {:#}", e),
        };

        if let Err(e) = self.persist(&format!("Add team member {}", created.id)) {
            bail_public!(_, "Failed to save: {:#}", e);
        }

        Ok(format!(
            "Team member added with ID: {} ({} <{}>)",
            created.id, created.name, created.email
        ))
    }

    pub async fn handle_team_stats(&self) -> McpResult<String> {
        let stats = access::team_stats(&self.store());
        Ok(formatting::format_team_stats(&stats))
    }
}
