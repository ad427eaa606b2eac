//! Project tool handlers

use crate::WorkboardServerHandler;
use crate::access::{self, ProjectFilter};
use crate::formatting;
use crate::model::{NewProject, ProjectStatus, local_date_today};
use crate::stats::{Filter, ProjectQuery, filter_sort_projects};
use crate::store::{Select, Table};
use crate::validation::{parse_optional, parse_optional_date, parse_param};
use mcp_attr::{Result as McpResult, bail_public};

impl WorkboardServerHandler {
    /// List projects, searched, filtered and sorted in memory
    pub async fn handle_list_projects(
        &self,
        query: Option<String>,
        status: Option<String>,
        sort_by: Option<String>,
        order: Option<String>,
        starred_only: Option<bool>,
    ) -> McpResult<String> {
        let params = ProjectQuery {
            query: query.unwrap_or_default(),
            status: parse_optional::<Filter<ProjectStatus>>(status.as_deref())?.unwrap_or_default(),
            sort_by: parse_optional(sort_by.as_deref())?.unwrap_or_default(),
            order: parse_optional(order.as_deref())?.unwrap_or_default(),
        };
        let filter = ProjectFilter {
            status: params.status.wanted().copied(),
            starred_only: starred_only.unwrap_or(false),
        };
        let rows = access::fetch_projects(&self.store(), &filter);
        Ok(formatting::format_projects(&filter_sort_projects(&rows, &params)))
    }

    pub async fn handle_create_project(
        &self,
        name: String,
        description: Option<String>,
        status: Option<String>,
        due_date: Option<String>,
    ) -> McpResult<String> {
        let project = NewProject {
            name,
            description: description.filter(|d| !d.trim().is_empty()),
            status: parse_optional(status.as_deref())?.unwrap_or(ProjectStatus::Planning),
            due_date: parse_optional_date(due_date.as_deref())?,
        };

        let created = match self.store().insert_project(&project) {
            Ok(p) => p,
            Err(e) => bail_public!(_, "Failed to create project: {:#}", e),
        };

        if let Err(e) = self.persist(&format!("Add project {}", created.id)) {
            bail_public!(_, "Failed to save: {:#}", e);
        }

        Ok(format!(
            "Project created with ID: {} ({}, status: {})",
            created.id, created.name, created.status
        ))
    }

    pub async fn handle_update_project_status(&self, id: i64, status: String) -> McpResult<String> {
        let status: ProjectStatus = parse_param(&status)?;

        match self.store().set_project_status(id, status) {
            Ok(true) => {}
            Ok(false) => bail_public!(_, "Project {} not found", id),
            Err(e) => bail_public!(_, "Failed to update project {}: {:#}", id, e),
        }

        if let Err(e) = self.persist(&format!("Set project {} to {}", id, status)) {
            bail_public!(_, "Failed to save: {:#}", e);
        }

        Ok(format!("Project {} status changed to {}", id, status))
    }

    pub async fn handle_star_project(&self, id: i64, starred: Option<bool>) -> McpResult<String> {
        let starred = starred.unwrap_or(true);

        match self.store().set_project_starred(id, starred) {
            Ok(true) => {}
            Ok(false) => bail_public!(_, "Project {} not found", id),
            Err(e) => bail_public!(_, "Failed to update project {}: {:#}", id, e),
        }

        let verb = if starred { "Star" } else { "Unstar" };
        if let Err(e) = self.persist(&format!("{} project {}", verb, id)) {
            bail_public!(_, "Failed to save: {:#}", e);
        }

        Ok(format!("Project {} {}red", id, verb.to_lowercase()))
    }

    pub async fn handle_project_stats(&self) -> McpResult<String> {
        let store = self.store();
        let summary = access::project_stats(&store, local_date_today());
        let starred = access::count(&store, &Select::from(Table::Projects).eq("is_starred", true));
        drop(store);

        let mut out = formatting::format_status_summary("Projects", &summary);
        out.push_str(&format!("Starred: {}\n", starred));
        Ok(out)
    }
}
