//! Task tool handlers

use crate::WorkboardServerHandler;
use crate::access::{self, TaskFilter};
use crate::formatting;
use crate::model::{
    NewTask, Priority, Project, TaskStatus, TeamMember, local_date_today,
};
use crate::stats::{self, Filter, TaskQuery, filter_sort_tasks, quadrant_split};
use crate::validation::{parse_optional, parse_optional_date, parse_param, parse_tags};
use mcp_attr::{Result as McpResult, bail_public};
use std::fmt::Write;

impl WorkboardServerHandler {
    #[allow(clippy::too_many_arguments)]
    pub async fn handle_list_tasks(
        &self,
        query: Option<String>,
        status: Option<String>,
        priority: Option<String>,
        project_id: Option<i64>,
        assignee_id: Option<i64>,
        sort_by: Option<String>,
        order: Option<String>,
    ) -> McpResult<String> {
        let params = TaskQuery {
            query: query.unwrap_or_default(),
            status: parse_optional::<Filter<TaskStatus>>(status.as_deref())?.unwrap_or_default(),
            priority: parse_optional::<Filter<Priority>>(priority.as_deref())?.unwrap_or_default(),
            sort_by: parse_optional(sort_by.as_deref())?.unwrap_or_default(),
            order: parse_optional(order.as_deref())?.unwrap_or_default(),
        };
        let filter = TaskFilter {
            status: params.status.wanted().copied(),
            priority: params.priority.wanted().copied(),
            project_id,
            assignee_id,
            ..Default::default()
        };
        let rows = access::fetch_tasks(&self.store(), &filter);
        Ok(formatting::format_tasks(&filter_sort_tasks(&rows, &params)))
    }

    #[allow(clippy::too_many_arguments)]
    pub async fn handle_create_task(
        &self,
        title: String,
        description: Option<String>,
        status: Option<String>,
        priority: Option<String>,
        due_date: Option<String>,
        project_id: Option<i64>,
        assignee_id: Option<i64>,
        importance: Option<u8>,
        urgency: Option<u8>,
        tags: Option<String>,
    ) -> McpResult<String> {
        let mut task = NewTask::titled(title);
        task.description = description.filter(|d| !d.trim().is_empty());
        if let Some(status) = parse_optional(status.as_deref())? {
            task.status = status;
        }
        if let Some(priority) = parse_optional(priority.as_deref())? {
            task.priority = priority;
        }
        task.due_date = parse_optional_date(due_date.as_deref())?;
        task.project_id = project_id;
        task.assignee_id = assignee_id;
        task.importance = importance.unwrap_or(task.importance);
        task.urgency = urgency.unwrap_or(task.urgency);
        task.tags = parse_tags(tags.as_deref());

        let store = self.store();

        if let Some(project_id) = project_id
            && matches!(store.get::<Project>(project_id), Ok(None))
        {
            drop(store);
            bail_public!(_, "Project {} does not exist", project_id);
        }
        if let Some(assignee_id) = assignee_id
            && matches!(store.get::<TeamMember>(assignee_id), Ok(None))
        {
            drop(store);
            bail_public!(_, "Team member {} does not exist", assignee_id);
        }

        let created = match store.insert_task(&task) {
            Ok(t) => t,
            Err(e) => {
                drop(store);
                bail_public!(_, "Failed to create task: {:#}", e);
            }
        };
        drop(store);

        if let Err(e) = self.persist(&format!("Add task {}", created.id)) {
            bail_public!(_, "Failed to save: {:#}", e);
        }

        Ok(format!(
            "Task created with ID: {} ({}, status: {}, priority: {})",
            created.id, created.title, created.status, created.priority
        ))
    }

    pub async fn handle_update_task_status(&self, id: i64, status: String) -> McpResult<String> {
        let status: TaskStatus = parse_param(&status)?;

        match self.store().set_task_status(id, status) {
            Ok(true) => {}
            Ok(false) => bail_public!(_, "Task {} not found", id),
            Err(e) => bail_public!(_, "Failed to update task {}: {:#}", id, e),
        }

        if let Err(e) = self.persist(&format!("Set task {} to {}", id, status)) {
            bail_public!(_, "Failed to save: {:#}", e);
        }

        Ok(format!("Task {} status changed to {}", id, status))
    }

    /// Task counts plus the upcoming, overdue and unscheduled open tasks
    pub async fn handle_task_stats(&self) -> McpResult<String> {
        let today = local_date_today();
        let store = self.store();
        let tasks = access::fetch_tasks(&store, &TaskFilter::default());
        // the due-this-week window, inclusive of its last day
        let mut upcoming = access::fetch_upcoming_tasks(&store, today, stats::DUE_SOON_DAYS - 1);
        let mut overdue = access::fetch_tasks(
            &store,
            &TaskFilter {
                due_before: Some(today),
                ..Default::default()
            },
        );
        let mut unscheduled = access::fetch_tasks(
            &store,
            &TaskFilter {
                unscheduled: true,
                ..Default::default()
            },
        );
        drop(store);

        for list in [&mut upcoming, &mut overdue, &mut unscheduled] {
            list.retain(|t| t.status != TaskStatus::Completed);
        }
        overdue.sort_by_key(|t| t.due_date);

        let summary = stats::aggregate_by_status(&tasks, today);
        let mut out = formatting::format_status_summary("Tasks", &summary);
        let _ = writeln!(out, "By priority:");
        for (priority, n) in stats::aggregate_by_priority(&tasks) {
            let _ = writeln!(out, "  {}: {}", priority, n);
        }
        out.push_str(&formatting::format_task_agenda(
            &upcoming,
            &overdue,
            unscheduled.len(),
        ));
        Ok(out)
    }

    /// Importance/urgency matrix. Completed tasks are left out unless asked
    /// for.
    pub async fn handle_task_matrix(
        &self,
        project_id: Option<i64>,
        include_completed: Option<bool>,
    ) -> McpResult<String> {
        let filter = TaskFilter {
            project_id,
            ..Default::default()
        };
        let mut tasks = access::fetch_tasks(&self.store(), &filter);
        if !include_completed.unwrap_or(false) {
            tasks.retain(|t| t.status != TaskStatus::Completed);
        }
        Ok(formatting::format_quadrants(&quadrant_split(&tasks)))
    }
}
