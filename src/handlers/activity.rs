//! Activity feed handler

use crate::WorkboardServerHandler;
use crate::access::{self, ProjectFilter, TaskFilter};
use crate::activity::{FeedParams, build_feed};
use crate::formatting;
use mcp_attr::{Result as McpResult, bail_public};

impl WorkboardServerHandler {
    pub async fn handle_activity_feed(
        &self,
        limit: Option<usize>,
        member_id: Option<i64>,
    ) -> McpResult<String> {
        let params = FeedParams {
            limit: limit.unwrap_or(FeedParams::default().limit),
            member_id,
        };
        if params.limit == 0 {
            bail_public!(_, "limit must be at least 1");
        }

        let store = self.store();
        let projects = access::fetch_projects(&store, &ProjectFilter::default());
        let tasks = access::fetch_tasks(
            &store,
            &TaskFilter {
                assignee_id: member_id,
                limit: Some(params.limit),
                ..Default::default()
            },
        );
        let entries = access::fetch_recent_time_entries(&store, member_id, params.limit);
        drop(store);

        Ok(formatting::format_feed(&build_feed(
            &projects, &tasks, &entries, &params,
        )))
    }
}
