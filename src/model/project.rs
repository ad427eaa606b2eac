use super::labeled_enum;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

labeled_enum! {
    /// Lifecycle status of a project
    ProjectStatus ("project status") {
        Planning => "Planning",
        InProgress => "In Progress",
        Review => "Review",
        Completed => "Completed",
        OnHold => "On Hold",
        Cancelled => "Cancelled",
    }
}

/// A project row from the `projects` table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub status: ProjectStatus,
    /// Calendar-day due date; comparisons never look at time of day
    pub due_date: Option<NaiveDate>,
    pub is_starred: bool,
    pub created_at: DateTime<Utc>,
}

/// Fields accepted when creating a project
#[derive(Debug, Clone)]
pub struct NewProject {
    pub name: String,
    pub description: Option<String>,
    pub status: ProjectStatus,
    pub due_date: Option<NaiveDate>,
}

impl NewProject {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            status: ProjectStatus::Planning,
            due_date: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_project_status_parse_is_loose() {
        assert_eq!(
            "in_progress".parse::<ProjectStatus>().unwrap(),
            ProjectStatus::InProgress
        );
        assert_eq!(
            "On Hold".parse::<ProjectStatus>().unwrap(),
            ProjectStatus::OnHold
        );
        assert_eq!(
            "CANCELLED".parse::<ProjectStatus>().unwrap(),
            ProjectStatus::Cancelled
        );
    }

    #[test]
    fn test_project_status_parse_error_lists_labels() {
        let err = "archived".parse::<ProjectStatus>().unwrap_err();
        assert!(err.contains("archived"));
        assert!(err.contains("Planning, In Progress, Review, Completed, On Hold, Cancelled"));
    }

    #[test]
    fn test_new_project_defaults_to_planning() {
        let p = NewProject::named("Website");
        assert_eq!(p.status, ProjectStatus::Planning);
        assert!(p.due_date.is_none());
    }
}
