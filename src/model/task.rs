use super::labeled_enum;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

labeled_enum! {
    /// Workflow status of a task
    TaskStatus ("task status") {
        Todo => "To Do",
        InProgress => "In Progress",
        Review => "Review",
        Completed => "Completed",
        Blocked => "Blocked",
    }
}

labeled_enum! {
    /// Task priority
    Priority ("priority") {
        Low => "Low",
        Medium => "Medium",
        High => "High",
    }
}

/// Lowest and highest importance/urgency score
pub const SCORE_RANGE: std::ops::RangeInclusive<u8> = 1..=10;

/// A task row from the `tasks` table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub status: TaskStatus,
    pub priority: Priority,
    pub due_date: Option<NaiveDate>,
    pub project_id: Option<i64>,
    pub assignee_id: Option<i64>,
    /// 1-10
    pub importance: u8,
    /// 1-10
    pub urgency: u8,
    #[serde(default)]
    pub tags: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields accepted when creating a task
#[derive(Debug, Clone)]
pub struct NewTask {
    pub title: String,
    pub description: Option<String>,
    pub status: TaskStatus,
    pub priority: Priority,
    pub due_date: Option<NaiveDate>,
    pub project_id: Option<i64>,
    pub assignee_id: Option<i64>,
    pub importance: u8,
    pub urgency: u8,
    pub tags: Vec<String>,
}

impl NewTask {
    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: None,
            status: TaskStatus::Todo,
            priority: Priority::Medium,
            due_date: None,
            project_id: None,
            assignee_id: None,
            importance: 5,
            urgency: 5,
            tags: Vec::new(),
        }
    }

    /// Check importance and urgency against `SCORE_RANGE`
    pub fn validate_scores(&self) -> Result<(), String> {
        for (name, value) in [("importance", self.importance), ("urgency", self.urgency)] {
            if !SCORE_RANGE.contains(&value) {
                return Err(format!(
                    "{} must be between {} and {}, got {}",
                    name,
                    SCORE_RANGE.start(),
                    SCORE_RANGE.end(),
                    value
                ));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_task_status_labels() {
        assert_eq!(TaskStatus::Todo.as_str(), "To Do");
        assert_eq!("to-do".parse::<TaskStatus>().unwrap(), TaskStatus::Todo);
        assert_eq!(TaskStatus::InProgress.to_string(), "In Progress");
    }

    #[test]
    fn test_priority_parse() {
        assert_eq!("high".parse::<Priority>().unwrap(), Priority::High);
        assert!("urgent".parse::<Priority>().is_err());
    }

    #[test]
    fn test_validate_scores() {
        let mut task = NewTask::titled("Write report");
        assert!(task.validate_scores().is_ok());

        task.importance = 0;
        let err = task.validate_scores().unwrap_err();
        assert!(err.contains("importance"));

        task.importance = 10;
        task.urgency = 11;
        let err = task.validate_scores().unwrap_err();
        assert!(err.contains("urgency"));
    }
}
