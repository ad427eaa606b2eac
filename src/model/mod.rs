//! Dashboard domain records
//!
//! Every record mirrors one row of the backing store. Associations are plain
//! foreign ids; nothing here owns another record.
//! - `project`: projects and their lifecycle status
//! - `task`: tasks with priority and importance/urgency scores
//! - `member`: team members
//! - `time_entry`: logged work intervals
//! - `attendance`: daily check-in/check-out records

use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};

/// Get the current date in local timezone
pub fn local_date_today() -> NaiveDate {
    Local::now().date_naive()
}

/// Sort direction shared by the query builder and the in-memory pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl std::str::FromStr for SortOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "asc" | "ascending" => Ok(SortOrder::Asc),
            "desc" | "descending" => Ok(SortOrder::Desc),
            _ => Err(format!("Invalid sort order '{}'. Valid options are: asc, desc", s)),
        }
    }
}

/// A single key/value pair from the settings table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Setting {
    pub key: String,
    pub value: String,
}

/// Split a comma-separated tag column into trimmed, non-empty tags
pub fn split_tags(raw: Option<&str>) -> Vec<String> {
    raw.map(|s| {
        s.split(',')
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(str::to_string)
            .collect()
    })
    .unwrap_or_default()
}

/// Join tags back into their stored form. Empty tag lists are stored as NULL.
pub fn join_tags(tags: &[String]) -> Option<String> {
    let cleaned: Vec<&str> = tags
        .iter()
        .map(|t| t.trim())
        .filter(|t| !t.is_empty())
        .collect();
    if cleaned.is_empty() {
        None
    } else {
        Some(cleaned.join(","))
    }
}

/// Fold a label for loose matching: "in_progress", "In Progress" and
/// "in-progress" all fold to "in progress".
pub(crate) fn fold_label(s: &str) -> String {
    s.trim().to_lowercase().replace(['_', '-'], " ")
}

/// Declares a fixed-label status enum. The label is what gets stored in the
/// database, serialized, and displayed; parsing is loose (see `fold_label`).
macro_rules! labeled_enum {
    (
        $(#[$meta:meta])*
        $name:ident ($kind:literal) {
            $($(#[$vmeta:meta])* $variant:ident => $label:literal),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(
            Debug,
            Clone,
            Copy,
            PartialEq,
            Eq,
            Hash,
            PartialOrd,
            Ord,
            serde::Serialize,
            serde::Deserialize,
        )]
        pub enum $name {
            $($(#[$vmeta])* #[serde(rename = $label)] $variant,)+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            /// Stored and displayed label
            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $label,)+
                }
            }

            /// Comma-separated list of every valid label
            pub fn labels() -> String {
                Self::ALL
                    .iter()
                    .map(|v| v.as_str())
                    .collect::<Vec<_>>()
                    .join(", ")
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for $name {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let wanted = $crate::model::fold_label(s);
                Self::ALL
                    .iter()
                    .copied()
                    .find(|v| $crate::model::fold_label(v.as_str()) == wanted)
                    .ok_or_else(|| {
                        format!(
                            "Invalid {} '{}'. Valid options are: {}",
                            $kind,
                            s,
                            Self::labels()
                        )
                    })
            }
        }

        impl From<$name> for rusqlite::types::Value {
            fn from(v: $name) -> Self {
                rusqlite::types::Value::Text(v.as_str().to_string())
            }
        }

        impl rusqlite::types::ToSql for $name {
            fn to_sql(&self) -> rusqlite::Result<rusqlite::types::ToSqlOutput<'_>> {
                Ok(rusqlite::types::ToSqlOutput::from(self.as_str()))
            }
        }

        impl rusqlite::types::FromSql for $name {
            fn column_result(
                value: rusqlite::types::ValueRef<'_>,
            ) -> rusqlite::types::FromSqlResult<Self> {
                value
                    .as_str()?
                    .parse()
                    .map_err(|e: String| rusqlite::types::FromSqlError::Other(e.into()))
            }
        }
    };
}

pub(crate) use labeled_enum;

mod attendance;
mod member;
mod project;
mod task;
mod time_entry;

pub use attendance::{AttendanceRecord, AttendanceStatus};
pub use member::{MemberStatus, NewTeamMember, TeamMember};
pub use project::{NewProject, Project, ProjectStatus};
pub use task::{NewTask, Priority, Task, TaskStatus};
pub use time_entry::{ApprovalStatus, MAX_ENTRY_MINUTES, NewTimeEntry, TimeEntry};
