use super::labeled_enum;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

labeled_enum! {
    /// Employment status of a team member
    MemberStatus ("member status") {
        Active => "Active",
        Inactive => "Inactive",
        OnLeave => "On Leave",
    }
}

/// A row from the `team_members` table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamMember {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub role: String,
    pub department: String,
    pub status: MemberStatus,
    pub avatar: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewTeamMember {
    pub name: String,
    pub email: String,
    pub role: String,
    pub department: String,
    pub status: MemberStatus,
    pub avatar: Option<String>,
}

impl TeamMember {
    /// Initials used in place of a missing avatar ("Ada Lovelace" -> "AL")
    pub fn initials(&self) -> String {
        self.name
            .split_whitespace()
            .filter_map(|part| part.chars().next())
            .flat_map(char::to_uppercase)
            .take(2)
            .collect()
    }
}
