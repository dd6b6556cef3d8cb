use serde::{Deserialize, Serialize};
use std::fmt;

/// Authenticated user role. Capabilities are checked once per action instead
/// of branching on the role at every call site.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Admin,
    Dispatcher,
    FieldAgent,
}

impl Role {
    /// May reassign bookings to agents or clear an assignment.
    pub fn can_assign(self) -> bool {
        matches!(self, Role::Admin | Role::Dispatcher)
    }

    /// May claim a booking for themselves. Admins are not bookable assignees,
    /// and field agents only ever see their own assignment read-only.
    pub fn can_self_assign(self) -> bool {
        matches!(self, Role::Dispatcher)
    }

    pub fn can_create(self) -> bool {
        matches!(self, Role::Admin | Role::Dispatcher)
    }

    pub fn can_delete(self) -> bool {
        matches!(self, Role::Admin | Role::Dispatcher)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Admin => write!(f, "admin"),
            Role::Dispatcher => write!(f, "dispatcher"),
            Role::FieldAgent => write!(f, "field_agent"),
        }
    }
}

impl std::str::FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "admin" => Ok(Role::Admin),
            "dispatcher" => Ok(Role::Dispatcher),
            // The login endpoint reports field agents as plain "agent".
            "agent" | "field_agent" => Ok(Role::FieldAgent),
            _ => Err(format!("Unknown role: {}", s)),
        }
    }
}

/// Identity established by the login endpoint. The session token itself lives
/// in the HTTP client's cookie store and is never handled directly.
#[derive(Debug, Clone)]
pub struct Session {
    pub user_id: i64,
    pub role: Role,
}
