pub use chrono::{DateTime, Utc};
use mise_core::Role;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Error {
    pub message: String,
}

/// Acknowledgement of a successful sign-in. The session itself travels in a
/// cookie set alongside this response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginAck {
    pub username: String,
    pub message: String,
}

/// The signed-in user's own identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserDetails {
    pub id: i32,
    pub username: String,
    pub email: String,
    pub roles: Vec<String>,
}

impl UserDetails {
    pub fn has_role(&self, role: Role) -> bool {
        self.roles.iter().any(|r| r.parse() == Ok(role))
    }
}

/// A managed staff account, as listed in the admin console.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: i32,
    pub username: String,
    pub email: String,
    pub roles: Vec<String>,
    pub store: Option<Store>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Store {
    pub id: i32,
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Shift {
    pub id: i32,
    pub user_id: i32,
    pub username: String,
    pub store_id: i32,
    pub title: String,
    pub starts_at: DateTime<Utc>,
    pub ends_at: DateTime<Utc>,
}
