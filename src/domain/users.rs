//! Registered users.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::foundation::{Role, UserId};

/// A registered account, provisioned on first verified token.
///
/// The role is re-normalized from the identity claim on every
/// authentication, so the stored value tracks the provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub firebase_uid: Option<String>,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
}

impl User {
    pub fn is_producer(&self) -> bool {
        self.role.is_producer()
    }
}
