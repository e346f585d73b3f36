//! User roles and claim normalization.
//!
//! The identity provider issues free-form role claims ("admin", "producer",
//! "buyer", "artist", arbitrary casing). Every call site goes through
//! [`Role::normalize`] so the mapping lives in exactly one place.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Role of an authenticated user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Sells beats and sound packs; owns catalog items.
    Producer,
    /// Purchases file tiers and sound packs.
    Buyer,
}

impl Role {
    /// Normalizes a provider role claim into a [`Role`].
    ///
    /// `admin` is a legacy alias for producer and `artist` for buyer.
    /// Unknown or missing claims default to buyer, the least privileged role.
    pub fn normalize(claim: Option<&str>) -> Role {
        match claim.map(|c| c.trim().to_ascii_lowercase()).as_deref() {
            Some("producer") | Some("admin") => Role::Producer,
            Some("buyer") | Some("artist") => Role::Buyer,
            _ => Role::Buyer,
        }
    }

    pub fn is_producer(&self) -> bool {
        matches!(self, Role::Producer)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Producer => "producer",
            Role::Buyer => "buyer",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
