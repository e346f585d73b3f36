//! Wishlist persistence port.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::catalog::ItemKind;
use crate::domain::foundation::{DomainError, UserId, WishlistId};

/// A saved item on a user's wishlist.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WishlistEntry {
    pub id: WishlistId,
    pub user_id: UserId,
    pub item_type: ItemKind,
    pub item_id: i64,
    pub created_at: DateTime<Utc>,
}

/// Result of adding to a wishlist.
#[derive(Debug, Clone, PartialEq)]
pub enum WishlistAddOutcome {
    Added(WishlistEntry),
    /// The item was already saved; the existing entry is returned.
    AlreadyPresent(WishlistEntry),
}

/// Port for the wishlists table.
#[async_trait]
pub trait WishlistStore: Send + Sync {
    async fn list(&self, user_id: UserId) -> Result<Vec<WishlistEntry>, DomainError>;

    async fn add(
        &self,
        user_id: UserId,
        item_type: ItemKind,
        item_id: i64,
    ) -> Result<WishlistAddOutcome, DomainError>;

    async fn find_by_id(&self, id: WishlistId) -> Result<Option<WishlistEntry>, DomainError>;

    async fn remove(&self, id: WishlistId) -> Result<(), DomainError>;
}
