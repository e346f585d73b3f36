//! Wishlist commands and queries.

use std::sync::Arc;

use crate::domain::catalog::ItemKind;
use crate::domain::foundation::{DomainError, ErrorCode, WishlistId};
use crate::domain::users::User;
use crate::ports::{CatalogStore, WishlistAddOutcome, WishlistEntry, WishlistStore};

/// Result of adding an item.
#[derive(Debug, Clone, PartialEq)]
pub enum WishlistAdd {
    Added(WishlistEntry),
    AlreadyPresent(WishlistEntry),
}

/// Handler for wishlist operations.
pub struct WishlistService {
    wishlist: Arc<dyn WishlistStore>,
    catalog: Arc<dyn CatalogStore>,
}

impl WishlistService {
    pub fn new(wishlist: Arc<dyn WishlistStore>, catalog: Arc<dyn CatalogStore>) -> Self {
        Self { wishlist, catalog }
    }

    pub async fn list(&self, user: &User) -> Result<Vec<WishlistEntry>, DomainError> {
        self.wishlist.list(user.id).await
    }

    /// Adds an item after checking it exists; duplicates are a no-op.
    pub async fn add(
        &self,
        user: &User,
        item_type: ItemKind,
        item_id: i64,
    ) -> Result<WishlistAdd, DomainError> {
        let exists = self
            .catalog
            .find_purchasable(item_type, item_id)
            .await?
            .is_some();
        if !exists {
            let code = match item_type {
                ItemKind::Beat => ErrorCode::BeatNotFound,
                ItemKind::SoundPack => ErrorCode::SoundPackNotFound,
            };
            return Err(DomainError::new(code, format!("{item_type} not found")));
        }

        Ok(match self.wishlist.add(user.id, item_type, item_id).await? {
            WishlistAddOutcome::Added(entry) => WishlistAdd::Added(entry),
            WishlistAddOutcome::AlreadyPresent(entry) => WishlistAdd::AlreadyPresent(entry),
        })
    }

    /// Removes an entry; only its owner may do so.
    pub async fn remove(&self, user: &User, id: WishlistId) -> Result<(), DomainError> {
        let entry = self
            .wishlist
            .find_by_id(id)
            .await?
            .ok_or_else(|| {
                DomainError::new(ErrorCode::WishlistItemNotFound, "Wishlist item not found")
            })?;

        if entry.user_id != user.id {
            return Err(DomainError::new(ErrorCode::Forbidden, "Not your wishlist"));
        }

        self.wishlist.remove(id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::test_support::{
        beat_fixture, user_fixture, InMemoryCatalog, InMemoryWishlist,
    };
    use crate::domain::catalog::FileType;
    use crate::domain::foundation::Role;

    fn service(catalog: InMemoryCatalog) -> WishlistService {
        WishlistService::new(Arc::new(InMemoryWishlist::new()), Arc::new(catalog))
    }

    #[tokio::test]
    async fn add_list_remove_round_trip() {
        let s = service(
            InMemoryCatalog::new()
                .with_beat(beat_fixture(3, 1, false), vec![(FileType::Mp3, 50.0)]),
        );
        let user = user_fixture(5, Role::Buyer);

        let added = s.add(&user, ItemKind::Beat, 3).await.unwrap();
        let entry = match added {
            WishlistAdd::Added(e) => e,
            WishlistAdd::AlreadyPresent(_) => panic!("expected a fresh entry"),
        };

        assert_eq!(s.list(&user).await.unwrap().len(), 1);
        s.remove(&user, entry.id).await.unwrap();
        assert!(s.list(&user).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn duplicate_add_is_reported_not_duplicated() {
        let s = service(
            InMemoryCatalog::new()
                .with_beat(beat_fixture(3, 1, false), vec![(FileType::Mp3, 50.0)]),
        );
        let user = user_fixture(5, Role::Buyer);

        s.add(&user, ItemKind::Beat, 3).await.unwrap();
        let second = s.add(&user, ItemKind::Beat, 3).await.unwrap();

        assert!(matches!(second, WishlistAdd::AlreadyPresent(_)));
        assert_eq!(s.list(&user).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn missing_item_cannot_be_wished_for() {
        let s = service(InMemoryCatalog::new());
        let err = s
            .add(&user_fixture(5, Role::Buyer), ItemKind::Beat, 3)
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::BeatNotFound);
    }

    #[tokio::test]
    async fn only_the_owner_may_remove() {
        let s = service(
            InMemoryCatalog::new()
                .with_beat(beat_fixture(3, 1, false), vec![(FileType::Mp3, 50.0)]),
        );
        let owner = user_fixture(5, Role::Buyer);
        let entry = match s.add(&owner, ItemKind::Beat, 3).await.unwrap() {
            WishlistAdd::Added(e) => e,
            WishlistAdd::AlreadyPresent(e) => e,
        };

        let err = s
            .remove(&user_fixture(6, Role::Buyer), entry.id)
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::Forbidden);
    }
}
