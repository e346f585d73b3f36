//! PostgreSQL implementation of WishlistStore.

use async_trait::async_trait;
use sqlx::PgPool;

use crate::domain::catalog::ItemKind;
use crate::domain::foundation::{DomainError, ErrorCode, UserId, WishlistId};
use crate::ports::{WishlistAddOutcome, WishlistEntry, WishlistStore};

use super::rows::{map_db_error, violated_constraint, WishlistRow};

pub struct PostgresWishlistStore {
    pool: PgPool,
}

impl PostgresWishlistStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

const WISHLIST_COLUMNS: &str = "id, user_id, item_type, item_id, created_at";

#[async_trait]
impl WishlistStore for PostgresWishlistStore {
    async fn list(&self, user_id: UserId) -> Result<Vec<WishlistEntry>, DomainError> {
        let rows: Vec<WishlistRow> = sqlx::query_as(&format!(
            r#"
            SELECT {WISHLIST_COLUMNS}
            FROM wishlists
            WHERE user_id = $1
            ORDER BY created_at DESC
            "#
        ))
        .bind(user_id.as_i64())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| map_db_error(e, "Failed to list wishlist"))?;

        rows.into_iter().map(WishlistEntry::try_from).collect()
    }

    async fn add(
        &self,
        user_id: UserId,
        item_type: ItemKind,
        item_id: i64,
    ) -> Result<WishlistAddOutcome, DomainError> {
        let inserted: Result<WishlistRow, sqlx::Error> = sqlx::query_as(&format!(
            r#"
            INSERT INTO wishlists (user_id, item_type, item_id)
            VALUES ($1, $2, $3)
            RETURNING {WISHLIST_COLUMNS}
            "#
        ))
        .bind(user_id.as_i64())
        .bind(item_type.as_str())
        .bind(item_id)
        .fetch_one(&self.pool)
        .await;

        match inserted {
            Ok(row) => Ok(WishlistAddOutcome::Added(row.try_into()?)),
            Err(e) => {
                if violated_constraint(&e).as_deref() == Some("wishlists_user_item_key") {
                    let existing: WishlistRow = sqlx::query_as(&format!(
                        r#"
                        SELECT {WISHLIST_COLUMNS}
                        FROM wishlists
                        WHERE user_id = $1 AND item_type = $2 AND item_id = $3
                        "#
                    ))
                    .bind(user_id.as_i64())
                    .bind(item_type.as_str())
                    .bind(item_id)
                    .fetch_one(&self.pool)
                    .await
                    .map_err(|e| map_db_error(e, "Failed to load existing wishlist entry"))?;
                    return Ok(WishlistAddOutcome::AlreadyPresent(existing.try_into()?));
                }
                Err(map_db_error(e, "Failed to add wishlist entry"))
            }
        }
    }

    async fn find_by_id(&self, id: WishlistId) -> Result<Option<WishlistEntry>, DomainError> {
        let row: Option<WishlistRow> = sqlx::query_as(&format!(
            "SELECT {WISHLIST_COLUMNS} FROM wishlists WHERE id = $1"
        ))
        .bind(id.as_i64())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_db_error(e, "Failed to load wishlist entry"))?;

        row.map(WishlistEntry::try_from).transpose()
    }

    async fn remove(&self, id: WishlistId) -> Result<(), DomainError> {
        let result = sqlx::query("DELETE FROM wishlists WHERE id = $1")
            .bind(id.as_i64())
            .execute(&self.pool)
            .await
            .map_err(|e| map_db_error(e, "Failed to remove wishlist entry"))?;

        if result.rows_affected() == 0 {
            return Err(DomainError::new(
                ErrorCode::WishlistItemNotFound,
                "Wishlist item not found",
            ));
        }
        Ok(())
    }
}
