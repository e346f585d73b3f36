//! PostgreSQL implementation of DiscountStore.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::domain::foundation::{DomainError, ErrorCode};
use crate::domain::pricing::Discount;
use crate::ports::{DiscountStore, NewDiscount};

use super::rows::{map_db_error, violated_constraint, DiscountRow};

pub struct PostgresDiscountStore {
    pool: PgPool,
}

impl PostgresDiscountStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

const DISCOUNT_COLUMNS: &str = r#"id, code, percentage, applicable_to, item_id, name,
    description, start_date, end_date, max_uses, used_count, is_active, created_at"#;

#[async_trait]
impl DiscountStore for PostgresDiscountStore {
    async fn find_by_code(&self, code: &str) -> Result<Option<Discount>, DomainError> {
        let row: Option<DiscountRow> = sqlx::query_as(&format!(
            "SELECT {DISCOUNT_COLUMNS} FROM discounts WHERE code = $1"
        ))
        .bind(code)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_db_error(e, "Failed to load discount"))?;

        row.map(Discount::try_from).transpose()
    }

    async fn list_active(&self, now: DateTime<Utc>) -> Result<Vec<Discount>, DomainError> {
        let rows: Vec<DiscountRow> = sqlx::query_as(&format!(
            r#"
            SELECT {DISCOUNT_COLUMNS}
            FROM discounts
            WHERE is_active = TRUE
              AND (start_date IS NULL OR start_date <= $1)
              AND (end_date IS NULL OR end_date >= $1)
              AND (max_uses IS NULL OR used_count < max_uses)
            ORDER BY created_at DESC
            "#
        ))
        .bind(now)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| map_db_error(e, "Failed to list discounts"))?;

        rows.into_iter().map(Discount::try_from).collect()
    }

    async fn create(&self, discount: NewDiscount) -> Result<Discount, DomainError> {
        let row: Result<DiscountRow, sqlx::Error> = sqlx::query_as(&format!(
            r#"
            INSERT INTO discounts (code, percentage, applicable_to, item_id, name,
                                   description, start_date, end_date, max_uses)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING {DISCOUNT_COLUMNS}
            "#
        ))
        .bind(&discount.code)
        .bind(discount.percentage)
        .bind(discount.scope.as_str())
        .bind(discount.item_id)
        .bind(&discount.name)
        .bind(&discount.description)
        .bind(discount.start_date)
        .bind(discount.end_date)
        .bind(discount.max_uses)
        .fetch_one(&self.pool)
        .await;

        match row {
            Ok(row) => row.try_into(),
            Err(e) => {
                if violated_constraint(&e).as_deref() == Some("discounts_code_key") {
                    return Err(DomainError::new(
                        ErrorCode::DuplicateDiscountCode,
                        "Discount code already exists",
                    ));
                }
                Err(map_db_error(e, "Failed to create discount"))
            }
        }
    }
}
