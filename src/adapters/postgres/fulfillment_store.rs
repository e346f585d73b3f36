//! PostgreSQL implementation of FulfillmentStore.
//!
//! All writes for one successful notification run inside a single
//! transaction. The unique index on `sales (buyer, item, file_type)` is the
//! authoritative guard against concurrent duplicate deliveries: whichever
//! transaction inserts first wins, the other sees the constraint violation
//! and reports `AlreadyFulfilled` with nothing committed.

use async_trait::async_trait;
use sqlx::PgPool;

use crate::domain::foundation::{ContractId, DomainError, PaymentId, SaleId};
use crate::ports::{FulfillmentCommand, FulfillmentOutcome, FulfillmentStore};

use super::rows::{map_db_error, violated_constraint};

/// Constraint names that signal a concurrent delivery already recorded the
/// sale.
const SALE_UNIQUE_CONSTRAINTS: [&str; 2] =
    ["sales_buyer_beat_tier_key", "sales_buyer_soundpack_key"];

pub struct PostgresFulfillmentStore {
    pool: PgPool,
}

impl PostgresFulfillmentStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl FulfillmentStore for PostgresFulfillmentStore {
    async fn record_success(
        &self,
        command: FulfillmentCommand,
    ) -> Result<FulfillmentOutcome, DomainError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| map_db_error(e, "Failed to open fulfillment transaction"))?;

        // Transition pending -> success. Zero rows means another delivery
        // already moved the payment to a terminal state.
        let updated = sqlx::query(
            r#"
            UPDATE payments
            SET status = 'success', paid_amount = $2, paid_currency = $3
            WHERE id = $1 AND status = 'pending'
            "#,
        )
        .bind(command.payment_id.as_i64())
        .bind(command.paid_amount)
        .bind(&command.paid_currency)
        .execute(&mut *tx)
        .await
        .map_err(|e| map_db_error(e, "Failed to update payment status"))?;

        if updated.rows_affected() == 0 {
            return Ok(FulfillmentOutcome::AlreadyFulfilled);
        }

        if let Some(beat_id) = command.mark_beat_sold_exclusive {
            let flagged = sqlx::query(
                r#"
                UPDATE beats
                SET is_sold_exclusive = TRUE
                WHERE id = $1 AND is_sold_exclusive = FALSE
                "#,
            )
            .bind(beat_id.as_i64())
            .execute(&mut *tx)
            .await
            .map_err(|e| map_db_error(e, "Failed to flag exclusive sale"))?;

            // Somebody else's exclusive sale committed since our pre-check.
            if flagged.rows_affected() == 0 {
                tracing::warn!(
                    beat_id = beat_id.as_i64(),
                    payment_id = command.payment_id.as_i64(),
                    "Exclusive flag already set, abandoning fulfillment"
                );
                return Ok(FulfillmentOutcome::AlreadyFulfilled);
            }
        }

        let sale_insert = sqlx::query_scalar::<_, i64>(
            r#"
            INSERT INTO sales (buyer_id, producer_id, beat_id, soundpack_id,
                               amount, file_type)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id
            "#,
        )
        .bind(command.sale.buyer_id.as_i64())
        .bind(command.sale.producer_id.map(|id| id.as_i64()))
        .bind(command.sale.beat_id.map(|id| id.as_i64()))
        .bind(command.sale.soundpack_id.map(|id| id.as_i64()))
        .bind(command.sale.amount)
        .bind(command.sale.file_type.map(|ft| ft.as_str()))
        .fetch_one(&mut *tx)
        .await;

        let sale_id = match sale_insert {
            Ok(id) => SaleId::new(id),
            Err(e) => {
                if violated_constraint(&e)
                    .map(|c| SALE_UNIQUE_CONSTRAINTS.contains(&c.as_str()))
                    .unwrap_or(false)
                {
                    // Lost the race; the winning transaction owns all writes.
                    return Ok(FulfillmentOutcome::AlreadyFulfilled);
                }
                return Err(map_db_error(e, "Failed to insert sale"));
            }
        };

        let mut contract_id = None;
        if let Some(contract) = &command.contract {
            let id = sqlx::query_scalar::<_, i64>(
                r#"
                INSERT INTO contracts (buyer_id, beat_id, file_type, contract_type,
                                       terms, price, contract_url, contract_template_id)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
                RETURNING id
                "#,
            )
            .bind(contract.buyer_id.as_i64())
            .bind(contract.beat_id.as_i64())
            .bind(contract.file_type.as_str())
            .bind(&contract.contract_type)
            .bind(&contract.terms)
            .bind(contract.price)
            .bind(&contract.contract_url)
            .bind(contract.contract_template_id.map(|id| id.as_i64()))
            .fetch_one(&mut *tx)
            .await
            .map_err(|e| map_db_error(e, "Failed to insert contract"))?;

            sqlx::query("UPDATE sales SET contract_id = $2 WHERE id = $1")
                .bind(sale_id.as_i64())
                .bind(id)
                .execute(&mut *tx)
                .await
                .map_err(|e| map_db_error(e, "Failed to link contract to sale"))?;

            contract_id = Some(ContractId::new(id));
        }

        // Consume the discount in the same unit so usage rolls back with
        // everything else.
        if let Some(discount_id) = command.discount_id {
            sqlx::query("UPDATE discounts SET used_count = used_count + 1 WHERE id = $1")
                .bind(discount_id.as_i64())
                .execute(&mut *tx)
                .await
                .map_err(|e| map_db_error(e, "Failed to increment discount usage"))?;
        }

        tx.commit()
            .await
            .map_err(|e| map_db_error(e, "Failed to commit fulfillment"))?;

        Ok(FulfillmentOutcome::Recorded {
            sale_id,
            contract_id,
        })
    }

    async fn record_failure(&self, payment_id: PaymentId) -> Result<(), DomainError> {
        sqlx::query("UPDATE payments SET status = 'failed' WHERE id = $1 AND status = 'pending'")
            .bind(payment_id.as_i64())
            .execute(&self.pool)
            .await
            .map_err(|e| map_db_error(e, "Failed to mark payment failed"))?;
        Ok(())
    }
}
