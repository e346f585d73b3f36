//! PostgreSQL implementation of PaymentStore.

use async_trait::async_trait;
use sqlx::PgPool;

use crate::domain::foundation::{DomainError, ErrorCode, PaymentId};
use crate::domain::payment::Payment;
use crate::ports::{NewPayment, PaymentStore};

use super::rows::{map_db_error, PaymentRow};

pub struct PostgresPaymentStore {
    pool: PgPool,
}

impl PostgresPaymentStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

const PAYMENT_COLUMNS: &str = r#"id, user_id, amount, currency, method, status,
    transaction_ref, paid_amount, paid_currency, beat_id, soundpack_id,
    discount_id, file_type, created_at"#;

#[async_trait]
impl PaymentStore for PostgresPaymentStore {
    async fn create_pending(&self, payment: NewPayment) -> Result<Payment, DomainError> {
        let row: PaymentRow = sqlx::query_as(&format!(
            r#"
            INSERT INTO payments (user_id, amount, currency, method, status,
                                  beat_id, soundpack_id, discount_id, file_type)
            VALUES ($1, $2, $3, $4, 'pending', $5, $6, $7, $8)
            RETURNING {PAYMENT_COLUMNS}
            "#
        ))
        .bind(payment.user_id.as_i64())
        .bind(payment.amount)
        .bind(&payment.currency)
        .bind(&payment.method)
        .bind(payment.beat_id.map(|id| id.as_i64()))
        .bind(payment.soundpack_id.map(|id| id.as_i64()))
        .bind(payment.discount_id.map(|id| id.as_i64()))
        .bind(payment.file_type.map(|ft| ft.as_str()))
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_db_error(e, "Failed to create payment"))?;

        row.try_into()
    }

    async fn set_transaction_ref(
        &self,
        id: PaymentId,
        reference: &str,
    ) -> Result<(), DomainError> {
        let result = sqlx::query("UPDATE payments SET transaction_ref = $2 WHERE id = $1")
            .bind(id.as_i64())
            .bind(reference)
            .execute(&self.pool)
            .await
            .map_err(|e| map_db_error(e, "Failed to set transaction reference"))?;

        if result.rows_affected() == 0 {
            return Err(DomainError::new(
                ErrorCode::PaymentNotFound,
                format!("Payment {} not found", id),
            ));
        }
        Ok(())
    }

    async fn find_by_id(&self, id: PaymentId) -> Result<Option<Payment>, DomainError> {
        let row: Option<PaymentRow> = sqlx::query_as(&format!(
            "SELECT {PAYMENT_COLUMNS} FROM payments WHERE id = $1"
        ))
        .bind(id.as_i64())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_db_error(e, "Failed to load payment"))?;

        row.map(Payment::try_from).transpose()
    }

    async fn find_by_reference(&self, reference: &str) -> Result<Option<Payment>, DomainError> {
        let row: Option<PaymentRow> = sqlx::query_as(&format!(
            "SELECT {PAYMENT_COLUMNS} FROM payments WHERE transaction_ref = $1"
        ))
        .bind(reference)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_db_error(e, "Failed to load payment by reference"))?;

        row.map(Payment::try_from).transpose()
    }
}
