//! PostgreSQL implementation of SaleStore.

use async_trait::async_trait;
use sqlx::PgPool;

use crate::domain::catalog::FileType;
use crate::domain::foundation::{BeatId, DomainError, SoundPackId, UserId};
use crate::domain::payment::{Contract, Sale};
use crate::ports::SaleStore;

use super::rows::{map_db_error, ContractRow, SaleRow};

pub struct PostgresSaleStore {
    pool: PgPool,
}

impl PostgresSaleStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

const SALE_COLUMNS: &str = r#"id, buyer_id, producer_id, beat_id, soundpack_id,
    contract_id, amount, file_type, created_at"#;

#[async_trait]
impl SaleStore for PostgresSaleStore {
    async fn find_beat_sale(
        &self,
        buyer_id: UserId,
        beat_id: BeatId,
        file_type: FileType,
    ) -> Result<Option<Sale>, DomainError> {
        let row: Option<SaleRow> = sqlx::query_as(&format!(
            r#"
            SELECT {SALE_COLUMNS}
            FROM sales
            WHERE buyer_id = $1 AND beat_id = $2 AND file_type = $3
            "#
        ))
        .bind(buyer_id.as_i64())
        .bind(beat_id.as_i64())
        .bind(file_type.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_db_error(e, "Failed to load sale"))?;

        row.map(Sale::try_from).transpose()
    }

    async fn find_soundpack_sale(
        &self,
        buyer_id: UserId,
        soundpack_id: SoundPackId,
    ) -> Result<Option<Sale>, DomainError> {
        let row: Option<SaleRow> = sqlx::query_as(&format!(
            r#"
            SELECT {SALE_COLUMNS}
            FROM sales
            WHERE buyer_id = $1 AND soundpack_id = $2
            "#
        ))
        .bind(buyer_id.as_i64())
        .bind(soundpack_id.as_i64())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_db_error(e, "Failed to load soundpack sale"))?;

        row.map(Sale::try_from).transpose()
    }

    async fn find_contract(
        &self,
        buyer_id: UserId,
        beat_id: BeatId,
        file_type: FileType,
    ) -> Result<Option<Contract>, DomainError> {
        let row: Option<ContractRow> = sqlx::query_as(
            r#"
            SELECT id, buyer_id, beat_id, file_type, contract_type, terms, price,
                   status, contract_url, contract_template_id, created_at
            FROM contracts
            WHERE buyer_id = $1 AND beat_id = $2 AND file_type = $3
            "#,
        )
        .bind(buyer_id.as_i64())
        .bind(beat_id.as_i64())
        .bind(file_type.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_db_error(e, "Failed to load contract"))?;

        row.map(Contract::try_from).transpose()
    }

    async fn list_by_buyer(&self, buyer_id: UserId) -> Result<Vec<Sale>, DomainError> {
        let rows: Vec<SaleRow> = sqlx::query_as(&format!(
            r#"
            SELECT {SALE_COLUMNS}
            FROM sales
            WHERE buyer_id = $1
            ORDER BY created_at DESC
            "#
        ))
        .bind(buyer_id.as_i64())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| map_db_error(e, "Failed to list sales"))?;

        rows.into_iter().map(Sale::try_from).collect()
    }
}
