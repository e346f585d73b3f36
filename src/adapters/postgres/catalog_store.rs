//! PostgreSQL implementation of CatalogStore.

use async_trait::async_trait;
use sqlx::PgPool;

use crate::domain::catalog::{
    Beat, BeatFile, ContractTemplate, FileType, ItemKind, Purchasable, SoundPack,
};
use crate::domain::foundation::{BeatId, DomainError, SoundPackId};
use crate::ports::CatalogStore;

use super::rows::{map_db_error, BeatFileRow, BeatRow, ContractTemplateRow, SoundPackRow};

pub struct PostgresCatalogStore {
    pool: PgPool,
}

impl PostgresCatalogStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CatalogStore for PostgresCatalogStore {
    async fn find_beat(&self, id: BeatId) -> Result<Option<Beat>, DomainError> {
        let row: Option<BeatRow> = sqlx::query_as(
            r#"
            SELECT id, title, description, genre, bpm, key, price, cover_url,
                   preview_url, exclusive_available, is_sold_exclusive,
                   producer_id, created_at
            FROM beats
            WHERE id = $1
            "#,
        )
        .bind(id.as_i64())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_db_error(e, "Failed to load beat"))?;

        Ok(row.map(Beat::from))
    }

    async fn find_beat_file(
        &self,
        beat_id: BeatId,
        file_type: FileType,
    ) -> Result<Option<BeatFile>, DomainError> {
        let row: Option<BeatFileRow> = sqlx::query_as(
            r#"
            SELECT id, beat_id, file_type, price, file_url
            FROM beat_files
            WHERE beat_id = $1 AND file_type = $2
            "#,
        )
        .bind(beat_id.as_i64())
        .bind(file_type.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_db_error(e, "Failed to load beat file"))?;

        row.map(BeatFile::try_from).transpose()
    }

    async fn find_soundpack(&self, id: SoundPackId) -> Result<Option<SoundPack>, DomainError> {
        let row: Option<SoundPackRow> = sqlx::query_as(
            r#"
            SELECT id, name, description, price, cover_url, file_url,
                   producer_id, created_at
            FROM soundpacks
            WHERE id = $1
            "#,
        )
        .bind(id.as_i64())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_db_error(e, "Failed to load soundpack"))?;

        Ok(row.map(SoundPack::from))
    }

    async fn find_purchasable(
        &self,
        kind: ItemKind,
        item_id: i64,
    ) -> Result<Option<Purchasable>, DomainError> {
        Ok(match kind {
            ItemKind::Beat => self
                .find_beat(BeatId::new(item_id))
                .await?
                .map(Purchasable::Beat),
            ItemKind::SoundPack => self
                .find_soundpack(SoundPackId::new(item_id))
                .await?
                .map(Purchasable::SoundPack),
        })
    }

    async fn find_contract_template(
        &self,
        beat_id: BeatId,
        file_type: FileType,
    ) -> Result<Option<ContractTemplate>, DomainError> {
        let row: Option<ContractTemplateRow> = sqlx::query_as(
            r#"
            SELECT id, beat_id, file_type, contract_type, terms, price, created_at
            FROM contract_templates
            WHERE beat_id = $1 AND file_type = $2
            "#,
        )
        .bind(beat_id.as_i64())
        .bind(file_type.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_db_error(e, "Failed to load contract template"))?;

        row.map(ContractTemplate::try_from).transpose()
    }
}
