//! Catalog read port: beats, tiers, sound packs, contract templates.

use async_trait::async_trait;

use crate::domain::catalog::{
    Beat, BeatFile, ContractTemplate, FileType, ItemKind, Purchasable, SoundPack,
};
use crate::domain::foundation::{BeatId, DomainError, SoundPackId};

/// Port for catalog lookups.
///
/// Reads are not transactionally isolated from concurrent admin writes;
/// pricing tolerates a price read a moment before an edit.
#[async_trait]
pub trait CatalogStore: Send + Sync {
    async fn find_beat(&self, id: BeatId) -> Result<Option<Beat>, DomainError>;

    /// The purchasable tier row for `(beat, file_type)`, if the producer
    /// uploaded one.
    async fn find_beat_file(
        &self,
        beat_id: BeatId,
        file_type: FileType,
    ) -> Result<Option<BeatFile>, DomainError>;

    async fn find_soundpack(&self, id: SoundPackId) -> Result<Option<SoundPack>, DomainError>;

    /// Kind-dispatched lookup used by discount validation and wishlists.
    async fn find_purchasable(
        &self,
        kind: ItemKind,
        item_id: i64,
    ) -> Result<Option<Purchasable>, DomainError>;

    async fn find_contract_template(
        &self,
        beat_id: BeatId,
        file_type: FileType,
    ) -> Result<Option<ContractTemplate>, DomainError>;
}
