//! Sale/contract read port, used by access control and purchase history.

use async_trait::async_trait;

use crate::domain::catalog::FileType;
use crate::domain::foundation::{BeatId, DomainError, SoundPackId, UserId};
use crate::domain::payment::{Contract, Sale};

/// Port for querying fulfilled sales and their contracts.
#[async_trait]
pub trait SaleStore: Send + Sync {
    /// Exact-match sale lookup for beat file access.
    async fn find_beat_sale(
        &self,
        buyer_id: UserId,
        beat_id: BeatId,
        file_type: FileType,
    ) -> Result<Option<Sale>, DomainError>;

    async fn find_soundpack_sale(
        &self,
        buyer_id: UserId,
        soundpack_id: SoundPackId,
    ) -> Result<Option<Sale>, DomainError>;

    async fn find_contract(
        &self,
        buyer_id: UserId,
        beat_id: BeatId,
        file_type: FileType,
    ) -> Result<Option<Contract>, DomainError>;

    /// Buyer's sales, newest first.
    async fn list_by_buyer(&self, buyer_id: UserId) -> Result<Vec<Sale>, DomainError>;
}
