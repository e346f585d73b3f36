//! Payment persistence port.

use async_trait::async_trait;

use crate::domain::catalog::FileType;
use crate::domain::foundation::{BeatId, DiscountId, DomainError, PaymentId, SoundPackId, UserId};
use crate::domain::payment::Payment;

/// Fields for opening a checkout attempt.
///
/// Exactly one of `beat_id` / `soundpack_id` is set.
#[derive(Debug, Clone)]
pub struct NewPayment {
    pub user_id: UserId,
    pub amount: f64,
    pub currency: String,
    pub method: String,
    pub beat_id: Option<BeatId>,
    pub soundpack_id: Option<SoundPackId>,
    pub discount_id: Option<DiscountId>,
    pub file_type: Option<FileType>,
}

/// Port for the payments table.
#[async_trait]
pub trait PaymentStore: Send + Sync {
    /// Inserts a `pending` row. Called before the gateway is contacted so a
    /// record exists even if initialization fails.
    async fn create_pending(&self, payment: NewPayment) -> Result<Payment, DomainError>;

    /// Attaches the gateway reference after successful initialization.
    async fn set_transaction_ref(
        &self,
        id: PaymentId,
        reference: &str,
    ) -> Result<(), DomainError>;

    async fn find_by_id(&self, id: PaymentId) -> Result<Option<Payment>, DomainError>;

    async fn find_by_reference(&self, reference: &str) -> Result<Option<Payment>, DomainError>;
}
