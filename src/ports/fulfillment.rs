//! Fulfillment transaction port: the atomicity boundary of the webhook
//! pipeline.
//!
//! Everything a successful notification changes (payment status, sale row,
//! contract row, exclusive flag, discount consumption) commits as one unit
//! through [`FulfillmentStore::record_success`], or not at all.
//!
//! ## Race Condition Handling
//!
//! Two deliveries of the same notification can both pass the payment-status
//! check and race into this port. First to insert the sale wins (unique
//! constraint on `(buyer, item, file_type)`); the loser observes the
//! conflict and reports [`FulfillmentOutcome::AlreadyFulfilled`], which the
//! pipeline acknowledges as a no-op.

use async_trait::async_trait;

use crate::domain::catalog::FileType;
use crate::domain::foundation::{
    BeatId, ContractId, ContractTemplateId, DiscountId, DomainError, PaymentId, SaleId,
    SoundPackId, UserId,
};

/// Sale row to materialize.
#[derive(Debug, Clone)]
pub struct NewSale {
    pub buyer_id: UserId,
    pub producer_id: Option<UserId>,
    pub beat_id: Option<BeatId>,
    pub soundpack_id: Option<SoundPackId>,
    pub amount: f64,
    pub file_type: Option<FileType>,
}

/// Contract row to materialize and link to the sale.
///
/// The document is rendered and uploaded before the transaction opens; only
/// its retrieval URL is persisted here.
#[derive(Debug, Clone)]
pub struct NewContract {
    pub buyer_id: UserId,
    pub beat_id: BeatId,
    pub file_type: FileType,
    pub contract_type: String,
    pub terms: Option<String>,
    pub price: f64,
    pub contract_url: String,
    pub contract_template_id: Option<ContractTemplateId>,
}

/// Complete set of writes for one successful notification.
#[derive(Debug, Clone)]
pub struct FulfillmentCommand {
    pub payment_id: PaymentId,
    /// Settled amount/currency reported by the gateway.
    pub paid_amount: Option<f64>,
    pub paid_currency: Option<String>,
    pub sale: NewSale,
    pub contract: Option<NewContract>,
    /// Discount consumed by this purchase; its `used_count` increments in
    /// the same transaction.
    pub discount_id: Option<DiscountId>,
    /// Set when an exclusive tier was sold: flips `is_sold_exclusive`.
    pub mark_beat_sold_exclusive: Option<BeatId>,
}

/// Result of attempting to record a fulfillment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FulfillmentOutcome {
    /// All writes committed.
    Recorded {
        sale_id: SaleId,
        contract_id: Option<ContractId>,
    },
    /// A concurrent delivery already recorded this sale; nothing written.
    AlreadyFulfilled,
}

/// Port for the fulfillment transaction.
#[async_trait]
pub trait FulfillmentStore: Send + Sync {
    /// Applies the whole command atomically.
    ///
    /// On any failure inside the unit every change is rolled back and the
    /// error is surfaced so the gateway retries.
    async fn record_success(
        &self,
        command: FulfillmentCommand,
    ) -> Result<FulfillmentOutcome, DomainError>;

    /// Marks the payment failed. No sale or contract side effects.
    async fn record_failure(&self, payment_id: PaymentId) -> Result<(), DomainError>;
}
