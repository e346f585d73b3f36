//! Payment entity and its state machine.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::catalog::{FileType, ItemKind};
use crate::domain::foundation::{
    BeatId, DiscountId, DomainError, ErrorCode, PaymentId, SoundPackId, UserId,
};

/// Lifecycle of a checkout attempt: `pending -> success | failed`.
///
/// Both `success` and `failed` are terminal; no transition leaves them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    Pending,
    Success,
    Failed,
}

impl PaymentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentStatus::Pending => "pending",
            PaymentStatus::Success => "success",
            PaymentStatus::Failed => "failed",
        }
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, PaymentStatus::Pending)
    }
}

/// One checkout attempt against the payment gateway.
///
/// The row is written in `pending` state before the gateway is contacted, so
/// a reference exists even when the gateway call fails. The webhook pipeline
/// is the only writer after that point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Payment {
    pub id: PaymentId,
    pub user_id: UserId,
    /// Quoted amount in USD (display currency).
    pub amount: f64,
    pub currency: String,
    pub method: String,
    pub status: PaymentStatus,
    /// Gateway reference; set once initialization succeeds, unique.
    pub transaction_ref: Option<String>,
    /// Amount actually settled by the gateway, recorded at fulfillment.
    pub paid_amount: Option<f64>,
    pub paid_currency: Option<String>,
    pub beat_id: Option<BeatId>,
    pub soundpack_id: Option<SoundPackId>,
    pub discount_id: Option<DiscountId>,
    pub file_type: Option<FileType>,
    pub created_at: DateTime<Utc>,
}

impl Payment {
    /// The purchased item, as `(kind, raw id)`. Exactly one of the two
    /// foreign keys is set by construction.
    pub fn item(&self) -> Option<(ItemKind, i64)> {
        match (self.beat_id, self.soundpack_id) {
            (Some(beat), _) => Some((ItemKind::Beat, beat.as_i64())),
            (None, Some(pack)) => Some((ItemKind::SoundPack, pack.as_i64())),
            (None, None) => None,
        }
    }

    /// Marks the payment settled. Fails once the payment is terminal: the
    /// success state is the idempotence boundary for webhook redelivery.
    pub fn mark_success(
        &mut self,
        paid_amount: f64,
        paid_currency: impl Into<String>,
    ) -> Result<(), DomainError> {
        self.ensure_pending()?;
        self.status = PaymentStatus::Success;
        self.paid_amount = Some(paid_amount);
        self.paid_currency = Some(paid_currency.into());
        Ok(())
    }

    /// Marks the payment failed. Also terminal.
    pub fn mark_failed(&mut self) -> Result<(), DomainError> {
        self.ensure_pending()?;
        self.status = PaymentStatus::Failed;
        Ok(())
    }

    fn ensure_pending(&self) -> Result<(), DomainError> {
        if self.status.is_terminal() {
            return Err(DomainError::new(
                ErrorCode::InvalidStateTransition,
                format!("Payment {} is already {}", self.id, self.status.as_str()),
            ));
        }
        Ok(())
    }
}
