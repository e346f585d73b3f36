//! Fulfillment records: sales and generated contracts.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::catalog::FileType;
use crate::domain::foundation::{
    BeatId, ContractId, ContractTemplateId, SaleId, SoundPackId, UserId,
};

/// Immutable record of one fulfilled purchase.
///
/// Created exactly once per successful payment per `(buyer, item, file_type)`;
/// the storage layer's uniqueness constraint is the guarantee, not the
/// in-pipeline existence check.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sale {
    pub id: SaleId,
    pub buyer_id: UserId,
    pub producer_id: Option<UserId>,
    pub beat_id: Option<BeatId>,
    pub soundpack_id: Option<SoundPackId>,
    pub contract_id: Option<ContractId>,
    /// USD amount of the underlying payment.
    pub amount: f64,
    pub file_type: Option<FileType>,
    pub created_at: DateTime<Utc>,
}

/// Generated document granting a buyer rights over `(beat, file_type)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Contract {
    pub id: ContractId,
    pub buyer_id: UserId,
    pub beat_id: BeatId,
    pub file_type: FileType,
    pub contract_type: String,
    pub terms: Option<String>,
    pub price: f64,
    pub status: String,
    pub contract_url: Option<String>,
    pub contract_template_id: Option<ContractTemplateId>,
    pub created_at: DateTime<Utc>,
}
