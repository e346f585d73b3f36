//! Contract templates fixed at upload time.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::foundation::{BeatId, ContractTemplateId};

use super::FileType;

/// Per-tier legal terms a producer sets when uploading a beat.
///
/// When a sale of the matching `(beat, file_type)` is fulfilled, the template
/// is rendered into a concrete contract document for the buyer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContractTemplate {
    pub id: ContractTemplateId,
    pub beat_id: BeatId,
    pub file_type: FileType,
    pub contract_type: String,
    pub terms: Option<String>,
    pub price: f64,
    pub created_at: DateTime<Utc>,
}
