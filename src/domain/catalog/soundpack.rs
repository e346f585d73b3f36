//! Sound packs: single-file sellable items, no tiers.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::foundation::{SoundPackId, UserId};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SoundPack {
    pub id: SoundPackId,
    pub name: String,
    pub description: Option<String>,
    pub price: f64,
    pub cover_url: Option<String>,
    pub file_url: Option<String>,
    pub producer_id: UserId,
    pub created_at: DateTime<Utc>,
}
