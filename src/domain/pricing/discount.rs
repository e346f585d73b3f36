//! Percentage-off discount codes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::catalog::ItemKind;
use crate::domain::foundation::DiscountId;

use super::quote::round2;

/// Scope a discount applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiscountScope {
    /// Applies to any item.
    Global,
    /// Applies to a single beat (`item_id` required).
    Beat,
    /// Applies to a single sound pack (`item_id` required).
    SoundPack,
}

impl DiscountScope {
    pub fn as_str(&self) -> &'static str {
        match self {
            DiscountScope::Global => "global",
            DiscountScope::Beat => "beat",
            DiscountScope::SoundPack => "soundpack",
        }
    }
}

/// Percentage-off code, optionally time-windowed and usage-capped.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Discount {
    pub id: DiscountId,
    pub code: String,
    pub percentage: f64,
    pub scope: DiscountScope,
    pub item_id: Option<i64>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    pub max_uses: Option<i32>,
    pub used_count: i32,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl Discount {
    /// Validity is a pure function of the clock and usage count; callers pass
    /// `now` so the predicate stays testable and side-effect free.
    pub fn is_valid_at(&self, now: DateTime<Utc>) -> bool {
        if !self.is_active {
            return false;
        }
        if let Some(start) = self.start_date {
            if now < start {
                return false;
            }
        }
        if let Some(end) = self.end_date {
            if now > end {
                return false;
            }
        }
        if let Some(max) = self.max_uses {
            if self.used_count >= max {
                return false;
            }
        }
        true
    }

    /// Whether this code covers the given item.
    pub fn applies_to(&self, kind: ItemKind, item_id: i64) -> bool {
        match self.scope {
            DiscountScope::Global => true,
            DiscountScope::Beat => kind == ItemKind::Beat && self.item_id == Some(item_id),
            DiscountScope::SoundPack => {
                kind == ItemKind::SoundPack && self.item_id == Some(item_id)
            }
        }
    }

    /// Discounted price, rounded to cents. Only one discount per purchase;
    /// reapplying is not supported.
    pub fn apply(&self, price: f64) -> f64 {
        round2(price * (1.0 - self.percentage / 100.0))
    }
}
