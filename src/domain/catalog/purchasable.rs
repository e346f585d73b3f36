//! Uniform view over the two sellable item kinds.
//!
//! Pricing, discount scoping, wishlists, and access control all need the
//! same three facts about an item: which kind it is, what it costs, and who
//! produced it. [`Purchasable`] gives them one surface instead of matching
//! on Beat/SoundPack at every call site.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::foundation::{UserId, ValidationError};

use super::{Beat, SoundPack};

/// Kind tag for a sellable item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemKind {
    Beat,
    SoundPack,
}

impl ItemKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ItemKind::Beat => "beat",
            ItemKind::SoundPack => "soundpack",
        }
    }
}

impl fmt::Display for ItemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ItemKind {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "beat" => Ok(ItemKind::Beat),
            "soundpack" => Ok(ItemKind::SoundPack),
            other => Err(ValidationError::invalid_format(
                "item_type",
                format!("unknown item type '{}'", other),
            )),
        }
    }
}

/// A sellable catalog item, tagged by kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Purchasable {
    Beat(Beat),
    SoundPack(SoundPack),
}

impl Purchasable {
    pub fn kind(&self) -> ItemKind {
        match self {
            Purchasable::Beat(_) => ItemKind::Beat,
            Purchasable::SoundPack(_) => ItemKind::SoundPack,
        }
    }

    /// Raw id of the underlying item.
    pub fn item_id(&self) -> i64 {
        match self {
            Purchasable::Beat(b) => b.id.as_i64(),
            Purchasable::SoundPack(p) => p.id.as_i64(),
        }
    }

    /// Base display price in USD.
    pub fn price(&self) -> f64 {
        match self {
            Purchasable::Beat(b) => b.price,
            Purchasable::SoundPack(p) => p.price,
        }
    }

    pub fn producer_id(&self) -> UserId {
        match self {
            Purchasable::Beat(b) => b.producer_id,
            Purchasable::SoundPack(p) => p.producer_id,
        }
    }

    pub fn title(&self) -> &str {
        match self {
            Purchasable::Beat(b) => &b.title,
            Purchasable::SoundPack(p) => &p.name,
        }
    }

    pub fn as_beat(&self) -> Option<&Beat> {
        match self {
            Purchasable::Beat(b) => Some(b),
            Purchasable::SoundPack(_) => None,
        }
    }
}
