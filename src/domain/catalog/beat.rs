//! Beats and their purchasable file tiers.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::foundation::{BeatFileId, BeatId, UserId, ValidationError};

/// Licensed file variant of a beat, each independently priced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileType {
    Mp3,
    Wav,
    Trackout,
    /// One-time full ownership transfer; blocks all future exclusive sales.
    Exclusive,
}

impl FileType {
    pub fn as_str(&self) -> &'static str {
        match self {
            FileType::Mp3 => "mp3",
            FileType::Wav => "wav",
            FileType::Trackout => "trackout",
            FileType::Exclusive => "exclusive",
        }
    }

    pub fn is_exclusive(&self) -> bool {
        matches!(self, FileType::Exclusive)
    }
}

impl fmt::Display for FileType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for FileType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "mp3" => Ok(FileType::Mp3),
            "wav" => Ok(FileType::Wav),
            "trackout" => Ok(FileType::Trackout),
            "exclusive" => Ok(FileType::Exclusive),
            other => Err(ValidationError::invalid_format(
                "file_type",
                format!("unknown file type '{}'", other),
            )),
        }
    }
}

/// Sellable beat owned by a producer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Beat {
    pub id: BeatId,
    pub title: String,
    pub description: Option<String>,
    pub genre: Option<String>,
    pub bpm: Option<i32>,
    pub key: Option<String>,
    /// Display price; actual charge comes from the matching file tier.
    pub price: f64,
    pub cover_url: Option<String>,
    pub preview_url: Option<String>,
    pub exclusive_available: bool,
    /// Once true, the exclusive tier can never be purchased again.
    pub is_sold_exclusive: bool,
    pub producer_id: UserId,
    pub created_at: DateTime<Utc>,
}

/// Purchasable file tier of a beat: `(beat_id, file_type)` is unique.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BeatFile {
    pub id: BeatFileId,
    pub beat_id: BeatId,
    pub file_type: FileType,
    pub price: f64,
    pub file_url: String,
}
