//! Gateway transaction reference strings.
//!
//! Format: `{ITEM}_{FILE}_{payment_id}_{unix_ts}`, e.g. `BEAT_MP3_12_1718000123`.
//! Sound packs have no tier, so their segment is the literal `PACK`.
//! The embedded payment id lets the webhook pipeline correlate a
//! notification even when the gateway strips custom metadata.

use std::fmt;

use crate::domain::catalog::{FileType, ItemKind};
use crate::domain::foundation::{PaymentId, ValidationError};

/// Segment used in place of a file type for sound pack purchases.
const PACK_SEGMENT: &str = "PACK";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionReference {
    pub item_kind: ItemKind,
    pub file_type: Option<FileType>,
    pub payment_id: PaymentId,
    pub issued_at: i64,
}

impl TransactionReference {
    pub fn new(
        item_kind: ItemKind,
        file_type: Option<FileType>,
        payment_id: PaymentId,
        issued_at: i64,
    ) -> Self {
        Self {
            item_kind,
            file_type,
            payment_id,
            issued_at,
        }
    }

    /// Parses a reference string, recovering the embedded payment id.
    pub fn parse(raw: &str) -> Result<Self, ValidationError> {
        let parts: Vec<&str> = raw.split('_').collect();
        if parts.len() != 4 {
            return Err(ValidationError::invalid_format(
                "reference",
                "expected ITEM_FILE_ID_TS",
            ));
        }

        let item_kind: ItemKind = parts[0].parse()?;
        let file_type = if parts[1].eq_ignore_ascii_case(PACK_SEGMENT) {
            None
        } else {
            Some(parts[1].parse()?)
        };
        let payment_id: PaymentId = parts[2]
            .parse()
            .map_err(|_| ValidationError::invalid_format("reference", "payment id segment"))?;
        let issued_at: i64 = parts[3]
            .parse()
            .map_err(|_| ValidationError::invalid_format("reference", "timestamp segment"))?;

        Ok(Self {
            item_kind,
            file_type,
            payment_id,
            issued_at,
        })
    }
}

impl fmt::Display for TransactionReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let file_segment = self
            .file_type
            .map(|ft| ft.as_str().to_ascii_uppercase())
            .unwrap_or_else(|| PACK_SEGMENT.to_string());
        write!(
            f,
            "{}_{}_{}_{}",
            self.item_kind.as_str().to_ascii_uppercase(),
            file_segment,
            self.payment_id,
            self.issued_at
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn beat_reference_formats_as_expected() {
        let r = TransactionReference::new(
            ItemKind::Beat,
            Some(FileType::Mp3),
            PaymentId::new(12),
            1_718_000_123,
        );
        assert_eq!(r.to_string(), "BEAT_MP3_12_1718000123");
    }

    #[test]
    fn soundpack_reference_uses_pack_segment() {
        let r = TransactionReference::new(
            ItemKind::SoundPack,
            None,
            PaymentId::new(7),
            1_718_000_123,
        );
        assert_eq!(r.to_string(), "SOUNDPACK_PACK_7_1718000123");
    }

    #[test]
    fn references_round_trip() {
        for r in [
            TransactionReference::new(
                ItemKind::Beat,
                Some(FileType::Exclusive),
                PaymentId::new(991),
                1_700_000_000,
            ),
            TransactionReference::new(ItemKind::SoundPack, None, PaymentId::new(1), 0),
        ] {
            assert_eq!(TransactionReference::parse(&r.to_string()).unwrap(), r);
        }
    }

    #[test]
    fn malformed_references_fail_to_parse() {
        assert!(TransactionReference::parse("BEAT_MP3_12").is_err());
        assert!(TransactionReference::parse("BEAT_MP3_twelve_123").is_err());
        assert!(TransactionReference::parse("ALBUM_MP3_12_123").is_err());
        assert!(TransactionReference::parse("").is_err());
    }
}
