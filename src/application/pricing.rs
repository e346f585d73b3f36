//! Price resolution: base tier price, discount, currency conversion.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use once_cell::sync::Lazy;

use crate::domain::catalog::{FileType, ItemKind};
use crate::domain::foundation::{BeatId, DomainError, ErrorCode, SoundPackId};
use crate::domain::pricing::{round2, to_minor_units, Discount, PricingError, Quote};
use crate::ports::{CatalogStore, CurrencyConverter, DiscountStore};

/// Fixed conversion rates used when the live rate service is unavailable.
/// Checkout degrades in precision rather than failing.
static FALLBACK_RATES: Lazy<HashMap<(&'static str, &'static str), f64>> = Lazy::new(|| {
    let mut rates = HashMap::new();
    rates.insert(("USD", "KES"), 130.0);
    rates
});

impl From<PricingError> for DomainError {
    fn from(err: PricingError) -> Self {
        let code = match err {
            PricingError::BeatNotFound(_) => ErrorCode::BeatNotFound,
            PricingError::SoundPackNotFound(_) => ErrorCode::SoundPackNotFound,
            PricingError::FileTierUnavailable(_) => ErrorCode::FileTierUnavailable,
            PricingError::ExclusiveAlreadySold => ErrorCode::ExclusiveAlreadySold,
            PricingError::DiscountInvalid(_) => ErrorCode::DiscountInvalid,
        };
        DomainError::new(code, err.to_string())
    }
}

/// Resolves the final charge for one `(item, file tier, discount)` request.
#[derive(Clone)]
pub struct PriceQuoter {
    catalog: Arc<dyn CatalogStore>,
    discounts: Arc<dyn DiscountStore>,
    converter: Arc<dyn CurrencyConverter>,
    settlement_currency: String,
}

impl PriceQuoter {
    pub fn new(
        catalog: Arc<dyn CatalogStore>,
        discounts: Arc<dyn DiscountStore>,
        converter: Arc<dyn CurrencyConverter>,
        settlement_currency: impl Into<String>,
    ) -> Self {
        Self {
            catalog,
            discounts,
            converter,
            settlement_currency: settlement_currency.into(),
        }
    }

    pub fn settlement_currency(&self) -> &str {
        &self.settlement_currency
    }

    /// Resolves a quote per the checkout pricing rules.
    ///
    /// # Errors
    ///
    /// - `BeatNotFound` / `SoundPackNotFound` - no such item
    /// - `FileTierUnavailable` - beat has no such tier
    /// - `ExclusiveAlreadySold` - exclusive tier requested after the
    ///   one-time sale
    /// - `DiscountInvalid` - a code was supplied but does not apply; a
    ///   non-existent code is a hard failure, never silently ignored
    pub async fn quote(
        &self,
        kind: ItemKind,
        item_id: i64,
        file_type: Option<FileType>,
        discount_code: Option<&str>,
    ) -> Result<Quote, DomainError> {
        let base_usd = self.resolve_base_price(kind, item_id, file_type).await?;

        let discount = match discount_code {
            Some(code) => Some(self.resolve_discount(code, kind, item_id).await?),
            None => None,
        };

        let final_usd = match &discount {
            Some(d) => d.apply(base_usd),
            None => round2(base_usd),
        };

        let final_kes = self.convert_to_settlement(final_usd).await;

        Ok(Quote {
            base_usd,
            final_usd,
            final_kes,
            minor_units: to_minor_units(final_kes),
            discount_id: discount.map(|d| d.id),
        })
    }

    async fn resolve_base_price(
        &self,
        kind: ItemKind,
        item_id: i64,
        file_type: Option<FileType>,
    ) -> Result<f64, DomainError> {
        match kind {
            ItemKind::Beat => {
                let beat_id = BeatId::new(item_id);
                let beat = self
                    .catalog
                    .find_beat(beat_id)
                    .await?
                    .ok_or(PricingError::BeatNotFound(item_id))?;

                let file_type = file_type.ok_or_else(|| {
                    DomainError::validation("file_type", "file_type is required for beats")
                })?;

                let tier = self
                    .catalog
                    .find_beat_file(beat_id, file_type)
                    .await?
                    .ok_or(PricingError::FileTierUnavailable(file_type))?;

                if file_type.is_exclusive() && beat.is_sold_exclusive {
                    return Err(PricingError::ExclusiveAlreadySold.into());
                }

                Ok(tier.price)
            }
            ItemKind::SoundPack => {
                let pack = self
                    .catalog
                    .find_soundpack(SoundPackId::new(item_id))
                    .await?
                    .ok_or(PricingError::SoundPackNotFound(item_id))?;
                Ok(pack.price)
            }
        }
    }

    async fn resolve_discount(
        &self,
        code: &str,
        kind: ItemKind,
        item_id: i64,
    ) -> Result<Discount, DomainError> {
        let discount = self
            .discounts
            .find_by_code(code)
            .await?
            .ok_or_else(|| PricingError::DiscountInvalid("unknown code".to_string()))?;

        if !discount.is_valid_at(Utc::now()) {
            return Err(
                PricingError::DiscountInvalid("expired, inactive, or exhausted".to_string())
                    .into(),
            );
        }

        if !discount.applies_to(kind, item_id) {
            return Err(
                PricingError::DiscountInvalid("not applicable to this item".to_string()).into(),
            );
        }

        Ok(discount)
    }

    /// Converts to the settlement currency, degrading to the fixed fallback
    /// rate when the rate service is down. Never fails.
    async fn convert_to_settlement(&self, amount_usd: f64) -> f64 {
        match self
            .converter
            .convert(amount_usd, "USD", &self.settlement_currency)
            .await
        {
            Ok(converted) => round2(converted),
            Err(err) => {
                let fallback = FALLBACK_RATES
                    .get(&("USD", self.settlement_currency.as_str()))
                    .copied()
                    .unwrap_or(130.0);
                tracing::warn!(
                    error = %err,
                    fallback_rate = fallback,
                    "Rate service unavailable, using fallback rate"
                );
                round2(amount_usd * fallback)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::test_support::{
        beat_fixture, pack_fixture, InMemoryCatalog, InMemoryDiscounts, StubConverter,
    };
    use crate::domain::pricing::DiscountScope;

    fn quoter(
        catalog: InMemoryCatalog,
        discounts: InMemoryDiscounts,
        converter: StubConverter,
    ) -> PriceQuoter {
        PriceQuoter::new(
            Arc::new(catalog),
            Arc::new(discounts),
            Arc::new(converter),
            "KES",
        )
    }

    #[tokio::test]
    async fn undiscounted_beat_tier_quotes_base_price_at_live_rate() {
        let catalog = InMemoryCatalog::new().with_beat(beat_fixture(3, 1, false), vec![
            (FileType::Mp3, 50.0),
        ]);
        let q = quoter(catalog, InMemoryDiscounts::new(), StubConverter::rate(130.0));

        let quote = q
            .quote(ItemKind::Beat, 3, Some(FileType::Mp3), None)
            .await
            .unwrap();

        assert_eq!(quote.base_usd, 50.0);
        assert_eq!(quote.final_usd, 50.0);
        assert_eq!(quote.final_kes, 6500.0);
        assert_eq!(quote.minor_units, 650_000);
        assert!(quote.discount_id.is_none());
    }

    #[tokio::test]
    async fn save20_scenario_produces_expected_minor_units() {
        // $50 base, SAVE20 at 20%, 130 KES/USD -> 40 USD -> 5200 KES -> 520000.
        let catalog = InMemoryCatalog::new().with_beat(beat_fixture(3, 1, false), vec![
            (FileType::Mp3, 50.0),
        ]);
        let discounts =
            InMemoryDiscounts::new().with_code("SAVE20", 20.0, DiscountScope::Global, None);
        let q = quoter(catalog, discounts, StubConverter::rate(130.0));

        let quote = q
            .quote(ItemKind::Beat, 3, Some(FileType::Mp3), Some("SAVE20"))
            .await
            .unwrap();

        assert_eq!(quote.final_usd, 40.0);
        assert_eq!(quote.final_kes, 5200.0);
        assert_eq!(quote.minor_units, 520_000);
        assert!(quote.discount_id.is_some());
    }

    #[tokio::test]
    async fn missing_beat_is_not_found() {
        let q = quoter(
            InMemoryCatalog::new(),
            InMemoryDiscounts::new(),
            StubConverter::rate(130.0),
        );
        let err = q
            .quote(ItemKind::Beat, 99, Some(FileType::Mp3), None)
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::BeatNotFound);
    }

    #[tokio::test]
    async fn missing_tier_is_unavailable() {
        let catalog = InMemoryCatalog::new().with_beat(beat_fixture(3, 1, false), vec![
            (FileType::Mp3, 50.0),
        ]);
        let q = quoter(catalog, InMemoryDiscounts::new(), StubConverter::rate(130.0));

        let err = q
            .quote(ItemKind::Beat, 3, Some(FileType::Wav), None)
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::FileTierUnavailable);
    }

    #[tokio::test]
    async fn sold_exclusive_tier_is_rejected_before_any_payment() {
        let catalog = InMemoryCatalog::new().with_beat(beat_fixture(3, 1, true), vec![
            (FileType::Exclusive, 500.0),
        ]);
        let q = quoter(catalog, InMemoryDiscounts::new(), StubConverter::rate(130.0));

        let err = q
            .quote(ItemKind::Beat, 3, Some(FileType::Exclusive), None)
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::ExclusiveAlreadySold);
    }

    #[tokio::test]
    async fn unknown_discount_code_is_a_hard_failure() {
        let catalog = InMemoryCatalog::new().with_beat(beat_fixture(3, 1, false), vec![
            (FileType::Mp3, 50.0),
        ]);
        let q = quoter(catalog, InMemoryDiscounts::new(), StubConverter::rate(130.0));

        let err = q
            .quote(ItemKind::Beat, 3, Some(FileType::Mp3), Some("NOPE"))
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::DiscountInvalid);
    }

    #[tokio::test]
    async fn wrong_scope_discount_is_rejected() {
        let catalog = InMemoryCatalog::new()
            .with_beat(beat_fixture(3, 1, false), vec![(FileType::Mp3, 50.0)])
            .with_pack(pack_fixture(9, 2, 25.0));
        let discounts =
            InMemoryDiscounts::new().with_code("BEATONLY", 10.0, DiscountScope::Beat, Some(3));
        let q = quoter(catalog, discounts, StubConverter::rate(130.0));

        let err = q
            .quote(ItemKind::SoundPack, 9, None, Some("BEATONLY"))
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::DiscountInvalid);
    }

    #[tokio::test]
    async fn rate_service_outage_degrades_to_fallback_rate() {
        let catalog = InMemoryCatalog::new().with_pack(pack_fixture(9, 2, 10.0));
        let q = quoter(catalog, InMemoryDiscounts::new(), StubConverter::failing());

        let quote = q.quote(ItemKind::SoundPack, 9, None, None).await.unwrap();

        assert_eq!(quote.final_kes, 1300.0);
        assert_eq!(quote.minor_units, 130_000);
    }

    #[tokio::test]
    async fn soundpack_quotes_its_item_price() {
        let catalog = InMemoryCatalog::new().with_pack(pack_fixture(9, 2, 25.0));
        let q = quoter(catalog, InMemoryDiscounts::new(), StubConverter::rate(130.0));

        let quote = q.quote(ItemKind::SoundPack, 9, None, None).await.unwrap();
        assert_eq!(quote.base_usd, 25.0);
        assert_eq!(quote.final_kes, 3250.0);
    }
}
