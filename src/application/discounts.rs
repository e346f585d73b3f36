//! Discount listing, validation, and creation.

use std::sync::Arc;

use chrono::Utc;
use serde::Serialize;

use crate::domain::catalog::ItemKind;
use crate::domain::foundation::{DomainError, ErrorCode, ValidationError};
use crate::domain::pricing::Discount;
use crate::domain::users::User;
use crate::ports::{CatalogStore, DiscountStore, NewDiscount};

/// Active discount enriched with item pricing for display.
#[derive(Debug, Clone, Serialize)]
pub struct ActiveDiscount {
    #[serde(flatten)]
    pub discount: Discount,
    pub item_title: Option<String>,
    pub item_cover: Option<String>,
    pub original_price: Option<f64>,
    pub discounted_price: Option<f64>,
}

/// Result of validating a code against an item before checkout.
#[derive(Debug, Clone, Serialize)]
pub struct DiscountValidation {
    pub code: String,
    pub name: Option<String>,
    pub percentage: f64,
    pub original_price: f64,
    pub final_price: f64,
    pub savings: f64,
}

/// Handler for discount endpoints.
pub struct DiscountService {
    discounts: Arc<dyn DiscountStore>,
    catalog: Arc<dyn CatalogStore>,
}

impl DiscountService {
    pub fn new(discounts: Arc<dyn DiscountStore>, catalog: Arc<dyn CatalogStore>) -> Self {
        Self { discounts, catalog }
    }

    /// Currently valid discounts with per-item discounted prices.
    pub async fn list_active(&self) -> Result<Vec<ActiveDiscount>, DomainError> {
        let discounts = self.discounts.list_active(Utc::now()).await?;
        let mut enriched = Vec::with_capacity(discounts.len());

        for discount in discounts {
            let mut entry = ActiveDiscount {
                item_title: None,
                item_cover: None,
                original_price: None,
                discounted_price: None,
                discount,
            };

            let scoped_item = match (entry.discount.scope, entry.discount.item_id) {
                (crate::domain::pricing::DiscountScope::Beat, Some(id)) => {
                    Some((ItemKind::Beat, id))
                }
                (crate::domain::pricing::DiscountScope::SoundPack, Some(id)) => {
                    Some((ItemKind::SoundPack, id))
                }
                _ => None,
            };

            if let Some((kind, item_id)) = scoped_item {
                if let Some(item) = self.catalog.find_purchasable(kind, item_id).await? {
                    entry.item_title = Some(item.title().to_string());
                    entry.item_cover = match &item {
                        crate::domain::catalog::Purchasable::Beat(b) => b.cover_url.clone(),
                        crate::domain::catalog::Purchasable::SoundPack(p) => p.cover_url.clone(),
                    };
                    entry.original_price = Some(item.price());
                    entry.discounted_price = Some(entry.discount.apply(item.price()));
                }
            }

            enriched.push(entry);
        }

        Ok(enriched)
    }

    /// Validates a code against a specific item, returning the savings.
    pub async fn validate(
        &self,
        code: &str,
        item_type: ItemKind,
        item_id: i64,
    ) -> Result<DiscountValidation, DomainError> {
        let discount = self
            .discounts
            .find_by_code(code)
            .await?
            .ok_or_else(|| DomainError::new(ErrorCode::DiscountInvalid, "Invalid discount code"))?;

        if !discount.is_valid_at(Utc::now()) {
            return Err(DomainError::new(
                ErrorCode::DiscountInvalid,
                "Discount code has expired",
            ));
        }

        if !discount.applies_to(item_type, item_id) {
            return Err(DomainError::new(
                ErrorCode::DiscountInvalid,
                format!("Discount not applicable to this {item_type}"),
            ));
        }

        let item = self
            .catalog
            .find_purchasable(item_type, item_id)
            .await?
            .ok_or_else(|| {
                let code = match item_type {
                    ItemKind::Beat => ErrorCode::BeatNotFound,
                    ItemKind::SoundPack => ErrorCode::SoundPackNotFound,
                };
                DomainError::new(code, "Item not found")
            })?;

        let original_price = item.price();
        let final_price = discount.apply(original_price);

        Ok(DiscountValidation {
            code: discount.code.clone(),
            name: discount.name.clone(),
            percentage: discount.percentage,
            original_price,
            final_price,
            savings: crate::domain::pricing::round2(original_price - final_price),
        })
    }

    /// Creates a discount; producer-only (enforced by the HTTP layer).
    pub async fn create(&self, actor: &User, discount: NewDiscount) -> Result<Discount, DomainError> {
        if !actor.is_producer() {
            return Err(DomainError::new(
                ErrorCode::Forbidden,
                "Only producers may create discounts",
            ));
        }
        if discount.code.trim().is_empty() {
            return Err(ValidationError::empty_field("code").into());
        }
        if !(0.0..=100.0).contains(&discount.percentage) {
            return Err(
                ValidationError::out_of_range("percentage", 0.0, 100.0, discount.percentage)
                    .into(),
            );
        }

        self.discounts.create(discount).await
    }
}
