//! PurchaseHistory - buyer's fulfilled purchases, enriched for display.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::domain::catalog::{FileType, ItemKind};
use crate::domain::foundation::DomainError;
use crate::domain::users::User;
use crate::ports::{CatalogStore, SaleStore, UserStore};

/// One row of purchase history.
#[derive(Debug, Clone, Serialize)]
pub struct PurchaseRecord {
    pub id: i64,
    pub item_type: ItemKind,
    pub item_id: i64,
    pub amount: f64,
    pub file_type: Option<FileType>,
    pub purchased_at: DateTime<Utc>,
    pub download_url: String,
    pub item_title: Option<String>,
    pub item_cover: Option<String>,
    pub producer_name: Option<String>,
}

/// Query handler for `GET /purchase/history`.
pub struct PurchaseHistory {
    sales: Arc<dyn SaleStore>,
    catalog: Arc<dyn CatalogStore>,
    users: Arc<dyn UserStore>,
}

impl PurchaseHistory {
    pub fn new(
        sales: Arc<dyn SaleStore>,
        catalog: Arc<dyn CatalogStore>,
        users: Arc<dyn UserStore>,
    ) -> Self {
        Self {
            sales,
            catalog,
            users,
        }
    }

    pub async fn handle(&self, buyer: &User) -> Result<Vec<PurchaseRecord>, DomainError> {
        let sales = self.sales.list_by_buyer(buyer.id).await?;
        let mut records = Vec::with_capacity(sales.len());

        for sale in sales {
            let (item_type, item_id) = match (sale.beat_id, sale.soundpack_id) {
                (Some(beat), _) => (ItemKind::Beat, beat.as_i64()),
                (None, Some(pack)) => (ItemKind::SoundPack, pack.as_i64()),
                (None, None) => continue,
            };

            let download_url = match (item_type, sale.file_type) {
                (ItemKind::Beat, Some(ft)) => format!("/api/beats/{item_id}/files/{ft}"),
                (ItemKind::Beat, None) => format!("/api/beats/{item_id}"),
                (ItemKind::SoundPack, _) => format!("/api/soundpacks/{item_id}/download"),
            };

            let mut record = PurchaseRecord {
                id: sale.id.as_i64(),
                item_type,
                item_id,
                amount: sale.amount,
                file_type: sale.file_type,
                purchased_at: sale.created_at,
                download_url,
                item_title: None,
                item_cover: None,
                producer_name: None,
            };

            if let Some(item) = self.catalog.find_purchasable(item_type, item_id).await? {
                record.item_title = Some(item.title().to_string());
                record.item_cover = match &item {
                    crate::domain::catalog::Purchasable::Beat(b) => b.cover_url.clone(),
                    crate::domain::catalog::Purchasable::SoundPack(p) => p.cover_url.clone(),
                };
                record.producer_name = self
                    .users
                    .find_by_id(item.producer_id())
                    .await?
                    .map(|u| u.name);
            }

            records.push(record);
        }

        Ok(records)
    }
}
