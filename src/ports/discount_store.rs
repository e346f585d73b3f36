//! Discount persistence port.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::foundation::DomainError;
use crate::domain::pricing::{Discount, DiscountScope};

/// Fields for creating a discount (admin action).
#[derive(Debug, Clone)]
pub struct NewDiscount {
    pub code: String,
    pub percentage: f64,
    pub scope: DiscountScope,
    pub item_id: Option<i64>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    pub max_uses: Option<i32>,
}

/// Port for the discounts table.
///
/// Usage counting is not here: `used_count` is incremented inside the
/// fulfillment transaction so consumption commits or rolls back with the
/// sale it paid for.
#[async_trait]
pub trait DiscountStore: Send + Sync {
    async fn find_by_code(&self, code: &str) -> Result<Option<Discount>, DomainError>;

    /// Discounts valid at `now`, for public listing.
    async fn list_active(&self, now: DateTime<Utc>) -> Result<Vec<Discount>, DomainError>;

    /// Fails with `DuplicateDiscountCode` when the code already exists.
    async fn create(&self, discount: NewDiscount) -> Result<Discount, DomainError>;
}
