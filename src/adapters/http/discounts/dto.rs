//! Request/response bodies for discount endpoints.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::application::discounts::{ActiveDiscount, DiscountValidation};
use crate::domain::pricing::Discount;

#[derive(Debug, Deserialize)]
pub struct ValidateDiscountRequest {
    pub code: String,
    pub item_type: String,
    pub item_id: i64,
}

#[derive(Debug, Serialize)]
pub struct ValidateDiscountResponse {
    pub valid: bool,
    pub discount: DiscountValidation,
}

#[derive(Debug, Deserialize)]
pub struct CreateDiscountRequest {
    pub code: String,
    pub percentage: f64,
    #[serde(default = "default_scope")]
    pub applicable_to: String,
    #[serde(default)]
    pub item_id: Option<i64>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub start_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub end_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub max_uses: Option<i32>,
}

fn default_scope() -> String {
    "global".to_string()
}

#[derive(Debug, Serialize)]
pub struct DiscountResponse {
    pub discount: Discount,
}

#[derive(Debug, Serialize)]
pub struct ActiveDiscountsResponse {
    pub discounts: Vec<ActiveDiscount>,
}
