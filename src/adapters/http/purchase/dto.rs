//! Request/response bodies for purchase endpoints.

use serde::{Deserialize, Serialize};

use crate::application::checkout::CheckoutIntent;
use crate::application::history::PurchaseRecord;

#[derive(Debug, Deserialize)]
pub struct CheckoutRequest {
    pub item_type: String,
    pub item_id: i64,
    #[serde(default)]
    pub file_type: Option<String>,
    #[serde(default)]
    pub discount_code: Option<String>,
    #[serde(default)]
    pub callback_url: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct CheckoutResponse {
    pub payment_url: String,
    pub access_code: Option<String>,
    pub reference: String,
    pub payment_id: i64,
    pub file_type: Option<String>,
    pub amount_usd: f64,
    pub amount_kes: f64,
    pub currency: String,
}

impl From<CheckoutIntent> for CheckoutResponse {
    fn from(intent: CheckoutIntent) -> Self {
        CheckoutResponse {
            payment_url: intent.payment_url,
            access_code: intent.access_code,
            reference: intent.reference,
            payment_id: intent.payment_id.as_i64(),
            file_type: intent.file_type.map(|ft| ft.as_str().to_string()),
            amount_usd: intent.amount_usd,
            amount_kes: intent.amount_kes,
            currency: intent.currency,
        }
    }
}

/// Success-shaped acknowledgment the gateway expects.
#[derive(Debug, Serialize)]
pub struct WebhookAckResponse {
    pub ok: bool,
}

#[derive(Debug, Serialize)]
pub struct HistoryResponse {
    pub purchases: Vec<PurchaseRecord>,
}
