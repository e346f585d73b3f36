//! Gateway webhook notifications: parsing and signature verification.
//!
//! The gateway signs the raw request body with HMAC-SHA512 keyed by the
//! shared secret and sends the hex digest in a signature header. There is no
//! timestamp component in the scheme; replay of an already-fulfilled
//! notification is harmless because the payment-status dedupe guard runs
//! before any write.

use hmac::{Hmac, Mac};
use serde::{Deserialize, Deserializer, Serialize};
use sha2::Sha512;
use subtle::ConstantTimeEq;

use super::errors::WebhookError;

type HmacSha512 = Hmac<Sha512>;

/// Statuses the gateway reports for a settled transaction.
const SUCCESS_STATUSES: [&str; 2] = ["success", "successful"];

/// Inbound notification body: `{event, data: {...}}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayNotification {
    #[serde(default)]
    pub event: Option<String>,
    #[serde(default)]
    pub data: NotificationData,
}

/// Transaction payload of a notification.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NotificationData {
    #[serde(default)]
    pub reference: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    /// Settled amount in minor units.
    #[serde(default)]
    pub amount: Option<i64>,
    #[serde(default)]
    pub currency: Option<String>,
    #[serde(default)]
    pub metadata: Option<NotificationMetadata>,
}

/// Checkout metadata echoed back by the gateway.
///
/// Gateways are loose about numeric types here: ids arrive as numbers or as
/// strings depending on how the metadata was posted, so the id fields accept
/// both.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NotificationMetadata {
    #[serde(default, deserialize_with = "lenient_i64")]
    pub payment_id: Option<i64>,
    #[serde(default, deserialize_with = "lenient_i64")]
    pub user_id: Option<i64>,
    #[serde(default)]
    pub item_type: Option<String>,
    #[serde(default, deserialize_with = "lenient_i64")]
    pub item_id: Option<i64>,
    #[serde(default)]
    pub file_type: Option<String>,
    #[serde(default)]
    pub price_usd: Option<f64>,
    #[serde(default)]
    pub price_kes: Option<f64>,
}

impl NotificationData {
    /// Whether the gateway reports the transaction as settled.
    pub fn is_success(&self) -> bool {
        self.status
            .as_deref()
            .map(|s| SUCCESS_STATUSES.contains(&s.to_ascii_lowercase().as_str()))
            .unwrap_or(false)
    }

    /// Settled amount converted to major units, if present.
    pub fn settled_amount(&self) -> Option<f64> {
        self.amount.map(|minor| minor as f64 / 100.0)
    }
}

fn lenient_i64<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum NumberOrString {
        Number(i64),
        String(String),
    }

    let value: Option<NumberOrString> = Option::deserialize(deserializer)?;
    Ok(match value {
        Some(NumberOrString::Number(n)) => Some(n),
        Some(NumberOrString::String(s)) => s.trim().parse().ok(),
        None => None,
    })
}

/// Verifies gateway webhook signatures.
pub struct WebhookVerifier {
    secret: String,
}

impl WebhookVerifier {
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
        }
    }

    /// Verifies the signature over the raw body and parses the notification.
    ///
    /// # Errors
    ///
    /// - `InvalidSignature` - digest mismatch or undecodable header
    /// - `ParseError` - body is not a well-formed notification
    pub fn verify_and_parse(
        &self,
        payload: &[u8],
        signature_header: &str,
    ) -> Result<GatewayNotification, WebhookError> {
        self.verify(payload, signature_header)?;

        serde_json::from_slice(payload).map_err(|e| WebhookError::ParseError(e.to_string()))
    }

    /// Verifies the signature only.
    pub fn verify(&self, payload: &[u8], signature_header: &str) -> Result<(), WebhookError> {
        let provided =
            hex::decode(signature_header.trim()).map_err(|_| WebhookError::InvalidSignature)?;

        let mut mac = HmacSha512::new_from_slice(self.secret.as_bytes())
            .expect("HMAC accepts any key length");
        mac.update(payload);
        let expected = mac.finalize().into_bytes();

        if !constant_time_compare(expected.as_slice(), &provided) {
            return Err(WebhookError::InvalidSignature);
        }
        Ok(())
    }
}

/// Constant-time byte comparison; prevents timing attacks on the digest.
fn constant_time_compare(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.ct_eq(b).into()
}

/// Computes the hex signature for test fixtures.
#[cfg(test)]
pub fn compute_test_signature(secret: &str, payload: &[u8]) -> String {
    let mut mac =
        HmacSha512::new_from_slice(secret.as_bytes()).expect("HMAC accepts any key length");
    mac.update(payload);
    hex::encode(mac.finalize().into_bytes())
}
