//! InitiateCheckout - opens a payment intent and a hosted gateway checkout.

use std::sync::Arc;

use chrono::Utc;
use serde_json::json;

use crate::domain::catalog::{FileType, ItemKind};
use crate::domain::foundation::{BeatId, DomainError, ErrorCode, PaymentId, SoundPackId};
use crate::domain::payment::TransactionReference;
use crate::domain::users::User;
use crate::ports::{InitializeTransaction, NewPayment, PaymentGateway, PaymentStore};

use super::pricing::PriceQuoter;

/// Checkout request, already parsed and authenticated.
#[derive(Debug, Clone)]
pub struct CheckoutCommand {
    pub item_type: ItemKind,
    pub item_id: i64,
    pub file_type: Option<FileType>,
    pub discount_code: Option<String>,
    pub callback_url: Option<String>,
}

/// Hosted checkout the buyer is redirected to.
#[derive(Debug, Clone)]
pub struct CheckoutIntent {
    pub payment_url: String,
    pub access_code: Option<String>,
    pub reference: String,
    pub payment_id: PaymentId,
    pub file_type: Option<FileType>,
    pub amount_usd: f64,
    pub amount_kes: f64,
    pub currency: String,
}

/// Handler for starting a purchase.
///
/// The `Payment` row is persisted in `pending` state before the gateway is
/// contacted. A gateway failure leaves that row pending with no reference;
/// the buyer simply retries checkout and nothing needs rolling back.
pub struct InitiateCheckout {
    quoter: PriceQuoter,
    payments: Arc<dyn PaymentStore>,
    gateway: Arc<dyn PaymentGateway>,
}

impl InitiateCheckout {
    pub fn new(
        quoter: PriceQuoter,
        payments: Arc<dyn PaymentStore>,
        gateway: Arc<dyn PaymentGateway>,
    ) -> Self {
        Self {
            quoter,
            payments,
            gateway,
        }
    }

    pub async fn handle(
        &self,
        buyer: &User,
        cmd: CheckoutCommand,
    ) -> Result<CheckoutIntent, DomainError> {
        if cmd.item_type == ItemKind::Beat && cmd.file_type.is_none() {
            return Err(DomainError::validation(
                "file_type",
                "file_type is required for beat purchases",
            ));
        }

        let quote = self
            .quoter
            .quote(
                cmd.item_type,
                cmd.item_id,
                cmd.file_type,
                cmd.discount_code.as_deref(),
            )
            .await?;

        let payment = self
            .payments
            .create_pending(NewPayment {
                user_id: buyer.id,
                amount: quote.final_usd,
                currency: "USD".to_string(),
                method: "paystack".to_string(),
                beat_id: (cmd.item_type == ItemKind::Beat).then(|| BeatId::new(cmd.item_id)),
                soundpack_id: (cmd.item_type == ItemKind::SoundPack)
                    .then(|| SoundPackId::new(cmd.item_id)),
                discount_id: quote.discount_id,
                file_type: cmd.file_type,
            })
            .await?;

        let reference = TransactionReference::new(
            cmd.item_type,
            cmd.file_type,
            payment.id,
            Utc::now().timestamp(),
        )
        .to_string();

        let request = InitializeTransaction {
            email: buyer.email.clone(),
            amount_minor: quote.minor_units,
            currency: self.quoter.settlement_currency().to_string(),
            reference: reference.clone(),
            callback_url: cmd.callback_url.clone(),
            metadata: json!({
                "user_id": buyer.id,
                "item_type": cmd.item_type.as_str(),
                "item_id": cmd.item_id,
                "file_type": cmd.file_type.map(|ft| ft.as_str()),
                "payment_id": payment.id,
                "price_usd": quote.final_usd,
                "price_kes": quote.final_kes,
            }),
        };

        let checkout = self.gateway.initialize_transaction(request).await.map_err(|e| {
            // The pending row stays; the buyer may retry checkout.
            tracing::error!(
                payment_id = payment.id.as_i64(),
                error = %e,
                "Gateway initialization failed, payment left pending"
            );
            DomainError::new(ErrorCode::GatewayError, "Payment initialization failed")
        })?;

        self.payments
            .set_transaction_ref(payment.id, &reference)
            .await?;

        tracing::info!(
            payment_id = payment.id.as_i64(),
            reference = %reference,
            amount_usd = quote.final_usd,
            amount_kes = quote.final_kes,
            "Purchase initiated"
        );

        Ok(CheckoutIntent {
            payment_url: checkout.authorization_url,
            access_code: checkout.access_code,
            reference,
            payment_id: payment.id,
            file_type: cmd.file_type,
            amount_usd: quote.final_usd,
            amount_kes: quote.final_kes,
            currency: self.quoter.settlement_currency().to_string(),
        })
    }
}
