//! FulfillPayment - the webhook fulfillment pipeline.
//!
//! Turns an authenticated gateway notification into durable records:
//! exactly one payment status transition, one sale, and (for beats with a
//! contract template) one generated contract.
//!
//! ## Ordering
//!
//! 1. Verify the HMAC signature over the raw body; mismatch touches nothing.
//! 2. Resolve the target payment (metadata id, then stored reference, then
//!    the id embedded in the reference string).
//! 3. Dedupe: a terminal payment is acknowledged without any write. This
//!    runs before every write because the gateway redelivers notifications.
//! 4. Success: render/store the contract document, then commit status
//!    update + sale + contract + exclusive flag + discount consumption as
//!    one transaction. Anything else: mark the payment failed.
//!
//! Two concurrent deliveries can both pass step 3; the sale uniqueness
//! constraint inside the fulfillment store decides the winner and the loser
//! acknowledges as a no-op.

use std::sync::Arc;

use uuid::Uuid;

use crate::domain::catalog::{FileType, ItemKind};
use crate::domain::foundation::{BeatId, ContractId, PaymentId, SaleId, SoundPackId};
use crate::domain::payment::{
    GatewayNotification, Payment, TransactionReference, WebhookError, WebhookVerifier,
};
use crate::ports::{
    CatalogStore, DocumentRenderer, FulfillmentCommand, FulfillmentOutcome, FulfillmentStore,
    NewContract, NewSale, ObjectStorage, PaymentStore, SaleStore, UserStore,
};

/// Storage category for generated contract documents.
const CONTRACT_CATEGORY: &str = "contracts";

/// Acknowledged outcomes of a notification. All of these answer 200 to the
/// gateway; only errors trigger a retry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WebhookAck {
    /// Payment settled; sale (and contract, when applicable) recorded.
    Fulfilled {
        payment_id: PaymentId,
        sale_id: SaleId,
        contract_id: Option<ContractId>,
    },
    /// Redelivery of an already-processed notification; nothing written.
    AlreadyProcessed { payment_id: PaymentId },
    /// Gateway reported a non-success status; payment marked failed.
    MarkedFailed { payment_id: PaymentId },
    /// No payment matches the notification; likely not ours.
    Unmatched,
    /// Exclusive rights were sold to someone else between checkout and
    /// delivery; recorded nothing, flagged for reconciliation.
    ExclusiveConflict { payment_id: PaymentId },
}

/// Handler for inbound gateway notifications.
pub struct FulfillPayment {
    verifier: WebhookVerifier,
    payments: Arc<dyn PaymentStore>,
    catalog: Arc<dyn CatalogStore>,
    sales: Arc<dyn SaleStore>,
    fulfillment: Arc<dyn FulfillmentStore>,
    users: Arc<dyn UserStore>,
    renderer: Arc<dyn DocumentRenderer>,
    storage: Arc<dyn ObjectStorage>,
}

impl FulfillPayment {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        verifier: WebhookVerifier,
        payments: Arc<dyn PaymentStore>,
        catalog: Arc<dyn CatalogStore>,
        sales: Arc<dyn SaleStore>,
        fulfillment: Arc<dyn FulfillmentStore>,
        users: Arc<dyn UserStore>,
        renderer: Arc<dyn DocumentRenderer>,
        storage: Arc<dyn ObjectStorage>,
    ) -> Self {
        Self {
            verifier,
            payments,
            catalog,
            sales,
            fulfillment,
            users,
            renderer,
            storage,
        }
    }

    pub async fn handle(
        &self,
        raw_body: &[u8],
        signature_header: &str,
    ) -> Result<WebhookAck, WebhookError> {
        // 1. Authenticate before reading anything out of the body.
        let notification = self.verifier.verify_and_parse(raw_body, signature_header)?;

        // 2. Resolve the target payment.
        let payment = match self.resolve_payment(&notification).await? {
            Some(payment) => payment,
            None => {
                tracing::warn!(
                    reference = notification.data.reference.as_deref().unwrap_or("<none>"),
                    "Payment not found for notification, acknowledging"
                );
                return Ok(WebhookAck::Unmatched);
            }
        };

        // 3. Dedupe ahead of any write: terminal payments are done.
        if payment.status.is_terminal() {
            tracing::info!(
                payment_id = payment.id.as_i64(),
                status = payment.status.as_str(),
                "Notification for already-processed payment, acknowledging"
            );
            return Ok(WebhookAck::AlreadyProcessed { payment_id: payment.id });
        }

        // 4. Branch on the reported status.
        if notification.data.is_success() {
            self.fulfill(payment, &notification).await
        } else {
            self.fulfillment.record_failure(payment.id).await?;
            tracing::info!(payment_id = payment.id.as_i64(), "Payment marked failed");
            Ok(WebhookAck::MarkedFailed { payment_id: payment.id })
        }
    }

    /// Metadata payment id first, then the stored gateway reference, then
    /// the payment id embedded in the reference string itself.
    async fn resolve_payment(
        &self,
        notification: &GatewayNotification,
    ) -> Result<Option<Payment>, WebhookError> {
        if let Some(id) = notification
            .data
            .metadata
            .as_ref()
            .and_then(|m| m.payment_id)
        {
            if let Some(payment) = self.payments.find_by_id(PaymentId::new(id)).await? {
                return Ok(Some(payment));
            }
        }

        let Some(reference) = notification.data.reference.as_deref() else {
            return Ok(None);
        };

        if let Some(payment) = self.payments.find_by_reference(reference).await? {
            return Ok(Some(payment));
        }

        if let Ok(parsed) = TransactionReference::parse(reference) {
            return Ok(self.payments.find_by_id(parsed.payment_id).await?);
        }

        Ok(None)
    }

    async fn fulfill(
        &self,
        payment: Payment,
        notification: &GatewayNotification,
    ) -> Result<WebhookAck, WebhookError> {
        let Some((kind, item_id)) = payment.item() else {
            return Err(WebhookError::Fulfillment(format!(
                "payment {} references no item",
                payment.id
            )));
        };

        // The payment row is authoritative for the purchased tier; the
        // metadata copy is only a fallback for rows predating tier tracking.
        let file_type = payment.file_type.or_else(|| {
            notification
                .data
                .metadata
                .as_ref()
                .and_then(|m| m.file_type.as_deref())
                .and_then(|ft| ft.parse().ok())
        });

        // Existing sale means a concurrent or earlier delivery already won.
        if self.sale_exists(&payment, kind, item_id, file_type).await? {
            tracing::info!(
                payment_id = payment.id.as_i64(),
                "Sale already recorded for this purchase, acknowledging"
            );
            return Ok(WebhookAck::AlreadyProcessed { payment_id: payment.id });
        }

        let mut sale = NewSale {
            buyer_id: payment.user_id,
            producer_id: None,
            beat_id: payment.beat_id,
            soundpack_id: payment.soundpack_id,
            amount: payment.amount,
            file_type,
        };

        let mut contract = None;
        let mut mark_sold_exclusive = None;

        match kind {
            ItemKind::Beat => {
                let beat_id = BeatId::new(item_id);
                if let Some(beat) = self.catalog.find_beat(beat_id).await? {
                    sale.producer_id = Some(beat.producer_id);

                    if let Some(file_type) = file_type {
                        if file_type.is_exclusive() {
                            // Defensive re-check: the window between checkout
                            // and delivery is unbounded and another exclusive
                            // sale may have landed.
                            if beat.is_sold_exclusive {
                                tracing::error!(
                                    payment_id = payment.id.as_i64(),
                                    beat_id = item_id,
                                    "Exclusive rights already sold elsewhere; manual reconciliation required"
                                );
                                return Ok(WebhookAck::ExclusiveConflict {
                                    payment_id: payment.id,
                                });
                            }
                            mark_sold_exclusive = Some(beat_id);
                        }

                        contract = self.prepare_contract(&payment, &beat, file_type).await?;
                    }
                }
            }
            ItemKind::SoundPack => {
                if let Some(pack) = self
                    .catalog
                    .find_soundpack(SoundPackId::new(item_id))
                    .await?
                {
                    sale.producer_id = Some(pack.producer_id);
                }
            }
        }

        let command = FulfillmentCommand {
            payment_id: payment.id,
            paid_amount: notification.data.settled_amount(),
            paid_currency: notification.data.currency.clone(),
            sale,
            contract,
            discount_id: payment.discount_id,
            mark_beat_sold_exclusive: mark_sold_exclusive,
        };

        match self.fulfillment.record_success(command).await? {
            FulfillmentOutcome::Recorded {
                sale_id,
                contract_id,
            } => {
                tracing::info!(
                    payment_id = payment.id.as_i64(),
                    sale_id = sale_id.as_i64(),
                    contract = contract_id.is_some(),
                    amount_usd = payment.amount,
                    "Payment fulfilled"
                );
                Ok(WebhookAck::Fulfilled {
                    payment_id: payment.id,
                    sale_id,
                    contract_id,
                })
            }
            FulfillmentOutcome::AlreadyFulfilled => {
                Ok(WebhookAck::AlreadyProcessed { payment_id: payment.id })
            }
        }
    }

    async fn sale_exists(
        &self,
        payment: &Payment,
        kind: ItemKind,
        item_id: i64,
        file_type: Option<FileType>,
    ) -> Result<bool, WebhookError> {
        let existing = match (kind, file_type) {
            (ItemKind::Beat, Some(file_type)) => {
                self.sales
                    .find_beat_sale(payment.user_id, BeatId::new(item_id), file_type)
                    .await?
            }
            (ItemKind::Beat, None) => None,
            (ItemKind::SoundPack, _) => {
                self.sales
                    .find_soundpack_sale(payment.user_id, SoundPackId::new(item_id))
                    .await?
            }
        };
        Ok(existing.is_some())
    }

    /// Renders and uploads the contract document when the producer set a
    /// template for this tier. Upload happens before the transaction opens;
    /// a failure here aborts the whole fulfillment so no sale ever points at
    /// a missing document.
    async fn prepare_contract(
        &self,
        payment: &Payment,
        beat: &crate::domain::catalog::Beat,
        file_type: FileType,
    ) -> Result<Option<NewContract>, WebhookError> {
        let Some(template) = self
            .catalog
            .find_contract_template(beat.id, file_type)
            .await?
        else {
            return Ok(None);
        };

        let buyer = self
            .users
            .find_by_id(payment.user_id)
            .await?
            .ok_or_else(|| {
                WebhookError::Fulfillment(format!("buyer {} not found", payment.user_id))
            })?;

        let document = self.renderer.render(&template, &buyer, beat, file_type);

        let filename = format!(
            "contract_{}_{}_{}.md",
            beat.id,
            file_type,
            Uuid::new_v4().simple()
        );
        let contract_url = self
            .storage
            .store(document, CONTRACT_CATEGORY, &filename)
            .await
            .map_err(|e| WebhookError::Fulfillment(format!("contract upload failed: {e}")))?;

        Ok(Some(NewContract {
            buyer_id: payment.user_id,
            beat_id: beat.id,
            file_type,
            contract_type: template.contract_type.clone(),
            terms: template.terms.clone(),
            price: payment.amount,
            contract_url,
            contract_template_id: Some(template.id),
        }))
    }
}
