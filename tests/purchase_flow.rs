//! End-to-end purchase flow through the HTTP router: checkout intent,
//! signed webhook fulfillment, idempotent redelivery, and the access gate.

use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use chrono::Utc;
use hmac::{Hmac, Mac};
use sha2::Sha512;
use tower::ServiceExt;

use beatstack::adapters::document::ContractDocumentRenderer;
use beatstack::adapters::http::{api_router, AppState};
use beatstack::application::authentication::Authenticator;
use beatstack::application::checkout::InitiateCheckout;
use beatstack::application::discounts::DiscountService;
use beatstack::application::file_access::AuthorizeFileAccess;
use beatstack::application::fulfillment::FulfillPayment;
use beatstack::application::history::PurchaseHistory;
use beatstack::application::pricing::PriceQuoter;
use beatstack::application::wishlist::WishlistService;
use beatstack::domain::catalog::{
    Beat, BeatFile, ContractTemplate, FileType, ItemKind, Purchasable, SoundPack,
};
use beatstack::domain::foundation::{
    BeatFileId, BeatId, ContractId, ContractTemplateId, DiscountId, DomainError, ErrorCode,
    PaymentId, Role, SaleId, SoundPackId, UserId, WishlistId,
};
use beatstack::domain::payment::{Contract, Payment, PaymentStatus, Sale, WebhookVerifier};
use beatstack::domain::pricing::Discount;
use beatstack::domain::users::User;
use beatstack::ports::{
    CatalogStore, CurrencyConverter, DiscountStore, FulfillmentCommand, FulfillmentOutcome,
    FulfillmentStore, GatewayCheckout, GatewayError, IdentityError, IdentityVerifier,
    InitializeTransaction, NewDiscount, NewPayment, ObjectStorage, PaymentGateway, PaymentStore,
    RateServiceError, SaleStore, StorageError, UserStore, VerifiedIdentity, WishlistAddOutcome,
    WishlistEntry, WishlistStore,
};

const WEBHOOK_SECRET: &str = "sk_test_integration_secret";

fn sign(body: &[u8]) -> String {
    let mut mac = Hmac::<Sha512>::new_from_slice(WEBHOOK_SECRET.as_bytes()).unwrap();
    mac.update(body);
    hex::encode(mac.finalize().into_bytes())
}

// ════════════════════════════════════════════════════════════════════════════
// In-memory backend shared by every store implementation
// ════════════════════════════════════════════════════════════════════════════

#[derive(Default)]
struct BackendState {
    beats: Vec<Beat>,
    beat_files: Vec<BeatFile>,
    packs: Vec<SoundPack>,
    templates: Vec<ContractTemplate>,
    discounts: Vec<Discount>,
    users: Vec<User>,
    payments: Vec<Payment>,
    sales: Vec<Sale>,
    contracts: Vec<Contract>,
    wishlists: Vec<WishlistEntry>,
    next_id: i64,
}

#[derive(Clone, Default)]
struct Backend(Arc<Mutex<BackendState>>);

impl Backend {
    fn next_id(&self) -> i64 {
        let mut state = self.0.lock().unwrap();
        state.next_id += 1;
        state.next_id
    }

    fn payment(&self, id: i64) -> Payment {
        self.0
            .lock()
            .unwrap()
            .payments
            .iter()
            .find(|p| p.id.as_i64() == id)
            .cloned()
            .expect("payment exists")
    }

    fn sale_count(&self) -> usize {
        self.0.lock().unwrap().sales.len()
    }
}

#[async_trait]
impl CatalogStore for Backend {
    async fn find_beat(&self, id: BeatId) -> Result<Option<Beat>, DomainError> {
        Ok(self.0.lock().unwrap().beats.iter().find(|b| b.id == id).cloned())
    }

    async fn find_beat_file(
        &self,
        beat_id: BeatId,
        file_type: FileType,
    ) -> Result<Option<BeatFile>, DomainError> {
        Ok(self
            .0
            .lock()
            .unwrap()
            .beat_files
            .iter()
            .find(|f| f.beat_id == beat_id && f.file_type == file_type)
            .cloned())
    }

    async fn find_soundpack(&self, id: SoundPackId) -> Result<Option<SoundPack>, DomainError> {
        Ok(self.0.lock().unwrap().packs.iter().find(|p| p.id == id).cloned())
    }

    async fn find_purchasable(
        &self,
        kind: ItemKind,
        item_id: i64,
    ) -> Result<Option<Purchasable>, DomainError> {
        Ok(match kind {
            ItemKind::Beat => self
                .find_beat(BeatId::new(item_id))
                .await?
                .map(Purchasable::Beat),
            ItemKind::SoundPack => self
                .find_soundpack(SoundPackId::new(item_id))
                .await?
                .map(Purchasable::SoundPack),
        })
    }

    async fn find_contract_template(
        &self,
        beat_id: BeatId,
        file_type: FileType,
    ) -> Result<Option<ContractTemplate>, DomainError> {
        Ok(self
            .0
            .lock()
            .unwrap()
            .templates
            .iter()
            .find(|t| t.beat_id == beat_id && t.file_type == file_type)
            .cloned())
    }
}

#[async_trait]
impl DiscountStore for Backend {
    async fn find_by_code(&self, code: &str) -> Result<Option<Discount>, DomainError> {
        Ok(self
            .0
            .lock()
            .unwrap()
            .discounts
            .iter()
            .find(|d| d.code == code)
            .cloned())
    }

    async fn list_active(
        &self,
        now: chrono::DateTime<Utc>,
    ) -> Result<Vec<Discount>, DomainError> {
        Ok(self
            .0
            .lock()
            .unwrap()
            .discounts
            .iter()
            .filter(|d| d.is_valid_at(now))
            .cloned()
            .collect())
    }

    async fn create(&self, _discount: NewDiscount) -> Result<Discount, DomainError> {
        unimplemented!("not exercised in this test")
    }
}

#[async_trait]
impl PaymentStore for Backend {
    async fn create_pending(&self, payment: NewPayment) -> Result<Payment, DomainError> {
        let id = self.next_id();
        let created = Payment {
            id: PaymentId::new(id),
            user_id: payment.user_id,
            amount: payment.amount,
            currency: payment.currency,
            method: payment.method,
            status: PaymentStatus::Pending,
            transaction_ref: None,
            paid_amount: None,
            paid_currency: None,
            beat_id: payment.beat_id,
            soundpack_id: payment.soundpack_id,
            discount_id: payment.discount_id,
            file_type: payment.file_type,
            created_at: Utc::now(),
        };
        self.0.lock().unwrap().payments.push(created.clone());
        Ok(created)
    }

    async fn set_transaction_ref(
        &self,
        id: PaymentId,
        reference: &str,
    ) -> Result<(), DomainError> {
        let mut state = self.0.lock().unwrap();
        let payment = state
            .payments
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or_else(|| DomainError::new(ErrorCode::PaymentNotFound, "missing"))?;
        payment.transaction_ref = Some(reference.to_string());
        Ok(())
    }

    async fn find_by_id(&self, id: PaymentId) -> Result<Option<Payment>, DomainError> {
        Ok(self.0.lock().unwrap().payments.iter().find(|p| p.id == id).cloned())
    }

    async fn find_by_reference(&self, reference: &str) -> Result<Option<Payment>, DomainError> {
        Ok(self
            .0
            .lock()
            .unwrap()
            .payments
            .iter()
            .find(|p| p.transaction_ref.as_deref() == Some(reference))
            .cloned())
    }
}

#[async_trait]
impl FulfillmentStore for Backend {
    async fn record_success(
        &self,
        command: FulfillmentCommand,
    ) -> Result<FulfillmentOutcome, DomainError> {
        let sale_id = self.next_id();
        let contract_row_id = self.next_id();
        let mut state = self.0.lock().unwrap();

        let duplicate = state.sales.iter().any(|s| {
            s.buyer_id == command.sale.buyer_id
                && s.beat_id == command.sale.beat_id
                && s.soundpack_id == command.sale.soundpack_id
                && s.file_type == command.sale.file_type
        });
        if duplicate {
            return Ok(FulfillmentOutcome::AlreadyFulfilled);
        }

        let payment = state
            .payments
            .iter_mut()
            .find(|p| p.id == command.payment_id)
            .ok_or_else(|| DomainError::new(ErrorCode::PaymentNotFound, "missing"))?;
        if payment.status != PaymentStatus::Pending {
            return Ok(FulfillmentOutcome::AlreadyFulfilled);
        }
        payment.status = PaymentStatus::Success;
        payment.paid_amount = command.paid_amount;
        payment.paid_currency = command.paid_currency.clone();

        let mut contract_id = None;
        if let Some(contract) = &command.contract {
            let id = ContractId::new(contract_row_id);
            state.contracts.push(Contract {
                id,
                buyer_id: contract.buyer_id,
                beat_id: contract.beat_id,
                file_type: contract.file_type,
                contract_type: contract.contract_type.clone(),
                terms: contract.terms.clone(),
                price: contract.price,
                status: "active".to_string(),
                contract_url: Some(contract.contract_url.clone()),
                contract_template_id: contract.contract_template_id,
                created_at: Utc::now(),
            });
            contract_id = Some(id);
        }

        if let Some(beat_id) = command.mark_beat_sold_exclusive {
            if let Some(beat) = state.beats.iter_mut().find(|b| b.id == beat_id) {
                beat.is_sold_exclusive = true;
            }
        }

        if let Some(discount_id) = command.discount_id {
            if let Some(discount) = state.discounts.iter_mut().find(|d| d.id == discount_id) {
                discount.used_count += 1;
            }
        }

        let sale = Sale {
            id: SaleId::new(sale_id),
            buyer_id: command.sale.buyer_id,
            producer_id: command.sale.producer_id,
            beat_id: command.sale.beat_id,
            soundpack_id: command.sale.soundpack_id,
            contract_id,
            amount: command.sale.amount,
            file_type: command.sale.file_type,
            created_at: Utc::now(),
        };
        state.sales.push(sale);

        Ok(FulfillmentOutcome::Recorded {
            sale_id: SaleId::new(sale_id),
            contract_id,
        })
    }

    async fn record_failure(&self, payment_id: PaymentId) -> Result<(), DomainError> {
        let mut state = self.0.lock().unwrap();
        if let Some(payment) = state.payments.iter_mut().find(|p| p.id == payment_id) {
            if payment.status == PaymentStatus::Pending {
                payment.status = PaymentStatus::Failed;
            }
        }
        Ok(())
    }
}

#[async_trait]
impl SaleStore for Backend {
    async fn find_beat_sale(
        &self,
        buyer_id: UserId,
        beat_id: BeatId,
        file_type: FileType,
    ) -> Result<Option<Sale>, DomainError> {
        Ok(self
            .0
            .lock()
            .unwrap()
            .sales
            .iter()
            .find(|s| {
                s.buyer_id == buyer_id
                    && s.beat_id == Some(beat_id)
                    && s.file_type == Some(file_type)
            })
            .cloned())
    }

    async fn find_soundpack_sale(
        &self,
        buyer_id: UserId,
        soundpack_id: SoundPackId,
    ) -> Result<Option<Sale>, DomainError> {
        Ok(self
            .0
            .lock()
            .unwrap()
            .sales
            .iter()
            .find(|s| s.buyer_id == buyer_id && s.soundpack_id == Some(soundpack_id))
            .cloned())
    }

    async fn find_contract(
        &self,
        buyer_id: UserId,
        beat_id: BeatId,
        file_type: FileType,
    ) -> Result<Option<Contract>, DomainError> {
        Ok(self
            .0
            .lock()
            .unwrap()
            .contracts
            .iter()
            .find(|c| c.buyer_id == buyer_id && c.beat_id == beat_id && c.file_type == file_type)
            .cloned())
    }

    async fn list_by_buyer(&self, buyer_id: UserId) -> Result<Vec<Sale>, DomainError> {
        Ok(self
            .0
            .lock()
            .unwrap()
            .sales
            .iter()
            .filter(|s| s.buyer_id == buyer_id)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl UserStore for Backend {
    async fn upsert_from_identity(
        &self,
        identity: &VerifiedIdentity,
    ) -> Result<User, DomainError> {
        {
            let mut state = self.0.lock().unwrap();
            if let Some(user) = state.users.iter_mut().find(|u| u.email == identity.email) {
                user.role = identity.role;
                return Ok(user.clone());
            }
        }
        let id = self.next_id();
        let user = User {
            id: UserId::new(id),
            firebase_uid: Some(identity.subject.clone()),
            name: identity.display_name.clone(),
            email: identity.email.clone(),
            role: identity.role,
            created_at: Utc::now(),
        };
        self.0.lock().unwrap().users.push(user.clone());
        Ok(user)
    }

    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, DomainError> {
        Ok(self.0.lock().unwrap().users.iter().find(|u| u.id == id).cloned())
    }
}

#[async_trait]
impl WishlistStore for Backend {
    async fn list(&self, user_id: UserId) -> Result<Vec<WishlistEntry>, DomainError> {
        Ok(self
            .0
            .lock()
            .unwrap()
            .wishlists
            .iter()
            .filter(|e| e.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn add(
        &self,
        user_id: UserId,
        item_type: ItemKind,
        item_id: i64,
    ) -> Result<WishlistAddOutcome, DomainError> {
        let id = self.next_id();
        let entry = WishlistEntry {
            id: WishlistId::new(id),
            user_id,
            item_type,
            item_id,
            created_at: Utc::now(),
        };
        self.0.lock().unwrap().wishlists.push(entry.clone());
        Ok(WishlistAddOutcome::Added(entry))
    }

    async fn find_by_id(&self, id: WishlistId) -> Result<Option<WishlistEntry>, DomainError> {
        Ok(self
            .0
            .lock()
            .unwrap()
            .wishlists
            .iter()
            .find(|e| e.id == id)
            .cloned())
    }

    async fn remove(&self, id: WishlistId) -> Result<(), DomainError> {
        self.0.lock().unwrap().wishlists.retain(|e| e.id != id);
        Ok(())
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Collaborator stubs
// ════════════════════════════════════════════════════════════════════════════

/// Accepts `role:email:name` tokens, mirroring the dev verifier.
struct TestVerifier;

#[async_trait]
impl IdentityVerifier for TestVerifier {
    async fn verify(&self, bearer_token: &str) -> Result<VerifiedIdentity, IdentityError> {
        let mut parts = bearer_token.splitn(3, ':');
        let role = Role::normalize(parts.next());
        let email = parts
            .next()
            .ok_or_else(|| IdentityError::InvalidCredential("bad token".to_string()))?;
        let name = parts.next().unwrap_or("Test User");
        Ok(VerifiedIdentity {
            subject: format!("uid-{email}"),
            email: email.to_string(),
            display_name: name.to_string(),
            role,
        })
    }
}

struct TestGateway {
    calls: AtomicI64,
}

#[async_trait]
impl PaymentGateway for TestGateway {
    async fn initialize_transaction(
        &self,
        request: InitializeTransaction,
    ) -> Result<GatewayCheckout, GatewayError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(GatewayCheckout {
            authorization_url: format!("https://checkout.test/{}", request.reference),
            access_code: Some("AC_1".to_string()),
            reference: request.reference,
        })
    }
}

struct FixedRate;

#[async_trait]
impl CurrencyConverter for FixedRate {
    async fn convert(&self, amount: f64, _from: &str, _to: &str) -> Result<f64, RateServiceError> {
        Ok(amount * 130.0)
    }
}

struct MemoryStorage;

#[async_trait]
impl ObjectStorage for MemoryStorage {
    async fn store(
        &self,
        _bytes: Vec<u8>,
        category: &str,
        filename: &str,
    ) -> Result<String, StorageError> {
        Ok(format!("https://files.test/{category}/{filename}"))
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Fixture assembly
// ════════════════════════════════════════════════════════════════════════════

fn seeded_backend() -> Backend {
    let backend = Backend::default();
    {
        let mut state = backend.0.lock().unwrap();
        state.next_id = 100;
        state.users.push(User {
            id: UserId::new(1),
            firebase_uid: Some("uid-producer".to_string()),
            name: "Prod".to_string(),
            email: "prod@example.com".to_string(),
            role: Role::Producer,
            created_at: Utc::now(),
        });
        state.beats.push(Beat {
            id: BeatId::new(3),
            title: "Night Drive".to_string(),
            description: None,
            genre: Some("trap".to_string()),
            bpm: Some(140),
            key: Some("Am".to_string()),
            price: 50.0,
            cover_url: None,
            preview_url: None,
            exclusive_available: true,
            is_sold_exclusive: false,
            producer_id: UserId::new(1),
            created_at: Utc::now(),
        });
        state.beat_files.push(BeatFile {
            id: BeatFileId::new(31),
            beat_id: BeatId::new(3),
            file_type: FileType::Mp3,
            price: 50.0,
            file_url: "https://cdn.test/beats/3/mp3.zip".to_string(),
        });
        state.templates.push(ContractTemplate {
            id: ContractTemplateId::new(7),
            beat_id: BeatId::new(3),
            file_type: FileType::Mp3,
            contract_type: "non-exclusive license".to_string(),
            terms: Some("Credit the producer.".to_string()),
            price: 50.0,
            created_at: Utc::now(),
        });
        state.discounts.push(Discount {
            id: DiscountId::new(4),
            code: "SAVE20".to_string(),
            percentage: 20.0,
            scope: beatstack::domain::pricing::DiscountScope::Global,
            item_id: None,
            name: None,
            description: None,
            start_date: None,
            end_date: None,
            max_uses: Some(10),
            used_count: 0,
            is_active: true,
            created_at: Utc::now(),
        });
    }
    backend
}

fn app(backend: &Backend) -> axum::Router {
    let catalog = Arc::new(backend.clone());
    let discounts = Arc::new(backend.clone());
    let payments = Arc::new(backend.clone());
    let fulfillment = Arc::new(backend.clone());
    let sales = Arc::new(backend.clone());
    let users = Arc::new(backend.clone());
    let wishlist = Arc::new(backend.clone());

    let quoter = PriceQuoter::new(
        catalog.clone(),
        discounts.clone(),
        Arc::new(FixedRate),
        "KES",
    );

    let state = AppState {
        authenticator: Arc::new(Authenticator::new(Arc::new(TestVerifier), users.clone())),
        checkout: Arc::new(InitiateCheckout::new(
            quoter,
            payments.clone(),
            Arc::new(TestGateway {
                calls: AtomicI64::new(0),
            }),
        )),
        fulfillment: Arc::new(FulfillPayment::new(
            WebhookVerifier::new(WEBHOOK_SECRET),
            payments,
            catalog.clone(),
            sales.clone(),
            fulfillment,
            users.clone(),
            Arc::new(ContractDocumentRenderer),
            Arc::new(MemoryStorage),
        )),
        file_access: Arc::new(AuthorizeFileAccess::new(catalog.clone(), sales.clone())),
        history: Arc::new(PurchaseHistory::new(sales, catalog.clone(), users)),
        wishlist: Arc::new(WishlistService::new(wishlist, catalog.clone())),
        discounts: Arc::new(DiscountService::new(discounts, catalog)),
    };

    api_router(state)
}

async fn send(
    router: &axum::Router,
    request: Request<Body>,
) -> (StatusCode, serde_json::Value) {
    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = if bytes.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}

fn checkout_request(token: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/api/purchase")
        .header("authorization", format!("Bearer {token}"))
        .header("content-type", "application/json")
        .body(Body::from(
            serde_json::json!({
                "item_type": "beat",
                "item_id": 3,
                "file_type": "mp3",
                "discount_code": "SAVE20",
                "callback_url": "https://app.test/thanks"
            })
            .to_string(),
        ))
        .unwrap()
}

fn webhook_request(body: String, signature: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/api/purchase/paystack/webhook")
        .header("x-paystack-signature", signature)
        .header("content-type", "application/json")
        .body(Body::from(body))
        .unwrap()
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[tokio::test]
async fn checkout_then_webhook_fulfills_exactly_once() {
    let backend = seeded_backend();
    let router = app(&backend);
    let buyer = "buyer:alex@example.com:Alex";

    // 1. Checkout: $50 - 20% = $40 -> 5200 KES.
    let (status, body) = send(&router, checkout_request(buyer)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["amount_usd"], 40.0);
    assert_eq!(body["amount_kes"], 5200.0);
    let reference = body["reference"].as_str().unwrap().to_string();
    let payment_id = body["payment_id"].as_i64().unwrap();
    assert!(reference.starts_with("BEAT_MP3_"));
    assert_eq!(
        backend.payment(payment_id).status,
        PaymentStatus::Pending
    );

    // 2. Signed success webhook fulfills the payment.
    let webhook_body = serde_json::json!({
        "event": "charge.success",
        "data": {
            "reference": reference,
            "status": "success",
            "amount": 520000,
            "currency": "KES",
            "metadata": {"payment_id": payment_id, "file_type": "mp3"}
        }
    })
    .to_string();
    let signature = sign(webhook_body.as_bytes());

    let (status, body) = send(&router, webhook_request(webhook_body.clone(), &signature)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["ok"], true);

    let payment = backend.payment(payment_id);
    assert_eq!(payment.status, PaymentStatus::Success);
    assert_eq!(payment.paid_amount, Some(5200.0));
    assert_eq!(payment.paid_currency.as_deref(), Some("KES"));
    assert_eq!(backend.sale_count(), 1);

    // Discount consumed exactly once.
    assert_eq!(backend.0.lock().unwrap().discounts[0].used_count, 1);

    // 3. Redelivery acknowledges without a second sale.
    let (status, body) = send(&router, webhook_request(webhook_body, &signature)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["ok"], true);
    assert_eq!(backend.sale_count(), 1);
    assert_eq!(backend.0.lock().unwrap().discounts[0].used_count, 1);
}

#[tokio::test]
async fn forged_webhook_is_rejected_without_side_effects() {
    let backend = seeded_backend();
    let router = app(&backend);

    let (status, body) = send(&router, checkout_request("buyer:alex@example.com:Alex")).await;
    assert_eq!(status, StatusCode::OK);
    let payment_id = body["payment_id"].as_i64().unwrap();

    let webhook_body = serde_json::json!({
        "event": "charge.success",
        "data": {"reference": body["reference"], "status": "success",
                 "metadata": {"payment_id": payment_id}}
    })
    .to_string();

    let (status, _) = send(
        &router,
        webhook_request(webhook_body, &"ab".repeat(64)),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(backend.payment(payment_id).status, PaymentStatus::Pending);
    assert_eq!(backend.sale_count(), 0);
}

#[tokio::test]
async fn access_gate_grants_buyer_after_fulfillment_and_rejects_strangers() {
    let backend = seeded_backend();
    let router = app(&backend);
    let buyer = "buyer:alex@example.com:Alex";

    let (_, body) = send(&router, checkout_request(buyer)).await;
    let reference = body["reference"].as_str().unwrap().to_string();
    let payment_id = body["payment_id"].as_i64().unwrap();

    let webhook_body = serde_json::json!({
        "event": "charge.success",
        "data": {"reference": reference, "status": "success", "amount": 520000,
                 "currency": "KES", "metadata": {"payment_id": payment_id, "file_type": "mp3"}}
    })
    .to_string();
    let signature = sign(webhook_body.as_bytes());
    send(&router, webhook_request(webhook_body, &signature)).await;

    // Buyer gets the file plus the generated contract.
    let request = Request::builder()
        .uri("/api/beats/3/files/mp3")
        .header("authorization", format!("Bearer {buyer}"))
        .body(Body::empty())
        .unwrap();
    let (status, body) = send(&router, request).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["file_url"], "https://cdn.test/beats/3/mp3.zip");
    assert!(body["contract_url"]
        .as_str()
        .unwrap()
        .starts_with("https://files.test/contracts/"));

    // A different buyer with no sale is rejected.
    let request = Request::builder()
        .uri("/api/beats/3/files/mp3")
        .header("authorization", "Bearer buyer:sam@example.com:Sam")
        .body(Body::empty())
        .unwrap();
    let (status, _) = send(&router, request).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    // The producer-owner needs no sale.
    let request = Request::builder()
        .uri("/api/beats/3/files/mp3")
        .header("authorization", "Bearer producer:prod@example.com:Prod")
        .body(Body::empty())
        .unwrap();
    let (status, body) = send(&router, request).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["contract_url"].is_null());
}

#[tokio::test]
async fn failed_webhook_marks_payment_failed() {
    let backend = seeded_backend();
    let router = app(&backend);

    let (_, body) = send(&router, checkout_request("buyer:alex@example.com:Alex")).await;
    let payment_id = body["payment_id"].as_i64().unwrap();

    let webhook_body = serde_json::json!({
        "event": "charge.failed",
        "data": {"reference": body["reference"], "status": "failed",
                 "metadata": {"payment_id": payment_id}}
    })
    .to_string();
    let signature = sign(webhook_body.as_bytes());

    let (status, _) = send(&router, webhook_request(webhook_body, &signature)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(backend.payment(payment_id).status, PaymentStatus::Failed);
    assert_eq!(backend.sale_count(), 0);
}

#[tokio::test]
async fn unauthenticated_checkout_is_rejected() {
    let backend = seeded_backend();
    let router = app(&backend);

    let request = Request::builder()
        .method("POST")
        .uri("/api/purchase")
        .header("content-type", "application/json")
        .body(Body::from(
            serde_json::json!({"item_type": "beat", "item_id": 3, "file_type": "mp3"}).to_string(),
        ))
        .unwrap();
    let (status, _) = send(&router, request).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}
