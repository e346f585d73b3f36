//! In-memory port implementations and fixtures shared by handler tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;

use crate::domain::catalog::{
    Beat, BeatFile, ContractTemplate, FileType, ItemKind, Purchasable, SoundPack,
};
use crate::domain::foundation::{
    BeatFileId, BeatId, ContractId, ContractTemplateId, DiscountId, DomainError, ErrorCode,
    PaymentId, Role, SaleId, SoundPackId, UserId, WishlistId,
};
use crate::domain::payment::{Contract, Payment, PaymentStatus, Sale};
use crate::domain::pricing::{Discount, DiscountScope};
use crate::domain::users::User;
use crate::ports::{
    CatalogStore, CurrencyConverter, DiscountStore, DocumentRenderer, FulfillmentCommand,
    FulfillmentOutcome, FulfillmentStore, GatewayCheckout, GatewayError, IdentityError,
    IdentityVerifier, InitializeTransaction, NewDiscount, NewPayment, ObjectStorage,
    PaymentGateway, PaymentStore, RateServiceError, SaleStore, StorageError, UserStore,
    VerifiedIdentity, WishlistAddOutcome, WishlistEntry, WishlistStore,
};

// ════════════════════════════════════════════════════════════════════════════
// Fixtures
// ════════════════════════════════════════════════════════════════════════════

pub fn beat_fixture(id: i64, producer_id: i64, sold_exclusive: bool) -> Beat {
    Beat {
        id: BeatId::new(id),
        title: format!("Beat #{id}"),
        description: None,
        genre: Some("trap".to_string()),
        bpm: Some(140),
        key: Some("Am".to_string()),
        price: 30.0,
        cover_url: Some(format!("https://cdn.example/covers/{id}.jpg")),
        preview_url: None,
        exclusive_available: true,
        is_sold_exclusive: sold_exclusive,
        producer_id: UserId::new(producer_id),
        created_at: Utc::now(),
    }
}

pub fn pack_fixture(id: i64, producer_id: i64, price: f64) -> SoundPack {
    SoundPack {
        id: SoundPackId::new(id),
        name: format!("Pack #{id}"),
        description: None,
        price,
        cover_url: None,
        file_url: Some(format!("https://cdn.example/packs/{id}.zip")),
        producer_id: UserId::new(producer_id),
        created_at: Utc::now(),
    }
}

pub fn user_fixture(id: i64, role: Role) -> User {
    User {
        id: UserId::new(id),
        firebase_uid: Some(format!("uid-{id}")),
        name: format!("User {id}"),
        email: format!("user{id}@example.com"),
        role,
        created_at: Utc::now(),
    }
}

pub fn template_fixture(beat_id: i64, file_type: FileType) -> ContractTemplate {
    ContractTemplate {
        id: ContractTemplateId::new(beat_id * 10),
        beat_id: BeatId::new(beat_id),
        file_type,
        contract_type: "non-exclusive license".to_string(),
        terms: Some("Credit the producer on release.".to_string()),
        price: 50.0,
        created_at: Utc::now(),
    }
}

pub fn pending_payment_fixture(id: i64, user_id: i64, beat_id: i64, file_type: FileType) -> Payment {
    Payment {
        id: PaymentId::new(id),
        user_id: UserId::new(user_id),
        amount: 40.0,
        currency: "USD".to_string(),
        method: "paystack".to_string(),
        status: PaymentStatus::Pending,
        transaction_ref: Some(format!(
            "BEAT_{}_{}_1718000123",
            file_type.as_str().to_ascii_uppercase(),
            id
        )),
        paid_amount: None,
        paid_currency: None,
        beat_id: Some(BeatId::new(beat_id)),
        soundpack_id: None,
        discount_id: None,
        file_type: Some(file_type),
        created_at: Utc::now(),
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Catalog
// ════════════════════════════════════════════════════════════════════════════

#[derive(Default)]
pub struct InMemoryCatalog {
    beats: Vec<Beat>,
    beat_files: Vec<BeatFile>,
    packs: Vec<SoundPack>,
    templates: Vec<ContractTemplate>,
}

impl InMemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_beat(mut self, beat: Beat, tiers: Vec<(FileType, f64)>) -> Self {
        for (i, (file_type, price)) in tiers.into_iter().enumerate() {
            self.beat_files.push(BeatFile {
                id: BeatFileId::new(beat.id.as_i64() * 100 + i as i64),
                beat_id: beat.id,
                file_type,
                price,
                file_url: format!(
                    "https://cdn.example/beats/{}/{}.zip",
                    beat.id,
                    file_type.as_str()
                ),
            });
        }
        self.beats.push(beat);
        self
    }

    pub fn with_pack(mut self, pack: SoundPack) -> Self {
        self.packs.push(pack);
        self
    }

    pub fn with_template(mut self, template: ContractTemplate) -> Self {
        self.templates.push(template);
        self
    }
}

#[async_trait]
impl CatalogStore for InMemoryCatalog {
    async fn find_beat(&self, id: BeatId) -> Result<Option<Beat>, DomainError> {
        Ok(self.beats.iter().find(|b| b.id == id).cloned())
    }

    async fn find_beat_file(
        &self,
        beat_id: BeatId,
        file_type: FileType,
    ) -> Result<Option<BeatFile>, DomainError> {
        Ok(self
            .beat_files
            .iter()
            .find(|f| f.beat_id == beat_id && f.file_type == file_type)
            .cloned())
    }

    async fn find_soundpack(&self, id: SoundPackId) -> Result<Option<SoundPack>, DomainError> {
        Ok(self.packs.iter().find(|p| p.id == id).cloned())
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
            .templates
            .iter()
            .find(|t| t.beat_id == beat_id && t.file_type == file_type)
            .cloned())
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Discounts
// ════════════════════════════════════════════════════════════════════════════

#[derive(Default)]
pub struct InMemoryDiscounts {
    discounts: Mutex<Vec<Discount>>,
    next_id: AtomicI64,
}

impl InMemoryDiscounts {
    pub fn new() -> Self {
        Self {
            discounts: Mutex::new(Vec::new()),
            next_id: AtomicI64::new(1),
        }
    }

    pub fn with_code(
        self,
        code: &str,
        percentage: f64,
        scope: DiscountScope,
        item_id: Option<i64>,
    ) -> Self {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        self.discounts.lock().unwrap().push(Discount {
            id: DiscountId::new(id),
            code: code.to_string(),
            percentage,
            scope,
            item_id,
            name: None,
            description: None,
            start_date: None,
            end_date: None,
            max_uses: None,
            used_count: 0,
            is_active: true,
            created_at: Utc::now(),
        });
        self
    }
}

#[async_trait]
impl DiscountStore for InMemoryDiscounts {
    async fn find_by_code(&self, code: &str) -> Result<Option<Discount>, DomainError> {
        Ok(self
            .discounts
            .lock()
            .unwrap()
            .iter()
            .find(|d| d.code == code)
            .cloned())
    }

    async fn list_active(
        &self,
        now: chrono::DateTime<Utc>,
    ) -> Result<Vec<Discount>, DomainError> {
        Ok(self
            .discounts
            .lock()
            .unwrap()
            .iter()
            .filter(|d| d.is_valid_at(now))
            .cloned()
            .collect())
    }

    async fn create(&self, discount: NewDiscount) -> Result<Discount, DomainError> {
        let mut discounts = self.discounts.lock().unwrap();
        if discounts.iter().any(|d| d.code == discount.code) {
            return Err(DomainError::new(
                ErrorCode::DuplicateDiscountCode,
                "Discount code already exists",
            ));
        }
        let created = Discount {
            id: DiscountId::new(self.next_id.fetch_add(1, Ordering::SeqCst)),
            code: discount.code,
            percentage: discount.percentage,
            scope: discount.scope,
            item_id: discount.item_id,
            name: discount.name,
            description: discount.description,
            start_date: discount.start_date,
            end_date: discount.end_date,
            max_uses: discount.max_uses,
            used_count: 0,
            is_active: true,
            created_at: Utc::now(),
        };
        discounts.push(created.clone());
        Ok(created)
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Currency
// ════════════════════════════════════════════════════════════════════════════

pub struct StubConverter {
    rate: Option<f64>,
}

impl StubConverter {
    pub fn rate(rate: f64) -> Self {
        Self { rate: Some(rate) }
    }

    pub fn failing() -> Self {
        Self { rate: None }
    }
}

#[async_trait]
impl CurrencyConverter for StubConverter {
    async fn convert(&self, amount: f64, _from: &str, _to: &str) -> Result<f64, RateServiceError> {
        match self.rate {
            Some(rate) => Ok(amount * rate),
            None => Err(RateServiceError("connection refused".to_string())),
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Payments
// ════════════════════════════════════════════════════════════════════════════

#[derive(Default)]
pub struct InMemoryPayments {
    payments: Mutex<Vec<Payment>>,
    next_id: AtomicI64,
}

impl InMemoryPayments {
    pub fn new() -> Self {
        Self {
            payments: Mutex::new(Vec::new()),
            next_id: AtomicI64::new(1),
        }
    }

    pub fn with_payment(self, payment: Payment) -> Self {
        self.next_id
            .store(payment.id.as_i64() + 1, Ordering::SeqCst);
        self.payments.lock().unwrap().push(payment);
        self
    }

    pub fn all(&self) -> Vec<Payment> {
        self.payments.lock().unwrap().clone()
    }
}

#[async_trait]
impl PaymentStore for InMemoryPayments {
    async fn create_pending(&self, payment: NewPayment) -> Result<Payment, DomainError> {
        let created = Payment {
            id: PaymentId::new(self.next_id.fetch_add(1, Ordering::SeqCst)),
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
        self.payments.lock().unwrap().push(created.clone());
        Ok(created)
    }

    async fn set_transaction_ref(
        &self,
        id: PaymentId,
        reference: &str,
    ) -> Result<(), DomainError> {
        let mut payments = self.payments.lock().unwrap();
        let payment = payments
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or_else(|| DomainError::new(ErrorCode::PaymentNotFound, "no such payment"))?;
        payment.transaction_ref = Some(reference.to_string());
        Ok(())
    }

    async fn find_by_id(&self, id: PaymentId) -> Result<Option<Payment>, DomainError> {
        Ok(self
            .payments
            .lock()
            .unwrap()
            .iter()
            .find(|p| p.id == id)
            .cloned())
    }

    async fn find_by_reference(&self, reference: &str) -> Result<Option<Payment>, DomainError> {
        Ok(self
            .payments
            .lock()
            .unwrap()
            .iter()
            .find(|p| p.transaction_ref.as_deref() == Some(reference))
            .cloned())
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Gateway
// ════════════════════════════════════════════════════════════════════════════

pub struct RecordingGateway {
    pub requests: Mutex<Vec<InitializeTransaction>>,
    fail: bool,
}

impl RecordingGateway {
    pub fn succeeding() -> Self {
        Self {
            requests: Mutex::new(Vec::new()),
            fail: false,
        }
    }

    pub fn failing() -> Self {
        Self {
            requests: Mutex::new(Vec::new()),
            fail: true,
        }
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[async_trait]
impl PaymentGateway for RecordingGateway {
    async fn initialize_transaction(
        &self,
        request: InitializeTransaction,
    ) -> Result<GatewayCheckout, GatewayError> {
        let reference = request.reference.clone();
        self.requests.lock().unwrap().push(request);
        if self.fail {
            return Err(GatewayError::Network("connect timeout".to_string()));
        }
        Ok(GatewayCheckout {
            authorization_url: format!("https://checkout.example/{reference}"),
            access_code: Some("AC_test".to_string()),
            reference,
        })
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Users
// ════════════════════════════════════════════════════════════════════════════

#[derive(Default)]
pub struct InMemoryUsers {
    users: Mutex<Vec<User>>,
    next_id: AtomicI64,
}

impl InMemoryUsers {
    pub fn new() -> Self {
        Self {
            users: Mutex::new(Vec::new()),
            next_id: AtomicI64::new(1),
        }
    }

    pub fn with_user(self, user: User) -> Self {
        self.next_id.store(user.id.as_i64() + 1, Ordering::SeqCst);
        self.users.lock().unwrap().push(user);
        self
    }
}

#[async_trait]
impl UserStore for InMemoryUsers {
    async fn upsert_from_identity(
        &self,
        identity: &VerifiedIdentity,
    ) -> Result<User, DomainError> {
        let mut users = self.users.lock().unwrap();
        if let Some(user) = users.iter_mut().find(|u| u.email == identity.email) {
            user.role = identity.role;
            return Ok(user.clone());
        }
        let created = User {
            id: UserId::new(self.next_id.fetch_add(1, Ordering::SeqCst)),
            firebase_uid: Some(identity.subject.clone()),
            name: identity.display_name.clone(),
            email: identity.email.clone(),
            role: identity.role,
            created_at: Utc::now(),
        };
        users.push(created.clone());
        Ok(created)
    }

    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, DomainError> {
        Ok(self.users.lock().unwrap().iter().find(|u| u.id == id).cloned())
    }
}

/// Identity verifier that accepts any token as a fixed identity.
pub struct StaticIdentity(pub VerifiedIdentity);

#[async_trait]
impl IdentityVerifier for StaticIdentity {
    async fn verify(&self, bearer_token: &str) -> Result<VerifiedIdentity, IdentityError> {
        if bearer_token.is_empty() {
            return Err(IdentityError::InvalidCredential("empty token".to_string()));
        }
        Ok(self.0.clone())
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Sales
// ════════════════════════════════════════════════════════════════════════════

#[derive(Default)]
pub struct InMemorySales {
    pub sales: Mutex<Vec<Sale>>,
    pub contracts: Mutex<Vec<Contract>>,
}

impl InMemorySales {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_sale(self, sale: Sale) -> Self {
        self.sales.lock().unwrap().push(sale);
        self
    }

    pub fn with_contract(self, contract: Contract) -> Self {
        self.contracts.lock().unwrap().push(contract);
        self
    }
}

#[async_trait]
impl SaleStore for InMemorySales {
    async fn find_beat_sale(
        &self,
        buyer_id: UserId,
        beat_id: BeatId,
        file_type: FileType,
    ) -> Result<Option<Sale>, DomainError> {
        Ok(self
            .sales
            .lock()
            .unwrap()
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
            .sales
            .lock()
            .unwrap()
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
            .contracts
            .lock()
            .unwrap()
            .iter()
            .find(|c| c.buyer_id == buyer_id && c.beat_id == beat_id && c.file_type == file_type)
            .cloned())
    }

    async fn list_by_buyer(&self, buyer_id: UserId) -> Result<Vec<Sale>, DomainError> {
        let mut sales: Vec<Sale> = self
            .sales
            .lock()
            .unwrap()
            .iter()
            .filter(|s| s.buyer_id == buyer_id)
            .cloned()
            .collect();
        sales.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(sales)
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Fulfillment
// ════════════════════════════════════════════════════════════════════════════

/// Fulfillment store that applies commands against in-memory state, with a
/// switchable failure mode to exercise the rollback path.
pub struct RecordingFulfillment {
    pub commands: Mutex<Vec<FulfillmentCommand>>,
    pub failures: Mutex<Vec<PaymentId>>,
    existing_sales: Mutex<HashMap<(i64, i64, Option<FileType>), SaleId>>,
    fail: bool,
    next_sale_id: AtomicI64,
}

impl RecordingFulfillment {
    pub fn new() -> Self {
        Self {
            commands: Mutex::new(Vec::new()),
            failures: Mutex::new(Vec::new()),
            existing_sales: Mutex::new(HashMap::new()),
            fail: false,
            next_sale_id: AtomicI64::new(1),
        }
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::new()
        }
    }

    pub fn command_count(&self) -> usize {
        self.commands.lock().unwrap().len()
    }
}

#[async_trait]
impl FulfillmentStore for RecordingFulfillment {
    async fn record_success(
        &self,
        command: FulfillmentCommand,
    ) -> Result<FulfillmentOutcome, DomainError> {
        if self.fail {
            return Err(DomainError::database("simulated transaction failure"));
        }
        let key = (
            command.sale.buyer_id.as_i64(),
            command
                .sale
                .beat_id
                .map(|b| b.as_i64())
                .or(command.sale.soundpack_id.map(|p| p.as_i64()))
                .unwrap_or(0),
            command.sale.file_type,
        );
        let mut existing = self.existing_sales.lock().unwrap();
        if existing.contains_key(&key) {
            return Ok(FulfillmentOutcome::AlreadyFulfilled);
        }
        let sale_id = SaleId::new(self.next_sale_id.fetch_add(1, Ordering::SeqCst));
        existing.insert(key, sale_id);
        let contract_id = command.contract.as_ref().map(|_| ContractId::new(1));
        self.commands.lock().unwrap().push(command);
        Ok(FulfillmentOutcome::Recorded {
            sale_id,
            contract_id,
        })
    }

    async fn record_failure(&self, payment_id: PaymentId) -> Result<(), DomainError> {
        self.failures.lock().unwrap().push(payment_id);
        Ok(())
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Documents
// ════════════════════════════════════════════════════════════════════════════

pub struct StubRenderer;

impl DocumentRenderer for StubRenderer {
    fn render(
        &self,
        template: &ContractTemplate,
        buyer: &User,
        beat: &Beat,
        file_type: FileType,
    ) -> Vec<u8> {
        format!(
            "{} | {} | {} | {}",
            template.contract_type, buyer.name, beat.title, file_type
        )
        .into_bytes()
    }
}

pub struct RecordingStorage {
    pub stored: Mutex<Vec<(String, String)>>,
    fail: bool,
}

impl RecordingStorage {
    pub fn succeeding() -> Self {
        Self {
            stored: Mutex::new(Vec::new()),
            fail: false,
        }
    }

    pub fn failing() -> Self {
        Self {
            stored: Mutex::new(Vec::new()),
            fail: true,
        }
    }
}

#[async_trait]
impl ObjectStorage for RecordingStorage {
    async fn store(
        &self,
        _bytes: Vec<u8>,
        category: &str,
        filename: &str,
    ) -> Result<String, StorageError> {
        if self.fail {
            return Err(StorageError::upload("bucket unavailable"));
        }
        let url = format!("https://files.example/{category}/{filename}");
        self.stored
            .lock()
            .unwrap()
            .push((category.to_string(), filename.to_string()));
        Ok(url)
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Wishlist
// ════════════════════════════════════════════════════════════════════════════

#[derive(Default)]
pub struct InMemoryWishlist {
    entries: Mutex<Vec<WishlistEntry>>,
    next_id: AtomicI64,
}

impl InMemoryWishlist {
    pub fn new() -> Self {
        Self {
            entries: Mutex::new(Vec::new()),
            next_id: AtomicI64::new(1),
        }
    }
}

#[async_trait]
impl WishlistStore for InMemoryWishlist {
    async fn list(&self, user_id: UserId) -> Result<Vec<WishlistEntry>, DomainError> {
        Ok(self
            .entries
            .lock()
            .unwrap()
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
        let mut entries = self.entries.lock().unwrap();
        if let Some(existing) = entries
            .iter()
            .find(|e| e.user_id == user_id && e.item_type == item_type && e.item_id == item_id)
        {
            return Ok(WishlistAddOutcome::AlreadyPresent(existing.clone()));
        }
        let entry = WishlistEntry {
            id: WishlistId::new(self.next_id.fetch_add(1, Ordering::SeqCst)),
            user_id,
            item_type,
            item_id,
            created_at: Utc::now(),
        };
        entries.push(entry.clone());
        Ok(WishlistAddOutcome::Added(entry))
    }

    async fn find_by_id(&self, id: WishlistId) -> Result<Option<WishlistEntry>, DomainError> {
        Ok(self
            .entries
            .lock()
            .unwrap()
            .iter()
            .find(|e| e.id == id)
            .cloned())
    }

    async fn remove(&self, id: WishlistId) -> Result<(), DomainError> {
        let mut entries = self.entries.lock().unwrap();
        let before = entries.len();
        entries.retain(|e| e.id != id);
        if entries.len() == before {
            return Err(DomainError::new(
                ErrorCode::WishlistItemNotFound,
                "no such wishlist entry",
            ));
        }
        Ok(())
    }
}
