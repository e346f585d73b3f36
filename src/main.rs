//! Beatstack server entry point.

use std::sync::Arc;

use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use beatstack::adapters::auth::{FirebaseTokenVerifier, MockIdentityVerifier};
use beatstack::adapters::document::ContractDocumentRenderer;
use beatstack::adapters::exchange_rate::ExchangeRateClient;
use beatstack::adapters::http::{api_router, AppState};
use beatstack::adapters::paystack::{PaystackConfig, PaystackGateway};
use beatstack::adapters::postgres::{
    PostgresCatalogStore, PostgresDiscountStore, PostgresFulfillmentStore, PostgresPaymentStore,
    PostgresSaleStore, PostgresUserStore, PostgresWishlistStore,
};
use beatstack::adapters::storage::{HttpObjectStorage, LocalObjectStorage};
use beatstack::application::authentication::Authenticator;
use beatstack::application::checkout::InitiateCheckout;
use beatstack::application::discounts::DiscountService;
use beatstack::application::file_access::AuthorizeFileAccess;
use beatstack::application::fulfillment::FulfillPayment;
use beatstack::application::history::PurchaseHistory;
use beatstack::application::pricing::PriceQuoter;
use beatstack::application::wishlist::WishlistService;
use beatstack::config::{AppConfig, StorageBackend};
use beatstack::domain::payment::WebhookVerifier;
use beatstack::ports::{
    CurrencyConverter, IdentityVerifier, ObjectStorage, PaymentGateway,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::load()?;
    config.validate()?;

    let pool = PgPoolOptions::new()
        .max_connections(config.database.max_connections)
        .connect(&config.database.url)
        .await?;

    sqlx::migrate!("./migrations").run(&pool).await?;

    // Stores
    let catalog = Arc::new(PostgresCatalogStore::new(pool.clone()));
    let discounts_store = Arc::new(PostgresDiscountStore::new(pool.clone()));
    let payments = Arc::new(PostgresPaymentStore::new(pool.clone()));
    let fulfillment_store = Arc::new(PostgresFulfillmentStore::new(pool.clone()));
    let sales = Arc::new(PostgresSaleStore::new(pool.clone()));
    let users = Arc::new(PostgresUserStore::new(pool.clone()));
    let wishlist_store = Arc::new(PostgresWishlistStore::new(pool.clone()));

    // External collaborators, constructed once and injected.
    let identity_verifier: Arc<dyn IdentityVerifier> = if config.auth.use_mock_verifier {
        tracing::warn!("Using mock identity verifier; development only");
        Arc::new(MockIdentityVerifier)
    } else {
        Arc::new(FirebaseTokenVerifier::new(
            config.auth.firebase_project_id.clone(),
        ))
    };

    let gateway: Arc<dyn PaymentGateway> = Arc::new(PaystackGateway::new(PaystackConfig::new(
        config.payment.paystack_secret_key.clone(),
    )));

    let converter: Arc<dyn CurrencyConverter> = Arc::new(ExchangeRateClient::new(
        config.currency.rate_api_url.clone(),
    ));

    let storage: Arc<dyn ObjectStorage> = match config.storage.backend {
        StorageBackend::Local => Arc::new(LocalObjectStorage::new(
            config.storage.local_path.clone(),
            config.storage.public_base_url.clone(),
        )),
        StorageBackend::Http => Arc::new(HttpObjectStorage::new(
            config.storage.upload_base_url.clone(),
            config.storage.api_key.clone(),
        )),
    };

    // Application services
    let quoter = PriceQuoter::new(
        catalog.clone(),
        discounts_store.clone(),
        converter,
        config.payment.settlement_currency.clone(),
    );

    let state = AppState {
        authenticator: Arc::new(Authenticator::new(identity_verifier, users.clone())),
        checkout: Arc::new(InitiateCheckout::new(
            quoter,
            payments.clone(),
            gateway,
        )),
        fulfillment: Arc::new(FulfillPayment::new(
            WebhookVerifier::new(config.payment.paystack_secret_key.clone()),
            payments,
            catalog.clone(),
            sales.clone(),
            fulfillment_store,
            users.clone(),
            Arc::new(ContractDocumentRenderer),
            storage,
        )),
        file_access: Arc::new(AuthorizeFileAccess::new(catalog.clone(), sales.clone())),
        history: Arc::new(PurchaseHistory::new(sales, catalog.clone(), users)),
        wishlist: Arc::new(WishlistService::new(wishlist_store, catalog.clone())),
        discounts: Arc::new(DiscountService::new(discounts_store, catalog)),
    };

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, test_mode = config.payment.is_test_mode(), "Beatstack listening");

    axum::serve(listener, api_router(state)).await?;

    Ok(())
}
