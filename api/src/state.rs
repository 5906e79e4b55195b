//! Shared application state handed to every handler

use std::sync::Arc;

use mp_core::repositories::{
    AccountRepository, NotificationRepository, OrderRepository, ProductRepository,
    TokenRepository, VerificationCodeRepository,
};
use mp_core::services::{
    AuthService, AuthServiceConfig, CleanupService, CleanupServiceConfig, EmailServiceTrait,
    NotificationHub, NotificationService, OrderService, ProductService, TokenService,
    TokenServiceConfig, VerificationService, VerificationServiceConfig,
};
use mp_infra::database::DatabasePool;
use mp_shared::AppConfig;

/// Services used by the route handlers
pub struct AppState {
    pub auth_service: Arc<AuthService>,
    pub token_service: Arc<TokenService>,
    pub product_service: Arc<ProductService>,
    pub order_service: Arc<OrderService>,
    pub notification_service: Arc<NotificationService>,
    pub cleanup_service: Arc<CleanupService>,
    /// Probed by `/health`; absent when running on the in-memory store
    pub database: Option<DatabasePool>,
}

/// Storage backends the services are built on
pub struct Repositories {
    pub accounts: Arc<dyn AccountRepository>,
    pub codes: Arc<dyn VerificationCodeRepository>,
    pub tokens: Arc<dyn TokenRepository>,
    pub products: Arc<dyn ProductRepository>,
    pub orders: Arc<dyn OrderRepository>,
    pub notifications: Arc<dyn NotificationRepository>,
}

impl Repositories {
    /// Use one store for every trait
    pub fn from_store<S>(store: S) -> Self
    where
        S: AccountRepository
            + VerificationCodeRepository
            + TokenRepository
            + ProductRepository
            + OrderRepository
            + NotificationRepository
            + Clone
            + 'static,
    {
        Self {
            accounts: Arc::new(store.clone()),
            codes: Arc::new(store.clone()),
            tokens: Arc::new(store.clone()),
            products: Arc::new(store.clone()),
            orders: Arc::new(store.clone()),
            notifications: Arc::new(store),
        }
    }
}

impl AppState {
    /// Build every service from configuration and storage
    pub fn build(
        config: &AppConfig,
        repositories: Repositories,
        email_service: Arc<dyn EmailServiceTrait>,
        database: Option<DatabasePool>,
    ) -> Self {
        let verification_service = Arc::new(VerificationService::new(
            repositories.accounts.clone(),
            repositories.codes.clone(),
            email_service,
            VerificationServiceConfig::from(&config.verification),
        ));
        let token_service = Arc::new(TokenService::new(
            repositories.tokens.clone(),
            TokenServiceConfig::from(&config.auth.jwt),
        ));
        let auth_service = Arc::new(AuthService::new(
            repositories.accounts.clone(),
            verification_service.clone(),
            token_service.clone(),
            AuthServiceConfig::from(&config.auth),
        ));

        let hub = Arc::new(NotificationHub::new());
        let notification_service = Arc::new(NotificationService::new(
            repositories.notifications.clone(),
            hub,
        ));
        let product_service = Arc::new(ProductService::new(
            repositories.accounts.clone(),
            repositories.products.clone(),
        ));
        let order_service = Arc::new(OrderService::new(
            repositories.orders.clone(),
            repositories.products.clone(),
            repositories.accounts.clone(),
            notification_service.clone(),
        ));
        let cleanup_service = Arc::new(CleanupService::new(
            verification_service,
            repositories.tokens,
            CleanupServiceConfig::from(&config.cleanup),
        ));

        Self {
            auth_service,
            token_service,
            product_service,
            order_service,
            notification_service,
            cleanup_service,
            database,
        }
    }
}
