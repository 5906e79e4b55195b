use std::sync::Arc;

use actix_web::{web, HttpServer};
use anyhow::Context;
use log::{info, warn};

use mp_api::app::create_app;
use mp_api::config;
use mp_api::state::{AppState, Repositories};
use mp_infra::database::{
    DatabasePool, MySqlAccountRepository, MySqlNotificationRepository, MySqlOrderRepository,
    MySqlProductRepository, MySqlTokenRepository, MySqlVerificationCodeRepository,
};
use mp_infra::email::{create_email_service, EmailServiceAdapter};

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = config::load().context("Failed to load configuration")?;

    // RUST_LOG still wins over the configured level
    env_logger::init_from_env(
        env_logger::Env::new().default_filter_or(config.logging.level.as_str()),
    );

    info!("Starting Mercado API Server ({})", config.environment);
    if config.auth.jwt.is_using_default_secret() {
        warn!("JWT secret is the development default; set JWT_SECRET before deploying");
    }

    let database = DatabasePool::new(config.database.clone())
        .await
        .context("Failed to connect to the database")?;
    database
        .run_migrations()
        .await
        .context("Failed to run database migrations")?;
    info!("Database ready: {}", database.get_statistics());

    let pool = database.get_pool().clone();
    let repositories = Repositories {
        accounts: Arc::new(MySqlAccountRepository::new(pool.clone())),
        codes: Arc::new(MySqlVerificationCodeRepository::new(pool.clone())),
        tokens: Arc::new(MySqlTokenRepository::new(pool.clone())),
        products: Arc::new(MySqlProductRepository::new(pool.clone())),
        orders: Arc::new(MySqlOrderRepository::new(pool.clone())),
        notifications: Arc::new(MySqlNotificationRepository::new(pool)),
    };

    let email_adapter = Arc::new(EmailServiceAdapter::new(create_email_service(&config.email)));
    info!("Email provider: {}", email_adapter.provider_name());

    let state = web::Data::new(AppState::build(
        &config,
        repositories,
        email_adapter,
        Some(database.clone()),
    ));

    state.cleanup_service.clone().start_background_task();

    let bind_address = config.server.bind_address();
    info!("Server will bind to: {}", bind_address);

    let server_config = config.clone();
    let mut server = HttpServer::new(move || create_app(state.clone(), &server_config))
        .bind(&bind_address)
        .with_context(|| format!("Failed to bind {}", bind_address))?;
    if config.server.workers > 0 {
        server = server.workers(config.server.workers);
    }

    server.run().await?;

    database.close().await;
    info!("Server stopped");
    Ok(())
}
