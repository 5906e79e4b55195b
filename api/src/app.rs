//! Application factory
//!
//! Builds the actix-web `App` with middleware, extractor configuration and
//! every route. Both the binary and the integration tests go through
//! [`create_app`].

use actix_web::{
    body::MessageBody,
    dev::{ServiceFactory, ServiceRequest, ServiceResponse},
    error::InternalError,
    http::StatusCode,
    middleware::Logger,
    web, App, HttpRequest, HttpResponse,
};

use mp_shared::{error_codes, AppConfig, ErrorResponse};

use crate::dto::ErrorResponseExt;
use crate::handlers::{extract_language, pick};
use crate::middleware::{create_cors, JwtAuth, SecurityMiddleware};
use crate::routes::{auth, companies, health, notifications, orders, products, ws};
use crate::state::AppState;

/// Create and configure the application with all dependencies
pub fn create_app(
    state: web::Data<AppState>,
    config: &AppConfig,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse<impl MessageBody>,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let cors = create_cors(&config.cors);
    let security = SecurityMiddleware::for_environment(config.environment);

    App::new()
        .app_data(state)
        .app_data(json_config(config.server.max_payload_size))
        .app_data(path_config())
        // Last wrapped runs first: security, then CORS, then logging
        .wrap(Logger::default())
        .wrap(cors)
        .wrap(security)
        .route("/health", web::get().to(health::health_check))
        .route("/ws", web::get().to(ws::notifications_ws))
        .service(
            web::scope("/auth")
                .route("/login", web::post().to(auth::login))
                .route("/register/cliente", web::post().to(auth::register_client))
                .route("/register/empresa", web::post().to(auth::register_company))
                .route("/verify", web::post().to(auth::verify_code))
                .route("/resend-code", web::post().to(auth::resend_code))
                .route("/refresh", web::post().to(auth::refresh))
                .route(
                    "/logout",
                    web::post().to(auth::logout).wrap(JwtAuth::new()),
                ),
        )
        .service(
            web::scope("/empresas")
                .route("", web::get().to(companies::list_companies))
                .route("/{id}", web::get().to(companies::get_company))
                .route(
                    "/{id}/productos",
                    web::get().to(companies::list_company_products),
                ),
        )
        .service(
            web::scope("/productos")
                .route("", web::get().to(products::list_products))
                .route(
                    "",
                    web::post().to(products::create_product).wrap(JwtAuth::new()),
                )
                .route("/{id}", web::get().to(products::get_product))
                .route(
                    "/{id}",
                    web::put().to(products::update_product).wrap(JwtAuth::new()),
                ),
        )
        .service(
            web::scope("/pedidos")
                .wrap(JwtAuth::new())
                .route("", web::post().to(orders::create_order))
                .route("", web::get().to(orders::list_orders))
                .route("/{id}", web::get().to(orders::get_order))
                .route("/{id}/estado", web::patch().to(orders::update_order_status)),
        )
        .service(
            web::scope("/notificaciones")
                .wrap(JwtAuth::new())
                .route("", web::get().to(notifications::list_notifications))
                .route(
                    "/{id}/leida",
                    web::patch().to(notifications::mark_notification_read),
                ),
        )
        .default_service(web::route().to(not_found))
}

/// Malformed or oversized JSON bodies answer with a `validation_error` body
fn json_config(limit: usize) -> web::JsonConfig {
    web::JsonConfig::default()
        .limit(limit)
        .error_handler(|err, req| {
            let lang = extract_language(req);
            let body = ErrorResponse::new(
                error_codes::VALIDATION_ERROR,
                pick(
                    lang,
                    "Request body is not valid JSON for this endpoint",
                    "El cuerpo de la solicitud no es un JSON válido para este endpoint",
                ),
            )
            .add_detail("reason", err.to_string())
            .to_response(StatusCode::BAD_REQUEST);
            InternalError::from_response(err, body).into()
        })
}

/// Ids that are not UUIDs cannot name anything
fn path_config() -> web::PathConfig {
    web::PathConfig::default().error_handler(|err, req| {
        InternalError::from_response(err, not_found_response(req)).into()
    })
}

fn not_found_response(req: &HttpRequest) -> HttpResponse {
    ErrorResponse::new(
        error_codes::NOT_FOUND,
        pick(
            extract_language(req),
            "The requested resource was not found",
            "No se encontró el recurso solicitado",
        ),
    )
    .to_response(StatusCode::NOT_FOUND)
}

/// Default 404 handler
async fn not_found(req: HttpRequest) -> HttpResponse {
    not_found_response(&req)
}
