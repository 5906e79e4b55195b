//! Product catalogue; reads are public, writes belong to the owning company

use actix_web::{web, HttpRequest, HttpResponse};
use uuid::Uuid;
use validator::Validate;

use crate::dto::catalog::{CreateProductRequest, UpdateProductRequest};
use crate::handlers::{extract_language, handle_domain_error_with_lang, handle_validation_errors};
use crate::middleware::auth::AuthContext;
use crate::state::AppState;

/// Handler for GET /productos
pub async fn list_products(req: HttpRequest, state: web::Data<AppState>) -> HttpResponse {
    match state.product_service.list_active().await {
        Ok(products) => HttpResponse::Ok().json(products),
        Err(error) => handle_domain_error_with_lang(&error, extract_language(&req)),
    }
}

/// Handler for GET /productos/{id}
pub async fn get_product(
    req: HttpRequest,
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> HttpResponse {
    match state.product_service.get_product(path.into_inner()).await {
        Ok(product) => HttpResponse::Ok().json(product),
        Err(error) => handle_domain_error_with_lang(&error, extract_language(&req)),
    }
}

/// Handler for POST /productos (empresa only)
pub async fn create_product(
    req: HttpRequest,
    state: web::Data<AppState>,
    auth: AuthContext,
    request: web::Json<CreateProductRequest>,
) -> HttpResponse {
    let lang = extract_language(&req);

    if let Err(errors) = request.validate() {
        return handle_validation_errors(&errors, lang);
    }

    match state
        .product_service
        .create_product(auth.principal, request.into_inner().into())
        .await
    {
        Ok(product) => HttpResponse::Created().json(product),
        Err(error) => handle_domain_error_with_lang(&error, lang),
    }
}

/// Handler for PUT /productos/{id} (owning empresa only)
pub async fn update_product(
    req: HttpRequest,
    state: web::Data<AppState>,
    auth: AuthContext,
    path: web::Path<Uuid>,
    request: web::Json<UpdateProductRequest>,
) -> HttpResponse {
    let lang = extract_language(&req);

    if let Err(errors) = request.validate() {
        return handle_validation_errors(&errors, lang);
    }

    match state
        .product_service
        .update_product(auth.principal, path.into_inner(), request.into_inner().into())
        .await
    {
        Ok(product) => HttpResponse::Ok().json(product),
        Err(error) => handle_domain_error_with_lang(&error, lang),
    }
}
