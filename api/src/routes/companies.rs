//! Public company directory

use actix_web::{web, HttpRequest, HttpResponse};
use uuid::Uuid;

use crate::handlers::{extract_language, handle_domain_error_with_lang};
use crate::state::AppState;

/// Handler for GET /empresas
pub async fn list_companies(req: HttpRequest, state: web::Data<AppState>) -> HttpResponse {
    match state.product_service.list_companies().await {
        Ok(companies) => HttpResponse::Ok().json(companies),
        Err(error) => handle_domain_error_with_lang(&error, extract_language(&req)),
    }
}

/// Handler for GET /empresas/{id}
pub async fn get_company(
    req: HttpRequest,
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> HttpResponse {
    match state.product_service.get_company(path.into_inner()).await {
        Ok(company) => HttpResponse::Ok().json(company),
        Err(error) => handle_domain_error_with_lang(&error, extract_language(&req)),
    }
}

/// Handler for GET /empresas/{id}/productos
///
/// Only active products are listed.
pub async fn list_company_products(
    req: HttpRequest,
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> HttpResponse {
    let lang = extract_language(&req);
    let company_id = path.into_inner();

    if let Err(error) = state.product_service.get_company(company_id).await {
        return handle_domain_error_with_lang(&error, lang);
    }

    match state.product_service.list_by_company(company_id).await {
        Ok(products) => HttpResponse::Ok().json(products),
        Err(error) => handle_domain_error_with_lang(&error, lang),
    }
}
