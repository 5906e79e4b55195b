//! Orders between a client and one company

use actix_web::{web, HttpRequest, HttpResponse};
use uuid::Uuid;
use validator::Validate;

use crate::dto::order::{CreateOrderRequest, UpdateStatusRequest};
use crate::handlers::{extract_language, handle_domain_error_with_lang, handle_validation_errors};
use crate::middleware::auth::AuthContext;
use crate::state::AppState;

/// Handler for POST /pedidos (cliente only)
pub async fn create_order(
    req: HttpRequest,
    state: web::Data<AppState>,
    auth: AuthContext,
    request: web::Json<CreateOrderRequest>,
) -> HttpResponse {
    let lang = extract_language(&req);

    if let Err(errors) = request.validate() {
        return handle_validation_errors(&errors, lang);
    }

    match state
        .order_service
        .create_order(auth.principal, request.company_id, request.lines())
        .await
    {
        Ok(order) => HttpResponse::Created().json(order),
        Err(error) => handle_domain_error_with_lang(&error, lang),
    }
}

/// Handler for GET /pedidos
///
/// Clients see the orders they placed, companies the orders they received.
pub async fn list_orders(
    req: HttpRequest,
    state: web::Data<AppState>,
    auth: AuthContext,
) -> HttpResponse {
    match state.order_service.list_orders(auth.principal).await {
        Ok(orders) => HttpResponse::Ok().json(orders),
        Err(error) => handle_domain_error_with_lang(&error, extract_language(&req)),
    }
}

/// Handler for GET /pedidos/{id}
pub async fn get_order(
    req: HttpRequest,
    state: web::Data<AppState>,
    auth: AuthContext,
    path: web::Path<Uuid>,
) -> HttpResponse {
    match state
        .order_service
        .get_order(auth.principal, path.into_inner())
        .await
    {
        Ok(order) => HttpResponse::Ok().json(order),
        Err(error) => handle_domain_error_with_lang(&error, extract_language(&req)),
    }
}

/// Handler for PATCH /pedidos/{id}/estado
pub async fn update_order_status(
    req: HttpRequest,
    state: web::Data<AppState>,
    auth: AuthContext,
    path: web::Path<Uuid>,
    request: web::Json<UpdateStatusRequest>,
) -> HttpResponse {
    match state
        .order_service
        .update_status(auth.principal, path.into_inner(), request.status)
        .await
    {
        Ok(order) => HttpResponse::Ok().json(order),
        Err(error) => handle_domain_error_with_lang(&error, extract_language(&req)),
    }
}
