//! Persisted notifications of the authenticated account

use actix_web::{web, HttpRequest, HttpResponse};
use uuid::Uuid;

use crate::dto::MessageResponse;
use crate::handlers::{extract_language, handle_domain_error_with_lang, pick};
use crate::middleware::auth::AuthContext;
use crate::state::AppState;

/// Handler for GET /notificaciones
pub async fn list_notifications(
    req: HttpRequest,
    state: web::Data<AppState>,
    auth: AuthContext,
) -> HttpResponse {
    match state
        .notification_service
        .list_for_user(auth.principal.id)
        .await
    {
        Ok(notifications) => HttpResponse::Ok().json(notifications),
        Err(error) => handle_domain_error_with_lang(&error, extract_language(&req)),
    }
}

/// Handler for PATCH /notificaciones/{id}/leida
pub async fn mark_notification_read(
    req: HttpRequest,
    state: web::Data<AppState>,
    auth: AuthContext,
    path: web::Path<Uuid>,
) -> HttpResponse {
    let lang = extract_language(&req);

    match state
        .notification_service
        .mark_read(auth.principal.id, path.into_inner())
        .await
    {
        Ok(()) => HttpResponse::Ok().json(MessageResponse::new(pick(
            lang,
            "Notification marked as read",
            "Notificación marcada como leída",
        ))),
        Err(error) => handle_domain_error_with_lang(&error, lang),
    }
}
