use actix_web::{web, HttpRequest, HttpResponse};

use crate::dto::auth::LogoutRequest;
use crate::dto::MessageResponse;
use crate::handlers::{extract_language, handle_domain_error_with_lang, pick};
use crate::middleware::auth::AuthContext;
use crate::state::AppState;

/// Handler for POST /auth/logout
///
/// Revokes the bearer access token and, when the body names one, the
/// caller's refresh token. The body is optional.
pub async fn logout(
    req: HttpRequest,
    state: web::Data<AppState>,
    auth: AuthContext,
    body: Option<web::Json<LogoutRequest>>,
) -> HttpResponse {
    let lang = extract_language(&req);
    let request = body.map(web::Json::into_inner).unwrap_or_default();

    match state
        .auth_service
        .logout(&auth.claims, request.refresh_token.as_deref())
        .await
    {
        Ok(()) => HttpResponse::Ok().json(MessageResponse::new(pick(
            lang,
            "Logged out successfully",
            "Sesión cerrada correctamente",
        ))),
        Err(error) => handle_domain_error_with_lang(&error, lang),
    }
}
