use actix_web::{web, HttpRequest, HttpResponse};

use crate::dto::auth::RefreshTokenRequest;
use crate::handlers::{extract_language, handle_domain_error_with_lang};
use crate::state::AppState;

/// Handler for POST /auth/refresh
///
/// The presented refresh token is revoked and a new pair returned.
pub async fn refresh(
    req: HttpRequest,
    state: web::Data<AppState>,
    request: web::Json<RefreshTokenRequest>,
) -> HttpResponse {
    let lang = extract_language(&req);

    match state.auth_service.refresh(&request.refresh_token).await {
        Ok(pair) => HttpResponse::Ok().json(pair),
        Err(error) => handle_domain_error_with_lang(&error, lang),
    }
}
