use actix_web::{web, HttpRequest, HttpResponse};
use validator::Validate;

use mp_core::errors::{AuthError, DomainError};

use crate::dto::auth::LoginRequest;
use crate::handlers::{extract_language, handle_domain_error_with_lang};
use crate::state::AppState;

/// Handler for POST /auth/login
///
/// Every failure, malformed input included, is answered with
/// `invalid_credentials` so callers cannot probe which accounts exist.
pub async fn login(
    req: HttpRequest,
    state: web::Data<AppState>,
    request: web::Json<LoginRequest>,
) -> HttpResponse {
    let lang = extract_language(&req);

    if request.validate().is_err() {
        return handle_domain_error_with_lang(
            &DomainError::Auth(AuthError::InvalidCredentials),
            lang,
        );
    }

    match state
        .auth_service
        .login(&request.email, &request.password)
        .await
    {
        Ok(pair) => HttpResponse::Ok().json(pair),
        Err(_) => handle_domain_error_with_lang(
            &DomainError::Auth(AuthError::InvalidCredentials),
            lang,
        ),
    }
}
