use actix_web::{web, HttpRequest, HttpResponse};
use validator::Validate;

use mp_core::errors::AuthError;

use crate::dto::auth::{VerifyCodeRequest, VerifyCodeResponse};
use crate::handlers::{extract_language, handle_domain_error_with_lang, pick};
use crate::state::AppState;

/// Handler for POST /auth/verify
///
/// A code that is not six characters long can never match, so it gets the
/// same answer as a wrong one.
pub async fn verify_code(
    req: HttpRequest,
    state: web::Data<AppState>,
    request: web::Json<VerifyCodeRequest>,
) -> HttpResponse {
    let lang = extract_language(&req);

    if request.validate().is_err() {
        return handle_domain_error_with_lang(&AuthError::InvalidOrExpiredCode.into(), lang);
    }

    match state
        .auth_service
        .verify_code(&request.email, &request.code, request.kind)
        .await
    {
        Ok(account) => HttpResponse::Ok().json(VerifyCodeResponse {
            message: pick(
                lang,
                "Account verified. You can now log in",
                "Cuenta verificada. Ya puede iniciar sesión",
            ),
            is_verified: true,
            account: Some(account),
        }),
        Err(error) => handle_domain_error_with_lang(&error, lang),
    }
}
