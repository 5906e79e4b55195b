use actix_web::{web, HttpRequest, HttpResponse};
use validator::Validate;

use crate::dto::auth::ResendCodeRequest;
use crate::dto::MessageResponse;
use crate::handlers::{
    extract_language, handle_domain_error_with_lang, handle_validation_errors, pick,
};
use crate::state::AppState;

/// Handler for POST /auth/resend-code
///
/// The answer is the same whether or not a registration was pending.
pub async fn resend_code(
    req: HttpRequest,
    state: web::Data<AppState>,
    request: web::Json<ResendCodeRequest>,
) -> HttpResponse {
    let lang = extract_language(&req);

    if let Err(errors) = request.validate() {
        return handle_validation_errors(&errors, lang);
    }

    match state
        .auth_service
        .resend_code(&request.email, request.kind)
        .await
    {
        Ok(()) => HttpResponse::Ok().json(MessageResponse::new(pick(
            lang,
            "If a registration is pending, a new code has been sent",
            "Si hay un registro pendiente, se ha enviado un nuevo código",
        ))),
        Err(error) => handle_domain_error_with_lang(&error, lang),
    }
}
