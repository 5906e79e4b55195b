use actix_web::{web, HttpRequest, HttpResponse};
use validator::Validate;

use mp_shared::Language;

use crate::dto::auth::{RegisterClientRequest, RegisterCompanyRequest, RegisterResponse};
use crate::handlers::{
    extract_language, handle_domain_error_with_lang, handle_validation_errors, pick,
};
use crate::state::AppState;

fn code_sent(lang: Language) -> String {
    pick(
        lang,
        "Verification code sent. Check your email to finish registering",
        "Código de verificación enviado. Revise su correo para completar el registro",
    )
}

/// Handler for POST /auth/register/cliente
///
/// Nothing is persisted as an account yet; the response says where the code
/// went and how long it is valid.
pub async fn register_client(
    req: HttpRequest,
    state: web::Data<AppState>,
    request: web::Json<RegisterClientRequest>,
) -> HttpResponse {
    let lang = extract_language(&req);

    if let Err(errors) = request.validate() {
        return handle_validation_errors(&errors, lang);
    }

    match state
        .auth_service
        .register_client(&request.email, &request.name, &request.password)
        .await
    {
        Ok(receipt) => HttpResponse::Created().json(RegisterResponse::new(code_sent(lang), receipt)),
        Err(error) => handle_domain_error_with_lang(&error, lang),
    }
}

/// Handler for POST /auth/register/empresa
pub async fn register_company(
    req: HttpRequest,
    state: web::Data<AppState>,
    request: web::Json<RegisterCompanyRequest>,
) -> HttpResponse {
    let lang = extract_language(&req);

    if let Err(errors) = request.validate() {
        return handle_validation_errors(&errors, lang);
    }

    let request = request.into_inner();
    match state
        .auth_service
        .register_company(&request.email, &request.name, &request.password, request.logo)
        .await
    {
        Ok(receipt) => HttpResponse::Created().json(RegisterResponse::new(code_sent(lang), receipt)),
        Err(error) => handle_domain_error_with_lang(&error, lang),
    }
}
