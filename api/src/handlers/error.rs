//! Maps domain errors to HTTP responses with localized messages

use actix_web::http::header;
use actix_web::http::StatusCode;
use actix_web::{HttpRequest, HttpResponse};
use validator::ValidationErrors;

use mp_core::errors::{
    extract_english_message, extract_spanish_message, AuthError, DomainError, TokenError,
    ValidationError,
};
use mp_shared::{error_codes, ErrorResponse, Language};

use crate::dto::ErrorResponseExt;

/// Detect language preference from the Accept-Language header
pub fn extract_language(req: &HttpRequest) -> Language {
    req.headers()
        .get(header::ACCEPT_LANGUAGE)
        .and_then(|value| value.to_str().ok())
        .map(Language::from_accept_language)
        .unwrap_or_default()
}

/// Pick one side of a bilingual `English | Spanish` message
pub fn localized(message: &str, lang: Language) -> String {
    match lang {
        Language::English => extract_english_message(message).to_string(),
        Language::Spanish => extract_spanish_message(message).to_string(),
    }
}

/// Choose between two literal translations
pub fn pick(lang: Language, en: &str, es: &str) -> String {
    match lang {
        Language::English => en.to_string(),
        Language::Spanish => es.to_string(),
    }
}

fn resource_name(resource: &str, lang: Language) -> String {
    match lang {
        Language::English => resource.to_string(),
        Language::Spanish => match resource {
            "product" => "producto",
            "order" => "pedido",
            "company" => "empresa",
            "notification" => "notificación",
            "account" => "cuenta",
            other => other,
        }
        .to_string(),
    }
}

fn auth_status(error: &AuthError) -> (StatusCode, &'static str) {
    match error {
        AuthError::InvalidCredentials => (StatusCode::UNAUTHORIZED, error_codes::INVALID_CREDENTIALS),
        AuthError::AccountUnverified => (StatusCode::FORBIDDEN, error_codes::ACCOUNT_UNVERIFIED),
        AuthError::EmailAlreadyRegistered => {
            (StatusCode::CONFLICT, error_codes::EMAIL_ALREADY_REGISTERED)
        }
        AuthError::DuplicatePendingRequest => {
            (StatusCode::CONFLICT, error_codes::DUPLICATE_PENDING_REQUEST)
        }
        AuthError::InvalidOrExpiredCode => {
            (StatusCode::BAD_REQUEST, error_codes::INVALID_OR_EXPIRED_CODE)
        }
        AuthError::CorruptPendingState => {
            (StatusCode::UNPROCESSABLE_ENTITY, error_codes::CORRUPT_PENDING_STATE)
        }
        AuthError::VerificationEmailFailed => {
            (StatusCode::SERVICE_UNAVAILABLE, error_codes::VERIFICATION_EMAIL_FAILED)
        }
        AuthError::InsufficientPermissions => {
            (StatusCode::FORBIDDEN, error_codes::INSUFFICIENT_PERMISSIONS)
        }
    }
}

fn token_status(error: &TokenError) -> (StatusCode, &'static str) {
    match error {
        TokenError::TokenExpired => (StatusCode::UNAUTHORIZED, error_codes::TOKEN_EXPIRED),
        TokenError::InvalidTokenFormat => (StatusCode::UNAUTHORIZED, error_codes::TOKEN_INVALID),
        TokenError::TokenRevoked => (StatusCode::UNAUTHORIZED, error_codes::TOKEN_REVOKED),
        TokenError::InvalidRefreshToken => {
            (StatusCode::UNAUTHORIZED, error_codes::INVALID_REFRESH_TOKEN)
        }
        TokenError::TokenGenerationFailed => {
            (StatusCode::INTERNAL_SERVER_ERROR, error_codes::OPERATION_FAILED)
        }
    }
}

fn validation_field(error: &ValidationError) -> Option<&str> {
    match error {
        ValidationError::RequiredField { field }
        | ValidationError::InvalidFormat { field }
        | ValidationError::TooShort { field, .. }
        | ValidationError::OutOfRange { field, .. }
        | ValidationError::TooLarge { field, .. } => Some(field.as_str()),
        ValidationError::InvalidEmail => Some("email"),
    }
}

fn operation_failed(lang: Language) -> HttpResponse {
    ErrorResponse::new(
        error_codes::OPERATION_FAILED,
        pick(
            lang,
            "The operation could not be completed. Please try again later",
            "No se pudo completar la operación. Inténtelo más tarde",
        ),
    )
    .to_response(StatusCode::INTERNAL_SERVER_ERROR)
}

/// Handle domain errors with language support
///
/// Internal failures are logged here and answered with a generic message.
pub fn handle_domain_error_with_lang(error: &DomainError, lang: Language) -> HttpResponse {
    match error {
        DomainError::Internal { message } => {
            log::error!("Internal error: {}", message);
            operation_failed(lang)
        }
        DomainError::Token(TokenError::TokenGenerationFailed) => {
            log::error!("Token generation failed");
            operation_failed(lang)
        }
        DomainError::Auth(auth_error) => {
            let (status, code) = auth_status(auth_error);
            log::debug!("Auth error [{}]: {}", code, auth_error);
            ErrorResponse::new(code, localized(&auth_error.to_string(), lang)).to_response(status)
        }
        DomainError::Token(token_error) => {
            let (status, code) = token_status(token_error);
            log::debug!("Token error [{}]: {}", code, token_error);
            ErrorResponse::new(code, localized(&token_error.to_string(), lang)).to_response(status)
        }
        DomainError::ValidationErr(validation_error) => {
            let mut response = ErrorResponse::new(
                error_codes::VALIDATION_ERROR,
                localized(&validation_error.to_string(), lang),
            );
            if let Some(field) = validation_field(validation_error) {
                response = response.add_detail("field", field);
            }
            response.to_response(StatusCode::BAD_REQUEST)
        }
        DomainError::Validation { message } => {
            ErrorResponse::new(error_codes::VALIDATION_ERROR, localized(message, lang))
                .to_response(StatusCode::BAD_REQUEST)
        }
        DomainError::NotFound { resource } => ErrorResponse::new(
            error_codes::NOT_FOUND,
            match lang {
                Language::English => format!("Resource not found: {}", resource_name(resource, lang)),
                Language::Spanish => {
                    format!("Recurso no encontrado: {}", resource_name(resource, lang))
                }
            },
        )
        .add_detail("resource", resource)
        .to_response(StatusCode::NOT_FOUND),
        DomainError::Conflict { message } => {
            ErrorResponse::new(error_codes::CONFLICT, localized(message, lang))
                .to_response(StatusCode::CONFLICT)
        }
    }
}

/// Render `validator` failures as a 400 with the offending fields
pub fn handle_validation_errors(errors: &ValidationErrors, lang: Language) -> HttpResponse {
    let field_errors = errors.field_errors();
    let fields: Vec<&str> = field_errors.keys().map(|k| k.as_ref()).collect();
    ErrorResponse::new(
        error_codes::VALIDATION_ERROR,
        pick(
            lang,
            "Invalid request data",
            "Datos de la solicitud inválidos",
        ),
    )
    .add_detail("fields", fields)
    .to_response(StatusCode::BAD_REQUEST)
}

/// Body for requests the JWT middleware rejects before any handler runs
pub fn unauthorized(lang: Language) -> HttpResponse {
    ErrorResponse::new(
        error_codes::UNAUTHORIZED,
        pick(lang, "Authentication required", "Se requiere autenticación"),
    )
    .to_response(StatusCode::UNAUTHORIZED)
}
