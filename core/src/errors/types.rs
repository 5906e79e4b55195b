//! Domain-specific error types for authentication and related operations
//!
//! Every message carries an English and a Spanish rendering separated by ` | `.
//! The presentation layer picks one side based on the caller's language.

use thiserror::Error;

/// Authentication and registration errors with bilingual messages
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    #[error("Invalid email or password | Correo o contraseña incorrectos")]
    InvalidCredentials,

    /// Part of the public error taxonomy with its own code and status. Login
    /// never returns it and reports unverified accounts as `InvalidCredentials`.
    #[error("Account has not been verified | La cuenta no ha sido verificada")]
    AccountUnverified,

    #[error("Email is already registered | El correo ya está registrado")]
    EmailAlreadyRegistered,

    #[error("A registration for this email is already pending verification | Ya existe un registro pendiente de verificación para este correo")]
    DuplicatePendingRequest,

    #[error("Invalid or expired verification code | Código de verificación inválido o expirado")]
    InvalidOrExpiredCode,

    #[error("Pending registration data is corrupt. Please register again | Los datos del registro pendiente están dañados. Regístrese de nuevo")]
    CorruptPendingState,

    #[error("Could not send the verification email. Please try again later | No se pudo enviar el correo de verificación. Inténtelo más tarde")]
    VerificationEmailFailed,

    #[error("Insufficient permissions | Permisos insuficientes")]
    InsufficientPermissions,
}

/// Token-related errors with bilingual messages
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TokenError {
    #[error("Token expired | El token ha expirado")]
    TokenExpired,

    #[error("Invalid token format | Formato de token inválido")]
    InvalidTokenFormat,

    #[error("Token revoked | El token ha sido revocado")]
    TokenRevoked,

    #[error("Invalid refresh token | Token de actualización inválido")]
    InvalidRefreshToken,

    #[error("Token generation failed | Error al generar el token")]
    TokenGenerationFailed,
}

/// Validation errors with bilingual messages
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Field required: {field} | Campo obligatorio: {field}")]
    RequiredField { field: String },

    #[error("Invalid format for field: {field} | Formato inválido para el campo: {field}")]
    InvalidFormat { field: String },

    #[error("Field {field} must be at least {min} characters | El campo {field} debe tener al menos {min} caracteres")]
    TooShort { field: String, min: usize },

    #[error("Value out of range for field: {field} (min: {min}) | Valor fuera de rango para el campo: {field} (mínimo: {min})")]
    OutOfRange { field: String, min: i64 },

    #[error("Value too large for field: {field} (max: {max}) | Valor demasiado grande para el campo: {field} (máximo: {max})")]
    TooLarge { field: String, max: i64 },

    #[error("Invalid email format | Formato de correo inválido")]
    InvalidEmail,
}

/// Extract the English half of a bilingual message
pub fn extract_english_message(message: &str) -> &str {
    message.split(" | ").next().unwrap_or(message)
}

/// Extract the Spanish half of a bilingual message
pub fn extract_spanish_message(message: &str) -> &str {
    message.split(" | ").nth(1).unwrap_or(message)
}
