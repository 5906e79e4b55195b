//! Error translation shared by every route

pub mod error;

pub use error::{
    extract_language, handle_domain_error_with_lang, handle_validation_errors, localized,
    pick, unauthorized,
};
