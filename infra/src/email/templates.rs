//! Message copy for transactional emails

/// Rendered email ready to hand to a provider
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailContent {
    pub subject: String,
    pub html: String,
    pub text: String,
}

/// Human wording for a validity window
pub fn describe_window(seconds: i64) -> String {
    match seconds {
        s if s < 60 => format!("{} segundos", s.max(0)),
        60 => "1 minuto".to_string(),
        s if s % 60 == 0 => format!("{} minutos", s / 60),
        s => format!("{} segundos", s),
    }
}

pub fn verification_email(code: &str, expires_in_seconds: i64) -> EmailContent {
    let window = describe_window(expires_in_seconds);
    EmailContent {
        subject: "Tu código de verificación de Mercado".to_string(),
        html: format!(
            "<p>Tu código de verificación es:</p>\
             <p style=\"font-size:24px;font-weight:bold;letter-spacing:4px\">{}</p>\
             <p>El código vence en {}. Si no solicitaste este registro, ignora este mensaje.</p>",
            code, window
        ),
        text: format!(
            "Tu código de verificación es {}. El código vence en {}.",
            code, window
        ),
    }
}

pub fn welcome_email(name: &str) -> EmailContent {
    EmailContent {
        subject: "Bienvenido a Mercado".to_string(),
        html: format!(
            "<p>Hola {},</p><p>Tu cuenta ya está verificada. ¡Gracias por unirte a Mercado!</p>",
            name
        ),
        text: format!(
            "Hola {}, tu cuenta ya está verificada. ¡Gracias por unirte a Mercado!",
            name
        ),
    }
}
