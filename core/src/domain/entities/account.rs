//! Account entity shared by clients and companies.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The two kinds of account the marketplace knows about
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountKind {
    /// A client buying from companies
    #[serde(alias = "client")]
    Cliente,
    /// A company selling products
    #[serde(alias = "company")]
    Empresa,
}

impl AccountKind {
    /// Lookup order used by login
    pub const ALL: [AccountKind; 2] = [AccountKind::Cliente, AccountKind::Empresa];

    /// Wire and storage name
    pub fn as_str(&self) -> &'static str {
        match self {
            AccountKind::Cliente => "cliente",
            AccountKind::Empresa => "empresa",
        }
    }
}

impl std::fmt::Display for AccountKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for AccountKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "cliente" | "client" => Ok(AccountKind::Cliente),
            "empresa" | "company" => Ok(AccountKind::Empresa),
            other => Err(format!("Unknown account kind: {}", other)),
        }
    }
}

/// A verified account, created only by consuming a verification code
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Account {
    pub id: Uuid,
    pub kind: AccountKind,
    /// Lower-cased and trimmed, unique per kind
    pub email: String,
    pub name: String,
    /// bcrypt hash, never the plaintext
    pub password_hash: String,
    pub is_verified: bool,
    /// Company logo reference; always `None` for clients
    pub logo: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Account {
    /// Creates a verified account of the given kind
    pub fn new_verified(
        kind: AccountKind,
        email: String,
        name: String,
        password_hash: String,
        logo: Option<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            kind,
            email,
            name,
            password_hash,
            is_verified: true,
            logo: match kind {
                AccountKind::Empresa => logo,
                AccountKind::Cliente => None,
            },
            created_at: now,
            updated_at: now,
        }
    }

    /// Public projection without credentials
    pub fn view(&self) -> AccountView {
        AccountView {
            id: self.id,
            email: self.email.clone(),
            name: self.name.clone(),
            kind: self.kind,
            logo: self.logo.clone(),
        }
    }

    pub fn principal(&self) -> Principal {
        Principal {
            id: self.id,
            kind: self.kind,
        }
    }

    pub fn is_company(&self) -> bool {
        self.kind == AccountKind::Empresa
    }
}

/// Public view of an account
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountView {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    pub kind: AccountKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logo: Option<String>,
}

/// The authenticated party behind a request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Principal {
    pub id: Uuid,
    pub kind: AccountKind,
}

impl Principal {
    pub fn new(id: Uuid, kind: AccountKind) -> Self {
        Self { id, kind }
    }

    pub fn is_client(&self) -> bool {
        self.kind == AccountKind::Cliente
    }

    pub fn is_company(&self) -> bool {
        self.kind == AccountKind::Empresa
    }
}
