//! Product entity owned by a company.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::ValidationError;

/// Highest accepted unit price, in cents
pub const MAX_PRICE_CENTS: i64 = 100_000_000_000;

/// Highest accepted stock level
pub const MAX_STOCK: i32 = 1_000_000;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: Uuid,
    pub company_id: Uuid,
    pub name: String,
    pub description: String,
    /// Unit price in cents, always positive
    pub price_cents: i64,
    /// Units available, never negative
    pub stock: i32,
    /// Reference to an externally stored image
    pub image_url: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a product
#[derive(Debug, Clone)]
pub struct NewProduct {
    pub name: String,
    pub description: String,
    pub price_cents: i64,
    pub stock: i32,
    pub image_url: Option<String>,
}

/// Partial update; `None` leaves a field unchanged
#[derive(Debug, Clone, Default)]
pub struct ProductPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price_cents: Option<i64>,
    pub stock: Option<i32>,
    pub image_url: Option<String>,
    pub is_active: Option<bool>,
}

impl Product {
    pub fn new(company_id: Uuid, input: NewProduct) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            company_id,
            name: input.name.trim().to_string(),
            description: input.description,
            price_cents: input.price_cents,
            stock: input.stock,
            image_url: input.image_url,
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }

    /// Apply a patch in place
    pub fn apply(&mut self, patch: ProductPatch) {
        if let Some(name) = patch.name {
            self.name = name.trim().to_string();
        }
        if let Some(description) = patch.description {
            self.description = description;
        }
        if let Some(price) = patch.price_cents {
            self.price_cents = price;
        }
        if let Some(stock) = patch.stock {
            self.stock = stock;
        }
        if patch.image_url.is_some() {
            self.image_url = patch.image_url;
        }
        if let Some(active) = patch.is_active {
            self.is_active = active;
        }
        self.updated_at = Utc::now();
    }

    /// Name non-blank, price and stock inside their bounds
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::RequiredField {
                field: "name".to_string(),
            });
        }
        if self.price_cents <= 0 {
            return Err(ValidationError::OutOfRange {
                field: "priceCents".to_string(),
                min: 1,
            });
        }
        if self.price_cents > MAX_PRICE_CENTS {
            return Err(ValidationError::TooLarge {
                field: "priceCents".to_string(),
                max: MAX_PRICE_CENTS,
            });
        }
        if self.stock < 0 {
            return Err(ValidationError::OutOfRange {
                field: "stock".to_string(),
                min: 0,
            });
        }
        if self.stock > MAX_STOCK {
            return Err(ValidationError::TooLarge {
                field: "stock".to_string(),
                max: i64::from(MAX_STOCK),
            });
        }
        Ok(())
    }

    pub fn belongs_to(&self, company_id: Uuid) -> bool {
        self.company_id == company_id
    }
}
