//! Orders (pedidos) placed by clients with a single company.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::{DomainResult, ValidationError};

/// Order lifecycle
///
/// `Pendiente -> Confirmado -> Enviado -> Entregado`, and `Pendiente | Confirmado -> Cancelado`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    #[serde(alias = "pending")]
    Pendiente,
    #[serde(alias = "confirmed")]
    Confirmado,
    #[serde(alias = "shipped")]
    Enviado,
    #[serde(alias = "delivered")]
    Entregado,
    #[serde(alias = "cancelled")]
    Cancelado,
}

impl OrderStatus {
    pub fn can_transition_to(self, next: OrderStatus) -> bool {
        use OrderStatus::*;
        matches!(
            (self, next),
            (Pendiente, Confirmado)
                | (Confirmado, Enviado)
                | (Enviado, Entregado)
                | (Pendiente, Cancelado)
                | (Confirmado, Cancelado)
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pendiente => "pendiente",
            OrderStatus::Confirmado => "confirmado",
            OrderStatus::Enviado => "enviado",
            OrderStatus::Entregado => "entregado",
            OrderStatus::Cancelado => "cancelado",
        }
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for OrderStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pendiente" | "pending" => Ok(OrderStatus::Pendiente),
            "confirmado" | "confirmed" => Ok(OrderStatus::Confirmado),
            "enviado" | "shipped" => Ok(OrderStatus::Enviado),
            "entregado" | "delivered" => Ok(OrderStatus::Entregado),
            "cancelado" | "cancelled" => Ok(OrderStatus::Cancelado),
            other => Err(format!("Unknown order status: {}", other)),
        }
    }
}

/// Requested product and quantity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderLine {
    pub product_id: Uuid,
    pub quantity: i32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    pub id: Uuid,
    pub order_id: Uuid,
    pub product_id: Uuid,
    pub quantity: i32,
    /// Price captured when the order was placed
    pub unit_price_cents: i64,
    pub subtotal_cents: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: Uuid,
    pub client_id: Uuid,
    pub company_id: Uuid,
    pub status: OrderStatus,
    /// Sum of item subtotals
    pub total_cents: i64,
    pub items: Vec<OrderItem>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Order {
    /// Build a pending order from priced lines `(product_id, quantity, unit_price_cents)`
    ///
    /// Fails when a subtotal or the total does not fit in an `i64`.
    pub fn new(
        client_id: Uuid,
        company_id: Uuid,
        priced: &[(Uuid, i32, i64)],
    ) -> DomainResult<Self> {
        let id = Uuid::new_v4();
        let mut items = Vec::with_capacity(priced.len());
        let mut total_cents: i64 = 0;
        for &(product_id, quantity, unit_price_cents) in priced {
            let subtotal_cents = i64::from(quantity)
                .checked_mul(unit_price_cents)
                .ok_or_else(|| too_large("subtotalCents"))?;
            total_cents = total_cents
                .checked_add(subtotal_cents)
                .ok_or_else(|| too_large("totalCents"))?;
            items.push(OrderItem {
                id: Uuid::new_v4(),
                order_id: id,
                product_id,
                quantity,
                unit_price_cents,
                subtotal_cents,
            });
        }
        let now = Utc::now();

        Ok(Self {
            id,
            client_id,
            company_id,
            status: OrderStatus::Pendiente,
            total_cents,
            items,
            created_at: now,
            updated_at: now,
        })
    }

    /// Whether `account_id` is the client or the company of this order
    pub fn involves(&self, account_id: Uuid) -> bool {
        self.client_id == account_id || self.company_id == account_id
    }
}

fn too_large(field: &str) -> ValidationError {
    ValidationError::TooLarge {
        field: field.to_string(),
        max: i64::MAX,
    }
}
