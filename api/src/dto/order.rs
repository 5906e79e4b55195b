use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use mp_core::domain::entities::{OrderLine, OrderStatus};

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItemRequest {
    pub product_id: Uuid,
    pub quantity: i32,
}

impl From<OrderItemRequest> for OrderLine {
    fn from(item: OrderItemRequest) -> Self {
        OrderLine {
            product_id: item.product_id,
            quantity: item.quantity,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderRequest {
    pub company_id: Uuid,

    #[validate(length(max = 100))]
    pub items: Vec<OrderItemRequest>,
}

impl CreateOrderRequest {
    pub fn lines(&self) -> Vec<OrderLine> {
        self.items.iter().copied().map(OrderLine::from).collect()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateStatusRequest {
    pub status: OrderStatus,
}
