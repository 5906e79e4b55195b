//! Order persistence.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::entities::{Order, OrderStatus};
use crate::errors::DomainError;

#[async_trait]
pub trait OrderRepository: Send + Sync {
    /// Persist an order with its items and decrement stock for every item
    ///
    /// Atomic. When any product lacks stock the call fails with
    /// `DomainError::Conflict` and nothing is written.
    async fn create_with_items(&self, order: Order) -> Result<Order, DomainError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Order>, DomainError>;

    async fn list_by_client(&self, client_id: Uuid) -> Result<Vec<Order>, DomainError>;

    async fn list_by_company(&self, company_id: Uuid) -> Result<Vec<Order>, DomainError>;

    /// Move an order from `from` to `to`
    ///
    /// Conditional on the stored status still being `from`; returns `false`
    /// otherwise. Moving to `Cancelado` returns the items to stock in the same
    /// unit of work.
    async fn update_status(
        &self,
        id: Uuid,
        from: OrderStatus,
        to: OrderStatus,
    ) -> Result<bool, DomainError>;
}
