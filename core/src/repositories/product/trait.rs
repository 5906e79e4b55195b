//! Product catalog persistence.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::entities::Product;
use crate::errors::DomainError;

#[async_trait]
pub trait ProductRepository: Send + Sync {
    async fn create(&self, product: Product) -> Result<Product, DomainError>;

    /// Overwrite an existing product
    async fn update(&self, product: Product) -> Result<Product, DomainError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Product>, DomainError>;

    /// Products of one company; `active_only` hides deactivated ones
    async fn list_by_company(
        &self,
        company_id: Uuid,
        active_only: bool,
    ) -> Result<Vec<Product>, DomainError>;

    /// Every active product across companies
    async fn list_active(&self) -> Result<Vec<Product>, DomainError>;
}
