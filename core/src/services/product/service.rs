//! Product catalog service

use std::sync::Arc;

use uuid::Uuid;

use crate::domain::entities::{AccountKind, AccountView, NewProduct, Principal, Product, ProductPatch};
use crate::errors::{AuthError, DomainError, DomainResult};
use crate::repositories::{AccountRepository, ProductRepository};

/// Companies manage their own products; anyone can browse active ones
pub struct ProductService {
    accounts: Arc<dyn AccountRepository>,
    products: Arc<dyn ProductRepository>,
}

impl ProductService {
    pub fn new(accounts: Arc<dyn AccountRepository>, products: Arc<dyn ProductRepository>) -> Self {
        Self { accounts, products }
    }

    /// Create a product owned by the calling company
    pub async fn create_product(
        &self,
        caller: Principal,
        input: NewProduct,
    ) -> DomainResult<Product> {
        if !caller.is_company() {
            return Err(AuthError::InsufficientPermissions.into());
        }

        let product = Product::new(caller.id, input);
        product.validate()?;
        let product = self.products.create(product).await?;

        tracing::info!(
            product_id = %product.id,
            company_id = %caller.id,
            event = "product_created",
            "Product created"
        );
        Ok(product)
    }

    /// Update a product; other companies' products look missing
    pub async fn update_product(
        &self,
        caller: Principal,
        product_id: Uuid,
        patch: ProductPatch,
    ) -> DomainResult<Product> {
        if !caller.is_company() {
            return Err(AuthError::InsufficientPermissions.into());
        }

        let mut product = self
            .products
            .find_by_id(product_id)
            .await?
            .filter(|p| p.belongs_to(caller.id))
            .ok_or_else(|| DomainError::not_found("product"))?;

        product.apply(patch);
        product.validate()?;
        let product = self.products.update(product).await?;

        tracing::info!(product_id = %product.id, event = "product_updated", "Product updated");
        Ok(product)
    }

    pub async fn get_product(&self, id: Uuid) -> DomainResult<Product> {
        self.products
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found("product"))
    }

    /// Active products of one company
    pub async fn list_by_company(&self, company_id: Uuid) -> DomainResult<Vec<Product>> {
        self.products.list_by_company(company_id, true).await
    }

    pub async fn list_active(&self) -> DomainResult<Vec<Product>> {
        self.products.list_active().await
    }

    pub async fn list_companies(&self) -> DomainResult<Vec<AccountView>> {
        let companies = self.accounts.list(AccountKind::Empresa).await?;
        Ok(companies.iter().map(|c| c.view()).collect())
    }

    pub async fn get_company(&self, id: Uuid) -> DomainResult<AccountView> {
        self.accounts
            .find_by_id(AccountKind::Empresa, id)
            .await?
            .map(|c| c.view())
            .ok_or_else(|| DomainError::not_found("company"))
    }
}
