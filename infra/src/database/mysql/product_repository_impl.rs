//! MySQL implementation of the ProductRepository trait.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::MySqlPool;
use uuid::Uuid;

use mp_core::domain::entities::Product;
use mp_core::errors::DomainError;
use mp_core::repositories::ProductRepository;

use super::{column, db_error, uuid_column};

const PRODUCT_COLUMNS: &str = "id, empresa_id, name, description, price_cents, stock, \
                               image_url, is_active, created_at, updated_at";

/// MySQL implementation of ProductRepository
pub struct MySqlProductRepository {
    /// Database connection pool
    pool: MySqlPool,
}

impl MySqlProductRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    fn row_to_product(row: &sqlx::mysql::MySqlRow) -> Result<Product, DomainError> {
        Ok(Product {
            id: uuid_column(row, "id")?,
            company_id: uuid_column(row, "empresa_id")?,
            name: column(row, "name")?,
            description: column(row, "description")?,
            price_cents: column(row, "price_cents")?,
            stock: column(row, "stock")?,
            image_url: column(row, "image_url")?,
            is_active: column(row, "is_active")?,
            created_at: column::<DateTime<Utc>>(row, "created_at")?,
            updated_at: column::<DateTime<Utc>>(row, "updated_at")?,
        })
    }
}

#[async_trait]
impl ProductRepository for MySqlProductRepository {
    async fn create(&self, product: Product) -> Result<Product, DomainError> {
        let query = r#"
            INSERT INTO productos (
                id, empresa_id, name, description, price_cents, stock,
                image_url, is_active, created_at, updated_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#;

        sqlx::query(query)
            .bind(product.id.to_string())
            .bind(product.company_id.to_string())
            .bind(&product.name)
            .bind(&product.description)
            .bind(product.price_cents)
            .bind(product.stock)
            .bind(&product.image_url)
            .bind(product.is_active)
            .bind(product.created_at)
            .bind(product.updated_at)
            .execute(&self.pool)
            .await
            .map_err(db_error("Failed to create product"))?;

        Ok(product)
    }

    async fn update(&self, product: Product) -> Result<Product, DomainError> {
        let query = r#"
            UPDATE productos
            SET name = ?, description = ?, price_cents = ?, stock = ?,
                image_url = ?, is_active = ?, updated_at = ?
            WHERE id = ?
        "#;

        let result = sqlx::query(query)
            .bind(&product.name)
            .bind(&product.description)
            .bind(product.price_cents)
            .bind(product.stock)
            .bind(&product.image_url)
            .bind(product.is_active)
            .bind(product.updated_at)
            .bind(product.id.to_string())
            .execute(&self.pool)
            .await
            .map_err(db_error("Failed to update product"))?;

        if result.rows_affected() == 0 {
            return Err(DomainError::not_found("product"));
        }
        Ok(product)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Product>, DomainError> {
        let query = format!("SELECT {} FROM productos WHERE id = ? LIMIT 1", PRODUCT_COLUMNS);

        let row = sqlx::query(&query)
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error("Failed to find product"))?;

        row.as_ref().map(Self::row_to_product).transpose()
    }

    async fn list_by_company(
        &self,
        company_id: Uuid,
        active_only: bool,
    ) -> Result<Vec<Product>, DomainError> {
        let query = format!(
            "SELECT {} FROM productos WHERE empresa_id = ? AND (is_active = TRUE OR ? = FALSE) \
             ORDER BY created_at DESC",
            PRODUCT_COLUMNS
        );

        let rows = sqlx::query(&query)
            .bind(company_id.to_string())
            .bind(active_only)
            .fetch_all(&self.pool)
            .await
            .map_err(db_error("Failed to list company products"))?;

        rows.iter().map(Self::row_to_product).collect()
    }

    async fn list_active(&self) -> Result<Vec<Product>, DomainError> {
        let query = format!(
            "SELECT {} FROM productos WHERE is_active = TRUE ORDER BY created_at DESC",
            PRODUCT_COLUMNS
        );

        let rows = sqlx::query(&query)
            .fetch_all(&self.pool)
            .await
            .map_err(db_error("Failed to list products"))?;

        rows.iter().map(Self::row_to_product).collect()
    }
}
