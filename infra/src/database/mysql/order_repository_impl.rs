//! MySQL implementation of the OrderRepository trait.
//!
//! Order creation decrements stock with `UPDATE ... WHERE stock >= ?` inside
//! the same transaction that writes the order and its items. Cancelling an
//! order returns its quantities to stock in the status-change transaction.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::MySqlPool;
use uuid::Uuid;

use mp_core::domain::entities::{Order, OrderItem, OrderStatus};
use mp_core::errors::DomainError;
use mp_core::repositories::OrderRepository;

use super::{column, db_error, uuid_column};

const ORDER_COLUMNS: &str =
    "id, cliente_id, empresa_id, status, total_cents, created_at, updated_at";

/// MySQL implementation of OrderRepository
pub struct MySqlOrderRepository {
    /// Database connection pool
    pool: MySqlPool,
}

impl MySqlOrderRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    /// Build an order from its row; items are loaded separately
    fn row_to_order(row: &sqlx::mysql::MySqlRow) -> Result<Order, DomainError> {
        let status: String = column(row, "status")?;

        Ok(Order {
            id: uuid_column(row, "id")?,
            client_id: uuid_column(row, "cliente_id")?,
            company_id: uuid_column(row, "empresa_id")?,
            status: status
                .parse::<OrderStatus>()
                .map_err(|e| DomainError::Internal { message: e })?,
            total_cents: column(row, "total_cents")?,
            items: Vec::new(),
            created_at: column::<DateTime<Utc>>(row, "created_at")?,
            updated_at: column::<DateTime<Utc>>(row, "updated_at")?,
        })
    }

    fn row_to_item(row: &sqlx::mysql::MySqlRow) -> Result<OrderItem, DomainError> {
        Ok(OrderItem {
            id: uuid_column(row, "id")?,
            order_id: uuid_column(row, "pedido_id")?,
            product_id: uuid_column(row, "producto_id")?,
            quantity: column(row, "quantity")?,
            unit_price_cents: column(row, "unit_price_cents")?,
            subtotal_cents: column(row, "subtotal_cents")?,
        })
    }

    async fn load_items(&self, order: &mut Order) -> Result<(), DomainError> {
        let rows = sqlx::query(
            r#"
            SELECT id, pedido_id, producto_id, quantity, unit_price_cents, subtotal_cents
            FROM items_pedido
            WHERE pedido_id = ?
            "#,
        )
        .bind(order.id.to_string())
        .fetch_all(&self.pool)
        .await
        .map_err(db_error("Failed to load order items"))?;

        order.items = rows.iter().map(Self::row_to_item).collect::<Result<_, _>>()?;
        Ok(())
    }

    async fn list_where(&self, column_name: &str, id: Uuid) -> Result<Vec<Order>, DomainError> {
        let query = format!(
            "SELECT {} FROM pedidos WHERE {} = ? ORDER BY created_at DESC",
            ORDER_COLUMNS, column_name
        );

        let rows = sqlx::query(&query)
            .bind(id.to_string())
            .fetch_all(&self.pool)
            .await
            .map_err(db_error("Failed to list orders"))?;

        let mut orders = rows.iter().map(Self::row_to_order).collect::<Result<Vec<_>, _>>()?;
        for order in &mut orders {
            self.load_items(order).await?;
        }
        Ok(orders)
    }
}

#[async_trait]
impl OrderRepository for MySqlOrderRepository {
    async fn create_with_items(&self, order: Order) -> Result<Order, DomainError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(db_error("Failed to begin transaction"))?;

        for item in &order.items {
            let decremented = sqlx::query(
                r#"
                UPDATE productos SET stock = stock - ?, updated_at = ?
                WHERE id = ? AND stock >= ?
                "#,
            )
            .bind(item.quantity)
            .bind(order.created_at)
            .bind(item.product_id.to_string())
            .bind(item.quantity)
            .execute(&mut *tx)
            .await
            .map_err(db_error("Failed to reserve stock"))?;

            if decremented.rows_affected() != 1 {
                tx.rollback().await.map_err(db_error("Failed to roll back"))?;
                return Err(DomainError::Conflict {
                    message: format!(
                        "Insufficient stock for product {} | Stock insuficiente para el producto {}",
                        item.product_id, item.product_id
                    ),
                });
            }
        }

        sqlx::query(
            r#"
            INSERT INTO pedidos (id, cliente_id, empresa_id, status, total_cents, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(order.id.to_string())
        .bind(order.client_id.to_string())
        .bind(order.company_id.to_string())
        .bind(order.status.as_str())
        .bind(order.total_cents)
        .bind(order.created_at)
        .bind(order.updated_at)
        .execute(&mut *tx)
        .await
        .map_err(db_error("Failed to insert order"))?;

        for item in &order.items {
            sqlx::query(
                r#"
                INSERT INTO items_pedido (
                    id, pedido_id, producto_id, quantity, unit_price_cents, subtotal_cents
                ) VALUES (?, ?, ?, ?, ?, ?)
                "#,
            )
            .bind(item.id.to_string())
            .bind(item.order_id.to_string())
            .bind(item.product_id.to_string())
            .bind(item.quantity)
            .bind(item.unit_price_cents)
            .bind(item.subtotal_cents)
            .execute(&mut *tx)
            .await
            .map_err(db_error("Failed to insert order item"))?;
        }

        tx.commit().await.map_err(db_error("Failed to commit order"))?;
        Ok(order)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Order>, DomainError> {
        let query = format!("SELECT {} FROM pedidos WHERE id = ? LIMIT 1", ORDER_COLUMNS);

        let row = sqlx::query(&query)
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error("Failed to find order"))?;

        match row {
            Some(row) => {
                let mut order = Self::row_to_order(&row)?;
                self.load_items(&mut order).await?;
                Ok(Some(order))
            }
            None => Ok(None),
        }
    }

    async fn list_by_client(&self, client_id: Uuid) -> Result<Vec<Order>, DomainError> {
        self.list_where("cliente_id", client_id).await
    }

    async fn list_by_company(&self, company_id: Uuid) -> Result<Vec<Order>, DomainError> {
        self.list_where("empresa_id", company_id).await
    }

    async fn update_status(
        &self,
        id: Uuid,
        from: OrderStatus,
        to: OrderStatus,
    ) -> Result<bool, DomainError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(db_error("Failed to begin transaction"))?;
        let now = Utc::now();

        let updated = sqlx::query(
            "UPDATE pedidos SET status = ?, updated_at = ? WHERE id = ? AND status = ?",
        )
        .bind(to.as_str())
        .bind(now)
        .bind(id.to_string())
        .bind(from.as_str())
        .execute(&mut *tx)
        .await
        .map_err(db_error("Failed to update order status"))?;

        if updated.rows_affected() != 1 {
            tx.rollback().await.map_err(db_error("Failed to roll back"))?;
            return Ok(false);
        }

        if to == OrderStatus::Cancelado {
            sqlx::query(
                r#"
                UPDATE productos p
                JOIN items_pedido i ON i.producto_id = p.id
                SET p.stock = p.stock + i.quantity, p.updated_at = ?
                WHERE i.pedido_id = ?
                "#,
            )
            .bind(now)
            .bind(id.to_string())
            .execute(&mut *tx)
            .await
            .map_err(db_error("Failed to restore stock"))?;
        }

        tx.commit().await.map_err(db_error("Failed to commit status change"))?;
        Ok(true)
    }
}
