//! Order service implementation

use std::sync::Arc;

use uuid::Uuid;

use crate::domain::entities::{AccountKind, Order, OrderLine, OrderStatus, Principal};
use crate::errors::{AuthError, DomainError, DomainResult, ValidationError};
use crate::repositories::{AccountRepository, OrderRepository, ProductRepository};
use crate::services::notification::NotificationService;

/// Clients place orders with one company; the company moves them along
pub struct OrderService {
    orders: Arc<dyn OrderRepository>,
    products: Arc<dyn ProductRepository>,
    accounts: Arc<dyn AccountRepository>,
    notifications: Arc<NotificationService>,
}

impl OrderService {
    pub fn new(
        orders: Arc<dyn OrderRepository>,
        products: Arc<dyn ProductRepository>,
        accounts: Arc<dyn AccountRepository>,
        notifications: Arc<NotificationService>,
    ) -> Self {
        Self {
            orders,
            products,
            accounts,
            notifications,
        }
    }

    /// Place an order for products of a single company
    ///
    /// Repeated lines for the same product are merged. Prices come from the
    /// current catalog. Stock is decremented in the same unit of work that
    /// stores the order; when any line lacks stock nothing is written and
    /// `Conflict` is returned.
    pub async fn create_order(
        &self,
        caller: Principal,
        company_id: Uuid,
        lines: Vec<OrderLine>,
    ) -> DomainResult<Order> {
        if !caller.is_client() {
            return Err(AuthError::InsufficientPermissions.into());
        }
        let lines = merge_lines(lines)?;

        if self
            .accounts
            .find_by_id(AccountKind::Empresa, company_id)
            .await?
            .is_none()
        {
            return Err(DomainError::not_found("company"));
        }

        let mut priced = Vec::with_capacity(lines.len());
        for line in &lines {
            let product = self
                .products
                .find_by_id(line.product_id)
                .await?
                .filter(|p| p.is_active && p.belongs_to(company_id))
                .ok_or_else(|| DomainError::not_found("product"))?;
            priced.push((product.id, line.quantity, product.price_cents));
        }

        let order = self
            .orders
            .create_with_items(Order::new(caller.id, company_id, &priced)?)
            .await?;

        tracing::info!(
            order_id = %order.id,
            client_id = %caller.id,
            company_id = %company_id,
            total_cents = order.total_cents,
            event = "order_created",
            "Order placed"
        );

        self.notify(
            company_id,
            "Nuevo pedido",
            &format!(
                "Has recibido el pedido {} por {}",
                order.id,
                format_cents(order.total_cents)
            ),
        )
        .await;

        Ok(order)
    }

    /// Fetch an order the caller takes part in
    pub async fn get_order(&self, caller: Principal, id: Uuid) -> DomainResult<Order> {
        self.orders
            .find_by_id(id)
            .await?
            .filter(|o| o.involves(caller.id))
            .ok_or_else(|| DomainError::not_found("order"))
    }

    /// Orders placed by a client, or received by a company
    pub async fn list_orders(&self, caller: Principal) -> DomainResult<Vec<Order>> {
        match caller.kind {
            AccountKind::Cliente => self.orders.list_by_client(caller.id).await,
            AccountKind::Empresa => self.orders.list_by_company(caller.id).await,
        }
    }

    /// Move an order to a new status
    ///
    /// The company may follow any lifecycle edge. A client may only cancel an
    /// order that is still `Pendiente`. The other party is notified.
    pub async fn update_status(
        &self,
        caller: Principal,
        id: Uuid,
        status: OrderStatus,
    ) -> DomainResult<Order> {
        let mut order = self.get_order(caller, id).await?;

        if caller.is_client() {
            if status != OrderStatus::Cancelado {
                return Err(AuthError::InsufficientPermissions.into());
            }
            if order.status != OrderStatus::Pendiente {
                return Err(invalid_transition(order.status, status));
            }
        } else if !order.status.can_transition_to(status) {
            return Err(invalid_transition(order.status, status));
        }

        if !self.orders.update_status(id, order.status, status).await? {
            // Someone else moved the order first
            return Err(invalid_transition(order.status, status));
        }

        tracing::info!(
            order_id = %id,
            from = %order.status,
            to = %status,
            event = "order_status_changed",
            "Order status updated"
        );

        order.status = status;
        let recipient = if caller.is_client() {
            order.company_id
        } else {
            order.client_id
        };
        self.notify(
            recipient,
            "Pedido actualizado",
            &format!("El pedido {} ahora está {}", order.id, status),
        )
        .await;

        self.get_order(caller, id).await
    }

    async fn notify(&self, user_id: Uuid, title: &str, message: &str) {
        if let Err(e) = self.notifications.notify(user_id, title, message).await {
            tracing::warn!(
                user_id = %user_id,
                error = %e,
                event = "notification_failed",
                "Failed to store order notification"
            );
        }
    }
}

fn merge_lines(lines: Vec<OrderLine>) -> DomainResult<Vec<OrderLine>> {
    if lines.is_empty() {
        return Err(ValidationError::RequiredField {
            field: "items".to_string(),
        }
        .into());
    }

    let mut merged: Vec<OrderLine> = Vec::with_capacity(lines.len());
    for line in lines {
        if line.quantity <= 0 {
            return Err(ValidationError::OutOfRange {
                field: "quantity".to_string(),
                min: 1,
            }
            .into());
        }
        match merged.iter_mut().find(|m| m.product_id == line.product_id) {
            Some(existing) => {
                existing.quantity = existing.quantity.checked_add(line.quantity).ok_or_else(|| {
                    DomainError::Validation {
                        message: "Quantity too large | Cantidad demasiado grande".to_string(),
                    }
                })?;
            }
            None => merged.push(line),
        }
    }
    Ok(merged)
}

fn invalid_transition(from: OrderStatus, to: OrderStatus) -> DomainError {
    DomainError::Conflict {
        message: format!(
            "Cannot move order from {} to {} | No se puede pasar el pedido de {} a {}",
            from, to, from, to
        ),
    }
}

fn format_cents(cents: i64) -> String {
    format!("${}.{:02}", cents / 100, (cents % 100).abs())
}
