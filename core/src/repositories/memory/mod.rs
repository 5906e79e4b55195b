//! In-memory implementation of every repository trait
//!
//! All repositories share one state behind a single async lock, so the units of
//! work that the traits declare atomic (code consumption, order creation) run
//! under one write guard, the same way the MySQL implementation runs them in
//! one transaction.

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::entities::{
    Account, AccountKind, Notification, Order, OrderStatus, Product, VerificationCode,
};
use crate::errors::{AuthError, DomainError};

use super::{
    AccountRepository, NotificationRepository, OrderRepository, ProductRepository,
    TokenRepository, VerificationCodeRepository,
};

#[cfg(test)]
mod tests;

#[derive(Default)]
struct MemoryState {
    accounts: HashMap<(AccountKind, Uuid), Account>,
    codes: Vec<VerificationCode>,
    revoked: HashMap<String, DateTime<Utc>>,
    products: HashMap<Uuid, Product>,
    orders: HashMap<Uuid, Order>,
    notifications: Vec<Notification>,
}

/// Shared in-memory store; cloning yields another handle to the same data
#[derive(Clone, Default)]
pub struct InMemoryStore {
    state: Arc<RwLock<MemoryState>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored accounts of one kind
    pub async fn account_count(&self, kind: AccountKind) -> usize {
        let state = self.state.read().await;
        state.accounts.keys().filter(|(k, _)| *k == kind).count()
    }

    /// Every stored code for the pair, live or not
    pub async fn codes_for(&self, email: &str, kind: AccountKind) -> Vec<VerificationCode> {
        let state = self.state.read().await;
        state
            .codes
            .iter()
            .filter(|c| c.email == email && c.kind == kind)
            .cloned()
            .collect()
    }

    /// Move every code for the pair back in time by `by`
    ///
    /// Test support for expiry behaviour without sleeping.
    pub async fn age_codes(&self, email: &str, kind: AccountKind, by: Duration) {
        let mut state = self.state.write().await;
        for code in state
            .codes
            .iter_mut()
            .filter(|c| c.email == email && c.kind == kind)
        {
            code.created_at = code.created_at - by;
            code.expires_at = code.expires_at - by;
        }
    }

    /// Replace the code value of one stored row
    pub async fn set_code(&self, id: Uuid, value: &str) {
        let mut state = self.state.write().await;
        if let Some(code) = state.codes.iter_mut().find(|c| c.id == id) {
            code.code = value.to_string();
        }
    }

    /// Overwrite the stored payload of every code for the pair
    ///
    /// Test support for corrupt-state handling.
    pub async fn overwrite_payloads(&self, email: &str, kind: AccountKind, payload: &str) {
        let mut state = self.state.write().await;
        for code in state
            .codes
            .iter_mut()
            .filter(|c| c.email == email && c.kind == kind)
        {
            code.pending_payload = payload.to_string();
        }
    }
}

fn live_for<'a>(
    codes: &'a [VerificationCode],
    email: &'a str,
    kind: AccountKind,
    now: DateTime<Utc>,
) -> impl Iterator<Item = &'a VerificationCode> + 'a {
    codes
        .iter()
        .filter(move |c| c.email == email && c.kind == kind && c.is_live_at(now))
}

#[async_trait]
impl AccountRepository for InMemoryStore {
    async fn find_by_email(
        &self,
        kind: AccountKind,
        email: &str,
    ) -> Result<Option<Account>, DomainError> {
        let state = self.state.read().await;
        Ok(state
            .accounts
            .values()
            .find(|a| a.kind == kind && a.email == email)
            .cloned())
    }

    async fn find_by_id(&self, kind: AccountKind, id: Uuid) -> Result<Option<Account>, DomainError> {
        let state = self.state.read().await;
        Ok(state.accounts.get(&(kind, id)).cloned())
    }

    async fn create(&self, account: Account) -> Result<Account, DomainError> {
        let mut state = self.state.write().await;
        insert_account(&mut state, account)
    }

    async fn list(&self, kind: AccountKind) -> Result<Vec<Account>, DomainError> {
        let state = self.state.read().await;
        let mut accounts: Vec<Account> = state
            .accounts
            .values()
            .filter(|a| a.kind == kind)
            .cloned()
            .collect();
        accounts.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(accounts)
    }
}

fn insert_account(state: &mut MemoryState, account: Account) -> Result<Account, DomainError> {
    if state
        .accounts
        .values()
        .any(|a| a.kind == account.kind && a.email == account.email)
    {
        return Err(AuthError::EmailAlreadyRegistered.into());
    }
    state
        .accounts
        .insert((account.kind, account.id), account.clone());
    Ok(account)
}

#[async_trait]
impl VerificationCodeRepository for InMemoryStore {
    async fn create_if_none_live(&self, code: &VerificationCode) -> Result<bool, DomainError> {
        let mut state = self.state.write().await;
        if live_for(&state.codes, &code.email, code.kind, Utc::now())
            .next()
            .is_some()
        {
            return Ok(false);
        }
        state.codes.push(code.clone());
        Ok(true)
    }

    async fn find_live(
        &self,
        email: &str,
        kind: AccountKind,
    ) -> Result<Vec<VerificationCode>, DomainError> {
        let state = self.state.read().await;
        Ok(live_for(&state.codes, email, kind, Utc::now()).cloned().collect())
    }

    async fn find_latest(
        &self,
        email: &str,
        kind: AccountKind,
    ) -> Result<Option<VerificationCode>, DomainError> {
        let state = self.state.read().await;
        Ok(state
            .codes
            .iter()
            .filter(|c| c.email == email && c.kind == kind)
            .max_by_key(|c| c.created_at)
            .cloned())
    }

    async fn supersede(&self, code: &VerificationCode) -> Result<(), DomainError> {
        let mut state = self.state.write().await;
        let now = Utc::now();
        for existing in state
            .codes
            .iter_mut()
            .filter(|c| c.email == code.email && c.kind == code.kind && c.is_live_at(now))
        {
            existing.is_used = true;
        }
        state.codes.push(code.clone());
        Ok(())
    }

    async fn consume_and_promote(
        &self,
        code_id: Uuid,
        account: Account,
    ) -> Result<Option<Account>, DomainError> {
        let mut state = self.state.write().await;
        let now = Utc::now();

        let (email, kind) = match state
            .codes
            .iter()
            .find(|c| c.id == code_id && c.is_live_at(now))
        {
            Some(code) => (code.email.clone(), code.kind),
            None => return Ok(None),
        };

        // Insert first so a duplicate leaves the code untouched
        let account = insert_account(&mut state, account)?;
        state.codes.retain(|c| !(c.email == email && c.kind == kind));
        Ok(Some(account))
    }

    async fn mark_used(&self, code_id: Uuid) -> Result<bool, DomainError> {
        let mut state = self.state.write().await;
        match state.codes.iter_mut().find(|c| c.id == code_id && !c.is_used) {
            Some(code) => {
                code.is_used = true;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete_expired(&self) -> Result<usize, DomainError> {
        let mut state = self.state.write().await;
        let now = Utc::now();
        let before = state.codes.len();
        state.codes.retain(|c| c.expires_at >= now);
        Ok(before - state.codes.len())
    }
}

#[async_trait]
impl TokenRepository for InMemoryStore {
    async fn blacklist_token(&self, jti: &str, expires_at: DateTime<Utc>) -> Result<(), DomainError> {
        let mut state = self.state.write().await;
        state.revoked.insert(jti.to_string(), expires_at);
        Ok(())
    }

    async fn is_token_blacklisted(&self, jti: &str) -> Result<bool, DomainError> {
        let state = self.state.read().await;
        Ok(state.revoked.contains_key(jti))
    }

    async fn cleanup_blacklist(&self) -> Result<usize, DomainError> {
        let mut state = self.state.write().await;
        let now = Utc::now();
        let before = state.revoked.len();
        state.revoked.retain(|_, expires_at| *expires_at > now);
        Ok(before - state.revoked.len())
    }
}

#[async_trait]
impl ProductRepository for InMemoryStore {
    async fn create(&self, product: Product) -> Result<Product, DomainError> {
        let mut state = self.state.write().await;
        state.products.insert(product.id, product.clone());
        Ok(product)
    }

    async fn update(&self, product: Product) -> Result<Product, DomainError> {
        let mut state = self.state.write().await;
        match state.products.get_mut(&product.id) {
            Some(existing) => {
                *existing = product.clone();
                Ok(product)
            }
            None => Err(DomainError::not_found("product")),
        }
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Product>, DomainError> {
        let state = self.state.read().await;
        Ok(state.products.get(&id).cloned())
    }

    async fn list_by_company(
        &self,
        company_id: Uuid,
        active_only: bool,
    ) -> Result<Vec<Product>, DomainError> {
        let state = self.state.read().await;
        let mut products: Vec<Product> = state
            .products
            .values()
            .filter(|p| p.company_id == company_id && (!active_only || p.is_active))
            .cloned()
            .collect();
        products.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(products)
    }

    async fn list_active(&self) -> Result<Vec<Product>, DomainError> {
        let state = self.state.read().await;
        let mut products: Vec<Product> =
            state.products.values().filter(|p| p.is_active).cloned().collect();
        products.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(products)
    }
}

#[async_trait]
impl OrderRepository for InMemoryStore {
    async fn create_with_items(&self, order: Order) -> Result<Order, DomainError> {
        let mut state = self.state.write().await;

        // Check every line before touching stock so a failure writes nothing
        for item in &order.items {
            let available = state
                .products
                .get(&item.product_id)
                .map(|p| p.stock)
                .ok_or_else(|| DomainError::not_found("product"))?;
            if available < item.quantity {
                return Err(DomainError::Conflict {
                    message: format!(
                        "Insufficient stock for product {} | Stock insuficiente para el producto {}",
                        item.product_id, item.product_id
                    ),
                });
            }
        }

        let now = Utc::now();
        for item in &order.items {
            if let Some(product) = state.products.get_mut(&item.product_id) {
                product.stock -= item.quantity;
                product.updated_at = now;
            }
        }
        state.orders.insert(order.id, order.clone());
        Ok(order)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Order>, DomainError> {
        let state = self.state.read().await;
        Ok(state.orders.get(&id).cloned())
    }

    async fn list_by_client(&self, client_id: Uuid) -> Result<Vec<Order>, DomainError> {
        let state = self.state.read().await;
        let mut orders: Vec<Order> = state
            .orders
            .values()
            .filter(|o| o.client_id == client_id)
            .cloned()
            .collect();
        orders.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(orders)
    }

    async fn list_by_company(&self, company_id: Uuid) -> Result<Vec<Order>, DomainError> {
        let state = self.state.read().await;
        let mut orders: Vec<Order> = state
            .orders
            .values()
            .filter(|o| o.company_id == company_id)
            .cloned()
            .collect();
        orders.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(orders)
    }

    async fn update_status(
        &self,
        id: Uuid,
        from: OrderStatus,
        to: OrderStatus,
    ) -> Result<bool, DomainError> {
        let mut state = self.state.write().await;
        let now = Utc::now();

        let items = match state.orders.get_mut(&id) {
            Some(order) if order.status == from => {
                order.status = to;
                order.updated_at = now;
                order.items.clone()
            }
            _ => return Ok(false),
        };

        if to == OrderStatus::Cancelado {
            for item in items {
                if let Some(product) = state.products.get_mut(&item.product_id) {
                    product.stock = product.stock.saturating_add(item.quantity);
                    product.updated_at = now;
                }
            }
        }
        Ok(true)
    }
}

#[async_trait]
impl NotificationRepository for InMemoryStore {
    async fn create(&self, notification: Notification) -> Result<Notification, DomainError> {
        let mut state = self.state.write().await;
        state.notifications.push(notification.clone());
        Ok(notification)
    }

    async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<Notification>, DomainError> {
        let state = self.state.read().await;
        let mut notifications: Vec<Notification> = state
            .notifications
            .iter()
            .filter(|n| n.user_id == user_id)
            .cloned()
            .collect();
        notifications.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(notifications)
    }

    async fn mark_read(&self, user_id: Uuid, id: Uuid) -> Result<bool, DomainError> {
        let mut state = self.state.write().await;
        match state
            .notifications
            .iter_mut()
            .find(|n| n.id == id && n.user_id == user_id)
        {
            Some(notification) => {
                notification.is_read = true;
                Ok(true)
            }
            None => Ok(false),
        }
    }
}
