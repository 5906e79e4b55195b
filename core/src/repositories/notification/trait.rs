//! Notification persistence.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::entities::Notification;
use crate::errors::DomainError;

#[async_trait]
pub trait NotificationRepository: Send + Sync {
    async fn create(&self, notification: Notification) -> Result<Notification, DomainError>;

    /// Notifications for a user, newest first
    async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<Notification>, DomainError>;

    /// Mark one of the user's notifications read; `false` when it is not theirs
    async fn mark_read(&self, user_id: Uuid, id: Uuid) -> Result<bool, DomainError>;
}
