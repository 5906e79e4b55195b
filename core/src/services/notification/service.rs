//! Stores notifications and forwards them to the hub

use std::sync::Arc;

use uuid::Uuid;

use crate::domain::entities::Notification;
use crate::errors::{DomainError, DomainResult};
use crate::repositories::NotificationRepository;

use super::hub::NotificationHub;

pub struct NotificationService {
    notifications: Arc<dyn NotificationRepository>,
    hub: Arc<NotificationHub>,
}

impl NotificationService {
    pub fn new(notifications: Arc<dyn NotificationRepository>, hub: Arc<NotificationHub>) -> Self {
        Self { notifications, hub }
    }

    pub fn hub(&self) -> Arc<NotificationHub> {
        self.hub.clone()
    }

    /// Persist a notification, then push it if the user is connected
    pub async fn notify(
        &self,
        user_id: Uuid,
        title: &str,
        message: &str,
    ) -> DomainResult<Notification> {
        let notification = self
            .notifications
            .create(Notification::new(user_id, title, message))
            .await?;

        let delivered = self.hub.push(user_id, &notification).await;
        tracing::info!(
            user_id = %user_id,
            notification_id = %notification.id,
            delivered = delivered,
            event = "notification_created",
            "Notification stored"
        );
        Ok(notification)
    }

    pub async fn list_for_user(&self, user_id: Uuid) -> DomainResult<Vec<Notification>> {
        self.notifications.list_for_user(user_id).await
    }

    /// Mark one of the user's notifications as read
    pub async fn mark_read(&self, user_id: Uuid, id: Uuid) -> DomainResult<()> {
        if self.notifications.mark_read(user_id, id).await? {
            Ok(())
        } else {
            Err(DomainError::not_found("notification"))
        }
    }
}
