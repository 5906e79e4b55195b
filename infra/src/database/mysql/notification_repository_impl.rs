//! MySQL implementation of the NotificationRepository trait.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::MySqlPool;
use uuid::Uuid;

use mp_core::domain::entities::Notification;
use mp_core::errors::DomainError;
use mp_core::repositories::NotificationRepository;

use super::{column, db_error, uuid_column};

/// MySQL implementation of NotificationRepository
pub struct MySqlNotificationRepository {
    /// Database connection pool
    pool: MySqlPool,
}

impl MySqlNotificationRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    fn row_to_notification(row: &sqlx::mysql::MySqlRow) -> Result<Notification, DomainError> {
        Ok(Notification {
            id: uuid_column(row, "id")?,
            user_id: uuid_column(row, "user_id")?,
            title: column(row, "title")?,
            message: column(row, "message")?,
            is_read: column(row, "is_read")?,
            created_at: column::<DateTime<Utc>>(row, "created_at")?,
        })
    }
}

#[async_trait]
impl NotificationRepository for MySqlNotificationRepository {
    async fn create(&self, notification: Notification) -> Result<Notification, DomainError> {
        let query = r#"
            INSERT INTO notificaciones (id, user_id, title, message, is_read, created_at)
            VALUES (?, ?, ?, ?, ?, ?)
        "#;

        sqlx::query(query)
            .bind(notification.id.to_string())
            .bind(notification.user_id.to_string())
            .bind(&notification.title)
            .bind(&notification.message)
            .bind(notification.is_read)
            .bind(notification.created_at)
            .execute(&self.pool)
            .await
            .map_err(db_error("Failed to create notification"))?;

        Ok(notification)
    }

    async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<Notification>, DomainError> {
        let query = r#"
            SELECT id, user_id, title, message, is_read, created_at
            FROM notificaciones
            WHERE user_id = ?
            ORDER BY created_at DESC
        "#;

        let rows = sqlx::query(query)
            .bind(user_id.to_string())
            .fetch_all(&self.pool)
            .await
            .map_err(db_error("Failed to list notifications"))?;

        rows.iter().map(Self::row_to_notification).collect()
    }

    async fn mark_read(&self, user_id: Uuid, id: Uuid) -> Result<bool, DomainError> {
        // Matching on an already-read row still reports success
        let query = r#"
            SELECT EXISTS(SELECT 1 FROM notificaciones WHERE id = ? AND user_id = ?) AS found
        "#;
        let row = sqlx::query(query)
            .bind(id.to_string())
            .bind(user_id.to_string())
            .fetch_one(&self.pool)
            .await
            .map_err(db_error("Failed to find notification"))?;
        let found: i64 = column(&row, "found")?;
        if found != 1 {
            return Ok(false);
        }

        sqlx::query("UPDATE notificaciones SET is_read = TRUE WHERE id = ? AND user_id = ?")
            .bind(id.to_string())
            .bind(user_id.to_string())
            .execute(&self.pool)
            .await
            .map_err(db_error("Failed to mark notification read"))?;

        Ok(true)
    }
}
