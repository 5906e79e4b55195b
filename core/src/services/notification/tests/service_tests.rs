use std::sync::Arc;

use uuid::Uuid;

use crate::errors::DomainError;
use crate::repositories::InMemoryStore;
use crate::services::notification::{NotificationHub, NotificationService};

fn service() -> NotificationService {
    NotificationService::new(Arc::new(InMemoryStore::new()), Arc::new(NotificationHub::new()))
}

#[tokio::test]
async fn test_notify_persists_and_pushes() {
    let service = service();
    let user = Uuid::new_v4();
    let mut connection = service.hub().connect(user).await;

    let stored = service.notify(user, "Nuevo pedido", "Tienes un pedido").await.unwrap();

    let pushed = connection.receiver.recv().await.unwrap();
    assert_eq!(pushed.id, stored.id);
    assert_eq!(service.list_for_user(user).await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_notify_without_connection_still_persists() {
    let service = service();
    let user = Uuid::new_v4();

    service.notify(user, "Hola", "Sin conexion").await.unwrap();

    let stored = service.list_for_user(user).await.unwrap();
    assert_eq!(stored.len(), 1);
    assert!(!stored[0].is_read);
}

#[tokio::test]
async fn test_new_connection_replaces_old() {
    let hub = NotificationHub::new();
    let user = Uuid::new_v4();
    let mut first = hub.connect(user).await;
    let mut second = hub.connect(user).await;

    // The replaced sender was dropped, so the old receiver is closed
    assert!(first.receiver.recv().await.is_none());

    let service = NotificationService::new(Arc::new(InMemoryStore::new()), Arc::new(hub));
    service.notify(user, "t", "m").await.unwrap();
    assert!(second.receiver.recv().await.is_some());
}

#[tokio::test]
async fn test_stale_disconnect_keeps_current_connection() {
    let hub = NotificationHub::new();
    let user = Uuid::new_v4();
    let first = hub.connect(user).await;
    let second = hub.connect(user).await;

    assert!(!hub.disconnect(user, first.connection_id).await);
    assert!(hub.is_connected(user).await);

    assert!(hub.disconnect(user, second.connection_id).await);
    assert!(!hub.is_connected(user).await);
}

#[tokio::test]
async fn test_mark_read_only_own_notifications() {
    let service = service();
    let owner = Uuid::new_v4();
    let other = Uuid::new_v4();
    let notification = service.notify(owner, "t", "m").await.unwrap();

    assert!(matches!(
        service.mark_read(other, notification.id).await,
        Err(DomainError::NotFound { .. })
    ));

    service.mark_read(owner, notification.id).await.unwrap();
    assert!(service.list_for_user(owner).await.unwrap()[0].is_read);
}
