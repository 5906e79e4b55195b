//! Registry of live notification channels keyed by user

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

use tokio::sync::{mpsc, RwLock};
use uuid::Uuid;

use crate::domain::entities::Notification;

struct HubEntry {
    connection_id: u64,
    sender: mpsc::UnboundedSender<Notification>,
}

/// A user's side of a live channel
pub struct HubConnection {
    /// Identifies this connection when disconnecting
    pub connection_id: u64,
    /// Notifications pushed while the connection is current
    pub receiver: mpsc::UnboundedReceiver<Notification>,
}

/// Maps each user to at most one live channel
#[derive(Default)]
pub struct NotificationHub {
    connections: RwLock<HashMap<Uuid, HubEntry>>,
    next_id: AtomicU64,
}

impl NotificationHub {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a channel for the user
    ///
    /// Any previous channel is dropped, which ends its receiver.
    pub async fn connect(&self, user_id: Uuid) -> HubConnection {
        let connection_id = self.next_id.fetch_add(1, Ordering::Relaxed) + 1;
        let (sender, receiver) = mpsc::unbounded_channel();

        let replaced = self.connections.write().await.insert(
            user_id,
            HubEntry {
                connection_id,
                sender,
            },
        );

        tracing::debug!(
            user_id = %user_id,
            connection_id = connection_id,
            replaced = replaced.is_some(),
            event = "hub_connected",
            "Notification channel registered"
        );

        HubConnection {
            connection_id,
            receiver,
        }
    }

    /// Remove the user's channel if it is still this connection
    pub async fn disconnect(&self, user_id: Uuid, connection_id: u64) -> bool {
        let mut connections = self.connections.write().await;
        match connections.get(&user_id) {
            Some(entry) if entry.connection_id == connection_id => {
                connections.remove(&user_id);
                tracing::debug!(user_id = %user_id, event = "hub_disconnected", "Notification channel removed");
                true
            }
            _ => false,
        }
    }

    /// Push to the user's channel; returns whether it was delivered
    pub async fn push(&self, user_id: Uuid, notification: &Notification) -> bool {
        let connections = self.connections.read().await;
        match connections.get(&user_id) {
            Some(entry) => entry.sender.send(notification.clone()).is_ok(),
            None => false,
        }
    }

    pub async fn is_connected(&self, user_id: Uuid) -> bool {
        self.connections.read().await.contains_key(&user_id)
    }
}
