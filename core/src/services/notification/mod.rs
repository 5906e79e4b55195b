//! Notification persistence and live fan-out
//!
//! Every notification is stored first; pushing it to a connected user is best
//! effort. The hub lives in process memory, so users connected to another
//! instance only see the stored row.

mod hub;
mod service;

#[cfg(test)]
mod tests;

pub use hub::{HubConnection, NotificationHub};
pub use service::NotificationService;
