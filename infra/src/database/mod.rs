//! Database module - MySQL implementations using SQLx
//!
//! - Connection pool management and embedded migrations
//! - Repository implementations for every core repository trait

pub mod connection;
pub mod mysql;

#[cfg(test)]
mod tests;

// Re-export commonly used types
pub use connection::{DatabasePool, PoolStatistics};
pub use mysql::{
    MySqlAccountRepository, MySqlNotificationRepository, MySqlOrderRepository,
    MySqlProductRepository, MySqlTokenRepository, MySqlVerificationCodeRepository,
};
