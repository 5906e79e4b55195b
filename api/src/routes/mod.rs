//! Route handlers grouped by resource

pub mod auth;
pub mod companies;
pub mod health;
pub mod notifications;
pub mod orders;
pub mod products;
pub mod ws;
