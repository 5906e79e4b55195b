//! HTTP surface of the Mercado backend
//!
//! Routes, middleware and request/response types built on actix-web. The
//! binary in `main.rs` wires MySQL repositories into [`state::AppState`];
//! tests wire the in-memory store instead.

pub mod app;
pub mod config;
pub mod dto;
pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod state;
