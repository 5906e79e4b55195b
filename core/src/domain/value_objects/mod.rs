//! Value objects representing immutable domain concepts.

pub mod pending_receipt;

pub use pending_receipt::PendingReceipt;
