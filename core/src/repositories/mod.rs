//! Repository interfaces and the in-memory store used by tests and local runs.

pub mod account;
pub mod memory;
pub mod notification;
pub mod order;
pub mod product;
pub mod token;
pub mod verification;

pub use account::AccountRepository;
pub use memory::InMemoryStore;
pub use notification::NotificationRepository;
pub use order::OrderRepository;
pub use product::ProductRepository;
pub use token::TokenRepository;
pub use verification::VerificationCodeRepository;
