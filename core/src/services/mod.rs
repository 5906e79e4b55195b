//! Business services containing domain logic and use cases.

pub mod auth;
pub mod cleanup;
pub mod notification;
pub mod order;
pub mod product;
pub mod token;
pub mod verification;

// Re-export commonly used types
pub use auth::{AuthService, AuthServiceConfig};
pub use cleanup::{CleanupResult, CleanupService, CleanupServiceConfig};
pub use notification::{HubConnection, NotificationHub, NotificationService};
pub use order::OrderService;
pub use product::ProductService;
pub use token::{TokenService, TokenServiceConfig};
pub use verification::{EmailServiceTrait, VerificationService, VerificationServiceConfig};
