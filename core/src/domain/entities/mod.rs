//! Domain entities representing core business objects.

pub mod account;
pub mod notification;
pub mod order;
pub mod product;
pub mod token;
pub mod verification_code;

// Re-export commonly used types
pub use account::{Account, AccountKind, AccountView, Principal};
pub use notification::Notification;
pub use order::{Order, OrderItem, OrderLine, OrderStatus};
pub use product::{NewProduct, Product, ProductPatch, MAX_PRICE_CENTS, MAX_STOCK};
pub use token::{Claims, RevokedToken, TokenPair, TokenType, TOKEN_TYPE_BEARER};
pub use verification_code::{
    PendingAccount, VerificationCode, CODE_LENGTH, DEFAULT_EXPIRATION_SECONDS,
};
