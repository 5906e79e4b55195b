//! Authentication route handlers
//!
//! Registration parks the account until the emailed code is verified; login,
//! refresh and logout manage the JWT pair.

pub mod login;
pub mod logout;
pub mod refresh;
pub mod register;
pub mod resend_code;
pub mod verify_code;

pub use login::login;
pub use logout::logout;
pub use refresh::refresh;
pub use register::{register_client, register_company};
pub use resend_code::resend_code;
pub use verify_code::verify_code;
