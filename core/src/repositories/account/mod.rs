#[path = "trait.rs"]
mod trait_;

pub use trait_::AccountRepository;
