//! Company product catalog

mod service;

#[cfg(test)]
mod tests;

pub use service::ProductService;
