//! Order placement and status lifecycle

mod service;


pub use service::OrderService;
