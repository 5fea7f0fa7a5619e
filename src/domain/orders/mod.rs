//! Orders

pub mod errors;
pub mod models;
pub mod service;

pub use errors::{OrderError, OrdersServiceError};
pub use service::*;
