//! Coupons

pub mod errors;
pub mod models;
pub mod service;

pub use errors::{CouponError, CouponsServiceError};
pub use service::*;
