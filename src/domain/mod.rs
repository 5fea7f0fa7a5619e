//! Domain modules for the cart & pricing engine.

pub mod addresses;
pub mod carts;
pub mod coupons;
pub mod menu;
pub mod orders;

use crate::uuids::TypedUuid;

/// Customers are managed by the surrounding platform; only their identity
/// crosses into this engine.
#[derive(Debug)]
pub struct Customer;

/// Customer UUID
pub type CustomerUuid = TypedUuid<Customer>;
