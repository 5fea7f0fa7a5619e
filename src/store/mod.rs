//! Boundary contracts to the engine's collaborators.
//!
//! Menu, coupon and address lookups, cart persistence and order persistence
//! are all external concerns. The engine reaches them through the traits in
//! this module; [`memory`] provides the bundled reference backend and
//! `mockall` mocks cover the failure paths in tests.

pub mod memory;

use async_trait::async_trait;
use mockall::automock;
use thiserror::Error;

use crate::domain::{
    CustomerUuid,
    addresses::{AddressUuid, DeliveryAddress},
    carts::models::Cart,
    coupons::models::Coupon,
    menu::{FoodUuid, MenuItem, RestaurantUuid},
    orders::models::{Order, OrderUuid},
};

/// Errors surfaced by store implementations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A conditional write lost the race against a concurrent writer.
    #[error("stored version does not match the expected version")]
    VersionConflict,

    /// The backing store itself failed (I/O, connectivity, corruption).
    #[error("backend error")]
    Backend(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// A value paired with the persistence version it was read at.
#[derive(Debug, Clone)]
pub struct Versioned<T> {
    /// The stored value.
    pub value: T,

    /// Version counter, incremented on every successful save.
    pub version: u64,
}

/// Bounded retry policy for version-conflict saves.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    /// Maximum number of load-mutate-save attempts before surfacing
    /// a concurrent-modification error.
    pub max_attempts: u32,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self { max_attempts: 3 }
    }
}

/// Menu lookup collaborator.
#[automock]
#[async_trait]
pub trait MenuStore: Send + Sync {
    /// Resolve a priced menu item for a restaurant.
    ///
    /// # Errors
    ///
    /// Returns a backend error when the lookup fails; an unknown item is
    /// `Ok(None)`.
    async fn get_menu_item(
        &self,
        restaurant: RestaurantUuid,
        food: FoodUuid,
    ) -> Result<Option<MenuItem>, StoreError>;
}

/// Coupon lookup collaborator.
#[automock]
#[async_trait]
pub trait CouponStore: Send + Sync {
    /// Find a coupon by its exact code.
    ///
    /// # Errors
    ///
    /// Returns a backend error when the lookup fails; an unknown code is
    /// `Ok(None)`.
    async fn find_by_code(&self, code: &str) -> Result<Option<Coupon>, StoreError>;
}

/// Address-book lookup collaborator.
#[automock]
#[async_trait]
pub trait AddressStore: Send + Sync {
    /// Resolve an address, scoped to the customer that owns it.
    ///
    /// # Errors
    ///
    /// Returns a backend error when the lookup fails; an unknown or
    /// foreign address is `Ok(None)`.
    async fn find_address(
        &self,
        customer: CustomerUuid,
        address: AddressUuid,
    ) -> Result<Option<DeliveryAddress>, StoreError>;
}

/// Cart persistence with optimistic concurrency control.
#[automock]
#[async_trait]
pub trait CartStore: Send + Sync {
    /// Load the customer's cart together with its current version.
    ///
    /// # Errors
    ///
    /// Returns a backend error when the load fails.
    async fn load_cart(
        &self,
        customer: CustomerUuid,
    ) -> Result<Option<Versioned<Cart>>, StoreError>;

    /// Save the cart, conditional on `expected_version` matching the stored
    /// version (`0` for a cart that does not exist yet). Returns the new
    /// version.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::VersionConflict`] when another writer saved the
    /// cart since it was loaded.
    async fn save_cart(
        &self,
        customer: CustomerUuid,
        cart: Cart,
        expected_version: u64,
    ) -> Result<u64, StoreError>;
}

/// Order persistence.
#[automock]
#[async_trait]
pub trait OrderStore: Send + Sync {
    /// Persist an order, replacing any previous record with the same id.
    ///
    /// # Errors
    ///
    /// Returns a backend error when the write fails.
    async fn save_order(&self, order: Order) -> Result<(), StoreError>;

    /// Fetch a single order.
    ///
    /// # Errors
    ///
    /// Returns a backend error when the lookup fails; an unknown order is
    /// `Ok(None)`.
    async fn get_order(&self, order: OrderUuid) -> Result<Option<Order>, StoreError>;

    /// List a customer's orders, most recent first.
    ///
    /// # Errors
    ///
    /// Returns a backend error when the listing fails.
    async fn list_orders(&self, customer: CustomerUuid) -> Result<Vec<Order>, StoreError>;
}
