//! Cart errors.

use thiserror::Error;

use crate::{
    domain::menu::{FoodUuid, RestaurantUuid},
    store::StoreError,
};

/// Failures from cart aggregate mutations.
#[derive(Debug, Error)]
pub enum CartError {
    /// The cart already holds items from a different restaurant.
    #[error("cart holds items from restaurant {existing}; cannot add an item from {requested}")]
    CrossRestaurantConflict {
        /// Restaurant the cart's items belong to.
        existing: RestaurantUuid,
        /// Restaurant of the rejected item.
        requested: RestaurantUuid,
    },

    /// The food id is not present in the cart.
    #[error("item {0} is not in the cart")]
    ItemNotInCart(FoodUuid),

    /// Line quantities start at one.
    #[error("quantity must be at least 1")]
    ZeroQuantity,
}

/// Carts service errors.
#[derive(Debug, Error)]
pub enum CartsServiceError {
    /// The aggregate rejected the mutation.
    #[error(transparent)]
    Cart(#[from] CartError),

    /// The menu collaborator could not price the item.
    #[error("menu item {food} not found for restaurant {restaurant}")]
    MenuItemNotFound {
        /// Restaurant the lookup was scoped to.
        restaurant: RestaurantUuid,
        /// Food id that could not be resolved.
        food: FoodUuid,
    },

    /// Conditional saves kept losing against concurrent writers.
    #[error("cart was modified concurrently and retries were exhausted")]
    ConcurrentModification,

    /// The backing store failed.
    #[error("storage error")]
    Store(#[from] StoreError),
}
