//! Menu Models

use serde::{Deserialize, Serialize};

use crate::{money::Money, uuids::TypedUuid};

/// Restaurants are managed by the surrounding platform; only their identity
/// crosses into this engine.
#[derive(Debug)]
pub struct Restaurant;

/// Restaurant UUID
pub type RestaurantUuid = TypedUuid<Restaurant>;

/// Food UUID
pub type FoodUuid = TypedUuid<MenuItem>;

/// A priced menu entry as resolved by the menu collaborator at add-to-cart
/// time.
///
/// The unit price captured here is the one the cart carries for the lifetime
/// of the line item; mid-cart menu edits never reprice an existing line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuItem {
    /// Restaurant the item belongs to.
    pub restaurant: RestaurantUuid,

    /// Unique food identifier within the platform.
    pub food: FoodUuid,

    /// Display name, denormalized into carts and orders.
    pub name: String,

    /// Display image reference, denormalized into carts and orders.
    pub image: String,

    /// Price per unit at lookup time.
    pub unit_price: Money,
}
