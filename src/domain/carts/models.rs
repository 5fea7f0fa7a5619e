//! Cart Models

use serde::{Deserialize, Serialize};

use crate::{
    domain::{
        CustomerUuid,
        carts::errors::CartError,
        menu::{FoodUuid, MenuItem, RestaurantUuid},
    },
    money::Money,
};

/// Direction of a quantity update on an existing line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuantityAction {
    /// Bump the line quantity up by one.
    Increment,

    /// Bump the line quantity down by one; at quantity one the line is
    /// removed entirely.
    Decrement,
}

/// Cart lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CartStatus {
    /// The cart accepts mutations.
    Active,

    /// The cart has been turned into an order; it reads as empty and the
    /// next add starts fresh.
    Ordered,
}

/// A priced cart line: one food, a quantity, and the unit price captured
/// when the food was first added.
///
/// Fields are private so a line's quantity can only change through the
/// owning [`Cart`], which keeps the quantity floor intact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartItem {
    food: FoodUuid,
    name: String,
    image: String,
    quantity: u32,
    unit_price: Money,
}

impl CartItem {
    fn new(menu_item: &MenuItem, quantity: u32) -> Result<Self, CartError> {
        if quantity == 0 {
            return Err(CartError::ZeroQuantity);
        }

        Ok(Self {
            food: menu_item.food,
            name: menu_item.name.clone(),
            image: menu_item.image.clone(),
            quantity,
            unit_price: menu_item.unit_price,
        })
    }

    /// Food id of the line.
    #[must_use]
    pub const fn food(&self) -> FoodUuid {
        self.food
    }

    /// Display name captured at add time.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Display image captured at add time.
    #[must_use]
    pub fn image(&self) -> &str {
        &self.image
    }

    /// Current line quantity, always at least one.
    #[must_use]
    pub const fn quantity(&self) -> u32 {
        self.quantity
    }

    /// Unit price captured at add time; never re-fetched mid-cart.
    #[must_use]
    pub const fn unit_price(&self) -> Money {
        self.unit_price
    }

    /// Unit price times quantity.
    #[must_use]
    pub fn line_total(&self) -> Money {
        self.unit_price.times(self.quantity)
    }
}

/// A customer's cart: an ordered list of lines, unique by food id, all
/// belonging to a single restaurant.
///
/// Every mutation goes through the aggregate, and the subtotal is computed
/// from the lines on demand, so a stale total is unrepresentable. The cart
/// never remembers a coupon: callers re-run coupon evaluation after any
/// mutation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cart {
    customer: CustomerUuid,
    restaurant: Option<RestaurantUuid>,
    status: CartStatus,
    items: Vec<CartItem>,
}

impl Cart {
    /// Creates an empty active cart for a customer.
    #[must_use]
    pub const fn new(customer: CustomerUuid) -> Self {
        Self {
            customer,
            restaurant: None,
            status: CartStatus::Active,
            items: Vec::new(),
        }
    }

    /// The customer that owns the cart.
    #[must_use]
    pub const fn customer(&self) -> CustomerUuid {
        self.customer
    }

    /// Restaurant the cart's items belong to; `None` while the cart is
    /// empty.
    #[must_use]
    pub const fn restaurant(&self) -> Option<RestaurantUuid> {
        self.restaurant
    }

    /// Lifecycle status.
    #[must_use]
    pub const fn status(&self) -> CartStatus {
        self.status
    }

    /// Whether the cart accepts mutations.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.status == CartStatus::Active
    }

    /// The cart lines, in insertion order.
    #[must_use]
    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    /// Whether the cart has no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Sum of the line totals.
    #[must_use]
    pub fn subtotal(&self) -> Money {
        self.items
            .iter()
            .fold(Money::ZERO, |total, line| {
                total.saturating_add(line.line_total())
            })
    }

    /// Adds a resolved menu item to the cart.
    ///
    /// If the food is already in the cart its quantity is incremented
    /// instead of duplicating the line; the captured unit price is kept.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::ZeroQuantity`] for a zero quantity and
    /// [`CartError::CrossRestaurantConflict`] when the cart already holds
    /// items from a different restaurant. The cart is unchanged on error.
    pub fn add_item(&mut self, menu_item: &MenuItem, quantity: u32) -> Result<(), CartError> {
        let line = CartItem::new(menu_item, quantity)?;

        if let Some(existing) = self.restaurant
            && existing != menu_item.restaurant
        {
            return Err(CartError::CrossRestaurantConflict {
                existing,
                requested: menu_item.restaurant,
            });
        }

        if let Some(current) = self.items.iter_mut().find(|l| l.food == menu_item.food) {
            current.quantity = current.quantity.saturating_add(quantity);
        } else {
            self.restaurant = Some(menu_item.restaurant);
            self.items.push(line);
        }

        Ok(())
    }

    /// Increments or decrements the quantity of an existing line.
    ///
    /// Decrementing a quantity of one removes the line entirely.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::ItemNotInCart`] when the food id is absent; the
    /// cart is unchanged on error.
    pub fn update_quantity(
        &mut self,
        food: FoodUuid,
        action: QuantityAction,
    ) -> Result<(), CartError> {
        let position = self
            .items
            .iter()
            .position(|l| l.food == food)
            .ok_or(CartError::ItemNotInCart(food))?;

        let Some(line) = self.items.get_mut(position) else {
            return Err(CartError::ItemNotInCart(food));
        };

        match action {
            QuantityAction::Increment => {
                line.quantity = line.quantity.saturating_add(1);
            }
            QuantityAction::Decrement if line.quantity > 1 => {
                line.quantity -= 1;
            }
            QuantityAction::Decrement => {
                self.items.remove(position);
                self.reset_restaurant_if_empty();
            }
        }

        Ok(())
    }

    /// Removes a line from the cart.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::ItemNotInCart`] when the food id is absent; the
    /// cart is unchanged on error.
    pub fn remove_item(&mut self, food: FoodUuid) -> Result<(), CartError> {
        let position = self
            .items
            .iter()
            .position(|l| l.food == food)
            .ok_or(CartError::ItemNotInCart(food))?;

        self.items.remove(position);
        self.reset_restaurant_if_empty();

        Ok(())
    }

    /// Empties the cart and detaches it from its restaurant. The cart stays
    /// active.
    pub fn clear(&mut self) {
        self.items.clear();
        self.restaurant = None;
    }

    /// Marks the cart as turned into an order.
    pub fn retire(&mut self) {
        self.status = CartStatus::Ordered;
    }

    fn reset_restaurant_if_empty(&mut self) {
        if self.items.is_empty() {
            self.restaurant = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;
    use uuid::Uuid;

    use super::*;

    fn menu_item(restaurant: RestaurantUuid, name: &str, unit_price: u64) -> MenuItem {
        MenuItem {
            restaurant,
            food: FoodUuid::from_uuid(Uuid::now_v7()),
            name: name.to_string(),
            image: format!("{name}.png"),
            unit_price: Money::from_minor(unit_price),
        }
    }

    fn cart() -> Cart {
        Cart::new(CustomerUuid::from_uuid(Uuid::now_v7()))
    }

    #[test]
    fn add_increment_decrement_scenario() -> TestResult {
        let restaurant = RestaurantUuid::from_uuid(Uuid::now_v7());
        let pizza = menu_item(restaurant, "Pizza", 20_000);
        let mut cart = cart();

        cart.add_item(&pizza, 1)?;
        assert_eq!(cart.subtotal(), Money::from_minor(20_000));

        // Same food again: the quantity bumps instead of duplicating a line.
        cart.add_item(&pizza, 1)?;
        assert_eq!(cart.items().len(), 1);
        assert_eq!(cart.subtotal(), Money::from_minor(40_000));

        cart.update_quantity(pizza.food, QuantityAction::Decrement)?;
        assert_eq!(cart.subtotal(), Money::from_minor(20_000));

        // Decrementing below one removes the line entirely.
        cart.update_quantity(pizza.food, QuantityAction::Decrement)?;
        assert!(cart.is_empty(), "cart should be empty");
        assert_eq!(cart.subtotal(), Money::ZERO);
        assert!(cart.restaurant().is_none(), "empty cart detaches restaurant");

        Ok(())
    }

    #[test]
    fn subtotal_tracks_line_totals_across_mutations() -> TestResult {
        let restaurant = RestaurantUuid::from_uuid(Uuid::now_v7());
        let pizza = menu_item(restaurant, "Pizza", 20_000);
        let naan = menu_item(restaurant, "Naan", 3_500);
        let lassi = menu_item(restaurant, "Lassi", 5_000);
        let mut cart = cart();

        cart.add_item(&pizza, 2)?;
        cart.add_item(&naan, 3)?;
        cart.add_item(&lassi, 1)?;
        cart.update_quantity(naan.food, QuantityAction::Increment)?;
        cart.remove_item(lassi.food)?;

        let expected: u64 = cart.items().iter().map(|l| l.line_total().minor()).sum();

        assert_eq!(cart.subtotal(), Money::from_minor(expected));
        assert_eq!(cart.subtotal(), Money::from_minor(54_000));

        Ok(())
    }

    #[test]
    fn cross_restaurant_add_is_rejected_and_cart_unchanged() -> TestResult {
        let pizza = menu_item(RestaurantUuid::from_uuid(Uuid::now_v7()), "Pizza", 20_000);
        let sushi = menu_item(RestaurantUuid::from_uuid(Uuid::now_v7()), "Sushi", 30_000);
        let mut cart = cart();

        cart.add_item(&pizza, 1)?;
        let before = cart.clone();

        let result = cart.add_item(&sushi, 1);

        assert!(
            matches!(result, Err(CartError::CrossRestaurantConflict { .. })),
            "expected CrossRestaurantConflict, got {result:?}"
        );
        assert_eq!(cart, before);

        Ok(())
    }

    #[test]
    fn remove_absent_item_is_rejected_and_cart_unchanged() -> TestResult {
        let restaurant = RestaurantUuid::from_uuid(Uuid::now_v7());
        let pizza = menu_item(restaurant, "Pizza", 20_000);
        let mut cart = cart();

        cart.add_item(&pizza, 1)?;
        let before = cart.clone();
        let absent = FoodUuid::from_uuid(Uuid::now_v7());

        let result = cart.remove_item(absent);

        assert!(
            matches!(result, Err(CartError::ItemNotInCart(food)) if food == absent),
            "expected ItemNotInCart, got {result:?}"
        );
        assert_eq!(cart, before);

        Ok(())
    }

    #[test]
    fn update_quantity_on_absent_item_is_rejected() {
        let mut cart = cart();
        let absent = FoodUuid::from_uuid(Uuid::now_v7());

        let result = cart.update_quantity(absent, QuantityAction::Increment);

        assert!(
            matches!(result, Err(CartError::ItemNotInCart(_))),
            "expected ItemNotInCart, got {result:?}"
        );
    }

    #[test]
    fn zero_quantity_add_is_rejected() {
        let pizza = menu_item(RestaurantUuid::from_uuid(Uuid::now_v7()), "Pizza", 20_000);
        let mut cart = cart();

        let result = cart.add_item(&pizza, 0);

        assert!(
            matches!(result, Err(CartError::ZeroQuantity)),
            "expected ZeroQuantity, got {result:?}"
        );
        assert!(cart.is_empty(), "cart should still be empty");
    }

    #[test]
    fn unit_price_is_frozen_at_add_time() -> TestResult {
        let restaurant = RestaurantUuid::from_uuid(Uuid::now_v7());
        let mut pizza = menu_item(restaurant, "Pizza", 20_000);
        let mut cart = cart();

        cart.add_item(&pizza, 1)?;

        // A menu reprice between adds must not touch the captured price.
        pizza.unit_price = Money::from_minor(25_000);
        cart.add_item(&pizza, 1)?;

        assert_eq!(cart.subtotal(), Money::from_minor(40_000));

        Ok(())
    }

    #[test]
    fn clear_empties_and_detaches_restaurant() -> TestResult {
        let restaurant = RestaurantUuid::from_uuid(Uuid::now_v7());
        let pizza = menu_item(restaurant, "Pizza", 20_000);
        let mut cart = cart();

        cart.add_item(&pizza, 2)?;
        cart.clear();

        assert!(cart.is_empty(), "cart should be empty");
        assert!(cart.restaurant().is_none(), "restaurant should be detached");
        assert!(cart.is_active(), "clearing keeps the cart active");
        assert_eq!(cart.subtotal(), Money::ZERO);

        Ok(())
    }

    #[test]
    fn retired_cart_reports_inactive() {
        let mut cart = cart();
        cart.retire();

        assert_eq!(cart.status(), CartStatus::Ordered);
        assert!(!cart.is_active(), "ordered cart should be inactive");
    }
}
