//! Order Models

use std::fmt;

use jiff::Timestamp;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::{
    domain::{
        CustomerUuid,
        addresses::DeliveryAddress,
        carts::models::{Cart, CartItem},
        coupons::models::CouponApplication,
        menu::{FoodUuid, RestaurantUuid},
        orders::errors::OrderError,
    },
    money::Money,
    uuids::TypedUuid,
};

/// Order UUID
pub type OrderUuid = TypedUuid<Order>;

/// Order lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    /// Placed, awaiting restaurant confirmation.
    Pending,

    /// Accepted by the restaurant.
    Confirmed,

    /// Being prepared.
    Preparing,

    /// Handed to the courier.
    OutForDelivery,

    /// Delivered to the customer. Terminal.
    Delivered,

    /// Cancelled before delivery. Terminal.
    Cancelled,
}

impl OrderStatus {
    /// Whether the lifecycle permits moving from `self` to `to`.
    ///
    /// Forward movement follows the fixed sequence pending → confirmed →
    /// preparing → out for delivery → delivered, one step at a time.
    /// Cancellation is allowed from any status except the terminal two.
    #[must_use]
    pub const fn can_transition_to(self, to: Self) -> bool {
        matches!(
            (self, to),
            (Self::Pending, Self::Confirmed)
                | (Self::Confirmed, Self::Preparing)
                | (Self::Preparing, Self::OutForDelivery)
                | (Self::OutForDelivery, Self::Delivered)
                | (
                    Self::Pending | Self::Confirmed | Self::Preparing | Self::OutForDelivery,
                    Self::Cancelled
                )
        )
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Pending => "pending",
            Self::Confirmed => "confirmed",
            Self::Preparing => "preparing",
            Self::OutForDelivery => "out for delivery",
            Self::Delivered => "delivered",
            Self::Cancelled => "cancelled",
        };

        f.write_str(label)
    }
}

/// A frozen copy of one cart line at the moment the order was placed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderLine {
    /// Food id the line was priced for.
    pub food: FoodUuid,

    /// Display name captured at add-to-cart time.
    pub name: String,

    /// Display image captured at add-to-cart time.
    pub image: String,

    /// Quantity ordered.
    pub quantity: u32,

    /// Unit price captured at add-to-cart time.
    pub unit_price: Money,

    /// Unit price times quantity.
    pub line_total: Money,
}

impl From<&CartItem> for OrderLine {
    fn from(line: &CartItem) -> Self {
        Self {
            food: line.food(),
            name: line.name().to_string(),
            image: line.image().to_string(),
            quantity: line.quantity(),
            unit_price: line.unit_price(),
            line_total: line.line_total(),
        }
    }
}

/// An immutable snapshot of a cart plus applied discount and delivery
/// target, with a status lifecycle.
///
/// Price fields are fixed at placement; later status transitions never touch
/// them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    /// Unique order identifier.
    pub uuid: OrderUuid,

    /// Customer the order belongs to.
    pub customer: CustomerUuid,

    /// Restaurant the order was placed with.
    pub restaurant: RestaurantUuid,

    /// Frozen copies of the cart lines.
    pub lines: SmallVec<[OrderLine; 8]>,

    /// Sum of the line totals at placement.
    pub subtotal: Money,

    /// The coupon application, when a coupon was accepted at checkout.
    pub coupon: Option<CouponApplication>,

    /// Frozen copy of the delivery address.
    pub delivery_address: DeliveryAddress,

    /// Payable total: subtotal minus discount, clamped at zero.
    pub total: Money,

    /// Current lifecycle status.
    pub status: OrderStatus,

    /// When the order was placed.
    pub placed_at: Timestamp,
}

impl Order {
    /// Freezes a cart into an order snapshot.
    ///
    /// The lines and the address are copied, not referenced; the live cart
    /// stays untouched and is retired by the caller afterwards.
    ///
    /// # Errors
    ///
    /// Returns [`OrderError::EmptyCart`] when the cart has no lines.
    pub fn from_cart(
        uuid: OrderUuid,
        cart: &Cart,
        coupon: Option<CouponApplication>,
        delivery_address: DeliveryAddress,
        placed_at: Timestamp,
    ) -> Result<Self, OrderError> {
        let Some(restaurant) = cart.restaurant() else {
            return Err(OrderError::EmptyCart);
        };

        let subtotal = cart.subtotal();
        let total = coupon
            .as_ref()
            .map_or(subtotal, |application| application.total_after(subtotal));

        Ok(Self {
            uuid,
            customer: cart.customer(),
            restaurant,
            lines: cart.items().iter().map(OrderLine::from).collect(),
            subtotal,
            coupon,
            delivery_address,
            total,
            status: OrderStatus::Pending,
            placed_at,
        })
    }

    /// Moves the order to a new lifecycle status.
    ///
    /// # Errors
    ///
    /// Returns [`OrderError::InvalidStatusTransition`] when the lifecycle
    /// does not permit the move; the order is unchanged on error.
    pub fn transition(&mut self, to: OrderStatus) -> Result<(), OrderError> {
        if !self.status.can_transition_to(to) {
            return Err(OrderError::InvalidStatusTransition {
                from: self.status,
                to,
            });
        }

        self.status = to;

        Ok(())
    }
}
