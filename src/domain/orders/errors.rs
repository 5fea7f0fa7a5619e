//! Order errors.

use thiserror::Error;

use crate::{
    domain::{
        addresses::AddressUuid,
        coupons::errors::{CouponError, CouponsServiceError},
        orders::models::{OrderStatus, OrderUuid},
    },
    store::StoreError,
};

/// Failures from order construction and status transitions.
#[derive(Debug, Error)]
pub enum OrderError {
    /// Orders are only placed from carts with at least one line.
    #[error("cannot place an order from an empty cart")]
    EmptyCart,

    /// The requested status change is outside the order lifecycle.
    #[error("invalid order status transition from {from} to {to}")]
    InvalidStatusTransition {
        /// Status the order is currently in.
        from: OrderStatus,
        /// Status that was requested.
        to: OrderStatus,
    },
}

/// Orders service errors.
#[derive(Debug, Error)]
pub enum OrdersServiceError {
    /// Order construction or lifecycle rules rejected the request.
    #[error(transparent)]
    Order(#[from] OrderError),

    /// The delivery address does not exist for this customer.
    #[error("delivery address {0} not found")]
    AddressNotFound(AddressUuid),

    /// No order exists with the given id.
    #[error("order {0} not found")]
    NotFound(OrderUuid),

    /// Coupon lookup or evaluation failed.
    #[error(transparent)]
    Coupon(#[from] CouponError),

    /// Conditional cart saves kept losing against concurrent writers.
    #[error("cart was modified concurrently and retries were exhausted")]
    ConcurrentModification,

    /// The backing store failed.
    #[error("storage error")]
    Store(#[from] StoreError),
}

impl From<CouponsServiceError> for OrdersServiceError {
    fn from(error: CouponsServiceError) -> Self {
        match error {
            CouponsServiceError::Coupon(coupon) => Self::Coupon(coupon),
            CouponsServiceError::Store(store) => Self::Store(store),
        }
    }
}
