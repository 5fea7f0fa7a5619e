//! Coupon errors.

use jiff::Timestamp;
use thiserror::Error;

use crate::{money::Money, money::MoneyError, store::StoreError};

/// Failures from coupon validation and evaluation.
#[derive(Debug, Error)]
pub enum CouponError {
    /// No coupon exists for the given code.
    #[error("coupon {0:?} not found")]
    NotFound(String),

    /// The coupon's expiry date has passed.
    #[error("coupon {code:?} expired at {expired_at}")]
    Expired {
        /// Coupon code.
        code: String,
        /// When the coupon stopped being valid.
        expired_at: Timestamp,
    },

    /// The coupon has been switched off.
    #[error("coupon {code:?} is not available")]
    Unavailable {
        /// Coupon code.
        code: String,
    },

    /// The cart subtotal is below the coupon's minimum order value.
    #[error("order subtotal {subtotal} is below the coupon minimum of {min_order}")]
    MinOrderNotMet {
        /// Minimum order value required by the coupon.
        min_order: Money,
        /// Subtotal the coupon was evaluated against.
        subtotal: Money,
    },

    /// Discount percentage outside the 1–100 range.
    #[error("discount percentage must be between 1 and 100, got {0}")]
    InvalidPercent(u8),

    /// Coupon code must not be empty.
    #[error("coupon code must not be empty")]
    EmptyCode,

    /// Discount arithmetic failed.
    #[error(transparent)]
    Money(#[from] MoneyError),
}

/// Coupons service errors.
#[derive(Debug, Error)]
pub enum CouponsServiceError {
    /// Coupon lookup or evaluation failed.
    #[error(transparent)]
    Coupon(#[from] CouponError),

    /// The backing store failed.
    #[error("storage error")]
    Store(#[from] StoreError),
}
