//! Coupon Models

use decimal_percentage::Percentage;
use jiff::Timestamp;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{domain::coupons::errors::CouponError, money::Money, uuids::TypedUuid};

/// Coupon UUID
pub type CouponUuid = TypedUuid<Coupon>;

/// A whole-number discount percentage, validated to the 1–100 range at
/// construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct DiscountPercent(u8);

impl DiscountPercent {
    /// Validates and wraps a whole-number percentage.
    ///
    /// # Errors
    ///
    /// Returns [`CouponError::InvalidPercent`] when the value is 0 or above
    /// 100.
    pub fn new(percent: u8) -> Result<Self, CouponError> {
        if (1..=100).contains(&percent) {
            Ok(Self(percent))
        } else {
            Err(CouponError::InvalidPercent(percent))
        }
    }

    /// The raw percent points (e.g. `20` for a 20% discount).
    #[must_use]
    pub const fn points(self) -> u8 {
        self.0
    }

    /// The percentage as a fraction suitable for money math (e.g. `0.20`).
    #[must_use]
    pub fn fraction(self) -> Percentage {
        Percentage::from(Decimal::from(self.0) / Decimal::from(100_u8))
    }
}

impl TryFrom<u8> for DiscountPercent {
    type Error = CouponError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<DiscountPercent> for u8 {
    fn from(value: DiscountPercent) -> Self {
        value.points()
    }
}

/// A named discount rule with percentage, minimum order, and cap constraints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Coupon {
    /// Unique coupon identifier.
    pub uuid: CouponUuid,

    /// Unique, case-sensitive coupon code.
    pub code: String,

    /// Percentage taken off the subtotal.
    pub percent: DiscountPercent,

    /// Minimum subtotal the coupon applies to.
    pub min_order: Money,

    /// Upper bound on the computed discount.
    pub max_discount: Money,

    /// Instant after which the coupon stops being valid.
    pub expires_at: Timestamp,

    /// Availability switch, toggled by restaurant/admin tooling.
    pub available: bool,
}

impl Coupon {
    /// Creates a coupon, validating the code.
    ///
    /// # Errors
    ///
    /// Returns [`CouponError::EmptyCode`] when the code is empty or
    /// whitespace-only.
    pub fn new(
        uuid: CouponUuid,
        code: impl Into<String>,
        percent: DiscountPercent,
        min_order: Money,
        max_discount: Money,
        expires_at: Timestamp,
        available: bool,
    ) -> Result<Self, CouponError> {
        let code = code.into();

        if code.trim().is_empty() {
            return Err(CouponError::EmptyCode);
        }

        Ok(Self {
            uuid,
            code,
            percent,
            min_order,
            max_discount,
            expires_at,
            available,
        })
    }

    /// Evaluates the coupon against a cart subtotal at a point in time.
    ///
    /// Pure over the coupon record and its inputs; usage counting is not
    /// part of this engine.
    ///
    /// # Errors
    ///
    /// Returns [`CouponError::Unavailable`], [`CouponError::Expired`] or
    /// [`CouponError::MinOrderNotMet`] when the coupon does not apply, and
    /// [`CouponError::Money`] when discount arithmetic overflows.
    pub fn evaluate(
        &self,
        subtotal: Money,
        point_in_time: Timestamp,
    ) -> Result<CouponApplication, CouponError> {
        if self.expires_at < point_in_time {
            return Err(CouponError::Expired {
                code: self.code.clone(),
                expired_at: self.expires_at,
            });
        }

        if !self.available {
            return Err(CouponError::Unavailable {
                code: self.code.clone(),
            });
        }

        if subtotal < self.min_order {
            return Err(CouponError::MinOrderNotMet {
                min_order: self.min_order,
                subtotal,
            });
        }

        let discount = subtotal
            .percent_of(self.percent.fraction())?
            .min(self.max_discount);

        Ok(CouponApplication {
            code: self.code.clone(),
            discount,
        })
    }
}

/// The outcome of applying a coupon: the code and the discount it earned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CouponApplication {
    /// Code of the applied coupon.
    pub code: String,

    /// Discount taken off the subtotal.
    pub discount: Money,
}

impl CouponApplication {
    /// The payable total after taking the discount off `subtotal`.
    #[must_use]
    pub fn total_after(&self, subtotal: Money) -> Money {
        subtotal.saturating_sub(self.discount)
    }
}

/// A priced view of a cart: subtotal, optional coupon application, and the
/// payable total.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quote {
    /// Sum of the cart's line totals.
    pub subtotal: Money,

    /// The coupon application, when a code was supplied and accepted.
    pub coupon: Option<CouponApplication>,

    /// Subtotal minus discount, clamped at zero.
    pub total: Money,
}

impl Quote {
    /// Builds a quote from a subtotal and an optional coupon application.
    #[must_use]
    pub fn new(subtotal: Money, coupon: Option<CouponApplication>) -> Self {
        let total = coupon
            .as_ref()
            .map_or(subtotal, |application| application.total_after(subtotal));

        Self {
            subtotal,
            coupon,
            total,
        }
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;
    use uuid::Uuid;

    use super::*;

    fn coupon(
        percent: u8,
        min_order: u64,
        max_discount: u64,
        available: bool,
    ) -> Result<Coupon, CouponError> {
        Coupon::new(
            CouponUuid::from_uuid(Uuid::now_v7()),
            "TIFFIN20",
            DiscountPercent::new(percent)?,
            Money::from_minor(min_order),
            Money::from_minor(max_discount),
            Timestamp::UNIX_EPOCH,
            available,
        )
    }

    fn now() -> Timestamp {
        Timestamp::UNIX_EPOCH
    }

    #[test]
    fn discount_is_capped_by_max_discount() -> TestResult {
        // 20% of 1000.00 would be 200.00; the cap brings it down to 150.00.
        let coupon = coupon(20, 50_000, 15_000, true)?;
        let application = coupon.evaluate(Money::from_minor(100_000), now())?;

        assert_eq!(application.discount, Money::from_minor(15_000));
        assert_eq!(
            application.total_after(Money::from_minor(100_000)),
            Money::from_minor(85_000)
        );

        Ok(())
    }

    #[test]
    fn discount_below_cap_uses_percentage() -> TestResult {
        let coupon = coupon(10, 0, 15_000, true)?;
        let application = coupon.evaluate(Money::from_minor(40_000), now())?;

        assert_eq!(application.discount, Money::from_minor(4_000));

        Ok(())
    }

    #[test]
    fn subtotal_below_minimum_is_rejected() -> TestResult {
        let coupon = coupon(20, 50_000, 15_000, true)?;
        let result = coupon.evaluate(Money::from_minor(30_000), now());

        assert!(
            matches!(result, Err(CouponError::MinOrderNotMet { .. })),
            "expected MinOrderNotMet, got {result:?}"
        );

        Ok(())
    }

    #[test]
    fn unavailable_coupon_is_rejected() -> TestResult {
        let coupon = coupon(20, 0, 15_000, false)?;
        let result = coupon.evaluate(Money::from_minor(100_000), now());

        assert!(
            matches!(result, Err(CouponError::Unavailable { .. })),
            "expected Unavailable, got {result:?}"
        );

        Ok(())
    }

    #[test]
    fn expired_coupon_is_rejected() -> TestResult {
        let coupon = coupon(20, 0, 15_000, true)?;
        let after_expiry = "2031-01-01T00:00:00Z".parse()?;

        let result = coupon.evaluate(Money::from_minor(100_000), after_expiry);

        assert!(
            matches!(result, Err(CouponError::Expired { .. })),
            "expected Expired, got {result:?}"
        );

        Ok(())
    }

    #[test]
    fn percent_outside_range_is_rejected() {
        assert!(
            matches!(DiscountPercent::new(0), Err(CouponError::InvalidPercent(0))),
            "0% should be rejected"
        );
        assert!(
            matches!(
                DiscountPercent::new(101),
                Err(CouponError::InvalidPercent(101))
            ),
            "101% should be rejected"
        );
    }

    #[test]
    fn empty_code_is_rejected() -> TestResult {
        let result = Coupon::new(
            CouponUuid::from_uuid(Uuid::now_v7()),
            "  ",
            DiscountPercent::new(20)?,
            Money::ZERO,
            Money::from_minor(100),
            Timestamp::UNIX_EPOCH,
            true,
        );

        assert!(
            matches!(result, Err(CouponError::EmptyCode)),
            "expected EmptyCode, got {result:?}"
        );

        Ok(())
    }

    #[test]
    fn quote_without_coupon_keeps_subtotal() {
        let quote = Quote::new(Money::from_minor(5_000), None);

        assert_eq!(quote.total, Money::from_minor(5_000));
        assert!(quote.coupon.is_none(), "no coupon should be recorded");
    }
}
