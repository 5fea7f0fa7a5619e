//! Coupons service.

use std::{fmt, sync::Arc};

use jiff::Timestamp;

use crate::{
    domain::{
        CustomerUuid,
        coupons::{
            errors::{CouponError, CouponsServiceError},
            models::{CouponApplication, Quote},
        },
    },
    money::Money,
    store::{CartStore, CouponStore},
};

/// Looks up an optional coupon code and evaluates it against a subtotal.
///
/// `None` in, `None` out: an absent code is not an error, it simply earns no
/// discount.
pub(crate) async fn resolve_and_evaluate(
    store: &dyn CouponStore,
    subtotal: Money,
    code: Option<&str>,
    point_in_time: Timestamp,
) -> Result<Option<CouponApplication>, CouponsServiceError> {
    let Some(code) = code else {
        return Ok(None);
    };

    let coupon = store
        .find_by_code(code)
        .await?
        .ok_or_else(|| CouponError::NotFound(code.to_string()))?;

    Ok(Some(coupon.evaluate(subtotal, point_in_time)?))
}

/// Coupon evaluation over the coupon and cart stores.
///
/// The cart aggregate never remembers a coupon, so callers quote the cart
/// again after every mutation; this service is that re-run.
#[derive(Clone)]
pub struct CouponsService {
    coupons: Arc<dyn CouponStore>,
    carts: Arc<dyn CartStore>,
}

impl CouponsService {
    /// Creates the service over the given stores.
    #[must_use]
    pub fn new(coupons: Arc<dyn CouponStore>, carts: Arc<dyn CartStore>) -> Self {
        Self { coupons, carts }
    }

    /// Evaluates an optional coupon code against a known subtotal.
    ///
    /// # Errors
    ///
    /// Returns [`CouponError`] kinds for a missing, expired, unavailable or
    /// under-minimum coupon, and a store error when the lookup fails.
    pub async fn evaluate(
        &self,
        subtotal: Money,
        code: Option<&str>,
        point_in_time: Timestamp,
    ) -> Result<Option<CouponApplication>, CouponsServiceError> {
        resolve_and_evaluate(self.coupons.as_ref(), subtotal, code, point_in_time).await
    }

    /// Prices the customer's current cart under an optional coupon code.
    ///
    /// Absent and already-ordered carts quote as a zero subtotal.
    ///
    /// # Errors
    ///
    /// Returns [`CouponError`] kinds when the code does not apply, and a
    /// store error when a lookup fails.
    #[tracing::instrument(
        name = "coupons.service.quote_cart",
        skip(self),
        fields(customer = %customer, code = code.unwrap_or("-")),
        err
    )]
    pub async fn quote_cart(
        &self,
        customer: CustomerUuid,
        code: Option<&str>,
        point_in_time: Timestamp,
    ) -> Result<Quote, CouponsServiceError> {
        let subtotal = match self.carts.load_cart(customer).await? {
            Some(versioned) if versioned.value.is_active() => versioned.value.subtotal(),
            _ => Money::ZERO,
        };

        let application =
            resolve_and_evaluate(self.coupons.as_ref(), subtotal, code, point_in_time).await?;

        Ok(Quote::new(subtotal, application))
    }
}

impl fmt::Debug for CouponsService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CouponsService").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;
    use uuid::Uuid;

    use crate::{
        domain::coupons::models::{Coupon, CouponUuid, DiscountPercent},
        store::{MockCartStore, MockCouponStore},
    };

    use super::*;

    fn tiffin20() -> Result<Coupon, CouponError> {
        Coupon::new(
            CouponUuid::from_uuid(Uuid::now_v7()),
            "TIFFIN20",
            DiscountPercent::new(20)?,
            Money::from_minor(50_000),
            Money::from_minor(15_000),
            Timestamp::UNIX_EPOCH,
            true,
        )
    }

    #[tokio::test]
    async fn absent_code_earns_no_discount() -> TestResult {
        let service = CouponsService::new(
            Arc::new(MockCouponStore::new()),
            Arc::new(MockCartStore::new()),
        );

        let application = service
            .evaluate(Money::from_minor(100_000), None, Timestamp::UNIX_EPOCH)
            .await?;

        assert!(application.is_none(), "no code should mean no discount");

        Ok(())
    }

    #[tokio::test]
    async fn unknown_code_returns_not_found() -> TestResult {
        let mut coupons = MockCouponStore::new();
        coupons.expect_find_by_code().returning(|_| Ok(None));

        let service = CouponsService::new(Arc::new(coupons), Arc::new(MockCartStore::new()));

        let result = service
            .evaluate(
                Money::from_minor(100_000),
                Some("NOSUCH"),
                Timestamp::UNIX_EPOCH,
            )
            .await;

        assert!(
            matches!(
                result,
                Err(CouponsServiceError::Coupon(CouponError::NotFound(_)))
            ),
            "expected NotFound, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn known_code_is_evaluated_against_the_subtotal() -> TestResult {
        let coupon = tiffin20()?;
        let mut coupons = MockCouponStore::new();
        coupons
            .expect_find_by_code()
            .returning(move |_| Ok(Some(coupon.clone())));

        let service = CouponsService::new(Arc::new(coupons), Arc::new(MockCartStore::new()));

        let application = service
            .evaluate(
                Money::from_minor(100_000),
                Some("TIFFIN20"),
                Timestamp::UNIX_EPOCH,
            )
            .await?;

        assert_eq!(
            application.map(|application| application.discount),
            Some(Money::from_minor(15_000))
        );

        Ok(())
    }

    #[tokio::test]
    async fn quote_for_absent_cart_has_zero_subtotal() -> TestResult {
        let mut carts = MockCartStore::new();
        carts.expect_load_cart().returning(|_| Ok(None));

        let service = CouponsService::new(Arc::new(MockCouponStore::new()), Arc::new(carts));

        let quote = service
            .quote_cart(
                CustomerUuid::from_uuid(Uuid::now_v7()),
                None,
                Timestamp::UNIX_EPOCH,
            )
            .await?;

        assert_eq!(quote.subtotal, Money::ZERO);
        assert_eq!(quote.total, Money::ZERO);

        Ok(())
    }
}
