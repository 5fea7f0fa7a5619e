//! Orders service.

use std::{fmt, sync::Arc};

use jiff::Timestamp;
use tracing::{info, warn};
use uuid::Uuid;

use crate::{
    domain::{
        CustomerUuid,
        addresses::AddressUuid,
        coupons::service::resolve_and_evaluate,
        orders::{
            errors::{OrderError, OrdersServiceError},
            models::{Order, OrderStatus, OrderUuid},
        },
    },
    store::{AddressStore, CartStore, CouponStore, OrderStore, RetryPolicy, StoreError},
};

/// Checkout and order lifecycle over the cart, coupon, address and order
/// stores.
///
/// Placement freezes the live cart into an [`Order`] snapshot and retires
/// the cart through the same conditional save the cart mutations use, so a
/// concurrent cart edit can never slip into an already-priced order.
#[derive(Clone)]
pub struct OrdersService {
    carts: Arc<dyn CartStore>,
    coupons: Arc<dyn CouponStore>,
    addresses: Arc<dyn AddressStore>,
    orders: Arc<dyn OrderStore>,
    retry: RetryPolicy,
}

impl OrdersService {
    /// Creates the service over the given stores.
    #[must_use]
    pub fn new(
        carts: Arc<dyn CartStore>,
        coupons: Arc<dyn CouponStore>,
        addresses: Arc<dyn AddressStore>,
        orders: Arc<dyn OrderStore>,
        retry: RetryPolicy,
    ) -> Self {
        Self {
            carts,
            coupons,
            addresses,
            orders,
            retry,
        }
    }

    /// Places an order from the customer's current cart.
    ///
    /// Re-runs coupon evaluation against the cart's subtotal at placement
    /// time, snapshots the lines and the delivery address into a `Pending`
    /// order, and retires the cart.
    ///
    /// # Errors
    ///
    /// Returns [`OrderError::EmptyCart`] when there is nothing to order,
    /// [`OrdersServiceError::AddressNotFound`] when the address does not
    /// resolve for this customer, the
    /// [`CouponError`](crate::domain::coupons::CouponError) kinds when the
    /// supplied code does not apply, and
    /// [`OrdersServiceError::ConcurrentModification`] when retiring the cart
    /// keeps losing against concurrent edits.
    #[tracing::instrument(
        name = "orders.service.place_order",
        skip(self),
        fields(customer = %customer, address = %address, code = coupon_code.unwrap_or("-")),
        err
    )]
    pub async fn place_order(
        &self,
        customer: CustomerUuid,
        coupon_code: Option<&str>,
        address: AddressUuid,
        point_in_time: Timestamp,
    ) -> Result<Order, OrdersServiceError> {
        let delivery_address = self
            .addresses
            .find_address(customer, address)
            .await?
            .ok_or(OrdersServiceError::AddressNotFound(address))?;

        let mut attempt = 1u32;

        loop {
            let Some(versioned) = self.carts.load_cart(customer).await? else {
                return Err(OrderError::EmptyCart.into());
            };

            let (cart, version) = (versioned.value, versioned.version);

            if !cart.is_active() || cart.is_empty() {
                return Err(OrderError::EmptyCart.into());
            }

            let coupon = resolve_and_evaluate(
                self.coupons.as_ref(),
                cart.subtotal(),
                coupon_code,
                point_in_time,
            )
            .await?;

            let order = Order::from_cart(
                OrderUuid::from_uuid(Uuid::now_v7()),
                &cart,
                coupon,
                delivery_address.clone(),
                point_in_time,
            )?;

            let mut retired = cart;
            retired.retire();

            match self.carts.save_cart(customer, retired, version).await {
                Ok(_) => {
                    self.orders.save_order(order.clone()).await?;

                    info!(order = %order.uuid, total = %order.total, "placed order");

                    return Ok(order);
                }
                Err(StoreError::VersionConflict) if attempt < self.retry.max_attempts => {
                    // The cart changed underneath us; re-read and re-price it.
                    warn!(customer = %customer, attempt, "cart changed during checkout; retrying");
                    attempt += 1;
                }
                Err(StoreError::VersionConflict) => {
                    return Err(OrdersServiceError::ConcurrentModification);
                }
                Err(error) => return Err(error.into()),
            }
        }
    }

    /// Moves an order to a new lifecycle status.
    ///
    /// # Errors
    ///
    /// Returns [`OrdersServiceError::NotFound`] for an unknown order and
    /// [`OrderError::InvalidStatusTransition`] when the lifecycle does not
    /// permit the move.
    #[tracing::instrument(
        name = "orders.service.update_order_status",
        skip(self),
        fields(order = %order, status = %to),
        err
    )]
    pub async fn update_order_status(
        &self,
        order: OrderUuid,
        to: OrderStatus,
    ) -> Result<Order, OrdersServiceError> {
        let mut record = self
            .orders
            .get_order(order)
            .await?
            .ok_or(OrdersServiceError::NotFound(order))?;

        record.transition(to)?;

        self.orders.save_order(record.clone()).await?;

        info!(order = %order, status = %to, "updated order status");

        Ok(record)
    }

    /// Cancels an order, when its lifecycle still allows it.
    ///
    /// # Errors
    ///
    /// Returns [`OrdersServiceError::NotFound`] for an unknown order and
    /// [`OrderError::InvalidStatusTransition`] once the order is delivered
    /// or already cancelled.
    pub async fn cancel_order(&self, order: OrderUuid) -> Result<Order, OrdersServiceError> {
        self.update_order_status(order, OrderStatus::Cancelled)
            .await
    }

    /// Fetches a single order.
    ///
    /// # Errors
    ///
    /// Returns [`OrdersServiceError::NotFound`] for an unknown order.
    pub async fn get_order(&self, order: OrderUuid) -> Result<Order, OrdersServiceError> {
        self.orders
            .get_order(order)
            .await?
            .ok_or(OrdersServiceError::NotFound(order))
    }

    /// Lists a customer's order history, most recent first.
    ///
    /// # Errors
    ///
    /// Returns a store error when the listing fails.
    pub async fn list_orders(
        &self,
        customer: CustomerUuid,
    ) -> Result<Vec<Order>, OrdersServiceError> {
        self.orders.list_orders(customer).await.map_err(Into::into)
    }
}

impl fmt::Debug for OrdersService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OrdersService")
            .field("retry", &self.retry)
            .finish_non_exhaustive()
    }
}
