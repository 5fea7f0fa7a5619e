//! Carts service.

use std::{fmt, sync::Arc};

use tracing::{info, warn};

use crate::{
    domain::{
        CustomerUuid,
        carts::{
            errors::CartsServiceError,
            models::{Cart, QuantityAction},
        },
        menu::{FoodUuid, RestaurantUuid},
    },
    store::{CartStore, MenuStore, RetryPolicy, StoreError},
};

/// Cart mutations over the menu and cart stores.
///
/// Every mutation is a load-mutate-save cycle against the cart store's
/// version counter; a lost race is retried up to the configured bound before
/// surfacing as a concurrent-modification error.
#[derive(Clone)]
pub struct CartsService {
    menu: Arc<dyn MenuStore>,
    carts: Arc<dyn CartStore>,
    retry: RetryPolicy,
}

impl CartsService {
    /// Creates the service over the given stores.
    #[must_use]
    pub fn new(menu: Arc<dyn MenuStore>, carts: Arc<dyn CartStore>, retry: RetryPolicy) -> Self {
        Self { menu, carts, retry }
    }

    /// Fetches the customer's active cart.
    ///
    /// An absent or already-ordered cart reads as a fresh empty cart.
    ///
    /// # Errors
    ///
    /// Returns a store error when the load fails.
    #[tracing::instrument(
        name = "carts.service.get_cart",
        skip(self),
        fields(customer = %customer),
        err
    )]
    pub async fn get_cart(&self, customer: CustomerUuid) -> Result<Cart, CartsServiceError> {
        let (cart, _) = self.load_active(customer).await?;

        Ok(cart)
    }

    /// Adds a menu item to the customer's cart, creating the cart on first
    /// add.
    ///
    /// # Errors
    ///
    /// Returns [`CartsServiceError::MenuItemNotFound`] when the menu
    /// collaborator cannot price the item, the aggregate's
    /// [`CartError`](crate::domain::carts::CartError) kinds when the
    /// mutation is rejected, and
    /// [`CartsServiceError::ConcurrentModification`] when retries are
    /// exhausted.
    #[tracing::instrument(
        name = "carts.service.add_item",
        skip(self),
        fields(customer = %customer, restaurant = %restaurant, food = %food, quantity),
        err
    )]
    pub async fn add_item(
        &self,
        customer: CustomerUuid,
        restaurant: RestaurantUuid,
        food: FoodUuid,
        quantity: u32,
    ) -> Result<Cart, CartsServiceError> {
        let menu_item = self
            .menu
            .get_menu_item(restaurant, food)
            .await?
            .ok_or(CartsServiceError::MenuItemNotFound { restaurant, food })?;

        let cart = self
            .mutate(customer, |cart| {
                cart.add_item(&menu_item, quantity).map_err(Into::into)
            })
            .await?;

        info!(customer = %customer, food = %food, "added item to cart");

        Ok(cart)
    }

    /// Increments or decrements the quantity of a line in the customer's
    /// cart.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::ItemNotInCart`](crate::domain::carts::CartError)
    /// when the food id is absent and
    /// [`CartsServiceError::ConcurrentModification`] when retries are
    /// exhausted.
    #[tracing::instrument(
        name = "carts.service.update_quantity",
        skip(self),
        fields(customer = %customer, food = %food, action = ?action),
        err
    )]
    pub async fn update_quantity(
        &self,
        customer: CustomerUuid,
        food: FoodUuid,
        action: QuantityAction,
    ) -> Result<Cart, CartsServiceError> {
        self.mutate(customer, |cart| {
            cart.update_quantity(food, action).map_err(Into::into)
        })
        .await
    }

    /// Removes a line from the customer's cart.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::ItemNotInCart`](crate::domain::carts::CartError)
    /// when the food id is absent and
    /// [`CartsServiceError::ConcurrentModification`] when retries are
    /// exhausted.
    #[tracing::instrument(
        name = "carts.service.remove_item",
        skip(self),
        fields(customer = %customer, food = %food),
        err
    )]
    pub async fn remove_item(
        &self,
        customer: CustomerUuid,
        food: FoodUuid,
    ) -> Result<Cart, CartsServiceError> {
        self.mutate(customer, |cart| cart.remove_item(food).map_err(Into::into))
            .await
    }

    /// Empties the customer's cart.
    ///
    /// # Errors
    ///
    /// Returns [`CartsServiceError::ConcurrentModification`] when retries
    /// are exhausted.
    #[tracing::instrument(
        name = "carts.service.clear_cart",
        skip(self),
        fields(customer = %customer),
        err
    )]
    pub async fn clear_cart(&self, customer: CustomerUuid) -> Result<Cart, CartsServiceError> {
        self.mutate(customer, |cart| {
            cart.clear();
            Ok(())
        })
        .await
    }

    async fn load_active(
        &self,
        customer: CustomerUuid,
    ) -> Result<(Cart, u64), CartsServiceError> {
        Ok(match self.carts.load_cart(customer).await? {
            Some(versioned) if versioned.value.is_active() => {
                (versioned.value, versioned.version)
            }
            // An already-ordered cart reads as absent, but its version
            // carries over so the next save still races correctly.
            Some(versioned) => (Cart::new(customer), versioned.version),
            None => (Cart::new(customer), 0),
        })
    }

    async fn mutate<F>(&self, customer: CustomerUuid, mutate: F) -> Result<Cart, CartsServiceError>
    where
        F: Fn(&mut Cart) -> Result<(), CartsServiceError>,
    {
        let mut attempt = 1u32;

        loop {
            let (mut cart, version) = self.load_active(customer).await?;

            mutate(&mut cart)?;

            match self.carts.save_cart(customer, cart.clone(), version).await {
                Ok(_) => return Ok(cart),
                Err(StoreError::VersionConflict) if attempt < self.retry.max_attempts => {
                    warn!(customer = %customer, attempt, "cart save lost a version race; retrying");
                    attempt += 1;
                }
                Err(StoreError::VersionConflict) => {
                    return Err(CartsServiceError::ConcurrentModification);
                }
                Err(error) => return Err(error.into()),
            }
        }
    }
}

impl fmt::Debug for CartsService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CartsService")
            .field("retry", &self.retry)
            .finish_non_exhaustive()
    }
}
