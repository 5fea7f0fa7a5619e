//! In-memory reference backend for the store traits.
//!
//! Backs the integration tests and serves as the embedding example for real
//! backends; the cart store implements the same conditional-save contract a
//! database-backed store would.

use async_trait::async_trait;
use rustc_hash::FxHashMap;
use tokio::sync::RwLock;

use crate::{
    domain::{
        CustomerUuid,
        addresses::{AddressUuid, DeliveryAddress},
        carts::models::Cart,
        coupons::models::Coupon,
        menu::{FoodUuid, MenuItem, RestaurantUuid},
        orders::models::{Order, OrderUuid},
    },
    store::{
        AddressStore, CartStore, CouponStore, MenuStore, OrderStore, StoreError, Versioned,
    },
};

/// In-memory menu, keyed by restaurant and food id.
#[derive(Debug, Default)]
pub struct InMemoryMenu {
    items: RwLock<FxHashMap<(RestaurantUuid, FoodUuid), MenuItem>>,
}

impl InMemoryMenu {
    /// Adds or replaces a menu item.
    pub async fn insert(&self, item: MenuItem) {
        self.items
            .write()
            .await
            .insert((item.restaurant, item.food), item);
    }
}

#[async_trait]
impl MenuStore for InMemoryMenu {
    async fn get_menu_item(
        &self,
        restaurant: RestaurantUuid,
        food: FoodUuid,
    ) -> Result<Option<MenuItem>, StoreError> {
        Ok(self.items.read().await.get(&(restaurant, food)).cloned())
    }
}

/// In-memory coupon book, keyed by code.
#[derive(Debug, Default)]
pub struct InMemoryCoupons {
    coupons: RwLock<FxHashMap<String, Coupon>>,
}

impl InMemoryCoupons {
    /// Adds or replaces a coupon under its code.
    pub async fn insert(&self, coupon: Coupon) {
        self.coupons
            .write()
            .await
            .insert(coupon.code.clone(), coupon);
    }
}

#[async_trait]
impl CouponStore for InMemoryCoupons {
    async fn find_by_code(&self, code: &str) -> Result<Option<Coupon>, StoreError> {
        Ok(self.coupons.read().await.get(code).cloned())
    }
}

/// In-memory address book, keyed by owner and address id.
#[derive(Debug, Default)]
pub struct InMemoryAddresses {
    addresses: RwLock<FxHashMap<(CustomerUuid, AddressUuid), DeliveryAddress>>,
}

impl InMemoryAddresses {
    /// Adds or replaces an address in its owner's book.
    pub async fn insert(&self, address: DeliveryAddress) {
        self.addresses
            .write()
            .await
            .insert((address.customer, address.uuid), address);
    }
}

#[async_trait]
impl AddressStore for InMemoryAddresses {
    async fn find_address(
        &self,
        customer: CustomerUuid,
        address: AddressUuid,
    ) -> Result<Option<DeliveryAddress>, StoreError> {
        Ok(self
            .addresses
            .read()
            .await
            .get(&(customer, address))
            .cloned())
    }
}

/// In-memory cart store with a per-cart version counter.
#[derive(Debug, Default)]
pub struct InMemoryCarts {
    carts: RwLock<FxHashMap<CustomerUuid, Versioned<Cart>>>,
}

#[async_trait]
impl CartStore for InMemoryCarts {
    async fn load_cart(
        &self,
        customer: CustomerUuid,
    ) -> Result<Option<Versioned<Cart>>, StoreError> {
        Ok(self.carts.read().await.get(&customer).cloned())
    }

    async fn save_cart(
        &self,
        customer: CustomerUuid,
        cart: Cart,
        expected_version: u64,
    ) -> Result<u64, StoreError> {
        let mut carts = self.carts.write().await;

        match carts.get_mut(&customer) {
            Some(stored) if stored.version == expected_version => {
                stored.value = cart;
                stored.version += 1;

                Ok(stored.version)
            }
            Some(_) => Err(StoreError::VersionConflict),
            None if expected_version == 0 => {
                carts.insert(
                    customer,
                    Versioned {
                        value: cart,
                        version: 1,
                    },
                );

                Ok(1)
            }
            None => Err(StoreError::VersionConflict),
        }
    }
}

/// In-memory order store.
#[derive(Debug, Default)]
pub struct InMemoryOrders {
    orders: RwLock<FxHashMap<OrderUuid, Order>>,
}

#[async_trait]
impl OrderStore for InMemoryOrders {
    async fn save_order(&self, order: Order) -> Result<(), StoreError> {
        self.orders.write().await.insert(order.uuid, order);

        Ok(())
    }

    async fn get_order(&self, order: OrderUuid) -> Result<Option<Order>, StoreError> {
        Ok(self.orders.read().await.get(&order).cloned())
    }

    async fn list_orders(&self, customer: CustomerUuid) -> Result<Vec<Order>, StoreError> {
        let mut orders: Vec<Order> = self
            .orders
            .read()
            .await
            .values()
            .filter(|order| order.customer == customer)
            .cloned()
            .collect();

        orders.sort_by(|a, b| b.placed_at.cmp(&a.placed_at).then(b.uuid.cmp(&a.uuid)));

        Ok(orders)
    }
}
