//! Engine Context

use std::sync::Arc;

use crate::{
    domain::{carts::CartsService, coupons::CouponsService, orders::OrdersService},
    store::{
        AddressStore, CartStore, CouponStore, MenuStore, OrderStore, RetryPolicy,
        memory::{InMemoryAddresses, InMemoryCarts, InMemoryCoupons, InMemoryMenu, InMemoryOrders},
    },
};

/// The store implementations the engine is wired over.
#[derive(Clone)]
pub struct Stores {
    /// Menu lookup collaborator.
    pub menu: Arc<dyn MenuStore>,

    /// Coupon lookup collaborator.
    pub coupons: Arc<dyn CouponStore>,

    /// Address-book lookup collaborator.
    pub addresses: Arc<dyn AddressStore>,

    /// Cart persistence.
    pub carts: Arc<dyn CartStore>,

    /// Order persistence.
    pub orders: Arc<dyn OrderStore>,
}

impl std::fmt::Debug for Stores {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Stores").finish_non_exhaustive()
    }
}

/// Handles to the bundled in-memory backend, kept around for seeding menus,
/// coupons and addresses.
#[derive(Debug, Default, Clone)]
pub struct InMemoryStores {
    /// Seedable in-memory menu.
    pub menu: Arc<InMemoryMenu>,

    /// Seedable in-memory coupon book.
    pub coupons: Arc<InMemoryCoupons>,

    /// Seedable in-memory address book.
    pub addresses: Arc<InMemoryAddresses>,

    /// In-memory cart persistence.
    pub carts: Arc<InMemoryCarts>,

    /// In-memory order persistence.
    pub orders: Arc<InMemoryOrders>,
}

impl From<&InMemoryStores> for Stores {
    fn from(stores: &InMemoryStores) -> Self {
        Self {
            menu: stores.menu.clone(),
            coupons: stores.coupons.clone(),
            addresses: stores.addresses.clone(),
            carts: stores.carts.clone(),
            orders: stores.orders.clone(),
        }
    }
}

/// The engine's services, wired over a shared set of stores.
///
/// Any request layer embeds the engine by building a `Context` once and
/// calling the services per request.
#[derive(Debug, Clone)]
pub struct Context {
    /// Cart mutations.
    pub carts: CartsService,

    /// Coupon evaluation and cart quoting.
    pub coupons: CouponsService,

    /// Checkout and order lifecycle.
    pub orders: OrdersService,
}

impl Context {
    /// Wires the services over the given stores.
    #[must_use]
    pub fn new(stores: &Stores, retry: RetryPolicy) -> Self {
        Self {
            carts: CartsService::new(stores.menu.clone(), stores.carts.clone(), retry),
            coupons: CouponsService::new(stores.coupons.clone(), stores.carts.clone()),
            orders: OrdersService::new(
                stores.carts.clone(),
                stores.coupons.clone(),
                stores.addresses.clone(),
                stores.orders.clone(),
                retry,
            ),
        }
    }

    /// Assembles the engine over the bundled in-memory backend, returning
    /// the store handles for seeding.
    #[must_use]
    pub fn in_memory() -> (Self, InMemoryStores) {
        let stores = InMemoryStores::default();
        let context = Self::new(&Stores::from(&stores), RetryPolicy::default());

        (context, stores)
    }
}
