//! Fixtures
//!
//! YAML fixture sets under `fixtures/` seed the in-memory backend with
//! realistic menus, coupons and address books for integration tests and
//! demos.

use std::{fs, path::Path, path::PathBuf};

use jiff::Timestamp;
use rust_decimal::{Decimal, prelude::ToPrimitive};
use serde::Deserialize;
use thiserror::Error;
use uuid::Uuid;

use crate::{
    context::InMemoryStores,
    domain::{
        addresses::{AddressUuid, DeliveryAddress},
        coupons::{
            CouponError,
            models::{Coupon, CouponUuid, DiscountPercent},
        },
        menu::{FoodUuid, MenuItem, RestaurantUuid},
    },
    money::Money,
};

/// Fixture Parsing Errors
#[derive(Debug, Error)]
pub enum FixtureError {
    /// IO error reading fixture files
    #[error("failed to read fixture file: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing error
    #[error("failed to parse YAML: {0}")]
    Yaml(#[from] serde_norway::Error),

    /// Prices must be decimal strings with at most two fractional digits
    #[error("invalid price: {0}")]
    InvalidPrice(String),

    /// Coupon fields failed domain validation
    #[error(transparent)]
    Coupon(#[from] CouponError),
}

#[derive(Debug, Deserialize)]
struct RawMenuItem {
    restaurant: Uuid,
    food: Uuid,
    name: String,
    image: String,
    price: String,
}

#[derive(Debug, Deserialize)]
struct RawCoupon {
    code: String,
    percent: u8,
    min_order: String,
    max_discount: String,
    expires_at: Timestamp,
    available: bool,
}

#[derive(Debug, Deserialize)]
struct RawAddress {
    uuid: Uuid,
    customer: Uuid,
    street: String,
    city: String,
    postcode: String,
}

#[derive(Debug, Deserialize)]
struct RawFixture {
    #[serde(default)]
    menu: Vec<RawMenuItem>,

    #[serde(default)]
    coupons: Vec<RawCoupon>,

    #[serde(default)]
    addresses: Vec<RawAddress>,
}

/// A parsed fixture set: menu items, coupons and addresses ready to seed
/// into stores.
#[derive(Debug, Clone, Default)]
pub struct Fixture {
    /// Menu items across the set's restaurants.
    pub menu: Vec<MenuItem>,

    /// Coupons, keyed by their codes when seeded.
    pub coupons: Vec<Coupon>,

    /// Customer delivery addresses.
    pub addresses: Vec<DeliveryAddress>,
}

impl Fixture {
    /// Loads a named fixture set from the crate's `fixtures/` directory.
    ///
    /// # Errors
    ///
    /// Returns a [`FixtureError`] when the file cannot be read or parsed.
    pub fn from_set(name: &str) -> Result<Self, FixtureError> {
        let path = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
            .join("fixtures")
            .join(format!("{name}.yaml"));

        Self::from_path(&path)
    }

    /// Loads a fixture set from an arbitrary path.
    ///
    /// # Errors
    ///
    /// Returns a [`FixtureError`] when the file cannot be read or parsed.
    pub fn from_path(path: &Path) -> Result<Self, FixtureError> {
        Self::from_yaml(&fs::read_to_string(path)?)
    }

    /// Parses a fixture set from YAML text.
    ///
    /// # Errors
    ///
    /// Returns a [`FixtureError`] when the YAML is malformed or a value
    /// fails domain validation.
    pub fn from_yaml(yaml: &str) -> Result<Self, FixtureError> {
        let raw: RawFixture = serde_norway::from_str(yaml)?;

        let menu = raw
            .menu
            .into_iter()
            .map(|item| {
                Ok(MenuItem {
                    restaurant: RestaurantUuid::from_uuid(item.restaurant),
                    food: FoodUuid::from_uuid(item.food),
                    name: item.name,
                    image: item.image,
                    unit_price: parse_price(&item.price)?,
                })
            })
            .collect::<Result<Vec<_>, FixtureError>>()?;

        let coupons = raw
            .coupons
            .into_iter()
            .map(|coupon| {
                Ok(Coupon::new(
                    CouponUuid::from_uuid(Uuid::now_v7()),
                    coupon.code,
                    DiscountPercent::new(coupon.percent)?,
                    parse_price(&coupon.min_order)?,
                    parse_price(&coupon.max_discount)?,
                    coupon.expires_at,
                    coupon.available,
                )?)
            })
            .collect::<Result<Vec<_>, FixtureError>>()?;

        let addresses = raw
            .addresses
            .into_iter()
            .map(|address| DeliveryAddress {
                uuid: AddressUuid::from_uuid(address.uuid),
                customer: crate::domain::CustomerUuid::from_uuid(address.customer),
                street: address.street,
                city: address.city,
                postcode: address.postcode,
            })
            .collect();

        Ok(Self {
            menu,
            coupons,
            addresses,
        })
    }

    /// Seeds the fixture's contents into the in-memory backend.
    pub async fn seed(&self, stores: &InMemoryStores) {
        for item in &self.menu {
            stores.menu.insert(item.clone()).await;
        }

        for coupon in &self.coupons {
            stores.coupons.insert(coupon.clone()).await;
        }

        for address in &self.addresses {
            stores.addresses.insert(address.clone()).await;
        }
    }
}

/// Parses a decimal major-unit price string (e.g. `"200.00"`) into minor
/// units.
fn parse_price(value: &str) -> Result<Money, FixtureError> {
    let Ok(decimal) = value.parse::<Decimal>() else {
        return Err(FixtureError::InvalidPrice(value.to_string()));
    };

    let scaled = decimal
        .checked_mul(Decimal::from(100_u8))
        .ok_or_else(|| FixtureError::InvalidPrice(value.to_string()))?;

    if scaled.is_sign_negative() || !scaled.normalize().is_integer() {
        return Err(FixtureError::InvalidPrice(value.to_string()));
    }

    scaled
        .to_u64()
        .map(Money::from_minor)
        .ok_or_else(|| FixtureError::InvalidPrice(value.to_string()))
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    #[test]
    fn parses_prices_into_minor_units() -> TestResult {
        assert_eq!(parse_price("200.00")?, Money::from_minor(20_000));
        assert_eq!(parse_price("0.05")?, Money::from_minor(5));
        assert_eq!(parse_price("35")?, Money::from_minor(3_500));

        Ok(())
    }

    #[test]
    fn rejects_sub_minor_precision_and_negatives() {
        for bad in ["1.005", "-2.00", "cheap"] {
            let result = parse_price(bad);

            assert!(
                matches!(result, Err(FixtureError::InvalidPrice(_))),
                "expected InvalidPrice for {bad:?}, got {result:?}"
            );
        }
    }

    #[test]
    fn parses_an_inline_fixture_set() -> TestResult {
        let fixture = Fixture::from_yaml(
            r"
menu:
  - restaurant: 0193e9a0-0000-7000-8000-000000000001
    food: 0193e9a0-0000-7000-8000-000000000101
    name: Margherita Pizza
    image: margherita.png
    price: '200.00'
coupons:
  - code: TIFFIN20
    percent: 20
    min_order: '500.00'
    max_discount: '150.00'
    expires_at: 2030-01-01T00:00:00Z
    available: true
",
        )?;

        assert_eq!(fixture.menu.len(), 1);
        assert_eq!(
            fixture.menu.first().map(|m| m.unit_price),
            Some(Money::from_minor(20_000))
        );
        assert_eq!(
            fixture.coupons.first().map(|c| c.max_discount),
            Some(Money::from_minor(15_000))
        );

        Ok(())
    }

    #[test]
    fn loads_the_bundled_food_court_set() -> TestResult {
        let fixture = Fixture::from_set("food_court")?;

        assert!(!fixture.menu.is_empty(), "bundled menu should not be empty");
        assert!(
            !fixture.coupons.is_empty(),
            "bundled coupons should not be empty"
        );
        assert!(
            !fixture.addresses.is_empty(),
            "bundled addresses should not be empty"
        );

        Ok(())
    }
}
