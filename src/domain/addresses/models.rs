//! Address Models

use serde::{Deserialize, Serialize};

use crate::{domain::CustomerUuid, uuids::TypedUuid};

/// Address UUID
pub type AddressUuid = TypedUuid<DeliveryAddress>;

/// A delivery address from the customer's address book.
///
/// Address-book management is an external concern; the engine only resolves
/// an address at checkout and freezes a copy of it into the order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeliveryAddress {
    /// Unique address identifier.
    pub uuid: AddressUuid,

    /// Customer the address belongs to.
    pub customer: CustomerUuid,

    /// Street line.
    pub street: String,

    /// City or town.
    pub city: String,

    /// Postal code.
    pub postcode: String,
}
