//! Cart & pricing engine for a food-ordering platform.
//!
//! The engine keeps a monetary total consistent across incremental cart
//! mutations, applies an optional coupon with min-order and max-discount
//! constraints, and freezes cart state into an immutable order snapshot at
//! checkout.
//!
//! Everything outside those invariants — authentication, menu management,
//! payment, HTTP routing — is an external collaborator reached through the
//! store traits in [`store`]. [`context::Context`] wires the domain services
//! over any set of store implementations; [`context::Context::in_memory`]
//! assembles the bundled in-memory backend.

pub mod context;
pub mod domain;
pub mod fixtures;
pub mod money;
pub mod store;
pub mod uuids;
