//! Menu

pub mod models;

pub use models::*;
