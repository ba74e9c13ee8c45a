//! Catalog domain types and wire types shared by the store and its drivers.

pub mod domain;
pub mod error;
pub mod protocol;
