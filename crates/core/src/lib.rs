//! Functional core for the storefront services and gateway.
//!
//! Everything in this crate is pure: data types, validation, key derivation,
//! liveness arithmetic and error taxonomies. I/O lives in the `storefront`
//! and `storefront_gateway` binaries.

pub mod cache;
pub mod commerce;
pub mod dispatch;
pub mod registry;
pub mod serde;
pub mod storage;
