//! Domain building blocks shared by every stockroom crate.
//!
//! This crate has zero internal dependencies so it can be used by the
//! repository layer, the cache layer and the API server alike.

pub mod error;
pub mod pagination;
pub mod ranking;
pub mod types;
pub mod validation;
