//! Request handlers.
//!
//! Each submodule provides thin async handler functions for one resource.
//! Handlers extract path, query and body, delegate to the matching service
//! in [`crate::services`] and map errors via [`AppError`](crate::error::AppError).

pub mod goods;
pub mod project;
