//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async methods that
//! accept `&PgPool` as the first argument.

pub mod goods_event_repo;
pub mod goods_repo;
pub mod project_repo;

pub use goods_event_repo::GoodsEventRepo;
pub use goods_repo::GoodsRepo;
pub use project_repo::ProjectRepo;
