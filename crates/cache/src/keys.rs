//! Cache key layout.
//!
//! Listing keys embed a generation number read from a counter key. Writes
//! bump the counter instead of enumerating every cached page, so stale pages
//! become unreachable and expire on their own.

use stockroom_core::types::DbId;

/// Generation counter for project listings.
pub const PROJECTS_LIST_GEN: &str = "projects:list:gen";

/// Generation counter for goods listings.
pub const GOODS_LIST_GEN: &str = "goods:list:gen";

pub fn project(id: DbId) -> String {
    format!("project:{id}")
}

pub fn goods(id: DbId, project_id: DbId) -> String {
    format!("goods:{id}:{project_id}")
}

pub fn projects_list(generation: i64, limit: i64, offset: i64) -> String {
    format!("projects:list:{generation}:{limit}:{offset}")
}

pub fn goods_list(generation: i64, limit: i64, offset: i64) -> String {
    format!("goods:list:{generation}:{limit}:{offset}")
}
