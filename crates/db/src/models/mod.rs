//! Entity structs and role-specific projections.
//!
//! Each submodule contains:
//! - A `FromRow` entity struct matching the database row (never serialized)
//! - Input structs for inserts
//! - `Serialize` projection types that are the only shapes sent to clients

pub mod account;
pub mod progress;
pub mod wish;
