//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async methods that
//! accept `&PgPool` as the first argument.

pub mod account_repo;
pub mod wish_progress_repo;
pub mod wish_repo;

pub use account_repo::AccountRepo;
pub use wish_progress_repo::{CommitOutcome, TransitionCommit, WishProgressRepo};
pub use wish_repo::WishRepo;
