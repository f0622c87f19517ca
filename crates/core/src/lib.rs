//! Domain logic for the shared wish list.
//!
//! Everything here is storage- and transport-agnostic so both the
//! repository layer and the HTTP layer can share one definition of the
//! rules:
//!
//! - [`roles`] -- the closed wisher/partner role variant.
//! - [`linking`] -- linking-code normalisation and generation.
//! - [`wish`] -- wish enums and field validation.
//! - [`progress`] -- the wish/progress dual state machine.
//! - [`visibility`] -- per-caller scoping and redaction.

#[macro_use]
mod macros;

pub mod account;
pub mod error;
pub mod linking;
pub mod progress;
pub mod roles;
pub mod types;
pub mod visibility;
pub mod wish;
