//! Authentication and authorization extractors.
//!
//! - [`auth::AuthUser`] -- Extracts the authenticated account from a JWT Bearer token.
//! - [`rbac::RequireWisher`] / [`rbac::RequirePartner`] -- Require a role.
//! - [`scope::CallerScope`] -- Loads the account and resolves its visibility scope.
//! - [`scope::WisherScope`] / [`scope::PartnerScope`] -- Role check plus scope.

pub mod auth;
pub mod rbac;
pub mod scope;
