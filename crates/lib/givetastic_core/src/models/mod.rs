//! Domain models shared by the registry, the stores and the HTTP layer.

pub mod access;
pub mod identity;

pub use access::{AccessCode, CodeKind};
pub use identity::{Profile, Role, RoleLink, SignUpMetadata, UserIdentity};
