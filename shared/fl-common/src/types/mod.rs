//! Shared Type Definitions

pub mod access;
pub mod user;

pub use access::{AccessLevel, EffectivePermissions};
pub use user::{Role, UserProfile};
