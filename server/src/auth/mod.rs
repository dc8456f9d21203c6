//! Authentication Boundary
//!
//! Account provisioning and login live in the surrounding platform;
//! this server only validates the bearer token it is handed and loads
//! the caller's user record. Everything past the middleware can assume
//! an authenticated `user_id` and a resolved role.

mod error;
pub mod jwt;
mod middleware;

pub use error::{AuthError, AuthResult};
pub use middleware::{require_auth, AuthUser};
