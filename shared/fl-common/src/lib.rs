//! Fairlead Common Library
//!
//! Shared types used by both the server and client frontends.

pub mod error;
pub mod types;

pub use error::{Error, Result};
pub use types::*;
