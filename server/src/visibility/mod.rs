//! Message-Visibility Authorization Engine
//!
//! Decides, per request, which subset of a room's messages a user may
//! read. Visibility is never stored on write: it is resolved at read
//! time from room membership (fail closed), the role-default policy
//! table, and explicit per-(user, room, vessel) overrides that only
//! ever widen access, then applied to the message page by a pure,
//! order-preserving filter.

pub mod filter;
pub mod handlers;
pub mod helpers;
pub mod models;
pub mod queries;
pub mod resolver;
pub mod scope_cache;

pub use filter::filter_visible;
pub use helpers::get_room_scope;
pub use models::{AccessOverride, RolePolicy, Scope};
pub use queries::{grant_override, list_overrides, revoke_override, seed_role_policies};
pub use resolver::compute_scope;
pub use scope_cache::ScopeCache;
