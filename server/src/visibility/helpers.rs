//! Scope-loading helpers for API handlers.
//!
//! Composes the membership, policy, override and vessel lookups into
//! one resolved [`Scope`] per (user, room), with the explicit cache in
//! front.

use sqlx::PgPool;
use uuid::Uuid;

use crate::db::{find_room_member, list_room_vessels};

use super::models::Scope;
use super::queries::{list_overrides, load_role_policy};
use super::resolver::compute_scope;
use super::scope_cache::ScopeCache;

/// Resolve the visibility scope for a user in a room.
///
/// Fast path is the scope cache. On a miss, the lookups run inside a
/// single read transaction so a concurrently committed grant is either
/// fully visible or not at all, and the result is cached under the
/// generation captured before the reads (a racing invalidation wins).
///
/// Never fails for authorization reasons: a non-member resolves to the
/// empty scope.
#[tracing::instrument(skip(pool, cache))]
pub async fn get_room_scope(
    pool: &PgPool,
    cache: &ScopeCache,
    room_id: Uuid,
    user_id: Uuid,
    role: &str,
) -> sqlx::Result<Scope> {
    if let Some(scope) = cache.get(user_id, room_id, role) {
        return Ok(scope);
    }

    let generation = cache.begin(user_id, room_id);

    let mut tx = pool.begin().await?;

    let membership = find_room_member(&mut *tx, room_id, user_id).await?;

    let scope = if membership.is_some() {
        let base = load_role_policy(&mut *tx, role).await?;
        let overrides = list_overrides(&mut *tx, user_id, room_id).await?;
        let vessels = list_room_vessels(&mut *tx, room_id).await?;

        compute_scope(user_id, true, base, &vessels, &overrides)
    } else {
        // Fail closed; cached like any other resolution so repeated
        // probing stays cheap
        Scope::empty()
    };

    tx.commit().await?;

    cache.insert(user_id, room_id, role, generation, scope.clone());

    Ok(scope)
}
