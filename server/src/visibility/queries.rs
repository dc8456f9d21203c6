//! Database queries for the visibility engine.
//!
//! Provides async functions for managing:
//! - Role-default policy rows (idempotent seeding + lookup)
//! - Access override grants
//! - Administrative audit logging
//!
//! Read functions take a generic executor so scope resolution can run
//! its lookups inside one consistent-read transaction and never
//! observe a half-applied grant.

use fl_common::{AccessLevel, Role};
use serde_json::Value as JsonValue;
use sqlx::{PgExecutor, PgPool};
use tracing::{info, warn};
use uuid::Uuid;

use super::models::{AccessOverride, RolePolicy, RolePolicyRow};

// ============================================================================
// Role-Default Policy Queries
// ============================================================================

/// Seed the role-default policy table.
///
/// Inserts the built-in policy for each fixed role if and only if no
/// row exists for it. The uniqueness constraint on `role` makes this
/// safe under concurrent startup of multiple instances: a conflicting
/// insert is success, not an error.
pub async fn seed_role_policies(pool: &PgPool) -> sqlx::Result<()> {
    for role in Role::ALL {
        let policy = RolePolicy::default_for(role);
        sqlx::query(
            r"
            INSERT INTO role_policies (role, can_see_room_level, can_see_vessel_level, can_see_all_vessels)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (role) DO NOTHING
            ",
        )
        .bind(role.as_str())
        .bind(policy.can_see_room_level)
        .bind(policy.can_see_vessel_level)
        .bind(policy.can_see_all_vessels)
        .execute(pool)
        .await?;
    }

    info!("Role-default visibility policies seeded");
    Ok(())
}

/// Find the stored policy row for a role string.
pub async fn find_role_policy<'e>(
    executor: impl PgExecutor<'e>,
    role: &str,
) -> sqlx::Result<Option<RolePolicyRow>> {
    sqlx::query_as::<_, RolePolicyRow>("SELECT * FROM role_policies WHERE role = $1")
        .bind(role)
        .fetch_optional(executor)
        .await
}

/// Load the effective role-default policy for a role string.
///
/// Falls back without failing the request:
/// - known role with no stored row (seed not yet run, or row removed
///   administratively) degrades to the built-in default,
/// - a role outside the fixed set degrades to the most restrictive
///   policy.
///
/// Both fallbacks are logged as warnings.
pub async fn load_role_policy<'e>(
    executor: impl PgExecutor<'e>,
    role: &str,
) -> sqlx::Result<RolePolicy> {
    if let Some(row) = find_role_policy(executor, role).await? {
        return Ok(row.policy());
    }

    role.parse::<Role>().map_or_else(
        |_| {
            warn!(role, "Unrecognized role, applying restrictive visibility policy");
            Ok(RolePolicy::restrictive())
        },
        |known| {
            warn!(role, "No stored policy row for role, using built-in default");
            Ok(RolePolicy::default_for(known))
        },
    )
}

// ============================================================================
// Access Override Queries
// ============================================================================

/// List all override rows for a (user, room) pair.
pub async fn list_overrides<'e>(
    executor: impl PgExecutor<'e>,
    user_id: Uuid,
    room_id: Uuid,
) -> sqlx::Result<Vec<AccessOverride>> {
    sqlx::query_as::<_, AccessOverride>(
        r"
        SELECT id, user_id, room_id, vessel_id, access_level, granted_by, created_at
        FROM access_overrides
        WHERE user_id = $1 AND room_id = $2
        ORDER BY created_at ASC
        ",
    )
    .bind(user_id)
    .bind(room_id)
    .fetch_all(executor)
    .await
}

/// Grant (upsert) an access override.
///
/// Idempotent on the natural key (user, room, vessel): re-granting
/// updates the access level in place rather than duplicating the row.
/// Vessel/room consistency is validated by the caller before this
/// write.
pub async fn grant_override(
    pool: &PgPool,
    user_id: Uuid,
    room_id: Uuid,
    vessel_id: Option<Uuid>,
    level: AccessLevel,
    granted_by: Option<Uuid>,
) -> sqlx::Result<AccessOverride> {
    sqlx::query_as::<_, AccessOverride>(
        r"
        INSERT INTO access_overrides (id, user_id, room_id, vessel_id, access_level, granted_by)
        VALUES ($1, $2, $3, $4, $5, $6)
        ON CONFLICT (user_id, room_id, COALESCE(vessel_id, '00000000-0000-0000-0000-000000000000'::uuid))
        DO UPDATE SET access_level = EXCLUDED.access_level, granted_by = EXCLUDED.granted_by
        RETURNING id, user_id, room_id, vessel_id, access_level, granted_by, created_at
        ",
    )
    .bind(Uuid::now_v7())
    .bind(user_id)
    .bind(room_id)
    .bind(vessel_id)
    .bind(level.as_str())
    .bind(granted_by)
    .fetch_one(pool)
    .await
}

/// Revoke an access override.
///
/// Returns `true` if a row was removed; revoking a non-existent
/// override is a successful no-op.
pub async fn revoke_override(
    pool: &PgPool,
    user_id: Uuid,
    room_id: Uuid,
    vessel_id: Option<Uuid>,
) -> sqlx::Result<bool> {
    let result = sqlx::query(
        r"
        DELETE FROM access_overrides
        WHERE user_id = $1 AND room_id = $2 AND vessel_id IS NOT DISTINCT FROM $3
        ",
    )
    .bind(user_id)
    .bind(room_id)
    .bind(vessel_id)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}

// ============================================================================
// Audit Log Queries
// ============================================================================

/// Record an administrative action in the audit log.
pub async fn record_audit(
    pool: &PgPool,
    actor_id: Uuid,
    action: &str,
    room_id: Uuid,
    target_user_id: Uuid,
    details: Option<JsonValue>,
) -> sqlx::Result<()> {
    sqlx::query(
        r"
        INSERT INTO access_audit_log (actor_id, action, room_id, target_user_id, details)
        VALUES ($1, $2, $3, $4, $5)
        ",
    )
    .bind(actor_id)
    .bind(action)
    .bind(room_id)
    .bind(target_user_id)
    .bind(details)
    .execute(pool)
    .await?;

    Ok(())
}
