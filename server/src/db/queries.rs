//! Database Queries
//!
//! Runtime queries (no compile-time `DATABASE_URL` required).
//!
//! All query functions include error context logging to aid debugging.

use sqlx::{PgExecutor, PgPool};
use tracing::error;
use uuid::Uuid;

use super::models::{Message, Room, RoomMember, User, Vessel};

/// Log and return a database error with context.
///
/// This helper ensures all database errors are logged with relevant context
/// before being propagated, making production debugging easier.
macro_rules! db_error {
    ($query:expr, $($field:tt)*) => {
        |e| {
            error!(query = $query, $($field)*, error = %e, "Database query failed");
            e
        }
    };
}

// ============================================================================
// User Queries
// ============================================================================

/// Find user by ID.
pub async fn find_user_by_id(pool: &PgPool, id: Uuid) -> sqlx::Result<Option<User>> {
    sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await
        .map_err(db_error!("find_user_by_id", user_id = %id))
}

// ============================================================================
// Room Queries
// ============================================================================

/// Find room by ID.
pub async fn find_room_by_id(pool: &PgPool, id: Uuid) -> sqlx::Result<Option<Room>> {
    sqlx::query_as::<_, Room>("SELECT * FROM rooms WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await
        .map_err(db_error!("find_room_by_id", room_id = %id))
}

/// List vessels attached to a room.
pub async fn list_room_vessels<'e>(
    executor: impl PgExecutor<'e>,
    room_id: Uuid,
) -> sqlx::Result<Vec<Vessel>> {
    sqlx::query_as::<_, Vessel>(
        "SELECT * FROM vessels WHERE room_id = $1 ORDER BY created_at ASC",
    )
    .bind(room_id)
    .fetch_all(executor)
    .await
    .map_err(db_error!("list_room_vessels", room_id = %room_id))
}

/// Find a vessel by ID within a specific room.
///
/// Returns `None` when the vessel does not exist or belongs to a
/// different room; grant validation relies on this distinction.
pub async fn find_room_vessel(
    pool: &PgPool,
    room_id: Uuid,
    vessel_id: Uuid,
) -> sqlx::Result<Option<Vessel>> {
    sqlx::query_as::<_, Vessel>("SELECT * FROM vessels WHERE id = $1 AND room_id = $2")
        .bind(vessel_id)
        .bind(room_id)
        .fetch_optional(pool)
        .await
        .map_err(db_error!("find_room_vessel", room_id = %room_id, vessel_id = %vessel_id))
}

/// Replace a vessel's owner and charterer party references.
///
/// Room-wide visibility event: own-vessel scopes across the room may
/// change, so callers must sweep the room's cached scopes.
pub async fn update_vessel_parties(
    pool: &PgPool,
    vessel_id: Uuid,
    owner_party_id: Option<Uuid>,
    charterer_party_id: Option<Uuid>,
) -> sqlx::Result<Vessel> {
    sqlx::query_as::<_, Vessel>(
        r"
        UPDATE vessels
        SET owner_party_id = $2, charterer_party_id = $3
        WHERE id = $1
        RETURNING *
        ",
    )
    .bind(vessel_id)
    .bind(owner_party_id)
    .bind(charterer_party_id)
    .fetch_one(pool)
    .await
    .map_err(db_error!("update_vessel_parties", vessel_id = %vessel_id))
}

// ============================================================================
// Membership Queries
// ============================================================================

/// Find a room membership record.
pub async fn find_room_member<'e>(
    executor: impl PgExecutor<'e>,
    room_id: Uuid,
    user_id: Uuid,
) -> sqlx::Result<Option<RoomMember>> {
    sqlx::query_as::<_, RoomMember>(
        "SELECT * FROM room_members WHERE room_id = $1 AND user_id = $2",
    )
    .bind(room_id)
    .bind(user_id)
    .fetch_optional(executor)
    .await
    .map_err(db_error!("find_room_member", room_id = %room_id, user_id = %user_id))
}

/// Add a user to a room (idempotent).
pub async fn add_room_member(pool: &PgPool, room_id: Uuid, user_id: Uuid) -> sqlx::Result<()> {
    sqlx::query(
        r"
        INSERT INTO room_members (room_id, user_id)
        VALUES ($1, $2)
        ON CONFLICT (room_id, user_id) DO NOTHING
        ",
    )
    .bind(room_id)
    .bind(user_id)
    .execute(pool)
    .await
    .map_err(db_error!("add_room_member", room_id = %room_id, user_id = %user_id))?;

    Ok(())
}

/// Remove a user from a room.
///
/// Returns `true` if a membership was removed. Removal immediately
/// collapses the user's visibility for the room to empty; callers must
/// invalidate any cached scope for the pair.
pub async fn remove_room_member(
    pool: &PgPool,
    room_id: Uuid,
    user_id: Uuid,
) -> sqlx::Result<bool> {
    let result = sqlx::query("DELETE FROM room_members WHERE room_id = $1 AND user_id = $2")
        .bind(room_id)
        .bind(user_id)
        .execute(pool)
        .await
        .map_err(db_error!("remove_room_member", room_id = %room_id, user_id = %user_id))?;

    Ok(result.rows_affected() > 0)
}

// ============================================================================
// Message Queries
// ============================================================================

/// List a page of room messages in insertion order (oldest first).
///
/// `before` is an exclusive cursor on the message ID (UUIDv7, so ID
/// order matches insertion order). The page is fetched newest-first
/// for cursor stability, then reversed.
pub async fn list_room_messages(
    pool: &PgPool,
    room_id: Uuid,
    before: Option<Uuid>,
    limit: i64,
) -> sqlx::Result<Vec<Message>> {
    let mut messages = sqlx::query_as::<_, Message>(
        r"
        SELECT * FROM messages
        WHERE room_id = $1
          AND ($2::uuid IS NULL OR id < $2)
        ORDER BY id DESC
        LIMIT $3
        ",
    )
    .bind(room_id)
    .bind(before)
    .bind(limit)
    .fetch_all(pool)
    .await
    .map_err(db_error!("list_room_messages", room_id = %room_id))?;

    messages.reverse();
    Ok(messages)
}
