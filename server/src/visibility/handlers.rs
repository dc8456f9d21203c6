//! Visibility API Handlers

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::{DateTime, Utc};
use fl_common::{AccessLevel, EffectivePermissions};
use serde::{Deserialize, Serialize};
use tracing::warn;
use uuid::Uuid;

use crate::{api::AppState, auth::AuthUser, db};

use super::filter::filter_visible;
use super::helpers::get_room_scope;
use super::models::{
    AccessOverride, GrantOverrideRequest, RevokeOverrideQuery, UpdateVesselPartiesRequest,
};
use super::queries;

// ============================================================================
// Error Types
// ============================================================================

#[derive(Debug)]
pub enum AccessError {
    RoomNotFound,
    UserNotFound,
    VesselNotFound,
    Forbidden,
    Validation(String),
    Database(sqlx::Error),
}

impl IntoResponse for AccessError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            Self::RoomNotFound => (StatusCode::NOT_FOUND, "Room not found"),
            Self::UserNotFound => (StatusCode::NOT_FOUND, "User not found"),
            Self::VesselNotFound => (StatusCode::NOT_FOUND, "Vessel not found"),
            Self::Forbidden => (StatusCode::FORBIDDEN, "Access denied"),
            Self::Validation(msg) => {
                return (StatusCode::BAD_REQUEST, Json(serde_json::json!({ "error": msg })))
                    .into_response()
            }
            Self::Database(_) => (StatusCode::INTERNAL_SERVER_ERROR, "Database error"),
        };
        (status, Json(serde_json::json!({ "error": message }))).into_response()
    }
}

impl From<sqlx::Error> for AccessError {
    fn from(err: sqlx::Error) -> Self {
        Self::Database(err)
    }
}

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub id: Uuid,
    pub room_id: Uuid,
    pub vessel_id: Option<Uuid>,
    pub author_id: Uuid,
    pub content: String,
    pub is_public: bool,
    pub created_at: DateTime<Utc>,
    pub edited_at: Option<DateTime<Utc>>,
}

impl From<db::Message> for MessageResponse {
    fn from(msg: db::Message) -> Self {
        Self {
            id: msg.id,
            room_id: msg.room_id,
            vessel_id: msg.vessel_id,
            author_id: msg.author_id,
            content: msg.content,
            is_public: msg.is_public,
            created_at: msg.created_at,
            edited_at: msg.edited_at,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ListMessagesQuery {
    pub before: Option<Uuid>,
    #[serde(default = "default_limit")]
    pub limit: i64,
}

fn default_limit() -> i64 {
    50
}

// ============================================================================
// Read Handlers
// ============================================================================

/// List the messages in a room visible to the caller.
/// GET /api/rooms/:room_id/messages
///
/// Authorization is never an error here: a non-member (or an unknown
/// room) gets an empty page, indistinguishable from an empty room.
pub async fn list_visible_messages(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(room_id): Path<Uuid>,
    Query(query): Query<ListMessagesQuery>,
) -> Result<Json<Vec<MessageResponse>>, AccessError> {
    let scope = get_room_scope(&state.db, &state.scopes, room_id, auth_user.id, &auth_user.role)
        .await?;

    if scope.is_empty() {
        return Ok(Json(Vec::new()));
    }

    let limit = query.limit.clamp(1, 100);
    let page = db::list_room_messages(&state.db, room_id, query.before, limit).await?;

    let visible = filter_visible(page, &scope, auth_user.id);

    Ok(Json(visible.into_iter().map(Into::into).collect()))
}

/// Effective permissions introspection for the caller in a room.
/// GET /api/rooms/:room_id/permissions
///
/// Consumed by client route/action guards and by admin tooling. A
/// non-member gets the empty permission set, not an error.
pub async fn effective_permissions(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(room_id): Path<Uuid>,
) -> Result<Json<EffectivePermissions>, AccessError> {
    let scope = get_room_scope(&state.db, &state.scopes, room_id, auth_user.id, &auth_user.role)
        .await?;

    Ok(Json(scope.into()))
}

// ============================================================================
// Administrative Handlers
// ============================================================================

/// Grant a visibility override to a user in a room.
/// POST /api/admin/rooms/:room_id/overrides
pub async fn grant_override(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(room_id): Path<Uuid>,
    Json(req): Json<GrantOverrideRequest>,
) -> Result<(StatusCode, Json<AccessOverride>), AccessError> {
    if !auth_user.is_admin() {
        return Err(AccessError::Forbidden);
    }

    db::find_room_by_id(&state.db, room_id)
        .await?
        .ok_or(AccessError::RoomNotFound)?;
    db::find_user_by_id(&state.db, req.user_id)
        .await?
        .ok_or(AccessError::UserNotFound)?;

    // A vessel-specific grant must name a vessel, and any named vessel
    // must belong to this room
    if req.level == AccessLevel::VesselSpecific && req.vessel_id.is_none() {
        return Err(AccessError::Validation(
            "vessel_specific grants must name a vessel".to_string(),
        ));
    }
    if let Some(vessel_id) = req.vessel_id {
        db::find_room_vessel(&state.db, room_id, vessel_id)
            .await?
            .ok_or_else(|| {
                AccessError::Validation(format!(
                    "Vessel {vessel_id} does not belong to room {room_id}"
                ))
            })?;
    }

    let granted = queries::grant_override(
        &state.db,
        req.user_id,
        room_id,
        req.vessel_id,
        req.level,
        Some(auth_user.id),
    )
    .await?;

    state.scopes.invalidate(req.user_id, room_id);

    // Audit failures are logged, never surfaced to the admin caller
    let details = serde_json::json!({ "vessel_id": req.vessel_id, "level": req.level });
    if let Err(e) =
        queries::record_audit(&state.db, auth_user.id, "override.grant", room_id, req.user_id, Some(details))
            .await
    {
        warn!(error = %e, "Failed to record audit entry for override grant");
    }

    Ok((StatusCode::CREATED, Json(granted)))
}

/// Revoke a visibility override.
/// DELETE /api/admin/rooms/:room_id/overrides/:user_id?vessel_id=...
///
/// Revoking an override that does not exist succeeds as a no-op.
pub async fn revoke_override(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path((room_id, user_id)): Path<(Uuid, Uuid)>,
    Query(query): Query<RevokeOverrideQuery>,
) -> Result<StatusCode, AccessError> {
    if !auth_user.is_admin() {
        return Err(AccessError::Forbidden);
    }

    let removed = queries::revoke_override(&state.db, user_id, room_id, query.vessel_id).await?;

    state.scopes.invalidate(user_id, room_id);

    if removed {
        let details = serde_json::json!({ "vessel_id": query.vessel_id });
        if let Err(e) =
            queries::record_audit(&state.db, auth_user.id, "override.revoke", room_id, user_id, Some(details))
                .await
        {
            warn!(error = %e, "Failed to record audit entry for override revoke");
        }
    }

    Ok(StatusCode::NO_CONTENT)
}

/// Reassign a vessel's owner and charterer parties.
/// PUT /api/admin/rooms/:room_id/vessels/:vessel_id/parties
///
/// Own-vessel visibility for every vessel-level member of the room
/// can shift, so the whole room's cached scopes are swept.
pub async fn update_vessel_parties(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path((room_id, vessel_id)): Path<(Uuid, Uuid)>,
    Json(req): Json<UpdateVesselPartiesRequest>,
) -> Result<Json<db::Vessel>, AccessError> {
    if !auth_user.is_admin() {
        return Err(AccessError::Forbidden);
    }

    db::find_room_vessel(&state.db, room_id, vessel_id)
        .await?
        .ok_or(AccessError::VesselNotFound)?;

    let vessel = db::update_vessel_parties(
        &state.db,
        vessel_id,
        req.owner_party_id,
        req.charterer_party_id,
    )
    .await?;

    state.scopes.invalidate_room(room_id);

    Ok(Json(vessel))
}

/// Add a user to a room.
/// POST /api/admin/rooms/:room_id/members/:user_id
pub async fn add_member(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path((room_id, user_id)): Path<(Uuid, Uuid)>,
) -> Result<StatusCode, AccessError> {
    if !auth_user.is_admin() {
        return Err(AccessError::Forbidden);
    }

    db::find_room_by_id(&state.db, room_id)
        .await?
        .ok_or(AccessError::RoomNotFound)?;
    db::find_user_by_id(&state.db, user_id)
        .await?
        .ok_or(AccessError::UserNotFound)?;

    db::add_room_member(&state.db, room_id, user_id).await?;

    // The pair may hold a cached empty scope from pre-membership probes
    state.scopes.invalidate(user_id, room_id);

    if let Err(e) =
        queries::record_audit(&state.db, auth_user.id, "member.add", room_id, user_id, None).await
    {
        warn!(error = %e, "Failed to record audit entry for member add");
    }

    Ok(StatusCode::NO_CONTENT)
}

/// Remove a user from a room, collapsing their visibility immediately.
/// DELETE /api/admin/rooms/:room_id/members/:user_id
pub async fn remove_member(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path((room_id, user_id)): Path<(Uuid, Uuid)>,
) -> Result<StatusCode, AccessError> {
    if !auth_user.is_admin() {
        return Err(AccessError::Forbidden);
    }

    let removed = db::remove_room_member(&state.db, room_id, user_id).await?;

    state.scopes.invalidate(user_id, room_id);

    if removed {
        if let Err(e) =
            queries::record_audit(&state.db, auth_user.id, "member.remove", room_id, user_id, None)
                .await
        {
            warn!(error = %e, "Failed to record audit entry for member remove");
        }
    }

    Ok(StatusCode::NO_CONTENT)
}
