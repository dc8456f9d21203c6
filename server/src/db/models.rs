//! Database Models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// User model.
///
/// The role column is free TEXT at the storage layer; it is parsed
/// into the closed [`fl_common::Role`] set at policy-lookup time so an
/// out-of-set value degrades to the restrictive default instead of
/// failing the row decode.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub display_name: String,
    pub role: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Operation room: a shared workspace for one ship-to-ship transfer.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Room {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Vessel attached to a room.
///
/// Owner and charterer parties are optional user references; a vessel
/// may be registered before its parties are known.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Vessel {
    pub id: Uuid,
    pub room_id: Uuid,
    pub name: String,
    pub imo_number: Option<String>,
    pub owner_party_id: Option<Uuid>,
    pub charterer_party_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

/// Room membership record. Absence means zero visibility.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct RoomMember {
    pub room_id: Uuid,
    pub user_id: Uuid,
    pub joined_at: DateTime<Utc>,
}

/// Room message. `vessel_id = NULL` marks a room-level message.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Message {
    pub id: Uuid,
    pub room_id: Uuid,
    pub vessel_id: Option<Uuid>,
    pub author_id: Uuid,
    pub content: String,
    pub is_public: bool,
    pub edited_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}
