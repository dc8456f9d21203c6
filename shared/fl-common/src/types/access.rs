//! Access Grant Types
//!
//! Wire types for the visibility-override system shared between the
//! server and the permission-consuming client layer.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::Error;

/// Breadth of an explicit visibility override.
///
/// Overrides only ever widen access beyond the role default; there is
/// no deny level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccessLevel {
    /// Room-level messages only.
    RoomLevel,
    /// One named vessel's messages (plus room level).
    VesselSpecific,
    /// Every message in the room.
    All,
}

impl AccessLevel {
    /// Snake-case string form as stored in the database.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::RoomLevel => "room_level",
            Self::VesselSpecific => "vessel_specific",
            Self::All => "all",
        }
    }
}

impl std::str::FromStr for AccessLevel {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "room_level" => Ok(Self::RoomLevel),
            "vessel_specific" => Ok(Self::VesselSpecific),
            "all" => Ok(Self::All),
            other => Err(Error::UnknownAccessLevel(other.to_string())),
        }
    }
}

impl TryFrom<String> for AccessLevel {
    type Error = Error;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Effective visibility for one user in one room.
///
/// Returned by the permissions introspection endpoint and consumed by
/// the client's route/action guards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EffectivePermissions {
    /// Whether room-level (vessel-less) messages are visible.
    pub can_see_room_level: bool,
    /// Whether every vessel's messages are visible.
    pub can_see_all_vessels: bool,
    /// Individually visible vessels (empty when `can_see_all_vessels`).
    pub vessel_ids: HashSet<Uuid>,
}
