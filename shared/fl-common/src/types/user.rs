//! User Types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::Error;

/// Party role within the platform.
///
/// The role set is closed: values outside this enum never enter the
/// type system. Database rows store the lowercase string form; parse
/// failures are handled explicitly at the lookup site rather than
/// silently widening the set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Brokers the operation; sees everything in rooms they belong to.
    Broker,
    /// Vessel-owning party.
    Owner,
    /// Vessel-chartering party.
    Charterer,
    /// Selling party in the transfer.
    Seller,
    /// Buying party in the transfer.
    Buyer,
    /// Read-only participant.
    Viewer,
    /// Platform administrator.
    Admin,
    /// Independent cargo/vessel inspector.
    Inspector,
}

impl Role {
    /// All roles, in seeding order.
    pub const ALL: [Self; 8] = [
        Self::Broker,
        Self::Owner,
        Self::Charterer,
        Self::Seller,
        Self::Buyer,
        Self::Viewer,
        Self::Admin,
        Self::Inspector,
    ];

    /// Lowercase string form as stored in the database.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Broker => "broker",
            Self::Owner => "owner",
            Self::Charterer => "charterer",
            Self::Seller => "seller",
            Self::Buyer => "buyer",
            Self::Viewer => "viewer",
            Self::Admin => "admin",
            Self::Inspector => "inspector",
        }
    }
}

impl std::str::FromStr for Role {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "broker" => Ok(Self::Broker),
            "owner" => Ok(Self::Owner),
            "charterer" => Ok(Self::Charterer),
            "seller" => Ok(Self::Seller),
            "buyer" => Ok(Self::Buyer),
            "viewer" => Ok(Self::Viewer),
            "admin" => Ok(Self::Admin),
            "inspector" => Ok(Self::Inspector),
            other => Err(Error::UnknownRole(other.to_string())),
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// User profile (public information).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    /// User ID.
    pub id: Uuid,
    /// Username (unique).
    pub username: String,
    /// Display name.
    pub display_name: String,
    /// Platform role.
    pub role: Role,
    /// When the user was created.
    pub created_at: DateTime<Utc>,
}
