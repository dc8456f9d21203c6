//! Database models for the visibility engine.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use fl_common::{AccessLevel, EffectivePermissions, Role};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Role-default visibility policy: what a role sees absent overrides.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RolePolicy {
    /// Room-level (vessel-less) messages.
    pub can_see_room_level: bool,
    /// Messages on vessels where the user is the owner or charterer party.
    pub can_see_vessel_level: bool,
    /// Messages on every vessel in the room.
    pub can_see_all_vessels: bool,
}

impl RolePolicy {
    /// Most restrictive policy: room-level only.
    ///
    /// Applied when a role value falls outside the fixed set, so an
    /// unrecognized role degrades instead of failing the request.
    #[must_use]
    pub const fn restrictive() -> Self {
        Self {
            can_see_room_level: true,
            can_see_vessel_level: false,
            can_see_all_vessels: false,
        }
    }

    /// Built-in default policy for a role; the seed step writes these.
    #[must_use]
    pub const fn default_for(role: Role) -> Self {
        match role {
            Role::Broker | Role::Admin => Self {
                can_see_room_level: true,
                can_see_vessel_level: true,
                can_see_all_vessels: true,
            },
            Role::Owner | Role::Charterer => Self {
                can_see_room_level: true,
                can_see_vessel_level: true,
                can_see_all_vessels: false,
            },
            Role::Seller | Role::Buyer | Role::Viewer | Role::Inspector => Self::restrictive(),
        }
    }
}

/// Stored role-default policy row.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct RolePolicyRow {
    pub role: String,
    pub can_see_room_level: bool,
    pub can_see_vessel_level: bool,
    pub can_see_all_vessels: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl RolePolicyRow {
    /// The policy value carried by this row.
    #[must_use]
    pub const fn policy(&self) -> RolePolicy {
        RolePolicy {
            can_see_room_level: self.can_see_room_level,
            can_see_vessel_level: self.can_see_vessel_level,
            can_see_all_vessels: self.can_see_all_vessels,
        }
    }
}

/// Explicit per-(user, room, optional vessel) visibility grant.
///
/// Grants are additive: they widen the role default and never narrow
/// it, so revoking one degrades cleanly back to the default.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct AccessOverride {
    pub id: Uuid,
    pub user_id: Uuid,
    pub room_id: Uuid,
    pub vessel_id: Option<Uuid>,
    #[sqlx(try_from = "String")]
    pub access_level: AccessLevel,
    pub granted_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

/// Resolved visibility for one (user, room) pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Scope {
    pub can_see_room_level: bool,
    pub can_see_all_vessels: bool,
    /// Individually visible vessels; unused (empty) once
    /// `can_see_all_vessels` holds.
    pub vessel_ids: HashSet<Uuid>,
}

impl Scope {
    /// The zero-visibility scope returned for non-members.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            can_see_room_level: false,
            can_see_all_vessels: false,
            vessel_ids: HashSet::new(),
        }
    }

    /// Whether this scope grants no visibility at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        !self.can_see_room_level && !self.can_see_all_vessels && self.vessel_ids.is_empty()
    }
}

impl From<Scope> for EffectivePermissions {
    fn from(scope: Scope) -> Self {
        Self {
            can_see_room_level: scope.can_see_room_level,
            can_see_all_vessels: scope.can_see_all_vessels,
            vessel_ids: scope.vessel_ids,
        }
    }
}

/// Request types for API
#[derive(Debug, Deserialize)]
pub struct GrantOverrideRequest {
    pub user_id: Uuid,
    pub vessel_id: Option<Uuid>,
    pub level: AccessLevel,
}

#[derive(Debug, Deserialize)]
pub struct RevokeOverrideQuery {
    pub vessel_id: Option<Uuid>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateVesselPartiesRequest {
    pub owner_party_id: Option<Uuid>,
    pub charterer_party_id: Option<Uuid>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_role_sees_room_level_by_default() {
        for role in Role::ALL {
            assert!(RolePolicy::default_for(role).can_see_room_level, "{role}");
        }
    }

    #[test]
    fn test_broker_and_admin_see_all_vessels() {
        for role in [Role::Broker, Role::Admin] {
            let policy = RolePolicy::default_for(role);
            assert!(policy.can_see_vessel_level);
            assert!(policy.can_see_all_vessels);
        }
    }

    #[test]
    fn test_owner_and_charterer_see_own_vessels_only() {
        for role in [Role::Owner, Role::Charterer] {
            let policy = RolePolicy::default_for(role);
            assert!(policy.can_see_vessel_level);
            assert!(!policy.can_see_all_vessels);
        }
    }

    #[test]
    fn test_remaining_roles_get_the_restrictive_policy() {
        for role in [Role::Seller, Role::Buyer, Role::Viewer, Role::Inspector] {
            assert_eq!(RolePolicy::default_for(role), RolePolicy::restrictive());
        }
    }

    #[test]
    fn test_empty_scope_is_empty() {
        assert!(Scope::empty().is_empty());

        let scope = Scope {
            can_see_room_level: true,
            ..Scope::empty()
        };
        assert!(!scope.is_empty());
    }
}
