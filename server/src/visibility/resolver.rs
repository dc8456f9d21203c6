//! Visibility resolution logic.
//!
//! Computes the effective message-visibility scope for a user in an
//! operation room.

use std::collections::HashSet;

use fl_common::AccessLevel;
use uuid::Uuid;

use crate::db::Vessel;

use super::models::{AccessOverride, RolePolicy, Scope};

/// Compute the visibility scope for a user in a room.
///
/// Resolution order:
/// 1. No membership means no visibility, unconditionally
/// 2. Start from the role-default policy
/// 3. OR in explicit overrides (grants only widen, never narrow)
/// 4. Collect individually visible vessels: own vessels for
///    vessel-level roles, plus vessel-specific grants
///
/// The vessel set stays empty once `can_see_all_vessels` holds, since
/// the blanket flag subsumes every vessel ID.
pub fn compute_scope(
    user_id: Uuid,
    is_member: bool,
    base: RolePolicy,
    vessels: &[Vessel],
    overrides: &[AccessOverride],
) -> Scope {
    // Fail closed: non-members see nothing, overrides included
    if !is_member {
        return Scope::empty();
    }

    // Any grant level implies at least room-level visibility
    let can_see_room_level = base.can_see_room_level || !overrides.is_empty();

    let can_see_all_vessels = base.can_see_all_vessels
        || overrides
            .iter()
            .any(|o| o.access_level == AccessLevel::All);

    if can_see_all_vessels {
        return Scope {
            can_see_room_level,
            can_see_all_vessels,
            vessel_ids: HashSet::new(),
        };
    }

    let mut vessel_ids = HashSet::new();

    // Vessel-level roles see the vessels where they are a named party
    if base.can_see_vessel_level {
        for vessel in vessels {
            if vessel.owner_party_id == Some(user_id)
                || vessel.charterer_party_id == Some(user_id)
            {
                vessel_ids.insert(vessel.id);
            }
        }
    }

    // Vessel-specific grants add their named vessel
    for o in overrides {
        if o.access_level == AccessLevel::VesselSpecific {
            if let Some(vessel_id) = o.vessel_id {
                vessel_ids.insert(vessel_id);
            }
        }
    }

    Scope {
        can_see_room_level,
        can_see_all_vessels,
        vessel_ids,
    }
}
