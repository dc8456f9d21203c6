//! End-to-end scenarios for the visibility engine, run against the
//! pure resolver and filter without a database.
//!
//! Mirrors the canonical room setup: Room R carries Vessel V1
//! (owner party userA) and Vessel V2 (owner party userB); messages
//! m1 (room-level), m2 (on V1), m3 (on V2).

use chrono::Utc;
use uuid::Uuid;

use fl_common::{AccessLevel, Role};
use fl_server::db::{Message, Vessel};
use fl_server::visibility::models::{AccessOverride, RolePolicy, Scope};
use fl_server::visibility::{compute_scope, filter_visible};

struct Fixture {
    room_id: Uuid,
    user_a: Uuid,
    user_b: Uuid,
    user_c: Uuid,
    user_d: Uuid,
    v1: Vessel,
    v2: Vessel,
    m1: Message,
    m2: Message,
    m3: Message,
}

fn vessel(room_id: Uuid, name: &str, owner: Option<Uuid>) -> Vessel {
    Vessel {
        id: Uuid::now_v7(),
        room_id,
        name: name.to_string(),
        imo_number: None,
        owner_party_id: owner,
        charterer_party_id: None,
        created_at: Utc::now(),
    }
}

fn message(room_id: Uuid, vessel_id: Option<Uuid>, author_id: Uuid, is_public: bool) -> Message {
    Message {
        id: Uuid::now_v7(),
        room_id,
        vessel_id,
        author_id,
        content: "STS checklist item complete".to_string(),
        is_public,
        edited_at: None,
        created_at: Utc::now(),
    }
}

fn fixture() -> Fixture {
    let room_id = Uuid::now_v7();
    let user_a = Uuid::now_v7();
    let user_b = Uuid::now_v7();
    let user_c = Uuid::now_v7();
    let user_d = Uuid::now_v7();
    let v1 = vessel(room_id, "MT Meri", Some(user_a));
    let v2 = vessel(room_id, "MT Saari", Some(user_b));
    let m1 = message(room_id, None, user_c, true);
    let m2 = message(room_id, Some(v1.id), user_a, true);
    let m3 = message(room_id, Some(v2.id), user_b, true);

    Fixture {
        room_id,
        user_a,
        user_b,
        user_c,
        user_d,
        v1,
        v2,
        m1,
        m2,
        m3,
    }
}

fn visible_for(
    f: &Fixture,
    user_id: Uuid,
    role: Role,
    overrides: &[AccessOverride],
) -> Vec<Uuid> {
    let scope = compute_scope(
        user_id,
        true,
        RolePolicy::default_for(role),
        &[f.v1.clone(), f.v2.clone()],
        overrides,
    );
    filter_visible(
        vec![f.m1.clone(), f.m2.clone(), f.m3.clone()],
        &scope,
        user_id,
    )
    .into_iter()
    .map(|m| m.id)
    .collect()
}

#[test]
fn owner_sees_room_level_plus_own_vessel() {
    let f = fixture();

    assert_eq!(visible_for(&f, f.user_a, Role::Owner, &[]), vec![f.m1.id, f.m2.id]);
    assert_eq!(visible_for(&f, f.user_b, Role::Owner, &[]), vec![f.m1.id, f.m3.id]);
}

#[test]
fn broker_sees_every_message() {
    let f = fixture();

    assert_eq!(
        visible_for(&f, f.user_c, Role::Broker, &[]),
        vec![f.m1.id, f.m2.id, f.m3.id]
    );
}

#[test]
fn viewer_sees_room_level_only() {
    let f = fixture();

    assert_eq!(visible_for(&f, f.user_d, Role::Viewer, &[]), vec![f.m1.id]);
}

#[test]
fn vessel_specific_grant_widens_viewer_to_exactly_that_vessel() {
    let f = fixture();
    let grant = AccessOverride {
        id: Uuid::now_v7(),
        user_id: f.user_d,
        room_id: f.room_id,
        vessel_id: Some(f.v1.id),
        access_level: AccessLevel::VesselSpecific,
        granted_by: None,
        created_at: Utc::now(),
    };

    assert_eq!(
        visible_for(&f, f.user_d, Role::Viewer, &[grant]),
        vec![f.m1.id, f.m2.id]
    );
}

#[test]
fn revoking_the_grant_collapses_back_to_the_role_default() {
    let f = fixture();
    let grant = AccessOverride {
        id: Uuid::now_v7(),
        user_id: f.user_d,
        room_id: f.room_id,
        vessel_id: Some(f.v1.id),
        access_level: AccessLevel::VesselSpecific,
        granted_by: None,
        created_at: Utc::now(),
    };

    let widened = visible_for(&f, f.user_d, Role::Viewer, &[grant]);
    assert_eq!(widened.len(), 2);

    // Revocation means the override row is simply gone on the next
    // resolution; nothing else needs unwinding
    assert_eq!(visible_for(&f, f.user_d, Role::Viewer, &[]), vec![f.m1.id]);
}

#[test]
fn non_member_sees_nothing_in_any_role() {
    let f = fixture();

    for role in Role::ALL {
        let scope = compute_scope(
            f.user_d,
            false,
            RolePolicy::default_for(role),
            &[f.v1.clone(), f.v2.clone()],
            &[],
        );
        assert_eq!(scope, Scope::empty(), "{role}");

        let visible = filter_visible(
            vec![f.m1.clone(), f.m2.clone(), f.m3.clone()],
            &scope,
            f.user_d,
        );
        assert!(visible.is_empty(), "{role}");
    }
}

#[test]
fn private_room_level_message_restricted_to_author_and_all_vessels() {
    let f = fixture();
    let private = message(f.room_id, None, f.user_a, false);
    let page = vec![f.m1.clone(), private.clone()];

    let scope_for = |user_id: Uuid, role: Role| {
        compute_scope(
            user_id,
            true,
            RolePolicy::default_for(role),
            &[f.v1.clone(), f.v2.clone()],
            &[],
        )
    };

    // Author keeps their own private note
    let author_view = filter_visible(page.clone(), &scope_for(f.user_a, Role::Owner), f.user_a);
    assert!(author_view.iter().any(|m| m.id == private.id));

    // Another owner with room-level visibility does not
    let peer_view = filter_visible(page.clone(), &scope_for(f.user_b, Role::Owner), f.user_b);
    assert!(!peer_view.iter().any(|m| m.id == private.id));

    // Broker (all vessels) does
    let broker_view = filter_visible(page, &scope_for(f.user_c, Role::Broker), f.user_c);
    assert!(broker_view.iter().any(|m| m.id == private.id));
}

#[test]
fn zero_vessel_room_shows_all_public_room_messages_to_any_member() {
    let room_id = Uuid::now_v7();
    let author = Uuid::now_v7();
    let messages: Vec<Message> = (0..3).map(|_| message(room_id, None, author, true)).collect();

    for role in Role::ALL {
        let viewer = Uuid::now_v7();
        let scope = compute_scope(viewer, true, RolePolicy::default_for(role), &[], &[]);
        let visible = filter_visible(messages.clone(), &scope, viewer);
        assert_eq!(visible.len(), 3, "{role}");
    }
}
