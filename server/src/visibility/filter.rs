//! Message filtering against a resolved scope.
//!
//! Applies a [`Scope`] plus the per-message private flag to a message
//! page. Pure and order-preserving; vessel membership tests are O(1)
//! against the precomputed set, so a page filters in O(n).

use uuid::Uuid;

use crate::db::Message;

use super::models::Scope;

/// Whether one message is visible under a scope.
///
/// The private flag is an orthogonal, stricter gate: a non-public
/// message must still pass the scope test, and is then kept only for
/// its author or for viewers holding all-vessels visibility.
fn is_visible(message: &Message, scope: &Scope, viewer_id: Uuid) -> bool {
    let in_scope = scope.can_see_all_vessels
        || message
            .vessel_id
            .map_or(scope.can_see_room_level, |v| scope.vessel_ids.contains(&v));

    if !in_scope {
        return false;
    }

    if !message.is_public {
        return message.author_id == viewer_id || scope.can_see_all_vessels;
    }

    true
}

/// Filter a message page down to the visible subset, preserving order.
pub fn filter_visible(messages: Vec<Message>, scope: &Scope, viewer_id: Uuid) -> Vec<Message> {
    messages
        .into_iter()
        .filter(|m| is_visible(m, scope, viewer_id))
        .collect()
}
