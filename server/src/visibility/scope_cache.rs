//! Resolved-Scope Cache
//!
//! Explicit, short-TTL cache of resolved scopes keyed by
//! (user, room), using `DashMap` for lock-free concurrent access.
//! Per-key generation counters prevent a stale in-flight resolution
//! from overwriting a fresh invalidation (TOCTOU protection).
//!
//! Entries remember the role they were resolved under; a lookup with
//! a different role is a miss, so no cached scope survives a role
//! change.
//!
//! Invalidation contract: callers must invalidate on override grant,
//! override revoke, and membership change for the affected pair, and
//! sweep the room on room-wide changes such as vessel party
//! reassignment. A TTL of zero disables reuse entirely.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use dashmap::DashMap;
use uuid::Uuid;

use super::models::Scope;

type Key = (Uuid, Uuid);

/// Cached scope paired with the role and generation it was resolved at.
struct CachedScope {
    scope: Scope,
    role: String,
    _generation: u64,
    resolved_at: Instant,
}

/// Thread-safe cache of resolved (user, room) scopes.
pub struct ScopeCache {
    entries: DashMap<Key, CachedScope>,
    /// Per-key generation counters. Incremented on invalidation so
    /// in-flight resolutions from stale data are discarded on insert.
    generations: DashMap<Key, Arc<AtomicU64>>,
    ttl: Duration,
}

impl ScopeCache {
    /// Create a cache with the given entry TTL.
    #[must_use]
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: DashMap::new(),
            generations: DashMap::new(),
            ttl,
        }
    }

    /// Get or create the generation counter for a key.
    fn key_generation(&self, key: Key) -> Arc<AtomicU64> {
        self.generations
            .entry(key)
            .or_insert_with(|| Arc::new(AtomicU64::new(0)))
            .clone()
    }

    /// Current generation for a (user, room) pair.
    ///
    /// Capture this before resolving from the database and hand it
    /// back to [`Self::insert`] so a racing invalidation wins.
    pub fn begin(&self, user_id: Uuid, room_id: Uuid) -> u64 {
        self.key_generation((user_id, room_id))
            .load(Ordering::Acquire)
    }

    /// Look up a fresh cached scope, dropping stale entries.
    ///
    /// Stale means expired, or resolved under a different role: a
    /// demotion must take effect on the very next request, not after
    /// the TTL runs out.
    pub fn get(&self, user_id: Uuid, room_id: Uuid, role: &str) -> Option<Scope> {
        if self.ttl.is_zero() {
            return None;
        }

        let key = (user_id, room_id);
        if let Some(entry) = self.entries.get(&key) {
            if entry.role == role && entry.resolved_at.elapsed() < self.ttl {
                return Some(entry.scope.clone());
            }
        }

        // Stale (or absent); remove only if still stale to avoid
        // racing a concurrent refresh
        self.entries
            .remove_if(&key, |_, e| e.role != role || e.resolved_at.elapsed() >= self.ttl);
        None
    }

    /// Insert a scope resolved under `role`, captured at `generation`.
    ///
    /// A no-op when the pair was invalidated after `generation` was
    /// captured: the resolution may have observed pre-invalidation
    /// rows.
    pub fn insert(&self, user_id: Uuid, room_id: Uuid, role: &str, generation: u64, scope: Scope) {
        if self.ttl.is_zero() {
            return;
        }

        let key = (user_id, room_id);
        let current = self.key_generation(key).load(Ordering::Acquire);
        if current == generation {
            self.entries.insert(
                key,
                CachedScope {
                    scope,
                    role: role.to_string(),
                    _generation: generation,
                    resolved_at: Instant::now(),
                },
            );
        }
    }

    /// Invalidate the cached scope for one (user, room) pair.
    pub fn invalidate(&self, user_id: Uuid, room_id: Uuid) {
        let key = (user_id, room_id);
        self.key_generation(key).fetch_add(1, Ordering::Release);
        self.entries.remove(&key);
    }

    /// Invalidate every cached scope for a room.
    ///
    /// Used when room-wide state changes (e.g. a role-default policy
    /// update) rather than a single grant.
    pub fn invalidate_room(&self, room_id: Uuid) {
        for entry in &self.generations {
            if entry.key().1 == room_id {
                entry.value().fetch_add(1, Ordering::Release);
            }
        }
        self.entries.retain(|key, _| key.1 != room_id);
    }

    /// Number of live entries (expired entries may still be counted).
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the cache holds no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scope_with_room_level() -> Scope {
        Scope {
            can_see_room_level: true,
            ..Scope::empty()
        }
    }

    fn all_vessels_scope() -> Scope {
        Scope {
            can_see_room_level: true,
            can_see_all_vessels: true,
            ..Scope::empty()
        }
    }

    #[test]
    fn test_insert_then_get() {
        let cache = ScopeCache::new(Duration::from_secs(30));
        let user_id = Uuid::now_v7();
        let room_id = Uuid::now_v7();

        let generation = cache.begin(user_id, room_id);
        cache.insert(user_id, room_id, "viewer", generation, scope_with_room_level());

        assert_eq!(
            cache.get(user_id, room_id, "viewer"),
            Some(scope_with_room_level())
        );
    }

    #[test]
    fn test_zero_ttl_disables_reuse() {
        let cache = ScopeCache::new(Duration::ZERO);
        let user_id = Uuid::now_v7();
        let room_id = Uuid::now_v7();

        let generation = cache.begin(user_id, room_id);
        cache.insert(user_id, room_id, "viewer", generation, scope_with_room_level());

        assert_eq!(cache.get(user_id, room_id, "viewer"), None);
        assert!(cache.is_empty());
    }

    #[test]
    fn test_invalidate_removes_entry() {
        let cache = ScopeCache::new(Duration::from_secs(30));
        let user_id = Uuid::now_v7();
        let room_id = Uuid::now_v7();

        let generation = cache.begin(user_id, room_id);
        cache.insert(user_id, room_id, "viewer", generation, scope_with_room_level());
        cache.invalidate(user_id, room_id);

        assert_eq!(cache.get(user_id, room_id, "viewer"), None);
    }

    #[test]
    fn test_stale_resolution_does_not_overwrite_invalidation() {
        let cache = ScopeCache::new(Duration::from_secs(30));
        let user_id = Uuid::now_v7();
        let room_id = Uuid::now_v7();

        // Resolution begins, then a grant invalidates the pair before
        // the resolved (now stale) scope is inserted
        let generation = cache.begin(user_id, room_id);
        cache.invalidate(user_id, room_id);
        cache.insert(user_id, room_id, "viewer", generation, scope_with_room_level());

        assert_eq!(cache.get(user_id, room_id, "viewer"), None);
    }

    #[test]
    fn test_scope_cached_under_old_role_is_not_served() {
        let cache = ScopeCache::new(Duration::from_secs(30));
        let user_id = Uuid::now_v7();
        let room_id = Uuid::now_v7();

        // A broker scope goes in, then the user is demoted to viewer
        let generation = cache.begin(user_id, room_id);
        cache.insert(user_id, room_id, "broker", generation, all_vessels_scope());

        assert_eq!(cache.get(user_id, room_id, "viewer"), None);
        // The stale entry is evicted, not merely skipped
        assert!(cache.is_empty());
    }

    #[test]
    fn test_invalidate_room_sweeps_all_members() {
        let cache = ScopeCache::new(Duration::from_secs(30));
        let room_id = Uuid::now_v7();
        let other_room = Uuid::now_v7();
        let user_a = Uuid::now_v7();
        let user_b = Uuid::now_v7();

        for user_id in [user_a, user_b] {
            let generation = cache.begin(user_id, room_id);
            cache.insert(user_id, room_id, "viewer", generation, scope_with_room_level());
        }
        let generation = cache.begin(user_a, other_room);
        cache.insert(user_a, other_room, "viewer", generation, scope_with_room_level());

        cache.invalidate_room(room_id);

        assert_eq!(cache.get(user_a, room_id, "viewer"), None);
        assert_eq!(cache.get(user_b, room_id, "viewer"), None);
        assert_eq!(
            cache.get(user_a, other_room, "viewer"),
            Some(scope_with_room_level())
        );
    }

    #[test]
    fn test_expired_entry_is_not_returned() {
        let cache = ScopeCache::new(Duration::from_nanos(1));
        let user_id = Uuid::now_v7();
        let room_id = Uuid::now_v7();

        let generation = cache.begin(user_id, room_id);
        cache.insert(user_id, room_id, "viewer", generation, scope_with_room_level());
        std::thread::sleep(Duration::from_millis(1));

        assert_eq!(cache.get(user_id, room_id, "viewer"), None);
    }
}
