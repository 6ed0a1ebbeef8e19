//! In-memory wizard sessions with idle expiry.
//!
//! A session is dropped once it has gone unused for longer than the store's TTL, or when the
//! client closes it. Expired sessions are swept on every access, so a request for one answers
//! "not found" exactly like a session that never existed.

use lmn_core::WizardSession;
use std::collections::HashMap;
use std::time::{Duration, Instant};
use uuid::Uuid;

struct Entry {
    session: WizardSession,
    last_used: Instant,
}

pub(crate) struct SessionStore {
    ttl: Duration,
    entries: HashMap<Uuid, Entry>,
}

impl SessionStore {
    pub(crate) fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: HashMap::new(),
        }
    }

    pub(crate) fn insert(&mut self, session: WizardSession) {
        self.insert_at(session, Instant::now());
    }

    /// Returns the live session and marks it as used.
    pub(crate) fn get_mut(&mut self, id: &Uuid) -> Option<&mut WizardSession> {
        self.get_mut_at(id, Instant::now())
    }

    pub(crate) fn remove(&mut self, id: &Uuid) -> Option<WizardSession> {
        self.entries.remove(id).map(|entry| entry.session)
    }

    fn insert_at(&mut self, session: WizardSession, now: Instant) {
        self.evict_expired(now);
        self.entries.insert(
            session.id(),
            Entry {
                session,
                last_used: now,
            },
        );
    }

    fn get_mut_at(&mut self, id: &Uuid, now: Instant) -> Option<&mut WizardSession> {
        self.evict_expired(now);
        self.entries.get_mut(id).map(|entry| {
            entry.last_used = now;
            &mut entry.session
        })
    }

    fn evict_expired(&mut self, now: Instant) {
        let ttl = self.ttl;
        let before = self.entries.len();
        self.entries
            .retain(|_, entry| now.saturating_duration_since(entry.last_used) <= ttl);
        let evicted = before - self.entries.len();
        if evicted > 0 {
            tracing::debug!(evicted, remaining = self.entries.len(), "expired idle sessions");
        }
    }
}
