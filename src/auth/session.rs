//! In-memory login sessions.
//!
//! A successful login yields an opaque bearer token. Tokens expire after a
//! fixed time-to-live; expired sessions are dropped when looked up.

use std::collections::HashMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::models::User;

/// Longest accepted session lifetime, one year.
pub const MAX_SESSION_TTL_MINUTES: i64 = 366 * 24 * 60;

/// A logged-in user and the lifetime of their token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Session {
    /// The bearer token.
    pub token: Uuid,
    /// The authenticated user.
    pub user: User,
    /// When the token stops being accepted.
    pub expires_at: DateTime<Utc>,
}

impl Session {
    /// Returns true once the session has passed its expiry.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}

/// Thread-safe table of active sessions.
///
/// Cloning is cheap; clones share the same table.
#[derive(Debug, Clone)]
pub struct SessionStore {
    sessions: Arc<RwLock<HashMap<Uuid, Session>>>,
    ttl: Duration,
}

impl SessionStore {
    /// Creates an empty store whose sessions live for `ttl_minutes`,
    /// clamped to between one minute and [`MAX_SESSION_TTL_MINUTES`].
    pub fn new(ttl_minutes: i64) -> Self {
        Self {
            sessions: Arc::new(RwLock::new(HashMap::new())),
            ttl: Duration::minutes(ttl_minutes.clamp(1, MAX_SESSION_TTL_MINUTES)),
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, HashMap<Uuid, Session>> {
        self.sessions.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<Uuid, Session>> {
        self.sessions.write().unwrap_or_else(|e| e.into_inner())
    }

    /// Starts a session for the user.
    pub fn create(&self, user: User) -> Session {
        self.create_at(user, Utc::now())
    }

    /// Starts a session for the user as of `now`.
    pub fn create_at(&self, user: User, now: DateTime<Utc>) -> Session {
        let session = Session {
            token: Uuid::new_v4(),
            user,
            expires_at: now
                .checked_add_signed(self.ttl)
                .unwrap_or(DateTime::<Utc>::MAX_UTC),
        };
        self.write().insert(session.token, session.clone());
        session
    }

    /// Looks up a live session.
    pub fn get(&self, token: &Uuid) -> Option<Session> {
        self.get_at(token, Utc::now())
    }

    /// Looks up a session as of `now`, removing it if it has expired.
    pub fn get_at(&self, token: &Uuid, now: DateTime<Utc>) -> Option<Session> {
        let session = self.read().get(token).cloned()?;
        if session.is_expired_at(now) {
            self.write().remove(token);
            return None;
        }
        Some(session)
    }

    /// Ends a session. Returns true if it existed.
    pub fn revoke(&self, token: &Uuid) -> bool {
        self.write().remove(token).is_some()
    }

    /// Ends every session of a user. Returns how many were removed.
    pub fn revoke_user(&self, user_id: i64) -> usize {
        let mut sessions = self.write();
        let before = sessions.len();
        sessions.retain(|_, s| s.user.user_id != user_id);
        before - sessions.len()
    }

    /// Drops every session expired as of `now`. Returns how many were removed.
    pub fn purge_expired_at(&self, now: DateTime<Utc>) -> usize {
        let mut sessions = self.write();
        let before = sessions.len();
        sessions.retain(|_, s| !s.is_expired_at(now));
        before - sessions.len()
    }

    /// Number of sessions currently held, including expired ones not yet purged.
    pub fn len(&self) -> usize {
        self.read().len()
    }

    /// Returns true if no sessions are held.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
