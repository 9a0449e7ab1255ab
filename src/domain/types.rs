//! # Domain Types
//!
//! Common data structures and enums used across the application logic.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Governs how free-text input from the user is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum UserState {
    /// The next free-text message is treated as a GitLab token.
    #[default]
    AwaitingCredential,
    Active,
}

/// One record per Telegram chat, persisted in the user store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserRecord {
    /// Telegram chat id. Immutable, primary key.
    pub id: i64,
    /// GitLab personal access token. Empty means "not configured".
    #[serde(default)]
    pub credential: String,
    /// Exclusive lower bound for "new" events. Only advances after a cycle
    /// fetched all of the user's projects.
    #[serde(default = "epoch")]
    pub watermark: DateTime<Utc>,
    /// True iff the last authentication attempt failed and the user has
    /// already been told. Suppresses repeated auth-failure notices.
    #[serde(default)]
    pub has_error: bool,
    #[serde(default)]
    pub state: UserState,
}

fn epoch() -> DateTime<Utc> {
    DateTime::<Utc>::UNIX_EPOCH
}

impl UserRecord {
    pub fn new(id: i64) -> Self {
        Self {
            id,
            credential: String::new(),
            watermark: epoch(),
            has_error: false,
            state: UserState::AwaitingCredential,
        }
    }

    /// Eligible users are included in scheduler ticks.
    pub fn is_eligible(&self) -> bool {
        !self.credential.is_empty()
    }

    /// Clears the credential and all derived state. Used when the user
    /// revokes access; the record itself is never deleted.
    pub fn reset(&mut self) {
        self.credential.clear();
        self.watermark = epoch();
        self.has_error = false;
        self.state = UserState::AwaitingCredential;
    }
}

/// The authenticated GitLab identity behind a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub name: String,
    pub email: String,
}

/// A starred project. Re-enumerated fresh every cycle, never persisted.
#[derive(Debug, Clone)]
pub struct Project {
    pub id: u64,
    pub name: String,
    pub web_url: String,
}

#[derive(Debug, Clone)]
pub struct Commit {
    pub title: String,
    pub author_name: String,
    pub author_email: String,
    pub created_at: DateTime<Utc>,
    pub message: String,
    pub web_url: String,
}

#[derive(Debug, Clone)]
pub struct Issue {
    pub title: String,
    pub author_name: String,
    pub created_at: DateTime<Utc>,
    pub description: String,
    pub web_url: String,
}

/// Result of running one poll cycle for one user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleOutcome {
    /// All projects were fetched (individual units may still have failed)
    /// and the watermark advanced.
    Completed,
    /// The credential was rejected. Watermark untouched.
    AuthFailed,
    /// A transient failure before the fan-out (session open, identity, or
    /// project listing). Watermark untouched, retried next tick.
    ListFailed,
}
