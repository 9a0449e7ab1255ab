//! # Domain Traits
//!
//! Abstract interfaces for the external collaborators (GitLab, Telegram, the
//! user store). Allows for pluggable implementations in the Infrastructure
//! layer and mock implementations in tests.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::types::{Commit, Identity, Issue, Project, UserRecord};

#[derive(Debug, thiserror::Error)]
pub enum ForgeError {
    /// The credential was rejected. The only failure the poll cycle surfaces
    /// to the user.
    #[error("authentication rejected: {0}")]
    Auth(String),
    /// Anything transient: network, rate limits, server errors.
    #[error("remote call failed: {0}")]
    Remote(String),
}

#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
    #[error("delivery failed: {0}")]
    Delivery(String),
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("store i/o failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("corrupt record: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Entry point to the remote repository host. Authenticating yields a
/// session bound to one credential.
#[async_trait]
pub trait Forge: Send + Sync {
    async fn open_session(&self, credential: &str) -> Result<Box<dyn ForgeSession>, ForgeError>;
}

/// An authenticated view of the remote host for a single user.
#[async_trait]
pub trait ForgeSession: Send + Sync + std::fmt::Debug {
    async fn current_identity(&self) -> Result<Identity, ForgeError>;

    async fn starred_projects(&self) -> Result<Vec<Project>, ForgeError>;

    /// Commits on a project created since `since`. The remote filter is a
    /// hint; callers re-check timestamps themselves.
    async fn commits_since(
        &self,
        project_id: u64,
        since: DateTime<Utc>,
    ) -> Result<Vec<Commit>, ForgeError>;

    /// Issues on a project created after `after`. Same caveat as above.
    async fn issues_created_after(
        &self,
        project_id: u64,
        after: DateTime<Utc>,
    ) -> Result<Vec<Issue>, ForgeError>;
}

/// Delivers one text unit to a user's chat. Best-effort: failures are
/// logged by callers, never retried.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send_text(&self, chat_id: i64, text: &str) -> Result<(), NotifyError>;
}

/// Persistent per-user records. `put` must create the record if absent and
/// overwrite the single key atomically.
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn get(&self, id: i64) -> Result<Option<UserRecord>, StoreError>;

    async fn get_all(&self) -> Result<Vec<UserRecord>, StoreError>;

    async fn put(&self, record: &UserRecord) -> Result<(), StoreError>;
}
