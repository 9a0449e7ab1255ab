//! # Poll Cycle Engine
//!
//! Runs one poll cycle for one user: authenticate, list starred projects,
//! fetch per-project commit and issue deltas concurrently, deliver
//! notifications for everything newer than the user's watermark, then
//! advance the watermark.
//!
//! The watermark is captured *before* the fan-out so that events created on
//! one project while another project's fetch is in flight are not missed.
//! A per-project fetch failure drops that project's events for the current
//! window but never blocks the watermark; only authentication and project
//! listing failures abort the cycle early.

use std::sync::Arc;

use chrono::Utc;
use futures::future::join_all;
use futures::FutureExt;

use crate::domain::traits::{Forge, ForgeError, ForgeSession, Notifier, UserStore};
use crate::domain::types::{CycleOutcome, Identity, Project, UserRecord};
use crate::strings::messages;

pub struct CycleEngine {
    forge: Arc<dyn Forge>,
    notifier: Arc<dyn Notifier>,
    store: Arc<dyn UserStore>,
    description_limit: usize,
}

impl CycleEngine {
    pub fn new(
        forge: Arc<dyn Forge>,
        notifier: Arc<dyn Notifier>,
        store: Arc<dyn UserStore>,
        description_limit: usize,
    ) -> Self {
        Self {
            forge,
            notifier,
            store,
            description_limit,
        }
    }

    /// Runs one cycle on an owned copy of the user record. The record in the
    /// store is written at most twice: once for a `has_error` transition and
    /// once for the final watermark commit.
    pub async fn run_cycle(&self, mut user: UserRecord) -> CycleOutcome {
        let session = match self.forge.open_session(&user.credential).await {
            Ok(session) => session,
            Err(ForgeError::Auth(reason)) => {
                tracing::error!(user = user.id, %reason, "authentication failed");
                if user.has_error {
                    // Already notified for this failure episode.
                    return CycleOutcome::AuthFailed;
                }
                let notice = messages::token_error(&user.credential);
                if let Err(e) = self.notifier.send_text(user.id, &notice).await {
                    tracing::warn!(user = user.id, error = %e, "auth notice delivery failed");
                }
                user.has_error = true;
                self.persist(&user).await;
                return CycleOutcome::AuthFailed;
            }
            Err(e) => {
                tracing::warn!(user = user.id, error = %e, "session open failed");
                return CycleOutcome::ListFailed;
            }
        };

        if user.has_error {
            // Credential works again. The next deliveries are the recovery
            // signal, no explicit notice.
            user.has_error = false;
            self.persist(&user).await;
        }

        let identity = match session.current_identity().await {
            Ok(identity) => identity,
            Err(e) => {
                tracing::warn!(user = user.id, error = %e, "identity lookup failed");
                return CycleOutcome::ListFailed;
            }
        };

        let projects = match session.starred_projects().await {
            Ok(projects) => projects,
            Err(e) => {
                tracing::warn!(user = user.id, error = %e, "project listing failed");
                return CycleOutcome::ListFailed;
            }
        };

        // Captured before any fetch is dispatched; becomes the new watermark
        // only once every unit has been joined.
        let cycle_start = Utc::now();

        let mut units = Vec::with_capacity(projects.len() * 2);
        for project in &projects {
            units.push(self.commit_unit(&*session, &user, &identity, project).boxed());
            units.push(self.issue_unit(&*session, &user, project).boxed());
        }
        let delivered: usize = join_all(units).await.into_iter().sum();

        user.watermark = cycle_start;
        self.persist(&user).await;

        tracing::info!(
            user = user.id,
            projects = projects.len(),
            delivered,
            "cycle completed"
        );
        CycleOutcome::Completed
    }

    /// One unit of work: commits of a single project. Failures are logged
    /// and swallowed so sibling units keep running.
    async fn commit_unit(
        &self,
        session: &dyn ForgeSession,
        user: &UserRecord,
        identity: &Identity,
        project: &Project,
    ) -> usize {
        let commits = match session.commits_since(project.id, user.watermark).await {
            Ok(commits) => commits,
            Err(e) => {
                tracing::warn!(
                    user = user.id,
                    project = project.id,
                    error = %e,
                    "commit fetch failed"
                );
                return 0;
            }
        };

        let mut delivered = 0;
        for commit in commits {
            // The remote `since` filter is a hint; the watermark comparison
            // is authoritative. Own pushes are never announced.
            if commit.created_at <= user.watermark || commit.author_email == identity.email {
                continue;
            }
            let text = messages::commit_notice(&commit, self.description_limit);
            match self.notifier.send_text(user.id, &text).await {
                Ok(()) => delivered += 1,
                Err(e) => {
                    tracing::warn!(user = user.id, error = %e, "commit delivery failed");
                }
            }
        }
        delivered
    }

    /// One unit of work: issues of a single project.
    async fn issue_unit(
        &self,
        session: &dyn ForgeSession,
        user: &UserRecord,
        project: &Project,
    ) -> usize {
        let issues = match session.issues_created_after(project.id, user.watermark).await {
            Ok(issues) => issues,
            Err(e) => {
                tracing::warn!(
                    user = user.id,
                    project = project.id,
                    error = %e,
                    "issue fetch failed"
                );
                return 0;
            }
        };

        let mut delivered = 0;
        for issue in issues {
            if issue.created_at <= user.watermark {
                continue;
            }
            let text = messages::issue_notice(&issue, self.description_limit);
            match self.notifier.send_text(user.id, &text).await {
                Ok(()) => delivered += 1,
                Err(e) => {
                    tracing::warn!(user = user.id, error = %e, "issue delivery failed");
                }
            }
        }
        delivered
    }

    /// Store failures lose the in-memory mutation; the next cycle re-derives
    /// from the last durably committed record.
    async fn persist(&self, user: &UserRecord) {
        if let Err(e) = self.store.put(user).await {
            tracing::error!(user = user.id, error = %e, "failed to persist user record");
        }
    }
}
