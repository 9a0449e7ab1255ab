//! # Fleet Scheduler
//!
//! Runs the poll cycle engine across all eligible users, once eagerly at
//! startup and then on a fixed interval. Each user runs as an independent
//! task; one user's failure (or panic) never touches another's cycle. The
//! scheduler itself is stateless between ticks, all durable state lives in
//! the user records.

use std::sync::Arc;
use std::time::Duration;

use tokio::time::Instant;

use crate::application::cycle::CycleEngine;
use crate::domain::traits::UserStore;

pub struct FleetScheduler {
    engine: Arc<CycleEngine>,
    store: Arc<dyn UserStore>,
    period: Duration,
}

impl FleetScheduler {
    pub fn new(engine: Arc<CycleEngine>, store: Arc<dyn UserStore>, period: Duration) -> Self {
        Self {
            engine,
            store,
            period,
        }
    }

    /// Drives ticks forever: one eager tick, then one per period. Ticks are
    /// serialized, so a user appears in at most one in-flight cycle.
    pub async fn run(self: Arc<Self>) {
        let mut interval = tokio::time::interval(self.period);
        // The first interval tick fires immediately; that is our eager run.
        loop {
            interval.tick().await;
            self.tick().await;
        }
    }

    /// One pass over all eligible users. Fire-and-forget from the caller's
    /// perspective: outcomes are logged, never returned.
    pub async fn tick(&self) {
        tracing::info!("running background poll");
        let started = Instant::now();

        let users = match self.store.get_all().await {
            Ok(users) => users,
            Err(e) => {
                tracing::error!(error = %e, "unable to load user records");
                return;
            }
        };
        let total = users.len();

        let mut handles = Vec::new();
        for user in users {
            // Users without a token are not eligible.
            if !user.is_eligible() {
                continue;
            }
            let engine = self.engine.clone();
            handles.push(tokio::spawn(async move { engine.run_cycle(user).await }));
        }
        let eligible = handles.len();

        for handle in handles {
            if let Err(e) = handle.await {
                tracing::error!(error = %e, "cycle task aborted");
            }
        }

        tracing::info!(
            total,
            eligible,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "tick completed"
        );
    }
}
