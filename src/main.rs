//! # Main Entry Point
//!
//! Initializes the application:
//! - Domain: Configuration and Types
//! - Infrastructure: GitLab, Telegram, User Store
//! - Application: Poll Cycle Engine, Fleet Scheduler, Router
//! - Interface: Command Handlers
//!
//! The process runs two loops: the fleet scheduler (eager tick at startup,
//! then fixed-interval ticks) and the Telegram long-poll loop that feeds the
//! command router.

mod application;
mod domain;
mod infrastructure;
mod interface;
mod strings;

use std::fs;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};

use crate::application::cycle::CycleEngine;
use crate::application::router::CommandRouter;
use crate::application::scheduler::FleetScheduler;
use crate::domain::config::AppConfig;
use crate::domain::traits::{Forge, Notifier, UserStore};
use crate::infrastructure::gitlab::GitLabForge;
use crate::infrastructure::store::FileUserStore;
use crate::infrastructure::telegram::TelegramBot;

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Load Configuration
    let config_content =
        fs::read_to_string("data/config.yaml").context("Failed to read config.yaml")?;
    let config: AppConfig =
        serde_yaml::from_str(&config_content).context("Failed to parse config.yaml")?;

    // 2. Logging Setup
    if !std::path::Path::new("data").exists() {
        fs::create_dir("data").context("Failed to create data directory")?;
    }

    // Clear previous session log
    let log_path = std::path::Path::new("data/session.log");
    if log_path.exists() {
        let _ = fs::remove_file(log_path);
    }

    let file_appender = tracing_appender::rolling::never("data", "session.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info,hyper=warn,reqwest=warn"));

    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(non_blocking)
        .with_ansi(false);
    let console_layer = tracing_subscriber::fmt::layer().with_writer(std::io::stdout);

    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;

    tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .with(console_layer)
        .init();

    tracing::info!("Starting starwatch...");

    // 3. Initialize Infrastructure
    let token = config
        .telegram_token()
        .context("Telegram token missing: set services.telegram.token or TELEGRAM_TOKEN")?;
    let bot = Arc::new(TelegramBot::new(&token).context("Failed to build Telegram client")?);
    let me = bot
        .get_me()
        .await
        .context("Unable to authorize as telegram bot")?;
    tracing::info!(
        "Authorized on account {}",
        me.username.as_deref().unwrap_or("<unnamed>")
    );

    let store: Arc<dyn UserStore> =
        Arc::new(FileUserStore::open("data/users.json").context("Unable to initialize user db")?);
    let forge: Arc<dyn Forge> = Arc::new(
        GitLabForge::new(&config.services.gitlab).context("Failed to build GitLab client")?,
    );
    let notifier: Arc<dyn Notifier> = bot.clone();

    // 4. Initialize Application Components
    let engine = Arc::new(CycleEngine::new(
        forge.clone(),
        notifier.clone(),
        store.clone(),
        config.system.description_limit,
    ));
    let scheduler = Arc::new(FleetScheduler::new(
        engine,
        store.clone(),
        Duration::from_secs(config.system.poll_interval_minutes * 60),
    ));
    let router = Arc::new(CommandRouter::new(forge, notifier, store));

    // 5. Start the Background Jobs (eager first tick, then fixed interval)
    tokio::spawn(scheduler.clone().run());

    // 6. Listen for Telegram events
    let mut offset = 0i64;
    loop {
        let updates = match bot.get_updates(offset, 60).await {
            Ok(updates) => updates,
            Err(e) => {
                tracing::warn!(error = %e, "getUpdates failed, backing off");
                tokio::time::sleep(Duration::from_secs(5)).await;
                continue;
            }
        };

        for update in updates {
            offset = offset.max(update.update_id + 1);
            let Some(message) = update.message else {
                continue;
            };
            let Some(text) = message.text else {
                continue;
            };
            let chat_id = message.chat.id;
            let sender = message
                .from
                .and_then(|f| f.username)
                .unwrap_or_else(|| chat_id.to_string());
            tracing::info!("[{}] {}", sender, text);

            let router = router.clone();
            tokio::spawn(async move {
                if let Err(e) = router.route(chat_id, &text).await {
                    tracing::error!(user = chat_id, error = %e, "failed to route message");
                }
            });
        }
    }
}
