//! # Core Commands
//!
//! Handles /start, /help, /about, /privacy, /userinfo and /stats.

use anyhow::Result;

use crate::domain::traits::{Notifier, UserStore};
use crate::domain::types::{UserRecord, UserState};
use crate::strings::{help, messages};

pub async fn handle_start(
    notifier: &dyn Notifier,
    store: &dyn UserStore,
    mut user: UserRecord,
) -> Result<()> {
    notifier.send_text(user.id, messages::START_INTRO).await?;

    if user.credential.is_empty() {
        if user.state != UserState::AwaitingCredential {
            user.state = UserState::AwaitingCredential;
            store.put(&user).await?;
        }
        notifier.send_text(user.id, messages::PROMPT_TOKEN).await?;
    }
    Ok(())
}

pub async fn handle_help(notifier: &dyn Notifier, user: &UserRecord) -> Result<()> {
    notifier.send_text(user.id, help::HELP_TEXT).await?;
    Ok(())
}

pub async fn handle_about(notifier: &dyn Notifier, user: &UserRecord) -> Result<()> {
    notifier.send_text(user.id, help::ABOUT_TEXT).await?;
    Ok(())
}

pub async fn handle_privacy(notifier: &dyn Notifier, user: &UserRecord) -> Result<()> {
    notifier.send_text(user.id, help::PRIVACY_TEXT).await?;
    Ok(())
}

pub async fn handle_userinfo(notifier: &dyn Notifier, user: &UserRecord) -> Result<()> {
    notifier.send_text(user.id, &messages::user_info(user)).await?;
    Ok(())
}

pub async fn handle_stats(
    notifier: &dyn Notifier,
    store: &dyn UserStore,
    user: &UserRecord,
) -> Result<()> {
    let users = store.get_all().await?;
    let configured = users.iter().filter(|u| u.is_eligible()).count();
    notifier
        .send_text(user.id, &messages::stats(users.len(), configured))
        .await?;
    Ok(())
}
