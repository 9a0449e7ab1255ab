//! # Projects Command
//!
//! Handles /projects: lists the starred projects the bot watches for the
//! user.

use anyhow::Result;

use crate::domain::traits::{Forge, ForgeError, Notifier, UserStore};
use crate::domain::types::UserRecord;
use crate::strings::messages;

pub async fn handle_projects(
    forge: &dyn Forge,
    notifier: &dyn Notifier,
    store: &dyn UserStore,
    mut user: UserRecord,
) -> Result<()> {
    if user.credential.is_empty() {
        notifier.send_text(user.id, messages::NEED_TOKEN).await?;
        return Ok(());
    }

    let session = match forge.open_session(&user.credential).await {
        Ok(session) => session,
        Err(ForgeError::Auth(reason)) => {
            tracing::warn!(user = user.id, %reason, "stored token rejected");
            notifier
                .send_text(user.id, &messages::token_error(&user.credential))
                .await?;
            if !user.has_error {
                user.has_error = true;
                store.put(&user).await?;
            }
            return Ok(());
        }
        Err(e) => {
            tracing::warn!(user = user.id, error = %e, "session open failed");
            notifier.send_text(user.id, messages::INTERNAL_ERROR).await?;
            return Ok(());
        }
    };

    match session.starred_projects().await {
        Ok(projects) => {
            notifier
                .send_text(user.id, &messages::project_list(&projects))
                .await?;
        }
        Err(e) => {
            tracing::warn!(user = user.id, error = %e, "project listing failed");
            notifier.send_text(user.id, messages::INTERNAL_ERROR).await?;
        }
    }
    Ok(())
}
