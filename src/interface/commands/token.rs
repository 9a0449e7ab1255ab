//! # Token Commands
//!
//! Handles the credential-setup conversation: /settoken, /deletetoken, and
//! free-text token intake while the user is in the AwaitingCredential state.

use anyhow::Result;
use chrono::Utc;

use crate::domain::traits::{Forge, Notifier, UserStore};
use crate::domain::types::{UserRecord, UserState};
use crate::strings::messages;

pub async fn handle_set_token(
    notifier: &dyn Notifier,
    store: &dyn UserStore,
    mut user: UserRecord,
) -> Result<()> {
    user.state = UserState::AwaitingCredential;
    store.put(&user).await?;
    notifier.send_text(user.id, messages::PROMPT_TOKEN).await?;
    Ok(())
}

pub async fn handle_delete_token(
    notifier: &dyn Notifier,
    store: &dyn UserStore,
    mut user: UserRecord,
) -> Result<()> {
    user.reset();
    store.put(&user).await?;
    notifier.send_text(user.id, messages::TOKEN_DELETED).await?;
    Ok(())
}

/// Free text from the user. While awaiting a credential it is validated as
/// a GitLab token; otherwise the bot admits it did not understand.
pub async fn handle_free_text(
    forge: &dyn Forge,
    notifier: &dyn Notifier,
    store: &dyn UserStore,
    mut user: UserRecord,
    text: &str,
) -> Result<()> {
    if user.state != UserState::AwaitingCredential {
        notifier.send_text(user.id, messages::NOT_UNDERSTOOD).await?;
        return Ok(());
    }

    let token = text.trim();
    let session = match forge.open_session(token).await {
        Ok(session) => session,
        Err(e) => {
            tracing::warn!(user = user.id, error = %e, "submitted token rejected");
            notifier
                .send_text(user.id, &messages::token_error(token))
                .await?;
            return Ok(());
        }
    };

    let identity = match session.current_identity().await {
        Ok(identity) => identity,
        Err(e) => {
            tracing::warn!(user = user.id, error = %e, "identity lookup failed for new token");
            notifier
                .send_text(user.id, &messages::token_error(token))
                .await?;
            return Ok(());
        }
    };

    // Token works: activate the user. Watching starts now, older events are
    // never replayed.
    user.credential = token.to_string();
    user.has_error = false;
    user.state = UserState::Active;
    user.watermark = Utc::now();
    if let Err(e) = store.put(&user).await {
        tracing::error!(user = user.id, error = %e, "failed to persist new token");
        notifier.send_text(user.id, messages::INTERNAL_ERROR).await?;
        return Ok(());
    }

    notifier
        .send_text(user.id, &messages::token_accepted(&identity.name))
        .await?;

    // Show what the bot will watch from now on.
    match session.starred_projects().await {
        Ok(projects) => {
            notifier
                .send_text(user.id, &messages::project_list(&projects))
                .await?;
        }
        Err(e) => {
            tracing::warn!(user = user.id, error = %e, "project listing after setup failed");
        }
    }
    Ok(())
}
