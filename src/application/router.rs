//! # Command Router
//!
//! Routes incoming chat messages to the appropriate command handler (in
//! `interface/commands`). Free text is interpreted according to the user's
//! state: while awaiting a credential it is treated as a GitLab token.

use std::sync::Arc;

use anyhow::Result;

use crate::domain::traits::{Forge, Notifier, UserStore};
use crate::domain::types::UserRecord;
use crate::interface::commands;
use crate::strings::messages;

pub struct CommandRouter {
    forge: Arc<dyn Forge>,
    notifier: Arc<dyn Notifier>,
    store: Arc<dyn UserStore>,
}

impl CommandRouter {
    pub fn new(forge: Arc<dyn Forge>, notifier: Arc<dyn Notifier>, store: Arc<dyn UserStore>) -> Self {
        Self {
            forge,
            notifier,
            store,
        }
    }

    pub async fn route(&self, chat_id: i64, message: &str) -> Result<()> {
        let user = self.load_or_create(chat_id).await?;
        let msg = message.trim();

        if !msg.starts_with('/') {
            return commands::token::handle_free_text(
                &*self.forge,
                &*self.notifier,
                &*self.store,
                user,
                msg,
            )
            .await;
        }

        let (cmd, _args) = match msg.find(' ') {
            Some(idx) => (&msg[..idx], msg[idx + 1..].trim()),
            None => (msg, ""),
        };
        // Group chats address commands as /cmd@botname.
        let cmd = cmd.split('@').next().unwrap_or(cmd).to_lowercase();
        tracing::info!(user = chat_id, %cmd, "dispatching command");

        match cmd.as_str() {
            "/start" => {
                commands::core::handle_start(&*self.notifier, &*self.store, user).await
            }
            "/help" => commands::core::handle_help(&*self.notifier, &user).await,
            "/about" => commands::core::handle_about(&*self.notifier, &user).await,
            "/privacy" => commands::core::handle_privacy(&*self.notifier, &user).await,
            "/userinfo" => commands::core::handle_userinfo(&*self.notifier, &user).await,
            "/stats" => commands::core::handle_stats(&*self.notifier, &*self.store, &user).await,
            "/settoken" => {
                commands::token::handle_set_token(&*self.notifier, &*self.store, user).await
            }
            "/deletetoken" => {
                commands::token::handle_delete_token(&*self.notifier, &*self.store, user).await
            }
            "/projects" => {
                commands::projects::handle_projects(
                    &*self.forge,
                    &*self.notifier,
                    &*self.store,
                    user,
                )
                .await
            }
            _ => {
                self.notifier
                    .send_text(chat_id, messages::UNKNOWN_COMMAND)
                    .await?;
                Ok(())
            }
        }
    }

    async fn load_or_create(&self, chat_id: i64) -> Result<UserRecord> {
        if let Some(user) = self.store.get(chat_id).await? {
            return Ok(user);
        }
        let user = UserRecord::new(chat_id);
        self.store.put(&user).await?;
        tracing::info!(user = chat_id, "created new user");
        Ok(user)
    }
}
