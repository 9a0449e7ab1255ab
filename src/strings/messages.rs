//! # Messages
//!
//! Constant strings and format functions for user-facing messages.
//! Includes the commit/issue notification templates, token prompts, and
//! error messages.

use crate::application::utils::{censor_string, cut_string};
use crate::domain::types::{Commit, Issue, Project, UserRecord, UserState};

pub const NOT_UNDERSTOOD: &str = "😅 Sorry, I don't know what you want.";
pub const UNKNOWN_COMMAND: &str =
    "😅 Sorry, I didn't understand that.\nYou can type /help to see what I can understand.";
pub const INTERNAL_ERROR: &str = "⚠️ *Internal Error* ⚠️\nPlease retry later";
pub const PROMPT_TOKEN: &str =
    "Please send me a GitLab personal access token (scope: `read_api`) as your next message.";
pub const NEED_TOKEN: &str = "Sorry, I need a GitLab token for this command to work. 😅\n\
     You can set a token with /settoken.";
pub const TOKEN_DELETED: &str =
    "🗑 Your token is gone and I stopped watching your projects.\nYou can set a new one with /settoken.";

pub const START_INTRO: &str = "*Hi!* 👋\n\
     I watch the starred projects of your GitLab account and message you about \
     new commits and issues.\n\
     To get going I need a personal access token.";

pub fn token_accepted(name: &str) -> String {
    format!(
        "*Hi {name}* 👋\nThis token works. 👍\n\
         You can delete it any time with the /deletetoken command. \
         I will notify you as soon as something happens on your repos."
    )
}

pub fn token_error(token: &str) -> String {
    format!(
        "⚠️ Unable to log in with your saved GitLab token!\n\
         Maybe your token expired recently?\n\
         Token: `{}`",
        censor_string(token)
    )
}

pub fn commit_notice(commit: &Commit, description_limit: usize) -> String {
    format!(
        "New Commit 🖥\n*{}*\n{} <{}>\n{}\n{}",
        commit.title,
        commit.author_name,
        commit.author_email,
        cut_string(&commit.message, description_limit),
        commit.web_url
    )
}

pub fn issue_notice(issue: &Issue, description_limit: usize) -> String {
    format!(
        "New Issue ✉️\n*{}*\n{}\n{}\n{}",
        issue.title,
        issue.author_name,
        cut_string(&issue.description, description_limit),
        issue.web_url
    )
}

pub fn project_list(projects: &[Project]) -> String {
    if projects.is_empty() {
        return "You have no starred projects yet. ⭐ a project on GitLab and I will watch it."
            .to_string();
    }
    let mut text = String::from("⭐ *Your starred projects*\n");
    for project in projects {
        text.push_str(&format!("\n[{}]({})", project.name, project.web_url));
    }
    text
}

pub fn user_info(user: &UserRecord) -> String {
    let state = match user.state {
        UserState::AwaitingCredential => "awaiting token",
        UserState::Active => "active",
    };
    format!(
        "*Chat ID*: {}\n*Token*: `{}`\n*Last checked*: {}\n*State*: {}",
        user.id,
        if user.credential.is_empty() {
            "not set".to_string()
        } else {
            censor_string(&user.credential)
        },
        user.watermark.format("%Y-%m-%d %H:%M:%S UTC"),
        state
    )
}

pub fn stats(total: usize, configured: usize) -> String {
    format!("👥 *Users*: {total}\n🔑 *With token*: {configured}")
}
