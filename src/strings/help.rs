//! # Help Text
//!
//! Static texts for the /help, /about and /privacy commands.

pub const HELP_TEXT: &str = "*What I understand* 🤖\n\
/start — introduction and token setup\n\
/settoken — set or replace your GitLab token\n\
/deletetoken — delete your token and stop notifications\n\
/projects — list the starred projects I watch\n\
/userinfo — show what I know about you\n\
/stats — bot usage numbers\n\
/privacy — what is stored and where\n\
/about — about this bot";

pub const ABOUT_TEXT: &str = "*starwatch* 🔭\n\
A small bot that polls your starred GitLab projects and notifies you about \
new commits and issues.";

pub const PRIVACY_TEXT: &str = "*Privacy* 🔒\n\
I store your chat id, your GitLab token, and the time of your last \
successful check. Nothing else, and nothing is shared. /deletetoken wipes \
the token immediately.";
