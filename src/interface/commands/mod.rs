//! # Command Handlers
//!
//! Contains specific handler functions for each supported command
//! (e.g. /start, /settoken, /projects). These handlers are invoked by the
//! Router.

pub mod core;
pub mod projects;
pub mod token;
