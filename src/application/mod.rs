//! # Application Layer
//!
//! Contains the core business logic and orchestration of the bot: the poll
//! cycle engine, the fleet scheduler, command routing, and text helpers.

pub mod cycle;
pub mod router;
pub mod scheduler;
pub mod utils;

#[cfg(test)]
pub mod support;
