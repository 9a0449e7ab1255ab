//! # Infrastructure Layer
//!
//! Handles interactions with external systems and services.
//! Implements the traits defined in the Domain layer (Forge, Notifier,
//! UserStore).

pub mod gitlab;
pub mod store;
pub mod telegram;
