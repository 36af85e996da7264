//! Business logic and port trait definitions for personabot.
//!
//! This crate defines the "ports" (storage and generation traits) that the
//! infrastructure layer implements, plus the bot store and the per-bot
//! conversation flow built on them. It depends only on `personabot-types` --
//! never on `personabot-infra` or any IO crate.

pub mod chat;
pub mod generate;
pub mod storage;
pub mod store;
