//! Shared domain types for personabot.
//!
//! Bot and Message records, the generation endpoint wire types, configuration
//! and the error taxonomy used by every other crate.
//!
//! Zero infrastructure dependencies -- only serde, uuid, chrono, thiserror, base64.

pub mod bot;
pub mod chat;
pub mod config;
pub mod error;
pub mod generate;
pub mod text;
