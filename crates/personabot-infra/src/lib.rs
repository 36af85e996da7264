//! Infrastructure layer for personabot.
//!
//! Contains implementations of the ports defined in `personabot-core`:
//! file-backed and in-memory key/value storage, the reqwest generation
//! client, plus configuration loading and data directory resolution.

pub mod config;
pub mod filesystem;
pub mod generate;
pub mod storage;
