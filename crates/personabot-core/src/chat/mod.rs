//! Per-bot conversation flow: optimistic send, commit on success, rollback
//! on failure.

pub mod conversation;
