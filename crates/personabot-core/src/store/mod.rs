//! The bot store shared by every view.

pub mod bot;
