//! Generation endpoint adapters.

pub mod client;

pub use client::HttpGenerationClient;
