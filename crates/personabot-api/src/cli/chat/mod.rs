//! Interactive CLI chat with one bot.
//!
//! Prints the bot header and stored history, then reads prompts with
//! rustyline-async, sends each through the conversation flow and prints the
//! reply. Entry point: `loop_runner::run_chat_loop`.

pub mod banner;
pub mod commands;
pub mod input;
pub mod loop_runner;
