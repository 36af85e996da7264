//! CLI command definitions for the `pbot` binary.
//!
//! Uses clap derive macros for argument parsing. The CLI follows a verb-noun
//! pattern (e.g., `pbot create bot`, `pbot list bots`). Bots are addressed
//! by id, unique id prefix, or name.

pub mod bot;
pub mod chat;
pub mod history;
pub mod status;
pub mod wizard;

use std::borrow::Cow;
use std::path::PathBuf;
use std::time::Duration;

use chrono::{DateTime, Local, Utc};
use clap::{Parser, Subcommand};
use clap_complete::Shell;
use indicatif::{ProgressBar, ProgressStyle};

/// Create persona bots and talk to them.
#[derive(Debug, Parser)]
#[command(name = "pbot", version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output machine-readable JSON instead of styled text.
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress all output except errors.
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Detailed output (-v for verbose, -vv for debug/trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Print OpenTelemetry spans to stdout. Cannot be combined with --json.
    #[arg(long, global = true, conflicts_with = "json")]
    pub otel: bool,

    /// Base URL of the generation service.
    #[arg(long, global = true, env = "PERSONABOT_API_BASE_URL")]
    pub api_base_url: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Create a new resource.
    Create {
        #[command(subcommand)]
        resource: CreateResource,
    },

    /// Guided setup: create a bot, then start chatting with it.
    New,

    /// List resources.
    #[command(alias = "ls")]
    List {
        #[command(subcommand)]
        resource: ListResource,
    },

    /// Show details of a bot.
    Show {
        /// Bot id, id prefix, or name.
        bot: String,
    },

    /// Delete a resource.
    #[command(alias = "rm")]
    Delete {
        #[command(subcommand)]
        resource: DeleteResource,
    },

    /// Chat with a bot interactively.
    Chat {
        /// Bot id, id prefix, or name.
        bot: String,
    },

    /// Print a bot's conversation.
    History {
        /// Bot id, id prefix, or name.
        bot: String,
    },

    /// Save the audio of a bot reply to a file.
    Audio {
        /// Bot id, id prefix, or name.
        bot: String,

        /// Message id or unique prefix of it (see `pbot history --json`).
        message: String,

        /// Output file (MPEG audio).
        out: PathBuf,
    },

    /// Show where data lives and which endpoint is used.
    Status,

    /// Generate shell completions.
    Completions {
        /// Shell to generate completions for.
        shell: Shell,
    },
}

#[derive(Debug, Subcommand)]
pub enum CreateResource {
    /// Create a new bot.
    Bot {
        /// Bot name.
        #[arg(long)]
        name: Option<String>,

        /// Persona describing the bot's character.
        #[arg(long)]
        persona: Option<String>,
    },
}

#[derive(Debug, Subcommand)]
pub enum ListResource {
    /// List all bots.
    Bots,
}

#[derive(Debug, Subcommand)]
pub enum DeleteResource {
    /// Delete a bot and its conversation.
    Bot {
        /// Bot id, id prefix, or name.
        bot: String,

        /// Skip the confirmation prompt. Required with --json.
        #[arg(long, short)]
        force: bool,
    },
}

/// Start a cyan spinner with the given message.
pub(crate) fn spinner(message: impl Into<Cow<'static, str>>) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.cyan} {msg}") {
        spinner.set_style(style);
    }
    spinner.set_message(message);
    spinner.enable_steady_tick(Duration::from_millis(80));
    spinner
}

/// Creation time in the user's local timezone.
pub(crate) fn format_local_time(dt: &DateTime<Utc>) -> String {
    dt.with_timezone(&Local).format("%Y-%m-%d %H:%M").to_string()
}
