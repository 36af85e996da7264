//! personabot CLI entry point.
//!
//! Binary name: `pbot`
//!
//! Parses CLI arguments, sets up tracing, loads the bot store and dispatches
//! to the appropriate command handler.

mod cli;
mod state;

use clap::Parser;
use clap_complete::generate;

use personabot_observe::tracing_setup::{init_tracing, shutdown_tracing, verbosity_filter};

use cli::{Cli, Commands, CreateResource, DeleteResource, ListResource};
use state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    init_tracing(verbosity_filter(cli.verbose, cli.quiet), cli.otel)
        .map_err(|e| anyhow::anyhow!("Failed to initialize tracing: {e}"))?;

    let result = run(cli).await;
    shutdown_tracing();
    result
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    // Shell completions don't need app state
    if let Commands::Completions { shell } = &cli.command {
        let mut cmd = <Cli as clap::CommandFactory>::command();
        generate(*shell, &mut cmd, "pbot", &mut std::io::stdout());
        return Ok(());
    }

    let mut state = AppState::init(cli.api_base_url.clone()).await?;

    match cli.command {
        Commands::Create { resource } => match resource {
            CreateResource::Bot { name, persona } => {
                cli::bot::create_bot(&mut state, name, persona, cli.json).await?;
            }
        },

        Commands::New => {
            cli::wizard::run_new_wizard(&mut state).await?;
        }

        Commands::List { resource } => match resource {
            ListResource::Bots => {
                cli::bot::list_bots(&state, cli.json).await?;
            }
        },

        Commands::Show { bot } => {
            cli::bot::show_bot(&state, &bot, cli.json).await?;
        }

        Commands::Delete { resource } => match resource {
            DeleteResource::Bot { bot, force } => {
                cli::bot::delete_bot(&mut state, &bot, force, cli.json).await?;
            }
        },

        Commands::Chat { bot } => {
            cli::chat::loop_runner::run_chat_loop(&mut state, &bot).await?;
        }

        Commands::History { bot } => {
            cli::history::show_history(&state, &bot, cli.json).await?;
        }

        Commands::Audio { bot, message, out } => {
            cli::history::export_audio(&state, &bot, &message, &out, cli.json).await?;
        }

        Commands::Status => {
            cli::status::status(&state, cli.json).await?;
        }

        Commands::Completions { .. } => unreachable!("handled above"),
    }

    Ok(())
}
