//! Main chat loop orchestration.
//!
//! Resolves the bot, prints its header and history, then runs the
//! read-send-print cycle until the user exits. Each prompt makes exactly one
//! generation request; a failure leaves the conversation as it was.

use console::style;
use tracing::info;

use personabot_core::chat::conversation::Conversation;
use personabot_types::text::capitalize;

use crate::cli::history::print_message;
use crate::cli::spinner;
use crate::state::AppState;

use super::banner::{print_send_error, print_welcome_banner};
use super::commands::{self, ChatCommand};
use super::input::{ChatInput, InputEvent};

/// Run the interactive chat loop for a bot.
pub async fn run_chat_loop(state: &mut AppState, selector: &str) -> anyhow::Result<()> {
    let bot = state.store.resolve(selector)?;
    let mut conversation = Conversation::open(bot);
    let display_name = capitalize(conversation.bot_name());

    print_welcome_banner(
        conversation.bot_name(),
        conversation.persona(),
        state.client.url(),
        state.is_durable(),
    );
    for message in conversation.messages() {
        print_message(conversation.bot_name(), message);
    }
    if !conversation.messages().is_empty() {
        println!();
    }

    info!(bot_id = %conversation.bot_id(), history = conversation.messages().len(), "Chat session started");

    let prompt = format!("  {} ", style("You >").green().bold());
    let (mut chat_input, _writer) = ChatInput::new(prompt)
        .map_err(|e| anyhow::anyhow!("Failed to initialize input: {e}"))?;

    loop {
        let text = match chat_input.read_line().await {
            InputEvent::Eof => {
                println!("\n  {}", style("Session ended.").dim());
                break;
            }
            InputEvent::Interrupted => {
                println!("\n  {}", style("Press Ctrl+D to exit, or keep chatting.").dim());
                continue;
            }
            InputEvent::Message(text) => text,
        };

        if text.is_empty() {
            continue;
        }

        if let Some(cmd) = commands::parse(&text) {
            match cmd {
                ChatCommand::Help => commands::print_help(),
                ChatCommand::Clear => chat_input.clear(),
                ChatCommand::Exit => {
                    println!("\n  {}", style("Session ended.").dim());
                    break;
                }
                ChatCommand::History => {
                    println!();
                    for message in conversation.messages() {
                        print_message(conversation.bot_name(), message);
                    }
                    println!();
                }
                ChatCommand::Unknown(name) => {
                    println!(
                        "\n  {} Unknown command: {}. Type /help for available commands.\n",
                        style("?").yellow().bold(),
                        style(name).dim()
                    );
                }
            }
            continue;
        }

        let spinner = spinner(format!("{display_name} is thinking..."));
        let result = conversation
            .send(&mut state.store, &state.client, text)
            .await;
        spinner.finish_and_clear();

        match result {
            Ok(reply) => {
                println!();
                print_message(conversation.bot_name(), &reply);
                println!();
            }
            Err(err) => {
                print_send_error(&err);
                chat_input.remember(conversation.input());
            }
        }
    }

    info!(bot_id = %conversation.bot_id(), messages = conversation.messages().len(), "Chat session ended");
    Ok(())
}
