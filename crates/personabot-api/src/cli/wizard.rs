//! Guided setup (`pbot new`): create a bot, review it, then chat.
//!
//! The wizard moves through three steps. Declining to chat at the second
//! step ends the wizard with the bot saved.

use anyhow::Result;
use console::style;
use dialoguer::Confirm;

use personabot_types::bot::BotId;
use personabot_types::text::capitalize;

use super::bot::{print_created, prompt_bot_request, save_bot};
use super::chat::loop_runner::run_chat_loop;
use crate::state::AppState;

/// Where the wizard currently is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WizardStep {
    /// Ask for a name and persona.
    CreatePersona,
    /// Show the new bot and offer to start chatting.
    PersonaCreated(BotId),
    /// Hand over to the chat loop.
    Chatting(BotId),
    Done,
}

impl WizardStep {
    /// Step after the "start chatting?" question.
    fn after_confirm(id: BotId, start_chat: bool) -> Self {
        if start_chat {
            WizardStep::Chatting(id)
        } else {
            WizardStep::Done
        }
    }

    fn heading(&self) -> Option<(u8, &'static str)> {
        match self {
            WizardStep::CreatePersona => Some((1, "Describe your bot")),
            WizardStep::PersonaCreated(_) => Some((2, "Meet your bot")),
            WizardStep::Chatting(_) => Some((3, "Chat")),
            WizardStep::Done => None,
        }
    }
}

/// Run the wizard to completion.
pub async fn run_new_wizard(state: &mut AppState) -> Result<()> {
    let mut step = WizardStep::CreatePersona;

    loop {
        if let Some((number, title)) = step.heading() {
            println!();
            println!(
                "  {} {}",
                style(format!("Step {number}/3")).cyan().bold(),
                style(title).bold()
            );
            println!();
        }

        step = match step {
            WizardStep::CreatePersona => {
                let request = prompt_bot_request(None, None)?;
                let bot = save_bot(state, request).await?;
                print_created(state, &bot);
                WizardStep::PersonaCreated(bot.id)
            }
            WizardStep::PersonaCreated(id) => {
                let name = state
                    .store
                    .get(&id)
                    .map(|b| capitalize(&b.name))
                    .unwrap_or_default();
                let start_chat = Confirm::new()
                    .with_prompt(format!("Start chatting with {name} now?"))
                    .default(true)
                    .interact()?;
                if !start_chat {
                    println!(
                        "  Chat later with: {}",
                        style(format!("pbot chat {}", id.short())).yellow()
                    );
                    println!();
                }
                WizardStep::after_confirm(id, start_chat)
            }
            WizardStep::Chatting(id) => {
                run_chat_loop(state, &id.to_string()).await?;
                WizardStep::Done
            }
            WizardStep::Done => return Ok(()),
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_confirm_moves_to_chatting() {
        let id = BotId::new();
        assert_eq!(
            WizardStep::after_confirm(id.clone(), true),
            WizardStep::Chatting(id)
        );
    }

    #[test]
    fn test_decline_finishes() {
        assert_eq!(WizardStep::after_confirm(BotId::new(), false), WizardStep::Done);
    }

    #[test]
    fn test_headings_are_numbered_in_order() {
        let id = BotId::new();
        let numbers: Vec<u8> = [
            WizardStep::CreatePersona,
            WizardStep::PersonaCreated(id.clone()),
            WizardStep::Chatting(id),
        ]
        .iter()
        .filter_map(|s| s.heading().map(|(n, _)| n))
        .collect();
        assert_eq!(numbers, vec![1, 2, 3]);
        assert!(WizardStep::Done.heading().is_none());
    }
}
