//! Bot lifecycle CLI commands: create, list, show, delete.

use anyhow::{Result, bail};
use comfy_table::{Cell, Color, ContentArrangement, Table, presets};
use console::style;
use dialoguer::{Confirm, Input};

use personabot_types::bot::{Bot, CreateBotRequest};
use personabot_types::error::ValidationError;
use personabot_types::text::{capitalize, truncate_words};

use super::{format_local_time, spinner};
use crate::state::AppState;

/// Words of persona shown in the bot table.
const LIST_PERSONA_WORDS: usize = 3;

/// Create a new bot via interactive prompts or one-shot flags.
///
/// # Examples
///
/// ```bash
/// # Interactive
/// pbot create bot
///
/// # One-shot with flags
/// pbot create bot --name "Luna" --persona "Friendly assistant"
/// ```
pub async fn create_bot(
    state: &mut AppState,
    name: Option<String>,
    persona: Option<String>,
    json: bool,
) -> Result<()> {
    let request = prompt_bot_request(name, persona)?;
    let bot = save_bot(state, request).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&bot_summary(&bot))?);
        return Ok(());
    }

    print_created(state, &bot);
    Ok(())
}

/// Fill in missing fields interactively.
///
/// Blank answers are rejected inline and asked again. Values passed as flags
/// are taken as-is and validated by the store.
pub(crate) fn prompt_bot_request(
    name: Option<String>,
    persona: Option<String>,
) -> Result<CreateBotRequest> {
    let name = match name {
        Some(n) => n,
        None => Input::<String>::new()
            .with_prompt("Bot name")
            .validate_with(|input: &String| {
                if input.trim().is_empty() {
                    Err(ValidationError::EmptyName)
                } else {
                    Ok(())
                }
            })
            .interact_text()?,
    };

    let persona = match persona {
        Some(p) => p,
        None => Input::<String>::new()
            .with_prompt("Persona (e.g. \"A cheerful pirate who loves riddles\")")
            .validate_with(|input: &String| {
                if input.trim().is_empty() {
                    Err(ValidationError::EmptyPersona)
                } else {
                    Ok(())
                }
            })
            .interact_text()?,
    };

    Ok(CreateBotRequest::new(name, persona))
}

pub(crate) async fn save_bot(state: &mut AppState, request: CreateBotRequest) -> Result<Bot> {
    let spinner = spinner("Creating bot...");
    let result = state.store.create(request).await;
    spinner.finish_and_clear();
    Ok(result?)
}

pub(crate) fn print_created(state: &AppState, bot: &Bot) {
    println!();
    println!(
        "  {} Bot successfully created!",
        style("✓").green().bold()
    );
    println!();
    println!(
        "  {}     {}",
        style("Name:").bold(),
        style(capitalize(&bot.name)).cyan()
    );
    println!("  {}  {}", style("Persona:").bold(), &bot.persona);
    println!(
        "  {}       {}",
        style("ID:").bold(),
        style(bot.id.to_string()).dim()
    );
    if !state.is_durable() {
        println!();
        println!(
            "  {} Storage is unavailable, this bot will not be saved.",
            style("!").yellow().bold()
        );
    }
    println!();
    println!(
        "  Start chatting: {}",
        style(format!("pbot chat {}", bot.id.short())).yellow()
    );
    println!();
}

/// List all bots in a table.
pub async fn list_bots(state: &AppState, json: bool) -> Result<()> {
    let bots = state.store.list();

    if json {
        let summaries: Vec<_> = bots.iter().map(bot_summary).collect();
        println!("{}", serde_json::to_string_pretty(&summaries)?);
        return Ok(());
    }

    if bots.is_empty() {
        println!();
        println!(
            "  {} No bots found. Create one with: {}",
            style("i").blue().bold(),
            style("pbot create bot").yellow()
        );
        println!();
        return Ok(());
    }

    let mut table = Table::new();
    table.load_preset(presets::UTF8_FULL_CONDENSED);
    table.set_content_arrangement(ContentArrangement::Dynamic);

    table.set_header(vec![
        Cell::new("Name").fg(Color::White),
        Cell::new("Persona").fg(Color::White),
        Cell::new("Created").fg(Color::White),
        Cell::new("Messages").fg(Color::White),
        Cell::new("ID").fg(Color::White),
    ]);

    for bot in bots {
        table.add_row(vec![
            Cell::new(capitalize(&bot.name)).fg(Color::Cyan),
            Cell::new(truncate_words(&bot.persona, LIST_PERSONA_WORDS)),
            Cell::new(format_local_time(&bot.created_at)),
            Cell::new(bot.messages.len()),
            Cell::new(bot.id.short()).fg(Color::DarkGrey),
        ]);
    }

    println!();
    println!("{table}");
    println!();
    println!(
        "  {} bot{}",
        style(bots.len()).bold(),
        if bots.len() == 1 { "" } else { "s" }
    );
    println!();

    Ok(())
}

/// Show the details of one bot.
pub async fn show_bot(state: &AppState, selector: &str, json: bool) -> Result<()> {
    let bot = state.store.resolve(selector)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&bot_summary(bot))?);
        return Ok(());
    }

    println!();
    println!("  {}", style(capitalize(&bot.name)).cyan().bold());
    println!();
    println!("  {}  {}", style("Persona:").bold(), &bot.persona);
    println!(
        "  {}  {}",
        style("Created:").bold(),
        format_local_time(&bot.created_at)
    );
    println!("  {} {}", style("Messages:").bold(), bot.messages.len());
    println!(
        "  {}       {}",
        style("ID:").bold(),
        style(bot.id.to_string()).dim()
    );
    println!();

    Ok(())
}

/// Delete a bot after confirmation.
pub async fn delete_bot(state: &mut AppState, selector: &str, force: bool, json: bool) -> Result<()> {
    let bot = state.store.resolve(selector)?;
    let id = bot.id.clone();

    if needs_confirmation(force, json)? {
        let confirmed = Confirm::new()
            .with_prompt(
                "Are you sure you want to delete this bot? This action cannot be undone.",
            )
            .default(false)
            .interact()?;

        if !confirmed {
            println!("  Cancelled.");
            return Ok(());
        }
    }

    state.store.delete(&id).await?;

    if json {
        println!(
            "{}",
            serde_json::json!({"deleted": true, "id": id.to_string()})
        );
    } else {
        println!(
            "  {} Bot deleted successfully.",
            style("✓").red().bold()
        );
    }

    Ok(())
}

/// Whether deletion must be confirmed interactively.
///
/// `--json` output is meant for scripts, which cannot answer a prompt, so it
/// only deletes together with `--force`.
fn needs_confirmation(force: bool, json: bool) -> Result<bool> {
    if force {
        return Ok(false);
    }
    if json {
        bail!("--json cannot prompt for confirmation; pass --force to delete");
    }
    Ok(true)
}

/// JSON view of a bot without its (potentially large) message bodies.
fn bot_summary(bot: &Bot) -> serde_json::Value {
    serde_json::json!({
        "id": bot.id.to_string(),
        "name": bot.name,
        "persona": bot.persona,
        "createdAt": bot.created_at,
        "messageCount": bot.messages.len(),
    })
}
