//! Chat header and error banner.

use console::style;

use personabot_types::error::{GenerateError, SendError};
use personabot_types::text::{capitalize, truncate_words};

/// Words of persona shown under the bot name.
const HEADER_PERSONA_WORDS: usize = 10;

/// Print the header at the start of a chat session.
pub fn print_welcome_banner(name: &str, persona: &str, endpoint: &str, durable: bool) {
    println!();
    println!("  {} {}", style("*").cyan(), style(capitalize(name)).cyan().bold());
    println!("  {}", style(truncate_words(persona, HEADER_PERSONA_WORDS)).dim());
    println!();
    println!("  {}  {}", style("Endpoint:").bold(), style(endpoint).dim());
    if !durable {
        println!(
            "  {} {}",
            style("!").yellow().bold(),
            style("Storage is unavailable, this conversation will not be saved.").yellow()
        );
    }
    println!();
    println!(
        "  {}",
        style("Type /help for commands, Ctrl+D to exit").dim()
    );
    println!("  {}", style("---").dim());
    println!();
}

/// Print a failed send. The prompt itself is restored by the caller.
pub fn print_send_error(err: &SendError) {
    eprintln!();
    eprintln!(
        "  {} {}",
        style("!").red().bold(),
        style(describe_send_error(err)).red()
    );
    eprintln!(
        "  {}",
        style("Your message was not sent. Press Up to edit it and try again.").dim()
    );
    eprintln!();
}

fn describe_send_error(err: &SendError) -> String {
    match err {
        SendError::Generate(GenerateError::Transport(_)) => {
            format!("Could not reach the generation service: {err}")
        }
        SendError::Generate(_) => format!("The generation service failed: {err}"),
        SendError::Store(_) => format!("Could not save the conversation: {err}"),
        SendError::EmptyPrompt | SendError::AlreadySending => err.to_string(),
    }
}
