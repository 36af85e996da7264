//! Conversation history and reply audio export.

use std::path::Path;

use anyhow::{Context, Result, bail};
use console::style;

use personabot_types::bot::Bot;
use personabot_types::chat::{Message, Sender, decode_audio_data_uri};
use personabot_types::error::AudioError;
use personabot_types::text::capitalize;

use crate::state::AppState;

/// Print a bot's conversation, oldest first.
pub async fn show_history(state: &AppState, selector: &str, json: bool) -> Result<()> {
    let bot = state.store.resolve(selector)?;

    if json {
        let messages: Vec<_> = bot.messages.iter().map(message_summary).collect();
        println!("{}", serde_json::to_string_pretty(&messages)?);
        return Ok(());
    }

    println!();
    if bot.messages.is_empty() {
        println!(
            "  {} No messages yet. Start with: {}",
            style("i").blue().bold(),
            style(format!("pbot chat {}", bot.id.short())).yellow()
        );
        println!();
        return Ok(());
    }

    for message in &bot.messages {
        print_message(&bot.name, message);
    }
    println!();
    Ok(())
}

/// Print one message as a chat line. Bot replies show their id for `pbot audio`.
pub(crate) fn print_message(bot_name: &str, message: &Message) {
    match message.sender {
        Sender::User => {
            println!("  {} {}", style("You >").green().bold(), message.text);
        }
        Sender::Bot => {
            println!(
                "  {} {}",
                style(format!("{} >", capitalize(bot_name))).cyan().bold(),
                message.text
            );
            if message.audio_url.is_some() {
                println!(
                    "  {}",
                    style(format!("audio: {}", message.id)).dim()
                );
            }
        }
    }
}

/// Decode the audio of one bot reply and write it to `out`.
pub async fn export_audio(
    state: &AppState,
    selector: &str,
    message_selector: &str,
    out: &Path,
    json: bool,
) -> Result<()> {
    let bot = state.store.resolve(selector)?;
    let (message, bytes) = export_reply_audio(bot, message_selector, out).await?;

    if json {
        println!(
            "{}",
            serde_json::json!({
                "messageId": message.id.to_string(),
                "path": out.display().to_string(),
                "bytes": bytes,
            })
        );
    } else {
        println!(
            "  {} Saved {} bytes of audio to {}",
            style("✓").green().bold(),
            bytes,
            style(out.display()).cyan()
        );
    }
    Ok(())
}

/// Write the decoded audio of the selected reply to `out`.
///
/// Returns the reply and the number of bytes written.
async fn export_reply_audio<'a>(
    bot: &'a Bot,
    message_selector: &str,
    out: &Path,
) -> Result<(&'a Message, usize)> {
    let message = find_reply(bot, message_selector)?;

    let uri = message.audio_url.as_deref().ok_or(AudioError::Missing)?;
    let bytes = decode_audio_data_uri(uri)?;
    tokio::fs::write(out, &bytes)
        .await
        .with_context(|| format!("failed to write {}", out.display()))?;

    tracing::debug!(message_id = %message.id, bytes = bytes.len(), path = %out.display(), "Audio exported");
    Ok((message, bytes.len()))
}

/// Find a bot reply by full id or unique id prefix.
fn find_reply<'a>(bot: &'a Bot, selector: &str) -> Result<&'a Message> {
    let needle = selector.trim().to_lowercase();
    if needle.is_empty() {
        bail!("message id cannot be empty");
    }

    let matches: Vec<&Message> = bot
        .messages
        .iter()
        .filter(|m| m.sender == Sender::Bot)
        .filter(|m| m.id.to_string().starts_with(&needle))
        .collect();

    match matches.as_slice() {
        [message] => Ok(*message),
        [] => bail!("no reply from {} matches '{selector}'", capitalize(&bot.name)),
        _ => bail!(
            "'{selector}' matches {} replies, use a longer id",
            matches.len()
        ),
    }
}

fn message_summary(message: &Message) -> serde_json::Value {
    serde_json::json!({
        "id": message.id.to_string(),
        "sender": message.sender,
        "text": message.text,
        "hasAudio": message.audio_url.is_some(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use personabot_types::bot::CreateBotRequest;

    fn luna_with_replies() -> Bot {
        let mut bot = Bot::new(CreateBotRequest::new("Luna", "Friendly assistant")).unwrap();
        bot.messages.push(Message::user("Hi"));
        bot.messages.push(Message::bot("Hello!", "AAA="));
        bot.messages.push(Message::user("How are you?"));
        bot.messages.push(Message::bot("Great.", "AAE="));
        bot
    }

    #[test]
    fn test_find_reply_by_full_id() {
        let bot = luna_with_replies();
        let id = bot.messages[3].id.to_string();
        assert_eq!(find_reply(&bot, &id).unwrap().text, "Great.");
    }

    #[test]
    fn test_find_reply_is_case_insensitive() {
        let bot = luna_with_replies();
        let id = bot.messages[1].id.to_string().to_uppercase();
        assert_eq!(find_reply(&bot, &id).unwrap().text, "Hello!");
    }

    #[test]
    fn test_find_reply_ignores_user_messages() {
        let bot = luna_with_replies();
        let user_id = bot.messages[0].id.to_string();
        assert!(find_reply(&bot, &user_id).is_err());
    }

    #[test]
    fn test_find_reply_ambiguous_prefix() {
        let bot = luna_with_replies();
        // Both replies are UUID v7 ids created in the same instant.
        let err = find_reply(&bot, &bot.messages[1].id.to_string()[..4]).unwrap_err();
        assert!(err.to_string().contains("matches 2 replies"));
    }

    #[test]
    fn test_find_reply_blank() {
        let bot = luna_with_replies();
        assert!(find_reply(&bot, "  ").is_err());
    }

    #[test]
    fn test_message_summary_hides_audio_payload() {
        let summary = message_summary(&Message::bot("Hello!", "AAA="));
        assert_eq!(summary["sender"], "bot");
        assert_eq!(summary["hasAudio"], true);
        assert!(summary.get("audioUrl").is_none());
    }

    #[tokio::test]
    async fn test_export_reply_audio_writes_decoded_bytes() {
        let bot = luna_with_replies();
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("reply.mp3");

        let (message, written) =
            export_reply_audio(&bot, &bot.messages[3].id.to_string(), &out).await.unwrap();

        assert_eq!(message.text, "Great.");
        assert_eq!(written, 2);
        assert_eq!(tokio::fs::read(&out).await.unwrap(), vec![0u8, 1]);
    }

    #[tokio::test]
    async fn test_export_reply_audio_without_audio_writes_nothing() {
        let mut bot = luna_with_replies();
        bot.messages[1].audio_url = None;
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("reply.mp3");

        let err = export_reply_audio(&bot, &bot.messages[1].id.to_string(), &out)
            .await
            .unwrap_err();

        assert!(matches!(err.downcast_ref::<AudioError>(), Some(AudioError::Missing)));
        assert!(!out.exists());
    }

    #[tokio::test]
    async fn test_export_reply_audio_unwritable_path() {
        let bot = luna_with_replies();
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("missing").join("reply.mp3");

        let err = export_reply_audio(&bot, &bot.messages[1].id.to_string(), &out)
            .await
            .unwrap_err();
        assert!(err.to_string().contains("failed to write"));
    }
}
