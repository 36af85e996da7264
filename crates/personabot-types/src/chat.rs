//! Conversation message types.
//!
//! A bot's conversation is an ordered list of [`Message`]s. Bot replies carry
//! their synthesized speech inline as a base64 data URI.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use std::fmt;
use std::str::FromStr;

use crate::error::AudioError;

/// Prefix for audio returned by the generation endpoint.
pub const AUDIO_DATA_URI_PREFIX: &str = "data:audio/mpeg;base64,";

/// Unique identifier for a message (UUID v7).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MessageId(pub Uuid);

impl MessageId {
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }
}

impl Default for MessageId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for MessageId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

/// Who authored a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    Bot,
}

impl fmt::Display for Sender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Sender::User => write!(f, "user"),
            Sender::Bot => write!(f, "bot"),
        }
    }
}

/// A single message in a bot's conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub id: MessageId,
    pub sender: Sender,
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audio_url: Option<String>,
}

impl Message {
    /// A message typed by the user.
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            id: MessageId::new(),
            sender: Sender::User,
            text: text.into(),
            audio_url: None,
        }
    }

    /// A bot reply with its speech wrapped into a data URI.
    pub fn bot(text: impl Into<String>, audio_content: &str) -> Self {
        Self {
            id: MessageId::new(),
            sender: Sender::Bot,
            text: text.into(),
            audio_url: Some(audio_data_uri(audio_content)),
        }
    }
}

/// Wrap base64 audio content into a playable data URI.
pub fn audio_data_uri(audio_content: &str) -> String {
    format!("{AUDIO_DATA_URI_PREFIX}{audio_content}")
}

/// Decode the audio bytes held by a data URI produced by [`audio_data_uri`].
pub fn decode_audio_data_uri(uri: &str) -> Result<Vec<u8>, AudioError> {
    let payload = uri
        .strip_prefix(AUDIO_DATA_URI_PREFIX)
        .ok_or(AudioError::NotADataUri)?;
    STANDARD
        .decode(payload)
        .map_err(|e| AudioError::InvalidBase64(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bot_message_wraps_audio() {
        let msg = Message::bot("Hello!", "AAA=");
        assert_eq!(msg.sender, Sender::Bot);
        assert_eq!(msg.audio_url.as_deref(), Some("data:audio/mpeg;base64,AAA="));
    }

    #[test]
    fn test_user_message_has_no_audio() {
        let msg = Message::user("Hi");
        assert_eq!(msg.sender, Sender::User);
        assert!(msg.audio_url.is_none());
    }

    #[test]
    fn test_message_ids_unique() {
        let a = Message::user("a");
        let b = Message::user("a");
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_sender_serde() {
        assert_eq!(serde_json::to_string(&Sender::User).unwrap(), "\"user\"");
        assert_eq!(serde_json::to_string(&Sender::Bot).unwrap(), "\"bot\"");
    }

    #[test]
    fn test_user_message_omits_audio_url() {
        let json = serde_json::to_value(Message::user("Hi")).unwrap();
        assert!(json.get("audioUrl").is_none());

        let json = serde_json::to_value(Message::bot("Hello!", "AAA=")).unwrap();
        assert_eq!(json["audioUrl"], "data:audio/mpeg;base64,AAA=");
    }

    #[test]
    fn test_decode_audio_data_uri() {
        let bytes = decode_audio_data_uri("data:audio/mpeg;base64,AAA=").unwrap();
        assert_eq!(bytes, vec![0, 0]);
    }

    #[test]
    fn test_decode_rejects_other_uris() {
        let err = decode_audio_data_uri("https://example.com/a.mp3").unwrap_err();
        assert!(matches!(err, AudioError::NotADataUri));

        let err = decode_audio_data_uri("data:audio/mpeg;base64,!!!").unwrap_err();
        assert!(matches!(err, AudioError::InvalidBase64(_)));
    }
}
