use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use std::fmt;
use std::str::FromStr;

use crate::chat::Message;
use crate::error::ValidationError;

/// Unique identifier for a bot, wrapping a UUID v7 (time-sortable).
///
/// Serialized as a plain string so persisted records stay readable.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BotId(pub Uuid);

impl BotId {
    /// Create a new BotId using UUID v7 (time-sortable, guaranteed ordering).
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    /// First eight hex characters, used in listings.
    pub fn short(&self) -> String {
        self.0.simple().to_string()[..8].to_string()
    }
}

impl Default for BotId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for BotId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for BotId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

/// A persona bot.
///
/// The persona text is sent to the generation endpoint with every prompt.
/// `messages` is the full conversation in insertion order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bot {
    pub id: BotId,
    pub name: String,
    pub persona: String,
    pub created_at: DateTime<Utc>,
    /// Absent in records written before history was persisted.
    #[serde(default)]
    pub messages: Vec<Message>,
}

impl Bot {
    /// Build a new bot from a validated request.
    pub fn new(request: CreateBotRequest) -> Result<Self, ValidationError> {
        let (name, persona) = request.validate()?;
        Ok(Self {
            id: BotId::new(),
            name,
            persona,
            created_at: Utc::now(),
            messages: Vec::new(),
        })
    }
}

/// Request to create a new bot. Both fields are required.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateBotRequest {
    pub name: String,
    pub persona: String,
}

impl CreateBotRequest {
    pub fn new(name: impl Into<String>, persona: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            persona: persona.into(),
        }
    }

    /// Trim both fields and reject blanks. The name is checked first.
    pub fn validate(&self) -> Result<(String, String), ValidationError> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(ValidationError::EmptyName);
        }
        let persona = self.persona.trim();
        if persona.is_empty() {
            return Err(ValidationError::EmptyPersona);
        }
        Ok((name.to_string(), persona.to_string()))
    }
}
