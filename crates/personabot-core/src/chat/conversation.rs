//! Conversation flow for one open bot.
//!
//! `Idle -> Sending -> Idle`. A submitted prompt is shown immediately as an
//! optimistic user message. On success the reply is appended and the whole
//! exchange is committed to the bot store. On failure the optimistic message
//! is removed, the prompt goes back into the input buffer, and nothing is
//! persisted.

use personabot_types::bot::{Bot, BotId};
use personabot_types::chat::Message;
use personabot_types::error::{GenerateError, SendError};
use personabot_types::generate::{GenerateRequest, GenerateResponse};
use tracing::{Instrument, info, info_span, warn};

use crate::generate::GenerationClient;
use crate::storage::KeyValueStorage;
use crate::store::bot::BotStore;

/// Where the conversation is in its send cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConversationState {
    Idle,
    Sending,
}

/// A submitted prompt waiting for the endpoint.
#[derive(Debug, Clone)]
pub struct PendingTurn {
    pub request: GenerateRequest,
    /// The optimistic message shown while the request is in flight.
    pub user_message: Message,
}

/// View state for chatting with one bot.
pub struct Conversation {
    bot_id: BotId,
    bot_name: String,
    persona: String,
    messages: Vec<Message>,
    input: String,
    state: ConversationState,
}

impl Conversation {
    /// Open a conversation showing the bot's stored history.
    pub fn open(bot: &Bot) -> Self {
        Self {
            bot_id: bot.id.clone(),
            bot_name: bot.name.clone(),
            persona: bot.persona.clone(),
            messages: bot.messages.clone(),
            input: String::new(),
            state: ConversationState::Idle,
        }
    }

    pub fn bot_id(&self) -> &BotId {
        &self.bot_id
    }

    pub fn bot_name(&self) -> &str {
        &self.bot_name
    }

    pub fn persona(&self) -> &str {
        &self.persona
    }

    /// Messages as currently displayed, including an optimistic one while sending.
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn state(&self) -> ConversationState {
        self.state
    }

    pub fn is_sending(&self) -> bool {
        self.state == ConversationState::Sending
    }

    /// Current contents of the input buffer.
    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn set_input(&mut self, text: impl Into<String>) {
        self.input = text.into();
    }

    /// Submit the input buffer.
    ///
    /// Rejects blank input and any submit while a request is in flight,
    /// leaving all state untouched in both cases.
    pub fn submit(&mut self) -> Result<PendingTurn, SendError> {
        if self.is_sending() {
            return Err(SendError::AlreadySending);
        }
        if self.input.trim().is_empty() {
            return Err(SendError::EmptyPrompt);
        }

        let prompt = std::mem::take(&mut self.input);
        let user_message = Message::user(prompt.clone());
        self.messages.push(user_message.clone());
        self.state = ConversationState::Sending;

        Ok(PendingTurn {
            request: GenerateRequest {
                persona: self.persona.clone(),
                prompt,
            },
            user_message,
        })
    }

    /// Resolve a pending turn with the endpoint's result.
    ///
    /// Returns the bot reply on success. Any error leaves the message list
    /// exactly as it was before [`submit`](Self::submit) and restores the input.
    pub async fn complete<S: KeyValueStorage>(
        &mut self,
        store: &mut BotStore<S>,
        pending: PendingTurn,
        result: Result<GenerateResponse, GenerateError>,
    ) -> Result<Message, SendError> {
        let response = match result {
            Ok(response) => response,
            Err(err) => {
                warn!(bot_id = %self.bot_id, "Generation failed, rolling back: {err}");
                self.rollback(&pending);
                return Err(err.into());
            }
        };

        let reply = Message::bot(response.text, &response.audio_content);
        if let Err(err) = store
            .append_turn(&self.bot_id, pending.user_message.clone(), reply.clone())
            .await
        {
            warn!(bot_id = %self.bot_id, "Failed to save exchange, rolling back: {err}");
            self.rollback(&pending);
            return Err(err.into());
        }

        self.messages.push(reply.clone());
        self.state = ConversationState::Idle;
        info!(bot_id = %self.bot_id, messages = self.messages.len(), "Exchange saved");
        Ok(reply)
    }

    /// Submit `prompt`, make exactly one request, and resolve the turn.
    pub async fn send<S, C>(
        &mut self,
        store: &mut BotStore<S>,
        client: &C,
        prompt: impl Into<String>,
    ) -> Result<Message, SendError>
    where
        S: KeyValueStorage,
        C: GenerationClient,
    {
        if self.is_sending() {
            return Err(SendError::AlreadySending);
        }
        self.set_input(prompt);
        let pending = self.submit()?;

        let span = info_span!(
            "gen_ai.generate",
            gen_ai.agent.id = %self.bot_id,
            gen_ai.agent.name = %self.bot_name,
            server.address = client.endpoint(),
        );
        let result = client.generate(&pending.request).instrument(span).await;

        self.complete(store, pending, result).await
    }

    fn rollback(&mut self, pending: &PendingTurn) {
        if let Some(index) = self
            .messages
            .iter()
            .position(|m| m.id == pending.user_message.id)
        {
            self.messages.remove(index);
        }
        self.input = pending.request.prompt.clone();
        self.state = ConversationState::Idle;
    }
}
