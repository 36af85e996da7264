//! Wire types for the text-and-speech generation endpoint.
//!
//! `POST {base_url}/generate` takes `{persona, prompt}` and answers with
//! `{text, audioContent}` where `audioContent` is base64 audio.

use serde::{Deserialize, Serialize};

use crate::error::GenerateError;

/// Path appended to the configured base URL.
pub const GENERATE_PATH: &str = "/generate";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerateRequest {
    pub persona: String,
    pub prompt: String,
}

/// A validated endpoint reply. Both fields are non-empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateResponse {
    pub text: String,
    pub audio_content: String,
}

/// Raw endpoint body. Fields may be missing or null on a misbehaving server.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawGenerateResponse {
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub audio_content: Option<String>,
}

impl TryFrom<RawGenerateResponse> for GenerateResponse {
    type Error = GenerateError;

    fn try_from(raw: RawGenerateResponse) -> Result<Self, Self::Error> {
        let text = raw
            .text
            .filter(|t| !t.is_empty())
            .ok_or_else(|| GenerateError::Malformed("missing `text`".to_string()))?;
        let audio_content = raw
            .audio_content
            .filter(|a| !a.is_empty())
            .ok_or_else(|| GenerateError::Malformed("missing `audioContent`".to_string()))?;
        Ok(Self {
            text,
            audio_content,
        })
    }
}
