//! GenerationClient trait definition.
//!
//! The generation endpoint turns a persona and a prompt into reply text plus
//! base64 speech audio. The reqwest implementation lives in personabot-infra.

use personabot_types::error::GenerateError;
use personabot_types::generate::{GenerateRequest, GenerateResponse};

/// Trait for text-and-speech generation backends.
///
/// Implementations must return `Ok` only for a validated response (both
/// `text` and `audio_content` present). One call is one attempt: no retry.
pub trait GenerationClient: Send + Sync {
    /// Endpoint description for logs and status output.
    fn endpoint(&self) -> &str;

    /// Send one request and wait for the reply.
    fn generate(
        &self,
        request: &GenerateRequest,
    ) -> impl std::future::Future<Output = Result<GenerateResponse, GenerateError>> + Send;
}
