//! HttpGenerationClient -- concrete [`GenerationClient`] over reqwest.
//!
//! Sends `POST {base_url}/generate` with a JSON `{persona, prompt}` body and
//! expects a 2xx JSON `{text, audioContent}` reply. Any other status, a
//! transport failure, or a body missing either field is an error. No timeout
//! is configured: a slow endpoint keeps the caller waiting.

use personabot_core::generate::GenerationClient;
use personabot_types::config::AppConfig;
use personabot_types::error::GenerateError;
use personabot_types::generate::{GenerateRequest, GenerateResponse, RawGenerateResponse};

/// Maximum number of error-body characters kept in [`GenerateError::Status`].
const MAX_ERROR_BODY: usize = 512;

pub struct HttpGenerationClient {
    client: reqwest::Client,
    url: String,
}

impl HttpGenerationClient {
    /// Create a client for the endpoint configured in `config`.
    pub fn new(config: &AppConfig) -> Result<Self, GenerateError> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("personabot/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| GenerateError::Transport(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            url: config.generate_url(),
        })
    }

    /// The full URL requests are sent to.
    pub fn url(&self) -> &str {
        &self.url
    }
}

impl GenerationClient for HttpGenerationClient {
    fn endpoint(&self) -> &str {
        &self.url
    }

    async fn generate(&self, request: &GenerateRequest) -> Result<GenerateResponse, GenerateError> {
        tracing::debug!(url = %self.url, prompt_len = request.prompt.len(), "Sending generate request");

        let response = self
            .client
            .post(&self.url)
            .json(request)
            .send()
            .await
            .map_err(|e| GenerateError::Transport(format!("HTTP request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body: String = response
                .text()
                .await
                .unwrap_or_default()
                .chars()
                .take(MAX_ERROR_BODY)
                .collect();
            return Err(GenerateError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| GenerateError::Transport(format!("failed to read response: {e}")))?;
        let raw: RawGenerateResponse = serde_json::from_str(&body)
            .map_err(|e| GenerateError::Malformed(format!("failed to parse response: {e}")))?;

        let parsed = GenerateResponse::try_from(raw)?;
        tracing::debug!(
            text_len = parsed.text.len(),
            audio_len = parsed.audio_content.len(),
            "Generate request succeeded"
        );
        Ok(parsed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer) -> HttpGenerationClient {
        let config = AppConfig {
            api_base_url: server.uri(),
            ..Default::default()
        };
        HttpGenerationClient::new(&config).unwrap()
    }

    fn luna_request() -> GenerateRequest {
        GenerateRequest {
            persona: "Friendly assistant".to_string(),
            prompt: "Hi".to_string(),
        }
    }

    #[tokio::test]
    async fn test_generate_success() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/generate"))
            .and(header("content-type", "application/json"))
            .and(body_json(json!({"persona": "Friendly assistant", "prompt": "Hi"})))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"text": "Hello!", "audioContent": "AAA="})),
            )
            .expect(1)
            .mount(&server)
            .await;

        let resp = client_for(&server).generate(&luna_request()).await.unwrap();
        assert_eq!(resp.text, "Hello!");
        assert_eq!(resp.audio_content, "AAA=");
    }

    #[tokio::test]
    async fn test_generate_non_2xx_is_status_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/generate"))
            .respond_with(ResponseTemplate::new(503).set_body_string("overloaded"))
            .mount(&server)
            .await;

        let err = client_for(&server).generate(&luna_request()).await.unwrap_err();
        match err {
            GenerateError::Status { status, body } => {
                assert_eq!(status, 503);
                assert_eq!(body, "overloaded");
            }
            other => panic!("expected status error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_generate_missing_field_is_malformed() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/generate"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"text": "Hello!"})))
            .mount(&server)
            .await;

        let err = client_for(&server).generate(&luna_request()).await.unwrap_err();
        assert!(matches!(err, GenerateError::Malformed(_)));
    }

    #[tokio::test]
    async fn test_generate_non_json_is_malformed() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/generate"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
            .mount(&server)
            .await;

        let err = client_for(&server).generate(&luna_request()).await.unwrap_err();
        assert!(matches!(err, GenerateError::Malformed(_)));
    }

    #[tokio::test]
    async fn test_generate_unreachable_is_transport() {
        let config = AppConfig {
            api_base_url: "http://127.0.0.1:1".to_string(),
            ..Default::default()
        };
        let client = HttpGenerationClient::new(&config).unwrap();

        let err = client.generate(&luna_request()).await.unwrap_err();
        assert!(matches!(err, GenerateError::Transport(_)));
    }

    #[test]
    fn test_url_joins_base_and_path() {
        let config = AppConfig {
            api_base_url: "https://tts.example.com/".to_string(),
            ..Default::default()
        };
        let client = HttpGenerationClient::new(&config).unwrap();
        assert_eq!(client.url(), "https://tts.example.com/generate");
    }
}
