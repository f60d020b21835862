//! Client for OpenAI-style chat-completion endpoints.
//!
//! Sends the screenshot via data URL in the user message content array, the
//! way LM Studio and other local servers expect vision input.

use super::provider::{ModelQuery, VisionModel};
use crate::config::ModelConfig;
use crate::error::ModelError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};

/// Chat-completions backend talking to a locally hosted model.
pub struct ChatCompletionsClient {
    endpoint: String,
    model: String,
    client: reqwest::Client,
    timeout: Duration,
}

impl ChatCompletionsClient {
    pub fn new(config: &ModelConfig) -> Self {
        Self {
            endpoint: config.endpoint.clone(),
            model: config.name.clone(),
            client: reqwest::Client::new(),
            timeout: config.timeout(),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Sibling `/models` listing used for availability checks.
    fn models_url(&self) -> Option<String> {
        self.endpoint
            .trim_end_matches('/')
            .strip_suffix("/chat/completions")
            .map(|base| format!("{base}/models"))
    }
}

// --- Request types ---

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage>,
    temperature: f32,
}

#[derive(Serialize)]
struct ChatMessage {
    role: &'static str,
    content: MessageContent,
}

#[derive(Serialize)]
#[serde(untagged)]
enum MessageContent {
    Text(String),
    Parts(Vec<ChatContent>),
}

#[derive(Serialize)]
#[serde(tag = "type")]
enum ChatContent {
    #[serde(rename = "text")]
    Text { text: String },
    #[serde(rename = "image_url")]
    ImageUrl { image_url: ImageUrl },
}

#[derive(Serialize)]
struct ImageUrl {
    url: String,
}

// --- Response types ---

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Option<Vec<Choice>>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

fn build_request<'a>(model: &'a str, query: &ModelQuery) -> ChatRequest<'a> {
    ChatRequest {
        model,
        temperature: query.temperature,
        messages: vec![
            ChatMessage {
                role: "system",
                content: MessageContent::Text(query.system_prompt.clone()),
            },
            ChatMessage {
                role: "user",
                content: MessageContent::Parts(vec![
                    ChatContent::ImageUrl {
                        image_url: ImageUrl {
                            url: query.image.data_url(),
                        },
                    },
                    ChatContent::Text {
                        text: query.user_prompt.clone(),
                    },
                ]),
            },
        ],
    }
}

/// Pull the first choice's text out of a raw response body.
///
/// The status code is not consulted: an error body without
/// `choices` ends up as [`ModelError::NoChoices`].
fn extract_answer(body: &[u8]) -> Result<String, ModelError> {
    let chat_resp: ChatResponse = serde_json::from_slice(body)?;

    let choice = chat_resp
        .choices
        .and_then(|choices| choices.into_iter().next())
        .ok_or(ModelError::NoChoices)?;

    let text = choice.message.content.ok_or_else(|| ModelError::Parse {
        message: "first choice has no message content".to_string(),
    })?;

    Ok(text.trim().to_string())
}

#[async_trait]
impl VisionModel for ChatCompletionsClient {
    fn name(&self) -> &str {
        "chat-completions"
    }

    async fn is_available(&self) -> bool {
        let url = self.models_url().unwrap_or_else(|| self.endpoint.clone());
        match self
            .client
            .get(&url)
            .timeout(Duration::from_secs(5))
            .send()
            .await
        {
            Ok(resp) => resp.status().is_success(),
            Err(e) => {
                tracing::debug!("Availability check against {url} failed: {e}");
                false
            }
        }
    }

    async fn complete(&self, query: &ModelQuery) -> Result<String, ModelError> {
        let start = Instant::now();
        let body = build_request(&self.model, query);

        let resp = self
            .client
            .post(&self.endpoint)
            .json(&body)
            .timeout(self.timeout())
            .send()
            .await?;

        let status = resp.status();
        let bytes = resp.bytes().await?;
        if !status.is_success() {
            tracing::warn!(
                "Model endpoint answered HTTP {status}: {}",
                String::from_utf8_lossy(&bytes)
            );
        }

        let answer = extract_answer(&bytes)?;
        tracing::debug!(
            model = %self.model,
            latency_ms = start.elapsed().as_millis() as u64,
            "Model answered"
        );
        Ok(answer)
    }

    fn timeout(&self) -> Duration {
        self.timeout
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::provider::Screenshot;
    use mockito::{Matcher, Server};
    use serde_json::json;

    const CHAT_PATH: &str = "/v1/chat/completions";

    fn client_for(url: &str) -> ChatCompletionsClient {
        ChatCompletionsClient::new(&ModelConfig {
            endpoint: url.to_string(),
            timeout_ms: 2_000,
            ..ModelConfig::default()
        })
    }

    fn sample_query() -> ModelQuery {
        ModelQuery::off_task_rating(Screenshot::parse("aGVsbG8=").unwrap(), "study", 0.5)
    }

    #[test]
    fn test_request_shape() {
        let body = serde_json::to_value(build_request("Qwen-2.5-VL", &sample_query())).unwrap();
        assert_eq!(body["model"], "Qwen-2.5-VL");
        assert_eq!(body["temperature"], 0.5);
        assert_eq!(body["messages"][0]["role"], "system");
        assert_eq!(
            body["messages"][0]["content"],
            "You are an AI that analyzes browser activity based on screenshots."
        );
        let parts = &body["messages"][1]["content"];
        assert_eq!(body["messages"][1]["role"], "user");
        assert_eq!(parts[0]["type"], "image_url");
        assert_eq!(
            parts[0]["image_url"]["url"],
            "data:image/png;base64,aGVsbG8="
        );
        assert_eq!(parts[1]["type"], "text");
        assert!(parts[1]["text"].as_str().unwrap().contains("'study'"));
    }

    #[test]
    fn test_extract_trims_content() {
        let body = br#"{"choices":[{"message":{"content":" 73 "}}]}"#;
        assert_eq!(extract_answer(body).unwrap(), "73");
    }

    #[test]
    fn test_extract_empty_choices() {
        let err = extract_answer(br#"{"choices":[]}"#).unwrap_err();
        assert!(matches!(err, ModelError::NoChoices));
    }

    #[test]
    fn test_extract_missing_choices() {
        let err = extract_answer(br#"{"error":"model not loaded"}"#).unwrap_err();
        assert!(matches!(err, ModelError::NoChoices));
    }

    #[test]
    fn test_extract_non_json() {
        let err = extract_answer(b"<html>Bad Gateway</html>").unwrap_err();
        assert!(matches!(err, ModelError::Parse { .. }));
    }

    #[test]
    fn test_extract_choice_without_message() {
        let err = extract_answer(br#"{"choices":[{"text":"73"}]}"#).unwrap_err();
        assert!(matches!(err, ModelError::Parse { .. }));
    }

    #[test]
    fn test_extract_null_content() {
        let err = extract_answer(br#"{"choices":[{"message":{"content":null}}]}"#).unwrap_err();
        assert!(err.to_string().contains("no message content"));
    }

    #[test]
    fn test_timeout_from_config() {
        let client = client_for("http://localhost:1234/v1/chat/completions");
        assert_eq!(client.timeout(), Duration::from_millis(2_000));
    }

    #[test]
    fn test_models_url() {
        let client = client_for("http://localhost:1234/v1/chat/completions");
        assert_eq!(
            client.models_url().as_deref(),
            Some("http://localhost:1234/v1/models")
        );
        let client = client_for("http://localhost:1234/generate");
        assert_eq!(client.models_url(), None);
    }

    #[tokio::test]
    async fn test_complete_sends_payload_and_returns_answer() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", CHAT_PATH)
            .match_body(Matcher::PartialJson(json!({
                "model": "Qwen-2.5-VL",
                "temperature": 0.5,
            })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"choices":[{"message":{"content":" 42\n"}}]}"#)
            .create_async()
            .await;

        let client = client_for(&format!("{}{CHAT_PATH}", server.url()));
        let answer = client.complete(&sample_query()).await.unwrap();
        assert_eq!(answer, "42");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_complete_uses_choices_from_error_status() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("POST", CHAT_PATH)
            .with_status(500)
            .with_body(r#"{"choices":[{"message":{"content":"fail"}}]}"#)
            .create_async()
            .await;

        let client = client_for(&format!("{}{CHAT_PATH}", server.url()));
        assert_eq!(client.complete(&sample_query()).await.unwrap(), "fail");
    }

    #[tokio::test]
    async fn test_complete_error_status_without_choices() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("POST", CHAT_PATH)
            .with_status(404)
            .with_body(r#"{"error":"No models loaded"}"#)
            .create_async()
            .await;

        let client = client_for(&format!("{}{CHAT_PATH}", server.url()));
        let err = client.complete(&sample_query()).await.unwrap_err();
        assert!(matches!(err, ModelError::NoChoices));
    }

    #[tokio::test]
    async fn test_complete_connection_refused() {
        // Bind then drop to get a port with nothing listening
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let client = client_for(&format!("http://{addr}{CHAT_PATH}"));
        let err = client.complete(&sample_query()).await.unwrap_err();
        assert!(matches!(err, ModelError::Request { .. }));
        assert!(!err.to_string().is_empty());
    }

    #[tokio::test]
    async fn test_complete_times_out() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        // Accept connections and never answer
        let hold = tokio::spawn(async move {
            let mut sockets = Vec::new();
            while let Ok((socket, _)) = listener.accept().await {
                sockets.push(socket);
            }
        });

        let client = ChatCompletionsClient::new(&ModelConfig {
            endpoint: format!("http://{addr}{CHAT_PATH}"),
            timeout_ms: 200,
            ..ModelConfig::default()
        });
        let err = client.complete(&sample_query()).await.unwrap_err();
        assert!(matches!(err, ModelError::Request { .. }));
        hold.abort();
    }

    #[tokio::test]
    async fn test_is_available() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/v1/models")
            .with_status(200)
            .with_body(r#"{"data":[]}"#)
            .create_async()
            .await;

        let client = client_for(&format!("{}{CHAT_PATH}", server.url()));
        assert!(client.is_available().await);
    }

    #[tokio::test]
    async fn test_is_not_available_when_refused() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let client = client_for(&format!("http://{addr}{CHAT_PATH}"));
        assert!(!client.is_available().await);
    }
}
