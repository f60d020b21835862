//! The two relay questions, independent of HTTP.
//!
//! Each call validates the screenshot, builds the prompt, asks the model once
//! and folds every outcome into a [`ModelReply`]. Nothing here returns an
//! error: failures become reply text.

use crate::config::Config;
use crate::llm::{ChatCompletionsClient, ModelQuery, ModelReply, Screenshot, VisionModel};
use crate::types::{AnalysisRequest, ValidationRequest};
use std::sync::Arc;

/// Forwards screenshots to a vision model.
#[derive(Clone)]
pub struct Relay {
    model: Arc<dyn VisionModel>,
    temperature: f32,
}

impl Relay {
    pub fn new(model: Arc<dyn VisionModel>, temperature: f32) -> Self {
        Self { model, temperature }
    }

    /// Build a relay backed by the configured chat-completions endpoint.
    pub fn from_config(config: &Config) -> Self {
        let client = ChatCompletionsClient::new(&config.model);
        tracing::debug!(
            endpoint = client.endpoint(),
            model = %config.model.name,
            "Initializing Lookout v{}",
            crate::VERSION
        );
        Self::new(Arc::new(client), config.model.temperature)
    }

    pub fn model(&self) -> &dyn VisionModel {
        self.model.as_ref()
    }

    /// Rate how likely the screenshot is off-task for the request's goal.
    pub async fn analyze_screenshot(&self, request: &AnalysisRequest) -> ModelReply {
        tracing::info!(
            goal = %request.goal,
            screenshot_len = request.base64_screenshot.len(),
            "Analyzing screenshot"
        );

        let reply = match Screenshot::parse(&request.base64_screenshot) {
            Ok(image) => {
                let query = ModelQuery::off_task_rating(image, &request.goal, self.temperature);
                self.ask(&query).await
            }
            Err(e) => ModelReply::Failure(e),
        };

        log_reply("analyze_screenshot", &reply);
        reply
    }

    /// Judge whether the request's reason justifies the page for its goal.
    pub async fn validate_reason(&self, request: &ValidationRequest) -> ModelReply {
        tracing::info!(
            goal = %request.goal,
            reason = %request.reason,
            screenshot_len = request.base64_screenshot.len(),
            "Validating reason"
        );

        let reply = match Screenshot::parse(&request.base64_screenshot) {
            Ok(image) => {
                let query = ModelQuery::reason_verdict(
                    image,
                    &request.goal,
                    &request.reason,
                    self.temperature,
                );
                self.ask(&query).await
            }
            Err(e) => ModelReply::Failure(e),
        };

        log_reply("validate_reason", &reply);
        reply
    }

    async fn ask(&self, query: &ModelQuery) -> ModelReply {
        self.model.complete(query).await.into()
    }
}

fn log_reply(operation: &str, reply: &ModelReply) {
    if reply.is_failure() {
        tracing::warn!(operation, "{reply}");
    } else {
        tracing::info!(operation, result = %reply, "Model result");
    }
}
