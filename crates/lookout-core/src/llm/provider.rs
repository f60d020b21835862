//! Vision model trait and request/reply types.

use super::prompt;
use crate::error::ModelError;
use async_trait::async_trait;
use base64::alphabet;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use base64::{DecodeError, Engine};
use std::fmt;
use std::time::Duration;

/// Decoder that tolerates missing or extra `=` and non-zero trailing bits.
/// Padding is checked separately in [`Screenshot::parse`].
const LENIENT: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new()
        .with_decode_allow_trailing_bits(true)
        .with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

fn is_base64_symbol(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '+' || c == '/'
}

/// A validated base64 screenshot, stripped of any data-URL header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Screenshot {
    /// Base64 payload exactly as received, minus the header
    pub data: String,
}

impl Screenshot {
    /// Strip a `data:<mime>;base64,` header and check the rest decodes.
    ///
    /// Everything before the first comma is treated as the header and
    /// anything after a second comma is dropped. Characters outside the
    /// base64 alphabet (line breaks, spaces) are skipped, trailing bits and
    /// surplus `=` are accepted, but a short final group still needs its
    /// padding. The decoded bytes are only used for validation; the payload
    /// is forwarded as-is.
    pub fn parse(raw: &str) -> Result<Self, ModelError> {
        let data = match raw.split_once(',') {
            Some((_header, rest)) => rest.split(',').next().unwrap_or(""),
            None => raw,
        };

        let symbols: String = data.chars().filter(|&c| is_base64_symbol(c)).collect();
        let padding = data.chars().filter(|&c| c == '=').count();
        let required = match symbols.len() % 4 {
            2 => 2,
            3 => 1,
            _ => 0,
        };
        if padding < required {
            return Err(DecodeError::InvalidPadding.into());
        }

        LENIENT.decode(&symbols)?;

        Ok(Self {
            data: data.to_string(),
        })
    }

    /// Return a data URL suitable for OpenAI-style APIs.
    ///
    /// Always labelled PNG, which is what the extension captures.
    pub fn data_url(&self) -> String {
        format!("data:image/png;base64,{}", self.data)
    }
}

/// One question for the vision model.
#[derive(Debug, Clone)]
pub struct ModelQuery {
    /// System instruction
    pub system_prompt: String,
    /// User prompt accompanying the image
    pub user_prompt: String,
    /// The screenshot to reason about
    pub image: Screenshot,
    /// Sampling temperature
    pub temperature: f32,
}

impl ModelQuery {
    /// Ask how likely it is that the screenshot is off-task for `goal`.
    pub fn off_task_rating(image: Screenshot, goal: &str, temperature: f32) -> Self {
        Self {
            system_prompt: prompt::SYSTEM_PROMPT.to_string(),
            user_prompt: prompt::off_task_rating(goal),
            image,
            temperature,
        }
    }

    /// Ask whether `reason` justifies the screenshot under `goal`.
    pub fn reason_verdict(image: Screenshot, goal: &str, reason: &str, temperature: f32) -> Self {
        Self {
            system_prompt: prompt::SYSTEM_PROMPT.to_string(),
            user_prompt: prompt::reason_verdict(goal, reason),
            image,
            temperature,
        }
    }
}

/// Outcome of one relay question.
///
/// Callers only ever see text: the answer itself, or the failure rendered
/// with an `"Error: "` prefix.
#[derive(Debug)]
pub enum ModelReply {
    /// Trimmed model output, not interpreted
    Answer(String),
    /// Anything that prevented an answer
    Failure(ModelError),
}

impl ModelReply {
    pub fn is_failure(&self) -> bool {
        matches!(self, ModelReply::Failure(_))
    }

    /// The text returned to the caller.
    pub fn into_text(self) -> String {
        match self {
            ModelReply::Answer(text) => text,
            failure => failure.to_string(),
        }
    }
}

impl fmt::Display for ModelReply {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModelReply::Answer(text) => f.write_str(text),
            ModelReply::Failure(err) => write!(f, "Error: {err}"),
        }
    }
}

impl From<Result<String, ModelError>> for ModelReply {
    fn from(result: Result<String, ModelError>) -> Self {
        match result {
            Ok(text) => ModelReply::Answer(text),
            Err(err) => ModelReply::Failure(err),
        }
    }
}

/// Trait that all vision model backends implement.
///
/// Uses `async_trait` because native async fn in trait is not object-safe
/// (the router holds an `Arc<dyn VisionModel>`).
#[async_trait]
pub trait VisionModel: Send + Sync {
    /// Backend name for logging.
    fn name(&self) -> &str;

    /// Check whether the backend is reachable.
    async fn is_available(&self) -> bool;

    /// Send one query and return the trimmed text answer.
    async fn complete(&self, query: &ModelQuery) -> Result<String, ModelError>;

    /// Per-request timeout for this backend.
    fn timeout(&self) -> Duration;
}
