//! Vision model integration.
//!
//! Provides the [`VisionModel`] abstraction, the prompt templates for the two
//! relay questions, and a client for OpenAI-style chat-completion endpoints
//! (LM Studio, llama.cpp server, vLLM and friends).

pub(crate) mod client;
pub(crate) mod prompt;
pub(crate) mod provider;

pub use client::ChatCompletionsClient;
pub use provider::{ModelQuery, ModelReply, Screenshot, VisionModel};
