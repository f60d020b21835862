//! Lookout Core - HTTP relay between a focus-monitoring browser extension
//! and a locally hosted vision-language model.
//!
//! # Architecture
//!
//! ```text
//! extension → POST /analyze_screenshot | /validate_reason
//!           → Screenshot::parse → ModelQuery → VisionModel::complete
//!           → JSON string reply ("73", "pass", "Error: ...")
//! ```
//!
//! Every failure while serving a request is reported as reply text starting
//! with `"Error: "`, delivered with HTTP 200.
//!
//! # Usage
//!
//! ```rust,ignore
//! use lookout_core::{server, Config, Relay};
//!
//! #[tokio::main]
//! async fn main() -> lookout_core::Result<()> {
//!     let config = Config::load()?;
//!     let relay = Relay::from_config(&config);
//!     server::serve(&config, relay).await
//! }
//! ```

// Module declarations
pub mod config;
pub mod error;
pub mod llm;
pub mod relay;
pub mod server;
pub mod types;

// Re-exports for convenient access
pub use config::Config;
pub use error::{ConfigError, ModelError, RelayError, Result};
pub use llm::{ChatCompletionsClient, ModelQuery, ModelReply, Screenshot, VisionModel};
pub use relay::Relay;
pub use types::{AnalysisRequest, ValidationRequest};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }

    #[test]
    fn test_relay_from_config() {
        let config = Config::default();
        let relay = Relay::from_config(&config);
        assert_eq!(relay.model().name(), "chat-completions");
    }
}
