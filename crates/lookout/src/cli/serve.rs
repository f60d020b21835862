//! The `lookout serve` command.

use anyhow::Context;
use clap::Args;
use lookout_core::{server, Config, Relay};

/// Arguments for the `serve` command. Each flag overrides the config file.
#[derive(Args, Debug, Default)]
pub struct ServeArgs {
    /// Interface to bind
    #[arg(long, env = "LOOKOUT_HOST")]
    pub host: Option<String>,

    /// Port to listen on
    #[arg(short, long, env = "LOOKOUT_PORT")]
    pub port: Option<u16>,

    /// Chat-completions URL of the model server
    #[arg(long, env = "LOOKOUT_ENDPOINT")]
    pub endpoint: Option<String>,

    /// Model name to request
    #[arg(long, env = "LOOKOUT_MODEL")]
    pub model: Option<String>,

    /// Upstream request timeout in seconds
    #[arg(long, env = "LOOKOUT_TIMEOUT_SECS")]
    pub timeout_secs: Option<u64>,
}

impl ServeArgs {
    /// Fold the flags into `config`.
    pub fn apply(&self, config: &mut Config) {
        if let Some(host) = &self.host {
            config.server.host = host.clone();
        }
        if let Some(port) = self.port {
            config.server.port = port;
        }
        if let Some(endpoint) = &self.endpoint {
            config.model.endpoint = endpoint.clone();
        }
        if let Some(model) = &self.model {
            config.model.name = model.clone();
        }
        if let Some(secs) = self.timeout_secs {
            config.model.timeout_ms = secs.saturating_mul(1000);
        }
    }
}

/// Execute the serve command.
pub async fn execute(args: ServeArgs, mut config: Config) -> anyhow::Result<()> {
    args.apply(&mut config);
    config.validate().context("Invalid serve options")?;

    let relay = Relay::from_config(&config);
    tracing::info!(
        "Forwarding to {} (model {}, timeout {}ms)",
        config.model.endpoint,
        config.model.name,
        config.model.timeout_ms
    );
    if !relay.model().is_available().await {
        tracing::warn!(
            "Model endpoint {} is not reachable yet; requests will answer with errors until it is",
            config.model.endpoint
        );
    }

    server::serve(&config, relay)
        .await
        .with_context(|| format!("Relay server on {} failed", config.server.bind_addr()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply_overrides() {
        let mut config = Config::default();
        let args = ServeArgs {
            host: Some("127.0.0.1".to_string()),
            port: Some(9000),
            endpoint: Some("http://gpu-box:8000/v1/chat/completions".to_string()),
            model: Some("llava".to_string()),
            timeout_secs: Some(90),
        };
        args.apply(&mut config);

        assert_eq!(config.server.bind_addr(), "127.0.0.1:9000");
        assert_eq!(config.model.endpoint, "http://gpu-box:8000/v1/chat/completions");
        assert_eq!(config.model.name, "llava");
        assert_eq!(config.model.timeout_ms, 90_000);
    }

    #[test]
    fn test_apply_without_flags_keeps_config() {
        let mut config = Config::default();
        config.server.port = 7070;
        ServeArgs::default().apply(&mut config);
        assert_eq!(config.server.port, 7070);
        assert_eq!(config.model.name, "Qwen-2.5-VL");
    }

    #[test]
    fn test_zero_timeout_fails_validation() {
        let mut config = Config::default();
        let args = ServeArgs {
            timeout_secs: Some(0),
            ..ServeArgs::default()
        };
        args.apply(&mut config);
        assert!(config.validate().is_err());
    }
}
