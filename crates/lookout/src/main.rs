//! Lookout CLI - HTTP relay between a focus-monitoring browser extension and
//! a locally hosted vision-language model.
//!
//! # Usage
//!
//! ```bash
//! # Start the relay on 0.0.0.0:8080
//! lookout serve
//!
//! # Point at a different model server
//! lookout serve --endpoint http://gpu-box:1234/v1/chat/completions --model qwen2.5-vl-7b
//!
//! # Check the model server is up
//! lookout check
//!
//! # View configuration
//! lookout config show
//! ```

use clap::{Parser, Subcommand};
use lookout_core::Config;

mod cli;
mod logging;

/// Lookout - relay screenshots to a local vision model for focus checks.
#[derive(Parser, Debug)]
#[command(name = "lookout")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose (debug) logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output logs in JSON format
    #[arg(long, global = true)]
    json_logs: bool,

    /// Use this config file instead of the default location
    #[arg(long, global = true, env = "LOOKOUT_CONFIG")]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

/// Available commands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the relay server
    Serve(cli::serve::ServeArgs),

    /// Check that the model endpoint is reachable
    Check,

    /// View and manage configuration
    Config(cli::config::ConfigArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Logging isn't initialized yet, so use eprintln for config warnings.
    let config_path = cli
        .config
        .as_deref()
        .map(Config::expand_path)
        .unwrap_or_else(Config::default_path);
    // A missing file means defaults, so `lookout --config x.toml config init` works.
    let config = if !config_path.exists() {
        Config::default()
    } else if cli.config.is_some() {
        Config::load_from(&config_path)?
    } else {
        Config::load_from(&config_path).unwrap_or_else(|e| {
            eprintln!(
                "Warning: Failed to load config: {e}\n  \
                 Using default configuration. Check your config file with `lookout config path`."
            );
            Config::default()
        })
    };
    logging::init_from_config(&config, cli.verbose, cli.json_logs);

    tracing::debug!("Lookout v{}", lookout_core::VERSION);

    match cli.command {
        Commands::Serve(args) => cli::serve::execute(args, config).await,
        Commands::Check => cli::check::execute(&config).await,
        Commands::Config(args) => cli::config::execute(args, &config, &config_path).await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_serve_with_overrides() {
        let parsed = Cli::try_parse_from([
            "lookout", "serve", "--port", "9000", "--model", "llava", "-v",
        ])
        .unwrap();
        assert!(parsed.verbose);
        match parsed.command {
            Commands::Serve(args) => {
                assert_eq!(args.port, Some(9000));
                assert_eq!(args.model.as_deref(), Some("llava"));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_parse_config_init_force() {
        let parsed = Cli::try_parse_from(["lookout", "config", "init", "--force"]).unwrap();
        assert!(matches!(
            parsed.command,
            Commands::Config(cli::config::ConfigArgs {
                command: cli::config::ConfigCommand::Init { force: true }
            })
        ));
    }

    #[test]
    fn test_subcommand_required() {
        assert!(Cli::try_parse_from(["lookout"]).is_err());
    }
}
