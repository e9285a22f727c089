//! `webrelay` -- relay signed HTTP posts into IRC channels.
//!
//! Provides the following subcommands:
//!
//! - `webrelay serve` -- Connect to IRC and serve the relay endpoint.
//! - `webrelay sign` -- Compute the signature header value for a body.
//! - `webrelay config` -- Show the resolved configuration.

use clap::{Parser, Subcommand};

mod commands;

/// Signed HTTP-to-IRC relay.
#[derive(Parser)]
#[command(name = "webrelay", about = "Signed HTTP-to-IRC relay", version)]
struct Cli {
    /// Enable verbose (debug-level) logging.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Top-level subcommands.
#[derive(Subcommand)]
enum Commands {
    /// Connect to IRC and serve the relay endpoint.
    Serve(commands::serve::ServeArgs),

    /// Print the signature for a request body.
    Sign(commands::sign::SignArgs),

    /// Show resolved configuration.
    Config {
        #[command(subcommand)]
        action: ConfigCmd,
    },
}

/// Subcommands for `webrelay config`.
#[derive(Subcommand)]
enum ConfigCmd {
    /// Show the full resolved configuration (secrets redacted).
    Show {
        /// Config file path (overrides auto-discovery).
        #[arg(short, long)]
        config: Option<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Serve(args) => commands::serve::run(args).await?,
        Commands::Sign(args) => commands::sign::run(args)?,
        Commands::Config { action } => match action {
            ConfigCmd::Show { config } => {
                let cfg = commands::load_config(config.as_deref())?;
                commands::config_cmd::config_show(&cfg)?;
            }
        },
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_serve_flags() {
        let cli = Cli::try_parse_from(["webrelay", "-v", "serve", "--dry-run", "-c", "x.json"])
            .unwrap();
        assert!(cli.verbose);
        let Commands::Serve(args) = cli.command else {
            panic!("expected serve");
        };
        assert!(args.dry_run);
        assert_eq!(args.config.as_deref(), Some("x.json"));
    }

    #[test]
    fn parses_config_show() {
        let cli = Cli::try_parse_from(["webrelay", "config", "show"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Config {
                action: ConfigCmd::Show { config: None }
            }
        ));
    }
}
