//! `webrelay sign` -- compute the `Post-Signature` value for a body.
//!
//! The secret comes from `--secret`, else `WEBRELAY_CLIENT_SECRET`, else
//! the config file. The body is read from FILE, or stdin when omitted.
//!
//! # Example
//!
//! ```text
//! echo -n hello | webrelay sign --secret f9876
//! curl -H "Post-Signature: $(webrelay sign msg.txt)" \
//!      --data-binary @msg.txt http://127.0.0.1:8080/relay/ops
//! ```

use std::io::Read;
use std::path::PathBuf;

use clap::Args;

use webrelay_services::relay::auth;
use webrelay_types::config::Config;
use webrelay_types::secret::SharedSecret;

use super::load_config;

/// Arguments for the `webrelay sign` subcommand.
#[derive(Args)]
pub struct SignArgs {
    /// Shared secret (overrides environment and config).
    #[arg(long)]
    pub secret: Option<String>,

    /// Config file path (overrides auto-discovery).
    #[arg(short, long)]
    pub config: Option<String>,

    /// File holding the exact request body; stdin when omitted.
    pub file: Option<PathBuf>,
}

/// Run the sign command.
pub fn run(args: SignArgs) -> anyhow::Result<()> {
    let secret = resolve_secret(&args)?;
    let body = match &args.file {
        Some(path) => std::fs::read(path)
            .map_err(|e| anyhow::anyhow!("failed to read {}: {e}", path.display()))?,
        None => {
            let mut buf = Vec::new();
            std::io::stdin().read_to_end(&mut buf)?;
            buf
        }
    };
    let signature = auth::sign(secret.as_bytes(), &body)
        .ok_or_else(|| anyhow::anyhow!("secret cannot key HMAC-SHA256"))?;
    println!("{signature}");
    Ok(())
}

fn resolve_secret(args: &SignArgs) -> anyhow::Result<SharedSecret> {
    resolve_secret_with(args, load_config)
}

/// Pick the signing secret. `load` resolves the config, including the
/// `WEBRELAY_CLIENT_SECRET` override, and is only called without `--secret`.
fn resolve_secret_with(
    args: &SignArgs,
    load: impl FnOnce(Option<&str>) -> anyhow::Result<Config>,
) -> anyhow::Result<SharedSecret> {
    if let Some(secret) = args.secret.as_deref().filter(|s| !s.is_empty()) {
        return Ok(SharedSecret::new(secret));
    }
    let config = load(args.config.as_deref())?;
    match config.relay.secret() {
        Some(secret) => Ok(secret.clone()),
        None => anyhow::bail!(
            "no secret: pass --secret, set WEBRELAY_CLIENT_SECRET, or set relay.client_secret"
        ),
    }
}
