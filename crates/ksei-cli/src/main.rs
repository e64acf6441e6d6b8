//! ksei - command-line access to KSEI AKSes portfolio data.
//!
//! Logs in with the configured account (reusing a persisted token when it
//! is still valid) and prints or saves portfolio data as JSON.

use std::io;
use std::path::Path;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use ksei_core::{Config, FileCredentialStore, Identity, Keychain, KseiClient};
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// File written by the `portfolios` command inside the auth directory
const PORTFOLIOS_FILE: &str = "ksei_portfolios.json";

const USAGE: &str = "Usage: ksei [portfolios|summary|identity|get <path>|forget]

Environment:
  KSEI_USERNAME        account username (required unless saved in config)
  KSEI_PASSWORD        account password (falls back to keychain, then prompt)
  KSEI_AUTH_PATH       directory for persisted tokens and output
  KSEI_PLAIN_PASSWORD  false if KSEI_PASSWORD is already the login hash
  KSEI_TIMEOUT_SECS    per-request timeout
  RUST_LOG             log filter (default: warn)";

enum Command {
    Portfolios,
    Summary,
    Identity,
    Get(String),
    Forget,
}

impl Command {
    fn parse(args: &[String]) -> Result<Self> {
        match args.first().map(String::as_str) {
            None | Some("portfolios") => Ok(Command::Portfolios),
            Some("summary") => Ok(Command::Summary),
            Some("identity") => Ok(Command::Identity),
            Some("get") => match args.get(1) {
                Some(path) if path.starts_with('/') => Ok(Command::Get(path.clone())),
                Some(path) => Ok(Command::Get(format!("/{}", path))),
                None => bail!("get requires a path\n\n{}", USAGE),
            },
            Some("forget") => Ok(Command::Forget),
            Some(other) => bail!("Unknown command: {}\n\n{}", other, USAGE),
        }
    }
}

/// Initialize the tracing subscriber for logging.
/// The returned guard flushes buffered log lines when dropped.
fn init_tracing() -> WorkerGuard {
    // Use RUST_LOG env var to control log level (e.g., RUST_LOG=debug)
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("warn"));
    let (writer, guard) = tracing_appender::non_blocking(io::stderr());

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(writer))
        .with(filter)
        .init();

    guard
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if not found)
    let _ = dotenvy::dotenv();

    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.iter().any(|a| a == "-h" || a == "--help") {
        println!("{}", USAGE);
        return Ok(());
    }
    let command = Command::parse(&args)?;

    let _guard = init_tracing();

    let stored = Config::load()?;
    let config = stored.clone().apply_env()?;
    let username = config
        .last_username
        .clone()
        .context("KSEI_USERNAME is not set")?;

    if let Command::Forget = command {
        Keychain::delete(&username)?;
        eprintln!("Removed stored password for {}", username);
        return Ok(());
    }

    let password = resolve_password(&username)?;
    let identity = Identity {
        username: username.clone(),
        password,
        plain_password: config.plain_password(),
    };

    let auth_dir = config.auth_dir()?;
    let store = FileCredentialStore::new(&auth_dir)
        .with_context(|| format!("Failed to open auth directory {}", auth_dir.display()))?;
    let client = KseiClient::new(&config.client_config(), identity)?.with_store(Arc::new(store));

    if let Err(e) = stored.remember_username(&username).save() {
        warn!(error = %e, "Failed to save config");
    }

    match command {
        Command::Portfolios => write_portfolios(&client, &auth_dir).await,
        Command::Summary => print_json(&client.get_portfolio_summary().await?),
        Command::Identity => print_json(&client.get_global_identity().await?),
        Command::Get(path) => print_json(&client.get(&path).await?),
        Command::Forget => Ok(()),
    }
}

/// Password from KSEI_PASSWORD, then the keychain, then an interactive prompt.
/// A prompted password is saved to the keychain for next time.
fn resolve_password(username: &str) -> Result<String> {
    if let Ok(password) = std::env::var("KSEI_PASSWORD") {
        if !password.is_empty() {
            return Ok(password);
        }
    }

    match Keychain::get_password(username) {
        Ok(Some(password)) => return Ok(password),
        Ok(None) => {}
        Err(e) => warn!(error = %e, "Keychain unavailable"),
    }

    let password = rpassword::prompt_password(format!("Password for {}: ", username))
        .context("Failed to read password")?;
    if password.is_empty() {
        bail!("No password given");
    }
    if let Err(e) = Keychain::store(username, &password) {
        warn!(error = %e, "Failed to save password to keychain");
    }
    Ok(password)
}

async fn write_portfolios(client: &KseiClient, auth_dir: &Path) -> Result<()> {
    let results = client.get_all_portfolios().await?;

    for (name, error) in results.failures() {
        eprintln!("Error fetching {}: {}", name, error);
    }
    info!(
        fetched = results.successes().count(),
        failed = results.failures().count(),
        "Portfolios fetched"
    );

    let out_file = auth_dir.join(PORTFOLIOS_FILE);
    let contents = serde_json::to_string_pretty(&results.to_json_lossy())?;
    std::fs::write(&out_file, contents)
        .with_context(|| format!("Failed to write {}", out_file.display()))?;

    let shown = out_file.canonicalize().unwrap_or(out_file);
    println!("Wrote portfolios to: {}", shown.display());
    Ok(())
}

fn print_json(value: &serde_json::Value) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
