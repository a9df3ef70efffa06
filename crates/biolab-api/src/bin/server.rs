//! The BioLab inquiry server binary.

use std::{
  io::Read as _,
  path::{Path, PathBuf},
  sync::Arc,
};

use anyhow::Context as _;
use argon2::{Argon2, PasswordHasher, password_hash::SaltString};
use biolab_api::{
  AppState, ServerConfig,
  auth::{AuthConfig, Sessions},
  mail::SmtpMailer,
  router,
};
use biolab_store_sqlite::SqliteStore;
use clap::Parser;
use rand_core::OsRng;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "biolab-server", version, about = "Inquiry and blog backend")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "config.toml")]
  config: PathBuf,

  /// Read a password from stdin, print its argon2 hash, and exit. The
  /// output goes into `auth_password_hash` in the configuration file.
  #[arg(long)]
  hash_password: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  let cli = Cli::parse();

  if cli.hash_password {
    return hash_password();
  }

  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info")),
    )
    .init();

  let config: ServerConfig = config::Config::builder()
    .add_source(config::File::from(cli.config.as_path()).required(false))
    .add_source(config::Environment::with_prefix("BIOLAB").separator("__"))
    .build()
    .context("failed to read configuration")?
    .try_deserialize()
    .context("invalid configuration")?;

  let store_path = expand_tilde(&config.store_path);
  let store = SqliteStore::open(&store_path)
    .await
    .with_context(|| format!("failed to open store at {store_path:?}"))?;

  let mailer = SmtpMailer::from_config(config.smtp.as_ref())
    .context("invalid smtp configuration")?;
  if !mailer.is_enabled() {
    tracing::warn!("no [smtp] configuration; notification mail is disabled");
  }

  let addr = format!("{}:{}", config.host, config.port);
  let state = AppState {
    store:    Arc::new(store),
    mailer,
    auth:     Arc::new(AuthConfig {
      username:      config.auth_username.clone(),
      password_hash: config.auth_password_hash.clone(),
    }),
    sessions: Sessions::new(config.session_ttl_minutes),
    config:   Arc::new(config),
  };

  let listener = tokio::net::TcpListener::bind(&addr)
    .await
    .with_context(|| format!("failed to bind {addr}"))?;
  tracing::info!(addr = %listener.local_addr()?, "listening");

  axum::serve(listener, router(state)).await?;
  Ok(())
}

/// Hash a password for the config file. Reads the whole of stdin so the
/// password can be piped in without appearing in shell history.
fn hash_password() -> anyhow::Result<()> {
  let mut password = String::new();
  std::io::stdin()
    .read_to_string(&mut password)
    .context("failed to read password from stdin")?;
  let password = password.trim_end_matches(['\r', '\n']);

  let salt = SaltString::generate(&mut OsRng);
  let hash = Argon2::default()
    .hash_password(password.as_bytes(), &salt)
    .map_err(|e| anyhow::anyhow!("password hashing failed: {e}"))?;

  println!("{hash}");
  Ok(())
}

/// Expand a leading `~` to the user's home directory.
fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}
