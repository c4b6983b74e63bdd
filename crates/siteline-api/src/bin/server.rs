//! Siteline API server binary.
//!
//! Reads `config.toml` (or the path specified with `--config`), opens an
//! in-process SQLite store merged with an optional seed file, and serves the
//! RFI API over HTTP.

use std::{
  path::{Path, PathBuf},
  sync::Arc,
};

use anyhow::Context as _;
use clap::Parser;
use siteline_api::ServerConfig;
use siteline_core::{rfi::Rfi, service::RfiService};
use siteline_store_sqlite::SqliteStore;
use tokio::net::TcpListener;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "Siteline RFI server")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "config.toml")]
  config: PathBuf,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  // Initialise tracing.
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();

  // Load configuration.
  let settings = config::Config::builder()
    .add_source(config::File::from(cli.config).required(false))
    .add_source(config::Environment::with_prefix("SITELINE"))
    .build()
    .context("failed to read config file")?;

  let server_cfg: ServerConfig = settings
    .try_deserialize()
    .context("failed to deserialise ServerConfig")?;

  // Expand `~` in the store path.
  let store_path = expand_tilde(&server_cfg.store_path);

  // Fixed seed/reference collection, if configured.
  let seed = match &server_cfg.seed_path {
    Some(path) => load_seed(&expand_tilde(path))?,
    None => Vec::new(),
  };
  if !seed.is_empty() {
    tracing::info!(count = seed.len(), "loaded seed collection");
  }

  // Open SQLite store.
  let store = SqliteStore::open(&store_path, seed)
    .await
    .with_context(|| format!("failed to open store at {store_path:?}"))?;

  let service =
    Arc::new(RfiService::new(store, server_cfg.directory()));
  let app = siteline_api::api_router(service);

  let address = format!("{}:{}", server_cfg.host, server_cfg.port);
  tracing::info!("Listening on http://{address}");
  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;

  axum::serve(listener, app).await.context("server error")?;

  Ok(())
}

/// Read the seed collection from a JSON array file.
fn load_seed(path: &Path) -> anyhow::Result<Vec<Rfi>> {
  let raw = std::fs::read_to_string(path)
    .with_context(|| format!("failed to read seed file {path:?}"))?;
  serde_json::from_str(&raw)
    .with_context(|| format!("failed to parse seed file {path:?}"))
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
