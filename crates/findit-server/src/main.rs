//! findit-server binary.
//!
//! Reads `config.toml` (or the path given with `--config`) layered under
//! `FINDIT_*` environment variables (nested keys use `__`, e.g.
//! `FINDIT_GEMINI__API_KEY`), opens the configured store and serves the JSON
//! API under `/api`.

use std::{
  path::{Path, PathBuf},
  sync::Arc,
};

use anyhow::Context as _;
use clap::Parser;
use findit_api::ApiState;
use findit_core::memory::MemoryStore;
use findit_gemini::GeminiCaptioner;
use findit_server::{FixtureStore, ServerConfig, prepare, router};
use findit_store_sqlite::SqliteStore;
use tokio::net::TcpListener;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "FindIt lost-and-found server")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "config.toml")]
  config: PathBuf,

  /// Load the demo users and reports into an empty store.
  #[arg(long)]
  seed: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();

  let settings = config::Config::builder()
    .add_source(config::File::from(cli.config).required(false))
    .add_source(
      config::Environment::with_prefix("FINDIT")
        .prefix_separator("_")
        .separator("__"),
    )
    .build()
    .context("failed to read config file")?;

  let mut server_cfg: ServerConfig = settings
    .try_deserialize()
    .context("failed to deserialise ServerConfig")?;
  server_cfg.seed_demo_data |= cli.seed;
  if server_cfg.gemini.api_key.is_none() {
    server_cfg.gemini.api_key = std::env::var("GEMINI_API_KEY").ok();
  }

  let captioner =
    GeminiCaptioner::new(server_cfg.gemini.clone()).context("failed to build Gemini client")?;

  match server_cfg.store_path.as_deref().map(expand_tilde) {
    Some(store_path) => {
      let store = SqliteStore::open(&store_path)
        .await
        .with_context(|| format!("failed to open store at {store_path:?}"))?;
      tracing::info!(path = %store_path.display(), "using SQLite store");
      serve(store, captioner, &server_cfg).await
    }
    None => {
      tracing::info!("no store_path configured; reports are kept in memory");
      serve(MemoryStore::new(), captioner, &server_cfg).await
    }
  }
}

async fn serve<S: FixtureStore + 'static>(
  store: S,
  captioner: GeminiCaptioner,
  cfg: &ServerConfig,
) -> anyhow::Result<()> {
  prepare(&store, cfg).await.context("failed to prepare store")?;

  let state = ApiState::new(Arc::new(store), Arc::new(captioner), cfg.current_user.clone())
    .with_lookup_timeout(cfg.lookup_timeout());
  let app = router(state);
  let address = format!("{}:{}", cfg.host, cfg.port);

  tracing::info!("Listening on http://{address}");
  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;

  axum::serve(listener, app).await.context("server error")?;

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
