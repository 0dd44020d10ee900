//! cinelog-server binary.
//!
//! Reads `config.toml` (or the path given with `--config`), opens the SQLite
//! store, rebuilds the catalogue index and serves the JSON API over HTTP.

use std::{path::PathBuf, sync::Arc};

use anyhow::Context as _;
use clap::Parser;
use cinelog_server::{ServerConfig, expand_tilde};
use cinelog_service::Service;
use cinelog_store_sqlite::SqliteStore;
use tokio::net::TcpListener;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "Cinelog film social catalogue server")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "config.toml")]
  config: PathBuf,

  /// Override the configured store path.
  #[arg(long)]
  store_path: Option<PathBuf>,
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
    .add_source(config::Environment::with_prefix("CINELOG"))
    .build()
    .context("failed to read config file")?;

  let mut server_cfg: ServerConfig = settings
    .try_deserialize()
    .context("failed to deserialise ServerConfig")?;
  if let Some(path) = cli.store_path {
    server_cfg.store_path = path;
  }

  // Open SQLite store.
  let store = if server_cfg.is_in_memory() {
    tracing::warn!("using an in-memory store; data is lost on exit");
    SqliteStore::open_in_memory()
      .await
      .context("failed to open in-memory store")?
  } else {
    let store_path = expand_tilde(&server_cfg.store_path);
    if let Some(parent) = store_path.parent()
      && !parent.as_os_str().is_empty()
    {
      std::fs::create_dir_all(parent)
        .with_context(|| format!("failed to create {parent:?}"))?;
    }
    SqliteStore::open(&store_path)
      .await
      .with_context(|| format!("failed to open store at {store_path:?}"))?
  };

  let service = Service::open(Arc::new(store))
    .await
    .context("failed to build catalogue index")?;
  tracing::info!(films = service.catalog().len(), "catalogue index ready");

  let app = cinelog_server::app(Arc::new(service));
  let address = server_cfg.address();

  tracing::info!("Listening on http://{address}");
  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;

  axum::serve(listener, app).await.context("server error")?;

  Ok(())
}
