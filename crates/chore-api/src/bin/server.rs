//! chore server binary.
//!
//! Reads `config.toml` (or the path specified with `--config`), opens the
//! SQLite items store, builds the identity client, and serves `/items`
//! over HTTP.

use std::{path::PathBuf, sync::Arc};

use anyhow::Context as _;
use chore_api::{AppState, ServerConfig, notify::WebhookNotifier};
use chore_identity::OnBehalfOfClient;
use chore_store_sqlite::SqliteStore;
use clap::Parser;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "chore to-do service")]
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

  // Load configuration. Resolved once, here, and passed down explicitly.
  let settings = config::Config::builder()
    .add_source(config::File::from(cli.config).required(false))
    .add_source(config::Environment::with_prefix("CHORE"))
    .build()
    .context("failed to read config file")?;

  let server_cfg: ServerConfig = settings
    .try_deserialize()
    .context("failed to deserialise ServerConfig")?;

  // Open the items store.
  let store = SqliteStore::open(&server_cfg.store_path)
    .await
    .with_context(|| {
      format!("failed to open store at {:?}", server_cfg.store_path)
    })?;

  let identity = OnBehalfOfClient::new(server_cfg.identity.clone())
    .context("failed to build identity client")?;
  let notifier = WebhookNotifier::new(server_cfg.webhook_url.clone())
    .context("failed to build webhook notifier")?;

  // Build application state.
  let state = AppState {
    store:    Arc::new(store),
    identity: Arc::new(identity),
    notifier: Arc::new(notifier),
  };

  let app = chore_api::router(state).layer(TraceLayer::new_for_http());
  let address = format!("{}:{}", server_cfg.host, server_cfg.port);

  tracing::info!("Listening on http://{address}");
  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;

  axum::serve(listener, app).await.context("server error")?;

  Ok(())
}
