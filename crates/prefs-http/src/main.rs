// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Serves the display preferences panel over HTTP(S).

use std::{net::SocketAddr, path::PathBuf, sync::Arc};

use anyhow::{anyhow, Context, Result};
use axum::http::HeaderName;
use axum_server::{tls_rustls::RustlsConfig, Handle};
use clap::Parser;
use prefs_config_fs::FsConfigStore;
use prefs_core::{ConfigPreferenceStore, ConfigService, DisplayPreferencesPanel, PanelConfig};
use prefs_http::{router, AppState, SharedStore, DEFAULT_USER_HEADER};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

/// Config key the panel configuration is read from.
const PANEL_CONFIG_KEY: &str = "panel";

#[derive(Parser, Debug)]
#[command(author, version, about = "Display preferences panel server")]
struct Args {
    /// TCP listener (e.g. 127.0.0.1:8788)
    #[arg(long, default_value = "127.0.0.1:8788")]
    listen: SocketAddr,
    /// Directory for panel config and per-user preferences. Defaults to the platform config dir.
    #[arg(long)]
    data_dir: Option<PathBuf>,
    /// Request header carrying the authenticated user id
    #[arg(long, default_value = DEFAULT_USER_HEADER)]
    user_header: String,
    /// Settings application root the panel is mounted under
    #[arg(long, default_value = "/settings/")]
    base_uri: String,
    /// TLS certificate (PEM). If provided, key must also be provided.
    #[arg(long)]
    tls_cert: Option<PathBuf>,
    /// TLS private key (PEM). If provided, cert must also be provided.
    #[arg(long)]
    tls_key: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .init();

    let fs_store = match &args.data_dir {
        Some(dir) => FsConfigStore::with_base(dir),
        None => FsConfigStore::new(),
    }
    .context("open config store")?;
    info!(dir = %fs_store.base().display(), "using config directory");

    let config: PanelConfig = ConfigService::new(fs_store.clone())
        .load_or_default(PANEL_CONFIG_KEY)
        .context("load panel config")?;
    info!(
        protocols = ?config.allowed_protocol_names().collect::<Vec<_>>(),
        "allowed editor protocols"
    );

    let user_header = HeaderName::try_from(args.user_header.as_str())
        .with_context(|| format!("invalid --user-header {:?}", args.user_header))?;
    let store: SharedStore = Arc::new(ConfigPreferenceStore::new(fs_store));
    let panel = DisplayPreferencesPanel::new(config, store, args.base_uri.clone());
    let panel_uri = panel.panel_uri("");
    let app = router(Arc::new(AppState::new(panel, user_header)));

    let handle = Handle::new();
    // graceful shutdown on Ctrl+C
    let shutdown = handle.clone();
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => shutdown.shutdown(),
            Err(err) => error!(?err, "failed to install ctrl-c handler"),
        }
    });

    match (args.tls_cert, args.tls_key) {
        (Some(cert), Some(key)) => {
            let tls_config = load_tls(cert, key).await.context("load tls config")?;
            info!(panel = %panel_uri, "prefs server listening (TLS) on {}", args.listen);
            axum_server::bind_rustls(args.listen, tls_config)
                .handle(handle)
                .serve(app.into_make_service())
                .await?;
        }
        (None, None) => {
            info!(panel = %panel_uri, "prefs server listening on {}", args.listen);
            axum_server::bind(args.listen)
                .handle(handle)
                .serve(app.into_make_service())
                .await?;
        }
        _ => {
            return Err(anyhow!(
                "must provide both --tls-cert and --tls-key or neither"
            ))
        }
    }

    Ok(())
}

async fn load_tls(cert_path: PathBuf, key_path: PathBuf) -> Result<RustlsConfig> {
    // Already installed is fine; only the first call wins.
    let _ = rustls::crypto::ring::default_provider().install_default();
    let cfg = RustlsConfig::from_pem_file(cert_path, key_path).await?;
    Ok(cfg)
}
