//! Web server setup

use axum::{response::Redirect, routing::get, Router};
use axum_server::tls_rustls::RustlsConfig;
use std::{net::SocketAddr, path::Path, sync::Arc, time::Duration};
use tower_http::{services::ServeDir, trace::TraceLayer};
use tracing::{debug, info};

use super::pages::PageConfig;
use super::profile::{profile_router, ProfileState};
use super::session::{create_session_store, SharedSessionStore};
use crate::api::SharedApiConnector;
use crate::config::Config;

/// How often expired sessions are swept
const SESSION_SWEEP_INTERVAL: Duration = Duration::from_secs(300);

/// Build the full application router
pub fn build_router(state: ProfileState, assets_path: &Path) -> Router {
    Router::new()
        .route("/", get(|| async { Redirect::to("/profile") }))
        .route("/health", get(health))
        .merge(profile_router(state))
        .nest_service("/assets", ServeDir::new(assets_path))
        .layer(TraceLayer::new_for_http())
}

/// Start the web frontend and serve until the process exits
pub async fn start_web_server(config: &Config, connector: SharedApiConnector) -> anyhow::Result<()> {
    let sessions = create_session_store(config.session_ttl, config.max_sessions);
    tokio::spawn(sweep_sessions(sessions.clone()));

    let state = ProfileState {
        connector,
        sessions,
        pages: Arc::new(PageConfig {
            assets_url: "/assets".to_string(),
            report_sighting_url: config.report_sighting_url.clone(),
        }),
    };
    let app = build_router(state, &config.assets_path);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.http_port));

    match &config.tls {
        Some(tls) => {
            info!("Loading TLS certificates:");
            info!("  Certificate: {}", tls.cert_path.display());
            info!("  Private key: {}", tls.key_path.display());

            if !tls.cert_path.exists() {
                return Err(anyhow::anyhow!(
                    "Certificate file not found: {}",
                    tls.cert_path.display()
                ));
            }
            if !tls.key_path.exists() {
                return Err(anyhow::anyhow!(
                    "Private key file not found: {}",
                    tls.key_path.display()
                ));
            }

            let tls_config = RustlsConfig::from_pem_file(&tls.cert_path, &tls.key_path)
                .await
                .map_err(|e| anyhow::anyhow!("Failed to load TLS certificates: {}", e))?;

            info!("Profile available at https://0.0.0.0:{}/profile", config.http_port);
            axum_server::bind_rustls(addr, tls_config)
                .serve(app.into_make_service())
                .await?;
        }
        None => {
            info!("Profile available at http://0.0.0.0:{}/profile", config.http_port);
            axum_server::bind(addr)
                .serve(app.into_make_service())
                .await?;
        }
    }

    Ok(())
}

async fn sweep_sessions(sessions: SharedSessionStore) {
    let mut interval = tokio::time::interval(SESSION_SWEEP_INTERVAL);
    loop {
        interval.tick().await;
        let removed = sessions.cleanup_expired().await;
        if removed > 0 {
            debug!("Removed {} expired sessions", removed);
        }
    }
}

/// Health check endpoint
async fn health() -> &'static str {
    "OK"
}
