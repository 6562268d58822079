//! Local preview server for the catalog page.
//!
//! Each page request runs one load cycle and renders the result with the
//! requested search query and category. Toggle endpoints flip the persisted
//! theme or layout and redirect back to the page.

mod handlers;
mod routes;

pub use routes::create_router;

use std::net::SocketAddr;
use std::sync::Arc;

use tokio::sync::Mutex;

use crate::catalog::CatalogController;
use crate::config::Settings;

/// Shared state for the web server.
#[derive(Clone)]
pub struct AppState {
    /// Locked for a whole load cycle, so load cycles never overlap.
    pub controller: Arc<Mutex<CatalogController>>,
}

impl AppState {
    pub fn new(controller: CatalogController) -> Self {
        Self {
            controller: Arc::new(Mutex::new(controller)),
        }
    }

    pub fn from_settings(settings: &Settings) -> anyhow::Result<Self> {
        let store = settings.open_store();
        Ok(Self::new(settings.build_controller(store)?))
    }
}

/// Start the web server.
pub async fn serve(settings: &Settings, host: &str, port: u16) -> anyhow::Result<()> {
    let state = AppState::from_settings(settings)?;
    let app = create_router(state);

    let addr = resolve_addr(host, port).await?;
    tracing::info!("Starting server at http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

/// Resolve `host` (a name, IPv4 or IPv6 address, brackets optional) and `port`.
async fn resolve_addr(host: &str, port: u16) -> anyhow::Result<SocketAddr> {
    let host = host.trim_start_matches('[').trim_end_matches(']');
    tokio::net::lookup_host((host, port))
        .await?
        .next()
        .ok_or_else(|| anyhow::anyhow!("No address found for {}", host))
}

async fn shutdown_signal() {
    let ctrl_c = async {
        let _ = tokio::signal::ctrl_c().await;
    };
    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        if let Ok(mut stream) = signal(SignalKind::terminate()) {
            let _ = stream.recv().await;
        }
    };
    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_resolve_ipv4_and_ipv6_hosts() {
        let v4 = resolve_addr("127.0.0.1", 8080).await.unwrap();
        assert_eq!(v4, "127.0.0.1:8080".parse::<SocketAddr>().unwrap());

        let v6 = resolve_addr("::1", 8080).await.unwrap();
        assert_eq!(v6, "[::1]:8080".parse::<SocketAddr>().unwrap());
        assert_eq!(resolve_addr("[::1]", 8080).await.unwrap(), v6);
    }
}
