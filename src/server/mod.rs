/// HTTP server mode: the dashboard as a web page, plus a small JSON API
/// backed by the same polling task as the terminal dashboard

#[cfg(feature = "server")]
pub mod routes;

#[cfg(feature = "server")]
pub mod handlers;

#[cfg(feature = "server")]
pub mod websocket;

#[cfg(feature = "server")]
pub mod auth;

pub mod view;

#[cfg(feature = "server")]
pub use routes::create_router;

#[cfg(feature = "server")]
pub use state::AppState;

#[cfg(feature = "server")]
mod state {
    use std::time::Duration;
    use tokio::sync::watch;

    use crate::core::{PollingHandle, Refresher, ServiceRegistry};
    use crate::screens::Locale;
    use crate::utils::Settings;

    /// Shared handler state; cheap to clone
    #[derive(Clone)]
    pub struct AppState {
        pub snapshots: watch::Receiver<ServiceRegistry>,
        pub refresher: Refresher,
        pub locale: Locale,
        pub target_host: String,
        pub poll_interval: Duration,
        pub web_token: Option<String>,
    }

    impl AppState {
        pub fn new(polling: &PollingHandle, settings: &Settings, web_token: Option<String>) -> Self {
            Self {
                snapshots: polling.subscribe(),
                refresher: polling.refresher(),
                locale: settings.lang,
                target_host: settings.target_host.clone(),
                poll_interval: settings.poll_interval,
                web_token,
            }
        }

        pub fn snapshot(&self) -> ServiceRegistry {
            self.snapshots.borrow().clone()
        }
    }
}

#[cfg(feature = "server")]
pub async fn run(
    settings: crate::utils::Settings,
    host: String,
    port: u16,
    enable_cors: bool,
) -> anyhow::Result<()> {
    use anyhow::Context;
    use std::net::SocketAddr;

    let web_token = std::env::var("TIMON_WEB_TOKEN")
        .ok()
        .filter(|t| !t.trim().is_empty());

    let addr: SocketAddr = format!("{}:{}", host, port)
        .parse()
        .with_context(|| format!("Invalid listen address {}:{}", host, port))?;

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    let polling = settings.scheduler()?.spawn();
    let app = create_router(AppState::new(&polling, &settings, web_token.clone()), enable_cors);

    println!("🐾 Timón Pet Store Dashboard");
    println!("   📍 Web UI: http://{}", addr);
    println!("   🔌 API:    http://{}/api", addr);
    if web_token.is_some() {
        println!("   🔒 Auth:   Enabled for POST routes (TIMON_WEB_TOKEN)");
    } else {
        println!("   ⚠️  Auth:   Disabled (set TIMON_WEB_TOKEN to protect POST routes)");
    }
    println!();
    println!("📚 API Endpoints:");
    println!("   GET  /                  - Dashboard page");
    println!("   GET  /api/services      - All services with status");
    println!("   GET  /api/services/:key - One service");
    println!("   GET  /api/summary       - Online/offline counts");
    println!("   POST /api/refresh       - Check all services now");
    println!("   GET  /api/health        - Dashboard health check");
    println!("   GET  /ws/status         - WebSocket status stream");
    println!();

    tracing::info!(%addr, "server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    polling.cancel().await;
    tracing::info!("server stopped");

    Ok(())
}

#[cfg(feature = "server")]
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for ctrl-c");
        std::future::pending::<()>().await;
    }
}
