//! Web server for mediadrop.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tokio::net::TcpListener;

use crate::config::Config;
use crate::token::TokenRegistry;
use crate::{MediadropError, Result};

use super::handlers::AppState;
use super::middleware::CorsHeaders;
use super::router::create_router;

/// Web server for the API.
pub struct WebServer {
    /// Server address.
    addr: SocketAddr,
    /// Application state.
    app_state: Arc<AppState>,
    /// CORS headers added to every response.
    cors: CorsHeaders,
    /// Interval between expired-token purges.
    cleanup_interval: Duration,
}

impl WebServer {
    /// Create a new web server from configuration.
    pub fn new(config: &Config) -> Result<Self> {
        Self::with_state(config, AppState::from_config(config))
    }

    /// Create a web server around a prepared application state.
    pub fn with_state(config: &Config, app_state: AppState) -> Result<Self> {
        let addr = format!("{}:{}", config.server.host, config.server.port)
            .parse()
            .map_err(|e| MediadropError::Config(format!("invalid server address: {e}")))?;

        Ok(Self {
            addr,
            app_state: Arc::new(app_state),
            cors: CorsHeaders::new(&config.cors.allowed_origin)?,
            cleanup_interval: Duration::from_secs(config.token.cleanup_interval_secs.max(1)),
        })
    }

    /// Get the server address.
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Start the expired-token cleanup task.
    ///
    /// Only runs when tokens have a TTL; otherwise tokens live for the whole
    /// process and nothing is purged.
    fn start_token_cleanup_task(tokens: TokenRegistry, period: Duration) {
        if tokens.ttl().is_none() {
            return;
        }

        tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);

            // Skip the first immediate tick
            interval.tick().await;

            loop {
                interval.tick().await;

                let count = tokens.purge_expired();
                if count > 0 {
                    tracing::info!(deleted_count = count, "Cleaned up expired tokens");
                } else {
                    tracing::debug!("No expired tokens to clean up");
                }
            }
        });
        tracing::info!("Token cleanup task started");
    }

    async fn bind(self) -> std::io::Result<(TcpListener, axum::Router)> {
        let tokens = self.app_state.tokens.clone();
        let router = create_router(self.app_state, self.cors);

        let listener = TcpListener::bind(self.addr).await?;
        Self::start_token_cleanup_task(tokens, self.cleanup_interval);

        tracing::info!("Web server listening on http://{}", listener.local_addr()?);
        Ok((listener, router))
    }

    /// Run the web server.
    pub async fn run(self) -> std::io::Result<()> {
        let (listener, router) = self.bind().await?;
        axum::serve(listener, router).await
    }

    /// Run the server in the background and return the actual bound address.
    ///
    /// This is useful for testing when binding to port 0.
    pub async fn run_with_addr(self) -> std::io::Result<SocketAddr> {
        let (listener, router) = self.bind().await?;
        let local_addr = listener.local_addr()?;

        tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, router).await {
                tracing::error!("Web server error: {}", e);
            }
        });

        Ok(local_addr)
    }
}
