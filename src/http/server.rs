//! HTTP server implementation.

use std::future::Future;
use std::net::SocketAddr;
use std::time::Duration;
use tokio::net::TcpListener;
use tracing::{error, info};

use super::state::AppState;
use crate::error::{BiblioError, Result};

/// Default period between idle-window eviction sweeps.
const DEFAULT_EVICTION_INTERVAL: Duration = Duration::from_secs(60);

/// HTTP server for the books API.
///
/// Owns the background eviction task of the rate limiter for as long as it
/// serves.
pub struct HttpServer {
    /// Address to bind to
    addr: SocketAddr,
    /// Shared application state
    state: AppState,
    /// Period between eviction sweeps
    eviction_interval: Duration,
}

impl HttpServer {
    /// Create a new HTTP server.
    pub fn new(addr: SocketAddr, state: AppState) -> Self {
        Self {
            addr,
            state,
            eviction_interval: DEFAULT_EVICTION_INTERVAL,
        }
    }

    /// Set how often idle rate limit windows are evicted.
    pub fn with_eviction_interval(mut self, interval: Duration) -> Self {
        self.eviction_interval = interval;
        self
    }

    /// Start the HTTP server.
    ///
    /// This method will block until the server fails.
    pub async fn serve(self) -> Result<()> {
        self.serve_with_shutdown(std::future::pending()).await
    }

    /// Start the HTTP server with graceful shutdown.
    ///
    /// The server will shut down when the provided signal resolves.
    pub async fn serve_with_shutdown<F>(self, signal: F) -> Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let listener = TcpListener::bind(self.addr).await?;
        let local_addr = listener.local_addr()?;

        let eviction = self
            .state
            .limiter
            .clone()
            .spawn_eviction(self.state.clock.clone(), self.eviction_interval);

        info!(
            addr = %local_addr,
            limit = self.state.policy.capacity(),
            window = ?self.state.policy.window(),
            "Starting HTTP server"
        );

        let result = axum::serve(listener, super::router(self.state))
            .with_graceful_shutdown(signal)
            .await
            .map_err(|e| {
                error!(error = %e, "HTTP server failed");
                BiblioError::Server(e.to_string())
            });

        eviction.abort();
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BiblioConfig;

    #[tokio::test]
    async fn test_server_stops_on_signal() {
        let state = AppState::from_config(&BiblioConfig::default()).unwrap();
        let addr: SocketAddr = "127.0.0.1:0".parse().unwrap();

        let result = HttpServer::new(addr, state)
            .with_eviction_interval(Duration::from_millis(10))
            .serve_with_shutdown(async {})
            .await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_bind_failure_is_io_error() {
        let taken = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = taken.local_addr().unwrap();
        let state = AppState::from_config(&BiblioConfig::default()).unwrap();

        let result = HttpServer::new(addr, state).serve_with_shutdown(async {}).await;
        assert!(matches!(result, Err(BiblioError::Io(_))));
    }
}
