//! TCP accept loop
//!
//! Spawns one task per client connection, bounded by a connection limit.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tokio::io::AsyncWriteExt;
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::Semaphore;
use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;
use tracing::{debug, info, warn};

use crate::cache::Cache;
use crate::config::Config;
use crate::error::{ProtocolError, Result, ServerError};
use crate::protocol::Reply;

/// Pause before retrying after a failed `accept`
const ACCEPT_BACKOFF: Duration = Duration::from_millis(100);

// == Server ==
/// Listening half of the cache server.
#[derive(Debug)]
pub struct Server {
    listener: TcpListener,
    cache: Arc<Cache>,
    connections: Arc<Semaphore>,
    max_line_length: usize,
}

impl Server {
    /// Binds the listening socket.
    ///
    /// The connection and line limits start at the `Config::default()` values
    /// and ignore the environment; use [`Server::from_config`] or the builder
    /// methods to apply other limits.
    pub async fn bind(addr: SocketAddr, cache: Arc<Cache>) -> Result<Self> {
        let listener = TcpListener::bind(addr)
            .await
            .map_err(|source| ServerError::Bind { addr, source })?;
        let defaults = Config::default();

        Ok(Self {
            listener,
            cache,
            connections: Arc::new(Semaphore::new(defaults.max_connections)),
            max_line_length: defaults.max_line_length,
        })
    }

    /// Binds using the port and limits from `config`.
    pub async fn from_config(config: &Config, cache: Arc<Cache>) -> Result<Self> {
        let addr = SocketAddr::from(([0, 0, 0, 0], config.server_port));
        Ok(Self::bind(addr, cache)
            .await?
            .max_connections(config.max_connections)
            .max_line_length(config.max_line_length))
    }

    /// Caps the number of simultaneously served clients.
    pub fn max_connections(mut self, limit: usize) -> Self {
        self.connections = Arc::new(Semaphore::new(limit));
        self
    }

    pub fn max_line_length(mut self, limit: usize) -> Self {
        self.max_line_length = limit;
        self
    }

    pub fn local_addr(&self) -> Result<SocketAddr> {
        Ok(self.listener.local_addr()?)
    }

    /// Accepts clients until `shutdown` is cancelled, then waits for every
    /// connection task to finish.
    pub async fn run(self, shutdown: CancellationToken) -> Result<()> {
        let tracker = TaskTracker::new();
        info!("Cache server listening on {}", self.local_addr()?);

        loop {
            let accepted = tokio::select! {
                _ = shutdown.cancelled() => break,
                accepted = self.listener.accept() => accepted,
            };

            let (stream, peer) = match accepted {
                Ok(pair) => pair,
                Err(err) => {
                    // Transient (e.g. EMFILE); keep serving existing clients
                    warn!("accept failed: {}", err);
                    if backoff(&shutdown).await {
                        break;
                    }
                    continue;
                }
            };

            let Ok(permit) = Arc::clone(&self.connections).try_acquire_owned() else {
                warn!(%peer, "connection limit reached, rejecting client");
                tracker.spawn(reject(stream));
                continue;
            };

            debug!(%peer, "client connected");
            let cache = Arc::clone(&self.cache);
            let token = shutdown.child_token();
            let max_line_length = self.max_line_length;

            tracker.spawn(async move {
                super::serve_connection(stream, peer, &cache, max_line_length, token).await;
                drop(permit);
            });
        }

        tracker.close();
        debug!(active = tracker.len(), "waiting for connections to close");
        tracker.wait().await;
        info!("Cache server stopped accepting connections");
        Ok(())
    }
}

async fn reject(mut stream: TcpStream) {
    let line = Reply::Error(ProtocolError::TooManyConnections).to_line();
    let _ = stream.write_all(line.as_bytes()).await;
    let _ = stream.shutdown().await;
}

/// Sleeps for `ACCEPT_BACKOFF`; returns true if `shutdown` fired first.
async fn backoff(shutdown: &CancellationToken) -> bool {
    tokio::select! {
        _ = shutdown.cancelled() => true,
        _ = tokio::time::sleep(ACCEPT_BACKOFF) => false,
    }
}
