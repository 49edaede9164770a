//
// Copyright 2026 The telscrub Authors. All Rights Reserved.
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//      http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//

//! The listener half of the adapter: binds a TCP socket, admits
//! connections up to the configured session limit, and hands each
//! accepted transport to the [`SessionManager`].

use crate::{
    Result, ServerConfig, ServerError, ServerMetrics, ServerSnapshot, SessionHandler,
    SessionManager,
};
use std::net::SocketAddr;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;
use tokio::net::TcpListener;
use tokio::sync::Notify;
use tokio::task::JoinHandle;

/// Telnet adapter server.
///
/// `new` binds the listener, `start` begins accepting, `shutdown` stops
/// accepting and winds the sessions down. Listener-level failures are
/// logged and counted, never propagated as a panic: one refused or broken
/// accept must not take the other sessions with it.
pub struct TelnetServer {
    config: ServerConfig,
    manager: Arc<SessionManager>,
    metrics: Arc<ServerMetrics>,
    // Shared with the accept-loop task.
    listener: Arc<tokio::sync::Mutex<TcpListener>>,
    // Resolved address, meaningful when the config said port 0.
    bind_address: SocketAddr,
    started_at: Instant,
    running: Arc<AtomicBool>,
    shutdown_notify: Arc<Notify>,
    accept_handle: Arc<tokio::sync::Mutex<Option<JoinHandle<()>>>>,
}

impl TelnetServer {
    /// Validate the configuration and bind the listener.
    ///
    /// No connection is accepted until [`TelnetServer::start`] is called.
    pub async fn new(config: ServerConfig) -> Result<Self> {
        config.validate().map_err(ServerError::Other)?;

        let listener = TcpListener::bind(config.bind_address).await?;
        let actual_addr = listener.local_addr()?;

        let metrics = Arc::new(ServerMetrics::new());
        let manager = Arc::new(SessionManager::new(
            metrics.clone(),
            config.max_input_length,
        ));

        tracing::info!("telnet adapter bound to {}", actual_addr);

        Ok(Self {
            config,
            manager,
            metrics,
            listener: Arc::new(tokio::sync::Mutex::new(listener)),
            bind_address: actual_addr,
            started_at: Instant::now(),
            running: Arc::new(AtomicBool::new(false)),
            shutdown_notify: Arc::new(Notify::new()),
            accept_handle: Arc::new(tokio::sync::Mutex::new(None)),
        })
    }

    /// Begin accepting connections, delivering session events to
    /// `handler`. Errors if the server is already running.
    pub async fn start(&self, handler: Arc<dyn SessionHandler>) -> Result<()> {
        if self.running.swap(true, Ordering::SeqCst) {
            return Err(ServerError::Other("server already running".to_string()));
        }

        tracing::info!("accepting connections on {}", self.bind_address);

        let handle = self.spawn_accept_loop(handler);
        *self.accept_handle.lock().await = Some(handle);

        Ok(())
    }

    fn spawn_accept_loop(&self, handler: Arc<dyn SessionHandler>) -> JoinHandle<()> {
        let listener = self.listener.clone();
        let manager = self.manager.clone();
        let metrics = self.metrics.clone();
        let config = self.config.clone();
        let running = self.running.clone();
        let shutdown_notify = self.shutdown_notify.clone();

        tokio::spawn(async move {
            while running.load(Ordering::SeqCst) {
                let accepted = tokio::select! {
                    result = async { listener.lock().await.accept().await } => result,
                    _ = shutdown_notify.notified() => break,
                };

                match accepted {
                    Ok((socket, peer_addr)) => {
                        tracing::debug!(peer = %peer_addr, "connection accepted");

                        if manager.session_count() >= config.max_sessions {
                            let err = ServerError::MaxSessionsReached(config.max_sessions);
                            tracing::warn!(peer = %peer_addr, %err, "connection refused");
                            metrics.accept_error();
                            drop(socket);
                            continue;
                        }

                        match manager.attach(socket, handler.clone()) {
                            Ok(session) => {
                                tracing::info!(
                                    session = %session.id(),
                                    peer = %peer_addr,
                                    "session established"
                                );
                            }
                            Err(err) => {
                                tracing::error!(%err, "session attach failed");
                                metrics.accept_error();
                            }
                        }
                    }
                    Err(err) => {
                        tracing::error!(%err, "accept failed");
                        metrics.accept_error();
                        // Brief pause so a persistent accept failure does
                        // not spin the loop.
                        tokio::time::sleep(std::time::Duration::from_millis(100)).await;
                    }
                }
            }

            tracing::info!("accept loop stopped");
        })
    }

    /// Stop accepting, then wind down live sessions: each is asked to end
    /// gracefully and forced down once `shutdown_timeout` elapses.
    pub async fn shutdown(&self) -> Result<()> {
        if !self.running.swap(false, Ordering::SeqCst) {
            return Err(ServerError::ServerNotRunning);
        }

        tracing::info!("shutdown requested");
        self.shutdown_notify.notify_waiters();

        if let Some(handle) = self.accept_handle.lock().await.take() {
            let _ = tokio::time::timeout(std::time::Duration::from_secs(5), handle).await;
        }

        self.manager.shutdown(self.config.shutdown_timeout).await;
        tracing::info!("shutdown complete");

        Ok(())
    }

    /// Whether the accept loop is currently active.
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// The resolved listen address.
    pub fn bind_address(&self) -> SocketAddr {
        self.bind_address
    }

    /// Number of live sessions.
    pub fn session_count(&self) -> usize {
        self.manager.session_count()
    }

    /// Point-in-time view of the server state.
    pub fn snapshot(&self) -> ServerSnapshot {
        ServerSnapshot {
            active_sessions: self.manager.session_count(),
            total_sessions: self.metrics.total_sessions(),
            bind_address: self.bind_address(),
            uptime: self.started_at.elapsed(),
            started_at: self.started_at,
        }
    }

    /// The server's metrics.
    pub fn metrics(&self) -> Arc<ServerMetrics> {
        self.metrics.clone()
    }

    /// The session registry.
    pub fn manager(&self) -> Arc<SessionManager> {
        self.manager.clone()
    }

    /// The configuration the server was built with.
    pub fn config(&self) -> &ServerConfig {
        &self.config
    }
}

impl std::fmt::Debug for TelnetServer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TelnetServer")
            .field("bind_address", &self.bind_address())
            .field("running", &self.is_running())
            .field("session_count", &self.session_count())
            .finish()
    }
}

impl Drop for TelnetServer {
    fn drop(&mut self) {
        // Best effort: a dropped server can no longer join its tasks, but
        // the accept loop must not outlive it.
        if self.running.swap(false, Ordering::SeqCst) {
            tracing::warn!("server dropped while running");
            self.shutdown_notify.notify_waiters();
        }
    }
}
