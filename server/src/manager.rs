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

//! Session registry
//!
//! The SessionManager is responsible for:
//! - Assigning connection IDs and spawning session actors
//! - Tracking all live sessions
//! - Graceful shutdown coordination

use crate::{
    ConnectionId, Result, ServerError, ServerMetrics, Session, SessionHandle, SessionHandler,
};
use dashmap::DashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};
use tokio::net::TcpStream;
use tracing::{debug, info, warn};

/// Tracked session entry.
struct ManagedSession {
    handle: SessionHandle,
    created_at: Instant,
}

/// Registry of live sessions.
///
/// Entries unregister themselves when their session task exits, so the
/// map always reflects the set of sessions that can still receive
/// commands.
pub struct SessionManager {
    /// Live sessions (lock-free concurrent map)
    sessions: Arc<DashMap<ConnectionId, ManagedSession>>,
    /// Next connection ID (monotonically increasing)
    next_id: AtomicU64,
    /// Server metrics
    metrics: Arc<ServerMetrics>,
    /// Per-session inbound line capacity
    max_input_length: usize,
}

impl SessionManager {
    /// Create a new manager.
    pub fn new(metrics: Arc<ServerMetrics>, max_input_length: usize) -> Self {
        Self {
            sessions: Arc::new(DashMap::new()),
            next_id: AtomicU64::new(0),
            metrics,
            max_input_length,
        }
    }

    /// Attach an accepted transport as a new session and spawn its actor.
    pub fn attach(
        &self,
        socket: TcpStream,
        handler: Arc<dyn SessionHandler>,
    ) -> Result<SessionHandle> {
        let id = ConnectionId::new(self.next_id.fetch_add(1, Ordering::Relaxed) + 1);
        let (session, handle) = Session::attach(socket, id, self.max_input_length, handler)?;

        let created_at = Instant::now();
        self.sessions.insert(
            id,
            ManagedSession {
                handle: handle.clone(),
                created_at,
            },
        );
        self.metrics.session_opened();

        let sessions = self.sessions.clone();
        let metrics = self.metrics.clone();
        tokio::spawn(async move {
            session.run().await;
            sessions.remove(&id);
            metrics.session_closed(created_at.elapsed());
            debug!(session = %id, "session unregistered");
        });

        Ok(handle)
    }

    /// Number of live sessions.
    pub fn session_count(&self) -> usize {
        self.sessions.len()
    }

    /// Handle for a live session, if any.
    pub fn get(&self, id: ConnectionId) -> Option<SessionHandle> {
        self.sessions.get(&id).map(|entry| entry.handle.clone())
    }

    /// Gracefully end one session.
    pub async fn disconnect(&self, id: ConnectionId) -> Result<()> {
        match self.get(id) {
            Some(handle) => {
                handle.end().await;
                Ok(())
            }
            None => Err(ServerError::SessionNotFound(id)),
        }
    }

    /// Gracefully shut down all sessions, forcing teardown of any that
    /// outlive `timeout`.
    pub async fn shutdown(&self, timeout: Duration) {
        let handles: Vec<SessionHandle> = self
            .sessions
            .iter()
            .map(|entry| entry.handle.clone())
            .collect();
        info!(sessions = handles.len(), "shutting down sessions");

        for handle in &handles {
            handle.end().await;
        }

        let deadline = Instant::now() + timeout;
        while self.session_count() > 0 && Instant::now() < deadline {
            tokio::time::sleep(Duration::from_millis(10)).await;
        }

        if self.session_count() > 0 {
            warn!(
                remaining = self.session_count(),
                "forcing teardown of sessions that did not close in time"
            );
            let stragglers: Vec<SessionHandle> = self
                .sessions
                .iter()
                .map(|entry| entry.handle.clone())
                .collect();
            for handle in &stragglers {
                handle.destroy().await;
            }
        }
    }
}

impl std::fmt::Debug for SessionManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionManager")
            .field("sessions", &self.session_count())
            .finish()
    }
}
