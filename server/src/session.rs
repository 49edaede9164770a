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

//! Per-connection session actor
//!
//! Each accepted transport gets exactly one [`Session`] running on its own
//! task. The session owns the framed transport (and with it the bounded
//! line buffer), the per-session option table, and the two-state lifecycle
//! machine. All interaction with a live session goes through
//! [`SessionHandle`] messages; inbound chunks are processed strictly
//! sequentially, so no two chunks of one session are ever handled
//! concurrently.

use crate::{ConnectionId, ServerError, SessionHandler, SessionState};
use bytes::Bytes;
use futures::{SinkExt, StreamExt};
use metrics::{counter, gauge};
use std::net::SocketAddr;
use std::sync::Arc;
use std::sync::atomic::{AtomicU8, Ordering};
use telscrub_codec::{
    CodecError, Negotiation, OptionDisposition, OptionTable, ScrubCodec, Verb, consts,
};
use tokio::net::TcpStream;
use tokio::select;
use tokio::sync::mpsc;
use tokio_util::codec::Framed;
use tracing::{debug, error, trace, warn};

/// Control channel depth per session.
const CONTROL_BUFFER_SIZE: usize = 32;

/// Control messages driving a session actor.
#[derive(Debug)]
pub enum SessionCommand {
    /// Escape and transmit a payload
    Write(Bytes),
    /// Flip the echo disposition and announce it to the peer
    ToggleEcho,
    /// Stop polling the inbound half (backpressure pass-through)
    Pause,
    /// Resume polling the inbound half
    Resume,
    /// Flush outbound data and close the write half gracefully
    End,
    /// Tear the session down immediately
    Destroy,
}

/// Clonable handle to a live session.
///
/// Every operation is a message to the session's task. Operations on a
/// session that has already closed are no-ops, not errors: the transport
/// is gone and there is nothing useful to report.
#[derive(Clone)]
pub struct SessionHandle {
    id: ConnectionId,
    peer_addr: SocketAddr,
    control_tx: mpsc::Sender<SessionCommand>,
    state: Arc<AtomicU8>,
}

impl SessionHandle {
    /// The session's identifier.
    pub fn id(&self) -> ConnectionId {
        self.id
    }

    /// The peer's socket address.
    pub fn peer_addr(&self) -> SocketAddr {
        self.peer_addr
    }

    /// Current lifecycle state.
    pub fn state(&self) -> SessionState {
        SessionState::from_u8(self.state.load(Ordering::Acquire))
    }

    /// Whether the session has reached its terminal state.
    pub fn is_closed(&self) -> bool {
        self.state().is_closed()
    }

    /// Escape and transmit a raw payload. Embedded IAC bytes are doubled
    /// so they survive transmission as data.
    pub async fn write(&self, payload: impl Into<Bytes>) {
        if self.is_closed() {
            return;
        }
        // A send failure means the session closed underneath us; also a no-op.
        let _ = self
            .control_tx
            .send(SessionCommand::Write(payload.into()))
            .await;
    }

    /// Flip the echo disposition and announce it to the peer.
    pub async fn toggle_echo(&self) {
        if self.is_closed() {
            return;
        }
        let _ = self.control_tx.send(SessionCommand::ToggleEcho).await;
    }

    /// Stop polling the inbound half of the transport.
    pub async fn pause(&self) {
        let _ = self.control_tx.send(SessionCommand::Pause).await;
    }

    /// Resume polling the inbound half of the transport.
    pub async fn resume(&self) {
        let _ = self.control_tx.send(SessionCommand::Resume).await;
    }

    /// Gracefully end the session: flush outbound data and close.
    pub async fn end(&self) {
        let _ = self.control_tx.send(SessionCommand::End).await;
    }

    /// Tear the session down immediately without flushing.
    pub async fn destroy(&self) {
        let _ = self.control_tx.send(SessionCommand::Destroy).await;
    }
}

impl std::fmt::Debug for SessionHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionHandle")
            .field("id", &self.id)
            .field("peer_addr", &self.peer_addr)
            .field("state", &self.state())
            .finish()
    }
}

/// Session actor owning one framed transport.
pub struct Session {
    id: ConnectionId,
    framed: Framed<TcpStream, ScrubCodec>,
    options: OptionTable,
    handler: Arc<dyn SessionHandler>,
    control_rx: mpsc::Receiver<SessionCommand>,
    handle: SessionHandle,
    paused: bool,
}

impl Session {
    /// Bind a session to an accepted transport.
    ///
    /// Initializes the bounded line buffer at `max_input_length` and the
    /// default option table (echo enabled). The session does not process
    /// anything until [`Session::run`] is spawned.
    pub fn attach(
        socket: TcpStream,
        id: ConnectionId,
        max_input_length: usize,
        handler: Arc<dyn SessionHandler>,
    ) -> crate::Result<(Session, SessionHandle)> {
        let peer_addr = socket.peer_addr()?;
        let framed = Framed::new(socket, ScrubCodec::with_max_line_length(max_input_length));
        let (control_tx, control_rx) = mpsc::channel(CONTROL_BUFFER_SIZE);
        let state = Arc::new(AtomicU8::new(SessionState::Attached.as_u8()));

        let handle = SessionHandle {
            id,
            peer_addr,
            control_tx,
            state,
        };

        debug!(session = %id, peer = %peer_addr, "session attached");

        let session = Session {
            id,
            framed,
            options: OptionTable::new(),
            handler,
            control_rx,
            handle: handle.clone(),
            paused: false,
        };

        Ok((session, handle))
    }

    /// Run the session until its transport closes or it is torn down.
    pub async fn run(mut self) {
        counter!("telscrub.sessions.opened").increment(1);
        gauge!("telscrub.sessions.active").increment(1.0);

        self.handler.on_connect(self.id, &self.handle).await;
        self.event_loop().await;
        self.close().await;
    }

    async fn event_loop(&mut self) {
        loop {
            select! {
                inbound = self.framed.next(), if !self.paused => {
                    match inbound {
                        Some(Ok(line)) => {
                            trace!(session = %self.id, len = line.len(), "line received");
                            counter!("telscrub.lines.received").increment(1);
                            self.handler.on_line(self.id, &self.handle, line).await;
                        }
                        Some(Err(err @ CodecError::LineTooLong { .. })) => {
                            // The codec already discarded the oversized
                            // partial line; the session keeps running.
                            counter!("telscrub.errors.protocol").increment(1);
                            warn!(session = %self.id, %err, "protocol violation");
                            self.handler
                                .on_error(self.id, &ServerError::Protocol(err))
                                .await;
                        }
                        Some(Err(err)) => {
                            counter!("telscrub.errors.transport").increment(1);
                            error!(session = %self.id, %err, "transport error");
                            self.handler
                                .on_error(self.id, &ServerError::Protocol(err))
                                .await;
                            // The transport is unusable after an I/O
                            // failure; the close path follows.
                            return;
                        }
                        None => {
                            debug!(session = %self.id, "transport closed by peer");
                            return;
                        }
                    }
                }
                cmd = self.control_rx.recv() => {
                    match cmd {
                        Some(SessionCommand::Write(payload)) => {
                            if let Err(err) = self.framed.send(payload).await {
                                counter!("telscrub.errors.transport").increment(1);
                                error!(session = %self.id, %err, "write failed");
                                self.handler
                                    .on_error(self.id, &ServerError::Protocol(err))
                                    .await;
                                return;
                            }
                        }
                        Some(SessionCommand::ToggleEcho) => {
                            if let Err(err) = self.toggle_echo().await {
                                counter!("telscrub.errors.transport").increment(1);
                                error!(session = %self.id, %err, "echo toggle failed");
                                self.handler
                                    .on_error(self.id, &ServerError::Protocol(err))
                                    .await;
                                return;
                            }
                        }
                        Some(SessionCommand::Pause) => {
                            trace!(session = %self.id, "inbound paused");
                            self.paused = true;
                        }
                        Some(SessionCommand::Resume) => {
                            trace!(session = %self.id, "inbound resumed");
                            self.paused = false;
                        }
                        Some(SessionCommand::End) => {
                            debug!(session = %self.id, "graceful end requested");
                            // The codec has several Encoder impls; close
                            // needs an explicit item type.
                            let _ = SinkExt::<Bytes>::close(&mut self.framed).await;
                            return;
                        }
                        Some(SessionCommand::Destroy) => {
                            debug!(session = %self.id, "session destroyed");
                            return;
                        }
                        None => return,
                    }
                }
            }
        }
    }

    /// Flip the echo disposition and announce it.
    ///
    /// Echo `Enabled` means the peer reflects its own typed input; turning
    /// it off makes this side claim echo ownership (`WILL ECHO`), which is
    /// how input hiding works on real clients. Either way the peer is told
    /// `DONT ECHO`: the adapter owns all echo behavior and never lets the
    /// remote side echo for us.
    async fn toggle_echo(&mut self) -> Result<(), CodecError> {
        let disposition = self.options.toggle(consts::option::ECHO);
        let verb = match disposition {
            OptionDisposition::Enabled => Verb::Wont,
            _ => Verb::Will,
        };
        debug!(session = %self.id, ?disposition, "toggling echo");
        self.framed
            .send(Negotiation {
                verb,
                option: consts::option::ECHO,
            })
            .await?;
        self.framed
            .send(Negotiation {
                verb: Verb::Dont,
                option: consts::option::ECHO,
            })
            .await?;
        Ok(())
    }

    /// Transition to the terminal state and emit the close event exactly
    /// once. Only the session task itself drives this transition.
    async fn close(mut self) {
        self.handle
            .state
            .store(SessionState::Closed.as_u8(), Ordering::Release);
        gauge!("telscrub.sessions.active").decrement(1.0);
        debug!(session = %self.id, "session closed");
        self.handler.on_close(self.id).await;

        // Drain any control messages that raced the close.
        while self.control_rx.try_recv().is_ok() {}
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("id", &self.id)
            .field("paused", &self.paused)
            .finish()
    }
}
