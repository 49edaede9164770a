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

//! Handler trait for the telscrub server
//!
//! The handler is both the upward application boundary (data and close
//! events) and the error sink: transport errors and protocol violations
//! are reported here instead of crashing the process.

use crate::{ConnectionId, ServerError, SessionHandle};
use async_trait::async_trait;
use bytes::Bytes;

/// Session event handler trait
///
/// Implement this trait to receive events from the server. All methods are
/// async and have default implementations that do nothing.
///
/// # Example
///
/// ```no_run
/// use telscrub_server::{ConnectionId, SessionHandle, SessionHandler};
/// use async_trait::async_trait;
/// use bytes::Bytes;
///
/// struct MyHandler;
///
/// #[async_trait]
/// impl SessionHandler for MyHandler {
///     async fn on_line(&self, id: ConnectionId, session: &SessionHandle, line: Bytes) {
///         // `line` is already cleaned of negotiation sequences.
///     }
/// }
/// ```
#[async_trait]
pub trait SessionHandler: Send + Sync + 'static {
    /// Called when a new session is attached to its transport, before any
    /// data events are delivered.
    async fn on_connect(&self, _id: ConnectionId, _session: &SessionHandle) {}

    /// Called once per complete inbound line, after negotiation sequences
    /// and the trailing terminator have been stripped.
    async fn on_line(&self, _id: ConnectionId, _session: &SessionHandle, _line: Bytes) {}

    /// Called when a transport error or protocol violation occurs.
    ///
    /// A protocol violation (oversized line) leaves the session running;
    /// a transport error is followed by the close path.
    async fn on_error(&self, _id: ConnectionId, _error: &ServerError) {}

    /// Called exactly once when the session reaches its terminal state,
    /// whether the peer closed, the application ended the session, or the
    /// transport failed.
    async fn on_close(&self, _id: ConnectionId) {}
}
