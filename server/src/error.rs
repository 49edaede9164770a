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

//! Error types for the telscrub server

use crate::types::ConnectionId;
use telscrub_codec::CodecError;
use thiserror::Error;

/// Result type for server operations
pub type Result<T> = std::result::Result<T, ServerError>;

/// Telnet adapter server error types
#[derive(Debug, Error)]
pub enum ServerError {
    /// I/O error from the underlying TCP stream
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Framing or capacity error from the codec layer
    #[error("protocol error: {0}")]
    Protocol(#[from] CodecError),

    /// Session with the given ID was not found
    #[error("session {0} not found")]
    SessionNotFound(ConnectionId),

    /// Server is not running
    #[error("server not running")]
    ServerNotRunning,

    /// Maximum number of sessions reached
    #[error("maximum sessions ({0}) reached")]
    MaxSessionsReached(usize),

    /// Generic error with a message
    #[error("{0}")]
    Other(String),
}

impl ServerError {
    /// Whether the error is a protocol violation the session survives
    /// (the offending line was discarded and processing continues).
    pub fn is_protocol_violation(&self) -> bool {
        matches!(
            self,
            ServerError::Protocol(CodecError::LineTooLong { .. })
        )
    }

    /// Whether the error comes from the transport rather than the peer's
    /// byte stream.
    pub fn is_transport_error(&self) -> bool {
        matches!(
            self,
            ServerError::Io(_) | ServerError::Protocol(CodecError::Io { .. })
        )
    }
}
