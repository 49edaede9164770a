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

//! Server configuration

use std::net::SocketAddr;
use std::time::Duration;
use telscrub_codec::DEFAULT_MAX_LINE_LENGTH;

/// Server configuration
///
/// This structure contains all configuration options for the adapter
/// server. Use the builder pattern methods to customize the configuration.
///
/// The core enforces no read or idle timeouts: a session closes when its
/// transport closes. Idle-connection policy, if desired, belongs to the
/// application.
///
/// # Example
///
/// ```
/// use telscrub_server::ServerConfig;
///
/// let config = ServerConfig::default()
///     .with_max_sessions(500)
///     .with_max_input_length(1024);
/// ```
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address to bind the server to
    pub bind_address: SocketAddr,

    /// Maximum number of concurrent sessions
    pub max_sessions: usize,

    /// Inbound line capacity per session in bytes
    ///
    /// A partial line exceeding this length before its terminator arrives
    /// is discarded and reported as a protocol violation.
    pub max_input_length: usize,

    /// Timeout for graceful shutdown
    ///
    /// The server will wait this long for sessions to close gracefully
    /// before forcing them to close.
    pub shutdown_timeout: Duration,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: "127.0.0.1:23".parse().unwrap(),
            max_sessions: 1000,
            max_input_length: DEFAULT_MAX_LINE_LENGTH,
            shutdown_timeout: Duration::from_secs(30),
        }
    }
}

impl ServerConfig {
    /// Create a new configuration with the given bind address
    ///
    /// All other settings will use their default values.
    pub fn new(bind_address: SocketAddr) -> Self {
        Self {
            bind_address,
            ..Default::default()
        }
    }

    /// Set the maximum number of concurrent sessions
    pub fn with_max_sessions(mut self, max: usize) -> Self {
        self.max_sessions = max;
        self
    }

    /// Set the per-session inbound line capacity
    pub fn with_max_input_length(mut self, length: usize) -> Self {
        self.max_input_length = length;
        self
    }

    /// Set the shutdown timeout duration
    pub fn with_shutdown_timeout(mut self, timeout: Duration) -> Self {
        self.shutdown_timeout = timeout;
        self
    }

    /// Validate the configuration
    ///
    /// Returns an error if the configuration is invalid.
    pub fn validate(&self) -> Result<(), String> {
        if self.max_sessions == 0 {
            return Err("max_sessions must be greater than 0".to_string());
        }

        if self.max_input_length == 0 {
            return Err("max_input_length must be greater than 0".to_string());
        }

        if self.shutdown_timeout.is_zero() {
            return Err("shutdown_timeout must be greater than 0".to_string());
        }

        Ok(())
    }
}
