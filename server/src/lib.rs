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

//! # telscrub-server
//!
//! Server-side Telnet stream adapter built on [`telscrub-codec`](telscrub_codec).
//!
//! The server accepts TCP connections and wraps each one in a session
//! actor that strips inbound negotiation sequences, delivers complete
//! lines to a [`SessionHandler`], and escapes outbound payloads so they
//! survive the Telnet command channel.
//!
//! ## Architecture
//!
//! - [`TelnetServer`] - owns the listener and the accept loop
//! - [`SessionManager`] - registry of live sessions
//! - [`Session`] / [`SessionHandle`] - one actor per connection plus the
//!   cloneable handle applications use to write, toggle echo, pause
//!   delivery, and end the session
//! - [`SessionHandler`] - application callback trait for connect, line,
//!   error, and close events
//!
//! ## Example
//!
//! ```no_run
//! use telscrub_server::{
//!     ConnectionId, ServerConfig, SessionHandle, SessionHandler, TelnetServer,
//! };
//! use async_trait::async_trait;
//! use bytes::Bytes;
//! use std::sync::Arc;
//!
//! struct EchoHandler;
//!
//! #[async_trait]
//! impl SessionHandler for EchoHandler {
//!     async fn on_line(&self, _id: ConnectionId, session: &SessionHandle, line: Bytes) {
//!         session.write(line).await;
//!         session.write(Bytes::from_static(b"\r\n")).await;
//!     }
//! }
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ServerConfig::new("127.0.0.1:2323".parse()?);
//!     let server = TelnetServer::new(config).await?;
//!     server.start(Arc::new(EchoHandler)).await?;
//!     tokio::signal::ctrl_c().await?;
//!     server.shutdown().await?;
//!     Ok(())
//! }
//! ```

#![warn(clippy::cargo)]
#![warn(missing_docs)]
#![warn(clippy::pedantic)]
#![warn(future_incompatible)]
#![warn(rust_2018_idioms)]
#![allow(clippy::option_if_let_else)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]

mod config;
mod error;
mod handler;
mod manager;
mod metrics;
mod server;
mod session;
mod types;

pub use crate::config::ServerConfig;
pub use crate::error::{Result, ServerError};
pub use crate::handler::SessionHandler;
pub use crate::manager::SessionManager;
pub use crate::metrics::{MetricsSnapshot, ServerMetrics};
pub use crate::server::TelnetServer;
pub use crate::session::{Session, SessionHandle};
pub use crate::types::{ConnectionId, ServerSnapshot, SessionState};
