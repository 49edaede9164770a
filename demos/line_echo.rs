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

//! Line echo demo.
//!
//! Connect with a telnet client (`telnet 127.0.0.1 2323`) and type lines.
//! Every line is echoed back with negotiation sequences already stripped.
//! Type `secret` to toggle echo off and on, `quit` to end the session.

use async_trait::async_trait;
use bytes::Bytes;
use std::sync::Arc;
use telscrub_server::{ConnectionId, ServerConfig, SessionHandle, SessionHandler, TelnetServer};

struct LineEcho;

#[async_trait]
impl SessionHandler for LineEcho {
    async fn on_connect(&self, id: ConnectionId, session: &SessionHandle) {
        tracing::info!("session {} connected from {}", id, session.peer_addr());
        session
            .write(Bytes::from_static(b"Welcome. Lines are echoed back.\r\n"))
            .await;
    }

    async fn on_line(&self, id: ConnectionId, session: &SessionHandle, line: Bytes) {
        match line.as_ref() {
            b"quit" => {
                session.write(Bytes::from_static(b"Goodbye.\r\n")).await;
                session.end().await;
            }
            b"secret" => {
                session
                    .write(Bytes::from_static(b"Toggling echo.\r\n"))
                    .await;
                session.toggle_echo().await;
            }
            _ => {
                tracing::debug!("session {} sent {} bytes", id, line.len());
                session.write(Bytes::from_static(b"> ")).await;
                session.write(line).await;
                session.write(Bytes::from_static(b"\r\n")).await;
            }
        }
    }

    async fn on_close(&self, id: ConnectionId) {
        tracing::info!("session {} closed", id);
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();

    let config = ServerConfig::new("127.0.0.1:2323".parse()?);
    let server = TelnetServer::new(config).await?;
    server.start(Arc::new(LineEcho)).await?;
    tracing::info!("listening on {}", server.bind_address());

    tokio::signal::ctrl_c().await?;
    server.shutdown().await?;
    Ok(())
}
