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

//! # telscrub Negotiation-Discarding Telnet Codec
//!
//! This crate provides the byte-level half of a minimal server-side Telnet
//! (RFC 854) stream adapter. It recognizes the option-negotiation grammar -
//! IAC-prefixed commands and subnegotiation blocks - exactly well enough to
//! remove it from inbound data. It never replies to a peer-initiated
//! negotiation and implements no option semantics.
//!
//! ## Overview
//!
//! Two layers:
//!
//! - [`scrub`]: pure, stateless-per-call transforms. [`scrub::scrub_line`]
//!   cleans one line-terminated slice of input, [`scrub::escape_iac`]
//!   doubles IAC bytes in outbound payloads, and
//!   [`scrub::encode_negotiation`] builds outbound command sequences.
//! - [`ScrubCodec`]: a [`tokio_util::codec`] `Decoder`/`Encoder` that owns
//!   the bounded line-accumulation buffer, detects terminators, and runs
//!   each completed line through the scrubber. Designed to sit in a
//!   `Framed` transport.
//!
//! ## Usage Example
//!
//! ```rust
//! use telscrub_codec::ScrubCodec;
//! use tokio_util::codec::Decoder;
//! use bytes::BytesMut;
//!
//! let mut codec = ScrubCodec::new();
//! // "hi", then IAC DO ECHO, then CRLF
//! let mut input = BytesMut::from(&[104, 105, 255, 253, 1, 13, 10][..]);
//! let line = codec.decode(&mut input).unwrap().unwrap();
//! assert_eq!(line.as_ref(), b"hi");
//! ```
//!
//! ## Malformed input
//!
//! The decoder is resilient by construction: truncated control sequences
//! and unterminated subnegotiation blocks are consumed without leaking
//! partial command bytes, and an inbound line that outgrows the configured
//! capacity is discarded and reported as [`CodecError::LineTooLong`]
//! rather than buffered past the limit.
//!
//! ## Thread Safety
//!
//! `ScrubCodec` is not thread-safe; each connection owns its own codec
//! instance.

#![warn(
    clippy::cargo,
    missing_docs,
    clippy::pedantic,
    future_incompatible,
    rust_2018_idioms
)]
#![allow(
    clippy::option_if_let_else,
    clippy::module_name_repetitions,
    clippy::missing_errors_doc
)]

mod codec;
pub mod consts;
mod options;
mod result;
pub mod scrub;

pub use self::codec::{DEFAULT_MAX_LINE_LENGTH, ScrubCodec};
pub use self::options::{OptionDisposition, OptionTable};
pub use self::result::{CodecError, CodecResult};
pub use self::scrub::{Negotiation, Verb};

#[cfg(test)]
mod tests {
    use super::{ScrubCodec, consts};
    use bytes::BytesMut;
    use tokio_util::codec::{Decoder, Encoder};

    #[tokio::test]
    async fn login_exchange_is_scrubbed() {
        let mut codec = ScrubCodec::new();
        let mut input_buffer = BytesMut::from(
            &[
                // Data
                b'L',
                b'o',
                b'g',
                b'i',
                b'n',
                b':',
                consts::CR,
                consts::LF,
                // Peer announces WILL NAWS mid-stream
                consts::IAC,
                consts::WILL,
                31,
                // Data
                b'g',
                b'u',
                b'e',
                b's',
                b't',
                consts::CR,
                consts::LF,
            ][..],
        );
        let first = codec.decode(&mut input_buffer).unwrap().unwrap();
        assert_eq!(first.as_ref(), b"Login:");
        let second = codec.decode(&mut input_buffer).unwrap().unwrap();
        assert_eq!(second.as_ref(), b"guest");
        assert_eq!(codec.decode(&mut input_buffer).unwrap(), None);
    }

    #[test]
    fn outbound_data_survives_iac() {
        let mut codec = ScrubCodec::new();
        let mut buffer = BytesMut::new();
        Encoder::<&[u8]>::encode(&mut codec, &[b'o', b'k', consts::IAC][..], &mut buffer).unwrap();
        assert_eq!(buffer.as_ref(), &[b'o', b'k', consts::IAC, consts::IAC]);
    }
}
