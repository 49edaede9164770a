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

//! Pure transforms between wire bytes and application bytes.
//!
//! Nothing in this module retains state across calls. The scrubber
//! recognizes the negotiation grammar only well enough to remove it from
//! the stream; it never answers a peer-initiated WILL/WONT/DO/DONT and it
//! never inspects subnegotiation payloads.

use crate::consts;
use bytes::{BufMut, Bytes, BytesMut};
use tracing::trace;

/// Outbound negotiation verbs.
///
/// The adapter itself only ever announces its own echo disposition and
/// forbids client-side echo, but the encoder accepts the full verb set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verb {
    /// Offer to enable an option locally (`WILL`).
    Will,
    /// Announce an option is disabled locally (`WONT`).
    Wont,
    /// Request the peer enable an option (`DO`).
    Do,
    /// Demand the peer disable an option (`DONT`).
    Dont,
}

impl Verb {
    /// The wire byte for this verb.
    pub fn as_byte(self) -> u8 {
        match self {
            Verb::Will => consts::WILL,
            Verb::Wont => consts::WONT,
            Verb::Do => consts::DO,
            Verb::Dont => consts::DONT,
        }
    }
}

/// A single outbound negotiation command, routed through the encoder
/// verbatim (command bytes are never IAC-escaped).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Negotiation {
    /// Negotiation verb
    pub verb: Verb,
    /// Option code the verb applies to
    pub option: u8,
}

/// Remove all negotiation sequences from one line-terminated slice of
/// input and trim the trailing terminator.
///
/// The scan classifies each byte as plain data or part of a control
/// sequence:
///
/// - `IAC WILL/WONT/DO/DONT <option>`: three bytes discarded, never
///   answered.
/// - `IAC SB … IAC SE`: the whole block discarded. The block ends at the
///   two-byte `IAC SE` pair; a doubled `IAC IAC` inside the block is
///   escaped payload and does not terminate it. A lone `SE` data byte
///   inside the block is payload, not a terminator.
/// - `IAC IAC`: an escaped data byte; the literal 255 is restored to the
///   output.
/// - `IAC <anything else>`: a two-byte command, discarded.
///
/// A sequence that is still open when the input ends (bare trailing `IAC`,
/// a verb without its option byte, an unterminated `SB` block) is consumed
/// to the end of the input so no partial command bytes leak into the
/// cleaned output.
pub fn scrub_line(input: &[u8]) -> Bytes {
    // The trailing terminator (LF, CR, or a CRLF pair) is framing, not data.
    let mut end = input.len();
    if end > 0 && input[end - 1] == consts::LF {
        end -= 1;
    }
    if end > 0 && input[end - 1] == consts::CR {
        end -= 1;
    }
    let input = &input[..end];

    let mut out = BytesMut::with_capacity(input.len());
    let mut i = 0;
    while i < input.len() {
        let byte = input[i];
        if byte != consts::IAC {
            out.put_u8(byte);
            i += 1;
            continue;
        }
        match input.get(i + 1) {
            None => {
                trace!("truncated control sequence at end of line");
                break;
            }
            Some(&consts::IAC) => {
                out.put_u8(consts::IAC);
                i += 2;
            }
            Some(&(consts::WILL | consts::WONT | consts::DO | consts::DONT)) => {
                trace!(verb = input[i + 1], "discarding negotiation sequence");
                i += 3;
            }
            Some(&consts::SB) => {
                i = skip_subnegotiation(input, i + 2);
            }
            Some(_) => {
                i += 2;
            }
        }
    }
    out.freeze()
}

/// Advance past a subnegotiation block whose payload starts at `i` (the
/// byte after `IAC SB`), returning the index just past the closing
/// `IAC SE`. A block that never terminates is consumed to the end of the
/// input.
fn skip_subnegotiation(input: &[u8], mut i: usize) -> usize {
    while i < input.len() {
        if input[i] != consts::IAC {
            i += 1;
            continue;
        }
        match input.get(i + 1) {
            Some(&consts::SE) => return i + 2,
            // IAC IAC is escaped payload; IAC followed by any other byte
            // is malformed but stays inside the block.
            Some(_) => i += 2,
            None => break,
        }
    }
    trace!("unterminated subnegotiation block consumed to end of line");
    input.len()
}

/// Build an outbound negotiation sequence `[IAC, verb, option…]`.
///
/// `option` is appended verbatim, so a caller may pass a single option
/// code or a longer byte sequence. Pure; the caller transmits the result.
pub fn encode_negotiation(verb: Verb, option: &[u8]) -> Bytes {
    let mut out = BytesMut::with_capacity(2 + option.len());
    out.put_u8(consts::IAC);
    out.put_u8(verb.as_byte());
    out.put_slice(option);
    out.freeze()
}

/// Escape a raw outbound payload by doubling every IAC byte so a literal
/// 255 data byte is not misread as a command introducer by the peer.
pub fn escape_iac(payload: &[u8]) -> Bytes {
    let mut out = BytesMut::with_capacity(payload.len() + 1);
    for &byte in payload {
        if byte == consts::IAC {
            out.put_u8(consts::IAC);
        }
        out.put_u8(byte);
    }
    out.freeze()
}
