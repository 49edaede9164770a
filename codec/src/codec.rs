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

use crate::consts;
use crate::result::{CodecError, CodecResult};
use crate::scrub::{self, Negotiation};
use bytes::{Buf, BufMut, Bytes, BytesMut};
use tokio_util::codec::{Decoder, Encoder};
use tracing::{debug, warn};

/// Default inbound line capacity in bytes.
pub const DEFAULT_MAX_LINE_LENGTH: usize = 512;

/// Line-framing codec that scrubs Telnet negotiation from inbound data.
///
/// Inbound bytes accumulate in the framing buffer until a line terminator
/// (CR, LF, or a CRLF pair) arrives; the completed line is then handed to
/// [`scrub::scrub_line`] and the cleaned bytes are yielded as one decoded
/// item. All complete lines buffered at once are drained, one item per
/// `decode` call.
///
/// The accumulation buffer is bounded: any line longer than
/// `max_line_length` is discarded and reported as
/// [`CodecError::LineTooLong`], whether its terminator is still in
/// flight or already sitting in the buffer. The capacity is never
/// exceeded and the decoder resynchronizes at the next terminator.
///
/// Outbound payloads are escaped through [`scrub::escape_iac`]; outbound
/// [`Negotiation`] commands are emitted verbatim.
#[derive(Debug, Clone)]
pub struct ScrubCodec {
    max_line_length: usize,
    /// Skipping an oversized line until its terminator shows up.
    discarding: bool,
    /// The previous line ended in CR at the very end of a read; an LF at
    /// the head of the next read belongs to that line.
    last_was_cr: bool,
}

impl ScrubCodec {
    /// Create a codec with the default line capacity.
    pub fn new() -> Self {
        Self::with_max_line_length(DEFAULT_MAX_LINE_LENGTH)
    }

    /// Create a codec with an explicit line capacity.
    ///
    /// # Panics
    /// Panics if `max_line_length` is zero.
    pub fn with_max_line_length(max_line_length: usize) -> Self {
        assert!(max_line_length > 0, "max_line_length must be positive");
        Self {
            max_line_length,
            discarding: false,
            last_was_cr: false,
        }
    }

    /// The configured line capacity.
    pub fn max_line_length(&self) -> usize {
        self.max_line_length
    }

    fn find_terminator(src: &[u8]) -> Option<usize> {
        src.iter()
            .position(|&b| b == consts::CR || b == consts::LF)
    }
}

impl Default for ScrubCodec {
    fn default() -> Self {
        Self::new()
    }
}

impl Decoder for ScrubCodec {
    type Item = Bytes;
    type Error = CodecError;

    fn decode(&mut self, src: &mut BytesMut) -> CodecResult<Option<Bytes>> {
        loop {
            if self.last_was_cr {
                if src.first() == Some(&consts::LF) {
                    src.advance(1);
                }
                self.last_was_cr = false;
            }
            if self.discarding {
                match Self::find_terminator(src) {
                    Some(at) => {
                        let terminator = src[at];
                        let mut skip = at + 1;
                        if terminator == consts::CR {
                            match src.get(at + 1) {
                                Some(&consts::LF) => skip += 1,
                                Some(_) => {}
                                None => self.last_was_cr = true,
                            }
                        }
                        src.advance(skip);
                        self.discarding = false;
                        debug!("oversized line fully discarded, resuming");
                        continue;
                    }
                    None => {
                        src.clear();
                        return Ok(None);
                    }
                }
            }
            // The search is capped at capacity + 1 bytes: a terminator
            // past that point cannot close a valid line, no matter when
            // it arrived.
            let window = src.len().min(self.max_line_length + 1);
            let pos = Self::find_terminator(&src[..window]);
            return match pos {
                Some(at) => {
                    let mut take = at + 1;
                    if src[at] == consts::CR {
                        match src.get(at + 1) {
                            Some(&consts::LF) => take += 1,
                            Some(_) => {}
                            None => self.last_was_cr = true,
                        }
                    }
                    let line = src.split_to(take);
                    Ok(Some(scrub::scrub_line(&line)))
                }
                None => {
                    if src.len() > self.max_line_length {
                        // The oversized line's own terminator may already
                        // be buffered further out; skipping through it
                        // keeps the next line intact.
                        let length;
                        match Self::find_terminator(src) {
                            Some(at) => {
                                length = at;
                                let mut skip = at + 1;
                                if src[at] == consts::CR {
                                    match src.get(at + 1) {
                                        Some(&consts::LF) => skip += 1,
                                        Some(_) => {}
                                        None => self.last_was_cr = true,
                                    }
                                }
                                src.advance(skip);
                            }
                            None => {
                                length = src.len();
                                src.clear();
                                self.discarding = true;
                            }
                        }
                        warn!(
                            length,
                            limit = self.max_line_length,
                            "inbound line exceeded capacity, discarding"
                        );
                        Err(CodecError::LineTooLong {
                            length,
                            limit: self.max_line_length,
                        })
                    } else {
                        // Partial line, waiting for more data.
                        Ok(None)
                    }
                }
            };
        }
    }

    fn decode_eof(&mut self, src: &mut BytesMut) -> CodecResult<Option<Bytes>> {
        match self.decode(src)? {
            Some(line) => Ok(Some(line)),
            None => {
                // An unterminated partial line at stream end never becomes
                // a data event; discard it rather than guess a terminator.
                if !src.is_empty() {
                    debug!(
                        length = src.len(),
                        "discarding unterminated partial line at stream end"
                    );
                    src.clear();
                }
                Ok(None)
            }
        }
    }
}

impl Encoder<&[u8]> for ScrubCodec {
    type Error = CodecError;

    fn encode(&mut self, item: &[u8], dst: &mut BytesMut) -> CodecResult<()> {
        let escaped = scrub::escape_iac(item);
        dst.reserve(escaped.len());
        dst.put_slice(&escaped);
        Ok(())
    }
}

impl Encoder<Bytes> for ScrubCodec {
    type Error = CodecError;

    fn encode(&mut self, item: Bytes, dst: &mut BytesMut) -> CodecResult<()> {
        Encoder::<&[u8]>::encode(self, item.as_ref(), dst)
    }
}

impl Encoder<&str> for ScrubCodec {
    type Error = CodecError;

    fn encode(&mut self, item: &str, dst: &mut BytesMut) -> CodecResult<()> {
        Encoder::<&[u8]>::encode(self, item.as_bytes(), dst)
    }
}

impl Encoder<Negotiation> for ScrubCodec {
    type Error = CodecError;

    fn encode(&mut self, item: Negotiation, dst: &mut BytesMut) -> CodecResult<()> {
        let bytes = scrub::encode_negotiation(item.verb, &[item.option]);
        dst.reserve(bytes.len());
        dst.put_slice(&bytes);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::{CR, DO, IAC, LF, WONT, option};
    use crate::scrub::Verb;

    fn drain(codec: &mut ScrubCodec, src: &mut BytesMut) -> Vec<CodecResult<Bytes>> {
        let mut out = Vec::new();
        loop {
            match codec.decode(src) {
                Ok(Some(line)) => out.push(Ok(line)),
                Ok(None) => break,
                Err(err) => out.push(Err(err)),
            }
        }
        out
    }

    #[test]
    fn partial_line_yields_nothing() {
        let mut codec = ScrubCodec::new();
        let mut src = BytesMut::from(&b"no terminator yet"[..]);
        assert_eq!(codec.decode(&mut src).unwrap(), None);
        // Bytes stay buffered for the next read.
        assert_eq!(src.len(), 17);
    }

    #[test]
    fn line_with_negotiation_is_cleaned() {
        let mut codec = ScrubCodec::new();
        let mut src = BytesMut::from(&[104, 105, IAC, DO, option::ECHO, CR, LF][..]);
        let line = codec.decode(&mut src).unwrap().unwrap();
        assert_eq!(line.as_ref(), &[104, 105]);
        assert!(src.is_empty());
    }

    #[test]
    fn multiple_lines_drained_in_order() {
        let mut codec = ScrubCodec::new();
        let mut src = BytesMut::from(&b"one\r\ntwo\nthree\r\n"[..]);
        let lines = drain(&mut codec, &mut src);
        let lines: Vec<_> = lines.into_iter().map(Result::unwrap).collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0].as_ref(), b"one");
        assert_eq!(lines[1].as_ref(), b"two");
        assert_eq!(lines[2].as_ref(), b"three");
    }

    #[test]
    fn crlf_split_across_reads_is_one_terminator() {
        let mut codec = ScrubCodec::new();
        let mut src = BytesMut::from(&b"hi\r"[..]);
        let line = codec.decode(&mut src).unwrap().unwrap();
        assert_eq!(line.as_ref(), b"hi");
        // The LF of the pair arrives in the next read and must not become
        // an empty line.
        src.put_slice(b"\nagain\r\n");
        let line = codec.decode(&mut src).unwrap().unwrap();
        assert_eq!(line.as_ref(), b"again");
        assert_eq!(codec.decode(&mut src).unwrap(), None);
    }

    #[test]
    fn empty_line_is_emitted() {
        let mut codec = ScrubCodec::new();
        let mut src = BytesMut::from(&b"\r\n"[..]);
        let line = codec.decode(&mut src).unwrap().unwrap();
        assert!(line.is_empty());
    }

    #[test]
    fn overflow_is_reported_and_bounded() {
        let mut codec = ScrubCodec::with_max_line_length(8);
        let mut src = BytesMut::from(&b"0123456789abcdef"[..]);
        let err = codec.decode(&mut src).unwrap_err();
        assert!(matches!(err, CodecError::LineTooLong { limit: 8, .. }));
        // Buffer was reset, not grown.
        assert!(src.is_empty());
    }

    #[test]
    fn oversized_line_with_buffered_terminator_is_rejected() {
        let mut codec = ScrubCodec::with_max_line_length(16);
        let mut src = BytesMut::new();
        src.put_slice(&[b'x'; 600]);
        src.put_slice(b"\r\nok\r\n");
        // The terminator arriving in the same read must not bypass the
        // capacity.
        let err = codec.decode(&mut src).unwrap_err();
        assert!(matches!(err, CodecError::LineTooLong { length: 600, limit: 16 }));
        // The next line is intact.
        let line = codec.decode(&mut src).unwrap().unwrap();
        assert_eq!(line.as_ref(), b"ok");
        assert_eq!(codec.decode(&mut src).unwrap(), None);
    }

    #[test]
    fn line_of_exactly_capacity_is_accepted() {
        let mut codec = ScrubCodec::with_max_line_length(8);
        let mut src = BytesMut::from(&b"12345678\r\n"[..]);
        let line = codec.decode(&mut src).unwrap().unwrap();
        assert_eq!(line.as_ref(), b"12345678");
    }

    #[test]
    #[tracing_test::traced_test]
    fn overflow_discard_is_logged() {
        let mut codec = ScrubCodec::with_max_line_length(8);
        let mut src = BytesMut::from(&b"0123456789abcdef"[..]);
        assert!(codec.decode(&mut src).is_err());
        assert!(logs_contain("exceeded capacity"));
    }

    #[test]
    fn overflow_recovery_after_terminator() {
        let mut codec = ScrubCodec::with_max_line_length(8);
        let mut src = BytesMut::from(&b"0123456789abcdef"[..]);
        assert!(codec.decode(&mut src).is_err());
        // Tail of the oversized line, then a well-behaved one.
        src.put_slice(b"ghij\r\nok\r\n");
        let line = codec.decode(&mut src).unwrap().unwrap();
        assert_eq!(line.as_ref(), b"ok");
        assert_eq!(codec.decode(&mut src).unwrap(), None);
    }

    #[test]
    fn eof_discards_partial_line() {
        let mut codec = ScrubCodec::new();
        let mut src = BytesMut::from(&b"unfinished"[..]);
        assert_eq!(codec.decode_eof(&mut src).unwrap(), None);
        assert!(src.is_empty());
    }

    #[test]
    fn encoder_escapes_payload() {
        let mut codec = ScrubCodec::new();
        let mut dst = BytesMut::new();
        Encoder::<&[u8]>::encode(&mut codec, &[1, IAC, 2][..], &mut dst).unwrap();
        assert_eq!(dst.as_ref(), &[1, IAC, IAC, 2]);
    }

    #[test]
    fn encoder_emits_negotiation_verbatim() {
        let mut codec = ScrubCodec::new();
        let mut dst = BytesMut::new();
        codec
            .encode(
                Negotiation {
                    verb: Verb::Wont,
                    option: option::ECHO,
                },
                &mut dst,
            )
            .unwrap();
        assert_eq!(dst.as_ref(), &[IAC, WONT, option::ECHO]);
    }

    #[test]
    #[should_panic(expected = "max_line_length must be positive")]
    fn zero_capacity_is_rejected() {
        let _ = ScrubCodec::with_max_line_length(0);
    }
}
