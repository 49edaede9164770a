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

/// Result type for codec operations.
pub type CodecResult<T> = Result<T, CodecError>;

/// Errors produced while framing and scrubbing the inbound byte stream.
///
/// Note that malformed negotiation sequences are not errors: the scrubber
/// consumes them silently (see [`crate::scrub::scrub_line`]). The only
/// protocol-level failure is an inbound line that outgrows the configured
/// capacity before a terminator arrives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CodecError {
    /// Inbound accumulation reached the configured capacity before a line
    /// terminator was seen. The oversized partial line has been discarded
    /// and the decoder will skip input until the next terminator.
    LineTooLong {
        /// Number of bytes buffered when the limit was hit
        length: usize,
        /// The configured capacity
        limit: usize,
    },

    /// An I/O error occurred on the underlying stream.
    ///
    /// Contains the error kind and a description of what operation failed.
    Io {
        /// The kind of I/O error that occurred
        kind: std::io::ErrorKind,
        /// Description of the operation that failed
        operation: String,
    },
}

impl std::error::Error for CodecError {}

impl std::fmt::Display for CodecError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CodecError::LineTooLong { length, limit } => {
                write!(f, "input line too long ({} bytes, limit {})", length, limit)
            }
            CodecError::Io { kind, operation } => {
                write!(f, "I/O error during {}: {:?}", operation, kind)
            }
        }
    }
}

impl From<std::io::Error> for CodecError {
    fn from(err: std::io::Error) -> Self {
        CodecError::Io {
            kind: err.kind(),
            operation: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn line_too_long_display() {
        let err = CodecError::LineTooLong {
            length: 600,
            limit: 512,
        };
        assert_eq!(err.to_string(), "input line too long (600 bytes, limit 512)");
    }

    #[test]
    fn io_error_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::BrokenPipe, "pipe closed");
        let err = CodecError::from(io);
        assert!(matches!(
            err,
            CodecError::Io {
                kind: std::io::ErrorKind::BrokenPipe,
                ..
            }
        ));
    }
}
