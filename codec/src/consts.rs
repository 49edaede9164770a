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

//! Telnet wire constants (RFC 854). Values are fixed by the historical
//! protocol and not re-derivable.

/// Interpret As Command - control sequence introducer and escape byte.
pub const IAC: u8 = 255;
/// Demand the peer disable an option.
pub const DONT: u8 = 254;
/// Request the peer enable an option.
pub const DO: u8 = 253;
/// Refusal to enable an option locally.
pub const WONT: u8 = 252;
/// Offer to enable an option locally.
pub const WILL: u8 = 251;
/// Subnegotiation Begin.
pub const SB: u8 = 250;
/// Subnegotiation End.
pub const SE: u8 = 240;

/// Carriage return, one of the two recognized line terminators.
pub const CR: u8 = 13;
/// Line feed, one of the two recognized line terminators.
pub const LF: u8 = 10;

/// Telnet option codes.
pub mod option {
    /// Echo (RFC 857), the only option this crate actively reasons about.
    pub const ECHO: u8 = 1;
}
