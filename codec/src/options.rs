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

//! Per-session option state.
//!
//! The adapter never completes a negotiation, so this table is not a
//! Q-method state machine: it only records what this side has decided
//! about an option. Today only Echo is ever populated, but the state is an
//! explicit per-option table rather than an ad hoc boolean so further
//! options slot in without new fields.

use crate::consts;

/// What this side currently asserts about a single Telnet option.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OptionDisposition {
    /// Never asserted either way.
    #[default]
    Unknown,
    /// Locally active (announced with `WILL` when toggled on).
    Enabled,
    /// Locally refused (announced with `WONT` when toggled off).
    Refused,
}

/// Dense table of option dispositions, one entry per option code.
///
/// Owned by exactly one session; sessions never share option state.
#[derive(Debug, Clone)]
pub struct OptionTable {
    entries: [OptionDisposition; 256],
}

impl Default for OptionTable {
    fn default() -> Self {
        let mut entries = [OptionDisposition::Unknown; 256];
        // Echo starts enabled: the adapter owns all echo behavior.
        entries[consts::option::ECHO as usize] = OptionDisposition::Enabled;
        Self { entries }
    }
}

impl OptionTable {
    /// Create a table with the default dispositions.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current disposition of `option`.
    pub fn get(&self, option: u8) -> OptionDisposition {
        self.entries[option as usize]
    }

    /// Record a disposition for `option`.
    pub fn set(&mut self, option: u8, disposition: OptionDisposition) {
        self.entries[option as usize] = disposition;
    }

    /// Whether `option` is currently enabled.
    pub fn is_enabled(&self, option: u8) -> bool {
        self.entries[option as usize] == OptionDisposition::Enabled
    }

    /// Flip `option` between `Enabled` and `Refused`, returning the new
    /// disposition. An `Unknown` option toggles to `Enabled`.
    pub fn toggle(&mut self, option: u8) -> OptionDisposition {
        let next = if self.is_enabled(option) {
            OptionDisposition::Refused
        } else {
            OptionDisposition::Enabled
        };
        self.set(option, next);
        next
    }
}
