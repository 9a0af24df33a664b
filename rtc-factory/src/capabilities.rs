// Copyright 2025 LiveKit, Inc.
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use lazy_static::lazy_static;
use rtc_engine::Capability;

pub use rtc_engine::LibraryVersion;

/// What the linked engine build can do.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct LibraryCapabilities {
    pub version: LibraryVersion,
    /// Receivers accept a jitter buffer minimum delay (playout delay hint).
    pub playout_delay_hint: bool,
}

impl LibraryCapabilities {
    pub fn new(version: LibraryVersion, playout_delay_hint: bool) -> Self {
        Self { version, playout_delay_hint }
    }

    /// Queries the linked engine. Prefer [`capabilities`], which probes once.
    pub fn probe() -> Self {
        Self {
            version: rtc_engine::version(),
            playout_delay_hint: rtc_engine::supports(Capability::JitterBufferMinimumDelay),
        }
    }
}

lazy_static! {
    static ref CAPABILITIES: LibraryCapabilities = {
        let caps = LibraryCapabilities::probe();
        log::info!(
            "linked rtc engine {} (playout delay hint: {})",
            caps.version,
            caps.playout_delay_hint
        );
        caps
    };
}

/// Capabilities of the linked engine, resolved on first use.
pub fn capabilities() -> &'static LibraryCapabilities {
    &CAPABILITIES
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolved_once_and_matches_probe() {
        let first = capabilities();
        let second = capabilities();
        assert!(std::ptr::eq(first, second));
        assert_eq!(*first, LibraryCapabilities::probe());
        assert_eq!(first.playout_delay_hint, cfg!(feature = "jitter-buffer-delay"));
    }
}
