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

use thiserror::Error;

pub mod audio_device;
pub mod audio_frame;
pub mod audio_transport;
pub mod logsink;
pub mod peer_connection;
pub mod peer_connection_factory;
pub mod rtp_parameters;
pub mod rtp_receiver;

pub const MEDIA_TYPE_VIDEO: &str = "video";
pub const MEDIA_TYPE_AUDIO: &str = "audio";
pub const MEDIA_TYPE_DATA: &str = "data";

/// Milestone of the linked engine build.
pub const ENGINE_MILESTONE: u32 = 125;

/// First milestone where receivers accept a jitter buffer minimum delay.
pub const JITTER_BUFFER_DELAY_MILESTONE: u32 = 78;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum MediaType {
    Audio,
    Video,
    Data,
}

impl MediaType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MediaType::Audio => MEDIA_TYPE_AUDIO,
            MediaType::Video => MEDIA_TYPE_VIDEO,
            MediaType::Data => MEDIA_TYPE_DATA,
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum EngineError {
    #[error("audio device error: {0}")]
    AudioDevice(String),
    #[error("unsupported by this engine build: {0}")]
    Unsupported(&'static str),
    #[error("invalid state: {0}")]
    InvalidState(String),
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LibraryVersion {
    pub milestone: u32,
    pub major: u32,
    pub minor: u32,
}

impl std::fmt::Display for LibraryVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "m{}.{}.{}", self.milestone, self.major, self.minor)
    }
}

/// Optional engine features that depend on the build.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Capability {
    JitterBufferMinimumDelay,
}

pub fn version() -> LibraryVersion {
    LibraryVersion { milestone: ENGINE_MILESTONE, major: 0, minor: 1 }
}

pub fn supports(capability: Capability) -> bool {
    match capability {
        Capability::JitterBufferMinimumDelay => {
            cfg!(feature = "jitter-buffer-delay")
                && version().milestone >= JITTER_BUFFER_DELAY_MILESTONE
        }
    }
}
