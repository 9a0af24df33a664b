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

use crate::MediaType;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RtpCodecCapability {
    pub mime_type: String,
    pub clock_rate: Option<u64>,
    pub channels: Option<u16>,
    pub sdp_fmtp_line: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RtpHeaderExtensionCapability {
    pub uri: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RtpCapabilities {
    pub codecs: Vec<RtpCodecCapability>,
    pub header_extensions: Vec<RtpHeaderExtensionCapability>,
}

fn codec(
    mime_type: &str,
    clock_rate: u64,
    channels: Option<u16>,
    fmtp: Option<&str>,
) -> RtpCodecCapability {
    RtpCodecCapability {
        mime_type: mime_type.to_owned(),
        clock_rate: Some(clock_rate),
        channels,
        sdp_fmtp_line: fmtp.map(str::to_owned),
    }
}

fn extension(uri: &str) -> RtpHeaderExtensionCapability {
    RtpHeaderExtensionCapability { uri: uri.to_owned() }
}

/// Codecs and extensions built into the engine's default codec factories.
pub(crate) fn builtin_capabilities(media_type: MediaType) -> RtpCapabilities {
    match media_type {
        MediaType::Audio => RtpCapabilities {
            codecs: vec![
                codec("audio/opus", 48000, Some(2), Some("minptime=10;useinbandfec=1")),
                codec("audio/red", 48000, Some(2), None),
                codec("audio/PCMU", 8000, Some(1), None),
                codec("audio/PCMA", 8000, Some(1), None),
                codec("audio/telephone-event", 48000, Some(1), None),
            ],
            header_extensions: vec![
                extension("urn:ietf:params:rtp-hdrext:ssrc-audio-level"),
                extension("urn:ietf:params:rtp-hdrext:sdes:mid"),
            ],
        },
        MediaType::Video => RtpCapabilities {
            codecs: vec![
                codec("video/VP8", 90000, None, None),
                codec("video/VP9", 90000, None, Some("profile-id=0")),
                codec(
                    "video/H264",
                    90000,
                    None,
                    Some("level-asymmetry-allowed=1;packetization-mode=1;profile-level-id=42e01f"),
                ),
                codec("video/AV1", 90000, None, None),
                codec("video/rtx", 90000, None, None),
            ],
            header_extensions: vec![
                extension("urn:ietf:params:rtp-hdrext:toffset"),
                extension("http://www.webrtc.org/experiments/rtp-hdrext/playout-delay"),
                extension("urn:ietf:params:rtp-hdrext:sdes:mid"),
            ],
        },
        MediaType::Data => RtpCapabilities::default(),
    }
}
