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

use rtc_engine::EngineError;
use thiserror::Error;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum MediaType {
    Audio,
    Video,
    Data,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum RtcErrorType {
    Internal,
    InvalidState,
    InvalidParameter,
    AudioDevice,
}

#[derive(Error, Debug)]
#[error("an RtcError occured: {error_type:?} - {message}")]
pub struct RtcError {
    pub error_type: RtcErrorType,
    pub message: String,
}

impl From<EngineError> for RtcError {
    fn from(err: EngineError) -> Self {
        let error_type = match err {
            EngineError::AudioDevice(_) => RtcErrorType::AudioDevice,
            EngineError::InvalidState(_) => RtcErrorType::InvalidState,
            EngineError::InvalidParameter(_) => RtcErrorType::InvalidParameter,
            EngineError::Unsupported(_) => RtcErrorType::Internal,
        };
        RtcError { error_type, message: err.to_string() }
    }
}

impl From<MediaType> for rtc_engine::MediaType {
    fn from(media_type: MediaType) -> Self {
        match media_type {
            MediaType::Audio => rtc_engine::MediaType::Audio,
            MediaType::Video => rtc_engine::MediaType::Video,
            MediaType::Data => rtc_engine::MediaType::Data,
        }
    }
}

impl From<rtc_engine::MediaType> for MediaType {
    fn from(media_type: rtc_engine::MediaType) -> Self {
        match media_type {
            rtc_engine::MediaType::Audio => MediaType::Audio,
            rtc_engine::MediaType::Video => MediaType::Video,
            rtc_engine::MediaType::Data => MediaType::Data,
        }
    }
}

pub mod audio_device;
pub mod audio_stream;
pub mod capabilities;
pub mod factory_builder;
pub mod options;
pub mod peer_connection;
pub mod peer_connection_factory;
pub mod prelude;
pub mod rtp_receiver;

pub mod rtp_parameters {
    pub use rtc_engine::rtp_parameters::{
        RtpCapabilities, RtpCodecCapability, RtpHeaderExtensionCapability,
    };
}

pub use factory_builder::{
    make_default_factory, make_factory, set_playout_delay_hint_if_supported,
    set_playout_delay_hint_with, FactoryBuilder,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn engine_errors_keep_their_kind() {
        let err: RtcError = EngineError::AudioDevice("boom".to_owned()).into();
        assert_eq!(err.error_type, RtcErrorType::AudioDevice);
        assert!(err.message.contains("boom"));

        let err: RtcError = EngineError::Unsupported("thing").into();
        assert_eq!(err.error_type, RtcErrorType::Internal);
    }

    #[test]
    fn media_type_conversion() {
        for media_type in [MediaType::Audio, MediaType::Video, MediaType::Data] {
            let native: rtc_engine::MediaType = media_type.into();
            assert_eq!(MediaType::from(native), media_type);
        }
    }
}
