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

use std::{
    fmt::{Debug, Formatter},
    sync::Arc,
};

use lazy_static::lazy_static;
use parking_lot::Mutex;
use rtc_engine::{
    logsink::{self, LoggingSeverity},
    peer_connection_factory as sys_pcf,
};

use crate::{
    audio_device::{AudioDevice, AudioDeviceSource},
    audio_stream::RecordedAudioStream,
    options::FactoryOptions,
    peer_connection::{PeerConnection, RtcConfiguration},
    rtp_parameters::RtpCapabilities,
    MediaType, RtcError,
};

lazy_static! {
    static ref LOG_SINK: Mutex<Option<logsink::LogSink>> = Default::default();
}

fn install_log_sink() {
    let mut log_sink = LOG_SINK.lock();
    if log_sink.is_none() {
        *log_sink = Some(logsink::new_log_sink(|msg, severity| {
            let msg = msg.strip_suffix("\r\n").or(msg.strip_suffix('\n')).unwrap_or(&msg);

            match severity {
                LoggingSeverity::Error => log::error!(target: "rtc_engine", "{}", msg),
                LoggingSeverity::Warning => log::warn!(target: "rtc_engine", "{}", msg),
                LoggingSeverity::Info => log::debug!(target: "rtc_engine", "{}", msg),
                _ => log::trace!(target: "rtc_engine", "{}", msg),
            }
        }));
    }
}

/// Handle to an engine factory. Clones share the same factory; the engine
/// releases it, and terminates its audio device, when the last clone drops.
#[derive(Clone)]
pub struct PeerConnectionFactory {
    pub(crate) sys_handle: sys_pcf::PeerConnectionFactory,
    options: FactoryOptions,
}

impl Debug for PeerConnectionFactory {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        f.debug_struct("PeerConnectionFactory")
            .field("id", &self.id())
            .field("custom_audio_device", &self.uses_custom_audio_device())
            .finish()
    }
}

impl PeerConnectionFactory {
    pub(crate) fn create(
        options: FactoryOptions,
        audio_device: AudioDeviceSource,
    ) -> Result<Self, RtcError> {
        install_log_sink();

        if options.disable_encryption {
            log::warn!("creating a peer connection factory with encryption disabled");
        }

        let sys_handle = sys_pcf::PeerConnectionFactory::new(
            options.clone().into(),
            audio_device.into_device(),
        )?;
        Ok(Self { sys_handle, options })
    }

    pub fn id(&self) -> u64 {
        self.sys_handle.id()
    }

    pub fn options(&self) -> &FactoryOptions {
        &self.options
    }

    pub fn uses_custom_audio_device(&self) -> bool {
        self.sys_handle.uses_custom_audio_device()
    }

    /// The device this factory drives: the caller's custom device or the
    /// platform default.
    pub fn audio_device(&self) -> Arc<dyn AudioDevice> {
        self.sys_handle.audio_device()
    }

    pub fn create_peer_connection(
        &self,
        config: RtcConfiguration,
    ) -> Result<PeerConnection, RtcError> {
        let handle = self.sys_handle.create_peer_connection(config.into())?;
        Ok(PeerConnection { handle })
    }

    pub fn recorded_audio_stream(&self) -> RecordedAudioStream {
        RecordedAudioStream::new(self.sys_handle.audio_transport())
    }

    pub fn get_rtp_sender_capabilities(&self, media_type: MediaType) -> RtpCapabilities {
        self.sys_handle.rtp_sender_capabilities(media_type.into())
    }

    pub fn get_rtp_receiver_capabilities(&self, media_type: MediaType) -> RtpCapabilities {
        self.sys_handle.rtp_receiver_capabilities(media_type.into())
    }

    pub fn ptr_eq(&self, other: &PeerConnectionFactory) -> bool {
        self.sys_handle.ptr_eq(&other.sys_handle)
    }
}
