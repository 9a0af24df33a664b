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

//! Entry points for building peer connection factories.
//!
//! [`make_factory`] is the common case: engine defaults for networking and
//! codecs, and either the platform audio device or one supplied by the
//! caller. [`FactoryBuilder`] additionally takes [`FactoryOptions`].
//!
//! [`set_playout_delay_hint_if_supported`] is best-effort: when the linked
//! engine cannot apply a playout delay it does nothing.

use std::sync::Arc;

use crate::{
    audio_device::{AudioDevice, AudioDeviceSource},
    capabilities::{capabilities, LibraryCapabilities},
    options::FactoryOptions,
    peer_connection_factory::PeerConnectionFactory,
    rtp_receiver::RtpReceiver,
    RtcError,
};

#[derive(Debug, Clone, Default)]
pub struct FactoryBuilder {
    options: FactoryOptions,
    audio_device: AudioDeviceSource,
}

impl FactoryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn options(mut self, options: FactoryOptions) -> Self {
        self.options = options;
        self
    }

    /// Routes the factory's audio through `device` instead of the platform
    /// default. The factory keeps its own reference to the device.
    pub fn audio_device(mut self, device: Arc<dyn AudioDevice>) -> Self {
        self.audio_device = AudioDeviceSource::Custom(device);
        self
    }

    pub fn audio_device_source(mut self, source: AudioDeviceSource) -> Self {
        self.audio_device = source;
        self
    }

    /// Creates one new factory. Each call yields an independent factory.
    pub fn build(self) -> Result<PeerConnectionFactory, RtcError> {
        let custom = self.audio_device.is_custom();
        let factory = PeerConnectionFactory::create(self.options, self.audio_device)?;
        log::debug!(
            "created peer connection factory {} (custom audio device: {})",
            factory.id(),
            custom
        );
        Ok(factory)
    }
}

/// Creates a factory with engine defaults, driving `audio_device` when given
/// and the platform device otherwise.
pub fn make_factory(
    audio_device: Option<Arc<dyn AudioDevice>>,
) -> Result<PeerConnectionFactory, RtcError> {
    FactoryBuilder::new().audio_device_source(audio_device.into()).build()
}

pub fn make_default_factory() -> Result<PeerConnectionFactory, RtcError> {
    make_factory(None)
}

/// Applies a playout delay hint of `seconds` to `receiver` when the linked
/// engine supports it, and does nothing otherwise.
pub fn set_playout_delay_hint_if_supported(receiver: &RtpReceiver, seconds: f64) {
    set_playout_delay_hint_with(capabilities(), receiver, seconds);
}

/// Same as [`set_playout_delay_hint_if_supported`] against an explicit
/// capability set. Returns whether the hint was applied.
///
/// Finite values are clamped by the engine to its accepted range. NaN and
/// infinities are ignored.
pub fn set_playout_delay_hint_with(
    capabilities: &LibraryCapabilities,
    receiver: &RtpReceiver,
    seconds: f64,
) -> bool {
    if !capabilities.playout_delay_hint {
        log::trace!("playout delay hint unsupported by {}, skipping", capabilities.version);
        return false;
    }

    if !seconds.is_finite() {
        log::warn!("ignoring non-finite playout delay hint for {}: {}", receiver.id(), seconds);
        return false;
    }

    match receiver.set_jitter_buffer_minimum_delay(Some(seconds)) {
        Ok(()) => {
            log::debug!("playout delay hint for {} set to {}s", receiver.id(), seconds);
            true
        }
        Err(e) => {
            log::warn!("failed to apply playout delay hint to {}: {}", receiver.id(), e);
            false
        }
    }
}
