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

pub use rtc_engine::audio_device::{AudioDevice, AudioDeviceDelegate, PlatformAudioDevice};
pub use rtc_engine::audio_frame::AudioFrame;
pub use rtc_engine::EngineError;

/// Which audio device a new factory drives.
///
/// `Custom` shares ownership: the caller keeps its own `Arc` and the factory
/// holds another until its last handle is dropped, so the device always
/// outlives the factory that uses it. The factory calls
/// [`AudioDevice::initialize`] on creation and [`AudioDevice::terminate`]
/// on release. A device drives one factory at a time: building a second
/// factory on a device that is still initialized fails.
#[derive(Clone, Default)]
pub enum AudioDeviceSource {
    /// The engine's platform device.
    #[default]
    Platform,
    Custom(Arc<dyn AudioDevice>),
}

impl AudioDeviceSource {
    pub fn is_custom(&self) -> bool {
        matches!(self, AudioDeviceSource::Custom(_))
    }

    pub(crate) fn into_device(self) -> Option<Arc<dyn AudioDevice>> {
        match self {
            AudioDeviceSource::Platform => None,
            AudioDeviceSource::Custom(device) => Some(device),
        }
    }
}

impl From<Option<Arc<dyn AudioDevice>>> for AudioDeviceSource {
    fn from(device: Option<Arc<dyn AudioDevice>>) -> Self {
        match device {
            Some(device) => AudioDeviceSource::Custom(device),
            None => AudioDeviceSource::Platform,
        }
    }
}

impl From<Arc<dyn AudioDevice>> for AudioDeviceSource {
    fn from(device: Arc<dyn AudioDevice>) -> Self {
        AudioDeviceSource::Custom(device)
    }
}

impl Debug for AudioDeviceSource {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        match self {
            AudioDeviceSource::Platform => f.write_str("Platform"),
            AudioDeviceSource::Custom(_) => f.write_str("Custom"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn source_from_option() {
        assert!(!AudioDeviceSource::from(None).is_custom());

        let device: Arc<dyn AudioDevice> = Arc::new(PlatformAudioDevice::new());
        let source = AudioDeviceSource::from(Some(device.clone()));
        assert!(source.is_custom());
        assert_eq!(format!("{:?}", source), "Custom");

        let held = source.into_device().unwrap();
        assert!(Arc::ptr_eq(&held, &device));
    }
}
