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

use std::sync::{
    atomic::{AtomicU64, Ordering},
    Arc,
};

use parking_lot::Mutex;

use crate::{
    audio_device::{AudioDevice, PlatformAudioDevice},
    audio_transport::AudioTransport,
    logsink::engine_log,
    peer_connection::{PeerConnection, RtcConfiguration},
    rtp_parameters::{builtin_capabilities, RtpCapabilities},
    EngineError, MediaType,
};

static NEXT_FACTORY_ID: AtomicU64 = AtomicU64::new(1);

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum AdapterType {
    Ethernet,
    Wifi,
    Cellular,
    Vpn,
    Loopback,
}

impl AdapterType {
    pub fn mask(&self) -> u32 {
        match self {
            AdapterType::Ethernet => 1 << 0,
            AdapterType::Wifi => 1 << 1,
            AdapterType::Cellular => 1 << 2,
            AdapterType::Vpn => 1 << 3,
            AdapterType::Loopback => 1 << 4,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PeerConnectionFactoryOptions {
    pub disable_encryption: bool,
    pub disable_network_monitor: bool,
    /// Bitmask of [`AdapterType::mask`] values to skip during gathering.
    pub network_ignore_mask: u32,
}

#[derive(Clone)]
pub struct PeerConnectionFactory {
    inner: Arc<FactoryInner>,
}

pub(crate) struct FactoryInner {
    id: u64,
    options: PeerConnectionFactoryOptions,
    audio_device: Arc<dyn AudioDevice>,
    custom_audio_device: bool,
    transport: Arc<AudioTransport>,
    audio_state: Mutex<AudioState>,
}

#[derive(Default)]
struct AudioState {
    playout_users: usize,
    recording_users: usize,
}

impl PeerConnectionFactory {
    /// Creates a factory driving `audio_device`, or the platform device when
    /// `None`. The device is initialized here and terminated when the last
    /// handle to the factory is dropped. A device serves one factory at a
    /// time: one that is already initialized is rejected.
    pub fn new(
        options: PeerConnectionFactoryOptions,
        audio_device: Option<Arc<dyn AudioDevice>>,
    ) -> Result<Self, EngineError> {
        let custom_audio_device = audio_device.is_some();
        let audio_device: Arc<dyn AudioDevice> =
            audio_device.unwrap_or_else(|| Arc::new(PlatformAudioDevice::new()));
        if audio_device.is_initialized() {
            engine_log!(Error, "audio device is already driven by another factory");
            return Err(EngineError::AudioDevice("device already initialized".to_owned()));
        }

        let transport = Arc::new(AudioTransport::new());

        audio_device.initialize(transport.clone()).map_err(|e| {
            engine_log!(Error, "audio device initialization failed: {}", e);
            EngineError::AudioDevice(format!("initialize failed: {}", e))
        })?;

        let id = NEXT_FACTORY_ID.fetch_add(1, Ordering::Relaxed);
        engine_log!(
            Info,
            "factory {} created (custom audio device: {}, encryption: {})",
            id,
            custom_audio_device,
            !options.disable_encryption
        );

        Ok(Self {
            inner: Arc::new(FactoryInner {
                id,
                options,
                audio_device,
                custom_audio_device,
                transport,
                audio_state: Mutex::new(AudioState::default()),
            }),
        })
    }

    pub fn id(&self) -> u64 {
        self.inner.id
    }

    pub fn options(&self) -> &PeerConnectionFactoryOptions {
        &self.inner.options
    }

    pub fn uses_custom_audio_device(&self) -> bool {
        self.inner.custom_audio_device
    }

    pub fn audio_device(&self) -> Arc<dyn AudioDevice> {
        self.inner.audio_device.clone()
    }

    pub fn audio_transport(&self) -> Arc<AudioTransport> {
        self.inner.transport.clone()
    }

    pub fn create_peer_connection(
        &self,
        config: RtcConfiguration,
    ) -> Result<PeerConnection, EngineError> {
        config.validate()?;
        Ok(PeerConnection::new(self.inner.clone(), config))
    }

    pub fn rtp_sender_capabilities(&self, media_type: MediaType) -> RtpCapabilities {
        builtin_capabilities(media_type)
    }

    pub fn rtp_receiver_capabilities(&self, media_type: MediaType) -> RtpCapabilities {
        builtin_capabilities(media_type)
    }

    pub fn ptr_eq(&self, other: &PeerConnectionFactory) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl std::fmt::Debug for PeerConnectionFactory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PeerConnectionFactory")
            .field("id", &self.inner.id)
            .field("custom_audio_device", &self.inner.custom_audio_device)
            .finish()
    }
}

impl FactoryInner {
    pub(crate) fn transport(&self) -> &Arc<AudioTransport> {
        &self.transport
    }

    pub(crate) fn acquire_playout(&self) -> Result<(), EngineError> {
        let mut state = self.audio_state.lock();
        if state.playout_users == 0 {
            if !self.audio_device.is_playout_initialized() {
                self.audio_device.initialize_playout()?;
            }
            self.audio_device.start_playout()?;
            engine_log!(Verbose, "factory {}: playout started", self.id);
        }
        state.playout_users += 1;
        Ok(())
    }

    pub(crate) fn release_playout(&self) {
        let mut state = self.audio_state.lock();
        state.playout_users = state.playout_users.saturating_sub(1);
        if state.playout_users == 0 {
            if let Err(e) = self.audio_device.stop_playout() {
                engine_log!(Warning, "factory {}: stop_playout failed: {}", self.id, e);
            }
        }
    }

    pub(crate) fn acquire_recording(&self) -> Result<(), EngineError> {
        let mut state = self.audio_state.lock();
        if state.recording_users == 0 {
            if !self.audio_device.is_recording_initialized() {
                self.audio_device.initialize_recording()?;
            }
            self.audio_device.start_recording()?;
            engine_log!(Verbose, "factory {}: recording started", self.id);
        }
        state.recording_users += 1;
        Ok(())
    }

    pub(crate) fn release_recording(&self) {
        let mut state = self.audio_state.lock();
        state.recording_users = state.recording_users.saturating_sub(1);
        if state.recording_users == 0 {
            if let Err(e) = self.audio_device.stop_recording() {
                engine_log!(Warning, "factory {}: stop_recording failed: {}", self.id, e);
            }
        }
    }
}

impl Drop for FactoryInner {
    fn drop(&mut self) {
        if self.audio_device.is_playing() {
            if let Err(e) = self.audio_device.stop_playout() {
                engine_log!(Warning, "factory {}: stop_playout failed: {}", self.id, e);
            }
        }
        if self.audio_device.is_recording() {
            if let Err(e) = self.audio_device.stop_recording() {
                engine_log!(Warning, "factory {}: stop_recording failed: {}", self.id, e);
            }
        }
        if let Err(e) = self.audio_device.terminate() {
            engine_log!(Warning, "factory {}: audio device terminate failed: {}", self.id, e);
        }
        engine_log!(Info, "factory {} released", self.id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        audio_device::AudioDeviceDelegate,
        logsink::{self, LoggingSeverity},
    };
    use lazy_static::lazy_static;

    lazy_static! {
        static ref WARNINGS: Mutex<Vec<String>> = Default::default();
    }

    fn capture_warnings(msg: String, severity: LoggingSeverity) {
        if severity == LoggingSeverity::Warning {
            WARNINGS.lock().push(msg);
        }
    }

    /// Platform device whose stop calls always fail.
    #[derive(Default)]
    struct StuckDevice(PlatformAudioDevice);

    impl AudioDevice for StuckDevice {
        fn device_input_sample_rate(&self) -> u32 {
            self.0.device_input_sample_rate()
        }
        fn device_output_sample_rate(&self) -> u32 {
            self.0.device_output_sample_rate()
        }
        fn is_initialized(&self) -> bool {
            self.0.is_initialized()
        }
        fn initialize(&self, delegate: Arc<dyn AudioDeviceDelegate>) -> Result<(), EngineError> {
            self.0.initialize(delegate)
        }
        fn terminate(&self) -> Result<(), EngineError> {
            self.0.terminate()
        }
        fn is_playout_initialized(&self) -> bool {
            self.0.is_playout_initialized()
        }
        fn initialize_playout(&self) -> Result<(), EngineError> {
            self.0.initialize_playout()
        }
        fn is_playing(&self) -> bool {
            self.0.is_playing()
        }
        fn start_playout(&self) -> Result<(), EngineError> {
            self.0.start_playout()
        }
        fn stop_playout(&self) -> Result<(), EngineError> {
            Err(EngineError::AudioDevice("stuck".to_owned()))
        }
        fn is_recording_initialized(&self) -> bool {
            self.0.is_recording_initialized()
        }
        fn initialize_recording(&self) -> Result<(), EngineError> {
            self.0.initialize_recording()
        }
        fn is_recording(&self) -> bool {
            self.0.is_recording()
        }
        fn start_recording(&self) -> Result<(), EngineError> {
            self.0.start_recording()
        }
        fn stop_recording(&self) -> Result<(), EngineError> {
            Err(EngineError::AudioDevice("stuck".to_owned()))
        }
    }

    #[test]
    fn failed_stops_on_release_are_logged() {
        let _sink = logsink::new_log_sink(capture_warnings);
        let device: Arc<dyn AudioDevice> = Arc::new(StuckDevice::default());
        let factory = PeerConnectionFactory::new(Default::default(), Some(device)).unwrap();
        factory.inner.acquire_playout().unwrap();
        factory.inner.acquire_recording().unwrap();

        let id = factory.id();
        drop(factory);

        let warnings = WARNINGS.lock();
        let prefix = format!("factory {}: ", id);
        assert!(warnings
            .iter()
            .any(|m| m.starts_with(&prefix) && m.contains("stop_playout failed")));
        assert!(warnings
            .iter()
            .any(|m| m.starts_with(&prefix) && m.contains("stop_recording failed")));
    }

    #[test]
    fn factories_are_distinct() {
        let a = PeerConnectionFactory::new(Default::default(), None).unwrap();
        let b = PeerConnectionFactory::new(Default::default(), None).unwrap();
        assert_ne!(a.id(), b.id());
        assert!(!a.ptr_eq(&b));
        assert!(a.ptr_eq(&a.clone()));
        assert!(!a.uses_custom_audio_device());
    }

    #[test]
    fn platform_device_is_initialized_then_terminated() {
        let factory = PeerConnectionFactory::new(Default::default(), None).unwrap();
        let device = factory.audio_device();
        assert!(device.is_initialized());

        drop(factory);
        assert!(!device.is_initialized());
    }

    #[test]
    fn device_serves_one_factory_at_a_time() {
        let device: Arc<dyn AudioDevice> = Arc::new(PlatformAudioDevice::new());
        let first = PeerConnectionFactory::new(Default::default(), Some(device.clone())).unwrap();

        let err = PeerConnectionFactory::new(Default::default(), Some(device.clone())).unwrap_err();
        assert!(matches!(err, EngineError::AudioDevice(_)));
        assert!(device.is_initialized());

        drop(first);
        assert!(!device.is_initialized());
        assert!(PeerConnectionFactory::new(Default::default(), Some(device)).is_ok());
    }

    #[test]
    fn receiver_outliving_factory_cannot_deliver() {
        let factory = PeerConnectionFactory::new(Default::default(), None).unwrap();
        let pc = factory.create_peer_connection(Default::default()).unwrap();
        let receiver = pc.add_receiver(MediaType::Audio).unwrap();
        let frame = crate::audio_frame::AudioFrame::new(48000, 1, 480);
        assert!(receiver.deliver_remote_audio(&frame).is_ok());
        assert_eq!(factory.audio_transport().queued_playout_frames(), 1);

        drop(pc);
        drop(factory);
        assert!(matches!(
            receiver.deliver_remote_audio(&frame),
            Err(EngineError::InvalidState(_))
        ));
    }

    #[test]
    fn adapter_masks_are_disjoint() {
        let all = [
            AdapterType::Ethernet,
            AdapterType::Wifi,
            AdapterType::Cellular,
            AdapterType::Vpn,
            AdapterType::Loopback,
        ];
        let combined = all.iter().fold(0u32, |acc, a| {
            assert_eq!(acc & a.mask(), 0);
            acc | a.mask()
        });
        assert_eq!(combined.count_ones(), all.len() as u32);
    }

    #[test]
    fn receiver_capabilities_include_opus() {
        let factory = PeerConnectionFactory::new(Default::default(), None).unwrap();
        let caps = factory.rtp_receiver_capabilities(MediaType::Audio);
        assert!(caps.codecs.iter().any(|c| c.mime_type == "audio/opus"));
        assert!(factory.rtp_receiver_capabilities(MediaType::Data).codecs.is_empty());
    }
}
