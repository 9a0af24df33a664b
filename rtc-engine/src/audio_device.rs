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

//! Audio device interface.
//!
//! An [`AudioDevice`] owns the platform side of audio: it captures
//! microphone samples and renders playout. The engine drives it through
//! the lifecycle calls below and exchanges samples with it through the
//! [`AudioDeviceDelegate`] handed over in [`AudioDevice::initialize`].
//! Implementations must tolerate repeated start/stop calls.

use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

use parking_lot::Mutex;

use crate::{audio_frame::AudioFrame, EngineError};

pub const DEFAULT_SAMPLE_RATE: u32 = 48000;

/// Engine side of the device. Called from the device's own audio threads.
pub trait AudioDeviceDelegate: Send + Sync {
    /// Hands captured samples to the engine.
    fn deliver_recorded_data(&self, frame: &AudioFrame<'_>);

    /// Fills `frame` with the next samples to render.
    fn get_playout_data(&self, frame: &mut AudioFrame<'_>);

    fn notify_audio_input_parameters_change(&self) {}

    fn notify_audio_output_parameters_change(&self) {}

    fn notify_audio_input_interrupted(&self) {}

    fn notify_audio_output_interrupted(&self) {}
}

pub trait AudioDevice: Send + Sync {
    fn device_input_sample_rate(&self) -> u32;
    fn device_output_sample_rate(&self) -> u32;

    fn input_number_of_channels(&self) -> u32 {
        1
    }

    fn output_number_of_channels(&self) -> u32 {
        1
    }

    fn is_initialized(&self) -> bool;
    fn initialize(&self, delegate: Arc<dyn AudioDeviceDelegate>) -> Result<(), EngineError>;
    fn terminate(&self) -> Result<(), EngineError>;

    fn is_playout_initialized(&self) -> bool;
    fn initialize_playout(&self) -> Result<(), EngineError>;
    fn is_playing(&self) -> bool;
    fn start_playout(&self) -> Result<(), EngineError>;
    fn stop_playout(&self) -> Result<(), EngineError>;

    fn is_recording_initialized(&self) -> bool;
    fn initialize_recording(&self) -> Result<(), EngineError>;
    fn is_recording(&self) -> bool;
    fn start_recording(&self) -> Result<(), EngineError>;
    fn stop_recording(&self) -> Result<(), EngineError>;
}

/// Default device used when the caller supplies none.
///
/// The engine runs headless: this device follows the full lifecycle but
/// never captures or renders samples.
#[derive(Default)]
pub struct PlatformAudioDevice {
    delegate: Mutex<Option<Arc<dyn AudioDeviceDelegate>>>,
    playout_initialized: AtomicBool,
    playing: AtomicBool,
    recording_initialized: AtomicBool,
    recording: AtomicBool,
}

impl PlatformAudioDevice {
    pub fn new() -> Self {
        Self::default()
    }

    fn ensure_initialized(&self, op: &str) -> Result<(), EngineError> {
        if self.is_initialized() {
            Ok(())
        } else {
            Err(EngineError::InvalidState(format!("{} before initialize", op)))
        }
    }
}

impl std::fmt::Debug for PlatformAudioDevice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlatformAudioDevice")
            .field("initialized", &self.is_initialized())
            .field("playing", &self.is_playing())
            .field("recording", &self.is_recording())
            .finish()
    }
}

impl AudioDevice for PlatformAudioDevice {
    fn device_input_sample_rate(&self) -> u32 {
        DEFAULT_SAMPLE_RATE
    }

    fn device_output_sample_rate(&self) -> u32 {
        DEFAULT_SAMPLE_RATE
    }

    fn is_initialized(&self) -> bool {
        self.delegate.lock().is_some()
    }

    fn initialize(&self, delegate: Arc<dyn AudioDeviceDelegate>) -> Result<(), EngineError> {
        *self.delegate.lock() = Some(delegate);
        Ok(())
    }

    fn terminate(&self) -> Result<(), EngineError> {
        self.stop_playout()?;
        self.stop_recording()?;
        self.playout_initialized.store(false, Ordering::SeqCst);
        self.recording_initialized.store(false, Ordering::SeqCst);
        *self.delegate.lock() = None;
        Ok(())
    }

    fn is_playout_initialized(&self) -> bool {
        self.playout_initialized.load(Ordering::SeqCst)
    }

    fn initialize_playout(&self) -> Result<(), EngineError> {
        self.ensure_initialized("initialize_playout")?;
        self.playout_initialized.store(true, Ordering::SeqCst);
        Ok(())
    }

    fn is_playing(&self) -> bool {
        self.playing.load(Ordering::SeqCst)
    }

    fn start_playout(&self) -> Result<(), EngineError> {
        if !self.is_playout_initialized() {
            return Err(EngineError::InvalidState("playout not initialized".to_owned()));
        }
        self.playing.store(true, Ordering::SeqCst);
        Ok(())
    }

    fn stop_playout(&self) -> Result<(), EngineError> {
        self.playing.store(false, Ordering::SeqCst);
        Ok(())
    }

    fn is_recording_initialized(&self) -> bool {
        self.recording_initialized.load(Ordering::SeqCst)
    }

    fn initialize_recording(&self) -> Result<(), EngineError> {
        self.ensure_initialized("initialize_recording")?;
        self.recording_initialized.store(true, Ordering::SeqCst);
        Ok(())
    }

    fn is_recording(&self) -> bool {
        self.recording.load(Ordering::SeqCst)
    }

    fn start_recording(&self) -> Result<(), EngineError> {
        if !self.is_recording_initialized() {
            return Err(EngineError::InvalidState("recording not initialized".to_owned()));
        }
        self.recording.store(true, Ordering::SeqCst);
        Ok(())
    }

    fn stop_recording(&self) -> Result<(), EngineError> {
        self.recording.store(false, Ordering::SeqCst);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct NoopDelegate;

    impl AudioDeviceDelegate for NoopDelegate {
        fn deliver_recorded_data(&self, _frame: &AudioFrame<'_>) {}
        fn get_playout_data(&self, _frame: &mut AudioFrame<'_>) {}
    }

    #[test]
    fn platform_device_lifecycle() {
        let device = PlatformAudioDevice::new();
        assert!(device.initialize_playout().is_err());

        device.initialize(Arc::new(NoopDelegate)).unwrap();
        assert!(device.is_initialized());
        assert!(device.start_playout().is_err());

        device.initialize_playout().unwrap();
        device.start_playout().unwrap();
        assert!(device.is_playing());

        device.terminate().unwrap();
        assert!(!device.is_initialized());
        assert!(!device.is_playing());
        assert!(!device.is_playout_initialized());
    }
}
