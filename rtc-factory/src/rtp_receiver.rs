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

use std::fmt::{Debug, Formatter};

use rtc_engine::rtp_receiver as sys_rr;

use crate::{audio_device::AudioFrame, MediaType, RtcError};

#[derive(Clone)]
pub struct RtpReceiver {
    pub(crate) handle: sys_rr::RtpReceiver,
}

impl Debug for RtpReceiver {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        f.debug_struct("RtpReceiver")
            .field("id", &self.id())
            .field("media_type", &self.media_type())
            .finish()
    }
}

impl RtpReceiver {
    pub(crate) fn new(handle: sys_rr::RtpReceiver) -> Self {
        Self { handle }
    }

    pub fn id(&self) -> String {
        self.handle.id()
    }

    pub fn media_type(&self) -> MediaType {
        self.handle.media_type().into()
    }

    /// Fails when the linked engine has no jitter buffer delay support; see
    /// [`crate::set_playout_delay_hint_if_supported`] for the best-effort form.
    pub fn set_jitter_buffer_minimum_delay(
        &self,
        delay_seconds: Option<f64>,
    ) -> Result<(), RtcError> {
        Ok(self.handle.set_jitter_buffer_minimum_delay(delay_seconds)?)
    }

    pub fn jitter_buffer_minimum_delay(&self) -> Option<f64> {
        self.handle.jitter_buffer_minimum_delay()
    }

    pub fn deliver_remote_audio(&self, frame: &AudioFrame<'_>) -> Result<(), RtcError> {
        Ok(self.handle.deliver_remote_audio(frame)?)
    }

    pub fn ptr_eq(&self, other: &RtpReceiver) -> bool {
        self.handle.ptr_eq(&other.handle)
    }
}
