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

use std::borrow::Cow;

pub(crate) fn sample_count(num_channels: u32, samples_per_channel: u32) -> usize {
    num_channels as usize * samples_per_channel as usize
}

/// Interleaved 16-bit PCM, usually 10ms worth of samples.
#[derive(Debug, Clone, PartialEq)]
pub struct AudioFrame<'a> {
    pub data: Cow<'a, [i16]>,
    pub sample_rate: u32,
    pub num_channels: u32,
    pub samples_per_channel: u32,
}

impl AudioFrame<'_> {
    // Owned, zeroed
    pub fn new(sample_rate: u32, num_channels: u32, samples_per_channel: u32) -> Self {
        Self {
            data: vec![0; sample_count(num_channels, samples_per_channel)].into(),
            sample_rate,
            num_channels,
            samples_per_channel,
        }
    }

    pub fn to_owned_frame(&self) -> AudioFrame<'static> {
        AudioFrame {
            data: Cow::Owned(self.data.to_vec()),
            sample_rate: self.sample_rate,
            num_channels: self.num_channels,
            samples_per_channel: self.samples_per_channel,
        }
    }

    pub fn is_silent(&self) -> bool {
        self.data.iter().all(|s| *s == 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_frame_is_zeroed() {
        let frame = AudioFrame::new(48000, 2, 480);
        assert_eq!(frame.data.len(), 960);
        assert!(frame.is_silent());
    }

    #[cfg(target_pointer_width = "64")]
    #[test]
    fn sample_count_does_not_wrap_u32() {
        assert_eq!(sample_count(u32::MAX, 2), u32::MAX as usize * 2);
        assert_eq!(sample_count(65536, 65536), 1usize << 32);
    }
}
