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
    collections::VecDeque,
    sync::{
        atomic::{AtomicU64, Ordering},
        Arc, Weak,
    },
};

use parking_lot::Mutex;

use crate::{audio_device::AudioDeviceDelegate, audio_frame::AudioFrame};

/// 500ms of 10ms frames, per source
pub const MAX_QUEUED_PLAYOUT_FRAMES: usize = 50;

pub trait AudioSink: Send + Sync {
    fn on_data(&self, frame: &AudioFrame<'_>);
}

/// Remote audio waiting for playout, one per audio receiver.
#[derive(Default)]
pub struct PlayoutSource {
    queue: Mutex<VecDeque<AudioFrame<'static>>>,
}

impl PlayoutSource {
    pub fn push(&self, frame: AudioFrame<'static>) {
        let mut queue = self.queue.lock();
        if queue.len() >= MAX_QUEUED_PLAYOUT_FRAMES {
            queue.pop_front();
        }
        queue.push_back(frame);
    }

    pub fn len(&self) -> usize {
        self.queue.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.lock().is_empty()
    }

    fn pop(&self) -> Option<AudioFrame<'static>> {
        self.queue.lock().pop_front()
    }
}

/// Delegate the factory hands to its audio device.
///
/// Recorded frames fan out to every registered [`AudioSink`]. Each playout
/// pull takes at most one frame from every live [`PlayoutSource`] and mixes
/// them; silence when nothing is pending. A source is dropped from the mix
/// once its owner releases it.
#[derive(Default)]
pub struct AudioTransport {
    sinks: Mutex<Vec<Arc<dyn AudioSink>>>,
    sources: Mutex<Vec<Weak<PlayoutSource>>>,
    recorded_frames: AtomicU64,
    playout_requests: AtomicU64,
}

impl AudioTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_sink(&self, sink: Arc<dyn AudioSink>) {
        self.sinks.lock().push(sink);
    }

    pub fn remove_sink(&self, sink: &Arc<dyn AudioSink>) {
        let target = Arc::as_ptr(sink) as *const ();
        self.sinks.lock().retain(|s| Arc::as_ptr(s) as *const () != target);
    }

    pub fn sink_count(&self) -> usize {
        self.sinks.lock().len()
    }

    pub fn add_playout_source(&self) -> Arc<PlayoutSource> {
        let source = Arc::new(PlayoutSource::default());
        self.sources.lock().push(Arc::downgrade(&source));
        source
    }

    pub fn playout_source_count(&self) -> usize {
        self.live_sources().len()
    }

    pub fn queued_playout_frames(&self) -> usize {
        self.live_sources().iter().map(|s| s.len()).sum()
    }

    pub fn recorded_frames(&self) -> u64 {
        self.recorded_frames.load(Ordering::Relaxed)
    }

    pub fn playout_requests(&self) -> u64 {
        self.playout_requests.load(Ordering::Relaxed)
    }

    fn live_sources(&self) -> Vec<Arc<PlayoutSource>> {
        let mut sources = self.sources.lock();
        sources.retain(|s| s.strong_count() > 0);
        sources.iter().filter_map(Weak::upgrade).collect()
    }
}

impl AudioDeviceDelegate for AudioTransport {
    fn deliver_recorded_data(&self, frame: &AudioFrame<'_>) {
        self.recorded_frames.fetch_add(1, Ordering::Relaxed);
        let sinks = self.sinks.lock().clone();
        for sink in sinks {
            sink.on_data(frame);
        }
    }

    fn get_playout_data(&self, frame: &mut AudioFrame<'_>) {
        self.playout_requests.fetch_add(1, Ordering::Relaxed);
        let out = frame.data.to_mut();
        out.iter_mut().for_each(|s| *s = 0);

        for source in self.live_sources() {
            if let Some(remote) = source.pop() {
                out.iter_mut()
                    .zip(remote.data.iter())
                    .for_each(|(mixed, sample)| *mixed = mixed.saturating_add(*sample));
            }
        }
    }
}

impl std::fmt::Debug for AudioTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AudioTransport")
            .field("sinks", &self.sink_count())
            .field("playout_sources", &self.playout_source_count())
            .finish()
    }
}
