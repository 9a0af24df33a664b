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
    Arc, Weak,
};

use parking_lot::Mutex;

use crate::{
    audio_frame::AudioFrame,
    audio_transport::PlayoutSource,
    logsink::engine_log,
    peer_connection_factory::FactoryInner,
    supports, Capability, EngineError, MediaType,
};

/// Upper bound the jitter buffer accepts for its minimum delay.
pub const MAX_JITTER_BUFFER_MINIMUM_DELAY: f64 = 10.0;

static NEXT_RECEIVER_ID: AtomicU64 = AtomicU64::new(1);

#[derive(Clone)]
pub struct RtpReceiver {
    inner: Arc<ReceiverInner>,
}

struct ReceiverInner {
    id: String,
    media_type: MediaType,
    jitter_buffer_minimum_delay: Mutex<Option<f64>>,
    factory: Weak<FactoryInner>,
    // Audio receivers only
    playout: Option<Arc<PlayoutSource>>,
}

impl std::fmt::Debug for RtpReceiver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RtpReceiver")
            .field("id", &self.inner.id)
            .field("media_type", &self.inner.media_type)
            .finish()
    }
}

impl RtpReceiver {
    pub(crate) fn new(media_type: MediaType, factory: Weak<FactoryInner>) -> Self {
        let n = NEXT_RECEIVER_ID.fetch_add(1, Ordering::Relaxed);
        let playout = match (media_type, factory.upgrade()) {
            (MediaType::Audio, Some(factory)) => Some(factory.transport().add_playout_source()),
            _ => None,
        };

        Self {
            inner: Arc::new(ReceiverInner {
                id: format!("{}-receiver-{}", media_type.as_str(), n),
                media_type,
                jitter_buffer_minimum_delay: Mutex::new(None),
                factory,
                playout,
            }),
        }
    }

    pub fn id(&self) -> String {
        self.inner.id.clone()
    }

    pub fn media_type(&self) -> MediaType {
        self.inner.media_type
    }

    /// Sets the minimum jitter buffer delay. `None` restores the default.
    /// Values are clamped to `[0, MAX_JITTER_BUFFER_MINIMUM_DELAY]`.
    pub fn set_jitter_buffer_minimum_delay(
        &self,
        delay_seconds: Option<f64>,
    ) -> Result<(), EngineError> {
        if !supports(Capability::JitterBufferMinimumDelay) {
            return Err(EngineError::Unsupported("jitter buffer minimum delay"));
        }

        let delay = match delay_seconds {
            Some(d) if d.is_nan() => {
                return Err(EngineError::InvalidParameter("delay is NaN".to_owned()))
            }
            Some(d) => Some(d.clamp(0.0, MAX_JITTER_BUFFER_MINIMUM_DELAY)),
            None => None,
        };

        engine_log!(Verbose, "{}: jitter buffer minimum delay {:?}", self.inner.id, delay);
        *self.inner.jitter_buffer_minimum_delay.lock() = delay;
        Ok(())
    }

    pub fn jitter_buffer_minimum_delay(&self) -> Option<f64> {
        *self.inner.jitter_buffer_minimum_delay.lock()
    }

    /// Queues decoded remote audio for playout on the factory's device,
    /// mixed with the other audio receivers of the factory.
    pub fn deliver_remote_audio(&self, frame: &AudioFrame<'_>) -> Result<(), EngineError> {
        if self.inner.media_type != MediaType::Audio {
            return Err(EngineError::InvalidState(format!(
                "{} is not an audio receiver",
                self.inner.id
            )));
        }

        let released = || EngineError::InvalidState("factory released".to_owned());
        if self.inner.factory.strong_count() == 0 {
            return Err(released());
        }
        let playout = self.inner.playout.as_ref().ok_or_else(released)?;
        playout.push(frame.to_owned_frame());
        Ok(())
    }

    pub fn ptr_eq(&self, other: &RtpReceiver) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn receiver() -> RtpReceiver {
        RtpReceiver::new(MediaType::Audio, Weak::new())
    }

    #[cfg(feature = "jitter-buffer-delay")]
    #[test]
    fn delay_is_clamped() {
        let r = receiver();
        r.set_jitter_buffer_minimum_delay(Some(-1.0)).unwrap();
        assert_eq!(r.jitter_buffer_minimum_delay(), Some(0.0));

        r.set_jitter_buffer_minimum_delay(Some(42.0)).unwrap();
        assert_eq!(r.jitter_buffer_minimum_delay(), Some(MAX_JITTER_BUFFER_MINIMUM_DELAY));

        r.set_jitter_buffer_minimum_delay(None).unwrap();
        assert_eq!(r.jitter_buffer_minimum_delay(), None);
    }

    #[cfg(feature = "jitter-buffer-delay")]
    #[test]
    fn nan_delay_is_rejected() {
        let r = receiver();
        r.set_jitter_buffer_minimum_delay(Some(0.5)).unwrap();
        assert!(r.set_jitter_buffer_minimum_delay(Some(f64::NAN)).is_err());
        assert_eq!(r.jitter_buffer_minimum_delay(), Some(0.5));
    }

    #[cfg(not(feature = "jitter-buffer-delay"))]
    #[test]
    fn delay_unsupported_without_feature() {
        let r = receiver();
        assert!(matches!(
            r.set_jitter_buffer_minimum_delay(Some(0.5)),
            Err(EngineError::Unsupported(_))
        ));
        assert_eq!(r.jitter_buffer_minimum_delay(), None);
    }

    #[test]
    fn remote_audio_needs_live_factory() {
        let r = receiver();
        assert!(r.deliver_remote_audio(&AudioFrame::new(48000, 1, 480)).is_err());

        let video = RtpReceiver::new(MediaType::Video, Weak::new());
        assert!(matches!(
            video.deliver_remote_audio(&AudioFrame::new(48000, 1, 480)),
            Err(EngineError::InvalidState(_))
        ));
    }

    #[test]
    fn receivers_get_distinct_ids() {
        let a = receiver();
        let b = receiver();
        assert_ne!(a.id(), b.id());
        assert!(a.ptr_eq(&a.clone()));
        assert!(!a.ptr_eq(&b));
    }
}
