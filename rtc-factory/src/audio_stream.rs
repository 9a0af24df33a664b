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
    pin::Pin,
    sync::Arc,
    task::{Context, Poll},
};

use futures_util::stream::Stream;
use rtc_engine::audio_transport::{AudioSink, AudioTransport};
use tokio::sync::mpsc;

use crate::audio_device::AudioFrame;

/// Frames captured by the factory's audio device, in delivery order.
pub struct RecordedAudioStream {
    transport: Arc<AudioTransport>,
    sink: Arc<dyn AudioSink>,
    frame_rx: mpsc::UnboundedReceiver<AudioFrame<'static>>,
}

impl RecordedAudioStream {
    pub(crate) fn new(transport: Arc<AudioTransport>) -> Self {
        let (frame_tx, frame_rx) = mpsc::unbounded_channel();
        let sink: Arc<dyn AudioSink> = Arc::new(RecordedAudioObserver { frame_tx });
        transport.add_sink(sink.clone());

        Self { transport, sink, frame_rx }
    }

    pub async fn recv(&mut self) -> Option<AudioFrame<'static>> {
        self.frame_rx.recv().await
    }

    pub fn try_recv(&mut self) -> Option<AudioFrame<'static>> {
        self.frame_rx.try_recv().ok()
    }

    pub fn close(&mut self) {
        self.transport.remove_sink(&self.sink);
        self.frame_rx.close();
    }
}

impl Drop for RecordedAudioStream {
    fn drop(&mut self) {
        self.close();
    }
}

impl Stream for RecordedAudioStream {
    type Item = AudioFrame<'static>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context) -> Poll<Option<Self::Item>> {
        self.frame_rx.poll_recv(cx)
    }
}

struct RecordedAudioObserver {
    frame_tx: mpsc::UnboundedSender<AudioFrame<'static>>,
}

impl AudioSink for RecordedAudioObserver {
    fn on_data(&self, frame: &AudioFrame<'_>) {
        let _ = self.frame_tx.send(frame.to_owned_frame());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rtc_engine::audio_device::AudioDeviceDelegate;

    #[tokio::test]
    async fn receives_frames_until_closed() {
        let transport = Arc::new(AudioTransport::new());
        let mut stream = RecordedAudioStream::new(transport.clone());
        assert_eq!(transport.sink_count(), 1);

        let mut frame = AudioFrame::new(48000, 2, 480);
        frame.data.to_mut()[0] = 1234;
        transport.deliver_recorded_data(&frame);

        let received = stream.recv().await.unwrap();
        assert_eq!(received.num_channels, 2);
        assert_eq!(received.data[0], 1234);

        stream.close();
        assert_eq!(transport.sink_count(), 0);
        assert!(stream.recv().await.is_none());
    }
}
