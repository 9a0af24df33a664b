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

use std::sync::Arc;

use parking_lot::Mutex;

use crate::{
    logsink::engine_log, peer_connection_factory::FactoryInner, rtp_receiver::RtpReceiver,
    EngineError, MediaType,
};

const ICE_URL_SCHEMES: [&str; 4] = ["stun:", "stuns:", "turn:", "turns:"];

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IceServer {
    pub urls: Vec<String>,
    pub username: String,
    pub password: String,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum IceTransportType {
    Relay,
    NoHost,
    All,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum GatheringPolicy {
    Once,
    Continually,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RtcConfiguration {
    pub ice_servers: Vec<IceServer>,
    pub ice_transport_type: IceTransportType,
    pub gathering_policy: GatheringPolicy,
}

impl Default for RtcConfiguration {
    fn default() -> Self {
        Self {
            ice_servers: vec![],
            ice_transport_type: IceTransportType::All,
            gathering_policy: GatheringPolicy::Continually,
        }
    }
}

impl RtcConfiguration {
    pub(crate) fn validate(&self) -> Result<(), EngineError> {
        for server in &self.ice_servers {
            if server.urls.is_empty() {
                return Err(EngineError::InvalidParameter("ice server without urls".to_owned()));
            }
            for url in &server.urls {
                if !ICE_URL_SCHEMES.iter().any(|scheme| url.starts_with(scheme)) {
                    return Err(EngineError::InvalidParameter(format!("bad ice url: {}", url)));
                }
                if url.starts_with("turn") && server.username.is_empty() {
                    return Err(EngineError::InvalidParameter(format!(
                        "turn server {} needs credentials",
                        url
                    )));
                }
            }
        }
        Ok(())
    }
}

#[derive(Clone)]
pub struct PeerConnection {
    inner: Arc<PeerInner>,
}

struct PeerInner {
    factory: Arc<FactoryInner>,
    config: RtcConfiguration,
    state: Mutex<PeerState>,
}

struct PeerState {
    receivers: Vec<RtpReceiver>,
    playout_enabled: bool,
    playout_active: bool,
    recording_active: bool,
    closed: bool,
}

impl PeerConnection {
    pub(crate) fn new(factory: Arc<FactoryInner>, config: RtcConfiguration) -> Self {
        Self {
            inner: Arc::new(PeerInner {
                factory,
                config,
                state: Mutex::new(PeerState {
                    receivers: Vec::new(),
                    playout_enabled: true,
                    playout_active: false,
                    recording_active: false,
                    closed: false,
                }),
            }),
        }
    }

    pub fn configuration(&self) -> &RtcConfiguration {
        &self.inner.config
    }

    /// Adds an inbound stream. The first audio receiver starts playout on
    /// the factory's audio device while playout is enabled.
    pub fn add_receiver(&self, media_type: MediaType) -> Result<RtpReceiver, EngineError> {
        if media_type == MediaType::Data {
            return Err(EngineError::InvalidParameter("data has no rtp receiver".to_owned()));
        }

        let mut state = self.inner.state.lock();
        if state.closed {
            return Err(EngineError::InvalidState("peer connection closed".to_owned()));
        }

        if media_type == MediaType::Audio && state.playout_enabled && !state.playout_active {
            self.inner.factory.acquire_playout()?;
            state.playout_active = true;
        }

        let receiver = RtpReceiver::new(media_type, Arc::downgrade(&self.inner.factory));
        engine_log!(Verbose, "added receiver {}", receiver.id());
        state.receivers.push(receiver.clone());
        Ok(receiver)
    }

    pub fn receivers(&self) -> Vec<RtpReceiver> {
        self.inner.state.lock().receivers.clone()
    }

    pub fn set_audio_playout(&self, enabled: bool) -> Result<(), EngineError> {
        let mut state = self.inner.state.lock();
        state.playout_enabled = enabled;
        let has_audio = state.receivers.iter().any(|r| r.media_type() == MediaType::Audio);

        if enabled && has_audio && !state.playout_active && !state.closed {
            self.inner.factory.acquire_playout()?;
            state.playout_active = true;
        } else if !enabled && state.playout_active {
            self.inner.factory.release_playout();
            state.playout_active = false;
        }
        Ok(())
    }

    pub fn set_audio_recording(&self, enabled: bool) -> Result<(), EngineError> {
        let mut state = self.inner.state.lock();
        if enabled && state.closed {
            return Err(EngineError::InvalidState("peer connection closed".to_owned()));
        }

        if enabled && !state.recording_active {
            self.inner.factory.acquire_recording()?;
            state.recording_active = true;
        } else if !enabled && state.recording_active {
            self.inner.factory.release_recording();
            state.recording_active = false;
        }
        Ok(())
    }

    pub fn close(&self) {
        self.inner.close();
    }

    pub fn is_closed(&self) -> bool {
        self.inner.state.lock().closed
    }
}

impl PeerInner {
    fn close(&self) {
        let mut state = self.state.lock();
        if state.closed {
            return;
        }
        if state.playout_active {
            self.factory.release_playout();
            state.playout_active = false;
        }
        if state.recording_active {
            self.factory.release_recording();
            state.recording_active = false;
        }
        state.receivers.clear();
        state.closed = true;
    }
}

impl Drop for PeerInner {
    fn drop(&mut self) {
        self.close();
    }
}

impl std::fmt::Debug for PeerConnection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.inner.state.lock();
        f.debug_struct("PeerConnection")
            .field("receivers", &state.receivers.len())
            .field("closed", &state.closed)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::peer_connection_factory::PeerConnectionFactory;

    fn factory() -> PeerConnectionFactory {
        PeerConnectionFactory::new(Default::default(), None).unwrap()
    }

    #[test]
    fn audio_receiver_starts_playout() {
        let factory = factory();
        let pc = factory.create_peer_connection(RtcConfiguration::default()).unwrap();
        let device = factory.audio_device();

        pc.add_receiver(MediaType::Video).unwrap();
        assert!(!device.is_playing());

        pc.add_receiver(MediaType::Audio).unwrap();
        assert!(device.is_playing());

        pc.set_audio_playout(false).unwrap();
        assert!(!device.is_playing());

        pc.set_audio_playout(true).unwrap();
        assert!(device.is_playing());

        pc.close();
        assert!(!device.is_playing());
        assert!(pc.receivers().is_empty());
    }

    #[test]
    fn playout_is_shared_between_connections() {
        let factory = factory();
        let device = factory.audio_device();
        let a = factory.create_peer_connection(Default::default()).unwrap();
        let b = factory.create_peer_connection(Default::default()).unwrap();
        a.add_receiver(MediaType::Audio).unwrap();
        b.add_receiver(MediaType::Audio).unwrap();

        drop(a);
        assert!(device.is_playing());
        drop(b);
        assert!(!device.is_playing());
    }

    #[test]
    fn recording_toggles() {
        let factory = factory();
        let device = factory.audio_device();
        let pc = factory.create_peer_connection(Default::default()).unwrap();

        pc.set_audio_recording(true).unwrap();
        assert!(device.is_recording());
        pc.set_audio_recording(false).unwrap();
        assert!(!device.is_recording());
    }

    #[test]
    fn closed_connection_rejects_receivers() {
        let factory = factory();
        let pc = factory.create_peer_connection(Default::default()).unwrap();
        pc.close();
        assert!(pc.is_closed());
        assert!(matches!(pc.add_receiver(MediaType::Audio), Err(EngineError::InvalidState(_))));
        assert!(pc.add_receiver(MediaType::Data).is_err());
    }

    #[test]
    fn ice_urls_are_validated() {
        let factory = factory();
        let bad = RtcConfiguration {
            ice_servers: vec![IceServer {
                urls: vec!["http://example.com".into()],
                ..Default::default()
            }],
            ..Default::default()
        };
        assert!(factory.create_peer_connection(bad).is_err());

        let turn_without_creds = RtcConfiguration {
            ice_servers: vec![IceServer {
                urls: vec!["turn:turn.example.com:3478".into()],
                ..Default::default()
            }],
            ..Default::default()
        };
        assert!(factory.create_peer_connection(turn_without_creds).is_err());

        let ok = RtcConfiguration {
            ice_servers: vec![IceServer {
                urls: vec!["stun:stun.l.google.com:19302".into()],
                ..Default::default()
            }],
            ..Default::default()
        };
        assert!(factory.create_peer_connection(ok).is_ok());
    }
}
