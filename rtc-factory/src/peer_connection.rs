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

use rtc_engine::peer_connection as sys_pc;

use crate::{rtp_receiver::RtpReceiver, MediaType, RtcError};

#[derive(Debug, Clone)]
pub struct IceServer {
    pub urls: Vec<String>,
    pub username: String,
    pub password: String,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ContinualGatheringPolicy {
    GatherOnce,
    GatherContinually,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum IceTransportsType {
    Relay,
    NoHost,
    All,
}

#[derive(Debug, Clone)]
pub struct RtcConfiguration {
    pub ice_servers: Vec<IceServer>,
    pub continual_gathering_policy: ContinualGatheringPolicy,
    pub ice_transport_type: IceTransportsType,
}

impl Default for RtcConfiguration {
    fn default() -> Self {
        Self {
            ice_servers: vec![],
            continual_gathering_policy: ContinualGatheringPolicy::GatherContinually,
            ice_transport_type: IceTransportsType::All,
        }
    }
}

impl From<IceServer> for sys_pc::IceServer {
    fn from(server: IceServer) -> Self {
        sys_pc::IceServer {
            urls: server.urls,
            username: server.username,
            password: server.password,
        }
    }
}

impl From<IceTransportsType> for sys_pc::IceTransportType {
    fn from(itt: IceTransportsType) -> Self {
        match itt {
            IceTransportsType::Relay => sys_pc::IceTransportType::Relay,
            IceTransportsType::NoHost => sys_pc::IceTransportType::NoHost,
            IceTransportsType::All => sys_pc::IceTransportType::All,
        }
    }
}

impl From<ContinualGatheringPolicy> for sys_pc::GatheringPolicy {
    fn from(cgp: ContinualGatheringPolicy) -> Self {
        match cgp {
            ContinualGatheringPolicy::GatherOnce => sys_pc::GatheringPolicy::Once,
            ContinualGatheringPolicy::GatherContinually => sys_pc::GatheringPolicy::Continually,
        }
    }
}

impl From<RtcConfiguration> for sys_pc::RtcConfiguration {
    fn from(config: RtcConfiguration) -> Self {
        sys_pc::RtcConfiguration {
            ice_servers: config.ice_servers.into_iter().map(Into::into).collect(),
            ice_transport_type: config.ice_transport_type.into(),
            gathering_policy: config.continual_gathering_policy.into(),
        }
    }
}

#[derive(Clone)]
pub struct PeerConnection {
    pub(crate) handle: sys_pc::PeerConnection,
}

impl Debug for PeerConnection {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        f.debug_struct("PeerConnection")
            .field("receivers", &self.receivers().len())
            .field("closed", &self.is_closed())
            .finish()
    }
}

impl PeerConnection {
    /// Adds an inbound stream. The first audio receiver starts playout on
    /// the factory's audio device.
    pub fn add_receiver(&self, media_type: MediaType) -> Result<RtpReceiver, RtcError> {
        Ok(RtpReceiver::new(self.handle.add_receiver(media_type.into())?))
    }

    pub fn receivers(&self) -> Vec<RtpReceiver> {
        self.handle.receivers().into_iter().map(RtpReceiver::new).collect()
    }

    pub fn set_audio_playout(&self, enabled: bool) -> Result<(), RtcError> {
        Ok(self.handle.set_audio_playout(enabled)?)
    }

    pub fn set_audio_recording(&self, enabled: bool) -> Result<(), RtcError> {
        Ok(self.handle.set_audio_recording(enabled)?)
    }

    pub fn close(&self) {
        self.handle.close()
    }

    pub fn is_closed(&self) -> bool {
        self.handle.is_closed()
    }
}
