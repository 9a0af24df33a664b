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

pub use crate::audio_device::{
    AudioDevice, AudioDeviceDelegate, AudioDeviceSource, AudioFrame, EngineError,
    PlatformAudioDevice,
};
pub use crate::audio_stream::RecordedAudioStream;
pub use crate::capabilities::{capabilities, LibraryCapabilities, LibraryVersion};
pub use crate::factory_builder::{
    make_default_factory, make_factory, set_playout_delay_hint_if_supported, FactoryBuilder,
};
pub use crate::options::{AdapterType, FactoryOptions};
pub use crate::peer_connection::{
    ContinualGatheringPolicy, IceServer, IceTransportsType, PeerConnection, RtcConfiguration,
};
pub use crate::peer_connection_factory::PeerConnectionFactory;
pub use crate::rtp_parameters::*;
pub use crate::rtp_receiver::RtpReceiver;
pub use crate::{MediaType, RtcError, RtcErrorType};
