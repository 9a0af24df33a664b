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

use rtc_engine::peer_connection_factory as sys_pcf;
use serde::{Deserialize, Serialize};

use crate::{RtcError, RtcErrorType};

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdapterType {
    Ethernet,
    Wifi,
    Cellular,
    Vpn,
    Loopback,
}

/// Factory-wide settings. Every field defaults to the engine default, so a
/// partial JSON document is valid.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FactoryOptions {
    pub disable_encryption: bool,
    pub disable_network_monitor: bool,
    /// Network adapters skipped during candidate gathering.
    pub network_ignore_mask: Vec<AdapterType>,
}

impl FactoryOptions {
    pub fn from_json(json: &str) -> Result<Self, RtcError> {
        serde_json::from_str(json).map_err(|e| RtcError {
            error_type: RtcErrorType::InvalidParameter,
            message: format!("invalid factory options: {}", e),
        })
    }

    pub fn to_json(&self) -> Result<String, RtcError> {
        serde_json::to_string(self).map_err(|e| RtcError {
            error_type: RtcErrorType::Internal,
            message: format!("failed to encode factory options: {}", e),
        })
    }
}

impl From<AdapterType> for sys_pcf::AdapterType {
    fn from(adapter: AdapterType) -> Self {
        match adapter {
            AdapterType::Ethernet => sys_pcf::AdapterType::Ethernet,
            AdapterType::Wifi => sys_pcf::AdapterType::Wifi,
            AdapterType::Cellular => sys_pcf::AdapterType::Cellular,
            AdapterType::Vpn => sys_pcf::AdapterType::Vpn,
            AdapterType::Loopback => sys_pcf::AdapterType::Loopback,
        }
    }
}

impl From<FactoryOptions> for sys_pcf::PeerConnectionFactoryOptions {
    fn from(options: FactoryOptions) -> Self {
        sys_pcf::PeerConnectionFactoryOptions {
            disable_encryption: options.disable_encryption,
            disable_network_monitor: options.disable_network_monitor,
            network_ignore_mask: options
                .network_ignore_mask
                .into_iter()
                .fold(0, |mask, adapter| mask | sys_pcf::AdapterType::from(adapter).mask()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_uses_defaults() {
        let options = FactoryOptions::from_json(r#"{"network_ignore_mask": ["vpn", "loopback"]}"#)
            .unwrap();
        assert!(!options.disable_encryption);
        assert_eq!(options.network_ignore_mask, vec![AdapterType::Vpn, AdapterType::Loopback]);

        let native: sys_pcf::PeerConnectionFactoryOptions = options.into();
        assert_eq!(
            native.network_ignore_mask,
            sys_pcf::AdapterType::Vpn.mask() | sys_pcf::AdapterType::Loopback.mask()
        );
    }

    #[test]
    fn empty_object_is_default() {
        assert_eq!(FactoryOptions::from_json("{}").unwrap(), FactoryOptions::default());
    }

    #[test]
    fn malformed_json_is_invalid_parameter() {
        let err = FactoryOptions::from_json(r#"{"network_ignore_mask": ["token_ring"]}"#)
            .unwrap_err();
        assert_eq!(err.error_type, RtcErrorType::InvalidParameter);
    }

    #[test]
    fn json_survives_encoding() {
        let options = FactoryOptions {
            disable_network_monitor: true,
            network_ignore_mask: vec![AdapterType::Cellular],
            ..Default::default()
        };
        let json = options.to_json().unwrap();
        assert_eq!(FactoryOptions::from_json(&json).unwrap(), options);
    }
}
