//! Device-observed state consumed by the compiler.

use std::collections::BTreeSet;
use std::net::IpAddr;

use serde::{Deserialize, Serialize};

use crate::model::SafeguardField;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionState {
    Up,
    Down,
}

/// A BGP session currently installed on the device.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct InstalledNeighbor {
    pub remote_address: IpAddr,
    pub state: SessionState,
    #[serde(default)]
    pub peer_group: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub remote_as: Option<u32>,
}

impl InstalledNeighbor {
    /// Value of the inspected attribute; missing values read as empty.
    pub fn field(&self, field: SafeguardField) -> &str {
        let value = match field {
            SafeguardField::PeerGroup => &self.peer_group,
            SafeguardField::Description => &self.description,
        };
        value.as_deref().unwrap_or("")
    }

    pub fn is_up(&self) -> bool {
        self.state == SessionState::Up
    }

    pub fn is_ipv6(&self) -> bool {
        self.remote_address.is_ipv6()
    }
}

/// Named policy objects currently installed on an FRR-class device.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct ExistingNamedObjects {
    #[serde(default)]
    pub ipv4_prefix_lists: BTreeSet<String>,
    #[serde(default)]
    pub ipv6_prefix_lists: BTreeSet<String>,
    #[serde(default)]
    pub community_lists: BTreeSet<String>,
    #[serde(default)]
    pub route_maps: BTreeSet<String>,
}

impl ExistingNamedObjects {
    pub fn is_empty(&self) -> bool {
        self.ipv4_prefix_lists.is_empty()
            && self.ipv6_prefix_lists.is_empty()
            && self.community_lists.is_empty()
            && self.route_maps.is_empty()
    }
}

/// Offline capture of a device, as read from a snapshot file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct DeviceSnapshot {
    #[serde(default)]
    pub global_as: Option<u32>,
    #[serde(default)]
    pub neighbors: Vec<InstalledNeighbor>,
    /// Raw running configuration, when the platform exposes one.
    #[serde(default)]
    pub running_config: Option<String>,
}
