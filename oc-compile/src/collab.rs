//! Collaborators injected into the compiler: device state and configuration store.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use netcfg_core::model::SafeguardRule;
use netcfg_core::{parse_snapshot_file, DeviceSnapshot, ExistingNamedObjects, InstalledNeighbor, ParseError};
use thiserror::Error;

use crate::existing::resolve_existing_objects;

/// Errors returned by device-state readers.
#[derive(Debug, Error)]
pub enum DeviceError {
    #[error("failed to load device snapshot {path}: {source}")]
    Snapshot { path: String, source: ParseError },
    #[error("{0}")]
    Unavailable(String),
}

/// Read-only access to what is installed on the target device.
pub trait DeviceStateReader {
    /// AS number of the BGP instance in `vrf` (`""` is the default instance).
    fn global_as(&self, vrf: &str) -> Result<Option<u32>, DeviceError>;
    fn neighbors(&self) -> Result<Vec<InstalledNeighbor>, DeviceError>;
    fn existing_named_objects(&self) -> Result<ExistingNamedObjects, DeviceError>;
}

/// A device with nothing installed.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoDevice;

impl DeviceStateReader for NoDevice {
    fn global_as(&self, _vrf: &str) -> Result<Option<u32>, DeviceError> {
        Ok(None)
    }

    fn neighbors(&self) -> Result<Vec<InstalledNeighbor>, DeviceError> {
        Ok(Vec::new())
    }

    fn existing_named_objects(&self) -> Result<ExistingNamedObjects, DeviceError> {
        Ok(ExistingNamedObjects::default())
    }
}

/// Device state captured offline in a JSON snapshot.
#[derive(Debug, Clone, Default)]
pub struct SnapshotReader {
    snapshot: DeviceSnapshot,
}

impl SnapshotReader {
    pub fn new(snapshot: DeviceSnapshot) -> Self {
        Self { snapshot }
    }

    pub fn from_file(path: &Path) -> Result<Self, DeviceError> {
        let snapshot = parse_snapshot_file(path).map_err(|source| DeviceError::Snapshot {
            path: path.display().to_string(),
            source,
        })?;
        Ok(Self::new(snapshot))
    }
}

impl DeviceStateReader for SnapshotReader {
    fn global_as(&self, _vrf: &str) -> Result<Option<u32>, DeviceError> {
        Ok(self.snapshot.global_as)
    }

    fn neighbors(&self) -> Result<Vec<InstalledNeighbor>, DeviceError> {
        Ok(self.snapshot.neighbors.clone())
    }

    fn existing_named_objects(&self) -> Result<ExistingNamedObjects, DeviceError> {
        match &self.snapshot.running_config {
            Some(running) => Ok(resolve_existing_objects(running)),
            None => Err(DeviceError::Unavailable(
                "snapshot carries no running configuration".to_string(),
            )),
        }
    }
}

/// Errors returned when loading or decoding store values.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to read store file {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("failed to parse store file {path}: {source}")]
    Parse {
        path: String,
        source: toml::de::Error,
    },
    #[error("invalid value for store key '{key}': {source}")]
    Value {
        key: String,
        source: serde_json::Error,
    },
}

/// Key/value lookup for persisted settings such as `vrf` and `safeguards`.
pub trait ConfigStore {
    fn get(&self, key: &str) -> Option<serde_json::Value>;
}

/// In-memory store.
#[derive(Debug, Clone, Default)]
pub struct StaticStore {
    values: BTreeMap<String, serde_json::Value>,
}

impl StaticStore {
    pub fn with(mut self, key: &str, value: serde_json::Value) -> Self {
        self.values.insert(key.to_string(), value);
        self
    }
}

impl ConfigStore for StaticStore {
    fn get(&self, key: &str) -> Option<serde_json::Value> {
        self.values.get(key).cloned()
    }
}

/// Store backed by a TOML file's top-level keys.
#[derive(Debug, Clone, Default)]
pub struct TomlStore {
    table: toml::Table,
}

impl TomlStore {
    pub fn from_file(path: &Path) -> Result<Self, StoreError> {
        let raw = fs::read_to_string(path).map_err(|source| StoreError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::parse(&raw, path.display().to_string())
    }

    fn parse(raw: &str, path: String) -> Result<Self, StoreError> {
        let table = raw
            .parse::<toml::Table>()
            .map_err(|source| StoreError::Parse { path, source })?;
        Ok(Self { table })
    }
}

impl ConfigStore for TomlStore {
    fn get(&self, key: &str) -> Option<serde_json::Value> {
        self.table
            .get(key)
            .and_then(|value| serde_json::to_value(value).ok())
    }
}

/// VRF name from the store, if set.
pub fn store_vrf(store: &dyn ConfigStore) -> Option<String> {
    store
        .get("vrf")
        .and_then(|value| value.as_str().map(ToString::to_string))
}

/// Vendor identifier from the store, if set.
pub fn store_vendor(store: &dyn ConfigStore) -> Option<String> {
    store
        .get("vendor")
        .and_then(|value| value.as_str().map(ToString::to_string))
}

/// Safeguard rules from the store; a missing key means no rules.
pub fn store_safeguards(store: &dyn ConfigStore) -> Result<Vec<SafeguardRule>, StoreError> {
    let Some(value) = store.get("safeguards") else {
        return Ok(Vec::new());
    };
    serde_json::from_value(value).map_err(|source| StoreError::Value {
        key: "safeguards".to_string(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use netcfg_core::model::SafeguardField;

    #[test]
    fn toml_store_exposes_vrf_and_safeguards() {
        let store = TomlStore::parse(
            r#"
vrf = "RED"

[[safeguards]]
field = "description"
contains = "transit"
minimum_up = 1
"#,
            "inline".to_string(),
        )
        .expect("store");

        assert_eq!(store_vrf(&store).as_deref(), Some("RED"));
        let rules = store_safeguards(&store).expect("rules");
        assert_eq!(rules.len(), 1);
        assert_eq!(rules[0].field, SafeguardField::Description);
        assert!(!rules[0].remove_down_only);
    }

    #[test]
    fn malformed_safeguards_are_reported() {
        let store = StaticStore::default().with("safeguards", serde_json::json!([{"field": "asn"}]));
        assert!(matches!(
            store_safeguards(&store),
            Err(StoreError::Value { .. })
        ));
        assert!(store_vrf(&store).is_none());
    }

    #[test]
    fn snapshot_without_running_config_cannot_list_objects() {
        let reader = SnapshotReader::new(DeviceSnapshot::default());
        assert!(reader.existing_named_objects().is_err());
        assert_eq!(reader.global_as("").expect("as"), None);
    }

    #[test]
    fn no_device_has_nothing_installed() {
        assert!(NoDevice.neighbors().expect("neighbors").is_empty());
        assert!(NoDevice.existing_named_objects().expect("objects").is_empty());
    }
}
