//! Inputs shared by the subcommands: document, store, vendor, VRF and rules.

use std::path::Path;
use std::str::FromStr;

use anyhow::{anyhow, Context, Result};
use netcfg_core::model::SafeguardRule;
use netcfg_core::{parse_file, Document};
use oc_compile::collab::{
    store_safeguards, store_vendor, store_vrf, ConfigStore, DeviceStateReader, NoDevice,
    SnapshotReader, StaticStore, TomlStore,
};
use oc_compile::Vendor;
use tracing::debug;

use crate::cli::VendorArg;

pub fn load_document(path: &Path) -> Result<Document> {
    parse_file(path).with_context(|| format!("failed to parse {}", path.display()))
}

pub fn load_store(path: Option<&Path>) -> Result<Box<dyn ConfigStore>> {
    match path {
        Some(path) => {
            let store = TomlStore::from_file(path)
                .with_context(|| format!("failed to load store {}", path.display()))?;
            Ok(Box::new(store))
        }
        None => Ok(Box::new(StaticStore::default())),
    }
}

pub fn load_device(path: Option<&Path>) -> Result<Box<dyn DeviceStateReader>> {
    match path {
        Some(path) => {
            let reader = SnapshotReader::from_file(path)
                .with_context(|| format!("failed to load device snapshot {}", path.display()))?;
            Ok(Box::new(reader))
        }
        None => Ok(Box::new(NoDevice)),
    }
}

/// `--vendor`, else the store's `vendor` key.
pub fn resolve_vendor(arg: Option<VendorArg>, store: &dyn ConfigStore) -> Result<Vendor> {
    if let Some(arg) = arg {
        return Ok(arg.into());
    }
    let name = store_vendor(store)
        .ok_or_else(|| anyhow!("no vendor given: pass --vendor or set `vendor` in the store"))?;
    Ok(Vendor::from_str(&name)?)
}

/// `--vrf`, else the store's `vrf` key, else the default instance.
pub fn resolve_vrf(arg: Option<String>, store: &dyn ConfigStore) -> String {
    arg.or_else(|| store_vrf(store)).unwrap_or_default()
}

/// Rules from `--safeguards`, else from the store.
pub fn resolve_safeguards(
    file: Option<&Path>,
    store: &dyn ConfigStore,
) -> Result<Vec<SafeguardRule>> {
    let rules = match file {
        Some(path) => {
            let rules_store = TomlStore::from_file(path)
                .with_context(|| format!("failed to load safeguards {}", path.display()))?;
            store_safeguards(&rules_store)
                .with_context(|| format!("invalid safeguards in {}", path.display()))?
        }
        None => store_safeguards(store).context("invalid safeguards in store")?,
    };
    debug!(rules = rules.len(), "safeguard rules loaded");
    Ok(rules)
}
