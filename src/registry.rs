//! The persisted per-network registry of deployed contract addresses
//!
//! The deployments file is the single source of truth for "what has already
//! been deployed" on a network; it is trusted as written and never checked
//! against live chain state. Each entry also records which verification
//! backends have accepted the address, so re-runs skip completed work.
//!
//! Deployments are a rare, operator-driven action; concurrent runs against
//! the same network are not guarded and the later registry writer wins.

use std::{
    collections::{BTreeMap, BTreeSet},
    fs,
    path::{Path, PathBuf},
    str::FromStr,
};

use ethers::abi::Address;
use serde::{Deserialize, Serialize};

use crate::errors::ScriptError;

/// A single recorded deployment
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DeploymentRecord {
    /// The deployed contract address
    pub address: Address,
    /// The identifiers of verification backends that have accepted this address
    pub verified: BTreeSet<String>,
}

/// The on-disk form of a registry entry.
///
/// Older deployments files store a bare address string per contract; entries
/// whose verified set is empty are written back in that same form so an
/// unmutated load/persist round-trip leaves legacy content equivalent.
#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum RawRecord {
    /// Legacy form: the address alone
    Address(String),
    /// Extended form: address plus verification state
    Full {
        /// The deployed contract address
        address: String,
        /// Backends that have accepted this address
        #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
        verified: BTreeSet<String>,
    },
}

/// The registry of deployed contract addresses for one network
#[derive(Debug)]
pub struct DeploymentRegistry {
    /// The path of the backing deployments file
    path: PathBuf,
    /// The recorded deployments, keyed by logical contract name
    entries: BTreeMap<String, DeploymentRecord>,
}

impl DeploymentRegistry {
    /// Load the registry from the given deployments file.
    ///
    /// A missing file means no deployments have been made on this network and
    /// yields an empty registry; a file that exists but does not parse is fatal.
    pub fn load(path: &Path) -> Result<Self, ScriptError> {
        if !path.exists() {
            return Ok(Self {
                path: path.to_path_buf(),
                entries: BTreeMap::new(),
            });
        }

        let contents = fs::read_to_string(path)
            .map_err(|e| ScriptError::RegistryCorrupt(format!("{}: {}", path.display(), e)))?;
        let raw: BTreeMap<String, RawRecord> = serde_json::from_str(&contents)
            .map_err(|e| ScriptError::RegistryCorrupt(format!("{}: {}", path.display(), e)))?;

        let mut entries = BTreeMap::new();
        for (name, record) in raw {
            let (address, verified) = match record {
                RawRecord::Address(address) => (address, BTreeSet::new()),
                RawRecord::Full { address, verified } => (address, verified),
            };
            let address = parse_registry_address(&address).map_err(|e| {
                ScriptError::RegistryCorrupt(format!("entry `{}`: {}", name, e))
            })?;
            entries.insert(name, DeploymentRecord { address, verified });
        }

        Ok(Self {
            path: path.to_path_buf(),
            entries,
        })
    }

    /// Look up the recorded address for a logical contract name
    pub fn get(&self, name: &str) -> Option<Address> {
        self.entries.get(name).map(|record| record.address)
    }

    /// Record a freshly deployed address, replacing any prior entry.
    ///
    /// Replacing an entry clears its verification state: the new address has
    /// not been seen by any backend yet.
    pub fn set(&mut self, name: &str, address: Address) {
        self.entries.insert(
            name.to_string(),
            DeploymentRecord {
                address,
                verified: BTreeSet::new(),
            },
        );
    }

    /// Record that the given backend accepted the named contract's address
    pub fn record_verified(&mut self, name: &str, backend_id: &str) {
        if let Some(record) = self.entries.get_mut(name) {
            record.verified.insert(backend_id.to_string());
        }
    }

    /// Whether the given backend has already accepted the named contract's address
    pub fn is_verified(&self, name: &str, backend_id: &str) -> bool {
        self.entries
            .get(name)
            .is_some_and(|record| record.verified.contains(backend_id))
    }

    /// Write the registry back to its deployments file.
    ///
    /// The new contents are written to a sibling temporary file and renamed
    /// over the target, so a crash mid-write leaves the prior file intact.
    pub fn persist(&self) -> Result<(), ScriptError> {
        let raw: BTreeMap<&String, RawRecord> = self
            .entries
            .iter()
            .map(|(name, record)| {
                let address = format!("{:#x}", record.address);
                let raw = if record.verified.is_empty() {
                    RawRecord::Address(address)
                } else {
                    RawRecord::Full {
                        address,
                        verified: record.verified.clone(),
                    }
                };
                (name, raw)
            })
            .collect();

        let contents = serde_json::to_string_pretty(&raw)
            .map_err(|e| ScriptError::RegistryWrite(e.to_string()))?;

        let tmp_path = self.path.with_extension("json.tmp");
        fs::write(&tmp_path, contents).map_err(|e| {
            ScriptError::RegistryWrite(format!("{}: {}", tmp_path.display(), e))
        })?;
        fs::rename(&tmp_path, &self.path).map_err(|e| {
            ScriptError::RegistryWrite(format!("{}: {}", self.path.display(), e))
        })
    }
}

/// Parse an address string from the deployments file, tolerating a missing
/// `0x` prefix
fn parse_registry_address(address: &str) -> Result<Address, String> {
    Address::from_str(address.trim_start_matches("0x"))
        .map_err(|e| format!("invalid address `{}`: {}", address, e))
}

#[cfg(test)]
mod tests {
    use std::{fs, str::FromStr};

    use ethers::abi::Address;
    use tempfile::tempdir;

    use super::DeploymentRegistry;
    use crate::errors::ScriptError;

    /// A fixed address used throughout the tests
    fn test_address() -> Address {
        Address::from_str("aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa").unwrap()
    }

    #[test]
    fn missing_file_loads_as_empty() {
        let dir = tempdir().unwrap();
        let registry = DeploymentRegistry::load(&dir.path().join("none.json")).unwrap();
        assert!(registry.get("RealEstateToken").is_none());
    }

    #[test]
    fn malformed_file_is_corrupt() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("deployments.json");
        fs::write(&path, "{ not json").unwrap();
        let res = DeploymentRegistry::load(&path);
        assert!(matches!(res, Err(ScriptError::RegistryCorrupt(_))));
    }

    #[test]
    fn malformed_address_is_corrupt() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("deployments.json");
        fs::write(&path, r#"{ "RealEstateToken": "0xnothex" }"#).unwrap();
        let res = DeploymentRegistry::load(&path);
        assert!(matches!(res, Err(ScriptError::RegistryCorrupt(_))));
    }

    #[test]
    fn legacy_entries_load_and_round_trip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("deployments.json");
        fs::write(
            &path,
            r#"{ "RealEstateToken": "0xaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa" }"#,
        )
        .unwrap();

        let registry = DeploymentRegistry::load(&path).unwrap();
        assert_eq!(registry.get("RealEstateToken"), Some(test_address()));

        // Persisting without mutation reproduces the legacy shape
        registry.persist().unwrap();
        let reread: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(
            reread["RealEstateToken"],
            serde_json::json!("0xaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa")
        );
    }

    #[test]
    fn set_then_persist_records_the_address() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("deployments.json");

        let mut registry = DeploymentRegistry::load(&path).unwrap();
        registry.set("RealEstateToken", test_address());
        registry.persist().unwrap();

        let reloaded = DeploymentRegistry::load(&path).unwrap();
        assert_eq!(reloaded.get("RealEstateToken"), Some(test_address()));
    }

    #[test]
    fn verification_state_survives_a_round_trip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("deployments.json");

        let mut registry = DeploymentRegistry::load(&path).unwrap();
        registry.set("RealEstateToken", test_address());
        registry.record_verified("RealEstateToken", "basescan");
        registry.persist().unwrap();

        let reloaded = DeploymentRegistry::load(&path).unwrap();
        assert!(reloaded.is_verified("RealEstateToken", "basescan"));
        assert!(!reloaded.is_verified("RealEstateToken", "tenderly"));
    }

    #[test]
    fn redeploy_clears_verification_state() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("deployments.json");

        let mut registry = DeploymentRegistry::load(&path).unwrap();
        registry.set("RealEstateToken", test_address());
        registry.record_verified("RealEstateToken", "basescan");

        let replacement = Address::from_str("bbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbb").unwrap();
        registry.set("RealEstateToken", replacement);
        assert_eq!(registry.get("RealEstateToken"), Some(replacement));
        assert!(!registry.is_verified("RealEstateToken", "basescan"));
    }
}
