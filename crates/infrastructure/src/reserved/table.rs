//! TOML-backed [`ReservedTable`].

use std::collections::HashMap;
use std::path::Path;

use blake2::digest::{consts::U32, Digest};
use blake2::Blake2b;
use serde::Deserialize;

use rootward_application::ports::{ReservedEntry, ReservedTable};
use rootward_domain::ConfigError;

#[derive(Debug, Deserialize)]
struct ReservedFile {
    #[serde(default)]
    entries: Vec<ReservedEntryFile>,
}

#[derive(Debug, Deserialize)]
struct ReservedEntryFile {
    name: String,
    #[serde(default)]
    root: bool,
}

pub struct StaticReservedTable {
    entries: HashMap<String, ReservedEntry>,
}

impl StaticReservedTable {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|e| ConfigError::ParseFailure {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        let parsed: ReservedFile = toml::from_str(&raw).map_err(|e| ConfigError::ParseFailure {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;

        let entries = parsed
            .entries
            .into_iter()
            .map(|e| {
                let name_hash = blake2_hash(&e.name);
                (
                    e.name.clone(),
                    ReservedEntry {
                        name: e.name,
                        root: e.root,
                        name_hash,
                    },
                )
            })
            .collect();

        Ok(Self { entries })
    }

    pub fn empty() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }
}

impl ReservedTable for StaticReservedTable {
    fn lookup(&self, tld: &str) -> Option<&ReservedEntry> {
        self.entries.get(tld)
    }
}

fn blake2_hash(name: &str) -> [u8; 32] {
    let mut hasher = Blake2b::<U32>::new();
    hasher.update(name.as_bytes());
    let digest = hasher.finalize();
    let mut out = [0u8; 32];
    out.copy_from_slice(&digest);
    out
}
