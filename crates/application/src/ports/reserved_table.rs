/// A name reserved outside the normal auction process. Reserved entries with `root = true`
/// are eligible for the ICANN stub fallback when the tree has no claim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReservedEntry {
    pub name: String,
    pub root: bool,
    pub name_hash: [u8; 32],
}

/// External port over the reserved-name table. Backed by a
/// static list shipped with the node; `rootward-infrastructure` loads it
/// from a TOML file at startup.
pub trait ReservedTable: Send + Sync {
    fn lookup(&self, tld: &str) -> Option<&ReservedEntry>;
}
