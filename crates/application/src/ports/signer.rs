/// Which zone key should produce a given signature.
/// RRSIGs over ordinary RRsets use the ZSK; DS answers at the apex use the
/// KSK.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyRole {
    ZoneSigningKey,
    KeySigningKey,
}

/// A DNSKEY as the signer publishes it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublicKey {
    pub role: KeyRole,
    pub algorithm: u8,
    pub key_tag: u16,
    pub public_key: Vec<u8>,
}

/// External port over the zone's DNSSEC signing keys.
/// Production deployments load KSK/ZSK seeds from protected storage;
/// `rootward-infrastructure` loads raw seed files from the paths in
/// `KeySourceConfig`.
pub trait Signer: Send + Sync {
    /// Signs the canonical wire form of an RRset, returning the raw RRSIG
    /// signature bytes.
    fn sign(&self, role: KeyRole, canonical_rrset: &[u8]) -> Vec<u8>;

    fn public_key(&self, role: KeyRole) -> &PublicKey;

    /// SHA-256 (or configured) digest of the KSK, for the apex DS record.
    fn ds_digest(&self) -> &[u8];
}
