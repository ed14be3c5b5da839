//! Ed25519 zone signer, built on `ring::signature::Ed25519KeyPair::sign`
//! (algorithm 15, "Ed25519").

use std::fs;
use std::path::Path;

use ring::signature::{Ed25519KeyPair, KeyPair};
use rootward_domain::ConfigError;
use sha2::{Digest, Sha256};

use rootward_application::ports::{KeyRole, PublicKey, Signer};

const ED25519_ALGORITHM: u8 = 15;

struct LoadedKey {
    pair: Ed25519KeyPair,
    public: PublicKey,
}

pub struct Ed25519Signer {
    ksk: LoadedKey,
    zsk: LoadedKey,
    ds_digest: Vec<u8>,
}

impl Ed25519Signer {
    /// Loads a 32-byte raw Ed25519 seed from each path
    /// (`KeySourceConfig::ksk_path`/`zsk_path`).
    pub fn load(ksk_path: &Path, zsk_path: &Path) -> Result<Self, ConfigError> {
        let ksk = Self::load_key(ksk_path, KeyRole::KeySigningKey)?;
        let zsk = Self::load_key(zsk_path, KeyRole::ZoneSigningKey)?;

        let mut hasher = Sha256::new();
        hasher.update(&ksk.public.public_key);
        let ds_digest = hasher.finalize().to_vec();

        Ok(Self { ksk, zsk, ds_digest })
    }

    fn load_key(path: &Path, role: KeyRole) -> Result<LoadedKey, ConfigError> {
        let seed = fs::read(path).map_err(|e| ConfigError::BadKey {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        if seed.len() != 32 {
            return Err(ConfigError::BadKey {
                path: path.display().to_string(),
                reason: format!("expected a 32-byte ed25519 seed, got {} bytes", seed.len()),
            });
        }
        let pair = Ed25519KeyPair::from_seed_unchecked(&seed).map_err(|e| ConfigError::BadKey {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        let public_key_bytes = pair.public_key().as_ref().to_vec();
        let key_tag = compute_key_tag(&public_key_bytes);
        Ok(LoadedKey {
            pair,
            public: PublicKey {
                role,
                algorithm: ED25519_ALGORITHM,
                key_tag,
                public_key: public_key_bytes,
            },
        })
    }
}

impl Signer for Ed25519Signer {
    fn sign(&self, role: KeyRole, canonical_rrset: &[u8]) -> Vec<u8> {
        let key = match role {
            KeyRole::KeySigningKey => &self.ksk,
            KeyRole::ZoneSigningKey => &self.zsk,
        };
        key.pair.sign(canonical_rrset).as_ref().to_vec()
    }

    fn public_key(&self, role: KeyRole) -> &PublicKey {
        match role {
            KeyRole::KeySigningKey => &self.ksk.public,
            KeyRole::ZoneSigningKey => &self.zsk.public,
        }
    }

    fn ds_digest(&self) -> &[u8] {
        &self.ds_digest
    }
}

/// RFC 4034 Appendix B key tag algorithm, specialized to algorithms (like
/// Ed25519) that aren't the legacy RSA/MD5 special case.
fn compute_key_tag(public_key: &[u8]) -> u16 {
    let mut owner = vec![0u8; 4];
    owner[2] = ED25519_ALGORITHM;
    owner.extend_from_slice(public_key);

    let mut acc: u32 = 0;
    for (i, byte) in owner.iter().enumerate() {
        if i % 2 == 0 {
            acc += (*byte as u32) << 8;
        } else {
            acc += *byte as u32;
        }
    }
    acc += (acc >> 16) & 0xFFFF;
    (acc & 0xFFFF) as u16
}
