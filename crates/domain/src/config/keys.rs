use serde::{Deserialize, Serialize};

/// Where the zone's DNSSEC key material lives on disk.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct KeySourceConfig {
    pub ksk_path: String,
    pub zsk_path: String,

    #[serde(default = "default_algorithm")]
    pub algorithm: String,
}

fn default_algorithm() -> String {
    "ed25519".to_string()
}

impl Default for KeySourceConfig {
    fn default() -> Self {
        Self {
            ksk_path: "keys/ksk.key".to_string(),
            zsk_path: "keys/zsk.key".to_string(),
            algorithm: default_algorithm(),
        }
    }
}
