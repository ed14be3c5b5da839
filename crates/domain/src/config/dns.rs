use serde::{Deserialize, Serialize};

/// Root-zone resolution settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RootDnsConfig {
    #[serde(default = "default_cache_size")]
    pub cache_size: usize,

    #[serde(default = "default_cache_ttl_secs")]
    pub cache_ttl_secs: u64,

    /// Disable SIG(0) request verification.
    #[serde(default)]
    pub no_sig0: bool,

    /// TLDs served as NXDOMAIN without consulting the tree.
    #[serde(default)]
    pub blacklist: Vec<String>,

    /// Path to the reserved-name table backing the ICANN fallback decision.
    #[serde(default)]
    pub reserved_table_path: Option<String>,

    /// Upstream resolver the ICANN stub forwards reserved-root queries to.
    #[serde(default = "default_icann_upstream")]
    pub icann_upstream: String,
}

fn default_cache_size() -> usize {
    3000
}

fn default_cache_ttl_secs() -> u64 {
    1800
}

fn default_icann_upstream() -> String {
    "8.8.8.8:53".to_string()
}

impl Default for RootDnsConfig {
    fn default() -> Self {
        Self {
            cache_size: default_cache_size(),
            cache_ttl_secs: default_cache_ttl_secs(),
            no_sig0: false,
            blacklist: Vec::new(),
            reserved_table_path: None,
            icann_upstream: default_icann_upstream(),
        }
    }
}
