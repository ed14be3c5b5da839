use async_trait::async_trait;
use rootward_domain::NameState;

/// External port over the chain's authenticated name tree. Production deployments back this with the consensus
/// layer's urkel-tree proof verifier; `rootward-infrastructure` ships an
/// in-memory adapter for dev/test.
#[async_trait]
pub trait TreeLookup: Send + Sync {
    /// Looks up the raw [`NameState`] keyed by the BLAKE2b-256 hash of a
    /// lowercased TLD label. `Ok(None)` means the name has never been
    /// opened on-chain.
    async fn lookup(&self, name_hash: [u8; 32]) -> Result<Option<NameState>, TreeLookupError>;
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum TreeLookupError {
    #[error("tree lookup timed out")]
    Timeout,
    #[error("tree backend unavailable: {0}")]
    Unavailable(String),
}
