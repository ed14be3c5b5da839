use async_trait::async_trait;
use hickory_proto::op::Message;

/// External port over the built-in ICANN recursive/stub resolver. Only
/// consulted for TLDs present in the reserved table with `root = true` and
/// absent from the tree.
#[async_trait]
pub trait IcannFallback: Send + Sync {
    async fn forward(&self, query: &Message) -> Result<Message, IcannFallbackError>;
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum IcannFallbackError {
    #[error("icann fallback timed out")]
    Timeout,
    #[error("icann fallback unreachable: {0}")]
    Unreachable(String),
}
