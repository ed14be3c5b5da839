//! In-memory [`TreeLookup`]. Production deployments back this
//! port with the consensus layer's proof verifier; this adapter exists for
//! development and integration tests.

use async_trait::async_trait;
use dashmap::DashMap;

use rootward_application::ports::{TreeLookup, TreeLookupError};
use rootward_domain::NameState;

#[derive(Default)]
pub struct InMemoryTreeLookup {
    names: DashMap<[u8; 32], NameState>,
}

impl InMemoryTreeLookup {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, state: NameState) {
        self.names.insert(state.name_hash, state);
    }
}

#[async_trait]
impl TreeLookup for InMemoryTreeLookup {
    async fn lookup(&self, name_hash: [u8; 32]) -> Result<Option<NameState>, TreeLookupError> {
        Ok(self.names.get(&name_hash).map(|entry| entry.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rootward_domain::Outpoint;

    fn state(hash: [u8; 32]) -> NameState {
        NameState {
            name_hash: hash,
            height: 0,
            owner: Outpoint {
                txid: [0; 32],
                index: 0,
            },
            value: 0,
            highest: 0,
            claimed: 0,
            renewals: 0,
            weak: false,
            revoked: false,
            data: vec![],
        }
    }

    #[tokio::test]
    async fn returns_none_for_unknown_hash() {
        let tree = InMemoryTreeLookup::new();
        assert_eq!(tree.lookup([1; 32]).await.unwrap(), None);
    }

    #[tokio::test]
    async fn returns_inserted_state() {
        let tree = InMemoryTreeLookup::new();
        tree.insert(state([2; 32]));
        assert!(tree.lookup([2; 32]).await.unwrap().is_some());
    }
}
