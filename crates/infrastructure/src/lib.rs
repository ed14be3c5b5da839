//! Rootward Infrastructure Layer
//!
//! Concrete adapters for the ports the application layer declares: an
//! Ed25519 zone signer, an LRU response cache, an in-memory chain name
//! tree, a TOML-backed reserved-name table, a UDP ICANN fallback client,
//! and the hickory-server bridge that turns all of it into a running DNS
//! listener.

pub mod cache;
pub mod dns;
pub mod dnssec;
pub mod icann;
pub mod reserved;
pub mod tree;

pub use cache::LruResponseCache;
pub use dns::{serve, RootDnsHandler};
pub use dnssec::Ed25519Signer;
pub use icann::StubIcannFallback;
pub use reserved::StaticReservedTable;
pub use tree::InMemoryTreeLookup;
