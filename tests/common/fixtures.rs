use std::net::{IpAddr, Ipv4Addr};
use std::path::Path;
use std::sync::Arc;
use std::str::FromStr;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use hickory_proto::op::{Message, MessageType, OpCode, Query};
use hickory_proto::rr::{DNSClass, Name, RecordType};

use rootward_application::ports::{Clock, IcannFallback, IcannFallbackError};
use rootward_application::{RootServer, RootZone};
use rootward_domain::{NameState, Outpoint, Resource};
use rootward_infrastructure::{
    Ed25519Signer, InMemoryTreeLookup, LruResponseCache, StaticReservedTable, StubIcannFallback,
};

/// Builds a single-question query [`Message`] for `qname`/`qtype`.
pub fn build_query(qname: &str, qtype: RecordType) -> Message {
    let name = Name::from_str(qname).unwrap();
    let mut query = Query::new();
    query.set_name(name);
    query.set_query_type(qtype);
    query.set_query_class(DNSClass::IN);

    let mut message = Message::new();
    message.header_mut().set_id(1);
    message.header_mut().set_message_type(MessageType::Query);
    message.header_mut().set_op_code(OpCode::Query);
    message.add_query(query);
    message
}

/// A [`Clock`] with a settable height, so tests can park a name's auction in
/// any lifecycle phase without waiting on `NetworkParams::mainnet()` timing.
pub struct FixedClock {
    pub now: DateTime<Utc>,
    pub height: u32,
}

impl Default for FixedClock {
    fn default() -> Self {
        Self {
            now: DateTime::parse_from_rfc3339("2026-01-01T00:00:00Z")
                .unwrap()
                .with_timezone(&Utc),
            height: closed_height(),
        }
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.now
    }

    fn height(&self) -> u32 {
        self.height
    }
}

/// A height past `CLOSED` under mainnet parameters, for names that should
/// already be servable.
pub fn closed_height() -> u32 {
    let params = rootward_domain::NetworkParams::mainnet();
    params.tree_interval + params.bidding_period + params.reveal_period + 1
}

/// An [`IcannFallback`] that always fails, for scenarios where the stub must
/// never be reached (no reserved entry, or the tree already has a claim).
pub struct UnreachableIcann;

#[async_trait]
impl IcannFallback for UnreachableIcann {
    async fn forward(&self, _query: &Message) -> Result<Message, IcannFallbackError> {
        Err(IcannFallbackError::Unreachable("not wired in this test".into()))
    }
}

fn write_seed(dir: &Path, name: &str) -> std::path::PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, [9u8; 32]).unwrap();
    path
}

/// Builds a closed, servable [`NameState`] for `tld` carrying `resource`.
pub fn closed_name_state(tld: &str, resource: &Resource) -> NameState {
    NameState {
        name_hash: blake2_tld_hash(tld),
        height: 0,
        owner: Outpoint {
            txid: [0u8; 32],
            index: 0,
        },
        value: 0,
        highest: 0,
        claimed: 0,
        renewals: 0,
        weak: false,
        revoked: false,
        data: resource.encode().unwrap(),
    }
}

fn blake2_tld_hash(tld: &str) -> [u8; 32] {
    use blake2::digest::{consts::U32, Digest};
    use blake2::Blake2b;
    let mut hasher = Blake2b::<U32>::new();
    hasher.update(tld.as_bytes());
    let digest = hasher.finalize();
    let mut out = [0u8; 32];
    out.copy_from_slice(&digest);
    out
}

/// End-to-end [`RootServer`] wired from in-memory/stub adapters, plus the
/// tree handle tests use to seed names.
pub struct TestNode {
    pub server: RootServer,
    pub tree: Arc<InMemoryTreeLookup>,
    pub signer: Arc<dyn rootward_application::Signer>,
}

/// Assembles a [`TestNode`] with an empty reserved table and an
/// unreachable ICANN stub. `blacklist` mirrors `RootDnsConfig::blacklist`.
pub fn test_node(blacklist: Vec<String>) -> TestNode {
    let dir = tempfile::tempdir().unwrap();
    let ksk = write_seed(dir.path(), "ksk.key");
    let zsk = write_seed(dir.path(), "zsk.key");
    let signer: Arc<dyn rootward_application::Signer> =
        Arc::new(Ed25519Signer::load(&ksk, &zsk).unwrap());

    let reserved: Arc<dyn rootward_application::ReservedTable> =
        Arc::new(StaticReservedTable::empty());
    let icann: Arc<dyn IcannFallback> = Arc::new(UnreachableIcann);
    let root_zone = Arc::new(RootZone::new(
        IpAddr::V4(Ipv4Addr::new(127, 0, 0, 1)),
        signer.clone(),
        reserved,
        icann,
    ));

    let tree = Arc::new(InMemoryTreeLookup::new());
    let cache: Arc<dyn rootward_application::ResponseCache> = Arc::new(LruResponseCache::new(64));
    let clock: Arc<dyn Clock> = Arc::new(FixedClock::default());

    let server = RootServer::new(
        tree.clone(),
        cache,
        signer.clone(),
        clock,
        root_zone,
        blacklist,
    );

    TestNode { server, tree, signer }
}

/// A [`TestNode`] whose ICANN upstream is reachable, wired to `upstream`, and
/// whose reserved table marks `tld` as `root = true`, for dynamic-fallback
/// scenarios.
pub fn test_node_with_fallback(tld: &str, upstream: std::net::SocketAddr) -> TestNode {
    let dir = tempfile::tempdir().unwrap();
    let ksk = write_seed(dir.path(), "ksk.key");
    let zsk = write_seed(dir.path(), "zsk.key");
    let signer: Arc<dyn rootward_application::Signer> =
        Arc::new(Ed25519Signer::load(&ksk, &zsk).unwrap());

    let reserved_toml = dir.path().join("reserved.toml");
    std::fs::write(
        &reserved_toml,
        format!("[[entries]]\nname = \"{tld}\"\nroot = true\n"),
    )
    .unwrap();
    let reserved: Arc<dyn rootward_application::ReservedTable> =
        Arc::new(StaticReservedTable::load(&reserved_toml).unwrap());
    let icann: Arc<dyn IcannFallback> = Arc::new(StubIcannFallback::new(upstream));
    let root_zone = Arc::new(RootZone::new(
        IpAddr::V4(Ipv4Addr::new(127, 0, 0, 1)),
        signer.clone(),
        reserved,
        icann,
    ));

    let tree = Arc::new(InMemoryTreeLookup::new());
    let cache: Arc<dyn rootward_application::ResponseCache> = Arc::new(LruResponseCache::new(64));
    let clock: Arc<dyn Clock> = Arc::new(FixedClock::default());

    let server = RootServer::new(tree.clone(), cache, signer.clone(), clock, root_zone, vec![]);

    TestNode { server, tree, signer }
}
