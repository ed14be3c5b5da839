use std::net::IpAddr;
use std::sync::Arc;

use rootward_application::{ReservedTable, RootServer, RootZone, SystemClock};
use rootward_domain::Config;
use rootward_infrastructure::{
    InMemoryTreeLookup, LruResponseCache, StaticReservedTable, StubIcannFallback,
};

use crate::bootstrap::load_signer;

/// Wires every port adapter the root server needs and returns the
/// fully-assembled dispatcher.
///
/// The tree lookup and reserved table are the in-memory/TOML-file dev
/// adapters shipped with `rootward-infrastructure`; production
/// deployments swap them for chain-backed ones without touching
/// `RootServer` or `RootZone`.
pub fn build_root_server(config: &Config) -> anyhow::Result<Arc<RootServer>> {
    let signer = load_signer(&config.keys)?;

    let reserved: Arc<dyn ReservedTable> = match &config.dns.reserved_table_path {
        Some(path) => Arc::new(StaticReservedTable::load(std::path::Path::new(path))?),
        None => Arc::new(StaticReservedTable::empty()),
    };

    let icann_upstream: std::net::SocketAddr = config.dns.icann_upstream.parse()?;
    let icann = Arc::new(StubIcannFallback::new(icann_upstream));

    let public_host: IpAddr = config.server.public_host.parse()?;
    let root_zone = Arc::new(RootZone::new(public_host, signer.clone(), reserved, icann));

    let tree = Arc::new(InMemoryTreeLookup::new());
    let cache = Arc::new(LruResponseCache::new(config.dns.cache_size));
    let clock = Arc::new(SystemClock::default());

    Ok(Arc::new(RootServer::new(
        tree,
        cache,
        signer,
        clock,
        root_zone,
        config.dns.blacklist.clone(),
    )))
}
