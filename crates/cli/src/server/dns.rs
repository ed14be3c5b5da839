use std::net::SocketAddr;
use std::sync::Arc;

use rootward_application::RootServer;
use rootward_infrastructure::dns::serve;

pub async fn start_dns_server(bind_addr: SocketAddr, root_server: Arc<RootServer>) -> anyhow::Result<()> {
    serve(bind_addr, root_server).await
}
