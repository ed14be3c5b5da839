//! UDP/TCP listener bootstrap: a socket2-tuned `ServerFuture` setup.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use hickory_server::ServerFuture;
use socket2::{Domain, Protocol, Socket, Type};
use tokio::net::{TcpListener, UdpSocket};
use tracing::info;

use crate::dns::handler::RootDnsHandler;
use rootward_application::services::RootServer;

pub async fn serve(bind_addr: SocketAddr, root_server: Arc<RootServer>) -> anyhow::Result<()> {
    info!(%bind_addr, "starting root dns server");

    let domain = if bind_addr.is_ipv6() {
        Domain::IPV6
    } else {
        Domain::IPV4
    };
    let socket = Socket::new(domain, Type::DGRAM, Some(Protocol::UDP))?;
    socket.set_reuse_address(true)?;
    #[cfg(unix)]
    socket.set_reuse_port(true)?;
    socket.set_recv_buffer_size(8 * 1024 * 1024)?;
    socket.set_send_buffer_size(4 * 1024 * 1024)?;
    socket.bind(&bind_addr.into())?;
    socket.set_nonblocking(true)?;

    let std_socket: std::net::UdpSocket = socket.into();
    let udp_socket = UdpSocket::from_std(std_socket)?;
    let tcp_listener = TcpListener::bind(bind_addr).await?;

    let handler = RootDnsHandler::new(root_server);
    let mut server = ServerFuture::new(handler);
    server.register_socket(udp_socket);
    server.register_listener(tcp_listener, Duration::from_secs(10));

    info!("root dns server ready");
    server.block_until_done().await?;
    Ok(())
}
