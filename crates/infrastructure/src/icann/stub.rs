//! Built-in ICANN recursive/stub forwarder. A plain UDP DNS client: one query, one best-effort answer,
//! no retry/pooling machinery, since this only ever serves reserved TLDs
//! whose on-chain auction never opened.

use std::net::SocketAddr;
use std::time::Duration;

use async_trait::async_trait;
use hickory_proto::op::Message;
use hickory_proto::serialize::binary::{BinDecodable, BinEncodable};
use tokio::net::UdpSocket;
use tokio::time::timeout;

use rootward_application::ports::{IcannFallback, IcannFallbackError};

pub struct StubIcannFallback {
    upstream: SocketAddr,
    timeout: Duration,
}

impl StubIcannFallback {
    pub fn new(upstream: SocketAddr) -> Self {
        Self {
            upstream,
            timeout: Duration::from_secs(2),
        }
    }
}

#[async_trait]
impl IcannFallback for StubIcannFallback {
    async fn forward(&self, query: &Message) -> Result<Message, IcannFallbackError> {
        let wire = query
            .to_bytes()
            .map_err(|e| IcannFallbackError::Unreachable(e.to_string()))?;

        let socket = UdpSocket::bind("0.0.0.0:0")
            .await
            .map_err(|e| IcannFallbackError::Unreachable(e.to_string()))?;
        socket
            .connect(self.upstream)
            .await
            .map_err(|e| IcannFallbackError::Unreachable(e.to_string()))?;
        socket
            .send(&wire)
            .await
            .map_err(|e| IcannFallbackError::Unreachable(e.to_string()))?;

        let mut buf = vec![0u8; 4096];
        let len = timeout(self.timeout, socket.recv(&mut buf))
            .await
            .map_err(|_| IcannFallbackError::Timeout)?
            .map_err(|e| IcannFallbackError::Unreachable(e.to_string()))?;

        Message::from_bytes(&buf[..len]).map_err(|e| IcannFallbackError::Unreachable(e.to_string()))
    }
}
