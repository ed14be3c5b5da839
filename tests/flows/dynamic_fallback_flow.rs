//! Dynamic ICANN fallback: a TLD absent from the tree but marked
//! `root = true` in the reserved table is forwarded to the stub resolver.

#[path = "../common/mod.rs"]
mod common;

use hickory_proto::op::ResponseCode;
use hickory_proto::rr::{rdata, RData, RecordType};
use hickory_proto::serialize::binary::{BinDecodable, BinEncodable};
use tokio::net::UdpSocket;

use common::fixtures::{build_query, test_node_with_fallback};

#[tokio::test]
async fn reserved_tld_without_a_claim_forwards_to_icann_stub() {
    let upstream = UdpSocket::bind("127.0.0.1:0").await.unwrap();
    let upstream_addr = upstream.local_addr().unwrap();

    let echo = tokio::spawn(async move {
        let mut buf = vec![0u8; 512];
        let (len, peer) = upstream.recv_from(&mut buf).await.unwrap();
        let mut reply = hickory_proto::op::Message::from_bytes(&buf[..len]).unwrap();
        reply.set_message_type(hickory_proto::op::MessageType::Response);
        reply.add_answer(hickory_proto::rr::Record::from_rdata(
            reply.query().unwrap().name().clone(),
            3600,
            RData::A(rdata::A(std::net::Ipv4Addr::new(93, 184, 216, 34))),
        ));
        upstream.send_to(&reply.to_bytes().unwrap(), peer).await.unwrap();
    });

    let node = test_node_with_fallback("icann", upstream_addr);
    let query = build_query("icann.", RecordType::A);

    let response = node.server.resolve(&query).await;
    echo.await.unwrap();

    assert_eq!(response.response_code(), ResponseCode::NoError);
    assert!(!response.authentic_data());
    assert_eq!(response.answers().len(), 1);
    match response.answers()[0].data() {
        Some(RData::A(a)) => assert_eq!(a.0, std::net::Ipv4Addr::new(93, 184, 216, 34)),
        other => panic!("expected an A record, got {other:?}"),
    }
}
