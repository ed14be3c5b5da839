//! End-to-end resolution scenarios exercised directly against
//! [`rootward_application::RootServer::resolve`], with in-memory/stub
//! adapters standing in for the chain and the network.

#[path = "../common/mod.rs"]
mod common;

use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};

use hickory_proto::op::ResponseCode;
use hickory_proto::rr::{RData, Record as HickoryRecord, RecordType};

use rootward_application::ports::KeyRole;
use rootward_domain::{ip_pointer::IpPointer, Record, Resource, Target};

use common::fixtures::{build_query, closed_name_state, test_node};

/// Finds the RRSIG covering `covered` in `section` and asserts it carries
/// the key tag for `role`.
fn assert_signed_by(section: &[HickoryRecord], covered: RecordType, role: KeyRole, node: &common::fixtures::TestNode) {
    let expected_tag = node.signer.public_key(role).key_tag;
    let found = section.iter().any(|record| match record.data() {
        Some(RData::SIG(sig)) => sig.type_covered() == covered && sig.key_tag() == expected_tag,
        _ => false,
    });
    assert!(
        found,
        "expected an RRSIG over {covered:?} signed with key tag {expected_tag}"
    );
}

#[tokio::test]
async fn synth_a_pointer_answers_without_touching_the_tree() {
    let node = test_node(vec![]);
    let query = build_query("_fs0000g._synth.", RecordType::A);

    let response = node.server.resolve(&query).await;

    assert_eq!(response.response_code(), ResponseCode::NoError);
    let answers = response.answers();
    assert_eq!(answers.len(), 2, "A answer plus its RRSIG");
    match answers[0].data() {
        Some(RData::A(a)) => assert_eq!(a.0, Ipv4Addr::new(127, 0, 0, 2)),
        other => panic!("expected an A record, got {other:?}"),
    }
}

#[tokio::test]
async fn synth_aaaa_pointer_answers_without_touching_the_tree() {
    let node = test_node(vec![]);
    let label = IpPointer::new(IpAddr::V6(Ipv6Addr::new(0, 0, 0, 0, 0, 0, 0, 2))).to_label();
    let query = build_query(&format!("{label}._synth."), RecordType::AAAA);

    let response = node.server.resolve(&query).await;

    assert_eq!(response.response_code(), ResponseCode::NoError);
    let answers = response.answers();
    assert_eq!(answers.len(), 2, "AAAA answer plus its RRSIG");
    match answers[0].data() {
        Some(RData::AAAA(aaaa)) => {
            assert_eq!(aaaa.0, Ipv6Addr::new(0, 0, 0, 0, 0, 0, 0, 2))
        }
        other => panic!("expected an AAAA record, got {other:?}"),
    }
}

#[tokio::test]
async fn apex_ns_query_answers_with_synth_glue() {
    let node = test_node(vec![]);
    let query = build_query(".", RecordType::NS);

    let response = node.server.resolve(&query).await;

    assert_eq!(response.response_code(), ResponseCode::NoError);
    assert_eq!(response.answers().len(), 2, "NS answer plus its RRSIG");
    match response.answers()[0].data() {
        Some(RData::NS(ns)) => assert_eq!(ns.0.to_string(), "_fs00008._synth."),
        other => panic!("expected an NS record, got {other:?}"),
    }
    assert_signed_by(response.answers(), RecordType::NS, KeyRole::ZoneSigningKey, &node);

    assert_eq!(response.additionals().len(), 2, "glue A record plus its RRSIG");
    match response.additionals()[0].data() {
        Some(RData::A(a)) => assert_eq!(a.0, Ipv4Addr::new(127, 0, 0, 1)),
        other => panic!("expected glue A record, got {other:?}"),
    }
    assert_signed_by(response.additionals(), RecordType::A, KeyRole::ZoneSigningKey, &node);
}

#[tokio::test]
async fn unclaimed_tld_is_nxdomain_with_nsec_proof() {
    let node = test_node(vec![]);
    let query = build_query("icecream.", RecordType::NS);

    let response = node.server.resolve(&query).await;

    assert_eq!(response.response_code(), ResponseCode::NXDomain);
    assert!(response.header().authoritative());
    let soa_count = response
        .name_servers()
        .iter()
        .filter(|r| matches!(r.data(), Some(RData::SOA(_))))
        .count();
    assert_eq!(soa_count, 1);
    let nsec_count = response
        .name_servers()
        .iter()
        .filter(|r| matches!(r.data(), Some(RData::NSEC(_))))
        .count();
    assert!(nsec_count >= 1, "expected at least one NSEC proof");
}

#[tokio::test]
async fn closed_name_with_ns_record_serves_without_glue() {
    let node = test_node(vec![]);
    let resource = Resource::build(
        1800,
        vec![],
        vec![Record::Ns(Target::Name("one.".into()))],
    )
    .unwrap();
    node.tree.insert(closed_name_state("example", &resource));

    let query = build_query("example.", RecordType::NS);
    let response = node.server.resolve(&query).await;

    assert_eq!(response.response_code(), ResponseCode::NoError);
    assert_eq!(response.answers().len(), 2, "NS answer plus its RRSIG");
    match response.answers()[0].data() {
        Some(RData::NS(ns)) => assert_eq!(ns.0.to_string(), "one."),
        other => panic!("expected an NS record, got {other:?}"),
    }
    assert_signed_by(response.answers(), RecordType::NS, KeyRole::ZoneSigningKey, &node);
    assert!(response.additionals().is_empty(), "NS target carries no glue");
}

#[tokio::test]
async fn blacklisted_tld_skips_the_tree_and_returns_nxdomain() {
    let node = test_node(vec!["bit".to_string()]);
    // Seed the tree with a servable name the blacklist should still shadow.
    let resource = Resource::build(1800, vec![], vec![Record::Ns(Target::Name("one.".into()))])
        .unwrap();
    node.tree.insert(closed_name_state("bit", &resource));

    let query = build_query("bit.", RecordType::NS);
    let response = node.server.resolve(&query).await;

    assert_eq!(response.response_code(), ResponseCode::NXDomain);
    let soa_count = response
        .name_servers()
        .iter()
        .filter(|r| matches!(r.data(), Some(RData::SOA(_))))
        .count();
    assert_eq!(soa_count, 1);
}
