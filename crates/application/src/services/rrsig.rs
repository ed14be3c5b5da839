//! RRSIG construction: canonicalizes an RRset per RFC 4034 section 6.2 and
//! asks the [`Signer`] port for a signature over it.

use chrono::{DateTime, Utc};
use hickory_proto::rr::rdata::SIG;
use hickory_proto::rr::{Name, RData, Record as HickoryRecord, RecordType};
use hickory_proto::serialize::binary::BinEncodable;

use crate::ports::{KeyRole, Signer};

/// Signatures are valid for two weeks, backdated an hour to tolerate clock
/// skew between this node and whatever inception check a validator runs.
const VALIDITY_SECS: i64 = 14 * 24 * 3600;
const INCEPTION_SKEW_SECS: i64 = 3600;

/// Appends one RRSIG per distinct owner/type RRset found in `records` to
/// `records` itself. DNSKEY and DS RRsets are signed with the KSK; every
/// other RRset with the ZSK.
pub fn sign_section(
    signer: &dyn Signer,
    now: DateTime<Utc>,
    mut records: Vec<HickoryRecord>,
) -> Vec<HickoryRecord> {
    let rrsigs: Vec<HickoryRecord> = group_rrsets(&records)
        .into_iter()
        .map(|(owner, rr_type, ttl, members)| {
            sign_rrset(signer, now, &owner, rr_type, ttl, &members)
        })
        .collect();
    records.extend(rrsigs);
    records
}

/// Groups `records` by `(owner name, type)`, preserving first-seen order.
/// Any RRSIG already present (there shouldn't be one yet) is left alone.
fn group_rrsets(records: &[HickoryRecord]) -> Vec<(Name, RecordType, u32, Vec<HickoryRecord>)> {
    let mut groups: Vec<(Name, RecordType, u32, Vec<HickoryRecord>)> = Vec::new();
    for record in records {
        if record.record_type() == RecordType::RRSIG {
            continue;
        }
        match groups
            .iter_mut()
            .find(|(name, ty, ..)| name == record.name() && *ty == record.record_type())
        {
            Some(group) => group.3.push(record.clone()),
            None => groups.push((
                record.name().clone(),
                record.record_type(),
                record.ttl(),
                vec![record.clone()],
            )),
        }
    }
    groups
}

fn key_role_for(rr_type: RecordType) -> KeyRole {
    match rr_type {
        RecordType::DNSKEY | RecordType::DS => KeyRole::KeySigningKey,
        _ => KeyRole::ZoneSigningKey,
    }
}

/// Canonical wire form of one RRset (RFC 4034 section 6.2): each member
/// record re-emitted with its owner lowercased and its TTL reset to the
/// RRset's original TTL, concatenated in canonical (sorted) RDATA order.
fn canonical_rrset_bytes(owner: &Name, ttl: u32, members: &[HickoryRecord]) -> Vec<u8> {
    let mut encoded: Vec<Vec<u8>> = members
        .iter()
        .map(|record| {
            let mut canon = record.clone();
            canon.set_name(owner.to_lowercase());
            canon.set_ttl(ttl);
            canon.to_bytes().unwrap_or_default()
        })
        .collect();
    encoded.sort();
    encoded.concat()
}

fn sign_rrset(
    signer: &dyn Signer,
    now: DateTime<Utc>,
    owner: &Name,
    rr_type: RecordType,
    ttl: u32,
    members: &[HickoryRecord],
) -> HickoryRecord {
    let role = key_role_for(rr_type);
    let key = signer.public_key(role);
    let canonical = canonical_rrset_bytes(owner, ttl, members);
    let signature = signer.sign(role, &canonical);

    let inception = (now.timestamp() - INCEPTION_SKEW_SECS) as u32;
    let expiration = (now.timestamp() + VALIDITY_SECS) as u32;

    HickoryRecord::from_rdata(
        owner.clone(),
        ttl,
        RData::SIG(SIG::new(
            rr_type,
            key.algorithm.into(),
            owner.iter().count() as u8,
            ttl,
            expiration,
            inception,
            key.key_tag,
            Name::root(),
            signature,
        )),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::PublicKey;
    use hickory_proto::rr::rdata;
    use std::str::FromStr;

    struct FixedSigner;

    impl Signer for FixedSigner {
        fn sign(&self, _role: KeyRole, canonical_rrset: &[u8]) -> Vec<u8> {
            canonical_rrset.to_vec()
        }

        fn public_key(&self, role: KeyRole) -> &PublicKey {
            static ZSK: PublicKey = PublicKey {
                role: KeyRole::ZoneSigningKey,
                algorithm: 15,
                key_tag: 1,
                public_key: Vec::new(),
            };
            static KSK: PublicKey = PublicKey {
                role: KeyRole::KeySigningKey,
                algorithm: 15,
                key_tag: 2,
                public_key: Vec::new(),
            };
            match role {
                KeyRole::ZoneSigningKey => &ZSK,
                KeyRole::KeySigningKey => &KSK,
            }
        }

        fn ds_digest(&self) -> &[u8] {
            &[]
        }
    }

    #[test]
    fn signs_one_rrsig_per_distinct_rrset() {
        let signer = FixedSigner;
        let now = Utc::now();
        let name = Name::from_str("example.").unwrap();
        let a = HickoryRecord::from_rdata(
            name.clone(),
            1800,
            RData::A(rdata::A(std::net::Ipv4Addr::new(1, 2, 3, 4))),
        );
        let ns = HickoryRecord::from_rdata(
            Name::root(),
            86400,
            RData::NS(rdata::NS(Name::from_str("ns1.example.").unwrap())),
        );

        let signed = sign_section(&signer, now, vec![a.clone(), ns.clone()]);

        let rrsigs: Vec<_> = signed
            .iter()
            .filter(|r| r.record_type() == RecordType::RRSIG)
            .collect();
        assert_eq!(rrsigs.len(), 2);
        assert_eq!(signed.len(), 4);
    }

    #[test]
    fn dnskey_rrset_signed_with_ksk() {
        let signer = FixedSigner;
        let now = Utc::now();
        let dnskey = HickoryRecord::from_rdata(
            Name::root(),
            86400,
            RData::DNSKEY(rdata::DNSKEY::new(
                true,
                true,
                hickory_proto::rr::dnssec::Algorithm::ED25519,
                vec![1, 2, 3],
            )),
        );

        let signed = sign_section(&signer, now, vec![dnskey]);
        let rrsig = signed
            .iter()
            .find(|r| r.record_type() == RecordType::RRSIG)
            .unwrap();
        match rrsig.data() {
            Some(RData::SIG(sig)) => assert_eq!(sig.key_tag(), 2),
            other => panic!("expected a SIG rdata, got {other:?}"),
        }
    }
}
