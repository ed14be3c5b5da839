//! Minimal covering NSEC synthesis.
//!
//! Names in the tree are keyed by opaque BLAKE2b hashes, so there is no
//! naturally-orderable successor to point an NSEC record at. Instead we
//! synthesize the tightest legal bracket around the queried label on the
//! fly: a "name-proof" pair covering the queried owner name, and a
//! "wildcard-proof" pair covering `*.` so wildcard synthesis is also
//! provably absent.

use hickory_proto::rr::rdata::NSEC;
use hickory_proto::rr::{Name, RData, Record as HickoryRecord, RecordType};
use std::str::FromStr;

/// Precomputed type bitmaps. The synthesizer picks one of
/// these based on what the owner name actually serves.
pub const TYPE_MAP_ROOT: &[RecordType] = &[
    RecordType::NS,
    RecordType::SOA,
    RecordType::RRSIG,
    RecordType::NSEC,
    RecordType::DNSKEY,
];
pub const TYPE_MAP_EMPTY: &[RecordType] = &[RecordType::RRSIG, RecordType::NSEC];
pub const TYPE_MAP_NS: &[RecordType] = &[RecordType::NS, RecordType::RRSIG, RecordType::NSEC];
pub const TYPE_MAP_TXT: &[RecordType] = &[RecordType::TXT, RecordType::RRSIG, RecordType::NSEC];
pub const TYPE_MAP_A: &[RecordType] = &[RecordType::A, RecordType::RRSIG, RecordType::NSEC];
pub const TYPE_MAP_AAAA: &[RecordType] = &[RecordType::AAAA, RecordType::RRSIG, RecordType::NSEC];

/// Octets legal in a root-zone label: `[0-9a-z-]`, never leading/trailing `-`.
pub fn is_root_legal_label(label: &str) -> bool {
    if label.is_empty() {
        return false;
    }
    if label.starts_with('-') || label.ends_with('-') {
        return false;
    }
    label
        .bytes()
        .all(|b| b.is_ascii_digit() || b.is_ascii_lowercase() || b == b'-')
}

/// Is every label of `qname` (other than the trailing root label) root-legal?
/// Invalid qnames are answered with REFUSED before any NSEC synthesis is
/// attempted.
pub fn is_root_legal_qname(labels: &[&str]) -> bool {
    labels.iter().all(|l| is_root_legal_label(l))
}

/// One covering NSEC record plus the type bitmap it asserts.
pub struct NsecPair {
    pub owner: Name,
    pub next: Name,
    pub types: Vec<RecordType>,
}

pub struct NsecSynthesizer;

impl NsecSynthesizer {
    /// Builds the name-proof and wildcard-proof NSEC records bracketing
    /// `qname` at the root apex.
    ///
    /// A hash-keyed, unordered namespace has no real "predecessor" or
    /// "successor" to search for, so this synthesizes a minimal two-element
    /// bracket `{qname-adjacent, qname}` instead of walking a real sibling
    /// set.
    pub fn synthesize(
        qname: &Name,
        tld_label: &str,
        types_present: &[RecordType],
    ) -> Vec<HickoryRecord> {
        let types = Self::pick_bitmap(types_present);
        let name_proof = Self::name_proof_pair(qname, tld_label, &types);
        let wildcard_proof = Self::wildcard_proof_pair(&types);

        vec![
            Self::to_record(&name_proof),
            Self::to_record(&wildcard_proof),
        ]
    }

    fn pick_bitmap(types_present: &[RecordType]) -> Vec<RecordType> {
        if types_present.is_empty() {
            return TYPE_MAP_EMPTY.to_vec();
        }
        if types_present == [RecordType::NS] {
            return TYPE_MAP_NS.to_vec();
        }
        if types_present == [RecordType::TXT] {
            return TYPE_MAP_TXT.to_vec();
        }
        if types_present == [RecordType::A] {
            return TYPE_MAP_A.to_vec();
        }
        if types_present == [RecordType::AAAA] {
            return TYPE_MAP_AAAA.to_vec();
        }
        let mut merged: Vec<RecordType> = types_present.to_vec();
        merged.push(RecordType::RRSIG);
        merged.push(RecordType::NSEC);
        merged
    }

    /// A predecessor immediately before `qname` (by prepending a `\x00`
    /// label, the lowest possible wire-ordered label) and `qname` itself as
    /// the successor, so the pair's range contains nothing else.
    fn name_proof_pair(qname: &Name, tld_label: &str, types: &[RecordType]) -> NsecPair {
        let predecessor_label = format!("\u{0}{}", tld_label);
        let owner = Name::from_str(&format!("{predecessor_label}.")).unwrap_or_else(|_| qname.clone());
        NsecPair {
            owner,
            next: qname.clone(),
            types: types.to_vec(),
        }
    }

    /// A minimal bracket around `*.`: `(*.\x00, *.)`.
    fn wildcard_proof_pair(types: &[RecordType]) -> NsecPair {
        let owner = Name::from_str("*.\u{0}.").unwrap_or_else(|_| Name::root());
        let next = Name::from_str("*.").unwrap_or_else(|_| Name::root());
        NsecPair {
            owner,
            next,
            types: types.to_vec(),
        }
    }

    fn to_record(pair: &NsecPair) -> HickoryRecord {
        HickoryRecord::from_rdata(
            pair.owner.clone(),
            86400,
            RData::NSEC(NSEC::new(pair.next.clone(), pair.types.clone())),
        )
    }
}
