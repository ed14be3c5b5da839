//! Resource + query → DNS records.
//!
//! This is the densest use case in the system: it owns the label-count
//! dispatch that decides whether a query is asking about the TLD itself, a
//! synthesized IP pointer, an SRV/TLSA/SMIMEA/OPENPGPKEY subdomain, or
//! anything else, and turns the matching [`Record`]s into wire-ready
//! `hickory_proto` records.

use std::net::IpAddr;
use std::str::FromStr;

use hickory_proto::rr::rdata::{self, SOA, SRV, TXT};
use hickory_proto::rr::{Name, RData, Record as HickoryRecord, RecordType};
use rootward_domain::ip_pointer::IpPointer;
use rootward_domain::record::Record as RrRecord;
use rootward_domain::resource::Resource;
use rootward_domain::target::Target;

/// Output of translating one `Resource` against one query.
#[derive(Debug, Clone, Default)]
pub struct Translation {
    pub answer: Vec<HickoryRecord>,
    pub authority: Vec<HickoryRecord>,
    pub additional: Vec<HickoryRecord>,
    /// Set when the answer is empty and the caller should fall back to
    /// NSEC+SOA synthesis.
    pub needs_proof: bool,
}

pub struct ResourceToDns;

impl ResourceToDns {
    /// Translates `resource` (the decoded payload for `qname`'s TLD) into
    /// DNS records for `qname`/`qtype`. `labels` is `qname` split into its
    /// DNS labels, lowercased, with the trailing root label dropped.
    pub fn translate(
        resource: &Resource,
        qname: &Name,
        qtype: RecordType,
        ttl: u32,
        labels: &[&str],
    ) -> Translation {
        match labels.len() {
            1 => Self::translate_apex_label(resource, qname, qtype, ttl),
            2 => Self::translate_synth_pointer(qname, qtype, ttl, labels)
                .unwrap_or_else(|| Self::referral_or_empty(resource, qname, ttl)),
            3 => Self::translate_service_subdomain(resource, qname, qtype, ttl, labels)
                .unwrap_or_else(|| Self::referral_or_empty(resource, qname, ttl)),
            _ => Self::referral_or_empty(resource, qname, ttl),
        }
    }

    /// Label count 1: the TLD itself. Answer from hosts/typed records
    /// matching `qtype`; referral in authority when NS records exist and no
    /// direct answer was found.
    fn translate_apex_label(
        resource: &Resource,
        qname: &Name,
        qtype: RecordType,
        ttl: u32,
    ) -> Translation {
        let mut out = Translation::default();

        match qtype {
            RecordType::A | RecordType::AAAA => {
                if let Some(target) = resource.canonical() {
                    Self::push_address_records(&mut out.answer, qname, ttl, target);
                }
                Self::push_tor_txt(&mut out.answer, qname, ttl, resource);
            }
            RecordType::NS => {
                for ns in resource.ns_targets() {
                    if let Some(name) = Self::target_name(ns) {
                        out.answer.push(HickoryRecord::from_rdata(
                            qname.clone(),
                            ttl,
                            RData::NS(rdata::NS(name)),
                        ));
                    }
                }
            }
            RecordType::TXT => {
                for record in &resource.records {
                    if let RrRecord::Text(text) = record {
                        out.answer.push(HickoryRecord::from_rdata(
                            qname.clone(),
                            ttl,
                            RData::TXT(TXT::new(vec![text.clone()])),
                        ));
                    }
                }
            }
            RecordType::DS => {
                for record in &resource.records {
                    if let RrRecord::Ds(ds) = record {
                        out.answer.push(HickoryRecord::from_rdata(
                            qname.clone(),
                            ttl,
                            RData::DS(rdata::DS::new(
                                ds.key_tag,
                                ds.algorithm.into(),
                                ds.digest_type.into(),
                                ds.digest.clone(),
                            )),
                        ));
                    }
                }
            }
            _ => {}
        }

        if out.answer.is_empty() {
            if let Some(target) = resource.delegate() {
                if let Some(name) = Self::target_name(target) {
                    out.answer.push(HickoryRecord::from_rdata(
                        qname.clone(),
                        ttl,
                        RData::CNAME(rdata::CNAME(name)),
                    ));
                    return out;
                }
            }
        }

        if out.answer.is_empty() {
            let referral = Self::referral_or_empty(resource, qname, ttl);
            out.authority = referral.authority;
            out.additional = referral.additional;
            out.needs_proof = referral.needs_proof && out.answer.is_empty();
        } else {
            Self::attach_glue(&mut out.additional, qname, ttl, resource);
        }

        out
    }

    /// Label count 2: `_<base32hex>.<tld>` IP-pointer answers. Never touches the tree; the dispatcher special-cases
    /// `_synth.` lookups entirely, but ordinary TLDs
    /// can also carry pointer-shaped leftmost labels for glue.
    fn translate_synth_pointer(
        qname: &Name,
        qtype: RecordType,
        ttl: u32,
        labels: &[&str],
    ) -> Option<Translation> {
        let want_v6 = match qtype {
            RecordType::A => false,
            RecordType::AAAA => true,
            _ => return None,
        };
        let pointer = IpPointer::from_label(labels[0], want_v6).ok()?;
        let rdata = match pointer.address {
            IpAddr::V4(v4) => RData::A(rdata::A(v4)),
            IpAddr::V6(v6) => RData::AAAA(rdata::AAAA(v6)),
        };
        Some(Translation {
            answer: vec![HickoryRecord::from_rdata(qname.clone(), ttl, rdata)],
            ..Default::default()
        })
    }

    /// Label count 3: `_service._proto.tld` SRV, `_port._proto.tld` TLSA,
    /// `<hash>._smimecert.tld` SMIMEA, and `<hash>._openpgpkey.tld`
    /// OPENPGPKEY decoding, each answered from the matching typed record.
    fn translate_service_subdomain(
        resource: &Resource,
        qname: &Name,
        qtype: RecordType,
        ttl: u32,
        labels: &[&str],
    ) -> Option<Translation> {
        match qtype {
            RecordType::SRV => Self::translate_srv(resource, qname, ttl, labels),
            RecordType::TLSA => Self::translate_tlsa(resource, qname, ttl, labels),
            RecordType::SMIMEA => Self::translate_smimea(resource, qname, ttl, labels),
            RecordType::OPENPGPKEY => Self::translate_openpgpkey(resource, qname, ttl, labels),
            _ => None,
        }
    }

    fn translate_srv(resource: &Resource, qname: &Name, ttl: u32, labels: &[&str]) -> Option<Translation> {
        let (service, protocol) = (labels[0], labels[1]);
        for record in &resource.records {
            if let RrRecord::Service(svc) = record {
                if svc.service == service && svc.protocol == protocol {
                    let target_name = Self::target_name(&svc.target)?;
                    let mut out = Translation {
                        answer: vec![HickoryRecord::from_rdata(
                            qname.clone(),
                            ttl,
                            RData::SRV(SRV::new(
                                svc.priority.into(),
                                svc.weight.into(),
                                svc.port,
                                target_name,
                            )),
                        )],
                        ..Default::default()
                    };
                    Self::attach_glue(&mut out.additional, qname, ttl, resource);
                    return Some(out);
                }
            }
        }
        None
    }

    /// `_<port>._tcp`/`_udp`. The resource model has no per-port TLSA
    /// binding, so every `Tls` record answers any well-formed port/protocol
    /// pair.
    fn translate_tlsa(resource: &Resource, qname: &Name, ttl: u32, labels: &[&str]) -> Option<Translation> {
        if !is_port_proto_label(labels[0], labels[1]) {
            return None;
        }
        let answer: Vec<HickoryRecord> = resource
            .records
            .iter()
            .filter_map(|record| match record {
                RrRecord::Tls(tls) => Some(HickoryRecord::from_rdata(
                    qname.clone(),
                    ttl,
                    RData::TLSA(rdata::TLSA::new(
                        tls.usage.into(),
                        tls.selector.into(),
                        tls.matching_type.into(),
                        tls.certificate.clone(),
                    )),
                )),
                _ => None,
            })
            .collect();
        (!answer.is_empty()).then_some(Translation {
            answer,
            ..Default::default()
        })
    }

    fn translate_smimea(resource: &Resource, qname: &Name, ttl: u32, labels: &[&str]) -> Option<Translation> {
        if labels[1] != "_smimecert" || !is_hash_label(labels[0]) {
            return None;
        }
        let answer: Vec<HickoryRecord> = resource
            .records
            .iter()
            .filter_map(|record| match record {
                RrRecord::Smime(smime) => {
                    // SMIMEA shares TLSA's wire shape (RFC 8162); reuse the
                    // rdata, then correct the type code.
                    let mut rec = HickoryRecord::from_rdata(
                        qname.clone(),
                        ttl,
                        RData::TLSA(rdata::TLSA::new(
                            smime.usage.into(),
                            smime.selector.into(),
                            smime.matching_type.into(),
                            smime.certificate.clone(),
                        )),
                    );
                    rec.set_record_type(RecordType::SMIMEA);
                    Some(rec)
                }
                _ => None,
            })
            .collect();
        (!answer.is_empty()).then_some(Translation {
            answer,
            ..Default::default()
        })
    }

    fn translate_openpgpkey(resource: &Resource, qname: &Name, ttl: u32, labels: &[&str]) -> Option<Translation> {
        if labels[1] != "_openpgpkey" || !is_hash_label(labels[0]) {
            return None;
        }
        let answer: Vec<HickoryRecord> = resource
            .records
            .iter()
            .filter_map(|record| match record {
                RrRecord::Pgp(pgp) => Some(HickoryRecord::from_rdata(
                    qname.clone(),
                    ttl,
                    RData::OPENPGPKEY(rdata::OPENPGPKEY::new(pgp.public_key.clone())),
                )),
                _ => None,
            })
            .collect();
        (!answer.is_empty()).then_some(Translation {
            answer,
            ..Default::default()
        })
    }

    /// ≥2 labels with no more specific match: referral if NS records exist,
    /// DNAME if a delegate exists, otherwise an empty authoritative answer
    /// that the caller should turn into an NSEC+SOA proof.
    fn referral_or_empty(resource: &Resource, qname: &Name, ttl: u32) -> Translation {
        let mut out = Translation {
            needs_proof: true,
            ..Default::default()
        };

        let ns_targets: Vec<&Target> = resource.ns_targets().collect();
        if !ns_targets.is_empty() {
            for ns in &ns_targets {
                if let Some(name) = Self::target_name(ns) {
                    out.authority.push(HickoryRecord::from_rdata(
                        qname.clone(),
                        ttl,
                        RData::NS(rdata::NS(name)),
                    ));
                }
            }
            for record in &resource.records {
                if let RrRecord::Ds(ds) = record {
                    out.authority.push(HickoryRecord::from_rdata(
                        qname.clone(),
                        ttl,
                        RData::DS(rdata::DS::new(
                            ds.key_tag,
                            ds.algorithm.into(),
                            ds.digest_type.into(),
                            ds.digest.clone(),
                        )),
                    ));
                }
            }
            Self::attach_glue(&mut out.additional, qname, ttl, resource);
            out.needs_proof = false;
            return out;
        }

        if let Some(target) = resource.delegate() {
            if let Some(name) = Self::target_name(target) {
                out.answer.push(HickoryRecord::from_rdata(
                    qname.clone(),
                    ttl,
                    RData::DNAME(rdata::DNAME(name)),
                ));
                out.needs_proof = false;
            }
        }

        out
    }

    fn push_address_records(out: &mut Vec<HickoryRecord>, name: &Name, ttl: u32, target: &Target) {
        match target {
            Target::Inet4(v4) => out.push(HickoryRecord::from_rdata(
                name.clone(),
                ttl,
                RData::A(rdata::A(*v4)),
            )),
            Target::Inet6(v6) => out.push(HickoryRecord::from_rdata(
                name.clone(),
                ttl,
                RData::AAAA(rdata::AAAA(*v6)),
            )),
            Target::Glue { inet4, inet6, .. } => {
                if let Some(v4) = inet4 {
                    out.push(HickoryRecord::from_rdata(
                        name.clone(),
                        ttl,
                        RData::A(rdata::A(*v4)),
                    ));
                }
                if let Some(v6) = inet6 {
                    out.push(HickoryRecord::from_rdata(
                        name.clone(),
                        ttl,
                        RData::AAAA(rdata::AAAA(*v6)),
                    ));
                }
            }
            _ => {}
        }
    }

    /// Onion targets can't be represented as A/AAAA, so they get a
    /// `hns:tor` TXT fallback instead.
    fn push_tor_txt(out: &mut Vec<HickoryRecord>, name: &Name, ttl: u32, resource: &Resource) {
        let onions: Vec<String> = resource
            .hosts
            .iter()
            .chain(resource.canonical())
            .filter_map(|t| match t {
                Target::Onion(bytes) => Some(
                    base32::encode(base32::Alphabet::Rfc4648 { padding: false }, bytes)
                        .to_ascii_lowercase(),
                ),
                Target::OnionNg(bytes) => Some(
                    base32::encode(base32::Alphabet::Rfc4648 { padding: false }, bytes)
                        .to_ascii_lowercase(),
                ),
                _ => None,
            })
            .collect();
        if onions.is_empty() {
            return;
        }
        let mut lines = vec!["hns:tor".to_string()];
        lines.extend(onions);
        out.push(HickoryRecord::from_rdata(
            name.clone(),
            ttl,
            RData::TXT(TXT::new(lines)),
        ));
    }

    fn attach_glue(out: &mut Vec<HickoryRecord>, name_hint: &Name, ttl: u32, resource: &Resource) {
        for host in &resource.hosts {
            if let Target::Glue { name, inet4, inet6 } = host {
                let Ok(glue_name) = Name::from_str(name) else {
                    continue;
                };
                let _ = name_hint;
                if let Some(v4) = inet4 {
                    out.push(HickoryRecord::from_rdata(
                        glue_name.clone(),
                        ttl,
                        RData::A(rdata::A(*v4)),
                    ));
                }
                if let Some(v6) = inet6 {
                    out.push(HickoryRecord::from_rdata(
                        glue_name.clone(),
                        ttl,
                        RData::AAAA(rdata::AAAA(*v6)),
                    ));
                }
            }
        }
    }

    fn target_name(target: &Target) -> Option<Name> {
        match target {
            Target::Name(name) | Target::Glue { name, .. } => Name::from_str(name).ok(),
            _ => None,
        }
    }

    /// Zone-apex SOA helper shared with [`super::root_zone::RootZone`].
    pub fn soa(name: &Name, mname: Name, rname: Name, serial: u32, ttl: u32) -> HickoryRecord {
        HickoryRecord::from_rdata(
            name.clone(),
            ttl,
            RData::SOA(SOA::new(mname, rname, serial, 1800, 900, 604800, 86400)),
        )
    }
}

/// `_<port>` with `port` a valid `u16`, followed by `_tcp`/`_udp`.
fn is_port_proto_label(port_label: &str, proto_label: &str) -> bool {
    let Some(port) = port_label.strip_prefix('_') else {
        return false;
    };
    if port.is_empty() || !port.bytes().all(|b| b.is_ascii_digit()) {
        return false;
    }
    port.parse::<u16>().is_ok() && matches!(proto_label, "_tcp" | "_udp")
}

/// A non-empty lowercase hex label, as SMIMEA/OPENPGPKEY owner names use.
fn is_hash_label(label: &str) -> bool {
    !label.is_empty() && label.bytes().all(|b| b.is_ascii_hexdigit())
}
