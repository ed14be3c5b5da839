//! `Resource` — the authoritative name payload stored on-chain and decoded
//! by the root server once a name's auction reaches `CLOSED`.

use crate::compression::CompressionTable;
use crate::errors::DecodeError;
use crate::record::Record;
use crate::target::Target;

const MAX_RECORDS: usize = 255;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resource {
    /// Opaque pass-through flag.
    pub compat: bool,
    /// Effective TTL in seconds. Always a multiple of 64 after decode (a
    /// wire value of zero decodes to 64).
    pub ttl: u32,
    pub symbols: CompressionTable,
    /// Target records appearing in the untagged host list (wire tags 1..=6).
    pub hosts: Vec<Target>,
    /// Typed records appearing after the host list (wire tags 7..=21, plus
    /// any preserved `Extra`).
    pub records: Vec<Record>,
}

impl Resource {
    /// Builds a `Resource` and derives a compression table covering every
    /// string field present in `hosts`/`records`.
    pub fn build(ttl: u32, hosts: Vec<Target>, records: Vec<Record>) -> Result<Self, DecodeError> {
        let owned = collect_strings(&hosts, &records);
        let borrowed: Vec<&str> = owned.iter().map(|s| s.as_str()).collect();
        let symbols = CompressionTable::build(borrowed);
        let resource = Self {
            compat: false,
            ttl,
            symbols,
            hosts,
            records,
        };
        resource.validate()?;
        Ok(resource)
    }

    /// The effective CANONICAL target: an explicit `Record::Canonical`, or,
    /// failing that, a bare `Target::Name` in the host list — the wire
    /// format treats a NAME host as CANONICAL for legacy reasons.
    pub fn canonical(&self) -> Option<&Target> {
        self.records
            .iter()
            .find_map(|r| match r {
                Record::Canonical(t) => Some(t),
                _ => None,
            })
            .or_else(|| self.hosts.iter().find(|t| matches!(t, Target::Name(_))))
    }

    pub fn delegate(&self) -> Option<&Target> {
        self.records.iter().find_map(|r| match r {
            Record::Delegate(t) => Some(t),
            _ => None,
        })
    }

    pub fn ns_targets(&self) -> impl Iterator<Item = &Target> {
        self.records.iter().filter_map(|r| match r {
            Record::Ns(t) => Some(t),
            _ => None,
        })
    }

    pub fn validate(&self) -> Result<(), DecodeError> {
        if self.hosts.len() + self.records.len() > MAX_RECORDS {
            return Err(DecodeError::TooManyRecords(
                self.hosts.len() + self.records.len(),
            ));
        }

        let canonical_count = self
            .records
            .iter()
            .filter(|r| matches!(r, Record::Canonical(_)))
            .count();
        if canonical_count > 1 {
            return Err(DecodeError::DuplicateSingleton("CANONICAL"));
        }

        let delegate_count = self
            .records
            .iter()
            .filter(|r| matches!(r, Record::Delegate(_)))
            .count();
        if delegate_count > 1 {
            return Err(DecodeError::DuplicateSingleton("DELEGATE"));
        }

        if let Some(target) = self.canonical() {
            if target.is_tor() {
                return Err(DecodeError::InvalidTarget("CANONICAL must not be a Tor target"));
            }
        }

        if let Some(target) = self.delegate() {
            if !matches!(target, Target::Name(_)) {
                return Err(DecodeError::InvalidTarget("DELEGATE must be an HNS name"));
            }
        }

        for ns in self.ns_targets() {
            if ns.is_tor() {
                return Err(DecodeError::InvalidTarget("NS must not be a Tor target"));
            }
        }

        Ok(())
    }

    pub fn encode(&self) -> Result<Vec<u8>, DecodeError> {
        self.validate()?;

        let ttl15 = ((self.ttl / 64).min(0x7FFF)) as u16;
        let field = ((self.compat as u16) << 15) | ttl15;

        let mut out = Vec::new();
        out.push(0u8); // version
        out.extend_from_slice(&field.to_be_bytes());
        out.extend_from_slice(&self.symbols.encode_table()?);

        for host in &self.hosts {
            host.encode(&self.symbols, &mut out)?;
        }
        for record in &self.records {
            record.encode(&self.symbols, &mut out)?;
        }
        Ok(out)
    }

    pub fn get_size(&self) -> Result<usize, DecodeError> {
        Ok(self.encode()?.len())
    }

    pub fn decode(buf: &[u8]) -> Result<Self, DecodeError> {
        let version = *buf.first().ok_or(DecodeError::Truncated("version"))?;
        if version != 0 {
            return Err(DecodeError::BadVersion(version));
        }

        let field_bytes = buf.get(1..3).ok_or(DecodeError::Truncated("ttl field"))?;
        let field = u16::from_be_bytes([field_bytes[0], field_bytes[1]]);
        let compat = field & 0x8000 != 0;
        let ttl15 = field & 0x7FFF;
        let ttl = if ttl15 == 0 { 64 } else { (ttl15 as u32) * 64 };

        let (symbols, table_len) = CompressionTable::decode_table(&buf[3..])?;

        let mut hosts = Vec::new();
        let mut records = Vec::new();
        let mut pos = 3 + table_len;
        while pos < buf.len() {
            if hosts.len() + records.len() >= MAX_RECORDS {
                return Err(DecodeError::TooManyRecords(hosts.len() + records.len() + 1));
            }
            if let Some((target, consumed)) = Target::try_read(&buf[pos..], &symbols)? {
                hosts.push(target);
                pos += consumed;
            } else {
                let (record, consumed) = Record::read(&buf[pos..], &symbols)?;
                records.push(record);
                pos += consumed;
            }
        }

        let resource = Self {
            compat,
            ttl,
            symbols,
            hosts,
            records,
        };
        resource.validate()?;
        Ok(resource)
    }
}

fn collect_strings(hosts: &[Target], records: &[Record]) -> Vec<String> {
    let mut out = Vec::new();
    let mut push_target = |t: &Target, out: &mut Vec<String>| match t {
        Target::Name(name) => out.push(name.clone()),
        Target::Glue { name, .. } => out.push(name.clone()),
        _ => {}
    };
    for host in hosts {
        push_target(host, &mut out);
    }
    for record in records {
        match record {
            Record::Canonical(t) | Record::Delegate(t) | Record::Ns(t) => push_target(t, &mut out),
            Record::Service(svc) => {
                out.push(svc.service.clone());
                out.push(svc.protocol.clone());
                push_target(&svc.target, &mut out);
            }
            Record::Uri(s) | Record::Email(s) | Record::Text(s) => out.push(s.clone()),
            Record::Magnet(m) => out.push(m.nid.clone()),
            Record::Addr(a) => {
                out.push(a.currency.clone());
                out.push(a.address.clone());
            }
            _ => {}
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{Ds, Service};
    use std::net::Ipv4Addr;

    #[test]
    fn empty_resource_round_trips() {
        let resource = Resource::build(4096, vec![], vec![]).unwrap();
        let encoded = resource.encode().unwrap();
        assert_eq!(encoded.len(), resource.get_size().unwrap());
        let decoded = Resource::decode(&encoded).unwrap();
        assert_eq!(decoded, resource);
    }

    #[test]
    fn full_resource_round_trips() {
        let hosts = vec![Target::Inet4(Ipv4Addr::new(10, 0, 0, 1))];
        let records = vec![
            Record::Ns(Target::Name("ns1.example.".into())),
            Record::Text("hello".into()),
            Record::Ds(Ds {
                key_tag: 42,
                algorithm: 13,
                digest_type: 2,
                digest: vec![7; 32],
            }),
            Record::Service(Service {
                service: "_http".into(),
                protocol: "_tcp".into(),
                priority: 0,
                weight: 0,
                target: Target::Name("ns1.example.".into()),
                port: 80,
            }),
        ];
        let resource = Resource::build(128, hosts, records).unwrap();
        let encoded = resource.encode().unwrap();
        assert_eq!(encoded.len(), resource.get_size().unwrap());
        let decoded = Resource::decode(&encoded).unwrap();
        assert_eq!(decoded, resource);
    }

    #[test]
    fn zero_ttl_field_decodes_to_64() {
        let resource = Resource::build(64, vec![], vec![]).unwrap();
        let encoded = resource.encode().unwrap();
        // field bytes at offset 1..3 should encode ttl15 == 1 (64/64)
        assert_eq!(u16::from_be_bytes([encoded[1], encoded[2]]), 1);
        let decoded = Resource::decode(&encoded).unwrap();
        assert_eq!(decoded.ttl, 64);
    }

    #[test]
    fn rejects_duplicate_canonical() {
        let records = vec![
            Record::Canonical(Target::Inet4(Ipv4Addr::new(1, 1, 1, 1))),
            Record::Canonical(Target::Inet4(Ipv4Addr::new(2, 2, 2, 2))),
        ];
        assert_eq!(
            Resource::build(64, vec![], records),
            Err(DecodeError::DuplicateSingleton("CANONICAL"))
        );
    }

    #[test]
    fn rejects_tor_canonical() {
        let records = vec![Record::Canonical(Target::Onion([1; 10]))];
        assert_eq!(
            Resource::build(64, vec![], records),
            Err(DecodeError::InvalidTarget(
                "CANONICAL must not be a Tor target"
            ))
        );
    }

    #[test]
    fn rejects_non_name_delegate() {
        let records = vec![Record::Delegate(Target::Inet4(Ipv4Addr::new(1, 1, 1, 1)))];
        assert_eq!(
            Resource::build(64, vec![], records),
            Err(DecodeError::InvalidTarget("DELEGATE must be an HNS name"))
        );
    }

    #[test]
    fn rejects_bad_version_on_decode() {
        let buf = [1u8, 0, 1, 0];
        assert_eq!(Resource::decode(&buf), Err(DecodeError::BadVersion(1)));
    }
}
