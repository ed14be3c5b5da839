//! Typed resource records. Tags 1..=6 are the
//! raw [`crate::target::Target`] variants used for the host list; tags
//! 7..=21 are the records defined here.
//!
//! Every record here is wire-framed as `tag(u8) length(u8) body`. An
//! unrecognized tag must still round-trip losslessly as `Extra`, which is
//! only decodable if the body length is self-describing, so every
//! tag-7-and-up record carries an explicit `u8` body length (see
//! DESIGN.md).

use crate::compression::CompressionTable;
use crate::errors::DecodeError;
use crate::target::Target;

pub const TAG_CANONICAL: u8 = 7;
pub const TAG_DELEGATE: u8 = 8;
pub const TAG_NS: u8 = 9;
pub const TAG_SERVICE: u8 = 10;
pub const TAG_URI: u8 = 11;
pub const TAG_EMAIL: u8 = 12;
pub const TAG_TEXT: u8 = 13;
pub const TAG_LOCATION: u8 = 14;
pub const TAG_MAGNET: u8 = 15;
pub const TAG_DS: u8 = 16;
pub const TAG_TLS: u8 = 17;
pub const TAG_SMIME: u8 = 18;
pub const TAG_SSH: u8 = 19;
pub const TAG_PGP: u8 = 20;
pub const TAG_ADDR: u8 = 21;

const MAX_DIGEST: usize = 64;
const MAX_MAGNET_INFO: usize = 64;
const MAX_PGP_KEY: usize = 512;
const MAX_CERT: usize = 255;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Service {
    pub service: String,
    pub protocol: String,
    pub priority: u8,
    pub weight: u8,
    pub target: Target,
    pub port: u16,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Location {
    pub version: u8,
    pub size: u8,
    pub horiz_pre: u8,
    pub vert_pre: u8,
    pub latitude: u32,
    pub longitude: u32,
    pub altitude: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Magnet {
    pub nid: String,
    pub nin: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ds {
    pub key_tag: u16,
    pub algorithm: u8,
    pub digest_type: u8,
    pub digest: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tls {
    pub usage: u8,
    pub selector: u8,
    pub matching_type: u8,
    pub certificate: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Smime {
    pub usage: u8,
    pub selector: u8,
    pub matching_type: u8,
    pub certificate: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ssh {
    pub algorithm: u8,
    pub digest_type: u8,
    pub fingerprint: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pgp {
    pub public_key: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Addr {
    pub currency: String,
    pub address: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Record {
    Canonical(Target),
    Delegate(Target),
    Ns(Target),
    Service(Service),
    Uri(String),
    Email(String),
    Text(String),
    Location(Location),
    Magnet(Magnet),
    Ds(Ds),
    Tls(Tls),
    Smime(Smime),
    Ssh(Ssh),
    Pgp(Pgp),
    Addr(Addr),
    /// An unrecognized tag, preserved verbatim for lossless re-encoding.
    Extra { tag: u8, data: Vec<u8> },
}

fn check_len(field: &'static str, len: usize, limit: usize) -> Result<(), DecodeError> {
    if len > limit {
        Err(DecodeError::FieldTooLarge { field, len, limit })
    } else {
        Ok(())
    }
}

impl Record {
    pub fn tag(&self) -> u8 {
        match self {
            Record::Canonical(_) => TAG_CANONICAL,
            Record::Delegate(_) => TAG_DELEGATE,
            Record::Ns(_) => TAG_NS,
            Record::Service(_) => TAG_SERVICE,
            Record::Uri(_) => TAG_URI,
            Record::Email(_) => TAG_EMAIL,
            Record::Text(_) => TAG_TEXT,
            Record::Location(_) => TAG_LOCATION,
            Record::Magnet(_) => TAG_MAGNET,
            Record::Ds(_) => TAG_DS,
            Record::Tls(_) => TAG_TLS,
            Record::Smime(_) => TAG_SMIME,
            Record::Ssh(_) => TAG_SSH,
            Record::Pgp(_) => TAG_PGP,
            Record::Addr(_) => TAG_ADDR,
            Record::Extra { tag, .. } => *tag,
        }
    }

    fn encode_body(&self, table: &CompressionTable) -> Result<Vec<u8>, DecodeError> {
        let mut body = Vec::new();
        match self {
            Record::Canonical(target) | Record::Delegate(target) | Record::Ns(target) => {
                target.encode(table, &mut body)?;
            }
            Record::Service(svc) => {
                table.write_string(&svc.service, &mut body)?;
                table.write_string(&svc.protocol, &mut body)?;
                body.push(svc.priority);
                body.push(svc.weight);
                svc.target.encode(table, &mut body)?;
                body.extend_from_slice(&svc.port.to_be_bytes());
            }
            Record::Uri(s) | Record::Email(s) | Record::Text(s) => {
                table.write_string(s, &mut body)?;
            }
            Record::Location(loc) => {
                body.push(loc.version);
                body.push(loc.size);
                body.push(loc.horiz_pre);
                body.push(loc.vert_pre);
                body.extend_from_slice(&loc.latitude.to_be_bytes());
                body.extend_from_slice(&loc.longitude.to_be_bytes());
                body.extend_from_slice(&loc.altitude.to_be_bytes());
            }
            Record::Magnet(m) => {
                check_len("magnet info", m.nin.len(), MAX_MAGNET_INFO)?;
                table.write_string(&m.nid, &mut body)?;
                body.push(m.nin.len() as u8);
                body.extend_from_slice(&m.nin);
            }
            Record::Ds(ds) => {
                check_len("ds digest", ds.digest.len(), MAX_DIGEST)?;
                body.extend_from_slice(&ds.key_tag.to_be_bytes());
                body.push(ds.algorithm);
                body.push(ds.digest_type);
                body.push(ds.digest.len() as u8);
                body.extend_from_slice(&ds.digest);
            }
            Record::Tls(tls) => {
                check_len("tls certificate", tls.certificate.len(), MAX_CERT)?;
                body.push(tls.usage);
                body.push(tls.selector);
                body.push(tls.matching_type);
                body.push(tls.certificate.len() as u8);
                body.extend_from_slice(&tls.certificate);
            }
            Record::Smime(smime) => {
                check_len("smime certificate", smime.certificate.len(), MAX_CERT)?;
                body.push(smime.usage);
                body.push(smime.selector);
                body.push(smime.matching_type);
                body.push(smime.certificate.len() as u8);
                body.extend_from_slice(&smime.certificate);
            }
            Record::Ssh(ssh) => {
                check_len("ssh fingerprint", ssh.fingerprint.len(), MAX_DIGEST)?;
                body.push(ssh.algorithm);
                body.push(ssh.digest_type);
                body.push(ssh.fingerprint.len() as u8);
                body.extend_from_slice(&ssh.fingerprint);
            }
            Record::Pgp(pgp) => {
                check_len("pgp public key", pgp.public_key.len(), MAX_PGP_KEY)?;
                body.extend_from_slice(&(pgp.public_key.len() as u16).to_be_bytes());
                body.extend_from_slice(&pgp.public_key);
            }
            Record::Addr(addr) => {
                table.write_string(&addr.currency, &mut body)?;
                table.write_string(&addr.address, &mut body)?;
            }
            Record::Extra { data, .. } => body.extend_from_slice(data),
        }
        Ok(body)
    }

    /// Encodes `tag(u8) length(u8) body` onto `out`.
    pub fn encode(&self, table: &CompressionTable, out: &mut Vec<u8>) -> Result<(), DecodeError> {
        let body = self.encode_body(table)?;
        check_len("record body", body.len(), 255)?;
        out.push(self.tag());
        out.push(body.len() as u8);
        out.extend_from_slice(&body);
        Ok(())
    }

    pub fn size(&self, table: &CompressionTable) -> Result<usize, DecodeError> {
        Ok(2 + self.encode_body(table)?.len())
    }

    /// Reads one `tag length body` record. Returns the record and total
    /// bytes consumed (including the tag and length byte).
    pub fn read(buf: &[u8], table: &CompressionTable) -> Result<(Self, usize), DecodeError> {
        let tag = *buf.first().ok_or(DecodeError::Truncated("record tag"))?;
        let len = *buf.get(1).ok_or(DecodeError::Truncated("record length"))? as usize;
        let body = buf
            .get(2..2 + len)
            .ok_or(DecodeError::Truncated("record body"))?;

        let record = match tag {
            TAG_CANONICAL | TAG_DELEGATE | TAG_NS => {
                let (target, _) = Target::try_read(body, table)?
                    .ok_or(DecodeError::InvalidTarget("expected a target tag"))?;
                match tag {
                    TAG_CANONICAL => Record::Canonical(target),
                    TAG_DELEGATE => Record::Delegate(target),
                    _ => Record::Ns(target),
                }
            }
            TAG_SERVICE => {
                let (service, n1) = table.read_string(body)?;
                let (protocol, n2) = table.read_string(&body[n1..])?;
                let mut pos = n1 + n2;
                let priority = *body.get(pos).ok_or(DecodeError::Truncated("srv priority"))?;
                pos += 1;
                let weight = *body.get(pos).ok_or(DecodeError::Truncated("srv weight"))?;
                pos += 1;
                let (target, n3) = Target::try_read(&body[pos..], table)?
                    .ok_or(DecodeError::InvalidTarget("expected a target tag"))?;
                pos += n3;
                let port_bytes = body
                    .get(pos..pos + 2)
                    .ok_or(DecodeError::Truncated("srv port"))?;
                let port = u16::from_be_bytes([port_bytes[0], port_bytes[1]]);
                Record::Service(Service {
                    service,
                    protocol,
                    priority,
                    weight,
                    target,
                    port,
                })
            }
            TAG_URI => Record::Uri(table.read_string(body)?.0),
            TAG_EMAIL => Record::Email(table.read_string(body)?.0),
            TAG_TEXT => Record::Text(table.read_string(body)?.0),
            TAG_LOCATION => {
                if body.len() < 16 {
                    return Err(DecodeError::Truncated("loc record"));
                }
                Record::Location(Location {
                    version: body[0],
                    size: body[1],
                    horiz_pre: body[2],
                    vert_pre: body[3],
                    latitude: u32::from_be_bytes(body[4..8].try_into().unwrap()),
                    longitude: u32::from_be_bytes(body[8..12].try_into().unwrap()),
                    altitude: u32::from_be_bytes(body[12..16].try_into().unwrap()),
                })
            }
            TAG_MAGNET => {
                let (nid, n1) = table.read_string(body)?;
                let nin_len = *body.get(n1).ok_or(DecodeError::Truncated("magnet nin len"))? as usize;
                check_len("magnet info", nin_len, MAX_MAGNET_INFO)?;
                let nin = body
                    .get(n1 + 1..n1 + 1 + nin_len)
                    .ok_or(DecodeError::Truncated("magnet nin"))?
                    .to_vec();
                Record::Magnet(Magnet { nid, nin })
            }
            TAG_DS => {
                if body.len() < 5 {
                    return Err(DecodeError::Truncated("ds record"));
                }
                let key_tag = u16::from_be_bytes([body[0], body[1]]);
                let algorithm = body[2];
                let digest_type = body[3];
                let digest_len = body[4] as usize;
                check_len("ds digest", digest_len, MAX_DIGEST)?;
                let digest = body
                    .get(5..5 + digest_len)
                    .ok_or(DecodeError::Truncated("ds digest"))?
                    .to_vec();
                Record::Ds(Ds {
                    key_tag,
                    algorithm,
                    digest_type,
                    digest,
                })
            }
            TAG_TLS | TAG_SMIME => {
                if body.len() < 4 {
                    return Err(DecodeError::Truncated("tlsa-style record"));
                }
                let usage = body[0];
                let selector = body[1];
                let matching_type = body[2];
                let cert_len = body[3] as usize;
                check_len("certificate", cert_len, MAX_CERT)?;
                let certificate = body
                    .get(4..4 + cert_len)
                    .ok_or(DecodeError::Truncated("certificate"))?
                    .to_vec();
                if tag == TAG_TLS {
                    Record::Tls(Tls {
                        usage,
                        selector,
                        matching_type,
                        certificate,
                    })
                } else {
                    Record::Smime(Smime {
                        usage,
                        selector,
                        matching_type,
                        certificate,
                    })
                }
            }
            TAG_SSH => {
                if body.len() < 3 {
                    return Err(DecodeError::Truncated("ssh record"));
                }
                let algorithm = body[0];
                let digest_type = body[1];
                let fp_len = body[2] as usize;
                check_len("ssh fingerprint", fp_len, MAX_DIGEST)?;
                let fingerprint = body
                    .get(3..3 + fp_len)
                    .ok_or(DecodeError::Truncated("ssh fingerprint"))?
                    .to_vec();
                Record::Ssh(Ssh {
                    algorithm,
                    digest_type,
                    fingerprint,
                })
            }
            TAG_PGP => {
                if body.len() < 2 {
                    return Err(DecodeError::Truncated("pgp record"));
                }
                let key_len = u16::from_be_bytes([body[0], body[1]]) as usize;
                check_len("pgp public key", key_len, MAX_PGP_KEY)?;
                let public_key = body
                    .get(2..2 + key_len)
                    .ok_or(DecodeError::Truncated("pgp public key"))?
                    .to_vec();
                Record::Pgp(Pgp { public_key })
            }
            TAG_ADDR => {
                let (currency, n1) = table.read_string(body)?;
                let (address, _) = table.read_string(&body[n1..])?;
                Record::Addr(Addr { currency, address })
            }
            other => Record::Extra {
                tag: other,
                data: body.to_vec(),
            },
        };

        Ok((record, 2 + len))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::Ipv4Addr;

    fn assert_round_trips(record: Record, table: &CompressionTable) {
        let mut buf = Vec::new();
        record.encode(table, &mut buf).unwrap();
        assert_eq!(record.size(table).unwrap(), buf.len());
        let (decoded, consumed) = Record::read(&buf, table).unwrap();
        assert_eq!(decoded, record);
        assert_eq!(consumed, buf.len());
    }

    #[test]
    fn text_round_trips() {
        let table = CompressionTable::empty();
        assert_round_trips(Record::Text("hello world".into()), &table);
    }

    #[test]
    fn ns_round_trips() {
        let table = CompressionTable::empty();
        assert_round_trips(Record::Ns(Target::Name("ns1.example.".into())), &table);
    }

    #[test]
    fn service_round_trips() {
        let table = CompressionTable::empty();
        let svc = Service {
            service: "_http".into(),
            protocol: "_tcp".into(),
            priority: 1,
            weight: 2,
            target: Target::Inet4(Ipv4Addr::new(1, 1, 1, 1)),
            port: 8080,
        };
        assert_round_trips(Record::Service(svc), &table);
    }

    #[test]
    fn ds_round_trips() {
        let table = CompressionTable::empty();
        let ds = Ds {
            key_tag: 1234,
            algorithm: 13,
            digest_type: 2,
            digest: vec![0xAB; 32],
        };
        assert_round_trips(Record::Ds(ds), &table);
    }

    #[test]
    fn unknown_tag_preserved_as_extra() {
        let table = CompressionTable::empty();
        let extra = Record::Extra {
            tag: 200,
            data: vec![1, 2, 3, 4],
        };
        assert_round_trips(extra, &table);
    }

    #[test]
    fn oversized_pgp_key_rejected() {
        let table = CompressionTable::empty();
        let pgp = Record::Pgp(Pgp {
            public_key: vec![0u8; MAX_PGP_KEY + 1],
        });
        assert!(pgp.encode(&table, &mut Vec::new()).is_err());
    }
}
