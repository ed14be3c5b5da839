//! `Target` — the typed endpoint referenced by CANONICAL/DELEGATE/NS/SERVICE
//! records and by the raw host list of a `Resource`.

use crate::compression::CompressionTable;
use crate::errors::DecodeError;
use crate::ip_pointer::{pack_ipv4, pack_ipv6, unpack_ipv4, unpack_ipv6};
use std::net::{Ipv4Addr, Ipv6Addr};

pub const TAG_INET4: u8 = 1;
pub const TAG_INET6: u8 = 2;
pub const TAG_ONION: u8 = 3;
pub const TAG_ONIONNG: u8 = 4;
pub const TAG_NAME: u8 = 5;
pub const TAG_GLUE: u8 = 6;

const ONION_LEN: usize = 10;
const ONIONNG_LEN: usize = 33;

const GLUE_HAS_INET4: u8 = 0x01;
const GLUE_HAS_INET6: u8 = 0x02;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    Inet4(Ipv4Addr),
    Inet6(Ipv6Addr),
    /// Raw 10-byte Tor v2 onion service identifier.
    Onion([u8; ONION_LEN]),
    /// Raw 33-byte Tor v3 (`onion-ng`) service identifier.
    OnionNg([u8; ONIONNG_LEN]),
    /// A fully-qualified Handshake name.
    Name(String),
    /// An HNS name carrying its own glue addresses.
    Glue {
        name: String,
        inet4: Option<Ipv4Addr>,
        inet6: Option<Ipv6Addr>,
    },
}

impl Target {
    pub fn is_tor(&self) -> bool {
        matches!(self, Target::Onion(_) | Target::OnionNg(_))
    }

    pub fn tag(&self) -> u8 {
        match self {
            Target::Inet4(_) => TAG_INET4,
            Target::Inet6(_) => TAG_INET6,
            Target::Onion(_) => TAG_ONION,
            Target::OnionNg(_) => TAG_ONIONNG,
            Target::Name(_) => TAG_NAME,
            Target::Glue { .. } => TAG_GLUE,
        }
    }

    pub fn encode(&self, table: &CompressionTable, out: &mut Vec<u8>) -> Result<(), DecodeError> {
        out.push(self.tag());
        match self {
            Target::Inet4(v4) => out.extend_from_slice(&pack_ipv4(*v4)),
            Target::Inet6(v6) => out.extend_from_slice(&pack_ipv6(*v6)),
            Target::Onion(bytes) => out.extend_from_slice(bytes),
            Target::OnionNg(bytes) => out.extend_from_slice(bytes),
            Target::Name(name) => table.write_string(name, out)?,
            Target::Glue { name, inet4, inet6 } => {
                if inet4.is_none() && inet6.is_none() {
                    return Err(DecodeError::InvalidTarget(
                        "glue target must carry at least one address",
                    ));
                }
                table.write_string(name, out)?;
                let mut flags = 0u8;
                if inet4.is_some() {
                    flags |= GLUE_HAS_INET4;
                }
                if inet6.is_some() {
                    flags |= GLUE_HAS_INET6;
                }
                out.push(flags);
                if let Some(v4) = inet4 {
                    out.extend_from_slice(&pack_ipv4(*v4));
                }
                if let Some(v6) = inet6 {
                    out.extend_from_slice(&pack_ipv6(*v6));
                }
            }
        }
        Ok(())
    }

    pub fn size(&self, table: &CompressionTable) -> Result<usize, DecodeError> {
        let mut scratch = Vec::new();
        self.encode(table, &mut scratch)?;
        Ok(scratch.len())
    }

    /// Reads a tagged `Target` (the tag byte plus its body) from `buf`.
    /// Returns the target and the number of bytes consumed, or
    /// `Ok(None)` if `buf[0]` is not a target tag (1..=6).
    pub fn try_read(
        buf: &[u8],
        table: &CompressionTable,
    ) -> Result<Option<(Self, usize)>, DecodeError> {
        let tag = match buf.first() {
            Some(&t) if (TAG_INET4..=TAG_GLUE).contains(&t) => t,
            _ => return Ok(None),
        };
        let body = &buf[1..];
        let (target, body_len) = match tag {
            TAG_INET4 => {
                let (addr, n) = unpack_ipv4(body)?;
                (Target::Inet4(addr), n)
            }
            TAG_INET6 => {
                let (addr, n) = unpack_ipv6(body)?;
                (Target::Inet6(addr), n)
            }
            TAG_ONION => {
                let bytes: [u8; ONION_LEN] = body
                    .get(..ONION_LEN)
                    .ok_or(DecodeError::Truncated("onion target"))?
                    .try_into()
                    .unwrap();
                (Target::Onion(bytes), ONION_LEN)
            }
            TAG_ONIONNG => {
                let bytes: [u8; ONIONNG_LEN] = body
                    .get(..ONIONNG_LEN)
                    .ok_or(DecodeError::Truncated("onion-ng target"))?
                    .try_into()
                    .unwrap();
                (Target::OnionNg(bytes), ONIONNG_LEN)
            }
            TAG_NAME => {
                let (name, n) = table.read_string(body)?;
                (Target::Name(name), n)
            }
            TAG_GLUE => {
                let (name, mut n) = table.read_string(body)?;
                let flags = *body
                    .get(n)
                    .ok_or(DecodeError::Truncated("glue flags"))?;
                n += 1;
                let mut inet4 = None;
                if flags & GLUE_HAS_INET4 != 0 {
                    let (addr, used) = unpack_ipv4(&body[n..])?;
                    inet4 = Some(addr);
                    n += used;
                }
                let mut inet6 = None;
                if flags & GLUE_HAS_INET6 != 0 {
                    let (addr, used) = unpack_ipv6(&body[n..])?;
                    inet6 = Some(addr);
                    n += used;
                }
                if inet4.is_none() && inet6.is_none() {
                    return Err(DecodeError::InvalidTarget(
                        "glue target must carry at least one address",
                    ));
                }
                (Target::Glue { name, inet4, inet6 }, n)
            }
            _ => unreachable!(),
        };
        Ok(Some((target, 1 + body_len)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inet4_round_trips() {
        let table = CompressionTable::empty();
        let target = Target::Inet4(Ipv4Addr::new(1, 2, 3, 4));
        let mut buf = Vec::new();
        target.encode(&table, &mut buf).unwrap();
        let (decoded, consumed) = Target::try_read(&buf, &table).unwrap().unwrap();
        assert_eq!(decoded, target);
        assert_eq!(consumed, buf.len());
    }

    #[test]
    fn name_round_trips_with_table() {
        let table = CompressionTable::build(["example.com.", "example.com."]);
        let target = Target::Name("example.com.".to_string());
        let mut buf = Vec::new();
        target.encode(&table, &mut buf).unwrap();
        let (decoded, _) = Target::try_read(&buf, &table).unwrap().unwrap();
        assert_eq!(decoded, target);
    }

    #[test]
    fn glue_requires_an_address() {
        let table = CompressionTable::empty();
        let target = Target::Glue {
            name: "ns1.example.".to_string(),
            inet4: None,
            inet6: None,
        };
        let mut buf = Vec::new();
        assert!(target.encode(&table, &mut buf).is_err());
    }

    #[test]
    fn glue_round_trips() {
        let table = CompressionTable::empty();
        let target = Target::Glue {
            name: "ns1.example.".to_string(),
            inet4: Some(Ipv4Addr::new(9, 9, 9, 9)),
            inet6: None,
        };
        let mut buf = Vec::new();
        target.encode(&table, &mut buf).unwrap();
        let (decoded, consumed) = Target::try_read(&buf, &table).unwrap().unwrap();
        assert_eq!(decoded, target);
        assert_eq!(consumed, buf.len());
    }
}
