//! IP ⇄ synth-label mapping.
//!
//! An [`IpPointer`] is a DNS label of the form `_<base32hex>` that encodes a
//! raw IPv4/IPv6 address so it can be referenced by name — used for NS glue
//! at the root apex and for SRV/MX targets that are literal addresses.

use crate::errors::DecodeError;
use std::net::{Ipv4Addr, Ipv6Addr};

/// Packs an IPv6 address by replacing its longest contiguous run of zero
/// bytes with a `(start << 4) | len` prefix byte.
///
/// A run spanning the full address (the unspecified address, `::`) is
/// capped to 15 so the invariant `len != 16` holds; the sixteenth byte is
/// then carried literally ("stored without compression").
pub fn pack_ipv6(addr: Ipv6Addr) -> Vec<u8> {
    let bytes = addr.octets();
    let (start, len) = longest_zero_run(&bytes);
    let mut out = Vec::with_capacity(1 + 16 - len);
    out.push(((start as u8) << 4) | (len as u8));
    out.extend_from_slice(&bytes[..start]);
    out.extend_from_slice(&bytes[start + len..]);
    out
}

fn longest_zero_run(bytes: &[u8; 16]) -> (usize, usize) {
    let (mut best_start, mut best_len) = (0usize, 0usize);
    let mut i = 0;
    while i < 16 {
        if bytes[i] == 0 {
            let start = i;
            while i < 16 && bytes[i] == 0 {
                i += 1;
            }
            let len = i - start;
            if len > best_len {
                best_start = start;
                best_len = len;
            }
        } else {
            i += 1;
        }
    }
    if best_len == 16 {
        best_len = 15;
    }
    (best_start, best_len)
}

/// Inverse of [`pack_ipv6`]. Returns the address and the number of input
/// bytes consumed.
pub fn unpack_ipv6(buf: &[u8]) -> Result<(Ipv6Addr, usize), DecodeError> {
    let head = *buf.first().ok_or(DecodeError::Truncated("ipv6 prefix"))?;
    let start = (head >> 4) as usize;
    let len = (head & 0x0F) as usize;
    if start >= 16 || len >= 16 || start + len > 16 {
        return Err(DecodeError::BadPointer("invalid ipv6 zero-run prefix"));
    }
    let remaining_len = 16 - len;
    let remaining = buf
        .get(1..1 + remaining_len)
        .ok_or(DecodeError::Truncated("ipv6 remainder"))?;

    let mut bytes = [0u8; 16];
    bytes[..start].copy_from_slice(&remaining[..start]);
    bytes[start + len..].copy_from_slice(&remaining[start..]);

    Ok((Ipv6Addr::from(bytes), 1 + remaining_len))
}

/// IPv4 addresses are always encoded as 4 literal bytes.
pub fn pack_ipv4(addr: Ipv4Addr) -> [u8; 4] {
    addr.octets()
}

pub fn unpack_ipv4(buf: &[u8]) -> Result<(Ipv4Addr, usize), DecodeError> {
    let bytes = buf.get(..4).ok_or(DecodeError::Truncated("ipv4 address"))?;
    Ok((Ipv4Addr::new(bytes[0], bytes[1], bytes[2], bytes[3]), 4))
}

const BASE32HEX: base32::Alphabet = base32::Alphabet::Rfc4648Hex { padding: false };

/// A synthesized `_<base32hex>` DNS label naming a raw IP address.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IpPointer {
    pub address: std::net::IpAddr,
}

impl IpPointer {
    pub fn new(address: std::net::IpAddr) -> Self {
        Self { address }
    }

    /// Render the `_<base32hex>` label (without trailing dot or parent zone).
    pub fn to_label(&self) -> String {
        let packed = match self.address {
            std::net::IpAddr::V4(v4) => pack_ipv4(v4).to_vec(),
            std::net::IpAddr::V6(v6) => pack_ipv6(v6),
        };
        format!("_{}", base32::encode(BASE32HEX, &packed).to_lowercase())
    }

    /// Parse a `_<base32hex>` label, interpreting the payload as an IPv4
    /// address when `want_v6` is false and as the compressed IPv6 form
    /// otherwise. The caller picks the family from the query's RR type
    /// (A vs AAAA).
    pub fn from_label(label: &str, want_v6: bool) -> Result<Self, DecodeError> {
        let body = label
            .strip_prefix('_')
            .ok_or(DecodeError::BadPointer("missing leading underscore"))?;
        let packed = base32::decode(BASE32HEX, body)
            .ok_or(DecodeError::BadPointer("invalid base32hex payload"))?;

        let address = if want_v6 {
            let (addr, _) = unpack_ipv6(&packed)?;
            std::net::IpAddr::V6(addr)
        } else {
            let (addr, _) = unpack_ipv4(&packed)?;
            std::net::IpAddr::V4(addr)
        };
        Ok(Self { address })
    }
}
