//! The request dispatcher: `resolve(query) -> Message`.
//!
//! Ports are injected through `Arc`, with a single `#[instrument]`-ed
//! async entry point that walks the nine-step resolution contract:
//! legality check, apex handling, synth-pointer lookups, cache, blacklist,
//! tree lookup, servability, translation, sign-and-cache.

use std::sync::Arc;
use std::time::Duration;

use hickory_proto::op::{Header, Message, MessageType, OpCode, ResponseCode};
use hickory_proto::rr::{Name, RecordType};
use tracing::{instrument, warn};

use rootward_domain::{AuctionState, NetworkParams};

use crate::ports::{Clock, ResponseCache, Signer, TreeLookup};
use crate::ports::response_cache::CacheKey;
use crate::services::nsec::{is_root_legal_qname, NsecSynthesizer};
use crate::services::resource_to_dns::ResourceToDns;
use crate::services::root_zone::RootZone;
use crate::services::rrsig;

const DEFAULT_TTL: u32 = 1800;
const CACHE_TTL: Duration = Duration::from_secs(1800);

/// Blacklist + reserved-root middleware hook. Implementors may answer authoritatively for a TLD
/// before the tree is ever consulted.
pub trait Middleware: Send + Sync {
    fn intercept(&self, tld: &str, query: &Message) -> Option<Message>;
}

pub struct RootServer {
    tree: Arc<dyn TreeLookup>,
    cache: Arc<dyn ResponseCache>,
    signer: Arc<dyn Signer>,
    clock: Arc<dyn Clock>,
    root_zone: Arc<RootZone>,
    blacklist: Vec<String>,
    params: NetworkParams,
    middleware: Option<Arc<dyn Middleware>>,
}

impl RootServer {
    pub fn new(
        tree: Arc<dyn TreeLookup>,
        cache: Arc<dyn ResponseCache>,
        signer: Arc<dyn Signer>,
        clock: Arc<dyn Clock>,
        root_zone: Arc<RootZone>,
        blacklist: Vec<String>,
    ) -> Self {
        Self {
            tree,
            cache,
            signer,
            clock,
            root_zone,
            blacklist,
            params: NetworkParams::mainnet(),
            middleware: None,
        }
    }

    pub fn with_middleware(mut self, middleware: Arc<dyn Middleware>) -> Self {
        self.middleware = Some(middleware);
        self
    }

    #[instrument(skip(self, query))]
    pub async fn resolve(&self, query: &Message) -> Message {
        let Some(question) = query.query() else {
            return self.error_response(query, ResponseCode::FormErr);
        };
        let qname = question.name().clone();
        let qtype = question.query_type();

        // Step 1: lowercase, split, tld.
        let lowered = qname.to_lowercase();
        let labels: Vec<String> = lowered
            .iter()
            .map(|l| String::from_utf8_lossy(l).to_string())
            .collect();
        let label_refs: Vec<&str> = labels.iter().map(|s| s.as_str()).collect();

        if !is_root_legal_qname(&label_refs) {
            return self.error_response(query, ResponseCode::Refused);
        }

        // Step 2: the apex itself.
        if labels.is_empty() {
            return self.answer_apex(query, &lowered, qtype);
        }

        // Step 3: `_synth.` pointer lookups never touch the tree. The
        // leftmost label directly encodes the address; `_synth.` is just the
        // well-known parent, not a name with its own Resource.
        if labels.last().map(String::as_str) == Some("synth")
            && labels.len() >= 2
            && labels[labels.len() - 2].starts_with('_')
        {
            let pointer_label = &labels[labels.len() - 2];
            let want_v6 = qtype == RecordType::AAAA;
            if matches!(qtype, RecordType::A | RecordType::AAAA) {
                if let Ok(pointer) =
                    rootward_domain::ip_pointer::IpPointer::from_label(pointer_label, want_v6)
                {
                    let record = match pointer.address {
                        std::net::IpAddr::V4(v4) => hickory_proto::rr::Record::from_rdata(
                            lowered.clone(),
                            DEFAULT_TTL,
                            hickory_proto::rr::RData::A(hickory_proto::rr::rdata::A(v4)),
                        ),
                        std::net::IpAddr::V6(v6) => hickory_proto::rr::Record::from_rdata(
                            lowered.clone(),
                            DEFAULT_TTL,
                            hickory_proto::rr::RData::AAAA(hickory_proto::rr::rdata::AAAA(v6)),
                        ),
                    };
                    return self.build_message(query, vec![record], vec![], vec![], false);
                }
            }
            return self.error_response(query, ResponseCode::FormErr);
        }

        let tld = labels.last().cloned().unwrap_or_default();
        let cache_key = CacheKey::new(tld.clone().into(), None);

        // Step 4: cache.
        if let Some(cached) = self.cache.get(&cache_key) {
            if let Ok(message) = Message::from_vec(&cached) {
                return message;
            }
        }

        // Step 5: blacklist short-circuit.
        if self.blacklist.iter().any(|b| b == &tld) {
            if let Some(fallback) = self.root_zone.dynamic_fallback(&tld, query).await {
                return fallback;
            }
            return self.nxdomain(query, &lowered, &tld);
        }

        // Optional middleware hook before the tree.
        if let Some(mw) = &self.middleware {
            if let Some(response) = mw.intercept(&tld, query) {
                return response;
            }
        }

        // Step 6: tree lookup.
        let name_hash = blake2_tld_hash(&tld);
        let state = match self.tree.lookup(name_hash).await {
            Ok(Some(state)) => state,
            Ok(None) => {
                if let Some(fallback) = self.root_zone.dynamic_fallback(&tld, query).await {
                    return fallback;
                }
                return self.nxdomain(query, &lowered, &tld);
            }
            Err(err) => {
                warn!(%tld, error = %err, "tree lookup failed");
                return self.error_response(query, ResponseCode::ServFail);
            }
        };

        // Step 7: servability.
        let height = self.clock.height();
        if state.state_at(height, &self.params) != AuctionState::Closed || state.data.is_empty() {
            return self.nxdomain(query, &lowered, &tld);
        }

        // Step 8: decode + translate, falling back to proof synthesis.
        let resource = match state.resource(height, &self.params) {
            Some(Ok(resource)) => resource,
            Some(Err(err)) => {
                warn!(%tld, error = %err, "resource decode failed");
                return self.nxdomain(query, &lowered, &tld);
            }
            None => return self.nxdomain(query, &lowered, &tld),
        };

        let translation =
            ResourceToDns::translate(&resource, &lowered, qtype, resource.ttl, &label_refs);

        let (answer, authority) = if translation.answer.is_empty() && translation.needs_proof {
            let proof = NsecSynthesizer::synthesize(&lowered, &tld, &[]);
            let mut authority = vec![self.root_zone.soa(self.clock.now())];
            authority.extend(proof);
            (vec![], authority)
        } else {
            (translation.answer, translation.authority)
        };

        // Step 9: sign, cache, return.
        let message = self.build_message(query, answer, authority, translation.additional, false);
        if let Ok(wire) = message.to_vec() {
            self.cache.put(cache_key, wire.into(), CACHE_TTL);
        }
        message
    }

    fn answer_apex(&self, query: &Message, apex: &Name, qtype: RecordType) -> Message {
        let mut answer = Vec::new();
        let mut authority = Vec::new();
        let mut additional = Vec::new();

        match qtype {
            RecordType::NS | RecordType::ANY => {
                let (ns, glue) = self.root_zone.apex_ns();
                answer.push(ns);
                additional.push(glue);
            }
            RecordType::SOA => answer.push(self.root_zone.soa(self.clock.now())),
            RecordType::DNSKEY => answer.extend(self.root_zone.dnskeys()),
            RecordType::DS => answer.push(self.root_zone.apex_ds()),
            _ => {
                authority.push(self.root_zone.soa(self.clock.now()));
                authority.extend(NsecSynthesizer::synthesize(apex, "", &[]));
            }
        }
        self.build_message(query, answer, authority, additional, false)
    }

    fn nxdomain(&self, query: &Message, qname: &Name, tld: &str) -> Message {
        let proof = NsecSynthesizer::synthesize(qname, tld, &[]);
        let mut authority = vec![self.root_zone.soa(self.clock.now())];
        authority.extend(proof);
        let mut message = self.build_message(query, vec![], authority, vec![], true);
        message.set_response_code(ResponseCode::NXDomain);
        message
    }

    fn error_response(&self, query: &Message, code: ResponseCode) -> Message {
        let mut header = Header::response_from_request(query.header());
        header.set_response_code(code);
        let mut message = Message::new();
        *message.header_mut() = header;
        message
    }

    fn build_message(
        &self,
        query: &Message,
        answer: Vec<hickory_proto::rr::Record>,
        authority: Vec<hickory_proto::rr::Record>,
        additional: Vec<hickory_proto::rr::Record>,
        authoritative_no_data: bool,
    ) -> Message {
        let now = self.clock.now();
        let answer = rrsig::sign_section(self.signer.as_ref(), now, answer);
        let authority = rrsig::sign_section(self.signer.as_ref(), now, authority);
        let additional = rrsig::sign_section(self.signer.as_ref(), now, additional);

        let mut header = Header::response_from_request(query.header());
        header.set_message_type(MessageType::Response);
        header.set_op_code(OpCode::Query);
        header.set_authoritative(true);
        header.set_answer_count(answer.len() as u16);
        header.set_name_server_count(authority.len() as u16);
        header.set_additional_count(additional.len() as u16);
        if authoritative_no_data {
            header.set_response_code(ResponseCode::NoError);
        }

        let mut message = Message::new();
        *message.header_mut() = header;
        if let Some(query_part) = query.query() {
            message.add_query(query_part.clone());
        }
        for record in answer {
            message.add_answer(record);
        }
        for record in authority {
            message.add_name_server(record);
        }
        for record in additional {
            message.add_additional(record);
        }
        message
    }
}

/// BLAKE2b-256 hash of a lowercased TLD label.
fn blake2_tld_hash(tld: &str) -> [u8; 32] {
    use blake2::digest::{Digest, consts::U32};
    use blake2::Blake2b;
    let mut hasher = Blake2b::<U32>::new();
    hasher.update(tld.as_bytes());
    let digest = hasher.finalize();
    let mut out = [0u8; 32];
    out.copy_from_slice(&digest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blake2_hash_is_deterministic() {
        assert_eq!(blake2_tld_hash("example"), blake2_tld_hash("example"));
        assert_ne!(blake2_tld_hash("example"), blake2_tld_hash("other"));
    }
}
