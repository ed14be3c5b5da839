//! Root zone apex handling: SOA, NS, DNSKEY, DS, and the
//! dynamic ICANN fallback decision.

use std::str::FromStr;
use std::sync::Arc;

use hickory_proto::op::Message;
use hickory_proto::rr::rdata::{DNSKEY, DS};
use hickory_proto::rr::{Name, RData, Record as HickoryRecord};
use tracing::{debug, instrument};

use rootward_domain::ip_pointer::IpPointer;

use crate::ports::{IcannFallback, KeyRole, ReservedTable, Signer};

pub struct RootZone {
    public_host: std::net::IpAddr,
    signer: Arc<dyn Signer>,
    reserved: Arc<dyn ReservedTable>,
    icann: Arc<dyn IcannFallback>,
}

impl RootZone {
    pub fn new(
        public_host: std::net::IpAddr,
        signer: Arc<dyn Signer>,
        reserved: Arc<dyn ReservedTable>,
        icann: Arc<dyn IcannFallback>,
    ) -> Self {
        Self {
            public_host,
            signer,
            reserved,
            icann,
        }
    }

    /// SOA record for `.`, serial derived from `serial_date` as `YYYYMMDDHH`.
    pub fn soa(&self, serial_date: chrono::DateTime<chrono::Utc>) -> HickoryRecord {
        let serial: u32 = serial_date
            .format("%Y%m%d%H")
            .to_string()
            .parse()
            .unwrap_or(1);
        let root = Name::root();
        let mname = Name::from_str("ns.").unwrap_or_else(|_| root.clone());
        let rname = Name::from_str("hostmaster.").unwrap_or_else(|_| root.clone());
        HickoryRecord::from_rdata(
            root,
            86400,
            RData::SOA(hickory_proto::rr::rdata::SOA::new(
                mname, rname, serial, 1800, 900, 604800, 86400,
            )),
        )
    }

    /// The apex NS record: a single pointer at `_<base32hex(publicIP)>._synth.`
    /// with matching glue.
    pub fn apex_ns(&self) -> (HickoryRecord, HickoryRecord) {
        let pointer = IpPointer::new(self.public_host);
        let synth_name = Name::from_str(&format!("{}._synth.", pointer.to_label()))
            .unwrap_or_else(|_| Name::root());

        let ns = HickoryRecord::from_rdata(
            Name::root(),
            86400,
            RData::NS(hickory_proto::rr::rdata::NS(synth_name.clone())),
        );
        let glue = match self.public_host {
            std::net::IpAddr::V4(v4) => HickoryRecord::from_rdata(
                synth_name,
                86400,
                RData::A(hickory_proto::rr::rdata::A(v4)),
            ),
            std::net::IpAddr::V6(v6) => HickoryRecord::from_rdata(
                synth_name,
                86400,
                RData::AAAA(hickory_proto::rr::rdata::AAAA(v6)),
            ),
        };
        (ns, glue)
    }

    /// Both zone keys as DNSKEY records.
    pub fn dnskeys(&self) -> Vec<HickoryRecord> {
        [KeyRole::KeySigningKey, KeyRole::ZoneSigningKey]
            .into_iter()
            .map(|role| {
                let key = self.signer.public_key(role);
                let is_ksk = matches!(role, KeyRole::KeySigningKey);
                HickoryRecord::from_rdata(
                    Name::root(),
                    86400,
                    RData::DNSKEY(DNSKEY::new(
                        true,
                        is_ksk,
                        key.algorithm.into(),
                        key.public_key.clone(),
                    )),
                )
            })
            .collect()
    }

    /// The apex DS record: SHA-256 digest of the KSK.
    pub fn apex_ds(&self) -> HickoryRecord {
        let key = self.signer.public_key(KeyRole::KeySigningKey);
        HickoryRecord::from_rdata(
            Name::root(),
            86400,
            RData::DS(DS::new(
                key.key_tag,
                key.algorithm.into(),
                hickory_proto::rr::dnssec::DigestType::SHA256,
                self.signer.ds_digest().to_vec(),
            )),
        )
    }

    /// If `tld` has no on-chain claim but is listed as `root=true` in the
    /// reserved table, forward the query to the built-in ICANN stub.
    #[instrument(skip(self, query))]
    pub async fn dynamic_fallback(&self, tld: &str, query: &Message) -> Option<Message> {
        let entry = self.reserved.lookup(tld)?;
        if !entry.root {
            return None;
        }
        match self.icann.forward(query).await {
            Ok(mut response) => {
                response.set_authentic_data(false);
                response.take_queries();
                Some(response)
            }
            Err(err) => {
                debug!(%tld, error = %err, "icann fallback failed");
                None
            }
        }
    }
}
