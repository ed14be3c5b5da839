//! On-chain auction automaton. The DNS layer only ever reads
//! a [`NameState`] to decide whether a name has a servable [`crate::resource::Resource`];
//! the covenant transitions that drive `height`/`owner`/`value` forward are
//! produced upstream (outside this crate's scope) and simply replayed here.

use crate::resource::Resource;

/// Height-derived network parameters controlling auction timing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NetworkParams {
    pub tree_interval: u32,
    pub bidding_period: u32,
    pub reveal_period: u32,
    pub renewal_window: u32,
    pub transfer_lockup: u32,
    pub coinbase_maturity: u32,
}

impl NetworkParams {
    /// Mainnet-shaped defaults; concrete chains override via configuration.
    pub const fn mainnet() -> Self {
        Self {
            tree_interval: 36,
            bidding_period: 5 * 36,
            reveal_period: 10 * 36,
            renewal_window: 2 * 365 * 144,
            transfer_lockup: 48,
            coinbase_maturity: 100,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AuctionState {
    Opening,
    Bidding,
    Reveal,
    Closed,
    Expired,
    Revoked,
}

/// A name's auction record as stored on-chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameState {
    pub name_hash: [u8; 32],
    /// Block height at which the auction opened.
    pub height: u32,
    pub owner: Outpoint,
    pub value: u64,
    pub highest: u64,
    pub claimed: u64,
    pub renewals: u32,
    pub weak: bool,
    pub revoked: bool,
    /// Opaque bytes, decoded as a [`Resource`] only once the state is
    /// `CLOSED` and this is non-empty.
    pub data: Vec<u8>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Outpoint {
    pub txid: [u8; 32],
    pub index: u32,
}

impl NameState {
    /// Derives the auction phase at `height` under `params`.
    /// `REVOKED` is terminal until the name expires, taking priority over
    /// whatever the height-derived phase would otherwise be.
    pub fn state_at(&self, height: u32, params: &NetworkParams) -> AuctionState {
        let s = self.height;
        let bidding_start = s.saturating_add(params.tree_interval);
        let reveal_start = bidding_start.saturating_add(params.bidding_period);
        let closed_start = reveal_start.saturating_add(params.reveal_period);
        let expired_start = s.saturating_add(params.renewal_window);

        if self.revoked && height < expired_start {
            return AuctionState::Revoked;
        }
        if height < bidding_start {
            AuctionState::Opening
        } else if height < reveal_start {
            AuctionState::Bidding
        } else if height < closed_start {
            AuctionState::Reveal
        } else if height < expired_start {
            AuctionState::Closed
        } else {
            AuctionState::Expired
        }
    }

    /// Whether this state currently offers a servable [`Resource`]: closed,
    /// not revoked, and carrying non-empty `data`.
    pub fn is_servable(&self, height: u32, params: &NetworkParams) -> bool {
        self.state_at(height, params) == AuctionState::Closed && !self.data.is_empty()
    }

    /// Decodes `data` into a [`Resource`], returning `None` if the state is
    /// not currently servable. Decode failures are surfaced to the caller so
    /// they can be logged and folded into NXDOMAIN.
    pub fn resource(
        &self,
        height: u32,
        params: &NetworkParams,
    ) -> Option<Result<Resource, crate::errors::DecodeError>> {
        if !self.is_servable(height, params) {
            return None;
        }
        Some(Resource::decode(&self.data))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state(height: u32, data: Vec<u8>) -> NameState {
        NameState {
            name_hash: [0u8; 32],
            height,
            owner: Outpoint {
                txid: [0u8; 32],
                index: 0,
            },
            value: 0,
            highest: 0,
            claimed: 0,
            renewals: 0,
            weak: false,
            revoked: false,
            data,
        }
    }

    #[test]
    fn walks_through_lifecycle() {
        let params = NetworkParams::mainnet();
        let ns = state(0, vec![]);

        assert_eq!(ns.state_at(0, &params), AuctionState::Opening);
        assert_eq!(
            ns.state_at(params.tree_interval, &params),
            AuctionState::Bidding
        );
        assert_eq!(
            ns.state_at(params.tree_interval + params.bidding_period, &params),
            AuctionState::Reveal
        );
        let closed_at = params.tree_interval + params.bidding_period + params.reveal_period;
        assert_eq!(ns.state_at(closed_at, &params), AuctionState::Closed);
        assert_eq!(
            ns.state_at(params.renewal_window, &params),
            AuctionState::Expired
        );
    }

    #[test]
    fn revoked_overrides_height_until_expiry() {
        let params = NetworkParams::mainnet();
        let mut ns = state(0, vec![]);
        ns.revoked = true;
        let closed_at = params.tree_interval + params.bidding_period + params.reveal_period;
        assert_eq!(ns.state_at(closed_at, &params), AuctionState::Revoked);
        assert_eq!(
            ns.state_at(params.renewal_window, &params),
            AuctionState::Expired
        );
    }

    #[test]
    fn closed_with_empty_data_is_not_servable() {
        let params = NetworkParams::mainnet();
        let closed_at = params.tree_interval + params.bidding_period + params.reveal_period;
        let ns = state(0, vec![]);
        assert!(!ns.is_servable(closed_at, &params));
    }

    #[test]
    fn closed_with_data_decodes_resource() {
        let params = NetworkParams::mainnet();
        let resource = Resource::build(64, vec![], vec![]).unwrap();
        let closed_at = params.tree_interval + params.bidding_period + params.reveal_period;
        let ns = state(0, resource.encode().unwrap());
        assert!(ns.is_servable(closed_at, &params));
        let decoded = ns.resource(closed_at, &params).unwrap().unwrap();
        assert_eq!(decoded, resource);
    }

    #[test]
    fn bidding_state_is_not_servable() {
        let params = NetworkParams::mainnet();
        let resource = Resource::build(64, vec![], vec![]).unwrap();
        let ns = state(0, resource.encode().unwrap());
        assert!(!ns.is_servable(params.tree_interval, &params));
        assert!(ns.resource(params.tree_interval, &params).is_none());
    }
}
