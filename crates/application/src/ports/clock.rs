use chrono::{DateTime, Utc};

/// Injected time source, so SOA serial generation and
/// RRSIG inception/expiration windows are deterministic in tests.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;

    /// Current chain tip height, used to derive [`rootward_domain::AuctionState`].
    fn height(&self) -> u32;
}

/// `Clock` backed by the system clock, for production wiring.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock {
    pub height: u32,
}

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }

    fn height(&self) -> u32 {
        self.height
    }
}
