pub mod clock;
pub mod icann_fallback;
pub mod reserved_table;
pub mod response_cache;
pub mod signer;
pub mod tree_lookup;

pub use clock::{Clock, SystemClock};
pub use icann_fallback::{IcannFallback, IcannFallbackError};
pub use reserved_table::{ReservedEntry, ReservedTable};
pub use response_cache::{BorrowedKey, CacheKey, ResponseCache};
pub use signer::{KeyRole, PublicKey, Signer};
pub use tree_lookup::{TreeLookup, TreeLookupError};
