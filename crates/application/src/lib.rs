//! Rootward Application Layer
//!
//! Ports describe what the root server needs from the outside world
//! (the chain's name tree, zone keys, the response cache, ...); services
//! implement the translation and dispatch logic against those ports.

pub mod ports;
pub mod services;

pub use ports::{
    Clock, IcannFallback, IcannFallbackError, KeyRole, PublicKey, ReservedEntry, ReservedTable,
    ResponseCache, Signer, SystemClock, TreeLookup, TreeLookupError,
};
pub use services::{Middleware, NsecSynthesizer, ResourceToDns, RootServer, RootZone, Translation};
