pub mod nsec;
pub mod resource_to_dns;
pub mod root_server;
pub mod root_zone;
pub mod rrsig;

pub use nsec::NsecSynthesizer;
pub use resource_to_dns::{ResourceToDns, Translation};
pub use root_server::{Middleware, RootServer};
pub use root_zone::RootZone;
