//! Configuration module
//!
//! Organized by concern:
//! - `server`: listener binding and the publicly advertised apex host.
//! - `dns`: root-zone cache sizing, blacklist, reserved-table path.
//! - `keys`: DNSSEC key material locations and algorithm.
//! - `logging`: tracing level/format.
//! - `root`: the composed `Config` plus `CliOverrides` and load/validate.

pub mod dns;
pub mod keys;
pub mod logging;
pub mod root;
pub mod server;

pub use dns::RootDnsConfig;
pub use keys::KeySourceConfig;
pub use logging::LoggingConfig;
pub use root::{CliOverrides, Config};
pub use server::ServerConfig;
