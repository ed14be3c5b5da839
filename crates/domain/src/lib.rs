//! Rootward Domain Layer

pub mod compression;
pub mod config;
pub mod errors;
pub mod ip_pointer;
pub mod name_state;
pub mod record;
pub mod resource;
pub mod target;

pub use compression::CompressionTable;
pub use config::{CliOverrides, Config, KeySourceConfig, LoggingConfig, RootDnsConfig, ServerConfig};
pub use errors::{ConfigError, DecodeError, DomainError, NameError};
pub use ip_pointer::IpPointer;
pub use name_state::{AuctionState, NameState, NetworkParams, Outpoint};
pub use record::Record;
pub use resource::Resource;
pub use target::Target;
