pub mod config;
pub mod keys;
pub mod logging;

pub use config::load_config;
pub use keys::load_signer;
pub use logging::init_logging;
