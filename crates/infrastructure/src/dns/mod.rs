pub mod handler;
pub mod listener;

pub use handler::RootDnsHandler;
pub use listener::serve;
