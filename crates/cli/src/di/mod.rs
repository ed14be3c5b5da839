pub mod services;

pub use services::build_root_server;
