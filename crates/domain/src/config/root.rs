use std::fs;
use std::net::ToSocketAddrs;

use clap::Args;
use serde::{Deserialize, Serialize};

use super::dns::RootDnsConfig;
use super::keys::KeySourceConfig;
use super::logging::LoggingConfig;
use super::server::ServerConfig;
use crate::errors::ConfigError;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub dns: RootDnsConfig,
    #[serde(default)]
    pub keys: KeySourceConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// CLI flags that override whatever the TOML file says, applied after
/// parsing.
#[derive(Debug, Clone, Args, Default)]
pub struct CliOverrides {
    #[arg(long)]
    pub config: Option<String>,
    #[arg(long)]
    pub host: Option<String>,
    #[arg(long)]
    pub port: Option<u16>,
    #[arg(long)]
    pub public_host: Option<String>,
    #[arg(long)]
    pub no_sig0: bool,
    #[arg(long)]
    pub cache_size: Option<usize>,
    #[arg(long)]
    pub log_level: Option<String>,
}

impl Config {
    /// Loads the TOML file at `config_path` (falling back to defaults if
    /// `None`), then layers `overrides` on top.
    pub fn load(config_path: Option<&str>, overrides: CliOverrides) -> Result<Self, ConfigError> {
        let mut config = match config_path {
            Some(path) => {
                let text = fs::read_to_string(path).map_err(|e| ConfigError::ParseFailure {
                    path: path.to_string(),
                    reason: e.to_string(),
                })?;
                toml::from_str(&text).map_err(|e| ConfigError::ParseFailure {
                    path: path.to_string(),
                    reason: e.to_string(),
                })?
            }
            None => Config::default(),
        };

        config.apply_overrides(overrides);
        Ok(config)
    }

    fn apply_overrides(&mut self, overrides: CliOverrides) {
        if let Some(host) = overrides.host {
            self.server.host = host;
        }
        if let Some(port) = overrides.port {
            self.server.port = port;
        }
        if let Some(public_host) = overrides.public_host {
            self.server.public_host = public_host;
        }
        if overrides.no_sig0 {
            self.dns.no_sig0 = true;
        }
        if let Some(cache_size) = overrides.cache_size {
            self.dns.cache_size = cache_size;
        }
        if let Some(level) = overrides.log_level {
            self.logging.level = level;
        }
    }

    /// Sanity-checks the merged configuration before the server binds its
    /// sockets.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::BadPort(self.server.port.to_string()));
        }
        (self.server.host.as_str(), self.server.port)
            .to_socket_addrs()
            .map_err(|_| ConfigError::UnresolvableHost(self.server.host.clone()))?;

        if self.keys.ksk_path.is_empty() {
            return Err(ConfigError::BadKey {
                path: self.keys.ksk_path.clone(),
                reason: "ksk_path must not be empty".to_string(),
            });
        }
        if self.keys.zsk_path.is_empty() {
            return Err(ConfigError::BadKey {
                path: self.keys.zsk_path.clone(),
                reason: "zsk_path must not be empty".to_string(),
            });
        }

        Ok(())
    }
}
