use rootward_domain::{CliOverrides, Config};
use tracing::info;

pub fn load_config(
    config_path: Option<&str>,
    cli_overrides: CliOverrides,
) -> anyhow::Result<Config> {
    let config = Config::load(config_path, cli_overrides)?;
    config.validate()?;

    info!(
        config_file = config_path.unwrap_or("default"),
        host = %config.server.host,
        port = config.server.port,
        public_host = %config.server.public_host,
        "configuration loaded"
    );

    Ok(config)
}
