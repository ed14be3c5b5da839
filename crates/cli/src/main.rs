//! Rootward root DNS server entry point.

mod bootstrap;
mod di;
mod server;

use clap::Parser;
use rootward_domain::CliOverrides;

#[derive(Parser)]
#[command(name = "rootward")]
#[command(version)]
#[command(about = "Authoritative root DNS server for a blockchain-backed name tree")]
struct Cli {
    #[command(flatten)]
    overrides: CliOverrides,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config_path = cli.overrides.config.clone();

    let config = bootstrap::load_config(config_path.as_deref(), cli.overrides)?;
    bootstrap::init_logging(&config);

    tracing::info!("rootward starting");

    let root_server = di::build_root_server(&config)?;
    let bind_addr = format!("{}:{}", config.server.host, config.server.port).parse()?;

    server::start_dns_server(bind_addr, root_server).await
}
