use std::path::Path;
use std::sync::Arc;

use rootward_application::Signer;
use rootward_domain::KeySourceConfig;
use rootward_infrastructure::Ed25519Signer;
use tracing::info;

/// Loads the KSK/ZSK seed files named by `config` and builds the zone's
/// signer.
pub fn load_signer(config: &KeySourceConfig) -> anyhow::Result<Arc<dyn Signer>> {
    let signer = Ed25519Signer::load(
        Path::new(&config.ksk_path),
        Path::new(&config.zsk_path),
    )?;
    info!(
        ksk_path = %config.ksk_path,
        zsk_path = %config.zsk_path,
        algorithm = %config.algorithm,
        "zone signing keys loaded"
    );
    Ok(Arc::new(signer))
}
