pub mod signer;

pub use signer::Ed25519Signer;
