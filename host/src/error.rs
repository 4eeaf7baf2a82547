use ror_core::{IdentityError, VerifyError};
use ror_verifier::ContractError;
use thiserror::Error as ThisError;

#[derive(ThisError, Debug)]
pub enum HostError {
    #[error("io: {0}")]
    Io(#[from] std::io::Error),

    #[error("bincode: {0}")]
    Bincode(#[from] bincode::Error),

    #[error(transparent)]
    Prover(#[from] anyhow::Error),

    #[error(transparent)]
    Identity(#[from] IdentityError),

    #[error(transparent)]
    Verify(#[from] VerifyError),

    #[error(transparent)]
    Contract(#[from] ContractError),

    #[error("image: {0}")]
    Image(#[from] image::ImageError),

    #[error("invalid private key: {0}")]
    InvalidKey(String),

    #[error("RISC0_DEV_MODE is set; pass --dev-mode to accept fake receipts")]
    DevModeRefused,

    #[error("cannot build a seal from a {0} receipt; prove with --groth16")]
    UnsupportedReceipt(&'static str),

    #[cfg(feature = "bonsai")]
    #[error("bonsai: {0}")]
    Bonsai(#[from] bonsai_sdk::SdkErr),

    #[cfg(feature = "bonsai")]
    #[error("remote proving failed: {0}")]
    Remote(String),
}

pub type Result<T, E = HostError> = core::result::Result<T, E>;
