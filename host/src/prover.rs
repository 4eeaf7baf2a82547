use risc0_zkvm::{default_prover, is_dev_mode, ExecutorEnv, ProverOpts, Receipt};
use ror_core::{Attestor, PrivateKey, ProgramId};
use methods::{GUEST_ELF, GUEST_ID};
use tracing::{info, warn};

use crate::{
    attestation::local_receipt,
    error::{HostError, Result},
};

pub fn guest_program_id() -> ProgramId {
    ProgramId::from(GUEST_ID)
}

/// Fails unless the operator opted into dev mode when `RISC0_DEV_MODE` is set.
pub fn ensure_dev_mode_allowed(allowed: bool) -> Result<()> {
    if is_dev_mode() {
        if !allowed {
            return Err(HostError::DevModeRefused);
        }
        warn!("RISC0_DEV_MODE is set: receipts are fake and prove nothing");
    }
    Ok(())
}

/// Runs the guest on the local prover, or on Bonsai when `BONSAI_API_KEY` is set.
#[derive(Clone, Debug)]
pub struct Risc0Prover {
    opts: ProverOpts,
}

impl Risc0Prover {
    /// STARK receipts, verifiable offline only.
    pub fn succinct() -> Self {
        Self {
            opts: ProverOpts::succinct(),
        }
    }

    /// Groth16 receipts whose seal can be checked on-chain.
    pub fn groth16() -> Self {
        Self {
            opts: ProverOpts::groth16(),
        }
    }

    pub fn prove(&self, key: &PrivateKey) -> Result<Receipt> {
        info!("Generating ZK proof... (this may take a while)");

        let env = ExecutorEnv::builder().write(key.as_bytes())?.build()?;
        let prove_info = default_prover().prove_with_opts(env, GUEST_ELF, &self.opts)?;
        info!(
            cycles = prove_info.stats.total_cycles,
            segments = prove_info.stats.segments,
            "proof generated"
        );

        Ok(prove_info.receipt)
    }
}

impl Attestor for Risc0Prover {
    type Input = PrivateKey;
    type Error = HostError;

    fn produce(&self, key: &PrivateKey) -> Result<(Vec<u8>, Vec<u8>)> {
        let local = local_receipt(&self.prove(key)?)?;
        Ok((local.journal, local.proof))
    }
}
