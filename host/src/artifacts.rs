//! Files written next to the rendered image: `<name>.proof` (bincode receipt),
//! `<name>.journal` (raw journal) and `<name>.groth16` (selector-prefixed seal).

use std::{
    fs,
    path::{Path, PathBuf},
};

use ror_core::LocalReceipt;
use tracing::info;

use crate::error::Result;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Artifacts {
    base: PathBuf,
}

impl Artifacts {
    pub fn new(output: &Path) -> Self {
        Self {
            base: output.to_path_buf(),
        }
    }

    pub fn proof_path(&self) -> PathBuf {
        self.base.with_extension("proof")
    }

    pub fn journal_path(&self) -> PathBuf {
        self.base.with_extension("journal")
    }

    pub fn seal_path(&self) -> PathBuf {
        self.base.with_extension("groth16")
    }

    pub fn write_receipt(&self, receipt: &LocalReceipt) -> Result<()> {
        write(&self.proof_path(), &receipt.proof)?;
        write(&self.journal_path(), &receipt.journal)
    }

    pub fn write_seal(&self, seal: &[u8]) -> Result<()> {
        write(&self.seal_path(), seal)
    }
}

fn write(path: &Path, bytes: &[u8]) -> Result<()> {
    fs::write(path, bytes)?;
    info!("Saved {} ({} bytes)", path.display(), bytes.len());
    Ok(())
}

/// Reads a `.proof` file; the journal travels inside the receipt.
pub fn read_receipt(path: &Path) -> Result<LocalReceipt> {
    let proof = fs::read(path)?;
    let receipt: risc0_zkvm::Receipt = bincode::deserialize(&proof)?;
    Ok(LocalReceipt {
        journal: receipt.journal.bytes,
        proof,
    })
}
