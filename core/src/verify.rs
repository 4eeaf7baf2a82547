//! Offline verification of locally produced receipts.
//!
//! The attested-computation runtime is reached only through [`Attestor`] and
//! [`AttestationCheck`], so this module never depends on a particular zkVM.

use alloc::vec::Vec;
use core::fmt;

use alloy_primitives::B256;
use thiserror::Error;

use crate::journal::{journal_digest, Journal, JournalError};

/// Identity of the guest program a proof must come from (the zkVM image ID).
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct ProgramId(pub B256);

impl ProgramId {
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0 .0
    }
}

/// Image IDs embedded by `risc0-build` are little-endian `u32` words.
impl From<[u32; 8]> for ProgramId {
    fn from(words: [u32; 8]) -> Self {
        let mut bytes = [0u8; 32];
        for (chunk, word) in bytes.chunks_exact_mut(4).zip(words) {
            chunk.copy_from_slice(&word.to_le_bytes());
        }
        Self(B256::from(bytes))
    }
}

impl From<[u8; 32]> for ProgramId {
    fn from(bytes: [u8; 32]) -> Self {
        Self(B256::from(bytes))
    }
}

impl fmt::Debug for ProgramId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ProgramId({})", self.0)
    }
}

impl fmt::Display for ProgramId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

/// Runs the attested computation.
pub trait Attestor {
    type Input: ?Sized;
    type Error;

    /// Returns `(journal, proof)`.
    fn produce(&self, input: &Self::Input) -> Result<(Vec<u8>, Vec<u8>), Self::Error>;
}

/// Authenticity check of an opaque proof against `(program_id, sha256(journal))`.
pub trait AttestationCheck {
    fn check(&self, proof: &[u8], program_id: &ProgramId, journal_digest: &B256) -> bool;
}

impl<T: AttestationCheck + ?Sized> AttestationCheck for &T {
    fn check(&self, proof: &[u8], program_id: &ProgramId, journal_digest: &B256) -> bool {
        (**self).check(proof, program_id, journal_digest)
    }
}

/// A locally verifiable proof bundle: the journal plus the proof binding it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LocalReceipt {
    pub journal: Vec<u8>,
    pub proof: Vec<u8>,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum VerifyError {
    #[error("receipt is not bound to program {expected}")]
    AuthenticityMismatch { expected: ProgramId },

    #[error(transparent)]
    MalformedJournal(#[from] JournalError),
}

/// Checks that `receipt` was produced by `expected` and decodes its journal.
pub fn verify_local<C: AttestationCheck>(
    receipt: &LocalReceipt,
    expected: &ProgramId,
    attestation: &C,
) -> Result<Journal, VerifyError> {
    let digest = journal_digest(&receipt.journal);
    if !attestation.check(&receipt.proof, expected, &digest) {
        return Err(VerifyError::AuthenticityMismatch {
            expected: *expected,
        });
    }
    Ok(Journal::decode(&receipt.journal)?)
}
