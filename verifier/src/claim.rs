//! Receipt claim digests in the RISC Zero tagged-struct scheme.
//!
//! A seal never commits to a journal directly: it proves a claim whose digest
//! folds in the image ID and `sha256(journal)`. This is the value a mock seal
//! carries and the value a Groth16 seal is checked against.

use alloy_primitives::B256;
use risc0_binfmt::{tagged_struct, Digestible, ExitCode, SystemState};
use risc0_zkp::core::{digest::Digest, hash::sha::Impl};
use ror_core::ProgramId;

fn to_digest(value: &B256) -> Digest {
    Digest::from(value.0)
}

/// Committed journal and assumptions of an execution.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Output {
    pub journal_digest: B256,
    pub assumptions_digest: B256,
}

impl Output {
    fn tagged_digest(&self) -> Digest {
        tagged_struct::<Impl>(
            "risc0.Output",
            &[to_digest(&self.journal_digest), to_digest(&self.assumptions_digest)],
            &[],
        )
    }
}

#[derive(Clone, Debug)]
pub struct ReceiptClaim {
    pub pre_state_digest: B256,
    pub post: SystemState,
    pub exit_code: ExitCode,
    pub input: B256,
    pub output: Output,
}

impl ReceiptClaim {
    /// Claim of an unconditional execution of `image_id` that ended in
    /// `Halted(0)` and committed a journal with the given digest.
    pub fn ok(image_id: &ProgramId, journal_digest: B256) -> Self {
        Self {
            pre_state_digest: image_id.0,
            post: SystemState {
                pc: 0,
                merkle_root: Digest::ZERO,
            },
            exit_code: ExitCode::Halted(0),
            input: B256::ZERO,
            output: Output {
                journal_digest,
                assumptions_digest: B256::ZERO,
            },
        }
    }

    pub fn digest(&self) -> B256 {
        let (sys_exit, user_exit) = self.exit_code.into_pair();
        let digest = tagged_struct::<Impl>(
            "risc0.ReceiptClaim",
            &[
                to_digest(&self.input),
                to_digest(&self.pre_state_digest),
                self.post.digest::<Impl>(),
                self.output.tagged_digest(),
            ],
            &[sys_exit, user_exit],
        );
        B256::from_slice(digest.as_bytes())
    }
}
