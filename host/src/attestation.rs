//! RISC Zero behind the protocol's attestation and seal interfaces.

use alloy::primitives::B256;
use risc0_zkvm::{
    sha::{Digest, Digestible},
    Groth16Receipt, Groth16ReceiptVerifierParameters, InnerReceipt, MaybePruned, Receipt,
    ReceiptClaim,
};
use ror_core::{journal_digest, AttestationCheck, LocalReceipt, ProgramId};
use ror_verifier::{split_selector, ProofInvalid, SealVerifier, Selector, MOCK_SELECTOR};
use tracing::{debug, warn};

use crate::error::{HostError, Result};

pub fn image_digest(program_id: &ProgramId) -> Digest {
    Digest::from(*program_id.as_bytes())
}

/// Local proofs are bincode-encoded receipts.
pub fn local_receipt(receipt: &Receipt) -> Result<LocalReceipt> {
    Ok(LocalReceipt {
        journal: receipt.journal.bytes.clone(),
        proof: bincode::serialize(receipt)?,
    })
}

/// Checks a bincode receipt with the zkVM's own verifier.
#[derive(Clone, Copy, Debug, Default)]
pub struct Risc0Attestation;

impl AttestationCheck for Risc0Attestation {
    fn check(&self, proof: &[u8], program_id: &ProgramId, digest: &B256) -> bool {
        let receipt: Receipt = match bincode::deserialize(proof) {
            Ok(receipt) => receipt,
            Err(err) => {
                warn!("undecodable receipt: {err}");
                return false;
            }
        };
        if journal_digest(&receipt.journal.bytes) != *digest {
            warn!("receipt carries a different journal");
            return false;
        }
        match receipt.verify(image_digest(program_id)) {
            Ok(()) => true,
            Err(err) => {
                warn!(%program_id, "receipt verification failed: {err}");
                false
            }
        }
    }
}

/// Selector-prefixed seal for on-chain submission.
///
/// Fake receipts get the mock selector followed by their claim digest, which
/// is what the mock verifier accepts.
pub fn encode_seal(receipt: &Receipt) -> Result<Vec<u8>> {
    match &receipt.inner {
        InnerReceipt::Groth16(inner) => {
            let selector = &inner.verifier_parameters.as_bytes()[..4];
            Ok([selector, inner.seal.as_slice()].concat())
        }
        InnerReceipt::Fake(inner) => {
            let claim = inner.claim.digest();
            Ok([MOCK_SELECTOR.as_slice(), claim.as_bytes()].concat())
        }
        _ => Err(HostError::UnsupportedReceipt("STARK")),
    }
}

/// Verifies Groth16 seals the way the on-chain RISC Zero verifier does.
#[derive(Clone, Debug)]
pub struct Groth16SealVerifier {
    selector: Selector,
    parameters: Digest,
}

impl Groth16SealVerifier {
    pub fn selector(&self) -> Selector {
        self.selector
    }
}

impl Default for Groth16SealVerifier {
    fn default() -> Self {
        let parameters = Groth16ReceiptVerifierParameters::default().digest();
        let mut selector = [0u8; 4];
        selector.copy_from_slice(&parameters.as_bytes()[..4]);
        Self {
            selector,
            parameters,
        }
    }
}

impl SealVerifier for Groth16SealVerifier {
    fn verify(
        &self,
        seal: &[u8],
        image_id: &ProgramId,
        journal_digest: &B256,
    ) -> core::result::Result<(), ProofInvalid> {
        let (selector, raw) = split_selector(seal)?;
        if selector != self.selector {
            return Err(ProofInvalid(format!(
                "selector 0x{} is not the Groth16 verifier 0x{}",
                hex::encode(selector),
                hex::encode(self.selector)
            )));
        }

        let claim = ReceiptClaim::ok(
            image_digest(image_id),
            MaybePruned::Pruned(Digest::from(journal_digest.0)),
        );
        debug!(claim = %claim.digest(), "verifying groth16 seal");

        Groth16Receipt::new(raw.to_vec(), MaybePruned::Value(claim), self.parameters)
            .verify_integrity()
            .map_err(|e| ProofInvalid(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use risc0_zkvm::{ExitCode, FakeReceipt};
    use ror_core::{verify_local, BinaryImage, Journal};
    use ror_verifier::MockSealVerifier;

    use super::*;

    fn program() -> ProgramId {
        ProgramId::from([0xabcd_u32, 1, 2, 3, 4, 5, 6, 7])
    }

    fn fake_receipt(program_id: &ProgramId, journal: Vec<u8>) -> Receipt {
        let claim = ReceiptClaim::ok(image_digest(program_id), journal.clone());
        Receipt::new(InnerReceipt::Fake(FakeReceipt::new(claim)), journal)
    }

    fn journal() -> Vec<u8> {
        Journal {
            address: alloy::primitives::Address::repeat_byte(0x42),
            walks: 5,
            steps: 150,
            image: BinaryImage::new(),
        }
        .encode()
    }

    #[test]
    fn fake_receipt_seal_is_accepted_by_mock_verifier() {
        let receipt = fake_receipt(&program(), journal());
        let seal = encode_seal(&receipt).unwrap();

        let digest = journal_digest(&journal());
        assert!(MockSealVerifier::default().verify(&seal, &program(), &digest).is_ok());
        assert!(MockSealVerifier::default()
            .verify(&seal, &ProgramId::from([9u32; 8]), &digest)
            .is_err());
    }

    #[test]
    fn claim_digest_matches_zkvm() {
        let digest = journal_digest(&journal());
        let mut ours = ror_verifier::ReceiptClaim::ok(&program(), digest);
        let mut theirs = ReceiptClaim::ok(
            image_digest(&program()),
            MaybePruned::Pruned(Digest::from(digest.0)),
        );
        assert_eq!(ours.digest().as_slice(), theirs.digest().as_bytes());

        ours.exit_code = ExitCode::Paused(3);
        theirs.exit_code = ExitCode::Paused(3);
        assert_eq!(ours.digest().as_slice(), theirs.digest().as_bytes());
    }

    #[test]
    fn groth16_verifier_rejects_foreign_selector() {
        let verifier = Groth16SealVerifier::default();
        let seal = [MOCK_SELECTOR.as_slice(), [0u8; 256].as_slice()].concat();
        let err = verifier
            .verify(&seal, &program(), &journal_digest(&journal()))
            .unwrap_err();
        assert!(err.0.contains("selector"));
        assert_ne!(verifier.selector(), MOCK_SELECTOR);
    }

    #[test]
    fn undecodable_proof_fails_attestation() {
        let receipt = LocalReceipt {
            journal: journal(),
            proof: vec![1, 2, 3],
        };
        assert!(verify_local(&receipt, &program(), &Risc0Attestation).is_err());
    }

    #[test]
    fn local_receipt_keeps_journal_bytes() {
        let receipt = fake_receipt(&program(), journal());
        let local = local_receipt(&receipt).unwrap();
        assert_eq!(local.journal, journal());
        let back: Receipt = bincode::deserialize(&local.proof).unwrap();
        assert_eq!(back.journal.bytes, journal());
    }
}
