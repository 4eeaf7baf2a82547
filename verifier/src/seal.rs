//! Succinct seal verification.
//!
//! Seals are prefixed with a 4-byte selector naming the verifier that can check
//! them. The cryptographic check itself is external; this module only routes
//! and provides the dev-mode mock verifier.

use alloy_primitives::B256;
use ror_core::{AttestationCheck, ProgramId};
use thiserror::Error;

use crate::claim::ReceiptClaim;

pub type Selector = [u8; 4];

/// Selector of seals produced for fake (dev-mode) receipts.
pub const MOCK_SELECTOR: Selector = [0xff; 4];

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("proof invalid: {0}")]
pub struct ProofInvalid(pub String);

/// Checks that `seal` attests to exactly `(image_id, journal_digest)`.
pub trait SealVerifier {
    fn verify(&self, seal: &[u8], image_id: &ProgramId, journal_digest: &B256)
        -> Result<(), ProofInvalid>;
}

impl<T: SealVerifier + ?Sized> SealVerifier for Box<T> {
    fn verify(
        &self,
        seal: &[u8],
        image_id: &ProgramId,
        journal_digest: &B256,
    ) -> Result<(), ProofInvalid> {
        (**self).verify(seal, image_id, journal_digest)
    }
}

pub fn split_selector(seal: &[u8]) -> Result<(Selector, &[u8]), ProofInvalid> {
    if seal.len() < 4 {
        return Err(ProofInvalid(format!("seal of {} bytes has no selector", seal.len())));
    }
    let (selector, rest) = seal.split_at(4);
    let mut out = [0u8; 4];
    out.copy_from_slice(selector);
    Ok((out, rest))
}

/// Accepts `selector || claim_digest`: the seal of a fake receipt.
///
/// Provides no security whatsoever. Only for development and tests.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MockSealVerifier {
    selector: Selector,
}

impl MockSealVerifier {
    pub fn new(selector: Selector) -> Self {
        Self { selector }
    }

    pub fn selector(&self) -> Selector {
        self.selector
    }

    /// Builds the seal this verifier accepts for `(image_id, journal_digest)`.
    pub fn mock_prove(&self, image_id: &ProgramId, journal_digest: &B256) -> Vec<u8> {
        let claim = ReceiptClaim::ok(image_id, *journal_digest).digest();
        [self.selector.as_slice(), claim.as_slice()].concat()
    }
}

impl Default for MockSealVerifier {
    fn default() -> Self {
        Self::new(MOCK_SELECTOR)
    }
}

impl SealVerifier for MockSealVerifier {
    fn verify(
        &self,
        seal: &[u8],
        image_id: &ProgramId,
        journal_digest: &B256,
    ) -> Result<(), ProofInvalid> {
        let (selector, claim) = split_selector(seal)?;
        if selector != self.selector {
            return Err(ProofInvalid(format!(
                "unexpected selector 0x{}",
                alloy_primitives::hex::encode(selector)
            )));
        }
        let expected = ReceiptClaim::ok(image_id, *journal_digest).digest();
        if claim != expected.as_slice() {
            return Err(ProofInvalid("claim digest mismatch".into()));
        }
        Ok(())
    }
}

impl AttestationCheck for MockSealVerifier {
    fn check(&self, proof: &[u8], program_id: &ProgramId, journal_digest: &B256) -> bool {
        self.verify(proof, program_id, journal_digest).is_ok()
    }
}

/// Dispatches a seal to the verifier registered for its selector.
#[derive(Default)]
pub struct VerifierRouter {
    routes: Vec<(Selector, Box<dyn SealVerifier + Send + Sync>)>,
}

impl VerifierRouter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `verifier` for `selector`, replacing any previous route.
    pub fn with_route(
        mut self,
        selector: Selector,
        verifier: impl SealVerifier + Send + Sync + 'static,
    ) -> Self {
        self.routes.retain(|(s, _)| *s != selector);
        self.routes.push((selector, Box::new(verifier)));
        self
    }

    pub fn selectors(&self) -> impl Iterator<Item = &Selector> {
        self.routes.iter().map(|(s, _)| s)
    }
}

impl SealVerifier for VerifierRouter {
    fn verify(
        &self,
        seal: &[u8],
        image_id: &ProgramId,
        journal_digest: &B256,
    ) -> Result<(), ProofInvalid> {
        let (selector, _) = split_selector(seal)?;
        let (_, verifier) = self
            .routes
            .iter()
            .find(|(s, _)| *s == selector)
            .ok_or_else(|| {
                ProofInvalid(format!(
                    "no verifier for selector 0x{}",
                    alloy_primitives::hex::encode(selector)
                ))
            })?;
        verifier.verify(seal, image_id, journal_digest)
    }
}
