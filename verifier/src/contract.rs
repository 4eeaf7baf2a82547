//! The on-chain verifier as a state machine.
//!
//! `&mut self` stands in for the chain's transaction boundary: every check runs
//! before the first write, so a failed call never leaves partial state behind.

use std::collections::HashMap;

use alloy_primitives::{Address, B256};
use alloy_sol_types::{SolInterface, SolValue};
use ror_core::{journal_digest, Journal, JournalError, ProgramId};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::{
    interface::{IRorschachVerifierCalls, ImageVerified},
    seal::{ProofInvalid, SealVerifier},
};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ContractError {
    #[error(transparent)]
    ProofInvalid(#[from] ProofInvalid),

    /// The seal bound these exact bytes, so this is a producer/verifier codec
    /// mismatch rather than attacker input.
    #[error(transparent)]
    MalformedJournal(#[from] JournalError),

    #[error("invalid calldata: {0}")]
    InvalidCalldata(String),
}

pub struct RorschachVerifier<V> {
    image_id: ProgramId,
    seal_verifier: V,
    verified_images: HashMap<B256, bool>,
    address_images: HashMap<Address, Vec<B256>>,
    events: Vec<ImageVerified>,
}

impl<V: SealVerifier> RorschachVerifier<V> {
    /// Deploys a verifier trusting only proofs of `image_id`.
    pub fn new(image_id: ProgramId, seal_verifier: V) -> Self {
        Self {
            image_id,
            seal_verifier,
            verified_images: HashMap::new(),
            address_images: HashMap::new(),
            events: Vec::new(),
        }
    }

    pub fn image_id(&self) -> ProgramId {
        self.image_id
    }

    /// Records the image proven by `seal` over `journal`.
    ///
    /// Re-verifying a known image succeeds again, appends the hash to the
    /// address list again and emits another event. Callers that need
    /// uniqueness check [`Self::is_verified`] first.
    pub fn verify_image(&mut self, seal: &[u8], journal: &[u8]) -> Result<bool, ContractError> {
        let decoded = self.authenticate(seal, journal)?;
        let image_hash = decoded.image_hash();

        if self.is_verified(&image_hash) {
            debug!(%image_hash, "image already verified");
        }
        self.verified_images.insert(image_hash, true);
        self.address_images
            .entry(decoded.address)
            .or_default()
            .push(image_hash);

        info!(
            %image_hash,
            address = %decoded.address,
            walks = decoded.walks,
            steps = decoded.steps,
            "image verified"
        );
        self.events.push(ImageVerified {
            imageHash: image_hash,
            ethAddress: decoded.address,
            walks: decoded.walks,
            steps: decoded.steps,
        });

        Ok(true)
    }

    pub fn is_verified(&self, image_hash: &B256) -> bool {
        self.verified_images.get(image_hash).copied().unwrap_or(false)
    }

    pub fn get_address_images(&self, address: &Address) -> &[B256] {
        self.address_images
            .get(address)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Whether the proof's address is `claimed`. Never touches storage.
    pub fn verify_ownership(
        &self,
        seal: &[u8],
        journal: &[u8],
        claimed: Address,
    ) -> Result<bool, ContractError> {
        let decoded = self.authenticate(seal, journal)?;
        Ok(decoded.address == claimed)
    }

    /// Events emitted so far, oldest first.
    pub fn events(&self) -> &[ImageVerified] {
        &self.events
    }

    /// Executes ABI `calldata` and returns the ABI-encoded return data.
    pub fn dispatch(&mut self, calldata: &[u8]) -> Result<Vec<u8>, ContractError> {
        let call = IRorschachVerifierCalls::abi_decode(calldata)
            .map_err(|e| ContractError::InvalidCalldata(e.to_string()))?;

        let output = match call {
            IRorschachVerifierCalls::verifyImage(call) => {
                self.verify_image(&call.seal, &call.journal)?.abi_encode()
            }
            IRorschachVerifierCalls::isVerified(call) => {
                self.is_verified(&call.imageHash).abi_encode()
            }
            IRorschachVerifierCalls::getAddressImages(call) => {
                self.get_address_images(&call.ethAddress).to_vec().abi_encode()
            }
            IRorschachVerifierCalls::verifyOwnership(call) => self
                .verify_ownership(&call.seal, &call.journal, call.claimed)?
                .abi_encode(),
            IRorschachVerifierCalls::imageId(_) => self.image_id.0.abi_encode(),
        };
        Ok(output)
    }

    fn authenticate(&self, seal: &[u8], journal: &[u8]) -> Result<Journal, ContractError> {
        let digest = journal_digest(journal);
        if let Err(err) = self.seal_verifier.verify(seal, &self.image_id, &digest) {
            warn!(%digest, image_id = %self.image_id, "seal rejected: {err}");
            return Err(err.into());
        }
        Ok(Journal::decode(journal)?)
    }
}
