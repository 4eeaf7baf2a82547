//! The journal: public values the guest commits to.
//!
//! Wire format is Solidity ABI parameter encoding of
//! `(address ethAddress, uint64 walks, uint64 steps, bytes image)`, identical to
//! `abi.encode(ethAddress, walks, steps, image)` on-chain:
//!
//! ```text
//! 0x000  address (left padded)
//! 0x020  walks   (left padded)
//! 0x040  steps   (left padded)
//! 0x060  offset of image = 0x80
//! 0x080  image length = 256
//! 0x0a0  image bytes (256, already word aligned)
//! ```
//!
//! Every length is a full 32-byte word, so the layout never depends on the
//! magnitude of the image length.

use alloc::{
    string::{String, ToString},
    vec::Vec,
};

use alloy_primitives::{keccak256, Address, B256};
use alloy_sol_types::{sol_data, SolType};
use sha2::{Digest as _, Sha256};
use thiserror::Error;

use crate::image::{BinaryImage, IMAGE_BYTES};

type JournalAbi = (
    sol_data::Address,
    sol_data::Uint<64>,
    sol_data::Uint<64>,
    sol_data::Bytes,
);

/// Size in bytes of a well-formed encoded journal.
pub const JOURNAL_BYTES: usize = 5 * 32 + IMAGE_BYTES;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum JournalError {
    #[error("invalid image length: expected {expected} bytes, got {actual}")]
    InvalidImageLength { expected: usize, actual: usize },

    #[error("malformed journal: {0}")]
    MalformedJournal(String),
}

/// Decoded public outputs of one proof.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Journal {
    pub address: Address,
    pub walks: u64,
    pub steps: u64,
    pub image: BinaryImage,
}

impl Journal {
    pub fn encode(&self) -> Vec<u8> {
        JournalAbi::abi_encode_params(&(
            self.address,
            self.walks,
            self.steps,
            self.image.as_bytes().to_vec(),
        ))
    }

    pub fn decode(bytes: &[u8]) -> Result<Self, JournalError> {
        let (address, walks, steps, image) = JournalAbi::abi_decode_params(bytes)
            .map_err(|e| JournalError::MalformedJournal(e.to_string()))?;

        let journal = Self {
            address,
            walks,
            steps,
            image: BinaryImage::from_bytes(&image)?,
        };

        // Reject trailing data, dirty padding and odd offsets: the proof binds
        // exact bytes, so only the canonical encoding is accepted.
        if journal.encode() != bytes {
            return Err(JournalError::MalformedJournal(
                "non-canonical journal encoding".into(),
            ));
        }

        Ok(journal)
    }

    /// SHA-256 of the encoded journal, the digest a receipt claim binds.
    pub fn digest(&self) -> B256 {
        journal_digest(&self.encode())
    }

    pub fn image_hash(&self) -> B256 {
        image_hash(&self.image)
    }
}

/// Encodes raw journal fields, refusing images that are not exactly 256 bytes.
pub fn encode(
    address: Address,
    walks: u64,
    steps: u64,
    image: &[u8],
) -> Result<Vec<u8>, JournalError> {
    let image = BinaryImage::from_bytes(image)?;
    Ok(Journal {
        address,
        walks,
        steps,
        image,
    }
    .encode())
}

pub fn decode(bytes: &[u8]) -> Result<Journal, JournalError> {
    Journal::decode(bytes)
}

pub fn journal_digest(journal: &[u8]) -> B256 {
    B256::from_slice(&Sha256::digest(journal))
}

/// Ledger key of an image: `keccak256(imageBytes)`.
pub fn image_hash(image: &BinaryImage) -> B256 {
    keccak256(image.as_bytes())
}
