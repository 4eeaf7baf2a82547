#![cfg_attr(not(feature = "std"), no_std)]

//! Shared protocol types for the Rorschach proof-of-key.
//!
//! Everything here runs both inside the zkVM guest and on the host, so the
//! crate stays `no_std` compatible and free of logging.

extern crate alloc;

pub mod generate;
pub mod identity;
pub mod image;
pub mod journal;
pub mod verify;

pub use generate::{generate_rorschach, GenerationParameters};
pub use identity::{IdentityError, PrivateKey};
pub use image::{BinaryImage, HEIGHT, IMAGE_BYTES, WIDTH};
pub use journal::{decode, encode, image_hash, journal_digest, Journal, JournalError};
pub use verify::{verify_local, AttestationCheck, Attestor, LocalReceipt, ProgramId, VerifyError};

pub use alloy_primitives::{Address, B256};
