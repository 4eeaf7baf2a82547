//! Verifier side of the Rorschach proof-of-key: the image registry contract,
//! RISC Zero claim digests and seal routing.

pub mod claim;
pub mod contract;
pub mod interface;
pub mod seal;

pub use claim::ReceiptClaim;
pub use contract::{ContractError, RorschachVerifier};
pub use interface::{verify_image_calldata, verify_ownership_calldata, IRorschachVerifier, ImageVerified};
pub use seal::{split_selector, MockSealVerifier, ProofInvalid, SealVerifier, Selector, VerifierRouter, MOCK_SELECTOR};
