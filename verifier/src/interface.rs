use alloy_sol_types::{sol, SolCall};

sol! {
    /// Registry of Rorschach images proven by their key holders.
    #[derive(Debug, PartialEq, Eq)]
    interface IRorschachVerifier {
        /// Emitted on every successful `verifyImage`, including repeats.
        event ImageVerified(
            bytes32 indexed imageHash,
            address indexed ethAddress,
            uint64 walks,
            uint64 steps
        );

        /// Verifies `seal` over `sha256(journal)` and records the image.
        function verifyImage(bytes calldata seal, bytes calldata journal) external returns (bool);

        function isVerified(bytes32 imageHash) external view returns (bool);

        function getAddressImages(address ethAddress) external view returns (bytes32[] memory);

        /// Proves control of `claimed` without recording anything.
        function verifyOwnership(bytes calldata seal, bytes calldata journal, address claimed)
            external
            view
            returns (bool);

        function imageId() external view returns (bytes32);
    }
}

pub use IRorschachVerifier::{IRorschachVerifierCalls, ImageVerified};

/// Calldata for `verifyImage(seal, journal)`.
pub fn verify_image_calldata(seal: &[u8], journal: &[u8]) -> Vec<u8> {
    IRorschachVerifier::verifyImageCall {
        seal: seal.to_vec().into(),
        journal: journal.to_vec().into(),
    }
    .abi_encode()
}

/// Calldata for `verifyOwnership(seal, journal, claimed)`.
pub fn verify_ownership_calldata(
    seal: &[u8],
    journal: &[u8],
    claimed: alloy_primitives::Address,
) -> Vec<u8> {
    IRorschachVerifier::verifyOwnershipCall {
        seal: seal.to_vec().into(),
        journal: journal.to_vec().into(),
        claimed,
    }
    .abi_encode()
}
