use core::fmt;

use alloy_primitives::{keccak256, Address};
use k256::ecdsa::{SigningKey, VerifyingKey};
use thiserror::Error;

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdentityError {
    #[error("private key is not a valid secp256k1 scalar")]
    InvalidPrivateKey,
}

/// Secret secp256k1 key. Only its derived [`Address`] ever leaves the guest.
#[derive(Clone, PartialEq, Eq)]
pub struct PrivateKey([u8; 32]);

impl PrivateKey {
    pub const fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Ethereum address: last 20 bytes of `keccak256(uncompressed_pubkey[1..])`.
    pub fn address(&self) -> Result<Address, IdentityError> {
        let signing_key =
            SigningKey::from_bytes(&self.0.into()).map_err(|_| IdentityError::InvalidPrivateKey)?;
        let public_key = VerifyingKey::from(&signing_key).to_encoded_point(false);
        let hash = keccak256(&public_key.as_bytes()[1..]);
        Ok(Address::from_slice(&hash[12..]))
    }
}

impl From<[u8; 32]> for PrivateKey {
    fn from(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }
}

impl fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PrivateKey(<redacted>)")
    }
}

#[cfg(test)]
mod tests {
    use alloy_primitives::address;

    use super::*;

    #[test]
    fn derives_known_address() {
        // Hardhat / anvil account #0
        let key = PrivateKey::from_bytes(
            hex::decode("ac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80")
                .unwrap()
                .try_into()
                .unwrap(),
        );
        assert_eq!(
            key.address().unwrap(),
            address!("f39fd6e51aad88f6f4ce6ab8827279cfffb92266")
        );
    }

    #[test]
    fn rejects_zero_key() {
        assert_eq!(
            PrivateKey::from_bytes([0u8; 32]).address(),
            Err(IdentityError::InvalidPrivateKey)
        );
    }

    #[test]
    fn debug_does_not_leak_key() {
        let key = PrivateKey::from_bytes([0x11; 32]);
        assert!(!format!("{key:?}").contains("11"));
    }
}
