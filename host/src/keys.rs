use alloy::signers::local::PrivateKeySigner;
use ror_core::PrivateKey;

use crate::error::{HostError, Result};

/// Parses a hex private key, with or without `0x`, and checks it is a valid
/// secp256k1 scalar.
pub fn parse_private_key(input: &str) -> Result<PrivateKey> {
    let input = input.trim();
    let bytes = hex::decode(input.strip_prefix("0x").unwrap_or(input))
        .map_err(|e| HostError::InvalidKey(e.to_string()))?;
    let bytes: [u8; 32] = bytes
        .try_into()
        .map_err(|b: Vec<u8>| HostError::InvalidKey(format!("expected 32 bytes, got {}", b.len())))?;

    let key = PrivateKey::from_bytes(bytes);
    key.address()?;
    Ok(key)
}

pub fn generate_private_key() -> PrivateKey {
    let signer = PrivateKeySigner::random();
    PrivateKey::from_bytes(signer.credential().to_bytes().into())
}

#[cfg(test)]
mod tests {
    use super::*;

    const KEY: &str = "1111111111111111111111111111111111111111111111111111111111111111";

    #[test]
    fn parses_with_and_without_prefix() {
        let plain = parse_private_key(KEY).unwrap();
        let prefixed = parse_private_key(&format!("0x{KEY}")).unwrap();
        assert_eq!(plain, prefixed);
        assert_eq!(plain.as_bytes(), &[0x11; 32]);
    }

    #[test]
    fn rejects_bad_keys() {
        assert!(matches!(parse_private_key("0x1234"), Err(HostError::InvalidKey(_))));
        assert!(matches!(parse_private_key("zz"), Err(HostError::InvalidKey(_))));
        assert!(matches!(
            parse_private_key(&"00".repeat(32)),
            Err(HostError::Identity(_))
        ));
    }

    #[test]
    fn address_matches_alloy_signer() {
        let signer: PrivateKeySigner = KEY.parse().unwrap();
        let key = parse_private_key(KEY).unwrap();
        assert_eq!(key.address().unwrap(), signer.address());

        let generated = generate_private_key();
        let signer = PrivateKeySigner::from_slice(generated.as_bytes()).unwrap();
        assert_eq!(generated.address().unwrap(), signer.address());
    }
}
