//! Key material shared by every pipeline.

use chainkit_crypto::{KeyProvider, PrivateKey};
use std::fmt;

use crate::{Result, WalletError};

/// Both SEC1 encodings of one secp256k1 public key.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct PublicKeys {
    /// `0x02`/`0x03` ‖ X
    pub compressed: [u8; 33],
    /// `0x04` ‖ X ‖ Y
    pub uncompressed: [u8; 65],
}

impl PublicKeys {
    /// Ask `provider` for both encodings.
    pub fn derive<P: KeyProvider>(provider: &P, private_key: &PrivateKey) -> Result<Self> {
        Ok(Self {
            compressed: provider.compressed_public_key(private_key)?,
            uncompressed: provider.uncompressed_public_key(private_key)?,
        })
    }
}

impl fmt::Debug for PublicKeys {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PublicKeys")
            .field("compressed", &hex::encode(self.compressed))
            .field("uncompressed", &hex::encode(self.uncompressed))
            .finish()
    }
}

/// Parse a hex private key supplied by a user.
///
/// Blank input is [`WalletError::MissingPrivateKey`]; otherwise the usual
/// [`WalletError::MalformedHex`] / [`WalletError::InvalidLength`] apply.
pub fn parse_private_key(input: &str) -> Result<PrivateKey> {
    if input.trim().is_empty() {
        return Err(WalletError::MissingPrivateKey);
    }
    Ok(PrivateKey::from_hex(input)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_private_key() {
        assert_eq!(parse_private_key("  "), Err(WalletError::MissingPrivateKey));
        assert!(matches!(parse_private_key("0x123"), Err(WalletError::MalformedHex(_))));
        assert_eq!(
            parse_private_key("0x0102"),
            Err(WalletError::InvalidLength { expected: 32, actual: 2 })
        );
        assert!(parse_private_key(&"11".repeat(32)).is_ok());
    }
}
