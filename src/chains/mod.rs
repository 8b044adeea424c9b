use crate::error::ProviderError;
use rand::{CryptoRng, RngCore};
use zeroize::Zeroizing;

pub mod ethereum;
pub mod solana;

pub use ethereum::EthereumKey;
pub use solana::SolanaKey;

/// Chain-specific keypair backing a wallet's key material.
///
/// Private keys travel through the vault as strings, so each chain fixes a
/// textual encoding and must round-trip it exactly.
///
/// # Examples
///
/// ```
/// use wallet_vault::chains::{ChainKey, SolanaKey};
///
/// let key = SolanaKey::generate(&mut rand::thread_rng());
/// let restored = SolanaKey::from_private_key(&key.private_key()).unwrap();
/// assert_eq!(key.address(), restored.address());
/// ```
pub trait ChainKey: Sized + Clone {
    /// Chain identifier used in error reports
    const CHAIN_ID: &'static str;

    /// Size of the decoded private key material in bytes
    const PRIVATE_KEY_SIZE: usize;

    /// Generate a new random key
    fn generate<R: RngCore + CryptoRng>(rng: &mut R) -> Self;

    /// Canonical address string
    #[must_use]
    fn address(&self) -> String;

    /// Private key in the chain's textual encoding
    #[must_use]
    fn private_key(&self) -> Zeroizing<String>;

    /// Parses the encoding produced by [`ChainKey::private_key`].
    ///
    /// # Errors
    ///
    /// Returns an error if the text is malformed or the key is invalid.
    fn from_private_key(encoded: &str) -> Result<Self, ProviderError>;

    /// Hex-decodes `encoded` and checks its length.
    fn decode_private_key_hex(encoded: &str) -> Result<Zeroizing<Vec<u8>>, ProviderError> {
        let bytes = Zeroizing::new(
            hex::decode(encoded.trim_start_matches("0x"))
                .map_err(|e| ProviderError::new(Self::CHAIN_ID, format!("invalid hex: {e}")))?,
        );
        if bytes.len() != Self::PRIVATE_KEY_SIZE {
            return Err(ProviderError::new(
                Self::CHAIN_ID,
                format!(
                    "expected {} bytes, got {}",
                    Self::PRIVATE_KEY_SIZE,
                    bytes.len()
                ),
            ));
        }
        Ok(bytes)
    }
}
