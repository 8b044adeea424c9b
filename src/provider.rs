//! Source of fresh key material for new wallets.

use crate::error::ProviderError;
use crate::model::{EthereumKeyMaterial, SolanaKeyMaterial};

/// Generates independent Ethereum and Solana keypairs on demand.
///
/// Implementations must return validly encoded addresses and keys, a valid
/// BIP-39 phrase for Ethereum, and cryptographically independent keypairs on
/// successive calls.
pub trait KeypairProvider {
    fn generate_ethereum(&mut self) -> Result<EthereumKeyMaterial, ProviderError>;

    fn generate_solana(&mut self) -> Result<SolanaKeyMaterial, ProviderError>;
}

impl<P: KeypairProvider + ?Sized> KeypairProvider for &mut P {
    fn generate_ethereum(&mut self) -> Result<EthereumKeyMaterial, ProviderError> {
        (**self).generate_ethereum()
    }

    fn generate_solana(&mut self) -> Result<SolanaKeyMaterial, ProviderError> {
        (**self).generate_solana()
    }
}

#[cfg(feature = "keygen")]
pub use random::RandomKeypairProvider;

#[cfg(feature = "keygen")]
mod random {
    use super::*;
    use crate::chains::{ChainKey, EthereumKey, SolanaKey};
    use rand::rngs::OsRng;

    /// Provider backed by the operating system RNG.
    ///
    /// Ethereum keys come from a fresh 12-word phrase at `m/44'/60'/0'/0/0`;
    /// Solana keys are bare Ed25519 keypairs.
    #[derive(Debug, Clone, Copy, Default)]
    pub struct RandomKeypairProvider;

    impl RandomKeypairProvider {
        #[must_use]
        pub fn new() -> Self {
            RandomKeypairProvider
        }
    }

    impl KeypairProvider for RandomKeypairProvider {
        fn generate_ethereum(&mut self) -> Result<EthereumKeyMaterial, ProviderError> {
            let key = EthereumKey::generate_with_mnemonic(&mut OsRng)?;
            let mnemonic = key
                .mnemonic()
                .ok_or_else(|| ProviderError::new(EthereumKey::CHAIN_ID, "missing mnemonic"))?;
            Ok(EthereumKeyMaterial::new(
                key.address(),
                key.private_key().as_str(),
                mnemonic,
            ))
        }

        fn generate_solana(&mut self) -> Result<SolanaKeyMaterial, ProviderError> {
            let key = SolanaKey::generate(&mut OsRng);
            Ok(SolanaKeyMaterial::new(
                key.address(),
                key.private_key().as_str(),
            ))
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn ethereum_material_is_self_consistent() {
            let material = RandomKeypairProvider::new().generate_ethereum().unwrap();
            let from_key = EthereumKey::from_private_key(material.private_key()).unwrap();
            let from_phrase = EthereumKey::from_mnemonic(material.mnemonic()).unwrap();

            assert_eq!(from_key.address(), material.address());
            assert_eq!(from_phrase.address(), material.address());
        }

        #[test]
        fn solana_material_is_self_consistent() {
            let material = RandomKeypairProvider::new().generate_solana().unwrap();
            let key = SolanaKey::from_private_key(material.private_key()).unwrap();
            assert_eq!(key.address(), material.address());
        }

        #[test]
        fn successive_calls_are_independent() {
            let mut provider = RandomKeypairProvider::new();
            let a = provider.generate_solana().unwrap();
            let b = provider.generate_solana().unwrap();
            assert_ne!(a.address(), b.address());
        }
    }
}
