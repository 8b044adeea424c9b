use crate::chains::ChainKey;
use crate::error::ProviderError;
use bip32::{DerivationPath, XPrv};
use bip39::{Language, Mnemonic};
use k256::ecdsa::SigningKey;
use rand::{CryptoRng, RngCore};
use sha3::{Digest, Keccak256};
use zeroize::Zeroizing;

/// Prefix byte size for uncompressed public key (0x04)
const UNCOMPRESSED_PUBLIC_KEY_PREFIX_SIZE: usize = 1;

/// Offset in Keccak256 hash to extract Ethereum address (last 20 bytes of 32-byte hash)
const ADDRESS_HASH_OFFSET: usize = 12;

/// Entropy for a 12-word phrase
const MNEMONIC_ENTROPY_SIZE: usize = 16;

/// First account on the standard Ethereum derivation path
pub const DEFAULT_DERIVATION_PATH: &str = "m/44'/60'/0'/0/0";

/// A secp256k1 key, optionally remembering the BIP-39 phrase it came from.
#[derive(Clone)]
pub struct EthereumKey {
    signing_key: SigningKey,
    mnemonic: Option<Zeroizing<String>>,
}

impl EthereumKey {
    pub fn from_signing_key(signing_key: SigningKey) -> Self {
        EthereumKey {
            signing_key,
            mnemonic: None,
        }
    }

    /// Derives the first account of `phrase` at [`DEFAULT_DERIVATION_PATH`].
    ///
    /// # Errors
    ///
    /// Returns an error if the phrase is not a valid English BIP-39 mnemonic.
    pub fn from_mnemonic(phrase: &str) -> Result<Self, ProviderError> {
        let mnemonic = Mnemonic::parse_in_normalized(Language::English, phrase)
            .map_err(|e| ProviderError::new(Self::CHAIN_ID, format!("invalid mnemonic: {e}")))?;
        Self::derive(&mnemonic)
    }

    fn derive(mnemonic: &Mnemonic) -> Result<Self, ProviderError> {
        let seed = Zeroizing::new(mnemonic.to_seed_normalized(""));
        let path: DerivationPath = DEFAULT_DERIVATION_PATH
            .parse()
            .map_err(|e| ProviderError::new(Self::CHAIN_ID, format!("derivation path: {e}")))?;
        let xprv = XPrv::derive_from_path(seed.as_slice(), &path)
            .map_err(|e| ProviderError::new(Self::CHAIN_ID, format!("derivation failed: {e}")))?;

        Ok(EthereumKey {
            signing_key: xprv.private_key().clone(),
            mnemonic: Some(Zeroizing::new(mnemonic.to_string())),
        })
    }

    /// Generates a fresh 12-word phrase and derives its first account.
    pub fn generate_with_mnemonic<R: RngCore + CryptoRng>(
        rng: &mut R,
    ) -> Result<Self, ProviderError> {
        let mut entropy = Zeroizing::new([0u8; MNEMONIC_ENTROPY_SIZE]);
        rng.fill_bytes(&mut entropy[..]);
        let mnemonic = Mnemonic::from_entropy(&entropy[..])
            .map_err(|e| ProviderError::new(Self::CHAIN_ID, format!("mnemonic: {e}")))?;
        Self::derive(&mnemonic)
    }

    #[must_use]
    pub fn signing_key(&self) -> &SigningKey {
        &self.signing_key
    }

    #[must_use]
    pub fn mnemonic(&self) -> Option<&str> {
        self.mnemonic.as_deref().map(String::as_str)
    }

    /// EIP-55 checksummed address: Keccak256 of the uncompressed public key
    /// (without the 0x04 prefix), last 20 bytes.
    #[must_use]
    pub fn address(&self) -> String {
        let public_key = self.signing_key.verifying_key();

        let encoded = public_key.to_encoded_point(false);
        let public_key_bytes = &encoded.as_bytes()[UNCOMPRESSED_PUBLIC_KEY_PREFIX_SIZE..];

        let hash = Keccak256::digest(public_key_bytes);
        to_checksum_address(&hex::encode(&hash[ADDRESS_HASH_OFFSET..]))
    }
}

/// Applies EIP-55 mixed-case checksumming to 40 lowercase hex characters.
fn to_checksum_address(lower_hex: &str) -> String {
    let hash = Keccak256::digest(lower_hex.as_bytes());
    let mut out = String::with_capacity(2 + lower_hex.len());
    out.push_str("0x");
    for (i, c) in lower_hex.chars().enumerate() {
        let nibble = (hash[i / 2] >> (if i % 2 == 0 { 4 } else { 0 })) & 0x0f;
        if c.is_ascii_alphabetic() && nibble >= 8 {
            out.push(c.to_ascii_uppercase());
        } else {
            out.push(c);
        }
    }
    out
}

impl ChainKey for EthereumKey {
    const CHAIN_ID: &'static str = "ethereum";
    const PRIVATE_KEY_SIZE: usize = 32;

    /// Bare random key with no phrase. Wallet key material needs a phrase;
    /// use [`EthereumKey::generate_with_mnemonic`] for that.
    fn generate<R: RngCore + CryptoRng>(rng: &mut R) -> Self {
        Self::from_signing_key(SigningKey::random(rng))
    }

    fn address(&self) -> String {
        EthereumKey::address(self)
    }

    /// `0x` followed by 64 lowercase hex digits.
    fn private_key(&self) -> Zeroizing<String> {
        Zeroizing::new(format!("0x{}", hex::encode(self.signing_key.to_bytes())))
    }

    fn from_private_key(encoded: &str) -> Result<Self, ProviderError> {
        let bytes = Self::decode_private_key_hex(encoded)?;
        let signing_key = SigningKey::from_slice(&bytes).map_err(|e| {
            ProviderError::new(Self::CHAIN_ID, format!("invalid secp256k1 key: {e}"))
        })?;
        Ok(Self::from_signing_key(signing_key))
    }
}

impl std::fmt::Debug for EthereumKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EthereumKey")
            .field("address", &self.address())
            .finish()
    }
}

impl std::fmt::Display for EthereumKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.address())
    }
}

impl PartialEq for EthereumKey {
    fn eq(&self, other: &Self) -> bool {
        self.address() == other.address()
    }
}
