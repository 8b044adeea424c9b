use crate::chains::ChainKey;
use crate::error::ProviderError;
use ed25519_dalek::{SigningKey, VerifyingKey};
use rand::{CryptoRng, RngCore};
use zeroize::Zeroizing;

/// Size of Ed25519 secret key in bytes
const SECRET_KEY_SIZE: usize = 32;

/// Size of Ed25519 public key in bytes
const PUBLIC_KEY_SIZE: usize = 32;

#[derive(Clone)]
pub struct SolanaKey {
    signing_key: SigningKey,
}

impl SolanaKey {
    pub fn from_signing_key(signing_key: SigningKey) -> Self {
        SolanaKey { signing_key }
    }

    #[must_use]
    pub fn signing_key(&self) -> &SigningKey {
        &self.signing_key
    }

    #[must_use]
    pub fn verifying_key(&self) -> VerifyingKey {
        self.signing_key.verifying_key()
    }

    /// Base58-encoded public key (typically 32-44 characters).
    #[must_use]
    pub fn address(&self) -> String {
        bs58::encode(self.verifying_key().as_bytes()).into_string()
    }

    /// Secret key followed by public key, the layout of Solana keypair files.
    #[must_use]
    pub fn to_keypair_bytes(&self) -> Zeroizing<[u8; 64]> {
        let mut bytes = Zeroizing::new([0u8; 64]);
        bytes[..SECRET_KEY_SIZE].copy_from_slice(&self.signing_key.to_bytes());
        bytes[SECRET_KEY_SIZE..].copy_from_slice(self.verifying_key().as_bytes());
        bytes
    }

    /// Parses 64 keypair bytes, checking the public half against the secret.
    ///
    /// # Errors
    ///
    /// Returns an error on wrong length or mismatched halves.
    pub fn from_keypair_bytes(bytes: &[u8]) -> Result<Self, ProviderError> {
        if bytes.len() != SECRET_KEY_SIZE + PUBLIC_KEY_SIZE {
            return Err(ProviderError::new(
                Self::CHAIN_ID,
                format!(
                    "expected {} bytes, got {}",
                    SECRET_KEY_SIZE + PUBLIC_KEY_SIZE,
                    bytes.len()
                ),
            ));
        }

        let mut secret_bytes = Zeroizing::new([0u8; SECRET_KEY_SIZE]);
        secret_bytes.copy_from_slice(&bytes[..SECRET_KEY_SIZE]);
        let mut public_bytes = [0u8; PUBLIC_KEY_SIZE];
        public_bytes.copy_from_slice(&bytes[SECRET_KEY_SIZE..]);

        let signing_key = SigningKey::from_bytes(&secret_bytes);

        let verifying_key = VerifyingKey::from_bytes(&public_bytes).map_err(|e| {
            ProviderError::new(Self::CHAIN_ID, format!("invalid public key: {e}"))
        })?;

        if signing_key.verifying_key().as_bytes() != verifying_key.as_bytes() {
            return Err(ProviderError::new(
                Self::CHAIN_ID,
                "public key does not match secret key",
            ));
        }

        Ok(SolanaKey { signing_key })
    }
}

impl ChainKey for SolanaKey {
    const CHAIN_ID: &'static str = "solana";
    const PRIVATE_KEY_SIZE: usize = SECRET_KEY_SIZE + PUBLIC_KEY_SIZE;

    fn generate<R: RngCore + CryptoRng>(rng: &mut R) -> Self {
        SolanaKey {
            signing_key: SigningKey::generate(rng),
        }
    }

    fn address(&self) -> String {
        SolanaKey::address(self)
    }

    /// 128 lowercase hex digits of the 64-byte keypair.
    fn private_key(&self) -> Zeroizing<String> {
        Zeroizing::new(hex::encode(self.to_keypair_bytes().as_slice()))
    }

    fn from_private_key(encoded: &str) -> Result<Self, ProviderError> {
        let bytes = Self::decode_private_key_hex(encoded)?;
        Self::from_keypair_bytes(&bytes)
    }
}

impl std::fmt::Debug for SolanaKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SolanaKey")
            .field("address", &self.address())
            .finish()
    }
}

impl std::fmt::Display for SolanaKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.address())
    }
}

impl PartialEq for SolanaKey {
    fn eq(&self, other: &Self) -> bool {
        self.address() == other.address()
    }
}
