//! Canonical encoding of a [`Vault`] and its password-based sealing.
//!
//! A sealed record is a compact JSON envelope in the Web3 Secret Storage
//! style: AES-128-CTR over the canonical bytes, keyed by the first half of a
//! scrypt/PBKDF2-derived key, authenticated by SHA-256 over the second half
//! and the ciphertext. Everything needed to open it (salt, IV, KDF
//! parameters) is carried in the envelope.

use crate::crypto_config::*;
use crate::error::{Result, VaultError};
use crate::kdf_config::{KdfConfig, StoredKdfParams};
use crate::model::Vault;
use aes::cipher::{KeyIvInit, StreamCipher};
use rand::{CryptoRng, RngCore};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;
use tracing::debug;
use zeroize::Zeroizing;

type Aes128Ctr = ctr::Ctr64BE<aes::Aes128>;

#[derive(Debug, Clone, Serialize, Deserialize)]
struct Envelope {
    version: u32,
    crypto: CryptoJson,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct CryptoJson {
    cipher: String,
    cipherparams: CipherparamsJson,
    ciphertext: String,

    #[serde(flatten)]
    kdfparams: StoredKdfParams,

    mac: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct CipherparamsJson {
    iv: String,
}

/// Seals and opens vault records.
#[derive(Debug, Clone, Copy, Default)]
pub struct VaultCodec {
    kdf: KdfConfig,
}

impl VaultCodec {
    #[must_use]
    pub fn new(kdf: KdfConfig) -> Self {
        VaultCodec { kdf }
    }

    #[must_use]
    pub fn kdf_config(&self) -> KdfConfig {
        self.kdf
    }

    /// Canonical bytes of `vault`: equal vaults always encode identically.
    pub fn serialize(vault: &Vault) -> Result<Zeroizing<Vec<u8>>> {
        Ok(Zeroizing::new(serde_json::to_vec(vault)?))
    }

    /// Parses canonical bytes back into a consistent [`Vault`].
    pub fn deserialize(bytes: &[u8]) -> Result<Vault> {
        let vault: Vault = parse_plaintext(bytes)?;
        vault.repaired().ok_or_else(|| {
            debug!("decoded vault has duplicate wallet ids");
            VaultError::DecryptFailure
        })
    }

    /// Encrypts `plaintext` under `password` with a fresh salt and IV.
    pub fn encrypt(&self, plaintext: &[u8], password: &str) -> Result<String> {
        self.encrypt_with_rng(&mut rand::thread_rng(), plaintext, password)
    }

    pub fn encrypt_with_rng<R: RngCore + CryptoRng>(
        &self,
        rng: &mut R,
        plaintext: &[u8],
        password: &str,
    ) -> Result<String> {
        let mut salt = Zeroizing::new(vec![0u8; SALT_SIZE]);
        rng.fill_bytes(&mut salt);
        let kdfparams = self.kdf.stored_params(&salt)?;
        let derived_key = kdfparams.derive(password)?;
        seal_with_key(rng, &derived_key, kdfparams, plaintext)
    }

    /// Decrypts a sealed record.
    ///
    /// Any failure (wrong password, tampering, malformed envelope) is
    /// reported as [`VaultError::DecryptFailure`].
    pub fn decrypt(&self, ciphertext: &str, password: &str) -> Result<Zeroizing<Vec<u8>>> {
        let (envelope, derived_key) = open_envelope(ciphertext, password)?;
        decrypt_verified(&envelope, &derived_key)
    }

    /// Serializes and encrypts `vault` as a new record.
    pub fn seal(&self, vault: &Vault, password: &str) -> Result<String> {
        let plaintext = Self::serialize(vault)?;
        self.encrypt(&plaintext, password)
    }

    /// Decrypts and parses a current-format record.
    pub fn open(&self, ciphertext: &str, password: &str) -> Result<Vault> {
        let plaintext = self.decrypt(ciphertext, password)?;
        Self::deserialize(&plaintext)
    }

    /// Re-encrypts `vault` reusing the KDF parameters of `previous`.
    ///
    /// `password` must open `previous`; otherwise this fails with
    /// [`VaultError::DecryptFailure`] and nothing is produced. Only one KDF
    /// run is needed since the salt is shared.
    pub fn reseal(&self, previous: &str, vault: &Vault, password: &str) -> Result<String> {
        let (envelope, derived_key) = open_envelope(previous, password)?;
        verify_mac(&envelope, &derived_key)?;
        let plaintext = Self::serialize(vault)?;
        seal_with_key(
            &mut rand::thread_rng(),
            &derived_key,
            envelope.crypto.kdfparams,
            &plaintext,
        )
    }

    /// Decrypts a record and parses it as an arbitrary plaintext schema.
    pub(crate) fn open_as<T: DeserializeOwned>(&self, ciphertext: &str, password: &str) -> Result<T> {
        let plaintext = self.decrypt(ciphertext, password)?;
        parse_plaintext(&plaintext)
    }
}

fn parse_plaintext<T: DeserializeOwned>(bytes: &[u8]) -> Result<T> {
    serde_json::from_slice(bytes).map_err(|e| {
        debug!(line = e.line(), column = e.column(), "plaintext does not match schema");
        VaultError::DecryptFailure
    })
}

fn seal_with_key<R: RngCore + CryptoRng>(
    rng: &mut R,
    derived_key: &[u8],
    kdfparams: StoredKdfParams,
    plaintext: &[u8],
) -> Result<String> {
    let (encryption_key, mac_key) = split_key(derived_key)?;

    let mut iv = [0u8; IV_SIZE];
    rng.fill_bytes(&mut iv);

    let mut cipher = Aes128Ctr::new(encryption_key.into(), iv.as_slice().into());
    let mut ciphertext = plaintext.to_vec();
    cipher.apply_keystream(&mut ciphertext);

    let mac = compute_mac(mac_key, &ciphertext);

    let envelope = Envelope {
        version: ENVELOPE_VERSION,
        crypto: CryptoJson {
            cipher: CIPHER_NAME.to_string(),
            cipherparams: CipherparamsJson {
                iv: hex::encode(iv),
            },
            ciphertext: hex::encode(&ciphertext),
            kdfparams,
            mac: hex::encode(mac),
        },
    };
    Ok(serde_json::to_string(&envelope)?)
}

/// Parses the envelope, checks its header and derives the key.
fn open_envelope(ciphertext: &str, password: &str) -> Result<(Envelope, Zeroizing<Vec<u8>>)> {
    let envelope: Envelope = serde_json::from_str(ciphertext).map_err(|e| {
        debug!(error = %e, "sealed record is not a valid envelope");
        VaultError::DecryptFailure
    })?;

    if envelope.version != ENVELOPE_VERSION {
        debug!(version = envelope.version, "unsupported envelope version");
        return Err(VaultError::DecryptFailure);
    }
    if envelope.crypto.cipher != CIPHER_NAME {
        debug!(cipher = %envelope.crypto.cipher, "unsupported cipher");
        return Err(VaultError::DecryptFailure);
    }

    let derived_key = envelope.crypto.kdfparams.derive(password).map_err(|e| {
        debug!(error = %e, "key derivation rejected stored parameters");
        VaultError::DecryptFailure
    })?;
    Ok((envelope, derived_key))
}

fn verify_mac(envelope: &Envelope, derived_key: &[u8]) -> Result<Vec<u8>> {
    let (_, mac_key) = split_key(derived_key).map_err(|_| VaultError::DecryptFailure)?;
    let ciphertext = decode_hex(&envelope.crypto.ciphertext, "ciphertext")?;
    let expected = decode_hex(&envelope.crypto.mac, "mac")?;

    let computed = compute_mac(mac_key, &ciphertext);
    if computed.len() != expected.len() || !bool::from(computed.ct_eq(&expected)) {
        return Err(VaultError::DecryptFailure);
    }
    Ok(ciphertext)
}

fn decrypt_verified(envelope: &Envelope, derived_key: &[u8]) -> Result<Zeroizing<Vec<u8>>> {
    let ciphertext = verify_mac(envelope, derived_key)?;
    let (encryption_key, _) = split_key(derived_key).map_err(|_| VaultError::DecryptFailure)?;

    let iv = decode_hex(&envelope.crypto.cipherparams.iv, "iv")?;
    if iv.len() != IV_SIZE {
        debug!(len = iv.len(), "iv has wrong length");
        return Err(VaultError::DecryptFailure);
    }

    let mut cipher = Aes128Ctr::new(encryption_key.into(), iv.as_slice().into());
    let mut plaintext = Zeroizing::new(ciphertext);
    cipher.apply_keystream(&mut plaintext);
    Ok(plaintext)
}

fn split_key(derived_key: &[u8]) -> Result<(&[u8], &[u8])> {
    if derived_key.len() < ENCRYPTION_KEY_SIZE + MAC_KEY_SIZE {
        return Err(VaultError::Crypto(format!(
            "derived key too short: {} bytes",
            derived_key.len()
        )));
    }
    Ok((
        &derived_key[..ENCRYPTION_KEY_SIZE],
        &derived_key[ENCRYPTION_KEY_SIZE..ENCRYPTION_KEY_SIZE + MAC_KEY_SIZE],
    ))
}

fn compute_mac(mac_key: &[u8], ciphertext: &[u8]) -> Vec<u8> {
    let mut hasher = Sha256::new();
    hasher.update(mac_key);
    hasher.update(ciphertext);
    hasher.finalize().to_vec()
}

fn decode_hex(value: &str, field: &'static str) -> Result<Vec<u8>> {
    hex::decode(value).map_err(|e| {
        debug!(field, error = %e, "invalid hex in envelope");
        VaultError::DecryptFailure
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{EthereumKeyMaterial, SolanaKeyMaterial, Wallet};
    use chrono::Utc;

    fn codec() -> VaultCodec {
        VaultCodec::new(KdfConfig::custom_scrypt(4, 8, 1))
    }

    fn sample_vault() -> Vault {
        Vault::single(Wallet::from_parts(
            "w1",
            "Main",
            Utc::now(),
            EthereumKeyMaterial::new("0xAA", "0x01", "abandon about"),
            SolanaKeyMaterial::new("Sol111", "ab"),
        ))
    }

    #[test]
    fn seal_then_open_restores_vault() {
        let vault = sample_vault();
        let sealed = codec().seal(&vault, "pw123456").unwrap();
        assert_eq!(codec().open(&sealed, "pw123456").unwrap(), vault);
    }

    #[test]
    fn sealed_record_contains_no_plaintext() {
        let sealed = codec().seal(&sample_vault(), "pw123456").unwrap();
        assert!(!sealed.contains("abandon"));
        assert!(!sealed.contains("Sol111"));
        assert!(!sealed.contains("Main"));
    }

    #[test]
    fn same_input_seals_differently() {
        let vault = sample_vault();
        let a = codec().seal(&vault, "pw123456").unwrap();
        let b = codec().seal(&vault, "pw123456").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn wrong_password_is_decrypt_failure() {
        let sealed = codec().seal(&sample_vault(), "pw123456").unwrap();
        assert!(matches!(
            codec().open(&sealed, "pw654321"),
            Err(VaultError::DecryptFailure)
        ));
    }

    #[test]
    fn tampered_ciphertext_is_decrypt_failure() {
        let sealed = codec().seal(&sample_vault(), "pw123456").unwrap();
        let mut envelope: Envelope = serde_json::from_str(&sealed).unwrap();
        let mut bytes = hex::decode(&envelope.crypto.ciphertext).unwrap();
        bytes[0] ^= 0x01;
        envelope.crypto.ciphertext = hex::encode(bytes);
        let tampered = serde_json::to_string(&envelope).unwrap();

        assert!(matches!(
            codec().open(&tampered, "pw123456"),
            Err(VaultError::DecryptFailure)
        ));
    }

    #[test]
    fn valid_ciphertext_of_wrong_schema_is_decrypt_failure() {
        let sealed = codec().encrypt(b"[1,2,3]", "pw123456").unwrap();
        assert!(matches!(
            codec().open(&sealed, "pw123456"),
            Err(VaultError::DecryptFailure)
        ));
    }

    #[test]
    fn reseal_keeps_salt_and_requires_matching_password() {
        let vault = sample_vault();
        let first = codec().seal(&vault, "pw123456").unwrap();
        let second = codec().reseal(&first, &Vault::default(), "pw123456").unwrap();

        let a: Envelope = serde_json::from_str(&first).unwrap();
        let b: Envelope = serde_json::from_str(&second).unwrap();
        assert_eq!(a.crypto.kdfparams, b.crypto.kdfparams);
        assert_ne!(a.crypto.cipherparams.iv, b.crypto.cipherparams.iv);
        assert_eq!(codec().open(&second, "pw123456").unwrap(), Vault::default());

        assert!(matches!(
            codec().reseal(&first, &vault, "not-the-password"),
            Err(VaultError::DecryptFailure)
        ));
    }

    #[test]
    fn opening_ignores_local_kdf_config() {
        let vault = sample_vault();
        let sealed = VaultCodec::new(KdfConfig::custom_pbkdf2(8))
            .seal(&vault, "pw123456")
            .unwrap();
        assert!(sealed.contains("\"kdf\":\"pbkdf2\""));
        assert_eq!(codec().open(&sealed, "pw123456").unwrap(), vault);
    }
}
