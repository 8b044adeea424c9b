//! Cryptographic constants for sealed vault records.

/// Envelope format version written by this crate
pub(crate) const ENVELOPE_VERSION: u32 = 1;

/// Stream cipher applied to the canonical vault bytes
pub(crate) const CIPHER_NAME: &str = "aes-128-ctr";

/// Size of the random KDF salt in bytes
pub(crate) const SALT_SIZE: usize = 32;

/// Size of initialization vector for AES-CTR
pub(crate) const IV_SIZE: usize = 16;

/// Size of encryption key portion (first 16 bytes of derived key)
pub(crate) const ENCRYPTION_KEY_SIZE: usize = 16;

/// Size of MAC key portion (last 16 bytes of derived key)
pub(crate) const MAC_KEY_SIZE: usize = 16;

/// Length of key derivation function output
pub(crate) const DERIVED_KEY_SIZE: u32 = (ENCRYPTION_KEY_SIZE + MAC_KEY_SIZE) as u32;

/// Supported pseudo-random function for PBKDF2
pub(crate) const SUPPORTED_PRF: &str = "hmac-sha256";

#[cfg(not(any(test, feature = "test-utils")))]
pub(crate) const DEFAULT_SCRYPT_LOG_N: u8 = 18; // N = 262144

#[cfg(any(test, feature = "test-utils"))]
pub(crate) const DEFAULT_SCRYPT_LOG_N: u8 = 4; // N = 16

/// Scrypt r parameter (block size)
pub(crate) const DEFAULT_SCRYPT_R: u32 = 8;

/// Scrypt p parameter (parallelization)
pub(crate) const DEFAULT_SCRYPT_P: u32 = 1;

/// Default PBKDF2 iteration count
pub(crate) const DEFAULT_PBKDF2_ITERATIONS: u32 = 262_144;

/// Highest scrypt cost accepted from a stored record (the sensitive preset)
pub(crate) const MAX_SCRYPT_LOG_N: u8 = 20;

/// Ceiling on scrypt memory, 128 * N * r bytes
pub(crate) const MAX_SCRYPT_MEMORY: u64 = 1 << 30;

/// Ceiling on scrypt r * p
pub(crate) const MAX_SCRYPT_RP: u64 = 64;

/// Ceiling on PBKDF2 iterations
pub(crate) const MAX_PBKDF2_ITERATIONS: u32 = 10 * DEFAULT_PBKDF2_ITERATIONS;
