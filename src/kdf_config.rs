//! Password key derivation: presets for new records and the parameter block
//! stored inside every sealed record.
//!
//! ```
//! use wallet_vault::KdfConfig;
//!
//! // Production strength (scrypt, N = 2^18)
//! let config = KdfConfig::scrypt_default();
//!
//! // Cheap parameters for tests
//! let config = KdfConfig::custom_scrypt(4, 8, 1);
//! ```

use crate::crypto_config::*;
use crate::error::{Result, VaultError};
use pbkdf2::pbkdf2_hmac;
use scrypt::{scrypt, Params as ScryptParams};
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use zeroize::Zeroizing;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KdfType {
    /// Memory-hard scrypt (recommended)
    Scrypt,
    /// PBKDF2 with HMAC-SHA256
    Pbkdf2,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KdfParams {
    Scrypt {
        /// log₂ of the CPU/memory cost parameter N
        log_n: u8,
        r: u32,
        p: u32,
    },
    Pbkdf2 {
        iterations: u32,
    },
}

/// Key derivation settings used when sealing a new record.
///
/// Opening a record never consults this: the parameters travel inside the
/// record itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KdfConfig {
    params: KdfParams,
}

impl KdfConfig {
    #[inline]
    #[must_use]
    pub fn kdf_type(&self) -> KdfType {
        match self.params {
            KdfParams::Scrypt { .. } => KdfType::Scrypt,
            KdfParams::Pbkdf2 { .. } => KdfType::Pbkdf2,
        }
    }

    #[inline]
    #[must_use]
    pub fn params(&self) -> KdfParams {
        self.params
    }

    /// Scrypt with N=2^18, r=8, p=1 (~256 MB, around a second per unlock).
    #[inline]
    #[must_use]
    pub fn scrypt_default() -> Self {
        Self::custom_scrypt(18, DEFAULT_SCRYPT_R, DEFAULT_SCRYPT_P)
    }

    /// Scrypt with N=2^14, r=8, p=1 (~16 MB, a few hundred milliseconds).
    #[inline]
    #[must_use]
    pub fn scrypt_interactive() -> Self {
        Self::custom_scrypt(14, DEFAULT_SCRYPT_R, DEFAULT_SCRYPT_P)
    }

    /// Scrypt with N=2^20, r=8, p=1 (~1 GB).
    #[inline]
    #[must_use]
    pub fn scrypt_sensitive() -> Self {
        Self::custom_scrypt(20, DEFAULT_SCRYPT_R, DEFAULT_SCRYPT_P)
    }

    /// PBKDF2-HMAC-SHA256 with 262,144 iterations.
    #[inline]
    #[must_use]
    pub fn pbkdf2_default() -> Self {
        Self::custom_pbkdf2(DEFAULT_PBKDF2_ITERATIONS)
    }

    #[inline]
    #[must_use]
    pub fn custom_scrypt(log_n: u8, r: u32, p: u32) -> Self {
        KdfConfig {
            params: KdfParams::Scrypt { log_n, r, p },
        }
    }

    #[inline]
    #[must_use]
    pub fn custom_pbkdf2(iterations: u32) -> Self {
        KdfConfig {
            params: KdfParams::Pbkdf2 { iterations },
        }
    }

    /// Builds the stored parameter block for a fresh salt.
    pub(crate) fn stored_params(&self, salt: &[u8]) -> Result<StoredKdfParams> {
        match self.params {
            KdfParams::Scrypt { log_n, r, p } => {
                if log_n == 0 || log_n >= 32 {
                    return Err(VaultError::InvalidKdfParams(format!(
                        "scrypt log_n must be in 1..32, got {log_n}"
                    )));
                }
                Ok(StoredKdfParams::Scrypt {
                    dklen: DERIVED_KEY_SIZE,
                    n: 1u32 << log_n,
                    p,
                    r,
                    salt: hex::encode(salt),
                })
            }
            KdfParams::Pbkdf2 { iterations } => {
                if iterations == 0 {
                    return Err(VaultError::InvalidKdfParams(
                        "pbkdf2 iterations must be non-zero".into(),
                    ));
                }
                Ok(StoredKdfParams::Pbkdf2 {
                    c: iterations,
                    dklen: DERIVED_KEY_SIZE,
                    prf: SUPPORTED_PRF.to_string(),
                    salt: hex::encode(salt),
                })
            }
        }
    }
}

impl Default for KdfConfig {
    /// Scrypt at the crate's default cost.
    #[inline]
    fn default() -> Self {
        Self::custom_scrypt(DEFAULT_SCRYPT_LOG_N, DEFAULT_SCRYPT_R, DEFAULT_SCRYPT_P)
    }
}

/// KDF parameters as written into a sealed record.
#[remain::sorted]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kdf", rename_all = "lowercase")]
pub(crate) enum StoredKdfParams {
    Pbkdf2 {
        c: u32,
        dklen: u32,
        prf: String,
        salt: String,
    },
    Scrypt {
        dklen: u32,
        n: u32,
        p: u32,
        r: u32,
        salt: String,
    },
}

impl StoredKdfParams {
    /// Runs the KDF described by this block over `password`.
    pub(crate) fn derive(&self, password: &str) -> Result<Zeroizing<Vec<u8>>> {
        match self {
            StoredKdfParams::Pbkdf2 {
                c,
                dklen,
                prf,
                salt,
            } => {
                if prf != SUPPORTED_PRF {
                    return Err(VaultError::InvalidKdfParams(format!(
                        "unsupported PRF {prf}"
                    )));
                }
                if *c == 0 || *c > MAX_PBKDF2_ITERATIONS {
                    return Err(VaultError::InvalidKdfParams(format!(
                        "pbkdf2 c must be in 1..={MAX_PBKDF2_ITERATIONS}, got {c}"
                    )));
                }
                Self::check_dklen(*dklen)?;
                let salt = Self::decode_salt(salt)?;
                let mut key = Zeroizing::new(vec![0u8; *dklen as usize]);
                pbkdf2_hmac::<Sha256>(password.as_bytes(), &salt, *c, &mut key);
                Ok(key)
            }
            StoredKdfParams::Scrypt {
                dklen,
                n,
                p,
                r,
                salt,
            } => {
                if !n.is_power_of_two() || *n < 2 {
                    return Err(VaultError::InvalidKdfParams(format!(
                        "scrypt n must be a power of two >= 2, got {n}"
                    )));
                }
                let log_n = n.trailing_zeros() as u8;
                Self::check_scrypt_cost(log_n, *r, *p)?;
                Self::check_dklen(*dklen)?;
                let salt = Self::decode_salt(salt)?;
                let params = ScryptParams::new(log_n, *r, *p, *dklen as usize)
                    .map_err(|e| VaultError::InvalidKdfParams(format!("scrypt: {e}")))?;

                let mut key = Zeroizing::new(vec![0u8; *dklen as usize]);
                scrypt(password.as_bytes(), &salt, &params, &mut key)
                    .map_err(|e| VaultError::Crypto(format!("scrypt derivation failed: {e}")))?;
                Ok(key)
            }
        }
    }

    /// Bounds the work a stored record can demand before its MAC is checked.
    fn check_scrypt_cost(log_n: u8, r: u32, p: u32) -> Result<()> {
        if log_n > MAX_SCRYPT_LOG_N {
            return Err(VaultError::InvalidKdfParams(format!(
                "scrypt n must be at most 2^{MAX_SCRYPT_LOG_N}, got 2^{log_n}"
            )));
        }
        if r == 0 || p == 0 || u64::from(r) * u64::from(p) > MAX_SCRYPT_RP {
            return Err(VaultError::InvalidKdfParams(format!(
                "scrypt r * p must be in 1..={MAX_SCRYPT_RP}, got r={r} p={p}"
            )));
        }
        if 128 * (1u64 << log_n) * u64::from(r) > MAX_SCRYPT_MEMORY {
            return Err(VaultError::InvalidKdfParams(format!(
                "scrypt memory above {MAX_SCRYPT_MEMORY} bytes (n=2^{log_n}, r={r})"
            )));
        }
        Ok(())
    }

    fn check_dklen(dklen: u32) -> Result<()> {
        if dklen != DERIVED_KEY_SIZE {
            return Err(VaultError::InvalidKdfParams(format!(
                "dklen must be {DERIVED_KEY_SIZE}, got {dklen}"
            )));
        }
        Ok(())
    }

    fn decode_salt(salt: &str) -> Result<Vec<u8>> {
        hex::decode(salt).map_err(|e| VaultError::InvalidKdfParams(format!("salt: {e}")))
    }
}
