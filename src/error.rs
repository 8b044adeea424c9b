use std::io;
use thiserror::Error;

/// Errors surfaced by the vault.
///
/// Every decrypt-path failure collapses into [`VaultError::DecryptFailure`]:
/// a wrong password and a tampered record are reported identically.
#[derive(Debug, Error)]
pub enum VaultError {
    #[error("Invalid password or corrupted vault")]
    DecryptFailure,

    #[error("Wallet not found: {0}")]
    NotFound(String),

    #[error("Cannot delete the last remaining wallet")]
    LastWallet,

    #[error("Wallet name must not be empty")]
    InvalidName,

    #[error("Storage failure: {0}")]
    Persistence(String),

    #[error("Key generation failed: {0}")]
    Provider(#[from] ProviderError),

    #[error("Vault is locked")]
    Locked,

    #[error("No wallets found")]
    NoVault,

    #[error("Password must be at least {min} characters")]
    WeakPassword { min: usize },

    #[error("Invalid KDF parameters: {0}")]
    InvalidKdfParams(String),

    #[error("Cryptographic error: {0}")]
    Crypto(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl From<io::Error> for VaultError {
    fn from(err: io::Error) -> Self {
        VaultError::Persistence(err.to_string())
    }
}

/// Failure reported by a [`KeypairProvider`](crate::provider::KeypairProvider).
#[derive(Debug, Error)]
#[error("{chain}: {reason}")]
pub struct ProviderError {
    pub chain: String,
    pub reason: String,
}

impl ProviderError {
    pub fn new(chain: impl Into<String>, reason: impl Into<String>) -> Self {
        ProviderError {
            chain: chain.into(),
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, VaultError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn io_errors_become_persistence_failures() {
        let err: VaultError = io::Error::new(io::ErrorKind::Other, "disk full").into();
        assert!(matches!(err, VaultError::Persistence(ref msg) if msg.contains("disk full")));
    }

    #[test]
    fn decrypt_failure_message_does_not_distinguish_causes() {
        assert_eq!(
            VaultError::DecryptFailure.to_string(),
            "Invalid password or corrupted vault"
        );
    }

    #[test]
    fn provider_errors_name_the_chain() {
        let err: VaultError = ProviderError::new("solana", "rng unavailable").into();
        assert_eq!(err.to_string(), "Key generation failed: solana: rng unavailable");
    }
}
