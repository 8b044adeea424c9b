use crate::kdf_config::KdfConfig;
use crate::store::StorageLayout;

/// Name given to migrated wallets and to wallets created without one.
pub const DEFAULT_WALLET_NAME: &str = "My Wallet";

/// Minimum length of a password protecting a newly created vault.
pub const DEFAULT_MIN_PASSWORD_LEN: usize = 8;

/// Settings for a [`WalletManager`](crate::WalletManager).
///
/// # Examples
///
/// ```
/// use wallet_vault::{KdfConfig, VaultConfig};
///
/// let config = VaultConfig::default()
///     .with_kdf_config(KdfConfig::scrypt_interactive())
///     .with_min_password_len(12);
/// assert_eq!(config.min_password_len(), 12);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VaultConfig {
    kdf: KdfConfig,
    layout: StorageLayout,
    min_password_len: usize,
    default_wallet_name: String,
}

impl VaultConfig {
    #[inline]
    #[must_use]
    pub fn kdf_config(&self) -> KdfConfig {
        self.kdf
    }

    #[inline]
    #[must_use]
    pub fn layout(&self) -> &StorageLayout {
        &self.layout
    }

    #[inline]
    #[must_use]
    pub fn min_password_len(&self) -> usize {
        self.min_password_len
    }

    #[inline]
    #[must_use]
    pub fn default_wallet_name(&self) -> &str {
        &self.default_wallet_name
    }

    /// KDF used when sealing a brand-new record.
    #[inline]
    #[must_use]
    pub fn with_kdf_config(mut self, kdf: KdfConfig) -> Self {
        self.kdf = kdf;
        self
    }

    #[inline]
    #[must_use]
    pub fn with_layout(mut self, layout: StorageLayout) -> Self {
        self.layout = layout;
        self
    }

    /// Only checked when the first wallet creates the vault.
    #[inline]
    #[must_use]
    pub fn with_min_password_len(mut self, len: usize) -> Self {
        self.min_password_len = len;
        self
    }

    /// Blank names fall back to [`DEFAULT_WALLET_NAME`].
    #[inline]
    #[must_use]
    pub fn with_default_wallet_name<S: Into<String>>(mut self, name: S) -> Self {
        let name = name.into();
        self.default_wallet_name = if name.trim().is_empty() {
            DEFAULT_WALLET_NAME.to_string()
        } else {
            name.trim().to_string()
        };
        self
    }
}

impl Default for VaultConfig {
    fn default() -> Self {
        VaultConfig {
            kdf: KdfConfig::default(),
            layout: StorageLayout::default(),
            min_password_len: DEFAULT_MIN_PASSWORD_LEN,
            default_wallet_name: DEFAULT_WALLET_NAME.to_string(),
        }
    }
}
