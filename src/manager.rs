//! The in-memory authority over the decrypted vault.
//!
//! Every mutation follows the same protocol: validate against the live
//! vault, apply the change to a copy, seal the copy, write it to the store,
//! and only then replace the live vault. A failure at any step leaves the
//! live vault exactly as it was.

use crate::codec::VaultCodec;
use crate::config::VaultConfig;
use crate::error::{Result, VaultError};
use crate::migration::migrate_legacy;
use crate::model::{Vault, Wallet};
use crate::provider::KeypairProvider;
use crate::store::{KeyValueStore, StoredFormat, VaultStore};
use chrono::Utc;
use tracing::{debug, info};
use uuid::Uuid;

/// Time-ordered id that does not collide with any wallet in `existing`.
pub(crate) fn new_wallet_id(existing: Option<&Vault>) -> String {
    loop {
        let id = Uuid::now_v7().to_string();
        if existing.map_or(true, |vault| !vault.contains(&id)) {
            return id;
        }
    }
}

/// Owns the vault store and the decrypted vault.
///
/// The password is passed to each call that needs it and never kept.
///
/// # Examples
///
/// ```
/// # #[cfg(feature = "keygen")]
/// # {
/// use wallet_vault::{KdfConfig, MemoryStore, RandomKeypairProvider, VaultConfig, WalletManager};
///
/// let config = VaultConfig::default().with_kdf_config(KdfConfig::custom_scrypt(4, 8, 1));
/// let mut manager = WalletManager::with_config(MemoryStore::new(), config);
///
/// let wallet = manager
///     .create_wallet("correct horse", Some("Main"), &mut RandomKeypairProvider::new())
///     .unwrap();
/// assert_eq!(manager.active_wallet().unwrap().id(), wallet.id());
/// # }
/// ```
#[derive(Debug)]
pub struct WalletManager<S> {
    store: VaultStore<S>,
    codec: VaultCodec,
    config: VaultConfig,
    live: Option<Vault>,
}

impl<S: KeyValueStore> WalletManager<S> {
    pub fn new(backend: S) -> Self {
        Self::with_config(backend, VaultConfig::default())
    }

    pub fn with_config(backend: S, config: VaultConfig) -> Self {
        WalletManager {
            store: VaultStore::with_layout(backend, config.layout().clone()),
            codec: VaultCodec::new(config.kdf_config()),
            config,
            live: None,
        }
    }

    #[must_use]
    pub fn config(&self) -> &VaultConfig {
        &self.config
    }

    #[must_use]
    pub fn store(&self) -> &VaultStore<S> {
        &self.store
    }

    pub fn into_store(self) -> VaultStore<S> {
        self.store
    }

    /// Whether either slot holds a record.
    pub fn has_vault(&self) -> Result<bool> {
        Ok(self.store.probe()? != StoredFormat::Absent)
    }

    #[must_use]
    pub fn is_unlocked(&self) -> bool {
        self.live.is_some()
    }

    #[must_use]
    pub fn vault(&self) -> Option<&Vault> {
        self.live.as_ref()
    }

    /// The wallet the UI should display, if unlocked.
    #[must_use]
    pub fn active_wallet(&self) -> Option<&Wallet> {
        self.live.as_ref().and_then(Vault::active_wallet)
    }

    #[must_use]
    pub fn wallet(&self, id: &str) -> Option<&Wallet> {
        self.live.as_ref().and_then(|vault| vault.get(id))
    }

    /// Drops the decrypted vault from memory.
    pub fn lock(&mut self) {
        if self.live.take().is_some() {
            debug!("vault locked");
        }
    }

    /// Decrypts the stored vault, migrating a legacy record first if that is
    /// all the store holds.
    pub fn unlock(&mut self, password: &str) -> Result<&Vault> {
        let vault = match self.store.probe()? {
            StoredFormat::Current(sealed) => self.codec.open(&sealed, password)?,
            StoredFormat::Legacy(sealed) => migrate_legacy(
                &mut self.store,
                &self.codec,
                &sealed,
                password,
                self.config.default_wallet_name(),
            )?,
            StoredFormat::Absent => return Err(VaultError::NoVault),
        };

        info!(wallets = vault.len(), "vault unlocked");
        Ok(self.live.insert(vault))
    }

    /// Generates a wallet, appends it, makes it active and persists.
    ///
    /// While locked this is only allowed on an empty store, where it creates
    /// the vault; `password` must then be at least
    /// [`VaultConfig::min_password_len`] characters. A blank or missing name
    /// falls back to the configured default.
    pub fn create_wallet<P: KeypairProvider + ?Sized>(
        &mut self,
        password: &str,
        name: Option<&str>,
        provider: &mut P,
    ) -> Result<Wallet> {
        let mut next = match &self.live {
            Some(vault) => vault.clone(),
            None => match self.store.probe()? {
                StoredFormat::Absent => {
                    let min = self.config.min_password_len();
                    if password.chars().count() < min {
                        return Err(VaultError::WeakPassword { min });
                    }
                    Vault::default()
                }
                StoredFormat::Current(_) | StoredFormat::Legacy(_) => {
                    return Err(VaultError::Locked)
                }
            },
        };

        let eth = provider.generate_ethereum()?;
        let sol = provider.generate_solana()?;

        let name = name
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .unwrap_or(self.config.default_wallet_name());
        let wallet = Wallet::from_parts(new_wallet_id(Some(&next)), name, Utc::now(), eth, sol);
        next.push_active(wallet.clone());

        self.commit(password, next)?;
        info!(wallet_id = %wallet.id(), "wallet created");
        Ok(wallet)
    }

    /// Makes `id` the active wallet.
    pub fn switch_active(&mut self, password: &str, id: &str) -> Result<&Vault> {
        let live = self.live()?;
        if !live.contains(id) {
            return Err(VaultError::NotFound(id.to_string()));
        }

        let mut next = live.clone();
        next.set_active(id);
        let vault = self.commit(password, next)?;
        info!(wallet_id = %id, "active wallet switched");
        Ok(vault)
    }

    /// Removes `id`. The last remaining wallet can never be removed.
    ///
    /// If `id` was active, the first remaining wallet becomes active.
    pub fn delete_wallet(&mut self, password: &str, id: &str) -> Result<&Vault> {
        let live = self.live()?;
        if !live.contains(id) {
            return Err(VaultError::NotFound(id.to_string()));
        }
        if live.len() <= 1 {
            return Err(VaultError::LastWallet);
        }

        let mut next = live.clone();
        next.remove(id);
        let vault = self.commit(password, next)?;
        info!(wallet_id = %id, remaining = vault.len(), "wallet deleted");
        Ok(vault)
    }

    /// Renames `id` to the trimmed `new_name`.
    pub fn rename_wallet(&mut self, password: &str, id: &str, new_name: &str) -> Result<Wallet> {
        let live = self.live()?;
        if !live.contains(id) {
            return Err(VaultError::NotFound(id.to_string()));
        }
        let new_name = new_name.trim();
        if new_name.is_empty() {
            return Err(VaultError::InvalidName);
        }

        let mut next = live.clone();
        let renamed = next
            .rename(id, new_name)
            .cloned()
            .ok_or_else(|| VaultError::NotFound(id.to_string()))?;
        self.commit(password, next)?;
        debug!(wallet_id = %id, "wallet renamed");
        Ok(renamed)
    }

    fn live(&self) -> Result<&Vault> {
        self.live.as_ref().ok_or(VaultError::Locked)
    }

    /// Seals `next`, persists it, then makes it the live vault.
    ///
    /// An existing record is resealed under its own KDF parameters, which also
    /// proves `password` is the vault's password.
    fn commit(&mut self, password: &str, next: Vault) -> Result<&Vault> {
        let sealed = match self.store.read_raw()?.current {
            Some(previous) => self.codec.reseal(&previous, &next, password)?,
            None => self.codec.seal(&next, password)?,
        };
        self.store.write_current(&sealed)?;
        Ok(self.live.insert(next))
    }
}
