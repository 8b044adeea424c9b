//! Thread-safe handle over a [`WalletManager`].
//!
//! Every operation holds the lock for its whole validate, seal, write and
//! commit sequence, so concurrent mutations are serialized and no caller can
//! observe a half-applied change.

use crate::error::Result;
use crate::manager::WalletManager;
use crate::model::{Vault, Wallet};
use crate::provider::KeypairProvider;
use crate::store::KeyValueStore;
use parking_lot::Mutex;
use std::sync::Arc;

/// Cloneable, `Send + Sync` wrapper returning owned snapshots.
#[derive(Debug)]
pub struct SharedWalletManager<S> {
    inner: Arc<Mutex<WalletManager<S>>>,
}

impl<S> Clone for SharedWalletManager<S> {
    fn clone(&self) -> Self {
        SharedWalletManager {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<S: KeyValueStore> SharedWalletManager<S> {
    pub fn new(manager: WalletManager<S>) -> Self {
        SharedWalletManager {
            inner: Arc::new(Mutex::new(manager)),
        }
    }

    pub fn unlock(&self, password: &str) -> Result<Vault> {
        self.inner.lock().unlock(password).cloned()
    }

    pub fn lock(&self) {
        self.inner.lock().lock();
    }

    #[must_use]
    pub fn is_unlocked(&self) -> bool {
        self.inner.lock().is_unlocked()
    }

    pub fn has_vault(&self) -> Result<bool> {
        self.inner.lock().has_vault()
    }

    #[must_use]
    pub fn vault(&self) -> Option<Vault> {
        self.inner.lock().vault().cloned()
    }

    #[must_use]
    pub fn active_wallet(&self) -> Option<Wallet> {
        self.inner.lock().active_wallet().cloned()
    }

    pub fn create_wallet<P: KeypairProvider + ?Sized>(
        &self,
        password: &str,
        name: Option<&str>,
        provider: &mut P,
    ) -> Result<Wallet> {
        self.inner.lock().create_wallet(password, name, provider)
    }

    pub fn switch_active(&self, password: &str, id: &str) -> Result<Vault> {
        self.inner.lock().switch_active(password, id).cloned()
    }

    pub fn delete_wallet(&self, password: &str, id: &str) -> Result<Vault> {
        self.inner.lock().delete_wallet(password, id).cloned()
    }

    pub fn rename_wallet(&self, password: &str, id: &str, new_name: &str) -> Result<Wallet> {
        self.inner.lock().rename_wallet(password, id, new_name)
    }

    /// Runs `f` with exclusive access to the underlying manager.
    pub fn with_manager<T>(&self, f: impl FnOnce(&mut WalletManager<S>) -> T) -> T {
        f(&mut self.inner.lock())
    }
}

impl<S: KeyValueStore> From<WalletManager<S>> for SharedWalletManager<S> {
    fn from(manager: WalletManager<S>) -> Self {
        Self::new(manager)
    }
}
