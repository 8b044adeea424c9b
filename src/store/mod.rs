//! Persisted state: two string slots in an injected key-value backend.
//!
//! The `current` slot holds the sealed multi-wallet vault; the `legacy` slot
//! may still hold a sealed single-wallet record from older installs.

use crate::error::Result;
use tracing::debug;

pub mod file;
pub mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

/// Minimal string key-value backend.
///
/// A single `set` must be atomic from a reader's point of view.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>>;

    fn set(&mut self, key: &str, value: &str) -> Result<()>;

    /// Removes `key`; removing a missing key is not an error.
    fn remove(&mut self, key: &str) -> Result<()>;
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for Box<S> {
    fn get(&self, key: &str) -> Result<Option<String>> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        (**self).set(key, value)
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        (**self).remove(key)
    }
}

/// Keys of the two vault slots.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageLayout {
    pub current: String,
    pub legacy: String,
}

impl Default for StorageLayout {
    fn default() -> Self {
        StorageLayout {
            current: "web3_wallets".to_string(),
            legacy: "web3_wallet".to_string(),
        }
    }
}

/// Raw contents of both slots.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawSlots {
    pub current: Option<String>,
    pub legacy: Option<String>,
}

/// Which record an unlock should consume.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoredFormat {
    Current(String),
    Legacy(String),
    Absent,
}

impl From<RawSlots> for StoredFormat {
    /// The current slot always wins; the legacy slot only matters when the
    /// current one is empty.
    fn from(slots: RawSlots) -> Self {
        match slots {
            RawSlots {
                current: Some(current),
                ..
            } => StoredFormat::Current(current),
            RawSlots {
                current: None,
                legacy: Some(legacy),
            } => StoredFormat::Legacy(legacy),
            RawSlots {
                current: None,
                legacy: None,
            } => StoredFormat::Absent,
        }
    }
}

/// Accessor for the vault slots of a [`KeyValueStore`].
#[derive(Debug)]
pub struct VaultStore<S> {
    backend: S,
    layout: StorageLayout,
}

impl<S: KeyValueStore> VaultStore<S> {
    pub fn new(backend: S) -> Self {
        Self::with_layout(backend, StorageLayout::default())
    }

    pub fn with_layout(backend: S, layout: StorageLayout) -> Self {
        VaultStore { backend, layout }
    }

    #[must_use]
    pub fn layout(&self) -> &StorageLayout {
        &self.layout
    }

    #[must_use]
    pub fn backend(&self) -> &S {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut S {
        &mut self.backend
    }

    pub fn into_backend(self) -> S {
        self.backend
    }

    /// Reads both slots without modifying anything. Empty strings count as absent.
    pub fn read_raw(&self) -> Result<RawSlots> {
        let non_empty = |v: Option<String>| v.filter(|s| !s.is_empty());
        Ok(RawSlots {
            current: non_empty(self.backend.get(&self.layout.current)?),
            legacy: non_empty(self.backend.get(&self.layout.legacy)?),
        })
    }

    pub fn probe(&self) -> Result<StoredFormat> {
        Ok(self.read_raw()?.into())
    }

    /// Replaces the current slot.
    pub fn write_current(&mut self, ciphertext: &str) -> Result<()> {
        debug!(slot = %self.layout.current, "writing sealed vault");
        self.backend.set(&self.layout.current, ciphertext)
    }

    /// Drops the legacy slot. Idempotent.
    pub fn clear_legacy(&mut self) -> Result<()> {
        debug!(slot = %self.layout.legacy, "clearing legacy slot");
        self.backend.remove(&self.layout.legacy)
    }
}
