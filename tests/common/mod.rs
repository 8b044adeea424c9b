#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tempfile::{tempdir, TempDir};
use wallet_vault::{
    EthereumKeyMaterial, KdfConfig, KeyValueStore, KeypairProvider, MemoryStore, ProviderError,
    SolanaKeyMaterial, VaultCodec, VaultConfig, VaultError, WalletManager,
};

/// Standard test password for consistent testing
pub const TEST_PASSWORD: &str = "test_password_123";
pub const TEST_WRONG_PASSWORD: &str = "wrong_password_456";

/// Weak scrypt parameters so integration tests stay fast
pub fn fast_kdf() -> KdfConfig {
    KdfConfig::custom_scrypt(4, 8, 1)
}

pub fn fast_config() -> VaultConfig {
    VaultConfig::default().with_kdf_config(fast_kdf())
}

pub fn fast_codec() -> VaultCodec {
    VaultCodec::new(fast_kdf())
}

pub fn memory_manager() -> WalletManager<MemoryStore> {
    WalletManager::with_config(MemoryStore::new(), fast_config())
}

/// Creates a temporary directory for file store testing
/// Automatically cleaned up when TempDir is dropped
pub fn create_temp_vault_dir() -> TempDir {
    tempdir().expect("Failed to create temp directory")
}

/// Legacy single-wallet plaintext as older installs wrote it
pub const LEGACY_PLAINTEXT: &str = r#"{"eth":{"address":"0x7E5F4552091A69125d5DfCb7b8C2659029395Bdf","privateKey":"0x0000000000000000000000000000000000000000000000000000000000000001","mnemonic":"test test test test test test test test test test test junk"},"sol":{"address":"SoLegacy1111111111111111111111111111111111","privateKey":"00"}}"#;

/// Deterministic provider: every call yields a distinct, numbered keypair.
#[derive(Debug, Default)]
pub struct FakeProvider {
    issued: u64,
}

impl FakeProvider {
    pub fn issued(&self) -> u64 {
        self.issued
    }
}

impl KeypairProvider for FakeProvider {
    fn generate_ethereum(&mut self) -> Result<EthereumKeyMaterial, ProviderError> {
        self.issued += 1;
        Ok(EthereumKeyMaterial::new(
            format!("0x{:040x}", self.issued),
            format!("0x{:064x}", self.issued),
            "abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon about",
        ))
    }

    fn generate_solana(&mut self) -> Result<SolanaKeyMaterial, ProviderError> {
        Ok(SolanaKeyMaterial::new(
            format!("Sol{:040}", self.issued),
            format!("{:0128x}", self.issued),
        ))
    }
}

/// Memory-backed store whose writes and removals can be made to fail.
#[derive(Debug, Clone, Default)]
pub struct FlakyStore {
    inner: MemoryStore,
    pub fail_writes: Arc<AtomicBool>,
    pub fail_removes: Arc<AtomicBool>,
}

impl FlakyStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entry(key: &str, value: &str) -> Self {
        let mut store = Self::new();
        store
            .inner
            .set(key, value)
            .expect("memory store never fails");
        store
    }
}

impl KeyValueStore for FlakyStore {
    fn get(&self, key: &str) -> wallet_vault::Result<Option<String>> {
        self.inner.get(key)
    }

    fn set(&mut self, key: &str, value: &str) -> wallet_vault::Result<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(VaultError::Persistence(format!("write to {key} refused")));
        }
        self.inner.set(key, value)
    }

    fn remove(&mut self, key: &str) -> wallet_vault::Result<()> {
        if self.fail_removes.load(Ordering::SeqCst) {
            return Err(VaultError::Persistence(format!("remove of {key} refused")));
        }
        self.inner.remove(key)
    }
}

/// Macro to assert a specific error variant
#[macro_export]
macro_rules! assert_error_variant {
    ($result:expr, $pattern:pat) => {
        match $result {
            Err($pattern) => {}
            other => panic!(
                "Expected error variant {}, but got: {:?}",
                stringify!($pattern),
                other
            ),
        }
    };
}
