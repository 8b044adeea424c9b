//! # wallet-vault
//!
//! A password-encrypted vault holding any number of wallets, each pairing an
//! Ethereum keypair (with its BIP-39 phrase) and a Solana keypair. The vault
//! is sealed as a single Web3 Secret Storage style envelope in a string
//! key-value store; records written by older single-wallet installs are
//! migrated on first unlock.
//!
//! ## Example
//!
//! ```
//! # #[cfg(feature = "keygen")]
//! # {
//! use wallet_vault::{
//!     KdfConfig, MemoryStore, RandomKeypairProvider, VaultConfig, WalletManager,
//! };
//!
//! let config = VaultConfig::default().with_kdf_config(KdfConfig::custom_scrypt(4, 8, 1));
//! let mut manager = WalletManager::with_config(MemoryStore::new(), config);
//! let mut provider = RandomKeypairProvider::new();
//!
//! let first = manager.create_wallet("my_password", Some("Main"), &mut provider).unwrap();
//! let second = manager.create_wallet("my_password", None, &mut provider).unwrap();
//! manager.switch_active("my_password", first.id()).unwrap();
//!
//! manager.lock();
//! let vault = manager.unlock("my_password").unwrap();
//! assert_eq!(vault.len(), 2);
//! assert_eq!(vault.active_wallet_id(), Some(first.id()));
//! assert_eq!(vault.get(second.id()).unwrap().name(), "My Wallet");
//! # }
//! ```

pub mod balance;
#[cfg(feature = "keygen")]
pub mod chains;
pub mod codec;
pub mod config;
mod crypto_config;
pub mod error;
pub mod kdf_config;
pub mod manager;
pub mod migration;
pub mod model;
pub mod provider;
pub mod shared;
pub mod store;

pub use balance::{Balance, BalanceError, BalanceSource, BalanceTicket, BalanceTracker};
pub use codec::VaultCodec;
pub use config::VaultConfig;
pub use error::{ProviderError, Result, VaultError};
pub use kdf_config::{KdfConfig, KdfParams, KdfType};
pub use manager::WalletManager;
pub use migration::LegacyWallet;
pub use model::{EthereumKeyMaterial, SolanaKeyMaterial, Vault, Wallet};
pub use provider::KeypairProvider;
pub use shared::SharedWalletManager;
pub use store::{
    FileStore, KeyValueStore, MemoryStore, RawSlots, StorageLayout, StoredFormat, VaultStore,
};

// == Key generation ==

#[cfg(feature = "keygen")]
pub use chains::{ChainKey, EthereumKey, SolanaKey};

#[cfg(feature = "keygen")]
pub use provider::RandomKeypairProvider;
