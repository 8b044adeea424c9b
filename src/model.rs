//! The decrypted vault: named wallets, each holding one Ethereum and one
//! Solana keypair, plus the pointer to the active wallet.
//!
//! Field order in these structs is the canonical serialization order.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Ethereum address, `0x`-prefixed private key and BIP-39 phrase.
///
/// `mnemonic` is empty when the source never had one.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize, Zeroize, ZeroizeOnDrop)]
#[serde(rename_all = "camelCase")]
pub struct EthereumKeyMaterial {
    address: String,
    private_key: String,
    #[serde(default)]
    mnemonic: String,
}

impl EthereumKeyMaterial {
    pub fn new(
        address: impl Into<String>,
        private_key: impl Into<String>,
        mnemonic: impl Into<String>,
    ) -> Self {
        EthereumKeyMaterial {
            address: address.into(),
            private_key: private_key.into(),
            mnemonic: mnemonic.into(),
        }
    }

    #[must_use]
    pub fn address(&self) -> &str {
        &self.address
    }

    #[must_use]
    pub fn private_key(&self) -> &str {
        &self.private_key
    }

    #[must_use]
    pub fn mnemonic(&self) -> &str {
        &self.mnemonic
    }
}

impl fmt::Debug for EthereumKeyMaterial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EthereumKeyMaterial")
            .field("address", &self.address)
            .finish_non_exhaustive()
    }
}

/// Solana base58 address and hex-encoded 64-byte keypair.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize, Zeroize, ZeroizeOnDrop)]
#[serde(rename_all = "camelCase")]
pub struct SolanaKeyMaterial {
    address: String,
    private_key: String,
}

impl SolanaKeyMaterial {
    pub fn new(address: impl Into<String>, private_key: impl Into<String>) -> Self {
        SolanaKeyMaterial {
            address: address.into(),
            private_key: private_key.into(),
        }
    }

    #[must_use]
    pub fn address(&self) -> &str {
        &self.address
    }

    #[must_use]
    pub fn private_key(&self) -> &str {
        &self.private_key
    }
}

impl fmt::Debug for SolanaKeyMaterial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SolanaKeyMaterial")
            .field("address", &self.address)
            .finish_non_exhaustive()
    }
}

/// One named set of Ethereum + Solana key material.
///
/// Key material is fixed at creation; only the name can change afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Wallet {
    id: String,
    name: String,
    created_at: DateTime<Utc>,
    eth: EthereumKeyMaterial,
    sol: SolanaKeyMaterial,
}

impl Wallet {
    pub fn from_parts(
        id: impl Into<String>,
        name: impl Into<String>,
        created_at: DateTime<Utc>,
        eth: EthereumKeyMaterial,
        sol: SolanaKeyMaterial,
    ) -> Self {
        Wallet {
            id: id.into(),
            name: name.into(),
            created_at,
            eth,
            sol,
        }
    }

    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    #[must_use]
    pub fn eth(&self) -> &EthereumKeyMaterial {
        &self.eth
    }

    #[must_use]
    pub fn sol(&self) -> &SolanaKeyMaterial {
        &self.sol
    }
}

/// Wallet collection plus the active-wallet pointer.
///
/// A consistent vault has unique ids, and `active_wallet_id` names a member
/// exactly when `wallets` is non-empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Vault {
    wallets: Vec<Wallet>,
    active_wallet_id: Option<String>,
}

impl Vault {
    /// Builds a vault from parts, returning `None` if they are inconsistent.
    #[must_use]
    pub fn from_parts(wallets: Vec<Wallet>, active_wallet_id: Option<String>) -> Option<Self> {
        let vault = Vault {
            wallets,
            active_wallet_id,
        };
        vault.is_consistent().then_some(vault)
    }

    /// A vault holding `wallet` as its sole, active member.
    #[must_use]
    pub fn single(wallet: Wallet) -> Self {
        Vault {
            active_wallet_id: Some(wallet.id.clone()),
            wallets: vec![wallet],
        }
    }

    #[must_use]
    pub fn wallets(&self) -> &[Wallet] {
        &self.wallets
    }

    #[must_use]
    pub fn active_wallet_id(&self) -> Option<&str> {
        self.active_wallet_id.as_deref()
    }

    #[must_use]
    pub fn active_wallet(&self) -> Option<&Wallet> {
        self.active_wallet_id.as_deref().and_then(|id| self.get(id))
    }

    #[must_use]
    pub fn get(&self, id: &str) -> Option<&Wallet> {
        self.wallets.iter().find(|w| w.id == id)
    }

    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.wallets.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.wallets.is_empty()
    }

    /// Checks the id-uniqueness and active-wallet invariants.
    #[must_use]
    pub fn is_consistent(&self) -> bool {
        let mut seen = HashSet::with_capacity(self.wallets.len());
        if !self.wallets.iter().all(|w| seen.insert(w.id.as_str())) {
            return false;
        }
        match &self.active_wallet_id {
            None => self.wallets.is_empty(),
            Some(id) => self.contains(id),
        }
    }

    /// Appends `wallet` and makes it active.
    pub(crate) fn push_active(&mut self, wallet: Wallet) {
        self.active_wallet_id = Some(wallet.id.clone());
        self.wallets.push(wallet);
    }

    pub(crate) fn set_active(&mut self, id: &str) {
        self.active_wallet_id = Some(id.to_string());
    }

    /// Removes `id`; if it was active, the first remaining wallet takes over.
    pub(crate) fn remove(&mut self, id: &str) -> Option<Wallet> {
        let index = self.wallets.iter().position(|w| w.id == id)?;
        let removed = self.wallets.remove(index);
        if self.active_wallet_id.as_deref() == Some(id) {
            self.active_wallet_id = self.wallets.first().map(|w| w.id.clone());
        }
        Some(removed)
    }

    pub(crate) fn rename(&mut self, id: &str, name: &str) -> Option<&Wallet> {
        let wallet = self.wallets.iter_mut().find(|w| w.id == id)?;
        wallet.name = name.to_string();
        Some(wallet)
    }

    /// Restores the active-wallet invariant on a freshly decoded vault.
    ///
    /// Returns `None` when ids collide, which cannot be repaired.
    pub(crate) fn repaired(mut self) -> Option<Self> {
        let dangling = match &self.active_wallet_id {
            Some(id) => !self.contains(id),
            None => !self.wallets.is_empty(),
        };
        if dangling {
            tracing::warn!(
                wallets = self.wallets.len(),
                "active wallet pointer was dangling, falling back to the first wallet"
            );
            self.active_wallet_id = self.wallets.first().map(|w| w.id.clone());
        }
        self.is_consistent().then_some(self)
    }
}
