//! One-time upgrade of a legacy single-wallet record into a vault.
//!
//! Legacy records use the same envelope and KDF as current ones; only the
//! plaintext differs: a bare `{eth, sol}` pair without id, name or
//! creation time.

use crate::codec::VaultCodec;
use crate::error::Result;
use crate::model::{EthereumKeyMaterial, SolanaKeyMaterial, Vault, Wallet};
use crate::store::{KeyValueStore, VaultStore};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// Plaintext schema of the legacy slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LegacyWallet {
    pub eth: EthereumKeyMaterial,
    pub sol: SolanaKeyMaterial,
}

/// Opens `legacy_ciphertext`, writes it back as a one-wallet vault and
/// removes the legacy slot.
///
/// A decrypt failure leaves the store untouched so the caller can retry.
/// If the vault was written but the legacy slot could not be removed, the
/// migration still succeeds: the current slot takes precedence on every
/// later unlock.
pub(crate) fn migrate_legacy<S: KeyValueStore>(
    store: &mut VaultStore<S>,
    codec: &VaultCodec,
    legacy_ciphertext: &str,
    password: &str,
    wallet_name: &str,
) -> Result<Vault> {
    let legacy: LegacyWallet = codec.open_as(legacy_ciphertext, password)?;

    let wallet = Wallet::from_parts(
        crate::manager::new_wallet_id(None),
        wallet_name,
        Utc::now(),
        legacy.eth,
        legacy.sol,
    );
    let vault = Vault::single(wallet);

    let sealed = codec.seal(&vault, password)?;
    store.write_current(&sealed)?;

    if let Err(e) = store.clear_legacy() {
        warn!(error = %e, "migrated vault written but legacy slot could not be removed");
    }

    info!(wallet_id = ?vault.active_wallet_id(), "migrated legacy wallet");
    Ok(vault)
}
