mod common;

use std::collections::HashSet;
use std::thread;

use common::{fast_config, FakeProvider, TEST_PASSWORD};
use wallet_vault::{
    BalanceTracker, FileStore, MemoryStore, SharedWalletManager, Vault, VaultCodec, VaultError,
    WalletManager,
};

// ==========================
// Send + Sync Trait Tests
// ==========================

#[test]
fn shared_manager_is_send_and_sync() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<SharedWalletManager<MemoryStore>>();
    assert_send_sync::<SharedWalletManager<FileStore>>();
}

#[test]
fn plain_types_are_send_and_sync() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<Vault>();
    assert_send_sync::<VaultCodec>();
    assert_send_sync::<VaultError>();
    assert_send_sync::<WalletManager<MemoryStore>>();
    assert_send_sync::<BalanceTracker>();
}

#[test]
#[cfg(feature = "keygen")]
fn chain_keys_are_send_and_sync() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<wallet_vault::EthereumKey>();
    assert_send_sync::<wallet_vault::SolanaKey>();
}

// ==========================
// Serialized Mutations
// ==========================

fn shared_with_one_wallet() -> SharedWalletManager<MemoryStore> {
    let shared = SharedWalletManager::new(WalletManager::with_config(
        MemoryStore::new(),
        fast_config(),
    ));
    shared
        .create_wallet(TEST_PASSWORD, Some("Seed"), &mut FakeProvider::default())
        .unwrap();
    shared
}

#[test]
fn concurrent_creates_are_all_kept() {
    let shared = shared_with_one_wallet();

    let handles: Vec<_> = (0..8)
        .map(|i| {
            let shared = shared.clone();
            thread::spawn(move || {
                let mut provider = FakeProvider::default();
                shared
                    .create_wallet(TEST_PASSWORD, Some(&format!("T{i}")), &mut provider)
                    .unwrap()
            })
        })
        .collect();

    let created: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();

    let vault = shared.vault().unwrap();
    assert_eq!(vault.len(), 9);
    assert!(vault.is_consistent());
    let ids: HashSet<_> = vault.wallets().iter().map(|w| w.id().to_string()).collect();
    for wallet in &created {
        assert!(ids.contains(wallet.id()));
    }

    shared.lock();
    assert_eq!(shared.unlock(TEST_PASSWORD).unwrap(), vault);
}

#[test]
fn concurrent_deletes_never_remove_the_last_wallet() {
    let shared = shared_with_one_wallet();
    let mut provider = FakeProvider::default();
    for _ in 0..3 {
        shared.create_wallet(TEST_PASSWORD, None, &mut provider).unwrap();
    }
    let ids: Vec<String> = shared
        .vault()
        .unwrap()
        .wallets()
        .iter()
        .map(|w| w.id().to_string())
        .collect();

    let handles: Vec<_> = ids
        .into_iter()
        .map(|id| {
            let shared = shared.clone();
            thread::spawn(move || shared.delete_wallet(TEST_PASSWORD, &id))
        })
        .collect();

    let mut last_wallet_refusals = 0;
    for handle in handles {
        match handle.join().unwrap() {
            Ok(_) => {}
            Err(VaultError::LastWallet) => last_wallet_refusals += 1,
            Err(e) => panic!("unexpected error: {e}"),
        }
    }

    let vault = shared.vault().unwrap();
    assert_eq!(last_wallet_refusals, 1);
    assert_eq!(vault.len(), 1);
    assert!(vault.active_wallet().is_some());
}

#[test]
fn readers_see_consistent_snapshots_during_switches() {
    let shared = shared_with_one_wallet();
    let mut provider = FakeProvider::default();
    for _ in 0..3 {
        shared.create_wallet(TEST_PASSWORD, None, &mut provider).unwrap();
    }
    let ids: Vec<String> = shared
        .vault()
        .unwrap()
        .wallets()
        .iter()
        .map(|w| w.id().to_string())
        .collect();

    let writer = {
        let shared = shared.clone();
        let ids = ids.clone();
        thread::spawn(move || {
            for id in ids.iter().cycle().take(20) {
                shared.switch_active(TEST_PASSWORD, id).unwrap();
            }
        })
    };

    let readers: Vec<_> = (0..4)
        .map(|_| {
            let shared = shared.clone();
            thread::spawn(move || {
                for _ in 0..50 {
                    let vault = shared.vault().unwrap();
                    assert!(vault.is_consistent());
                    assert!(vault.active_wallet().is_some());
                }
            })
        })
        .collect();

    writer.join().unwrap();
    for reader in readers {
        reader.join().unwrap();
    }
    assert_eq!(
        shared.active_wallet().unwrap().id(),
        ids[(20 - 1) % ids.len()]
    );
}
