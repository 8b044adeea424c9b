#![cfg(feature = "keygen")]

mod common;

use common::{memory_manager, TEST_PASSWORD};
use wallet_vault::{
    ChainKey, EthereumKey, KeypairProvider, RandomKeypairProvider, SolanaKey,
};

// ==========================
// Ethereum Test Vectors
// ==========================

#[test]
fn ethereum_private_key_one() {
    let key = EthereumKey::from_private_key(
        "0x0000000000000000000000000000000000000000000000000000000000000001",
    )
    .unwrap();
    assert_eq!(key.address(), "0x7E5F4552091A69125d5DfCb7b8C2659029395Bdf");
}

#[test]
fn ethereum_private_key_without_prefix() {
    let key = EthereumKey::from_private_key(
        "ac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80",
    )
    .unwrap();
    assert_eq!(key.address(), "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266");
}

#[test]
fn ethereum_mnemonic_first_account() {
    let key =
        EthereumKey::from_mnemonic("test test test test test test test test test test test junk")
            .unwrap();
    assert_eq!(key.address(), "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266");
    assert_eq!(
        key.private_key().as_str(),
        "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80"
    );
}

#[test]
fn ethereum_rejects_zero_private_key() {
    assert!(EthereumKey::from_private_key(&"00".repeat(32)).is_err());
}

#[test]
fn ethereum_rejects_wrong_length() {
    let err = EthereumKey::from_private_key("0x0102").unwrap_err();
    assert_eq!(err.chain, "ethereum");
}

// ==========================
// Solana Test Vectors
// ==========================

#[test]
fn solana_rfc8032_keypair() {
    // RFC 8032 section 7.1, test 1
    let secret = "9d61b19deffd5a60ba844af492ec2cc44449c5697b326919703bac031cae7f60";
    let public = "d75a980182b10ab7d54bfed3c964073a0ee172f3daa62325af021a68f707511a";

    let key = SolanaKey::from_private_key(&format!("{secret}{public}")).unwrap();
    let decoded = bs58::decode(key.address()).into_vec().unwrap();
    assert_eq!(hex::encode(decoded), public);
    assert_eq!(key.private_key().as_str(), format!("{secret}{public}"));
}

#[test]
fn solana_rejects_mismatched_public_half() {
    let secret = "9d61b19deffd5a60ba844af492ec2cc44449c5697b326919703bac031cae7f60";
    let other = "3d4017c3e843895a92b70aa74d1b7ebc9c982ccf2ec4968cc0cd55f12af4660c";
    assert!(SolanaKey::from_private_key(&format!("{secret}{other}")).is_err());
}

// ==========================
// Random Provider In The Vault
// ==========================

#[test]
fn random_provider_wallets_are_recoverable() {
    let mut manager = memory_manager();
    let mut provider = RandomKeypairProvider::new();
    let wallet = manager
        .create_wallet(TEST_PASSWORD, None, &mut provider)
        .unwrap();

    assert_eq!(wallet.eth().mnemonic().split_whitespace().count(), 12);
    let from_phrase = EthereumKey::from_mnemonic(wallet.eth().mnemonic()).unwrap();
    assert_eq!(from_phrase.address(), wallet.eth().address());

    let sol = SolanaKey::from_private_key(wallet.sol().private_key()).unwrap();
    assert_eq!(sol.address(), wallet.sol().address());
}

#[test]
fn random_provider_keys_are_independent() {
    let mut provider = RandomKeypairProvider::new();
    let a = provider.generate_ethereum().unwrap();
    let b = provider.generate_ethereum().unwrap();
    assert_ne!(a.address(), b.address());
    assert_ne!(a.mnemonic(), b.mnemonic());
}
