// src/services/wallet.rs

use std::str::FromStr;

use bip39::{Language, Mnemonic};
use ethers_core::k256::ecdsa::SigningKey;
use ethers_core::types::Address;
use ethers_core::utils::keccak256;
use rand::RngCore;
use tracing::info;

use crate::error::{Result, SdkError};
use crate::models::Wallet;

/// Derives the 0x-prefixed keccak address for a signing key.
fn derive_address(private_key: &SigningKey) -> String {
    let public_key = private_key.verifying_key();
    let encoded_point = public_key.to_encoded_point(false);
    // Skip the SEC1 0x04 prefix byte before hashing.
    let hash = keccak256(&encoded_point.as_bytes()[1..]);
    let address = Address::from_slice(&hash[12..]);
    format!("0x{}", hex::encode(address))
}

fn wallet_from_key(private_key: SigningKey, mnemonic: Option<String>) -> Wallet {
    Wallet {
        address: derive_address(&private_key),
        private_key: hex::encode(private_key.to_bytes()),
        mnemonic,
    }
}

fn key_from_mnemonic(mnemonic: &Mnemonic) -> Result<SigningKey> {
    let seed = mnemonic.to_seed("");
    SigningKey::from_slice(&seed[..32])
        .map_err(|e| SdkError::Wallet(format!("failed to derive signing key from seed: {}", e)))
}

/// Generates a new wallet with a fresh 24-word recovery phrase.
pub fn create_wallet() -> Result<Wallet> {
    info!("Generating a new wallet");
    let mut entropy = [0u8; 32];
    rand::thread_rng().fill_bytes(&mut entropy);
    let mnemonic = Mnemonic::from_entropy_in(Language::English, &entropy)
        .map_err(|e| SdkError::Wallet(format!("failed to generate mnemonic: {}", e)))?;

    let private_key = key_from_mnemonic(&mnemonic)?;
    Ok(wallet_from_key(private_key, Some(mnemonic.to_string())))
}

/// Imports a wallet from a recovery phrase or a hex private key.
pub fn import_wallet(input: &str) -> Result<Wallet> {
    let input = input.trim();

    if let Ok(mnemonic) = Mnemonic::from_str(input) {
        info!("Importing wallet from mnemonic");
        let private_key = key_from_mnemonic(&mnemonic)
            .map_err(|e| SdkError::InvalidMnemonic(e.to_string()))?;
        return Ok(wallet_from_key(private_key, Some(input.to_string())));
    }

    if let Ok(private_key_bytes) = hex::decode(input.trim_start_matches("0x")) {
        info!("Importing wallet from private key");
        let private_key = SigningKey::from_slice(&private_key_bytes)
            .map_err(|e| SdkError::InvalidPrivateKey(e.to_string()))?;
        return Ok(wallet_from_key(private_key, None));
    }

    Err(SdkError::InvalidPrivateKey(
        "input is not a valid mnemonic or private key".to_string(),
    ))
}
