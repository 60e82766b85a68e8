/*
 * Copyright (c) 2025 Dylan Storey
 * Licensed under the Elastic License 2.0.
 * See LICENSE file in the project root for full license text.
 */

//! Encryption utilities for protecting sensitive data at rest.
//!
//! Cluster passwords and hardware-management credentials are stored in the
//! database encrypted with AES-256-GCM. The key comes from configuration
//! (`MUNINN__PORTAL__SECRET_KEY`); when unset, a random per-process key is
//! generated, which makes previously stored credentials unreadable after a
//! restart.

use aes_gcm::aead::{Aead, KeyInit};
use aes_gcm::{Aes256Gcm, Key, Nonce};
use muninn_utils::logging::prelude::*;
use once_cell::sync::OnceCell;
use rand::RngCore;
use sha2::{Digest, Sha256};
use std::sync::Arc;

/// AES-GCM nonce length in bytes.
const NONCE_LEN: usize = 12;

/// Global encryption key storage.
static ENCRYPTION_KEY: OnceCell<Arc<EncryptionKey>> = OnceCell::new();

/// Encryption key wrapper holding the cipher and raw key material.
pub struct EncryptionKey {
    cipher: Aes256Gcm,
    key: [u8; 32],
}

impl EncryptionKey {
    /// Creates a new encryption key from raw bytes.
    pub fn new(key: [u8; 32]) -> Self {
        let cipher = Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(&key));
        Self { cipher, key }
    }

    /// Creates a new random encryption key.
    pub fn generate() -> Self {
        let mut key = [0u8; 32];
        rand::thread_rng().fill_bytes(&mut key);
        Self::new(key)
    }

    /// Creates a key from a hex-encoded string.
    pub fn from_hex(hex_str: &str) -> Result<Self, String> {
        let bytes = hex::decode(hex_str).map_err(|e| format!("Invalid hex encoding: {}", e))?;

        if bytes.len() != 32 {
            return Err(format!("Key must be 32 bytes, got {} bytes", bytes.len()));
        }

        let mut key = [0u8; 32];
        key.copy_from_slice(&bytes);
        Ok(Self::new(key))
    }

    /// Returns a short key fingerprint for logging (never the key itself).
    pub fn fingerprint(&self) -> String {
        let hash = Sha256::digest(self.key);
        hex::encode(&hash[..8])
    }

    /// Encrypts data.
    ///
    /// # Format
    /// The output format is: `nonce (12 bytes) || ciphertext`
    pub fn encrypt(&self, plaintext: &[u8]) -> Vec<u8> {
        let mut nonce = [0u8; NONCE_LEN];
        rand::thread_rng().fill_bytes(&mut nonce);

        let ciphertext = self
            .cipher
            .encrypt(Nonce::from_slice(&nonce), plaintext)
            .expect("AES-GCM encryption cannot fail with a valid key");

        let mut output = Vec::with_capacity(NONCE_LEN + ciphertext.len());
        output.extend_from_slice(&nonce);
        output.extend(ciphertext);
        output
    }

    /// Decrypts data encrypted with [`EncryptionKey::encrypt`].
    ///
    /// # Arguments
    /// * `ciphertext` - The encrypted data (nonce || ciphertext).
    ///
    /// # Returns
    /// The decrypted plaintext, or an error if the key is wrong or the data
    /// is corrupted.
    pub fn decrypt(&self, ciphertext: &[u8]) -> Result<Vec<u8>, String> {
        if ciphertext.len() < NONCE_LEN {
            return Err("Ciphertext too short (missing nonce)".to_string());
        }

        let (nonce, encrypted) = ciphertext.split_at(NONCE_LEN);

        self.cipher
            .decrypt(Nonce::from_slice(nonce), encrypted)
            .map_err(|_| "Decryption failed (wrong key or corrupted data)".to_string())
    }
}

/// Initializes the global encryption key from configuration.
///
/// This should be called once during startup.
///
/// # Arguments
/// * `key_hex` - Optional hex-encoded 32-byte key. If None, a random key is generated.
///
/// # Returns
/// Ok(()) if initialization succeeded, Err if already initialized or key is invalid.
pub fn init_encryption_key(key_hex: Option<&str>) -> Result<(), String> {
    let key = match key_hex {
        Some(hex_str) if !hex_str.is_empty() => {
            info!("Initializing encryption key from configuration");
            EncryptionKey::from_hex(hex_str)?
        }
        _ => {
            warn!(
                "No encryption key configured, generating random key. \
                 Configure MUNINN__PORTAL__SECRET_KEY for production use."
            );
            EncryptionKey::generate()
        }
    };

    info!("Encryption key fingerprint: {}", key.fingerprint());

    ENCRYPTION_KEY
        .set(Arc::new(key))
        .map_err(|_| "Encryption key already initialized".to_string())
}

/// Gets the global encryption key.
///
/// # Panics
/// Panics if called before init_encryption_key().
pub fn get_encryption_key() -> Arc<EncryptionKey> {
    ENCRYPTION_KEY
        .get()
        .expect("Encryption key not initialized. Call init_encryption_key() first.")
        .clone()
}

/// Encrypts a string value for storage.
pub fn encrypt_string(value: &str) -> Vec<u8> {
    get_encryption_key().encrypt(value.as_bytes())
}

/// Decrypts bytes back to a string.
pub fn decrypt_string(encrypted: &[u8]) -> Result<String, String> {
    let bytes = get_encryption_key().decrypt(encrypted)?;
    String::from_utf8(bytes).map_err(|e| format!("Decrypted value is not valid UTF-8: {}", e))
}
