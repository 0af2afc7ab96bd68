//! AEAD encryption for sync envelopes. Plays the role the original sync
//! layer gave Fernet: a symmetric cipher that gives both confidentiality and
//! integrity from a single pre-shared key, so a tampered or corrupted
//! ciphertext fails to decrypt rather than silently decoding to garbage.

use aes_gcm::aead::{Aead, KeyInit};
use aes_gcm::{Aes256Gcm, Key, Nonce};
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use rand::RngCore;

use memoryforge_core::errors::{MemoryForgeError, MemoryForgeResult};

const NONCE_LEN: usize = 12;
const KEY_LEN: usize = 32;

pub struct SyncKey(Aes256Gcm);

impl SyncKey {
    /// `key` is a URL-safe base64 encoding of exactly 32 raw bytes.
    pub fn from_base64(key: &str) -> MemoryForgeResult<Self> {
        let bytes = URL_SAFE_NO_PAD
            .decode(key.trim_end_matches('='))
            .map_err(|e| MemoryForgeError::validation("sync_key", format!("invalid base64: {e}")))?;
        if bytes.len() != KEY_LEN {
            return Err(MemoryForgeError::validation(
                "sync_key",
                format!("expected {KEY_LEN} raw bytes, got {}", bytes.len()),
            ));
        }
        let key = Key::<Aes256Gcm>::from_slice(&bytes);
        Ok(Self(Aes256Gcm::new(key)))
    }

    /// Mint a fresh random key, URL-safe base64 encoded.
    pub fn generate() -> String {
        let mut bytes = [0u8; KEY_LEN];
        rand::thread_rng().fill_bytes(&mut bytes);
        URL_SAFE_NO_PAD.encode(bytes)
    }

    /// Encrypt `plaintext`, returning a base64 string of `nonce || ciphertext`.
    pub fn encrypt(&self, plaintext: &str) -> MemoryForgeResult<String> {
        let mut nonce_bytes = [0u8; NONCE_LEN];
        rand::thread_rng().fill_bytes(&mut nonce_bytes);
        let nonce = Nonce::from_slice(&nonce_bytes);
        let ciphertext = self
            .0
            .encrypt(nonce, plaintext.as_bytes())
            .map_err(|_| MemoryForgeError::Integrity("encryption failed".into()))?;
        let mut out = Vec::with_capacity(NONCE_LEN + ciphertext.len());
        out.extend_from_slice(&nonce_bytes);
        out.extend_from_slice(&ciphertext);
        Ok(URL_SAFE_NO_PAD.encode(out))
    }

    /// Decrypt a token produced by `encrypt`. Any tampering, truncation, or
    /// wrong key surfaces as `MemoryForgeError::Integrity`.
    pub fn decrypt(&self, token: &str) -> MemoryForgeResult<String> {
        let raw = URL_SAFE_NO_PAD
            .decode(token)
            .map_err(|_| MemoryForgeError::Integrity("malformed ciphertext encoding".into()))?;
        if raw.len() < NONCE_LEN {
            return Err(MemoryForgeError::Integrity("ciphertext too short".into()));
        }
        let (nonce_bytes, ciphertext) = raw.split_at(NONCE_LEN);
        let nonce = Nonce::from_slice(nonce_bytes);
        let plaintext = self
            .0
            .decrypt(nonce, ciphertext)
            .map_err(|_| MemoryForgeError::Integrity("decryption failed".into()))?;
        String::from_utf8(plaintext).map_err(|_| MemoryForgeError::Integrity("decrypted payload is not utf-8".into()))
    }
}

/// Truncated 32-hex-character SHA-256 of the plaintext, used as the
/// envelope's integrity checksum alongside AEAD.
pub fn checksum(plaintext: &str) -> String {
    use sha2::{Digest, Sha256};
    let digest = Sha256::digest(plaintext.as_bytes());
    let hex = format!("{digest:x}");
    hex[..32].to_string()
}
