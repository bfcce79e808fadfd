use aes_gcm::aead::{Aead, KeyInit};
use aes_gcm::{Aes256Gcm, Key, Nonce};
use base64::{engine::general_purpose, Engine as _};
use rand::{rngs::OsRng, RngCore};

use crate::domain::ports::EncryptionService;
use crate::error::AppError;

const KEY_LEN: usize = 32;
const NONCE_LEN: usize = 12;

/// AES-256-GCM. Output is base64(nonce || ciphertext || tag), a fresh nonce per call.
pub struct AesEncryptionService {
    cipher: Aes256Gcm,
}

impl AesEncryptionService {
    pub fn new(key: &[u8; KEY_LEN]) -> Self {
        Self { cipher: Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(key)) }
    }

    /// Builds the service from the base64 `ENCRYPTION_KEY` value.
    pub fn from_base64_key(encoded: &str) -> Result<Self, AppError> {
        let bytes = general_purpose::STANDARD
            .decode(encoded.trim())
            .map_err(|e| AppError::InternalWithMsg(format!("Encryption key is not valid base64: {}", e)))?;
        let key: [u8; KEY_LEN] = bytes.as_slice().try_into().map_err(|_| {
            AppError::InternalWithMsg(format!("Encryption key must be {} bytes, got {}", KEY_LEN, bytes.len()))
        })?;
        Ok(Self::new(&key))
    }
}

impl EncryptionService for AesEncryptionService {
    fn encrypt(&self, value: &str) -> Result<String, AppError> {
        let mut nonce_bytes = [0u8; NONCE_LEN];
        OsRng.fill_bytes(&mut nonce_bytes);
        let mut ct = self
            .cipher
            .encrypt(Nonce::from_slice(&nonce_bytes), value.as_bytes())
            .map_err(|_| AppError::InternalWithMsg("Encryption failed".into()))?;

        let mut out = Vec::with_capacity(NONCE_LEN + ct.len());
        out.extend_from_slice(&nonce_bytes);
        out.append(&mut ct);
        Ok(general_purpose::STANDARD.encode(out))
    }

    fn decrypt(&self, value: &str) -> Result<String, AppError> {
        let blob = general_purpose::STANDARD
            .decode(value.trim())
            .map_err(|_| AppError::InternalWithMsg("Stored secret is not valid base64".into()))?;
        if blob.len() <= NONCE_LEN {
            return Err(AppError::InternalWithMsg("Stored secret is too short".into()));
        }
        let (nonce, ct) = blob.split_at(NONCE_LEN);
        let plain = self
            .cipher
            .decrypt(Nonce::from_slice(nonce), ct)
            .map_err(|_| AppError::InternalWithMsg("Decryption failed".into()))?;
        String::from_utf8(plain).map_err(|_| AppError::InternalWithMsg("Decrypted secret is not UTF-8".into()))
    }
}
