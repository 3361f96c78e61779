//! encryption module
//!
//! AES-256-GCM encryption of registrar credentials at rest. Keys are derived
//! from a password with PBKDF2-HMAC-SHA256; the iteration count is stored
//! with each secret so it can be raised without breaking old rows.

use aes_gcm::{
    aead::{Aead, KeyInit},
    Aes256Gcm, Nonce,
};
use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use pbkdf2::pbkdf2_hmac_array;
use rand::RngCore;
use serde::{Deserialize, Serialize};
use sha2::Sha256;

use crate::error::{CoreError, CoreResult};

/// PBKDF2 iterations for newly sealed secrets (OWASP 2023)
pub const PBKDF2_ITERATIONS: u32 = 600_000;
const SALT_LENGTH: usize = 16;
const NONCE_LENGTH: usize = 12;
const KEY_LENGTH: usize = 32; // AES-256

/// An encrypted value plus everything needed to decrypt it (except the password)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SealedSecret {
    /// Base64 salt
    pub salt: String,
    /// Base64 nonce
    pub nonce: String,
    /// Base64 ciphertext (with GCM tag)
    pub ciphertext: String,
    pub iterations: u32,
}

fn derive_key(password: &str, salt: &[u8], iterations: u32) -> [u8; KEY_LENGTH] {
    pbkdf2_hmac_array::<Sha256, KEY_LENGTH>(password.as_bytes(), salt, iterations)
}

/// Encrypt data with the default iteration count
pub fn encrypt(plaintext: &[u8], password: &str) -> CoreResult<SealedSecret> {
    encrypt_with_iterations(plaintext, password, PBKDF2_ITERATIONS)
}

/// Encrypt data
///
/// # Arguments
/// * `plaintext` - plain text data to be encrypted
/// * `password` - encrypted password
/// * `iterations` - PBKDF2 iteration count recorded in the result
pub fn encrypt_with_iterations(
    plaintext: &[u8],
    password: &str,
    iterations: u32,
) -> CoreResult<SealedSecret> {
    // Generate random salt and nonce
    let mut salt = [0u8; SALT_LENGTH];
    let mut nonce_bytes = [0u8; NONCE_LENGTH];
    rand::rng().fill_bytes(&mut salt);
    rand::rng().fill_bytes(&mut nonce_bytes);

    let key = derive_key(password, &salt, iterations);
    let cipher = Aes256Gcm::new_from_slice(&key)
        .map_err(|e| CoreError::CredentialError(format!("Failed to create cipher: {e}")))?;
    let nonce = Nonce::from_slice(&nonce_bytes);

    let ciphertext = cipher
        .encrypt(nonce, plaintext)
        .map_err(|e| CoreError::CredentialError(format!("Encryption failed: {e}")))?;

    Ok(SealedSecret {
        salt: BASE64.encode(salt),
        nonce: BASE64.encode(nonce_bytes),
        ciphertext: BASE64.encode(ciphertext),
        iterations,
    })
}

/// Decrypt data
///
/// # Returns
/// Return decrypted plaintext data
pub fn decrypt(sealed: &SealedSecret, password: &str) -> CoreResult<Vec<u8>> {
    let decode = |what: &str, value: &str| {
        BASE64
            .decode(value)
            .map_err(|e| CoreError::CredentialError(format!("Invalid {what}: {e}")))
    };
    let salt = decode("salt", &sealed.salt)?;
    let nonce_bytes = decode("nonce", &sealed.nonce)?;
    let ciphertext = decode("ciphertext", &sealed.ciphertext)?;
    if nonce_bytes.len() != NONCE_LENGTH {
        return Err(CoreError::CredentialError(format!(
            "Invalid nonce length: {}",
            nonce_bytes.len()
        )));
    }

    let key = derive_key(password, &salt, sealed.iterations);
    let cipher = Aes256Gcm::new_from_slice(&key)
        .map_err(|e| CoreError::CredentialError(format!("Failed to create cipher: {e}")))?;
    let nonce = Nonce::from_slice(&nonce_bytes);

    cipher.decrypt(nonce, ciphertext.as_ref()).map_err(|_| {
        CoreError::CredentialError(
            "Decryption failed: invalid password or corrupted data".to_string(),
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    // Low iteration count keeps the tests fast; the default is covered once.
    const TEST_ITERATIONS: u32 = 1_000;

    #[test]
    fn encrypt_decrypt_roundtrip() {
        let plaintext = br#"{"registrar":"godaddy","credentials":{"api_key":"k","api_secret":"s"}}"#;
        let sealed = encrypt(plaintext, "strong-password-123").unwrap();
        assert_eq!(sealed.iterations, PBKDF2_ITERATIONS);
        assert_eq!(decrypt(&sealed, "strong-password-123").unwrap(), plaintext);
    }

    #[test]
    fn decrypt_wrong_password_fails() {
        let sealed = encrypt_with_iterations(b"secret data", "correct", TEST_ITERATIONS).unwrap();
        assert!(decrypt(&sealed, "wrong").is_err());
    }

    #[test]
    fn decrypt_corrupted_ciphertext_fails() {
        let mut sealed = encrypt_with_iterations(b"some data", "pw", TEST_ITERATIONS).unwrap();
        sealed.ciphertext = BASE64.encode(b"this is not valid ciphertext at all!!");
        assert!(decrypt(&sealed, "pw").is_err());
    }

    #[test]
    fn decrypt_invalid_base64_fails() {
        let sealed = SealedSecret {
            salt: "also-bad!!!".into(),
            nonce: "bad!!!".into(),
            ciphertext: "not-valid-base64!!!".into(),
            iterations: TEST_ITERATIONS,
        };
        assert!(matches!(
            decrypt(&sealed, "pw"),
            Err(CoreError::CredentialError(_))
        ));
    }

    #[test]
    fn iteration_count_is_part_of_the_key() {
        let mut sealed = encrypt_with_iterations(b"data", "pw", TEST_ITERATIONS).unwrap();
        sealed.iterations = TEST_ITERATIONS + 1;
        assert!(decrypt(&sealed, "pw").is_err());
    }

    #[test]
    fn encrypt_produces_different_output() {
        let a = encrypt_with_iterations(b"same", "pw", TEST_ITERATIONS).unwrap();
        let b = encrypt_with_iterations(b"same", "pw", TEST_ITERATIONS).unwrap();
        assert!(a.salt != b.salt || a.nonce != b.nonce || a.ciphertext != b.ciphertext);
    }
}
